//! keycrypt command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};
use keycrypt_crypto::{CryptoOptions, KeychainKind};

/// keycrypt - keychain-backed token encryption
#[derive(Parser)]
#[command(name = "keycrypt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Keychain backend (macos, windows, generic, memory). `memory` keeps
    /// nothing between runs and is refused by encrypt and decrypt.
    #[arg(short, long)]
    pub keychain: Option<KeychainKind>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a value and print the envelope
    Encrypt {
        /// Value to encrypt (read from stdin when omitted)
        text: Option<String>,
    },

    /// Decrypt an envelope and print the value
    Decrypt {
        /// Envelope to decrypt (read from stdin when omitted)
        envelope: Option<String>,
    },

    /// Report whether a value looks like an envelope
    Check {
        /// Value to inspect
        text: String,
    },

    /// Inspect the encryption key
    Key(commands::key::KeyArgs),

    /// Show version information
    Version,
}

impl Cli {
    /// Context options from the environment, with command-line overrides.
    pub fn options(&self) -> anyhow::Result<CryptoOptions> {
        let mut options = CryptoOptions::from_env()?;
        if let Some(kind) = self.keychain {
            options = options.with_keychain_kind(kind);
        }
        tracing::debug!(keychain = %options.resolved_kind(), platform = %options.platform, "resolved options");
        Ok(options)
    }

    /// Options for commands whose output must be readable by a later run.
    pub fn persistent_options(&self) -> anyhow::Result<CryptoOptions> {
        let options = self.options()?;
        if options.resolved_kind() == KeychainKind::Memory {
            anyhow::bail!(
                "the memory keychain does not persist its key; \
                 envelopes could never be decrypted (use macos, windows or generic)"
            );
        }
        Ok(options)
    }
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Encrypt { ref text } => {
            commands::crypt::encrypt(cli.persistent_options()?, text.clone()).await
        }
        Commands::Decrypt { ref envelope } => {
            commands::crypt::decrypt(cli.persistent_options()?, envelope.clone()).await
        }
        Commands::Check { ref text } => {
            commands::crypt::check(text);
            Ok(())
        }
        Commands::Key(ref args) => commands::key::run(cli.options()?, args).await,
        Commands::Version => {
            println!("keycrypt {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
