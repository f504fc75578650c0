//! Key inspection commands.
//!
//! Provides `keycrypt key status`, which reports whether the credential
//! store holds a key without provisioning one or printing it.

use clap::Args;
use keycrypt_crypto::{
    keychain, CredentialStore, CryptoOptions, ACCOUNT_NAME, SERVICE_NAME,
};

/// Key command arguments.
#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

#[derive(clap::Subcommand)]
pub enum KeyCommand {
    /// Report whether a key is stored
    Status,
}

/// Run the key command.
pub async fn run(options: CryptoOptions, args: &KeyArgs) -> anyhow::Result<()> {
    match args.command {
        KeyCommand::Status => {
            let store = match options.keychain.clone() {
                Some(store) => store,
                None => keychain::open(options.resolved_kind())
                    .map_err(|e| anyhow::anyhow!("Failed to open keychain: {}", e))?,
            };
            println!("{}", status(store.as_ref()).await?);
        }
    }

    Ok(())
}

/// Describe the key slot of `store`.
pub async fn status(store: &dyn CredentialStore) -> anyhow::Result<String> {
    match store.get_password(SERVICE_NAME, ACCOUNT_NAME).await {
        Ok(credential) => Ok(format!(
            "key present in {} keychain ({}/{}, {} bytes)",
            store.kind(),
            SERVICE_NAME,
            credential.account,
            credential.password.len()
        )),
        Err(e) if e.is_not_found() => Ok(format!(
            "no key in {} keychain ({}/{}); one is created on first use",
            store.kind(),
            SERVICE_NAME,
            ACCOUNT_NAME
        )),
        Err(e) => Err(anyhow::anyhow!("{}", e)),
    }
}
