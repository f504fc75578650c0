//! keycrypt CLI entry point.

use clap::Parser;
use keycrypt_cli::{run, Cli};
use keycrypt_core::env::vars;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only command output.
    let default_filter = match cli.verbose {
        0 => "keycrypt=info",
        1 => "keycrypt=debug",
        _ => "keycrypt=trace",
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env(vars::KEYCRYPT_LOG)
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(cli).await
}
