mod api;
mod cli;
mod commands;
mod export;
mod letter;
mod session;

pub const USER_AGENT: &str = concat!("netsanet/", env!("CARGO_PKG_VERSION"), " (CLI)");

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("netsanet=warn")),
        )
        .init();

    let cli = cli::Cli::parse();
    debug!(api_url = %cli.api_url, "starting netsanet");

    if let Err(e) = commands::run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
