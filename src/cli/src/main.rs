//! ACR Cleanup CLI entry point.

use clap::Parser;

use acr_cleanup_cli::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = acr_cleanup_cli::execute(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
