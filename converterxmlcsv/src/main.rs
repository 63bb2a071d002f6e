use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use converterxmlcsv::cli::{run, Cli};
use converterxmlcsv::select::DialoguerSelector;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never mix with the menu or CSV summaries.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    tracing::info!("CLI arguments parsed, invoking run");
    let result = run(cli, &DialoguerSelector).await;
    match &result {
        Ok(_) => tracing::info!("CLI completed successfully"),
        Err(e) => {
            tracing::error!(error = %e, "CLI exited with error");
            eprintln!("{}", format!("Erro: {e:#}").bright_red());
        }
    }
    result
}
