use anyhow::Result;
use clap::Parser;
use helpdoc::cli::Cli;
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with environment-based filtering
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        // Log the full error for debugging
        error!("command failed: {:?}", e);

        // Display user-friendly error message
        eprintln!("Error: {}", e.user_message());

        std::process::exit(1);
    }

    Ok(())
}
