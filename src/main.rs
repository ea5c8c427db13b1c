mod config;
mod error;
mod ethereum;
mod fetcher;
mod report;

use anyhow::Result;
use config::Config;
use fetcher::EventFetcher;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the event report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = Config::load().await.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Fetching {} events", config.event_name);
    info!("Contract address: {}", config.contract_address);
    info!("Block range: {} to {}", config.from_block, config.to_block);

    let fetcher = EventFetcher::new(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = fetcher.run_http(&mut out).await {
        error!("{}", e);
        return Err(e.into());
    }

    Ok(())
}
