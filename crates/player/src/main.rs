//! Open Theatre Player - terminal composition root.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use theatre_player::infrastructure::{ApiAdapter, SystemClock};
use theatre_player::runner::Repl;
use theatre_player::{ClientConfig, TheatreClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "theatre_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(api_url = %config.api_url, "Starting Open Theatre Player");

    let raw_api = ApiAdapter::from_config(&config).context("building HTTP client")?;
    let client = TheatreClient::new(Arc::new(raw_api), Arc::new(SystemClock), &config);

    // Nothing loaded is fine; the welcome notice is printed by the loop.
    if let Err(e) = client.start().await {
        tracing::warn!(error = %e, "Initial game fetch failed");
    }

    let mut repl = Repl::new(client);
    repl.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("terminal session failed")?;

    tracing::info!("Goodbye");
    Ok(())
}
