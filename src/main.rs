//! Back-office HTTP server.
//!
//! Usage: `venue-backoffice [CONFIG_PATH]`. The configuration defaults to
//! `./config/backoffice.yaml`; log verbosity follows `RUST_LOG`.

use std::error::Error;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use venue_backoffice::api::{AppState, create_router};
use venue_backoffice::config::ConfigLoader;

const DEFAULT_CONFIG_PATH: &str = "./config/backoffice.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = ConfigLoader::load(&config_path)?;
    let bind_address = config.server().bind_address.clone();
    info!(
        config = %config_path,
        venue = %config.venue().name,
        storage = ?config.storage(),
        "Configuration loaded"
    );

    let app = create_router(AppState::from_config(config));
    let listener = TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Back office listening");
    axum::serve(listener, app).await?;
    Ok(())
}
