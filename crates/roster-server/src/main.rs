//! # Roster Server
//!
//! Bootstrap entry point: loads configuration, prepares the SQLite store,
//! wires the services and reports what the store contains.

use roster_config::{AppConfig, ConfigLoader, ObservabilityConfig};
use roster_core::RosterResult;
use roster_server::app::AppBuilder;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.into_config(),
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);

    info!("Starting Roster...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> RosterResult<()> {
    info!("Environment: {}", config.app.environment);
    info!("Database: {}", config.database.url);

    let app = AppBuilder::new().with_config(config).build().await?;
    let stats = app.run().await?;

    info!(
        members = stats.members,
        teams = stats.teams,
        memberships = stats.memberships,
        "Startup complete"
    );

    app.shutdown().await;
    Ok(())
}

fn init_logging(config: &ObservabilityConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info,roster=debug"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}
