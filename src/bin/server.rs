//! aitrainer HTTP server
//!
//! Serves the workout, sync, prompt and settings API. When a Hevy token is
//! configured the background sync loop runs alongside the server.
//!
//! # Configuration
//!
//! Read from `~/.config/aitrainer/config.yaml` (or `AITRAINER_CONFIG`) and
//! overridden by environment variables:
//! - `AITRAINER_PORT`: Port to listen on (default: 8000)
//! - `AITRAINER_DATABASE_PATH`: SQLite database file
//! - `AITRAINER_PROMPTS_PATH`: Prompt templates YAML file
//! - `HEVY_TOKEN`: Enables sync and exercise matching
//! - `HEVY_SYNC_INTERVAL_HOURS`: Background sync interval (default: 6)

use std::net::SocketAddr;
use std::path::PathBuf;

use aitrainer::config::Config;
use aitrainer::context::AppContext;
use aitrainer::server::router;
use aitrainer::sync::spawn_background;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aitrainer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(std::env::var("AITRAINER_CONFIG").ok().map(PathBuf::from))?;
    tracing::info!("Database: {}", config.database_path.value.display());
    tracing::info!("Prompts: {}", config.prompts_path.value.display());

    let context = AppContext::from_config(&config).await?;

    let _sync_task = context.sync.clone().map(|service| {
        tracing::info!(
            "Background sync every {} hour(s)",
            config.sync_interval_hours.value
        );
        spawn_background(service)
    });

    let app = router(context);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port.value));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
