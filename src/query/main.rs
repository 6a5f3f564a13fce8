//! Query server for postcode radius searches and care-region lookups.
//!
//! Loads the postcode and facility tables once at startup and serves them
//! read-only over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use postfinder::config::Config;
use postfinder::region::{annotate_boundaries, load_boundaries};
use postfinder::startup::load_coordinator;

mod error;
mod routes;

use routes::{router, AppState};

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Postcode proximity and region query server")]
struct Args {
    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Postcode CSV (overrides the config file)
    #[arg(long)]
    dataset: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(listen) = args.listen {
        config.global.listen = listen;
    }
    if let Some(dataset) = args.dataset {
        config.global.dataset = dataset;
    }

    info!("Postfinder Query Server");

    let coordinator = load_coordinator(&config)?;

    let boundaries = match &config.global.boundaries {
        Some(path) => {
            let collection = load_boundaries(path)
                .with_context(|| format!("Failed to load boundaries from {}", path.display()))?;
            Some(annotate_boundaries(collection, coordinator.classifier()))
        }
        None => None,
    };

    let app = router(Arc::new(AppState {
        coordinator,
        boundaries,
    }));

    info!("Starting server on {}", config.global.listen);

    let listener = tokio::net::TcpListener::bind(&config.global.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
