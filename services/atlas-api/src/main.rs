//! County Atlas API Server
//!
//! Serves per-county feature attributions and choropleth map specs from a
//! precomputed dataset artifact.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use atlas_api::config::AtlasConfig;
use atlas_api::routes;
use atlas_api::state::AppState;

/// County Atlas API Server
#[derive(Parser, Debug)]
#[command(name = "atlas-api")]
#[command(about = "County attribution atlas server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8085", env = "ATLAS_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "ATLAS_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// YAML configuration file
    #[arg(short, long, default_value = "config/atlas.yaml", env = "ATLAS_CONFIG")]
    config: PathBuf,

    /// Dataset artifact, overrides the config file
    #[arg(long, env = "ATLAS_DATASET_PATH")]
    dataset: Option<PathBuf>,

    /// County boundary GeoJSON, overrides the config file
    #[arg(long, env = "ATLAS_BOUNDARIES_PATH")]
    boundaries: Option<PathBuf>,

    /// Features listed per county in the drill-down
    #[arg(long, env = "ATLAS_TOP_FEATURES")]
    top_features: Option<usize>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting county atlas server");

    let config = AtlasConfig::load_from_file(&args.config)?.with_overrides(
        args.dataset,
        args.boundaries,
        args.top_features,
    );

    // Loading is blocking and happens once; any failure is fatal.
    let state = match tokio::task::spawn_blocking(move || AppState::load(config)).await? {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to initialize application state: {:#}", e);
            std::process::exit(1);
        }
    };

    let app = routes::router(state, prometheus);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Atlas API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
