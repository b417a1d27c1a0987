//! Aeris API Server
//!
//! Serves metadata, slice values and slice images from a NetCDF
//! concentration time series.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use aeris_common::UnitConversion;
use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use aeris_api::{build_router, AppState, ServiceConfig};

/// Aeris API Server
#[derive(Parser, Debug)]
#[command(name = "aeris-api")]
#[command(about = "HTTP server for NetCDF concentration slices")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "AERIS_LISTEN_ADDR")]
    listen: String,

    /// NetCDF file to serve
    #[arg(
        short,
        long,
        default_value = "concentration.timeseries.nc",
        env = "AERIS_DATASET_PATH"
    )]
    dataset: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "AERIS_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Default pixels per grid cell edge for /get-image
    #[arg(long, default_value_t = renderer::DEFAULT_SCALE_FACTOR, env = "AERIS_IMAGE_SCALE")]
    image_scale: usize,

    /// Largest raster /get-image will render, in pixels
    #[arg(long, default_value_t = renderer::DEFAULT_MAX_PIXELS, env = "AERIS_MAX_IMAGE_PIXELS")]
    max_image_pixels: usize,

    /// Factor applied to values in text tables
    #[arg(long, default_value_t = 1e9, env = "AERIS_DISPLAY_UNIT_FACTOR")]
    display_unit_factor: f64,

    /// Unit label printed in text tables
    #[arg(long, default_value = "ug/m3", env = "AERIS_DISPLAY_UNIT_LABEL")]
    display_unit_label: String,
}

impl Args {
    fn service_config(&self) -> Result<ServiceConfig> {
        ensure!(self.image_scale >= 1, "--image-scale must be at least 1");
        ensure!(
            self.max_image_pixels >= 1,
            "--max-image-pixels must be at least 1"
        );
        ensure!(
            self.display_unit_factor.is_finite(),
            "--display-unit-factor must be finite"
        );

        Ok(ServiceConfig::new(self.dataset.clone())
            .with_image_scale(self.image_scale)
            .with_max_image_pixels(self.max_image_pixels)
            .with_display_units(UnitConversion::new(
                self.display_unit_factor,
                self.display_unit_label.clone(),
            )))
    }
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

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting Aeris API server");

    let config = args.service_config()?;
    info!(
        path = %config.dataset_path.display(),
        image_scale = config.image_scale,
        max_image_pixels = config.max_image_pixels,
        unit = %config.display_units.label,
        "Loaded configuration"
    );

    // Initialize application state
    let state = Arc::new(AppState::new(config).with_prometheus(prometheus_handle));

    let app = build_router(Arc::clone(&state));

    // Parse listen address
    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Aeris API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Release the file on every exit path
    if let Err(e) = state.close_dataset().await {
        error!(error = %e, "Failed to close dataset");
    }

    served.context("Server failed")?;
    info!("Aeris API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
