//! Application state for the Aeris API.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use netcdf_parser::{ConcentrationDataset, NetCdfResult};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::error::ApiError;

/// Lifecycle of the single shared dataset handle.
#[derive(Debug)]
pub enum DatasetSlot {
    Open(ConcentrationDataset),
    /// Opening failed at startup; holds the error message.
    Unavailable(String),
    Closed,
}

/// Dataset state as reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetStatus {
    Open,
    Unavailable,
    Closed,
}

/// Shared application state.
pub struct AppState {
    /// The NetCDF handle. Every read holds this lock.
    dataset: Arc<Mutex<DatasetSlot>>,

    pub config: ServiceConfig,

    /// Renders `/metrics`; absent when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,

    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Open the configured dataset.
    ///
    /// An open failure is logged and kept in the slot so the service can
    /// still start and report it.
    pub fn new(config: ServiceConfig) -> Self {
        let slot = match ConcentrationDataset::open(&config.dataset_path) {
            Ok(dataset) => DatasetSlot::Open(dataset),
            Err(e) => {
                warn!(
                    path = %config.dataset_path.display(),
                    error = %e,
                    "Failed to open dataset; data endpoints will report it"
                );
                DatasetSlot::Unavailable(e.to_string())
            }
        };
        Self::with_slot(config, slot)
    }

    pub fn with_slot(config: ServiceConfig, slot: DatasetSlot) -> Self {
        Self {
            dataset: Arc::new(Mutex::new(slot)),
            config,
            prometheus: None,
            started_at: Utc::now(),
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Run `f` against the open dataset on the blocking pool.
    pub async fn with_dataset<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&ConcentrationDataset) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let slot = Arc::clone(&self.dataset);
        tokio::task::spawn_blocking(move || {
            let guard = slot.blocking_lock();
            match &*guard {
                DatasetSlot::Open(dataset) => f(dataset),
                DatasetSlot::Unavailable(reason) => {
                    Err(ApiError::DatasetUnavailable(reason.clone()))
                }
                DatasetSlot::Closed => Err(ApiError::DatasetClosed),
            }
        })
        .await
        .map_err(|e| ApiError::Internal(format!("dataset task failed: {}", e)))?
    }

    pub async fn dataset_status(&self) -> DatasetStatus {
        match &*self.dataset.lock().await {
            DatasetSlot::Open(_) => DatasetStatus::Open,
            DatasetSlot::Unavailable(_) => DatasetStatus::Unavailable,
            DatasetSlot::Closed => DatasetStatus::Closed,
        }
    }

    /// Release the handle. Later requests get `DatasetClosed`.
    ///
    /// Closing twice, or closing a dataset that never opened, is a no-op.
    pub async fn close_dataset(&self) -> NetCdfResult<()> {
        let mut guard = self.dataset.lock().await;
        match std::mem::replace(&mut *guard, DatasetSlot::Closed) {
            DatasetSlot::Open(dataset) => {
                let path = dataset.path().display().to_string();
                dataset.close()?;
                info!(path = %path, "Dataset closed");
                Ok(())
            }
            DatasetSlot::Unavailable(_) | DatasetSlot::Closed => Ok(()),
        }
    }
}
