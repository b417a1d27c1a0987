//! Numeric slice extraction.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use metrics::histogram;
use renderer::SliceTransform;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{pre_block, record_request};
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for `/get-data`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataParams {
    pub time_index: i64,
    pub z_index: i64,
    #[serde(default)]
    pub format: DataFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    #[default]
    Json,
    Text,
}

/// Read the `(time_index, z_index)` plane and compute its statistics.
///
/// Both steps run on the blocking pool while the dataset lock is held.
pub async fn extract_slice(
    state: &AppState,
    time_index: i64,
    z_index: i64,
) -> Result<SliceTransform, ApiError> {
    let start = Instant::now();
    let slice = state
        .with_dataset(move |dataset| {
            let plane = dataset.extract_plane(time_index, z_index)?;
            Ok(SliceTransform::new(plane))
        })
        .await?;

    let elapsed = start.elapsed();
    histogram!("aeris_slice_extract_seconds").record(elapsed.as_secs_f64());
    debug!(
        time_index,
        z_index,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Extracted slice"
    );
    Ok(slice)
}

/// GET /get-data - Slice values as JSON or a text table
pub async fn data_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<DataParams>, QueryRejection>,
) -> Response {
    match render_data(&state, params).await {
        Ok(response) => {
            record_request("get-data", StatusCode::OK);
            response
        }
        Err(e) => {
            let status = e.http_status();
            if status.is_server_error() {
                warn!(error = %e, kind = e.kind(), "get-data failed");
            }
            record_request("get-data", status);
            e.into_response()
        }
    }
}

async fn render_data(
    state: &AppState,
    params: Result<Query<DataParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let slice = extract_slice(state, params.time_index, params.z_index).await?;

    match params.format {
        DataFormat::Json => {
            let json = slice.to_json()?;
            Ok(([(header::CONTENT_TYPE, "application/json")], json).into_response())
        }
        DataFormat::Text => {
            let table = slice.to_table(&state.config.display_units);
            Ok(Html(pre_block(&table)).into_response())
        }
    }
}
