//! Grayscale slice images.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use metrics::histogram;
use serde::Deserialize;
use tracing::{debug, error};

use super::data::extract_slice;
use super::record_request;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for `/get-image`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageParams {
    pub time_index: i64,
    pub z_index: i64,
    /// Pixels per cell edge; the configured default when absent.
    pub scale: Option<usize>,
}

/// GET /get-image - PNG of one slice
///
/// Any failure, including a raster above the configured pixel limit, yields
/// `204 No Content` with an empty body. The cause is only logged.
pub async fn image_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<ImageParams>, QueryRejection>,
) -> Response {
    match render_image(&state, params).await {
        Ok(png) => {
            histogram!("aeris_png_bytes").record(png.len() as f64);
            record_request("get-image", StatusCode::OK);
            ([(header::CONTENT_TYPE, "image/png")], png).into_response()
        }
        Err(e) => {
            error!(error = %e, kind = e.kind(), "get-image failed");
            record_request("get-image", StatusCode::NO_CONTENT);
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

async fn render_image(
    state: &AppState,
    params: Result<Query<ImageParams>, QueryRejection>,
) -> Result<Bytes, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let scale = params.scale.unwrap_or(state.config.image_scale);
    let max_pixels = state.config.max_image_pixels;

    let slice = extract_slice(state, params.time_index, params.z_index).await?;

    let png = tokio::task::spawn_blocking(move || slice.to_png_within(scale, max_pixels))
        .await
        .map_err(|e| ApiError::Internal(format!("render task failed: {}", e)))??;

    debug!(
        time_index = params.time_index,
        z_index = params.z_index,
        scale,
        bytes = png.len(),
        "Rendered image"
    );
    Ok(Bytes::from(png))
}
