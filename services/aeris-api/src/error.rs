//! HTTP-facing error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use netcdf_parser::NetCdfError;
use renderer::RenderError;
use serde::Serialize;
use thiserror::Error;

/// Everything a request can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dataset(#[from] NetCdfError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// The dataset could not be opened at startup.
    #[error("Dataset unavailable: {0}")]
    DatasetUnavailable(String),

    /// The dataset handle was released during shutdown.
    #[error("Dataset has been closed")]
    DatasetClosed,

    /// Missing or malformed query parameters.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl ApiError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            ApiError::Dataset(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Dataset(NetCdfError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Dataset(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Render(err) => match err {
                RenderError::InvalidDimensions(_) => StatusCode::BAD_REQUEST,
                RenderError::InvalidGrid(_)
                | RenderError::Encode(_)
                | RenderError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::DatasetUnavailable(_) | ApiError::DatasetClosed => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error category.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Dataset(err) => match err {
                NetCdfError::NotFound(_) => "not_found",
                NetCdfError::OutOfRange { .. } => "out_of_range",
                NetCdfError::Io(_) => "io",
                NetCdfError::Decode(_) => "decode",
                NetCdfError::InvalidShape { .. } => "invalid_shape",
            },
            ApiError::Render(err) => match err {
                RenderError::InvalidDimensions(_) => "invalid_dimensions",
                RenderError::InvalidGrid(_) => "invalid_grid",
                RenderError::Encode(_) => "io",
                RenderError::Serialize(_) => "serialization",
            },
            ApiError::DatasetUnavailable(_) => "dataset_unavailable",
            ApiError::DatasetClosed => "dataset_closed",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}
