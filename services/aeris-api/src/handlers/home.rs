//! Landing page: dimensions and variables of the loaded file.

use std::fmt::Write;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::{pre_block, record_request};
use crate::state::AppState;

/// GET / - Summary of the dataset
pub async fn home_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let result = state
        .with_dataset(|dataset| Ok((dataset.dimensions(), dataset.variables())))
        .await;

    match result {
        Ok((dimensions, variables)) => {
            let mut text = String::from("NetCDF file loaded successfully.\n\nDimensions:\n");
            for dim in &dimensions {
                let _ = writeln!(text, "{}: {}", dim.name, dim.len);
            }
            text.push_str("\nVariables:\n");
            for var in &variables {
                let _ = writeln!(text, "{} - Shape: {:?}", var.name, var.shape);
            }

            record_request("home", StatusCode::OK);
            Html(pre_block(&text)).into_response()
        }
        Err(e) => {
            record_request("home", e.http_status());
            e.into_response()
        }
    }
}
