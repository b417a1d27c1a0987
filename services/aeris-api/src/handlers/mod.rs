//! HTTP request handlers for the Aeris API.

pub mod data;
pub mod health;
pub mod home;
pub mod image;
pub mod info;

use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Extension, Router};
use metrics::counter;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the full router with middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Metadata
        .route("/", get(home::home_handler))
        .route("/get-info", get(info::info_handler))
        // Slices
        .route("/get-data", get(data::data_handler))
        .route("/get-image", get(image::image_handler))
        // Health and metrics
        .route("/health", get(health::health_handler))
        .route("/metrics", get(health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

/// Count one finished request.
pub(crate) fn record_request(endpoint: &'static str, status: StatusCode) {
    counter!(
        "aeris_requests_total",
        "endpoint" => endpoint,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
}

/// Wrap text in a `<pre>` block, escaping markup.
pub(crate) fn pre_block(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 11);
    out.push_str("<pre>");
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    out.push_str("</pre>");
    out
}
