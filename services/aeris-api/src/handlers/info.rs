//! CDL header dump.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::{pre_block, record_request};
use crate::state::AppState;

/// GET /get-info - `ncdump -h` style description of the file
pub async fn info_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match state.with_dataset(|dataset| Ok(dataset.detail_info())).await {
        Ok(cdl) => {
            record_request("get-info", StatusCode::OK);
            Html(pre_block(&cdl)).into_response()
        }
        Err(e) => {
            record_request("get-info", e.http_status());
            e.into_response()
        }
    }
}
