//! Router-level tests against synthetic NetCDF files.

use std::sync::Arc;

use aeris_api::{build_router, AppState, DatasetStatus, ServiceConfig};
use aeris_common::UnitConversion;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use renderer::SliceRecord;
use test_utils::{expected_plane, write_rank3_dataset, ConcentrationFixture, WrittenFixture};
use tower::ServiceExt;

// ============================================================================
// Helper functions
// ============================================================================

const BODY_LIMIT: usize = 16 * 1024 * 1024;

fn state_for(fixture: &WrittenFixture) -> Arc<AppState> {
    let config = ServiceConfig::new(fixture.path()).with_image_scale(2);
    Arc::new(AppState::new(config))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    (status, content_type, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

// ============================================================================
// Metadata
// ============================================================================

#[tokio::test]
async fn test_home_lists_dimensions_and_variables() {
    let fixture = ConcentrationFixture::new().write();
    let app = build_router(state_for(&fixture));

    let (status, content_type, body) = get(app, "/").await;
    let text = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(text.starts_with("<pre>NetCDF file loaded successfully."));
    assert!(text.contains("time: 3\n"));
    assert!(text.contains("x: 5\n"));
    assert!(text.contains("concentration - Shape: [3, 2, 4, 5]"));
    assert!(text.ends_with("</pre>"));
}

#[tokio::test]
async fn test_get_info_wraps_cdl() {
    let fixture = ConcentrationFixture::new().write();
    let app = build_router(state_for(&fixture));

    let (status, _, body) = get(app, "/get-info").await;
    let text = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(text.starts_with("<pre>netcdf concentration.timeseries {"));
    assert!(text.contains("double concentration(time, z, y, x) ;"));
}

// ============================================================================
// /get-data
// ============================================================================

#[tokio::test]
async fn test_get_data_json() {
    let fixture = ConcentrationFixture::new().write();
    let app = build_router(state_for(&fixture));

    let (status, content_type, body) = get(app, "/get-data?timeIndex=2&zIndex=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let record: SliceRecord = serde_json::from_slice(&body).unwrap();
    assert_eq!(record.time_index, 2);
    assert_eq!(record.z_index, 1);
    assert_eq!(record.grid, expected_plane(2, 1, 4, 5));

    let stats = record.statistics.unwrap();
    assert_eq!(stats.min, Some(2100.0));
    assert_eq!(stats.max, Some(2134.0));
}

#[tokio::test]
async fn test_get_data_text_table() {
    let fixture = ConcentrationFixture::new()
        .with_shape([1, 1, 1, 2])
        .with_values(vec![2.5e-9, 1.0e-8])
        .write();
    let app = build_router(state_for(&fixture));

    let (status, _, body) = get(app, "/get-data?timeIndex=0&zIndex=0&format=text").await;
    let text = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("Concentration at time=0, z=0, y=0, x=0: 2.500000 ug/m3"));
    assert!(text.contains("Concentration at time=0, z=0, y=0, x=1: 10.000000 ug/m3"));
}

#[tokio::test]
async fn test_get_data_text_uses_configured_units() {
    let fixture = ConcentrationFixture::new().with_shape([1, 1, 1, 1]).write();
    let config = ServiceConfig::new(fixture.path())
        .with_display_units(UnitConversion::identity("kg m-3"));
    let app = build_router(Arc::new(AppState::new(config)));

    let (_, _, body) = get(app, "/get-data?timeIndex=0&zIndex=0&format=text").await;
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("x=0: 0.000000 kg m-3"), "{text}");
}

#[tokio::test]
async fn test_get_data_negative_index_is_400() {
    let fixture = ConcentrationFixture::new().write();
    let app = build_router(state_for(&fixture));

    let (status, body) = get_json(app, "/get-data?timeIndex=-1&zIndex=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "out_of_range");
}

#[tokio::test]
async fn test_get_data_past_end_is_400() {
    let fixture = ConcentrationFixture::new().write();
    let app = build_router(state_for(&fixture));

    let (status, body) = get_json(app, "/get-data?timeIndex=0&zIndex=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "out_of_range");
}

#[tokio::test]
async fn test_get_data_missing_param_is_400() {
    let fixture = ConcentrationFixture::new().write();
    let app = build_router(state_for(&fixture));

    let (status, body) = get_json(app, "/get-data?timeIndex=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn test_get_data_missing_variable_is_404() {
    let fixture = ConcentrationFixture::new()
        .with_variable_name("pm25")
        .write();
    let app = build_router(state_for(&fixture));

    let (status, body) = get_json(app, "/get-data?timeIndex=0&zIndex=0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
    assert!(body["error"].as_str().unwrap().contains("'concentration'"));
}

#[tokio::test]
async fn test_get_data_rank3_is_500() {
    let fixture = write_rank3_dataset();
    let app = build_router(state_for(&fixture));

    let (status, body) = get_json(app, "/get-data?timeIndex=0&zIndex=0").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "invalid_shape");
}

#[tokio::test]
async fn test_get_data_unavailable_dataset_is_503() {
    let dir = test_utils::temp_test_dir();
    let config = ServiceConfig::new(dir.path().join("missing.nc"));
    let state = Arc::new(AppState::new(config));
    assert_eq!(state.dataset_status().await, DatasetStatus::Unavailable);

    let (status, body) = get_json(build_router(state), "/get-data?timeIndex=0&zIndex=0").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "dataset_unavailable");
    assert!(body["error"].as_str().unwrap().contains("missing.nc"));
}

// ============================================================================
// /get-image
// ============================================================================

#[tokio::test]
async fn test_get_image_png() {
    let fixture = ConcentrationFixture::new().write();
    let app = build_router(state_for(&fixture));

    let (status, content_type, body) = get(app, "/get-image?timeIndex=1&zIndex=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));

    let img = image::load_from_memory(&body).unwrap().to_rgb8();
    // 4 x 5 grid at the configured scale of 2
    assert_eq!(img.dimensions(), (10, 8));
    // First cell is the minimum, last cell the maximum
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(img.get_pixel(9, 7).0, [255, 255, 255]);
}

#[tokio::test]
async fn test_get_image_scale_override() {
    let fixture = ConcentrationFixture::new().write();
    let app = build_router(state_for(&fixture));

    let (status, _, body) = get(app, "/get-image?timeIndex=0&zIndex=0&scale=1").await;
    assert_eq!(status, StatusCode::OK);

    let img = image::load_from_memory(&body).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (5, 4));
}

#[tokio::test]
async fn test_get_image_errors_are_empty_204() {
    let fixture = ConcentrationFixture::new().write();
    let state = state_for(&fixture);

    for uri in [
        "/get-image?timeIndex=7&zIndex=0",
        "/get-image?timeIndex=-1&zIndex=0",
        "/get-image?timeIndex=0&zIndex=0&scale=0",
        "/get-image?timeIndex=0&zIndex=0&scale=1000000",
        "/get-image?zIndex=0",
    ] {
        let (status, _, body) = get(build_router(Arc::clone(&state)), uri).await;
        assert_eq!(status, StatusCode::NO_CONTENT, "{uri}");
        assert!(body.is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn test_get_image_above_pixel_limit_is_204() {
    let fixture = ConcentrationFixture::new().write();
    // 4 x 5 grid: scale 2 is 80 pixels, scale 3 is 180
    let config = ServiceConfig::new(fixture.path()).with_max_image_pixels(100);
    let state = Arc::new(AppState::new(config));

    let (status, _, body) = get(
        build_router(Arc::clone(&state)),
        "/get-image?timeIndex=0&zIndex=0&scale=3",
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _, body) = get(build_router(state), "/get-image?timeIndex=0&zIndex=0&scale=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.is_empty());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_health_reports_dataset_state() {
    let fixture = ConcentrationFixture::new().write();
    let state = state_for(&fixture);

    let (status, body) = get_json(build_router(Arc::clone(&state)), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "aeris-api");
    assert_eq!(body["dataset"], "open");

    state.close_dataset().await.unwrap();

    let (status, body) = get_json(build_router(state), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dataset"], "closed");
}

#[tokio::test]
async fn test_requests_after_close_are_503() {
    let fixture = ConcentrationFixture::new().write();
    let state = state_for(&fixture);
    state.close_dataset().await.unwrap();
    // Second close is a no-op
    state.close_dataset().await.unwrap();

    let (status, body) = get_json(build_router(state), "/get-data?timeIndex=0&zIndex=0").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "dataset_closed");
}

#[tokio::test]
async fn test_concurrent_requests_share_handle() {
    let fixture = ConcentrationFixture::new().write();
    let state = state_for(&fixture);

    let mut tasks = Vec::new();
    for t in 0..3i64 {
        for z in 0..2i64 {
            let app = build_router(Arc::clone(&state));
            tasks.push(tokio::spawn(async move {
                let uri = format!("/get-data?timeIndex={t}&zIndex={z}");
                let (status, _, body) = get(app, &uri).await;
                (t, z, status, body)
            }));
        }
    }

    for task in tasks {
        let (t, z, status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        let record: SliceRecord = serde_json::from_slice(&body).unwrap();
        assert_eq!(record.grid, expected_plane(t as usize, z as usize, 4, 5));
    }
}
