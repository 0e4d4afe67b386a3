//! Integration tests for GeoMint.
//!
//! Each test builds the real application router over a fresh [`AppState`]
//! and drives it with `tower::ServiceExt::oneshot` - no listening socket,
//! no external services. The directions client is pointed at an address
//! nothing listens on, so route fetches fail fast and the fail-soft paths
//! are what get exercised.
//!
//! Timer-driven flows (the claim workflow, the simulated refresh) run under
//! `#[tokio::test(start_paused = true)]` so their delays complete without
//! real waiting.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use geomint_core::Coordinate;
use geomint_server::config::{GeomintConfig, MapboxConfig};
use geomint_server::routes;
use geomint_server::state::AppState;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

/// Fallback coordinate used by the test configuration (central Delhi).
pub const FALLBACK: Coordinate = Coordinate::new(28.4996139, 77.2457196);

/// Configuration for tests: unroutable directions endpoint, no Sentry.
#[must_use]
pub fn test_config() -> GeomintConfig {
    GeomintConfig {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        mapbox: MapboxConfig {
            // Nothing listens here; route fetches fail fast.
            api_base: "http://127.0.0.1:9".to_string(),
            access_token: SecretString::from("integration-test-token"),
        },
        fallback_location: FALLBACK,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Build the application router over a fresh state.
#[must_use]
pub fn test_app() -> Router {
    routes::app(AppState::new(test_config()))
}

/// Issue a GET request and return the response status and JSON body.
///
/// # Panics
///
/// Panics if the request itself fails.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        // Rejections (e.g. malformed query strings) come back as plain text
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

/// Issue a request with a JSON body and return the response status and body.
///
/// # Panics
///
/// Panics if the request itself fails.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        // Rejections (e.g. malformed query strings) come back as plain text
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

/// Push a location sample for the given coordinate.
///
/// # Panics
///
/// Panics if the tracker rejects the sample.
pub async fn push_location(app: &Router, coordinate: Coordinate) {
    let (status, _) = send_json(
        app,
        "POST",
        "/location",
        serde_json::json!({ "latitude": coordinate.lat, "longitude": coordinate.lng }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
