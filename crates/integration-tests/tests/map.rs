//! Map view tests.
//!
//! The test configuration points the directions client at an address
//! nothing listens on, so every route fetch fails - which is exactly what
//! exercises the fail-soft path: the map view must stay usable with an
//! absent route.

use axum::http::StatusCode;
use geomint_core::Coordinate;
use geomint_integration_tests::{get_json, push_location, test_app};

#[tokio::test]
async fn map_without_target_is_bare() {
    let app = test_app();
    let (status, body) = get_json(&app, "/map").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("nft").is_none());
    assert_eq!(body["near_destination"], false);
    assert_eq!(body["claim"]["stage"], "idle");
}

#[tokio::test]
async fn map_survives_directions_failure() {
    let app = test_app();
    push_location(&app, Coordinate::new(28.4996139, 77.2457196)).await;

    // The fetch against the unreachable endpoint fails; the view degrades
    // to no route instead of erroring.
    let (status, body) = get_json(&app, "/map?nft=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("route").is_none());
    assert_eq!(body["nft"]["id"], 1);
    assert!(body["nft"]["distance_km"].as_f64().is_some());
}

#[tokio::test]
async fn map_reports_arrival_at_target() {
    let app = test_app();
    // Stand exactly at NFT 1
    push_location(&app, Coordinate::new(28.4968497, 77.244192)).await;

    let (_, body) = get_json(&app, "/map?nft=1").await;
    assert_eq!(body["near_destination"], true);
    assert_eq!(body["estimated_walk_mins"], 0);
}

#[tokio::test]
async fn map_not_near_a_distant_target() {
    let app = test_app();
    push_location(&app, Coordinate::new(28.4996139, 77.2457196)).await;

    // NFT 4 (Hyderabad House) is ~0.009 degrees away
    let (_, body) = get_json(&app, "/map?nft=4").await;
    assert_eq!(body["near_destination"], false);
    assert!(body["estimated_walk_mins"].as_u64().expect("mins") > 0);
}

#[tokio::test]
async fn map_before_first_fix_has_no_route_or_arrival() {
    let app = test_app();
    let (_, body) = get_json(&app, "/map?nft=1").await;

    assert!(body.get("user").is_none());
    assert_eq!(body["near_destination"], false);
    assert!(body.get("route").is_none());
    // Distance needs a fix
    assert!(body["nft"].get("distance_km").is_none());
}

#[tokio::test]
async fn claim_status_defaults_to_idle() {
    let app = test_app();
    let (status, body) = get_json(&app, "/map/claim").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "idle");
}
