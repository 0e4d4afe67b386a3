//! End-to-end claim workflow tests.
//!
//! These run under paused tokio time so the simulated scan/mint/redirect
//! delays complete without real waiting.

use std::collections::HashMap;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use geomint_core::Coordinate;
use geomint_integration_tests::{get_json, push_location, send_json, test_app};
use serde_json::json;

/// Fetch every NFT's coordinate from the explore view.
async fn nft_locations(app: &Router) -> HashMap<u64, Coordinate> {
    let (_, body) = get_json(app, "/explore").await;
    body["nfts"]
        .as_array()
        .expect("nfts")
        .iter()
        .map(|n| {
            let id = n["id"].as_u64().expect("id");
            let lat = n["location"]["lat"].as_f64().expect("lat");
            let lng = n["location"]["lng"].as_f64().expect("lng");
            (id, Coordinate::new(lat, lng))
        })
        .collect()
}

/// Poll claim progress until the given stage is reached.
async fn wait_for_stage(app: &Router, stage: &str) {
    for _ in 0..200 {
        let (_, progress) = get_json(app, "/map/claim").await;
        if progress["stage"] == stage {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("claim never reached stage {stage}");
}

/// Walk to an NFT and claim it, waiting for the redirect stage.
async fn claim_nft(app: &Router, id: u64, at: Coordinate) {
    push_location(app, at).await;

    let (status, progress) = send_json(app, "POST", "/map/scan", json!({ "nft": id })).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(progress["stage"], "scanning");

    wait_for_stage(app, "redirect").await;
}

#[tokio::test(start_paused = true)]
async fn full_claim_flow_reaches_redirect() {
    let app = test_app();
    let locations = nft_locations(&app).await;

    claim_nft(&app, 1, locations[&1]).await;

    let (_, progress) = get_json(&app, "/map/claim").await;
    assert_eq!(progress["stage"], "redirect");
    assert_eq!(progress["redirect"], "/profile");
    assert_eq!(progress["nft_id"], 1);

    let (_, profile) = get_json(&app, "/profile").await;
    assert_eq!(profile["stats"]["claimed_count"], 1);
    let collection = profile["collection"].as_array().expect("collection");
    assert_eq!(collection.len(), 1);
    assert_eq!(collection[0]["id"], 1);
    assert!(collection[0]["claimed_at"].as_str().is_some());
}

#[tokio::test(start_paused = true)]
async fn scan_requires_arrival() {
    let app = test_app();
    // NFT 1 is ~1 km from this spot; well outside the arrival threshold
    push_location(&app, Coordinate::new(28.52, 77.26)).await;

    let (status, body) = send_json(&app, "POST", "/map/scan", json!({ "nft": 1 })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(
        body["error"]
            .as_str()
            .expect("error")
            .contains("claiming range")
    );

    let (_, profile) = get_json(&app, "/profile").await;
    assert_eq!(profile["stats"]["claimed_count"], 0);
}

#[tokio::test(start_paused = true)]
async fn scan_requires_location_fix() {
    let app = test_app();
    let (status, _) = send_json(&app, "POST", "/map/scan", json!({ "nft": 1 })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test(start_paused = true)]
async fn scan_unknown_nft_is_not_found() {
    let app = test_app();
    push_location(&app, geomint_integration_tests::FALLBACK).await;

    let (status, _) = send_json(&app, "POST", "/map/scan", json!({ "nft": 99 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn duplicate_scan_claims_once() {
    let app = test_app();
    let locations = nft_locations(&app).await;
    push_location(&app, locations[&1]).await;

    let (status, _) = send_json(&app, "POST", "/map/scan", json!({ "nft": 1 })).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    // Second scan while the first is in flight is a no-op
    let (status, progress) = send_json(&app, "POST", "/map/scan", json!({ "nft": 1 })).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(progress["stage"], "scanning");

    wait_for_stage(&app, "redirect").await;

    let (_, profile) = get_json(&app, "/profile").await;
    assert_eq!(profile["stats"]["claimed_count"], 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_scan_claims_nothing() {
    let app = test_app();
    let locations = nft_locations(&app).await;
    push_location(&app, locations[&1]).await;

    send_json(&app, "POST", "/map/scan", json!({ "nft": 1 })).await;
    let (status, progress) = send_json(&app, "POST", "/map/claim/cancel", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["stage"], "idle");

    // Let any orphaned timer fire; nothing may be claimed
    tokio::time::sleep(Duration::from_secs(10)).await;

    let (_, profile) = get_json(&app, "/profile").await;
    assert_eq!(profile["stats"]["claimed_count"], 0);
    let (_, progress) = get_json(&app, "/map/claim").await;
    assert_eq!(progress["stage"], "idle");
}

#[tokio::test(start_paused = true)]
async fn shop_task_completes_with_matching_claim() {
    let app = test_app();
    let locations = nft_locations(&app).await;

    claim_nft(&app, 1, locations[&1]).await;

    let (_, nft) = get_json(&app, "/nft/1").await;
    let shop_name = nft["shop_name"].as_str().expect("shop_name");

    let (_, rewards) = get_json(&app, "/rewards").await;
    for task in rewards["tasks"].as_array().expect("tasks") {
        if task["shop_name"] == shop_name {
            assert_eq!(task["progress"], 100);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn collect_challenge_completes_exactly_at_fifth_claim() {
    let app = test_app();
    let locations = nft_locations(&app).await;

    for id in 1..=5u64 {
        claim_nft(&app, id, locations[&id]).await;

        let (_, rewards) = get_json(&app, "/rewards?kind=platform").await;
        let collect = &rewards["tasks"].as_array().expect("tasks")[0];
        assert_eq!(collect["title"], "Collect 5 NFTs");
        assert_eq!(
            collect["progress"].as_u64().expect("progress"),
            (id * 20).min(100)
        );
    }

    let (_, profile) = get_json(&app, "/profile").await;
    assert_eq!(profile["stats"]["claimed_count"], 5);
}

#[tokio::test(start_paused = true)]
async fn profile_sorts_collection_newest_first() {
    let app = test_app();
    let locations = nft_locations(&app).await;

    claim_nft(&app, 1, locations[&1]).await;
    claim_nft(&app, 2, locations[&2]).await;

    let (_, profile) = get_json(&app, "/profile").await;
    let collection = profile["collection"].as_array().expect("collection");
    assert_eq!(collection.len(), 2);
    assert_eq!(collection[0]["id"], 2);
    assert_eq!(collection[1]["id"], 1);
}
