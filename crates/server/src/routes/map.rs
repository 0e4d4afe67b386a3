//! Map and claim route handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use geomint_core::{Coordinate, Nft, NftId, near_destination};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use crate::claim::ClaimProgress;
use crate::directions::Route;
use crate::error::Result;
use crate::state::AppState;

/// Minutes of walking per kilometer, for the estimated arrival time.
const WALK_MINS_PER_KM: f64 = 12.0;

/// Map view query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct MapQuery {
    /// Target NFT to navigate to.
    pub nft: Option<NftId>,
}

/// Map view model.
#[derive(Debug, Serialize)]
pub struct MapView {
    /// User's current fix, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Coordinate>,
    /// Inline tracking status, e.g. after a provider failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_error: Option<String>,
    /// Target NFT annotated with its distance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft: Option<Nft>,
    /// True when the user is within claiming range of the target.
    pub near_destination: bool,
    /// Walking route to the target; absent when no fetch has succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
    /// Rough walking time to the target, in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_walk_mins: Option<u32>,
    /// Current claim workflow progress.
    pub claim: ClaimProgress,
}

/// Scan request body.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub nft: NftId,
}

/// Display the map view for an optional target NFT.
///
/// The route fetch is fail-soft: a directions failure is logged and the
/// view falls back to the last known route for the target (or none), never
/// an error response.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Query(query): Query<MapQuery>) -> Json<MapView> {
    let location = state.tracker().current();
    let user = location.coordinate;

    let nft = match query.nft {
        Some(id) => state.catalogue().nft(id).await,
        None => None,
    };
    let nft = match (nft, user) {
        (Some(nft), Some(user)) => Some(nft.with_distance_from(user)),
        (nft, _) => nft,
    };

    let near = match (user, &nft) {
        (Some(user), Some(nft)) => near_destination(user, nft.location),
        _ => false,
    };

    let route = match (user, &nft) {
        (Some(user), Some(nft)) => fetch_route_fail_soft(&state, user, nft.location).await,
        _ => None,
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let estimated_walk_mins = nft
        .as_ref()
        .and_then(|nft| nft.distance_km)
        .map(|km| (km * WALK_MINS_PER_KM).round().clamp(0.0, f64::from(u32::MAX)) as u32);

    Json(MapView {
        user,
        location_error: location.error,
        nft,
        near_destination: near,
        route,
        estimated_walk_mins,
        claim: state.claims().progress(),
    })
}

/// Fetch a walking route, degrading to the last known route on failure.
async fn fetch_route_fail_soft(
    state: &AppState,
    user: Coordinate,
    destination: Coordinate,
) -> Option<Route> {
    match state.directions().walking_route(user, destination).await {
        Ok(route) => Some(route),
        Err(e) => {
            error!("Failed to fetch route: {e}");
            state.directions().last_known_route(destination).await
        }
    }
}

/// Start the claim workflow for an NFT.
///
/// Guarded by the claim engine: the user must be within claiming range and
/// only one run can be in flight (a duplicate request reports the current
/// progress instead of starting a second run).
#[instrument(skip(state))]
pub async fn scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Response> {
    let progress = state.claims().start(request.nft).await?;
    Ok((StatusCode::ACCEPTED, Json(progress)).into_response())
}

/// Report the current claim workflow progress.
pub async fn claim_status(State(state): State<AppState>) -> Json<ClaimProgress> {
    Json(state.claims().progress())
}

/// Cancel the in-flight claim run, if any.
#[instrument(skip(state))]
pub async fn cancel_claim(State(state): State<AppState>) -> Json<ClaimProgress> {
    state.claims().cancel();
    Json(state.claims().progress())
}
