//! Explore route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use geomint_core::{Nft, RarityFilter};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::state::AppState;

/// Explore listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ExploreQuery {
    /// Rarity predicate; `all` (the default) keeps every tier.
    pub category: Option<RarityFilter>,
    /// Maximum distance in kilometers.
    pub max_km: Option<f64>,
}

/// Explore listing view model.
#[derive(Debug, Serialize)]
pub struct ExploreView {
    pub nfts: Vec<Nft>,
    /// True while there is no location fix yet.
    pub locating: bool,
    /// True while a simulated refresh is in flight.
    pub loading: bool,
    /// Inline tracking status, e.g. after a provider failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_error: Option<String>,
}

/// Display the filtered, distance-sorted NFT listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ExploreQuery>,
) -> Json<ExploreView> {
    let location = state.tracker().current();
    let nfts = state
        .catalogue()
        .filter(
            location.coordinate,
            query.category.unwrap_or_default(),
            query.max_km,
        )
        .await;

    Json(ExploreView {
        nfts,
        locating: location.coordinate.is_none(),
        loading: state.catalogue().loading().await,
        location_error: location.error,
    })
}

/// Run a simulated catalogue refresh and return the refreshed listing.
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Json<ExploreView> {
    state.catalogue().refresh().await;

    let location = state.tracker().current();
    let nfts = state
        .catalogue()
        .filter(location.coordinate, RarityFilter::All, None)
        .await;

    Json(ExploreView {
        nfts,
        locating: location.coordinate.is_none(),
        loading: false,
        location_error: location.error,
    })
}
