//! Profile route handlers.

use std::collections::HashSet;

use axum::{Json, extract::State};
use geomint_core::ClaimedNft;
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

/// Collection statistics shown in the profile header.
#[derive(Debug, Serialize)]
pub struct CollectionStats {
    pub claimed_count: usize,
    /// Distinct shops the user has claimed from.
    pub shops_visited: usize,
}

/// Profile view model.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    /// Claimed collection, newest first.
    pub collection: Vec<ClaimedNft>,
    pub stats: CollectionStats,
}

/// Display the profile: claimed collection and stats.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<ProfileView> {
    let mut collection = state.catalogue().claimed().await;
    collection.sort_by(|a, b| b.claimed_at.cmp(&a.claimed_at));

    let shops_visited = collection
        .iter()
        .map(|c| c.nft.shop_name.as_str())
        .collect::<HashSet<_>>()
        .len();

    let stats = CollectionStats {
        claimed_count: collection.len(),
        shops_visited,
    };

    Json(ProfileView { collection, stats })
}
