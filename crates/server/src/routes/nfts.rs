//! NFT detail and shop route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use geomint_core::{Nft, NftId, Shop};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::state::AppState;

/// NFT detail view model.
#[derive(Debug, Serialize)]
pub struct NftDetailView {
    #[serde(flatten)]
    pub nft: Nft,
    pub reward: RewardBlurb,
    /// How to claim this NFT.
    pub claim_hint: String,
}

/// Reward shown on the detail page.
#[derive(Debug, Serialize)]
pub struct RewardBlurb {
    pub title: String,
    pub description: String,
}

/// Display the NFT detail view.
///
/// An unknown or malformed id redirects back to the explore view rather
/// than rendering an error page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<NftId>() else {
        debug!(%id, "malformed NFT id, redirecting to explore");
        return Redirect::to("/explore").into_response();
    };

    let Some(nft) = state.catalogue().nft(id).await else {
        debug!(%id, "unknown NFT id, redirecting to explore");
        return Redirect::to("/explore").into_response();
    };

    let nft = match state.tracker().current().coordinate {
        Some(user) => nft.with_distance_from(user),
        None => nft,
    };

    let shop_name = nft.shop_name.clone();
    Json(NftDetailView {
        nft,
        reward: RewardBlurb {
            title: "Special Discount".to_string(),
            description: format!("10% off your next purchase at {shop_name}"),
        },
        claim_hint: format!("Visit {shop_name} and scan the QR code to claim this NFT"),
    })
    .into_response()
}

/// List the participating shops.
#[instrument(skip(state))]
pub async fn shops(State(state): State<AppState>) -> Json<Vec<Shop>> {
    Json(state.catalogue().shops().await)
}
