//! NFT domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::{Coordinate, haversine_km};
use crate::types::id::NftId;
use crate::types::rarity::Rarity;

/// An NFT tied to a physical shop location.
///
/// Immutable once seeded, except for [`Nft::distance_km`], which is derived
/// from the user's current position and recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nft {
    pub id: NftId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub shop_name: String,
    pub rarity: Rarity,
    pub location: Coordinate,
    /// Kilometers from the user's last fix, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl Nft {
    /// Copy of this NFT annotated with its distance from `user`.
    #[must_use]
    pub fn with_distance_from(&self, user: Coordinate) -> Self {
        let mut nft = self.clone();
        nft.distance_km = Some(haversine_km(user, self.location));
        nft
    }
}

/// An NFT in the user's collection.
///
/// Created only by the claim workflow; the collection is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimedNft {
    #[serde(flatten)]
    pub nft: Nft,
    pub claimed_at: DateTime<Utc>,
}

impl ClaimedNft {
    /// Stamp an NFT with a claim time.
    #[must_use]
    pub fn new(nft: Nft, claimed_at: DateTime<Utc>) -> Self {
        Self { nft, claimed_at }
    }
}
