//! In-memory catalogue store.
//!
//! Holds the seeded NFT, task, and shop records plus the user's claimed
//! collection. All mutations are funnelled through defined operations
//! ([`Catalogue::claim`], [`Catalogue::refresh`]); handlers only ever read.

mod seed;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use geomint_core::{ClaimedNft, Coordinate, Nft, NftId, RarityFilter, Shop, Task};
use tokio::sync::RwLock;
use tracing::info;

/// Simulated latency of a catalogue refresh.
const REFRESH_DELAY: Duration = Duration::from_millis(1500);

/// The in-memory catalogue.
///
/// Cheaply cloneable via `Arc`; all access goes through an async `RwLock`.
#[derive(Clone)]
pub struct Catalogue {
    inner: Arc<RwLock<CatalogueState>>,
}

struct CatalogueState {
    nfts: Vec<Nft>,
    tasks: Vec<Task>,
    shops: Vec<Shop>,
    claimed: Vec<ClaimedNft>,
    loading: bool,
}

impl Catalogue {
    /// Create a catalogue populated with the seed data.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            inner: Arc::new(RwLock::new(CatalogueState {
                nfts: seed::nfts(),
                tasks: seed::tasks(),
                shops: seed::shops(),
                claimed: Vec::new(),
                loading: false,
            })),
        }
    }

    /// All NFTs, unannotated.
    pub async fn nfts(&self) -> Vec<Nft> {
        self.inner.read().await.nfts.clone()
    }

    /// Look up a single NFT by id.
    pub async fn nft(&self, id: NftId) -> Option<Nft> {
        self.inner.read().await.nfts.iter().find(|n| n.id == id).cloned()
    }

    /// All reward tasks.
    pub async fn tasks(&self) -> Vec<Task> {
        self.inner.read().await.tasks.clone()
    }

    /// All shops.
    pub async fn shops(&self) -> Vec<Shop> {
        self.inner.read().await.shops.clone()
    }

    /// The claimed collection, in claim order.
    pub async fn claimed(&self) -> Vec<ClaimedNft> {
        self.inner.read().await.claimed.clone()
    }

    /// Whether a simulated refresh is in flight.
    pub async fn loading(&self) -> bool {
        self.inner.read().await.loading
    }

    /// All NFTs annotated with their distance from `user`.
    ///
    /// Pass-through (no distances) when there is no fix yet.
    pub async fn nfts_with_distance(&self, user: Option<Coordinate>) -> Vec<Nft> {
        let state = self.inner.read().await;
        match user {
            Some(user) => state
                .nfts
                .iter()
                .map(|nft| nft.with_distance_from(user))
                .collect(),
            None => state.nfts.clone(),
        }
    }

    /// Filter and sort the catalogue for the explore view.
    ///
    /// Combines an optional rarity predicate with an optional
    /// maximum-distance predicate, then sorts ascending by distance.
    /// An NFT with no computed distance counts as distance 0: it passes any
    /// maximum and sorts first.
    pub async fn filter(
        &self,
        user: Option<Coordinate>,
        rarity: RarityFilter,
        max_km: Option<f64>,
    ) -> Vec<Nft> {
        let mut nfts: Vec<Nft> = self
            .nfts_with_distance(user)
            .await
            .into_iter()
            .filter(|nft| rarity.matches(nft.rarity))
            .filter(|nft| max_km.is_none_or(|max| nft.distance_km.unwrap_or(0.0) <= max))
            .collect();

        nfts.sort_by(|a, b| {
            let da = a.distance_km.unwrap_or(0.0);
            let db = b.distance_km.unwrap_or(0.0);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

        nfts
    }

    /// Claim an NFT into the collection.
    ///
    /// The only mutation of the claimed collection. Appends exactly one
    /// entry stamped with the current time and applies the task rules:
    /// tasks sharing the NFT's shop name complete, and every collect
    /// challenge's progress is recomputed from the new collection size.
    ///
    /// Returns `None` when the id is unknown; nothing is mutated in that
    /// case.
    pub async fn claim(&self, id: NftId) -> Option<ClaimedNft> {
        let mut state = self.inner.write().await;

        let nft = state.nfts.iter().find(|n| n.id == id).cloned()?;
        let claimed = ClaimedNft::new(nft.clone(), Utc::now());
        state.claimed.push(claimed.clone());

        let claimed_count = state.claimed.len();
        for task in &mut state.tasks {
            if task.shop_name == nft.shop_name && task.progress < 100 {
                task.progress = 100;
            } else if task.is_collect_challenge() {
                task.progress = Task::collect_progress(claimed_count);
            }
        }

        info!(nft = %id, total = claimed_count, "NFT claimed");
        Some(claimed)
    }

    /// Simulated catalogue refresh.
    ///
    /// There is no backend to refresh from; this waits the simulated
    /// round-trip and reseeds the same records, leaving the claimed
    /// collection and task progress untouched.
    pub async fn refresh(&self) {
        {
            let mut state = self.inner.write().await;
            state.loading = true;
        }

        tokio::time::sleep(REFRESH_DELAY).await;

        let mut state = self.inner.write().await;
        state.nfts = seed::nfts();
        state.loading = false;
        info!("catalogue refreshed");
    }
}
