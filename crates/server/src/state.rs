//! Application state shared across handlers.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::catalogue::Catalogue;
use crate::claim::{ClaimEngine, ClaimTiming};
use crate::config::GeomintConfig;
use crate::directions::DirectionsClient;
use crate::location::{LocationTracker, WatchGuard, WatchOptions};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalogue, location tracker, directions client, and claim engine. Every
/// mutation of application state goes through one of these services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GeomintConfig,
    catalogue: Catalogue,
    tracker: LocationTracker,
    directions: DirectionsClient,
    claims: ClaimEngine,
    /// Guard of the HTTP-managed watch session; dropping it stops the watch.
    watch_slot: Mutex<Option<WatchGuard>>,
}

impl AppState {
    /// Create a new application state with the seeded catalogue.
    #[must_use]
    pub fn new(config: GeomintConfig) -> Self {
        let catalogue = Catalogue::seeded();
        let tracker = LocationTracker::new(config.fallback_location, WatchOptions::default());
        let directions = DirectionsClient::new(&config.mapbox);
        let claims = ClaimEngine::new(catalogue.clone(), tracker.clone(), ClaimTiming::default());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalogue,
                tracker,
                directions,
                claims,
                watch_slot: Mutex::new(None),
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &GeomintConfig {
        &self.inner.config
    }

    /// Get a reference to the catalogue store.
    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.inner.catalogue
    }

    /// Get a reference to the location tracker.
    #[must_use]
    pub fn tracker(&self) -> &LocationTracker {
        &self.inner.tracker
    }

    /// Get a reference to the Directions API client.
    #[must_use]
    pub fn directions(&self) -> &DirectionsClient {
        &self.inner.directions
    }

    /// Get a reference to the claim engine.
    #[must_use]
    pub fn claims(&self) -> &ClaimEngine {
        &self.inner.claims
    }

    /// Replace the HTTP-managed watch session guard.
    ///
    /// The previous guard (if any) is dropped, which releases its session
    /// unless a newer one already superseded it.
    pub fn store_watch_guard(&self, guard: WatchGuard) {
        let mut slot = lock(&self.inner.watch_slot);
        *slot = Some(guard);
    }

    /// Drop the HTTP-managed watch session guard, releasing the session.
    pub fn clear_watch_guard(&self) {
        lock(&self.inner.watch_slot).take();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
