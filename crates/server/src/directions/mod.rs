//! Mapbox Directions API client.
//!
//! # Architecture
//!
//! - Single outbound GET per route request against the walking profile
//! - In-memory caching via `moka` (5 minute TTL) keyed by origin/destination
//! - A second, longer-lived cache keyed by destination only backs the
//!   fail-soft path: when a fetch fails, callers can fall back to the last
//!   route that was successfully fetched for that destination
//!
//! Callers are expected to be fail-soft: log the error and degrade to a
//! stale or absent route, never surface a directions failure to the client.
//!
//! # Example
//!
//! ```rust,ignore
//! use geomint_server::directions::DirectionsClient;
//!
//! let client = DirectionsClient::new(&config.mapbox);
//! match client.walking_route(user, nft.location).await {
//!     Ok(route) => render(route),
//!     Err(e) => {
//!         tracing::error!("route fetch failed: {e}");
//!         render_stale(client.last_known_route(nft.location).await);
//!     }
//! }
//! ```

mod types;

pub use types::{Route, RouteStep};

use std::sync::Arc;
use std::time::Duration;

use geomint_core::Coordinate;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::MapboxConfig;
use types::DirectionsResponse;

/// Errors that can occur when fetching a route.
#[derive(Debug, Error)]
pub enum DirectionsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response body.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered but returned no route.
    #[error("no route between the given coordinates")]
    NoRoute,
}

/// Client for the Mapbox Directions API (walking profile).
#[derive(Clone)]
pub struct DirectionsClient {
    inner: Arc<DirectionsClientInner>,
}

struct DirectionsClientInner {
    client: reqwest::Client,
    api_base: String,
    access_token: SecretString,
    /// Fresh routes keyed by origin and destination.
    routes: Cache<String, Route>,
    /// Last successful route per destination, for the fail-soft path.
    last_known: Cache<String, Route>,
}

impl DirectionsClient {
    /// Create a new Directions API client.
    #[must_use]
    pub fn new(config: &MapboxConfig) -> Self {
        let routes = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let last_known = Cache::builder()
            .max_capacity(100)
            .time_to_live(Duration::from_secs(3600))
            .build();

        Self {
            inner: Arc::new(DirectionsClientInner {
                client: reqwest::Client::new(),
                api_base: config.api_base.trim_end_matches('/').to_string(),
                access_token: config.access_token.clone(),
                routes,
                last_known,
            }),
        }
    }

    /// Fetch a walking route from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a
    /// non-success status, or the response contains no route.
    #[instrument(skip(self))]
    pub async fn walking_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Route, DirectionsError> {
        let cache_key = pair_key(origin, destination);

        if let Some(route) = self.inner.routes.get(&cache_key).await {
            debug!("cache hit for route");
            return Ok(route);
        }

        // Mapbox takes coordinates as lng,lat pairs.
        let url = format!(
            "{}/directions/v5/mapbox/walking/{},{};{},{}",
            self.inner.api_base, origin.lng, origin.lat, destination.lng, destination.lat
        );

        let response = self
            .inner
            .client
            .get(&url)
            .query(&[
                ("steps", "true"),
                ("geometries", "geojson"),
                ("access_token", self.inner.access_token.expose_secret()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DirectionsError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        let parsed: DirectionsResponse = serde_json::from_str(&body)?;

        let route: Route = parsed
            .routes
            .into_iter()
            .next()
            .ok_or(DirectionsError::NoRoute)?
            .into();

        self.inner.routes.insert(cache_key, route.clone()).await;
        self.inner
            .last_known
            .insert(destination_key(destination), route.clone())
            .await;

        Ok(route)
    }

    /// Last successfully fetched route for a destination, if any.
    ///
    /// Backs the fail-soft path: prior route state survives a failed fetch.
    pub async fn last_known_route(&self, destination: Coordinate) -> Option<Route> {
        self.inner.last_known.get(&destination_key(destination)).await
    }
}

fn pair_key(origin: Coordinate, destination: Coordinate) -> String {
    format!(
        "{:.6},{:.6};{:.6},{:.6}",
        origin.lng, origin.lat, destination.lng, destination.lat
    )
}

fn destination_key(destination: Coordinate) -> String {
    format!("{:.6},{:.6}", destination.lng, destination.lat)
}
