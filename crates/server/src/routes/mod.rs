//! HTTP route handlers for the server.
//!
//! All handlers return JSON view models; rendering is the client's concern.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Explore
//! GET  /explore                - Filtered, distance-sorted NFT listing
//! POST /explore/refresh        - Simulated catalogue refresh
//! GET  /nft/{id}               - NFT detail (unknown id redirects to /explore)
//! GET  /shops                  - Participating shops
//!
//! # Map & claiming
//! GET  /map?nft={id}           - Map view: user fix, target, route, arrival
//! POST /map/scan               - Start the claim workflow (arrival-guarded)
//! GET  /map/claim              - Current claim progress
//! POST /map/claim/cancel       - Cancel an in-flight claim run
//!
//! # Rewards & profile
//! GET  /rewards                - Tasks filtered by kind, with counts
//! GET  /profile                - Claimed collection and stats
//!
//! # Location tracking
//! GET  /location               - Current best-known location
//! POST /location               - Push a position sample
//! POST /location/error         - Report a provider failure
//! POST /location/watch         - Start a watch session
//! DELETE /location/watch       - Stop the watch session
//!
//! # Auth (external collaborator; stubbed)
//! GET  /login                  - Login prompt
//! POST /login                  - Simulated login
//! ```

pub mod auth;
pub mod explore;
pub mod location;
pub mod map;
pub mod nfts;
pub mod profile;
pub mod rewards;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the explore routes router.
pub fn explore_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(explore::index))
        .route("/refresh", post(explore::refresh))
}

/// Create the map routes router.
pub fn map_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(map::show))
        .route("/scan", post(map::scan))
        .route("/claim", get(map::claim_status))
        .route("/claim/cancel", post(map::cancel_claim))
}

/// Create the location tracking router.
pub fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(location::current).post(location::push))
        .route("/error", post(location::report_error))
        .route(
            "/watch",
            post(location::start_watch).delete(location::stop_watch),
        )
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/explore", explore_routes())
        .route("/nft/{id}", get(nfts::show))
        .route("/shops", get(nfts::shops))
        .nest("/map", map_routes())
        .route("/rewards", get(rewards::index))
        .route("/profile", get(profile::index))
        .nest("/location", location_routes())
        .route("/login", get(auth::login_page).post(auth::login))
}

/// Build the full application router, including health and middleware.
///
/// Shared between `main` and the integration tests.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(axum::middleware::from_fn(
            crate::middleware::request_id_middleware,
        ))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
