//! Location tracking route handlers.
//!
//! The device geolocation provider is the client; these endpoints are how
//! its samples and failures reach the tracker.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::location::{LocationSample, LocationState};
use crate::state::AppState;

/// Location view model.
#[derive(Debug, Serialize)]
pub struct LocationView {
    #[serde(flatten)]
    pub state: LocationState,
    pub watching: bool,
    /// Generation of the active watch session, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<u64>,
}

/// Provider failure report body.
#[derive(Debug, Deserialize)]
pub struct ErrorReport {
    pub message: String,
}

fn view(state: &AppState) -> LocationView {
    LocationView {
        state: state.tracker().current(),
        watching: state.tracker().watching(),
        generation: state.tracker().active_generation(),
    }
}

/// Report the current best-known location.
pub async fn current(State(state): State<AppState>) -> Json<LocationView> {
    Json(view(&state))
}

/// Push a position sample from the device.
#[instrument(skip(state))]
pub async fn push(
    State(state): State<AppState>,
    Json(sample): Json<LocationSample>,
) -> Result<Json<LocationView>> {
    state.tracker().push(sample)?;
    Ok(Json(view(&state)))
}

/// Report a provider-side failure.
///
/// Non-fatal: the tracker masks the failure with the fallback coordinate so
/// downstream features keep working.
#[instrument(skip(state))]
pub async fn report_error(
    State(state): State<AppState>,
    Json(report): Json<ErrorReport>,
) -> Json<LocationView> {
    state.tracker().report_error(report.message);
    Json(view(&state))
}

/// Start a watch session, superseding any active one.
#[instrument(skip(state))]
pub async fn start_watch(State(state): State<AppState>) -> (StatusCode, Json<LocationView>) {
    let guard = state.tracker().start_watch();
    state.store_watch_guard(guard);
    (StatusCode::CREATED, Json(view(&state)))
}

/// Stop the active watch session.
#[instrument(skip(state))]
pub async fn stop_watch(State(state): State<AppState>) -> Json<LocationView> {
    state.clear_watch_guard();
    // Covers sessions started outside the HTTP-managed guard as well.
    state.tracker().stop_watch();
    Json(view(&state))
}
