//! Simulated claim workflow.
//!
//! An explicit state machine, `Idle -> Scanning -> Claiming -> Claimed ->
//! Redirect`, driven by timer delays: there is no real QR decode and no real
//! mint. Each run owns a cancellation token; cancelling (or superseding the
//! run) aborts pending transitions and returns the stage to `Idle` without
//! touching the collection. Stages are published on a watch channel so the
//! map view can poll progress.
//!
//! A run only starts when the user is within claiming range of the target
//! NFT, and starting while a run is in flight is an idempotent no-op.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use geomint_core::{NftId, near_destination};
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::catalogue::Catalogue;
use crate::location::LocationTracker;

/// Where the client is sent once a claim completes.
const REDIRECT_TARGET: &str = "/profile";

/// Stage of the claim workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStage {
    Idle,
    Scanning,
    Claiming,
    Claimed,
    Redirect,
}

/// Published progress of the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimProgress {
    pub stage: ClaimStage,
    /// Target of the current (or last finished) run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft_id: Option<NftId>,
    /// Set once the run reaches the redirect stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ClaimProgress {
    const fn idle() -> Self {
        Self {
            stage: ClaimStage::Idle,
            nft_id: None,
            redirect: None,
        }
    }

    fn at(stage: ClaimStage, nft_id: NftId) -> Self {
        Self {
            stage,
            nft_id: Some(nft_id),
            redirect: (stage == ClaimStage::Redirect).then(|| REDIRECT_TARGET.to_string()),
        }
    }
}

/// Errors rejecting a scan request.
#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    #[error("unknown NFT: {0}")]
    UnknownNft(NftId),

    #[error("no location fix yet")]
    NoLocationFix,

    #[error("not within claiming range of NFT {0}")]
    NotNearby(NftId),
}

/// Delays between workflow stages.
#[derive(Debug, Clone, Copy)]
pub struct ClaimTiming {
    /// Simulated QR scan.
    pub scan: Duration,
    /// Simulated on-chain mint.
    pub mint: Duration,
    /// Pause on the success screen before redirecting.
    pub redirect: Duration,
}

impl Default for ClaimTiming {
    fn default() -> Self {
        Self {
            scan: Duration::from_secs(2),
            mint: Duration::from_secs(2),
            redirect: Duration::from_millis(1500),
        }
    }
}

/// The claim workflow engine. Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct ClaimEngine {
    inner: Arc<ClaimEngineInner>,
}

struct ClaimEngineInner {
    catalogue: Catalogue,
    tracker: LocationTracker,
    timing: ClaimTiming,
    progress: watch::Sender<ClaimProgress>,
    active: Mutex<Option<ActiveRun>>,
}

struct ActiveRun {
    nft_id: NftId,
    token: CancellationToken,
}

impl ClaimEngine {
    /// Create an engine over the given catalogue and tracker.
    #[must_use]
    pub fn new(catalogue: Catalogue, tracker: LocationTracker, timing: ClaimTiming) -> Self {
        let (progress, _) = watch::channel(ClaimProgress::idle());
        Self {
            inner: Arc::new(ClaimEngineInner {
                catalogue,
                tracker,
                timing,
                progress,
                active: Mutex::new(None),
            }),
        }
    }

    /// Start a claim run for `nft_id`.
    ///
    /// Idempotent: if a run is already in flight the call is a no-op that
    /// reports its current progress.
    ///
    /// # Errors
    ///
    /// Rejects unknown NFTs, requests before the first location fix, and
    /// requests made outside the arrival threshold. Nothing is mutated on
    /// rejection.
    pub async fn start(&self, nft_id: NftId) -> Result<ClaimProgress, ClaimError> {
        let nft = self
            .inner
            .catalogue
            .nft(nft_id)
            .await
            .ok_or(ClaimError::UnknownNft(nft_id))?;

        let user = self
            .inner
            .tracker
            .current()
            .coordinate
            .ok_or(ClaimError::NoLocationFix)?;

        if !near_destination(user, nft.location) {
            return Err(ClaimError::NotNearby(nft_id));
        }

        let token = {
            let mut active = lock(&self.inner.active);
            if active.is_some() {
                // Scan already in flight; report where it is.
                return Ok(self.progress());
            }
            let token = CancellationToken::new();
            *active = Some(ActiveRun {
                nft_id,
                token: token.clone(),
            });
            token
        };

        self.inner
            .progress
            .send_replace(ClaimProgress::at(ClaimStage::Scanning, nft_id));
        info!(nft = %nft_id, "claim run started");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            run(inner, nft_id, token).await;
        });

        Ok(self.progress())
    }

    /// Cancel the in-flight run, if any.
    ///
    /// Pending transitions are aborted and the stage returns to `Idle`; the
    /// claimed collection is untouched.
    pub fn cancel(&self) {
        let run = lock(&self.inner.active).take();
        if let Some(run) = run {
            info!(nft = %run.nft_id, "claim run cancelled");
            run.token.cancel();
            self.inner.progress.send_replace(ClaimProgress::idle());
        }
    }

    /// Current workflow progress.
    #[must_use]
    pub fn progress(&self) -> ClaimProgress {
        self.inner.progress.borrow().clone()
    }

    /// Subscribe to progress updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ClaimProgress> {
        self.inner.progress.subscribe()
    }

    /// Whether a run is in flight.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        lock(&self.inner.active).is_some()
    }
}

/// Drive one run through its stages.
///
/// Each stage strictly follows the prior stage's delay completion; the
/// token is checked at every suspension point so cancellation never leaves
/// an orphaned timer.
async fn run(inner: Arc<ClaimEngineInner>, nft_id: NftId, token: CancellationToken) {
    // Scanning -> Claiming
    if wait_or_cancelled(inner.timing.scan, &token).await {
        return;
    }
    publish(&inner, &token, ClaimProgress::at(ClaimStage::Claiming, nft_id));

    // Claiming -> Claimed: the one mutation of the collection
    if wait_or_cancelled(inner.timing.mint, &token).await {
        return;
    }
    if inner.catalogue.claim(nft_id).await.is_none() {
        // Unknown id can only happen if the catalogue was reseeded mid-run.
        error!(nft = %nft_id, "claim target vanished mid-run");
        finish(&inner, ClaimProgress::idle());
        return;
    }
    publish(&inner, &token, ClaimProgress::at(ClaimStage::Claimed, nft_id));

    // Claimed -> Redirect
    if wait_or_cancelled(inner.timing.redirect, &token).await {
        return;
    }
    finish(&inner, ClaimProgress::at(ClaimStage::Redirect, nft_id));
    info!(nft = %nft_id, "claim run finished");
}

/// Wait out a stage delay. Returns `true` when the run was cancelled.
async fn wait_or_cancelled(delay: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        () = token.cancelled() => true,
        () = tokio::time::sleep(delay) => false,
    }
}

fn publish(inner: &ClaimEngineInner, token: &CancellationToken, progress: ClaimProgress) {
    // A cancel may have landed between the delay and this publish; the
    // cancel's Idle wins.
    if !token.is_cancelled() {
        inner.progress.send_replace(progress);
    }
}

fn finish(inner: &ClaimEngineInner, progress: ClaimProgress) {
    inner.progress.send_replace(progress);
    lock(&inner.active).take();
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
