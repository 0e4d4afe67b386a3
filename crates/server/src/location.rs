//! Continuous location tracking.
//!
//! The device geolocation provider lives in the client; samples arrive over
//! HTTP and are fanned out to subscribers through a watch channel. The
//! tracker owns the session lifecycle: at most one watch session is active
//! at a time, starting a new one supersedes and cancels any prior one, and
//! a [`WatchGuard`] releases the session on every exit path.
//!
//! On provider failure (or when no first fix arrives within the timeout)
//! the tracker publishes the configured fallback coordinate and surfaces a
//! human-readable error so downstream features keep working.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use geomint_core::Coordinate;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Error surfaced when tracking fails.
pub const LOCATION_ERROR: &str = "Unable to track location. Please enable location services.";

/// Errors rejecting a pushed sample.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The sample's recorded time is older than the maximum cached age.
    #[error("stale location sample (older than {0:?})")]
    StaleSample(Duration),

    /// The sample was tagged with a superseded watch generation.
    #[error("watch session {submitted} superseded by {active}")]
    SupersededWatch { submitted: u64, active: u64 },

    /// The sample was tagged with a generation but no watch is active.
    #[error("no active watch session")]
    NotWatching,
}

/// Knobs mirroring the device geolocation API.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// How long to wait for a first fix before falling back.
    pub timeout: Duration,
    /// Oldest acceptable cached-position age.
    pub maximum_age: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(30),
        }
    }
}

/// A position sample pushed by the device.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    /// When the device recorded the fix; absent means "now".
    pub recorded_at: Option<DateTime<Utc>>,
    /// Watch generation the device is reporting for, if it has one.
    pub generation: Option<u64>,
}

/// Current best-known location, published to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationState {
    /// `None` before the first fix.
    pub coordinate: Option<Coordinate>,
    /// Human-readable tracking error, if any.
    pub error: Option<String>,
}

/// The location tracker. Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct LocationTracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    options: WatchOptions,
    fallback: Coordinate,
    sender: watch::Sender<LocationState>,
    session: Mutex<Option<WatchSession>>,
    next_generation: AtomicU64,
}

struct WatchSession {
    generation: u64,
    token: CancellationToken,
    got_fix: Arc<AtomicBool>,
}

impl LocationTracker {
    /// Create a tracker with the given fallback coordinate and options.
    #[must_use]
    pub fn new(fallback: Coordinate, options: WatchOptions) -> Self {
        let (sender, _) = watch::channel(LocationState {
            coordinate: None,
            error: None,
        });
        Self {
            inner: Arc::new(TrackerInner {
                options,
                fallback,
                sender,
                session: Mutex::new(None),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Start a watch session, superseding any active one.
    ///
    /// Returns a guard that releases the session when dropped; the guard of
    /// a superseded session becomes a no-op. If no fix arrives within the
    /// configured timeout the fallback coordinate is published.
    pub fn start_watch(&self) -> WatchGuard {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        let got_fix = Arc::new(AtomicBool::new(false));

        {
            let mut session = lock(&self.inner.session);
            if let Some(prev) = session.take() {
                debug!(superseded = prev.generation, by = generation, "watch superseded");
                prev.token.cancel();
            }
            *session = Some(WatchSession {
                generation,
                token: token.clone(),
                got_fix: Arc::clone(&got_fix),
            });
        }

        // First-fix watchdog: publish the fallback if the device stays quiet.
        let inner = Arc::clone(&self.inner);
        let timeout = self.inner.options.timeout;
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(timeout) => {
                    if !got_fix.load(Ordering::SeqCst) {
                        warn!(generation, "no fix within timeout, using fallback");
                        publish_fallback(&inner);
                    }
                }
            }
        });

        debug!(generation, high_accuracy = self.inner.options.high_accuracy, "watch started");
        WatchGuard {
            tracker: self.clone(),
            generation,
        }
    }

    /// Publish a position sample.
    ///
    /// # Errors
    ///
    /// Rejects samples older than the maximum cached age and samples tagged
    /// with a generation that is not the active session's.
    pub fn push(&self, sample: LocationSample) -> Result<(), TrackerError> {
        if let Some(submitted) = sample.generation {
            let session = lock(&self.inner.session);
            match session.as_ref() {
                None => return Err(TrackerError::NotWatching),
                Some(active) if active.generation != submitted => {
                    return Err(TrackerError::SupersededWatch {
                        submitted,
                        active: active.generation,
                    });
                }
                Some(active) => active.got_fix.store(true, Ordering::SeqCst),
            }
        } else if let Some(active) = lock(&self.inner.session).as_ref() {
            active.got_fix.store(true, Ordering::SeqCst);
        }

        if let Some(recorded_at) = sample.recorded_at {
            let age = Utc::now().signed_duration_since(recorded_at);
            let max = i64::try_from(self.inner.options.maximum_age.as_secs()).unwrap_or(i64::MAX);
            if age.num_seconds() > max {
                return Err(TrackerError::StaleSample(self.inner.options.maximum_age));
            }
        }

        self.inner.sender.send_modify(|state| {
            state.coordinate = Some(Coordinate::new(sample.latitude, sample.longitude));
            state.error = None;
        });
        Ok(())
    }

    /// Record a provider-side failure.
    ///
    /// Non-fatal: publishes the fallback coordinate so downstream features
    /// keep working, and surfaces the error string.
    pub fn report_error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "location provider error");
        self.inner.sender.send_modify(|state| {
            state.coordinate = Some(self.inner.fallback);
            state.error = Some(message);
        });
    }

    /// Stop the active watch session, if any.
    pub fn stop_watch(&self) {
        if let Some(session) = lock(&self.inner.session).take() {
            debug!(generation = session.generation, "watch stopped");
            session.token.cancel();
        }
    }

    /// Stop the watch session only if `generation` is still the active one.
    fn stop_if_current(&self, generation: u64) {
        let mut session = lock(&self.inner.session);
        let is_current = session.as_ref().is_some_and(|s| s.generation == generation);
        if is_current && let Some(s) = session.take() {
            debug!(generation, "watch released");
            s.token.cancel();
        }
    }

    /// The current best-known location.
    #[must_use]
    pub fn current(&self) -> LocationState {
        self.inner.sender.borrow().clone()
    }

    /// Subscribe to location updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LocationState> {
        self.inner.sender.subscribe()
    }

    /// Whether a watch session is active.
    #[must_use]
    pub fn watching(&self) -> bool {
        lock(&self.inner.session).is_some()
    }

    /// Generation of the active watch session, if any.
    #[must_use]
    pub fn active_generation(&self) -> Option<u64> {
        lock(&self.inner.session).as_ref().map(|s| s.generation)
    }
}

fn publish_fallback(inner: &TrackerInner) {
    inner.sender.send_modify(|state| {
        state.coordinate = Some(inner.fallback);
        state.error = Some(LOCATION_ERROR.to_string());
    });
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// RAII handle for a watch session.
///
/// Dropping the guard stops the session unless it has already been
/// superseded by a newer one.
pub struct WatchGuard {
    tracker: LocationTracker,
    generation: u64,
}

impl WatchGuard {
    /// Generation of the session this guard owns.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.tracker.stop_if_current(self.generation);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const FALLBACK: Coordinate = Coordinate::new(28.4996139, 77.2457196);

    fn tracker() -> LocationTracker {
        LocationTracker::new(FALLBACK, WatchOptions::default())
    }

    fn sample(lat: f64, lng: f64) -> LocationSample {
        LocationSample {
            latitude: lat,
            longitude: lng,
            recorded_at: None,
            generation: None,
        }
    }

    #[tokio::test]
    async fn test_push_publishes_coordinate() {
        let tracker = tracker();
        tracker.push(sample(28.5, 77.24)).unwrap();

        let state = tracker.current();
        assert_eq!(state.coordinate, Some(Coordinate::new(28.5, 77.24)));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_no_fix_before_first_sample() {
        assert!(tracker().current().coordinate.is_none());
    }

    #[tokio::test]
    async fn test_stale_sample_rejected() {
        let tracker = tracker();
        let old = Utc::now() - chrono::Duration::seconds(45);
        let result = tracker.push(LocationSample {
            latitude: 28.5,
            longitude: 77.24,
            recorded_at: Some(old),
            generation: None,
        });
        assert!(matches!(result, Err(TrackerError::StaleSample(_))));
        assert!(tracker.current().coordinate.is_none());
    }

    #[tokio::test]
    async fn test_recent_sample_accepted() {
        let tracker = tracker();
        let recent = Utc::now() - chrono::Duration::seconds(5);
        tracker
            .push(LocationSample {
                latitude: 28.5,
                longitude: 77.24,
                recorded_at: Some(recent),
                generation: None,
            })
            .unwrap();
        assert!(tracker.current().coordinate.is_some());
    }

    #[tokio::test]
    async fn test_report_error_masks_with_fallback() {
        let tracker = tracker();
        tracker.report_error(LOCATION_ERROR);

        let state = tracker.current();
        assert_eq!(state.coordinate, Some(FALLBACK));
        assert_eq!(state.error.as_deref(), Some(LOCATION_ERROR));
    }

    #[tokio::test]
    async fn test_error_cleared_by_next_fix() {
        let tracker = tracker();
        tracker.report_error(LOCATION_ERROR);
        tracker.push(sample(28.5, 77.24)).unwrap();
        assert!(tracker.current().error.is_none());
    }

    #[tokio::test]
    async fn test_single_active_watch() {
        let tracker = tracker();
        let first = tracker.start_watch();
        let second = tracker.start_watch();

        assert_eq!(tracker.active_generation(), Some(second.generation()));

        // A push tagged with the superseded generation is discarded.
        let result = tracker.push(LocationSample {
            latitude: 28.5,
            longitude: 77.24,
            recorded_at: None,
            generation: Some(first.generation()),
        });
        assert!(matches!(result, Err(TrackerError::SupersededWatch { .. })));
        assert!(tracker.current().coordinate.is_none());
    }

    #[tokio::test]
    async fn test_superseded_guard_drop_is_noop() {
        let tracker = tracker();
        let first = tracker.start_watch();
        let second = tracker.start_watch();

        drop(first);
        assert!(tracker.watching());
        drop(second);
        assert!(!tracker.watching());
    }

    #[tokio::test]
    async fn test_guard_drop_releases_session() {
        let tracker = tracker();
        {
            let _guard = tracker.start_watch();
            assert!(tracker.watching());
        }
        assert!(!tracker.watching());
    }

    #[tokio::test]
    async fn test_push_without_watch_is_direct_set() {
        let tracker = tracker();
        tracker.push(sample(28.51, 77.23)).unwrap();
        assert!(tracker.current().coordinate.is_some());
    }

    #[tokio::test]
    async fn test_generation_tagged_push_without_watch_rejected() {
        let tracker = tracker();
        let result = tracker.push(LocationSample {
            latitude: 28.5,
            longitude: 77.24,
            recorded_at: None,
            generation: Some(1),
        });
        assert!(matches!(result, Err(TrackerError::NotWatching)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_publishes_fallback() {
        let tracker = tracker();
        let _guard = tracker.start_watch();

        tokio::time::sleep(Duration::from_secs(11)).await;

        let state = tracker.current();
        assert_eq!(state.coordinate, Some(FALLBACK));
        assert_eq!(state.error.as_deref(), Some(LOCATION_ERROR));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fix_before_timeout_suppresses_fallback() {
        let tracker = tracker();
        let guard = tracker.start_watch();

        tracker
            .push(LocationSample {
                latitude: 28.51,
                longitude: 77.23,
                recorded_at: None,
                generation: Some(guard.generation()),
            })
            .unwrap();

        tokio::time::sleep(Duration::from_secs(11)).await;

        let state = tracker.current();
        assert_eq!(state.coordinate, Some(Coordinate::new(28.51, 77.23)));
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_watch_cancels_watchdog() {
        let tracker = tracker();
        tracker.start_watch();
        tracker.stop_watch();

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(tracker.current().coordinate.is_none());
    }
}
