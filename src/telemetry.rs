//! # Telemetry - Pipeline Observability Handle
//!
//! In-process metrics for the transformation pipeline: per-outcome call
//! counters and a bounded window of recent call durations. The handle is
//! dependency-injected into [`crate::transformer::StatusTransformer`]
//! rather than living as ambient global state, so tests can substitute
//! their own and assert on what was recorded.
//!
//! Counters use atomic increments; many calls may finalize simultaneously
//! and the only contended lock is the short-lived one around the recent
//! duration window.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one pipeline call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    /// Pipeline completed with no anomalies
    Success,
    /// Pipeline completed but absorbed at least one degraded-operation notice
    Degraded,
    /// Pipeline failed and the fallback projection was substituted
    Fallback,
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Degraded => write!(f, "degraded"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Number of recent call durations retained for the snapshot window.
const RECENT_WINDOW: usize = 256;

#[derive(Debug)]
struct TelemetryInner {
    sink_id: Uuid,
    calls: AtomicU64,
    success: AtomicU64,
    degraded: AtomicU64,
    fallback: AtomicU64,
    total_duration_us: AtomicU64,
    recent: Mutex<VecDeque<Duration>>,
}

/// Cheaply cloneable observability handle shared across transformer
/// instances and threads.
#[derive(Debug, Clone)]
pub struct Telemetry {
    inner: Arc<TelemetryInner>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TelemetryInner {
                sink_id: Uuid::new_v4(),
                calls: AtomicU64::new(0),
                success: AtomicU64::new(0),
                degraded: AtomicU64::new(0),
                fallback: AtomicU64::new(0),
                total_duration_us: AtomicU64::new(0),
                recent: Mutex::new(VecDeque::with_capacity(RECENT_WINDOW)),
            }),
        }
    }

    /// Record one pipeline call: outcome counter plus a duration sample.
    pub fn record(&self, outcome: CallOutcome, duration: Duration) {
        self.inner.calls.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            CallOutcome::Success => &self.inner.success,
            CallOutcome::Degraded => &self.inner.degraded,
            CallOutcome::Fallback => &self.inner.fallback,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.inner
            .total_duration_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);

        let mut recent = self.inner.recent.lock();
        if recent.len() == RECENT_WINDOW {
            recent.pop_front();
        }
        recent.push_back(duration);
    }

    /// Point-in-time view of everything recorded so far.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        let recent = self.inner.recent.lock();
        let (avg_ms, max_ms) = if recent.is_empty() {
            (0.0, 0.0)
        } else {
            let sum: Duration = recent.iter().sum();
            let max = recent.iter().max().copied().unwrap_or_default();
            (
                sum.as_secs_f64() * 1000.0 / recent.len() as f64,
                max.as_secs_f64() * 1000.0,
            )
        };
        TelemetrySnapshot {
            sink_id: self.inner.sink_id,
            calls: self.inner.calls.load(Ordering::Relaxed),
            success: self.inner.success.load(Ordering::Relaxed),
            degraded: self.inner.degraded.load(Ordering::Relaxed),
            fallback: self.inner.fallback.load(Ordering::Relaxed),
            recent_avg_duration_ms: avg_ms,
            recent_max_duration_ms: max_ms,
        }
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters and recent duration statistics for one telemetry sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    /// Unique identifier for this sink instance
    pub sink_id: Uuid,
    pub calls: u64,
    pub success: u64,
    pub degraded: u64,
    pub fallback: u64,
    pub recent_avg_duration_ms: f64,
    pub recent_max_duration_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate_per_outcome() {
        let telemetry = Telemetry::new();
        telemetry.record(CallOutcome::Success, Duration::from_micros(100));
        telemetry.record(CallOutcome::Success, Duration::from_micros(200));
        telemetry.record(CallOutcome::Degraded, Duration::from_micros(300));
        telemetry.record(CallOutcome::Fallback, Duration::from_micros(400));

        let snapshot = telemetry.snapshot();
        assert_eq!(snapshot.calls, 4);
        assert_eq!(snapshot.success, 2);
        assert_eq!(snapshot.degraded, 1);
        assert_eq!(snapshot.fallback, 1);
        assert!(snapshot.recent_max_duration_ms >= snapshot.recent_avg_duration_ms);
    }

    #[test]
    fn test_clones_share_state() {
        let telemetry = Telemetry::new();
        let clone = telemetry.clone();
        clone.record(CallOutcome::Success, Duration::from_micros(50));
        assert_eq!(telemetry.snapshot().calls, 1);
        assert_eq!(telemetry.snapshot().sink_id, clone.snapshot().sink_id);
    }

    #[test]
    fn test_recent_window_is_bounded() {
        let telemetry = Telemetry::new();
        for _ in 0..(RECENT_WINDOW + 10) {
            telemetry.record(CallOutcome::Success, Duration::from_micros(10));
        }
        let snapshot = telemetry.snapshot();
        assert_eq!(snapshot.calls, (RECENT_WINDOW + 10) as u64);
        assert!(snapshot.recent_avg_duration_ms > 0.0);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(CallOutcome::Success.to_string(), "success");
        assert_eq!(CallOutcome::Degraded.to_string(), "degraded");
        assert_eq!(CallOutcome::Fallback.to_string(), "fallback");
    }
}
