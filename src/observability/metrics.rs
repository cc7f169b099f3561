//! Metrics registry for query execution
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

/// Operational counters for a query runner
///
/// All counters use Relaxed atomics; readers see eventually consistent values.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Queries answered by the store's own engine
    queries_native: AtomicU64,
    /// Queries answered by streaming
    queries_streamed: AtomicU64,
    /// Queries that produced results
    queries_completed: AtomicU64,
    /// Queries that failed
    queries_rejected: AtomicU64,
    /// Records read from streams
    records_scanned: AtomicU64,
    /// Streamed records that satisfied the filter
    records_matched: AtomicU64,
    /// Streams ended before the store ran out of records
    streams_ended_early: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_native(&self) {
        self.queries_native.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_streamed(&self) {
        self.queries_streamed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_completed(&self) {
        self.queries_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_records_scanned(&self) {
        self.records_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_records_matched(&self, count: u64) {
        self.records_matched.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_streams_ended_early(&self) {
        self.streams_ended_early.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_native: self.queries_native.load(Ordering::Relaxed),
            queries_streamed: self.queries_streamed.load(Ordering::Relaxed),
            queries_completed: self.queries_completed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            records_scanned: self.records_scanned.load(Ordering::Relaxed),
            records_matched: self.records_matched.load(Ordering::Relaxed),
            streams_ended_early: self.streams_ended_early.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queries_native: u64,
    pub queries_streamed: u64,
    pub queries_completed: u64,
    pub queries_rejected: u64,
    pub records_scanned: u64,
    pub records_matched: u64,
    pub streams_ended_early: u64,
}
