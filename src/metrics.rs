use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing record and summary activity.
#[derive(Default)]
pub struct StudentMetrics {
    created: AtomicU64,
    updated: AtomicU64,
    deleted: AtomicU64,
    summaries_generated: AtomicU64,
    summaries_failed: AtomicU64,
}

impl StudentMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful create.
    pub fn record_created(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful update.
    pub fn record_updated(&self) {
        self.updated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful delete.
    pub fn record_deleted(&self) {
        self.deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of a generation call.
    pub fn record_summary(&self, succeeded: bool) {
        let counter = if succeeded {
            &self.summaries_generated
        } else {
            &self.summaries_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            created: self.created.load(Ordering::Relaxed),
            updated: self.updated.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
            summaries_generated: self.summaries_generated.load(Ordering::Relaxed),
            summaries_failed: self.summaries_failed.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of the counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Records created since startup.
    pub created: u64,
    /// Successful updates since startup.
    pub updated: u64,
    /// Records deleted since startup.
    pub deleted: u64,
    /// Summaries returned to callers.
    pub summaries_generated: u64,
    /// Summaries that failed in the generation step.
    pub summaries_failed: u64,
}
