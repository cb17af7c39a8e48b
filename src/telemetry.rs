//! Metrics tracking.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct Metrics {
    pub entries_appended: AtomicU64,
    pub list_requests: AtomicU64,
    pub rows_rendered: AtomicU64,
    pub extra_change_requests: AtomicU64,
    pub validation_failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_append(&self) {
        self.entries_appended.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_list(&self, rows: usize) {
        self.list_requests.fetch_add(1, Ordering::Relaxed);
        self.rows_rendered.fetch_add(rows as u64, Ordering::Relaxed);
    }

    pub fn record_extra_change(&self) {
        self.extra_change_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            entries_appended: self.entries_appended.load(Ordering::Relaxed),
            list_requests: self.list_requests.load(Ordering::Relaxed),
            rows_rendered: self.rows_rendered.load(Ordering::Relaxed),
            extra_change_requests: self.extra_change_requests.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub entries_appended: u64,
    pub list_requests: u64,
    pub rows_rendered: u64,
    pub extra_change_requests: u64,
    pub validation_failures: u64,
}
