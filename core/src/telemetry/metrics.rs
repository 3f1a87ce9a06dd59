use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::prelude::AvsError;

/// Thread-safe counter of completed and failed simulation runs.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub completed: usize,
    pub failed: usize,
    pub failures_by_kind: BTreeMap<&'static str, usize>,
}

#[derive(Default)]
struct Metrics {
    completed: usize,
    failures_by_kind: BTreeMap<&'static str, usize>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_completed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.completed += 1;
        }
    }

    pub fn record_failure(&self, error: &AvsError) {
        if let Ok(mut metrics) = self.inner.lock() {
            *metrics.failures_by_kind.entry(error.kind()).or_insert(0) += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                completed: metrics.completed,
                failed: metrics.failures_by_kind.values().sum(),
                failures_by_kind: metrics.failures_by_kind.clone(),
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
