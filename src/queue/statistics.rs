//! Statistical tracking for queue wait times
//!
//! Keeps running per-role wait-time statistics from formed matches so the
//! metrics endpoint and operators can judge whether the fallback timers are
//! tuned sensibly.

use crate::types::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// Running statistics for one wait-time category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitTimeStats {
    /// Number of samples collected
    pub sample_count: u64,
    /// Sum of all wait times (for calculating mean)
    pub sum_seconds: f64,
    /// Sum of squared wait times (for calculating variance)
    pub sum_squared_seconds: f64,
    /// Minimum wait time observed
    pub min_seconds: f64,
    /// Maximum wait time observed
    pub max_seconds: f64,
    /// Last update timestamp
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl WaitTimeStats {
    pub fn new() -> Self {
        Self {
            sample_count: 0,
            sum_seconds: 0.0,
            sum_squared_seconds: 0.0,
            min_seconds: f64::INFINITY,
            max_seconds: 0.0,
            last_updated: chrono::Utc::now(),
        }
    }

    /// Add a new wait time sample
    pub fn add_sample(&mut self, wait_time: Duration) {
        let seconds = wait_time.as_secs_f64();

        self.sample_count += 1;
        self.sum_seconds += seconds;
        self.sum_squared_seconds += seconds * seconds;
        self.min_seconds = self.min_seconds.min(seconds);
        self.max_seconds = self.max_seconds.max(seconds);
        self.last_updated = chrono::Utc::now();
    }

    /// Calculate the mean wait time
    pub fn mean(&self) -> Duration {
        if self.sample_count == 0 {
            return Duration::from_secs(0);
        }

        Duration::from_secs_f64(self.sum_seconds / self.sample_count as f64)
    }

    /// Calculate the standard deviation
    pub fn standard_deviation(&self) -> Duration {
        if self.sample_count <= 1 {
            return Duration::from_secs(0);
        }

        let mean_seconds = self.sum_seconds / self.sample_count as f64;
        let variance =
            (self.sum_squared_seconds / self.sample_count as f64) - (mean_seconds * mean_seconds);
        Duration::from_secs_f64(variance.max(0.0).sqrt())
    }

    /// Get minimum wait time
    pub fn min(&self) -> Duration {
        if self.min_seconds == f64::INFINITY {
            Duration::from_secs(0)
        } else {
            Duration::from_secs_f64(self.min_seconds)
        }
    }

    /// Get maximum wait time
    pub fn max(&self) -> Duration {
        Duration::from_secs_f64(self.max_seconds)
    }
}

impl Default for WaitTimeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe per-role wait statistics tracker
#[derive(Debug, Default)]
pub struct WaitStatisticsTracker {
    stats: RwLock<HashMap<Role, WaitTimeStats>>,
}

impl WaitStatisticsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the time a matched player spent waiting.
    pub fn record_wait(&self, role: Role, wait_time: Duration) {
        if let Ok(mut stats) = self.stats.write() {
            stats.entry(role).or_default().add_sample(wait_time);
        }
    }

    /// Snapshot of the statistics for one role, if any samples exist.
    pub fn stats_for(&self, role: Role) -> Option<WaitTimeStats> {
        self.stats.read().ok()?.get(&role).cloned()
    }

    /// Snapshot of all tracked roles.
    pub fn all_stats(&self) -> HashMap<Role, WaitTimeStats> {
        self.stats.read().map(|s| s.clone()).unwrap_or_default()
    }
}
