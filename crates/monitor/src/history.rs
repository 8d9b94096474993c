//! Rolling per-provider metric history
//!
//! Entries older than the retention window are pruned on every write, so
//! memory stays bounded without a background sweep.

use chrono::{DateTime, Duration as TimeDelta, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::trace;

use bridge_core::{HistoryConfig, TransactionStatus};

pub const HOUR: Duration = Duration::from_secs(60 * 60);
pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// One observation to be recorded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSample {
    pub processing_time_ms: f64,
    pub liquidity: f64,
    pub status: TransactionStatus,
}

impl MetricSample {
    pub fn new(processing_time_ms: f64, liquidity: f64, status: TransactionStatus) -> Self {
        Self {
            processing_time_ms,
            liquidity,
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalMetricEntry {
    pub timestamp: DateTime<Utc>,
    pub processing_time_ms: f64,
    pub liquidity: f64,
    pub status: TransactionStatus,
}

/// Windowed averages for one provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Averages {
    pub average_processing_time_ms: f64,
    pub average_liquidity: f64,
    /// 0..=100
    pub success_rate: f64,
    pub total_transactions: usize,
}

#[derive(Debug)]
pub struct MetricsAggregator {
    history: DashMap<String, VecDeque<HistoricalMetricEntry>>,
    retention: Duration,
    default_window: Duration,
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new(DAY, HOUR)
    }
}

/// Start of a window ending at `now`; `None` when it reaches before the epoch range
fn window_start(now: DateTime<Utc>, window: Duration) -> Option<DateTime<Utc>> {
    let window = TimeDelta::from_std(window).ok()?;
    now.checked_sub_signed(window)
}

impl MetricsAggregator {
    pub fn new(retention: Duration, default_window: Duration) -> Self {
        Self {
            history: DashMap::new(),
            retention,
            default_window,
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(
            Duration::from_secs(config.retention_secs),
            Duration::from_secs(config.default_window_secs),
        )
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    pub fn default_window(&self) -> Duration {
        self.default_window
    }

    pub fn add_metric(&self, provider_id: &str, sample: MetricSample) {
        self.add_metric_at(provider_id, sample, Utc::now());
    }

    /// Append a sample stamped `now`, then prune that provider's history
    pub fn add_metric_at(&self, provider_id: &str, sample: MetricSample, now: DateTime<Utc>) {
        let mut entries = self.history.entry(provider_id.to_string()).or_default();
        entries.push_back(HistoricalMetricEntry {
            timestamp: now,
            processing_time_ms: sample.processing_time_ms,
            liquidity: sample.liquidity,
            status: sample.status,
        });

        if let Some(cutoff) = window_start(now, self.retention) {
            let before = entries.len();
            entries.retain(|e| e.timestamp > cutoff);
            let pruned = before - entries.len();
            if pruned > 0 {
                trace!("Pruned {} history entries for {}", pruned, provider_id);
            }
        }
    }

    /// Averages over the default window
    pub fn get_averages(&self, provider_id: &str) -> Option<Averages> {
        self.averages_at(provider_id, self.default_window, Utc::now())
    }

    pub fn get_averages_in(&self, provider_id: &str, window: Duration) -> Option<Averages> {
        self.averages_at(provider_id, window, Utc::now())
    }

    /// Averages over the entries newer than `now - window`; `None` if there are none
    pub fn averages_at(
        &self,
        provider_id: &str,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Option<Averages> {
        let entries = self.history.get(provider_id)?;
        let threshold = window_start(now, window);
        let recent: Vec<&HistoricalMetricEntry> = entries
            .iter()
            .filter(|e| threshold.map_or(true, |t| e.timestamp > t))
            .collect();

        if recent.is_empty() {
            return None;
        }

        let count = recent.len() as f64;
        let successful = recent
            .iter()
            .filter(|e| e.status == TransactionStatus::Success)
            .count();

        Some(Averages {
            average_processing_time_ms: recent.iter().map(|e| e.processing_time_ms).sum::<f64>() / count,
            average_liquidity: recent.iter().map(|e| e.liquidity).sum::<f64>() / count,
            success_rate: successful as f64 / count * 100.0,
            total_transactions: recent.len(),
        })
    }

    /// Retained entries for one provider, oldest first
    pub fn entries(&self, provider_id: &str) -> Vec<HistoricalMetricEntry> {
        self.history
            .get(provider_id)
            .map(|entries| entries.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn providers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.history.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }
}
