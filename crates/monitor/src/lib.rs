//! Provider health monitoring and rolling metrics
//!
//! - [`HealthMonitor`] probes adapters on a timer, tracks transaction
//!   outcomes and exposes per-provider health
//! - [`MetricsAggregator`] keeps a time-bounded history per provider and
//!   computes windowed averages

pub mod health;
pub mod history;

pub use health::{
    HealthMonitor, HealthRecord, HealthSnapshot, PendingTransaction, ProviderHealth, ProviderState,
};
pub use history::{Averages, HistoricalMetricEntry, MetricSample, MetricsAggregator, DAY, HOUR};
