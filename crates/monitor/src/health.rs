//! Provider health monitoring
//!
//! A timer task probes every adapter, refreshes liquidity snapshots and
//! stamps each provider's record. Transaction outcomes are recorded
//! separately, either directly or by polling a provider until the
//! transaction settles. Only this module writes health records.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::future::join_all;
use futures::FutureExt;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{timeout, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use bridge_core::{
    AdapterError, BridgeAdapter, MonitorConfig, MonitorError, MonitorResult, ProviderStats,
    ProviderStatsSource, TransactionStatus,
};

use crate::history::{MetricSample, MetricsAggregator};

const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

/// Per-provider health state: Unknown until the first probe, then
/// Operational or Degraded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderState {
    Unknown,
    Operational,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub state: ProviderState,
    pub is_operational: bool,
    pub successful_transactions: u64,
    pub failed_transactions: u64,
    pub average_processing_time_ms: f64,
    pub current_liquidity: f64,
    pub last_updated: DateTime<Utc>,
}

impl HealthRecord {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            state: ProviderState::Unknown,
            is_operational: false,
            successful_transactions: 0,
            failed_transactions: 0,
            average_processing_time_ms: 0.0,
            current_liquidity: 0.0,
            last_updated: now,
        }
    }

    fn set_probe_result(&mut self, healthy: bool) {
        self.state = if healthy {
            ProviderState::Operational
        } else {
            ProviderState::Degraded
        };
        self.is_operational = healthy;
    }

    /// Successes over all recorded transactions, 0 when none were recorded
    pub fn success_rate(&self) -> f64 {
        let total = self.successful_transactions + self.failed_transactions;
        if total == 0 {
            0.0
        } else {
            self.successful_transactions as f64 / total as f64 * 100.0
        }
    }
}

/// Read-only health summary for one provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealth {
    pub is_operational: bool,
    pub success_rate: f64,
    pub last_updated: DateTime<Utc>,
}

/// A transaction being polled by [`HealthMonitor::track_transaction`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransaction {
    pub tx_hash: String,
    pub provider_id: String,
    pub started_at: DateTime<Utc>,
}

/// Every provider's record, keyed by provider id
pub type HealthSnapshot = BTreeMap<String, HealthRecord>;

/// (provider id, transaction hash)
type PendingKey = (String, String);

/// Lists a transaction as pending for as long as it is alive
///
/// Dropped without [`PendingEntry::settle`], the transaction counts as failed.
struct PendingEntry<'a> {
    state: &'a MonitorState,
    key: PendingKey,
    settled: bool,
}

impl<'a> PendingEntry<'a> {
    fn insert(state: &'a MonitorState, provider_id: &str, tx_hash: &str) -> Self {
        let key = (provider_id.to_string(), tx_hash.to_string());
        state.pending.insert(
            key.clone(),
            PendingTransaction {
                tx_hash: tx_hash.to_string(),
                provider_id: provider_id.to_string(),
                started_at: Utc::now(),
            },
        );
        Self {
            state,
            key,
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingEntry<'_> {
    fn drop(&mut self) {
        self.state.pending.remove(&self.key);
        if self.settled {
            return;
        }

        let (provider_id, tx_hash) = &self.key;
        warn!("Tracking {} on {} was cancelled", tx_hash, provider_id);
        if let Err(e) = self
            .state
            .record_transaction(provider_id, TransactionStatus::Failed, 0.0)
        {
            warn!("Recording cancelled {} failed: {}", tx_hash, e);
        }
    }
}

struct MonitorTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

struct MonitorState {
    adapters: Vec<Arc<dyn BridgeAdapter>>,
    records: DashMap<String, HealthRecord>,
    pending: DashMap<PendingKey, PendingTransaction>,
    history: Arc<MetricsAggregator>,
    config: MonitorConfig,
    updates: broadcast::Sender<HealthSnapshot>,
}

pub struct HealthMonitor {
    state: Arc<MonitorState>,
    task: Mutex<Option<MonitorTask>>,
}

impl HealthMonitor {
    pub fn new(
        adapters: Vec<Arc<dyn BridgeAdapter>>,
        history: Arc<MetricsAggregator>,
        config: MonitorConfig,
    ) -> Self {
        let now = Utc::now();
        let records = adapters
            .iter()
            .map(|a| (a.id().to_string(), HealthRecord::new(now)))
            .collect();
        let (updates, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);

        Self {
            state: Arc::new(MonitorState {
                adapters,
                records,
                pending: DashMap::new(),
                history,
                config,
                updates,
            }),
            task: Mutex::new(None),
        }
    }

    pub fn history(&self) -> Arc<MetricsAggregator> {
        Arc::clone(&self.state.history)
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.state.config
    }

    /// Start the periodic health check; the first tick fires after `interval`
    pub fn start_monitoring(&self, interval: Duration) -> MonitorResult<()> {
        if interval.is_zero() {
            return Err(MonitorError::InvalidInterval);
        }

        let mut task = self.task.lock();
        if task.is_some() {
            return Err(MonitorError::AlreadyRunning);
        }

        let state = Arc::clone(&self.state);
        let (shutdown, mut shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        state.check_health().await;
                    }
                }
            }
            debug!("Health monitor loop exited");
        });

        info!(
            "Health monitoring started for {} providers every {:?}",
            self.state.adapters.len(),
            interval
        );
        *task = Some(MonitorTask { shutdown, handle });
        Ok(())
    }

    /// Stop the periodic health check; returns false if it was not running
    pub fn stop_monitoring(&self) -> bool {
        match self.task.lock().take() {
            Some(task) => {
                // The loop may already be gone if its runtime shut down
                let _ = task.shutdown.send(());
                info!("Health monitoring stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|t| !t.handle.is_finished())
    }

    /// Run one monitoring tick immediately
    pub async fn check_health(&self) -> HealthSnapshot {
        self.state.check_health().await
    }

    pub fn record_transaction(
        &self,
        provider_id: &str,
        status: TransactionStatus,
        processing_time_ms: f64,
    ) -> MonitorResult<()> {
        self.state.record_transaction(provider_id, status, processing_time_ms)
    }

    /// Poll a provider until the transaction settles, then record it
    ///
    /// Lookup errors, unsupported lookups and exceeding the maximum wait all
    /// record a failure with zero processing time. Returns the recorded status.
    /// Dropping the future before it settles also records a failure.
    pub async fn track_transaction(
        &self,
        provider_id: &str,
        tx_hash: &str,
    ) -> MonitorResult<TransactionStatus> {
        let state = &self.state;
        let adapter = state
            .adapter(provider_id)
            .ok_or_else(|| MonitorError::UnknownProvider(provider_id.to_string()))?;

        let entry = PendingEntry::insert(state, provider_id, tx_hash);
        let started = Instant::now();
        let poll_interval = state.config.tx_poll_interval();

        let polling = async {
            loop {
                match adapter.transaction_status(tx_hash).await {
                    Ok(status) if status.is_terminal() => return Ok(status),
                    Ok(_) => tokio::time::sleep(poll_interval).await,
                    Err(e) => return Err(e),
                }
            }
        };
        let outcome = timeout(state.config.tx_max_wait(), polling).await;
        entry.settle();

        let (status, processing_time_ms) = match outcome {
            Ok(Ok(status)) => (status, started.elapsed().as_secs_f64() * 1000.0),
            Ok(Err(e)) => {
                warn!("Tracking {} on {} failed: {}", tx_hash, provider_id, e);
                (TransactionStatus::Failed, 0.0)
            }
            Err(_) => {
                warn!(
                    "Tracking {} on {} gave up after {:?}",
                    tx_hash,
                    provider_id,
                    state.config.tx_max_wait()
                );
                (TransactionStatus::Failed, 0.0)
            }
        };

        state.record_transaction(provider_id, status, processing_time_ms)?;
        Ok(status)
    }

    /// Transactions currently being polled
    pub fn pending_transactions(&self) -> Vec<PendingTransaction> {
        let mut pending: Vec<PendingTransaction> =
            self.state.pending.iter().map(|e| e.value().clone()).collect();
        pending.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        pending
    }

    pub fn get_health_status(&self) -> BTreeMap<String, ProviderHealth> {
        self.state
            .records
            .iter()
            .map(|e| {
                let record = e.value();
                (
                    e.key().clone(),
                    ProviderHealth {
                        is_operational: record.is_operational,
                        success_rate: record.success_rate(),
                        last_updated: record.last_updated,
                    },
                )
            })
            .collect()
    }

    pub fn records(&self) -> HealthSnapshot {
        self.state.snapshot()
    }

    pub fn record(&self, provider_id: &str) -> Option<HealthRecord> {
        self.state.records.get(provider_id).map(|r| r.value().clone())
    }

    /// Receive a snapshot after every monitoring tick
    pub fn subscribe(&self) -> broadcast::Receiver<HealthSnapshot> {
        self.state.updates.subscribe()
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.handle.abort();
        }
    }
}

impl ProviderStatsSource for HealthMonitor {
    fn provider_stats(&self, provider_id: &str) -> Option<ProviderStats> {
        self.state.records.get(provider_id).map(|record| ProviderStats {
            is_operational: record.is_operational,
            success_rate: record.success_rate(),
            average_processing_time_ms: record.average_processing_time_ms,
            current_liquidity: record.current_liquidity,
        })
    }
}

struct ProbeOutcome {
    provider_id: String,
    healthy: bool,
    liquidity: Option<f64>,
    latency_ms: f64,
}

impl MonitorState {
    fn adapter(&self, provider_id: &str) -> Option<&Arc<dyn BridgeAdapter>> {
        self.adapters.iter().find(|a| a.id() == provider_id)
    }

    fn snapshot(&self) -> HealthSnapshot {
        self.records
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    async fn probe(&self, adapter: &Arc<dyn BridgeAdapter>) -> ProbeOutcome {
        let probe_timeout = self.config.probe_timeout();
        let started = Instant::now();

        let check = AssertUnwindSafe(adapter.health_check()).catch_unwind();
        let healthy = match timeout(probe_timeout, check).await {
            Ok(Ok(healthy)) => healthy,
            Ok(Err(_)) => {
                error!("{} health probe panicked", adapter.id());
                false
            }
            Err(_) => {
                warn!("{} health probe timed out after {:?}", adapter.id(), probe_timeout);
                false
            }
        };
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        let lookup = AssertUnwindSafe(adapter.liquidity()).catch_unwind();
        let liquidity = match timeout(probe_timeout, lookup).await {
            Ok(Ok(Ok(liquidity))) => Some(liquidity),
            Ok(Ok(Err(AdapterError::Unsupported { .. }))) => None,
            Ok(Ok(Err(e))) => {
                debug!("{} liquidity lookup failed: {}", adapter.id(), e);
                None
            }
            Ok(Err(_)) => {
                error!("{} liquidity lookup panicked", adapter.id());
                None
            }
            Err(_) => {
                debug!("{} liquidity lookup timed out", adapter.id());
                None
            }
        };

        ProbeOutcome {
            provider_id: adapter.id().to_string(),
            healthy,
            liquidity,
            latency_ms,
        }
    }

    async fn check_health(&self) -> HealthSnapshot {
        let outcomes = join_all(self.adapters.iter().map(|a| self.probe(a))).await;
        let now = Utc::now();

        for outcome in outcomes {
            let Some(mut record) = self.records.get_mut(&outcome.provider_id) else {
                continue;
            };

            let was = record.state;
            record.set_probe_result(outcome.healthy);
            if let Some(liquidity) = outcome.liquidity {
                record.current_liquidity = liquidity;
            }
            record.last_updated = now;

            if was != record.state {
                info!("{} is now {:?}", outcome.provider_id, record.state);
            }

            let sample = MetricSample::new(
                outcome.latency_ms,
                record.current_liquidity,
                if outcome.healthy {
                    TransactionStatus::Success
                } else {
                    TransactionStatus::Failed
                },
            );
            drop(record);
            self.history.add_metric_at(&outcome.provider_id, sample, now);
        }

        let snapshot = self.snapshot();
        // No subscribers is fine
        let _ = self.updates.send(snapshot.clone());
        snapshot
    }

    /// Count one transaction outcome; anything but success counts as failed
    fn record_transaction(
        &self,
        provider_id: &str,
        status: TransactionStatus,
        processing_time_ms: f64,
    ) -> MonitorResult<()> {
        let mut record = self
            .records
            .get_mut(provider_id)
            .ok_or_else(|| MonitorError::UnknownProvider(provider_id.to_string()))?;

        if status == TransactionStatus::Success {
            record.successful_transactions += 1;
            if processing_time_ms > 0.0 {
                let n = record.successful_transactions as f64;
                record.average_processing_time_ms =
                    (record.average_processing_time_ms * (n - 1.0) + processing_time_ms) / n;
            }
        } else {
            record.failed_transactions += 1;
        }

        let sample = MetricSample::new(
            processing_time_ms,
            record.current_liquidity,
            if status == TransactionStatus::Success {
                TransactionStatus::Success
            } else {
                TransactionStatus::Failed
            },
        );
        debug!(
            "{} transaction {:?} in {:.0}ms ({} ok / {} failed)",
            provider_id,
            status,
            processing_time_ms,
            record.successful_transactions,
            record.failed_transactions
        );
        drop(record);

        self.history.add_metric(provider_id, sample);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::testing::{MockAdapter, MockStatus};

    fn fast_config() -> MonitorConfig {
        MonitorConfig {
            interval_ms: 20,
            probe_timeout_ms: 50,
            tx_poll_interval_ms: 5,
            tx_max_wait_ms: 200,
        }
    }

    fn monitor(adapters: Vec<MockAdapter>) -> HealthMonitor {
        HealthMonitor::new(
            adapters
                .into_iter()
                .map(|a| Arc::new(a) as Arc<dyn BridgeAdapter>)
                .collect(),
            Arc::new(MetricsAggregator::default()),
            fast_config(),
        )
    }

    #[test]
    fn test_initial_state_is_unknown() {
        let monitor = monitor(vec![MockAdapter::net_return("a", 1.0)]);

        let record = monitor.record("a").unwrap();
        assert_eq!(record.state, ProviderState::Unknown);
        assert!(!record.is_operational);

        let status = monitor.get_health_status();
        assert_eq!(status["a"].success_rate, 0.0);
        assert!(!status["a"].is_operational);
    }

    #[test]
    fn test_running_mean_of_processing_time() {
        let monitor = monitor(vec![MockAdapter::net_return("a", 1.0)]);

        monitor.record_transaction("a", TransactionStatus::Success, 100.0).unwrap();
        monitor.record_transaction("a", TransactionStatus::Success, 300.0).unwrap();

        let record = monitor.record("a").unwrap();
        assert_eq!(record.successful_transactions, 2);
        assert!((record.average_processing_time_ms - 200.0).abs() < 1e-9);
        assert_eq!(monitor.history().entries("a").len(), 2);
    }

    #[test]
    fn test_success_rate() {
        let monitor = monitor(vec![MockAdapter::net_return("a", 1.0)]);

        monitor.record_transaction("a", TransactionStatus::Success, 0.0).unwrap();
        monitor.record_transaction("a", TransactionStatus::Failed, 0.0).unwrap();
        monitor.record_transaction("a", TransactionStatus::Failed, 50.0).unwrap();

        let record = monitor.record("a").unwrap();
        assert_eq!(record.failed_transactions, 2);
        // Zero processing time leaves the mean untouched
        assert_eq!(record.average_processing_time_ms, 0.0);
        assert!((monitor.get_health_status()["a"].success_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let monitor = monitor(vec![MockAdapter::net_return("a", 1.0)]);

        let err = monitor
            .record_transaction("nope", TransactionStatus::Success, 10.0)
            .unwrap_err();
        assert!(matches!(err, MonitorError::UnknownProvider(id) if id == "nope"));
        assert!(monitor.record("nope").is_none());
        assert!(monitor.history().entries("nope").is_empty());
    }

    #[tokio::test]
    async fn test_check_health_updates_every_record() {
        let healthy = MockAdapter::net_return("a", 1.0).with_liquidity(250.0);
        let unhealthy = MockAdapter::net_return("b", 1.0);
        unhealthy.set_healthy(false);
        let slow = MockAdapter::net_return("c", 1.0).with_delay(Duration::from_millis(200));

        let monitor = monitor(vec![healthy, unhealthy, slow]);
        let before = monitor.records();

        let snapshot = monitor.check_health().await;

        assert_eq!(snapshot["a"].state, ProviderState::Operational);
        assert_eq!(snapshot["a"].current_liquidity, 250.0);
        assert_eq!(snapshot["b"].state, ProviderState::Degraded);
        // Probe timeout degrades the provider
        assert_eq!(snapshot["c"].state, ProviderState::Degraded);

        for id in ["a", "b", "c"] {
            assert!(snapshot[id].last_updated > before[id].last_updated);
            assert_eq!(monitor.history().entries(id).len(), 1);
        }
        assert_eq!(monitor.history().entries("b")[0].status, TransactionStatus::Failed);
    }

    #[tokio::test]
    async fn test_provider_recovers() {
        let adapter = MockAdapter::net_return("a", 1.0);
        let handle = adapter.clone();
        let monitor = monitor(vec![adapter]);

        handle.set_healthy(false);
        monitor.check_health().await;
        assert_eq!(monitor.record("a").unwrap().state, ProviderState::Degraded);

        handle.set_healthy(true);
        monitor.check_health().await;
        assert!(monitor.record("a").unwrap().is_operational);
    }

    #[tokio::test]
    async fn test_start_and_stop_monitoring() {
        let monitor = monitor(vec![MockAdapter::net_return("a", 1.0)]);
        let mut updates = monitor.subscribe();

        monitor.start_monitoring(Duration::from_millis(20)).unwrap();
        assert!(matches!(
            monitor.start_monitoring(Duration::from_millis(20)),
            Err(MonitorError::AlreadyRunning)
        ));
        assert!(monitor.is_monitoring());

        let snapshot = timeout(Duration::from_secs(2), updates.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot["a"].state, ProviderState::Operational);

        assert!(monitor.stop_monitoring());
        assert!(!monitor.stop_monitoring());
        assert!(!monitor.is_monitoring());

        // Can be restarted after a stop
        monitor.start_monitoring(Duration::from_millis(20)).unwrap();
        assert!(monitor.stop_monitoring());
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        let monitor = monitor(vec![MockAdapter::net_return("a", 1.0)]);
        assert!(matches!(
            monitor.start_monitoring(Duration::ZERO),
            Err(MonitorError::InvalidInterval)
        ));
        assert!(!monitor.stop_monitoring());
    }

    #[tokio::test]
    async fn test_track_transaction_until_success() {
        let adapter = MockAdapter::net_return("a", 1.0).with_statuses(&[
            MockStatus::Pending,
            MockStatus::Pending,
            MockStatus::Success,
        ]);
        let monitor = monitor(vec![adapter]);

        let status = monitor.track_transaction("a", "0xabc").await.unwrap();

        assert_eq!(status, TransactionStatus::Success);
        let record = monitor.record("a").unwrap();
        assert_eq!(record.successful_transactions, 1);
        assert!(record.average_processing_time_ms > 0.0);
        assert!(monitor.pending_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_track_transaction_failures_terminate() {
        let erroring = MockAdapter::net_return("a", 1.0).with_statuses(&[MockStatus::Pending, MockStatus::Error]);
        let stuck = MockAdapter::net_return("b", 1.0).with_statuses(&[MockStatus::Pending]);
        let unsupported = MockAdapter::net_return("c", 1.0);
        let monitor = monitor(vec![erroring, stuck, unsupported]);

        for id in ["a", "b", "c"] {
            let status = monitor.track_transaction(id, &format!("0x{id}")).await.unwrap();
            assert_eq!(status, TransactionStatus::Failed);

            let record = monitor.record(id).unwrap();
            assert_eq!(record.failed_transactions, 1);
            assert_eq!(record.average_processing_time_ms, 0.0);
        }
        assert!(monitor.pending_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_pending_transaction_is_listed_while_polling() {
        let adapter = MockAdapter::net_return("a", 1.0).with_statuses(&[MockStatus::Pending]);
        let monitor = Arc::new(monitor(vec![adapter]));

        let tracker = Arc::clone(&monitor);
        let task = tokio::spawn(async move { tracker.track_transaction("a", "0xfeed").await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        let pending = monitor.pending_transactions();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].tx_hash, "0xfeed");
        assert_eq!(pending[0].provider_id, "a");

        let status = task.await.unwrap().unwrap();
        assert_eq!(status, TransactionStatus::Failed);
        assert!(monitor.pending_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_tracking_is_unlisted() {
        let adapter = MockAdapter::net_return("a", 1.0).with_statuses(&[MockStatus::Pending]);
        let monitor = monitor(vec![adapter]);

        let cancelled = timeout(
            Duration::from_millis(30),
            monitor.track_transaction("a", "0xdead"),
        )
        .await;

        assert!(cancelled.is_err());
        assert!(monitor.pending_transactions().is_empty());
        let record = monitor.record("a").unwrap();
        assert_eq!(record.failed_transactions, 1);
        assert_eq!(record.successful_transactions, 0);
        assert_eq!(record.average_processing_time_ms, 0.0);
    }

    #[tokio::test]
    async fn test_same_hash_on_two_providers_is_listed_twice() {
        let a = MockAdapter::net_return("a", 1.0).with_statuses(&[MockStatus::Pending]);
        let b = MockAdapter::net_return("b", 1.0).with_statuses(&[MockStatus::Pending]);
        let monitor = Arc::new(monitor(vec![a, b]));

        let tasks: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|id| {
                let tracker = Arc::clone(&monitor);
                tokio::spawn(async move { tracker.track_transaction(id, "0xbeef").await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(50)).await;
        let mut providers: Vec<String> = monitor
            .pending_transactions()
            .into_iter()
            .map(|p| p.provider_id)
            .collect();
        providers.sort();
        assert_eq!(providers, vec!["a", "b"]);

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), TransactionStatus::Failed);
        }
        assert!(monitor.pending_transactions().is_empty());
        assert_eq!(monitor.record("a").unwrap().failed_transactions, 1);
        assert_eq!(monitor.record("b").unwrap().failed_transactions, 1);
    }

    #[tokio::test]
    async fn test_track_unknown_provider() {
        let monitor = monitor(vec![]);
        assert!(matches!(
            monitor.track_transaction("x", "0x1").await,
            Err(MonitorError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_stats_source() {
        let monitor = monitor(vec![MockAdapter::net_return("a", 1.0)]);
        monitor.record_transaction("a", TransactionStatus::Success, 120.0).unwrap();

        let stats = monitor.provider_stats("a").unwrap();
        assert_eq!(stats.success_rate, 100.0);
        assert_eq!(stats.average_processing_time_ms, 120.0);
        assert!(monitor.provider_stats("b").is_none());
    }
}
