//! Scriptable adapter for tests
//!
//! Enabled with the `testing` feature. Clones share their call counter,
//! health flag and status script, so a test can keep a handle while the
//! component under test owns another.

use alloy_primitives::U256;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    AdapterError, AdapterResult, BridgeAdapter, GasCost, Quote, RoutePayload, RouteRequest,
    TransactionStatus,
};

/// What `fetch_quote` does
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Quote with zero costs and the given output in native units
    NetReturn(f64),
    /// Fixed quote, re-stamped with this adapter's id
    Quote(Quote),
    /// Quote whose route has no steps
    EmptyRoute,
    /// Provider error
    Fail,
    /// Panic inside the adapter future
    Panic,
}

/// Scripted status answer for `transaction_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStatus {
    Pending,
    Success,
    Failed,
    Error,
}

#[derive(Debug, Clone)]
pub struct MockAdapter {
    id: String,
    name: String,
    outcome: MockOutcome,
    delay: Duration,
    estimated_time_seconds: u64,
    liquidity: Option<f64>,
    healthy: Arc<AtomicBool>,
    statuses: Arc<Mutex<VecDeque<MockStatus>>>,
    calls: Arc<AtomicUsize>,
}

impl MockAdapter {
    pub fn new(id: &str, outcome: MockOutcome) -> Self {
        Self {
            id: id.to_string(),
            name: format!("{id} mock"),
            outcome,
            delay: Duration::ZERO,
            estimated_time_seconds: 300,
            liquidity: None,
            healthy: Arc::new(AtomicBool::new(true)),
            statuses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn net_return(id: &str, net: f64) -> Self {
        Self::new(id, MockOutcome::NetReturn(net))
    }

    pub fn failing(id: &str) -> Self {
        Self::new(id, MockOutcome::Fail)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_estimated_time(mut self, seconds: u64) -> Self {
        self.estimated_time_seconds = seconds;
        self
    }

    pub fn with_liquidity(mut self, liquidity: f64) -> Self {
        self.liquidity = Some(liquidity);
        self
    }

    pub fn with_statuses(self, statuses: &[MockStatus]) -> Self {
        self.statuses.lock().extend(statuses.iter().copied());
        self
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Number of `fetch_quote` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn build_quote(&self, request: &RouteRequest) -> AdapterResult<Quote> {
        match &self.outcome {
            MockOutcome::NetReturn(net) => {
                let amount_out = U256::from((net * 1e18) as u128);
                Ok(Quote::new(&self.id, steps(), request)
                    .with_amount_out(amount_out)
                    .with_gas(GasCost::Gwei(0))
                    .with_estimated_time(self.estimated_time_seconds))
            }
            MockOutcome::Quote(quote) => Ok(Quote {
                provider_id: self.id.clone(),
                ..quote.clone()
            }),
            MockOutcome::EmptyRoute => Ok(Quote::new(&self.id, RoutePayload::Steps(vec![]), request)),
            MockOutcome::Fail => Err(AdapterError::Http {
                provider: self.id.clone(),
                message: "mock failure".to_string(),
            }),
            MockOutcome::Panic => panic!("mock adapter {} panicked", self.id),
        }
    }
}

fn steps() -> RoutePayload {
    RoutePayload::Steps(vec![serde_json::json!({ "type": "bridge", "protocol": "mock" })])
}

#[async_trait]
impl BridgeAdapter for MockAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_quote(&self, request: &RouteRequest) -> AdapterResult<Quote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.build_quote(request)
    }

    async fn health_check(&self) -> bool {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.healthy.load(Ordering::SeqCst)
    }

    async fn liquidity(&self) -> AdapterResult<f64> {
        self.liquidity.ok_or_else(|| AdapterError::Unsupported {
            provider: self.id.clone(),
            operation: "liquidity".to_string(),
        })
    }

    async fn transaction_status(&self, _tx_hash: &str) -> AdapterResult<TransactionStatus> {
        let next = {
            let mut script = self.statuses.lock();
            // The last scripted answer repeats forever
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().copied()
            }
        };

        match next {
            Some(MockStatus::Pending) => Ok(TransactionStatus::Pending),
            Some(MockStatus::Success) => Ok(TransactionStatus::Success),
            Some(MockStatus::Failed) => Ok(TransactionStatus::Failed),
            Some(MockStatus::Error) => Err(AdapterError::Http {
                provider: self.id.clone(),
                message: "status lookup failed".to_string(),
            }),
            None => Err(AdapterError::Unsupported {
                provider: self.id.clone(),
                operation: "transaction_status".to_string(),
            }),
        }
    }
}
