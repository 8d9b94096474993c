//! Bridge adapter contract
//!
//! Adapters turn a generic [`RouteRequest`] into a provider call and the
//! provider's answer into a [`Quote`]. The rest of the system only sees this
//! trait.
//!
//! Adapters are responsible for their own call timeout. An adapter whose
//! future never resolves stalls the whole comparison cycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{AdapterError, AdapterResult, Quote, RouteRequest};

/// Outcome of a bridge transaction as seen by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

/// Base trait for bridge providers
#[async_trait]
pub trait BridgeAdapter: Send + Sync + Debug {
    /// Stable provider identifier (e.g. `crosscurve`)
    fn id(&self) -> &str;

    /// Display name (e.g. `CrossCurve`)
    fn name(&self) -> &str;

    /// Fetch and parse a quote from the provider
    async fn fetch_quote(&self, request: &RouteRequest) -> AdapterResult<Quote>;

    /// Quote or a definite "no route"; provider errors never escape
    async fn get_route(&self, request: &RouteRequest) -> Option<Quote> {
        match self.fetch_quote(request).await {
            Ok(quote) => {
                debug!("{} quoted {} route steps", self.id(), quote.route.step_count());
                Some(quote)
            }
            Err(AdapterError::NoRoute { .. }) => {
                debug!("{} has no route", self.id());
                None
            }
            Err(e @ AdapterError::Unsupported { .. }) => {
                debug!("{}", e);
                None
            }
            Err(e) => {
                warn!("{} route error: {}", self.id(), e);
                None
            }
        }
    }

    /// Liveness probe with a canned low-cost request
    async fn health_check(&self) -> bool {
        self.get_route(&RouteRequest::probe()).await.is_some()
    }

    /// Current liquidity snapshot in a provider-defined unit
    async fn liquidity(&self) -> AdapterResult<f64> {
        Err(AdapterError::Unsupported {
            provider: self.id().to_string(),
            operation: "liquidity".to_string(),
        })
    }

    /// Status of a previously submitted bridge transaction
    async fn transaction_status(&self, _tx_hash: &str) -> AdapterResult<TransactionStatus> {
        Err(AdapterError::Unsupported {
            provider: self.id().to_string(),
            operation: "transaction_status".to_string(),
        })
    }
}

/// Operational statistics for one provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStats {
    pub is_operational: bool,
    /// 0..=100
    pub success_rate: f64,
    pub average_processing_time_ms: f64,
    pub current_liquidity: f64,
}

/// Read-only source of provider statistics, used for informational scoring
pub trait ProviderStatsSource: Send + Sync {
    fn provider_stats(&self, provider_id: &str) -> Option<ProviderStats>;
}
