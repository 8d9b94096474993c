//! Configuration types

use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::{ChainId, CoreError, CoreResult, RouteRequest, ONE_NATIVE, PROBE_DEST_TOKEN, PROBE_SOURCE_TOKEN};

/// Provider implementations known to the adapter factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    CrossCurve,
    Rubic,
    DeBridge,
}

impl ProviderKind {
    /// Whether the adapter talks to a remote HTTP API
    pub fn requires_api_url(&self) -> bool {
        matches!(self, ProviderKind::CrossCurve | ProviderKind::Rubic)
    }
}

/// Per-provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub id: String,
    pub name: String,
    pub kind: ProviderKind,
    pub api_url: Option<String>,
    pub enabled: bool,
    pub timeout_ms: u64,
    pub contract_address: Option<Address>,
    /// Native coin price used to convert USD-denominated gas at ingestion
    pub native_price_usd: Option<f64>,
    /// Flat protocol fee in smallest units, for providers without a quote API
    pub fixed_fee: Option<String>,
    pub estimated_time_seconds: u64,
    pub slippage_percent: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            kind: ProviderKind::CrossCurve,
            api_url: None,
            enabled: true,
            timeout_ms: 10_000,
            contract_address: None,
            native_price_usd: None,
            fixed_fee: None,
            estimated_time_seconds: 300,
            slippage_percent: 0.5,
        }
    }
}

impl ProviderConfig {
    pub fn crosscurve() -> Self {
        Self {
            id: "crosscurve".to_string(),
            name: "CrossCurve".to_string(),
            kind: ProviderKind::CrossCurve,
            api_url: Some("https://api.crosscurve.fi".to_string()),
            contract_address: Some(address!("7A10F506E4c7658e6AD15Fdf0443d450B7FA80D7")),
            ..Default::default()
        }
    }

    pub fn rubic() -> Self {
        Self {
            id: "rubic".to_string(),
            name: "Rubic".to_string(),
            kind: ProviderKind::Rubic,
            api_url: Some("https://api-v2.rubic.exchange/api".to_string()),
            contract_address: Some(address!("D8b19613723215EF8CC80fC35A1428f8E8826940")),
            ..Default::default()
        }
    }

    pub fn debridge() -> Self {
        Self {
            id: "debridge".to_string(),
            name: "DeBridge".to_string(),
            kind: ProviderKind::DeBridge,
            contract_address: Some(address!("2328Ee20fA271073328DC94e52Dd5b61aa0C91A7")),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Health monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub interval_ms: u64,
    pub probe_timeout_ms: u64,
    pub tx_poll_interval_ms: u64,
    pub tx_max_wait_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 30_000,
            probe_timeout_ms: 10_000,
            tx_poll_interval_ms: 5_000,
            tx_max_wait_ms: 30 * 60 * 1000,
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn tx_poll_interval(&self) -> Duration {
        Duration::from_millis(self.tx_poll_interval_ms)
    }

    pub fn tx_max_wait(&self) -> Duration {
        Duration::from_millis(self.tx_max_wait_ms)
    }
}

/// Rolling history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub retention_secs: u64,
    pub default_window_secs: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention_secs: 24 * 60 * 60,
            default_window_secs: 60 * 60,
        }
    }
}

/// Weights of the informational composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub speed: f64,
    pub cost: f64,
    pub liquidity: f64,
    pub reliability: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            speed: 0.25,
            cost: 0.35,
            liquidity: 0.20,
            reliability: 0.20,
        }
    }
}

impl ScoreWeights {
    fn values(&self) -> [f64; 4] {
        [self.speed, self.cost, self.liquidity, self.reliability]
    }
}

/// Route request issued by the command line tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub source_chain: u64,
    pub dest_chain: u64,
    pub source_token: Address,
    pub dest_token: Address,
    pub amount: String,
    pub from_address: Address,
    pub receiver: Address,
}

impl Default for RequestConfig {
    fn default() -> Self {
        let wallet = address!("7A10F506E4c7658e6AD15Fdf0443d450B7FA80D7");
        Self {
            source_chain: ChainId::Ethereum.chain_id(),
            dest_chain: ChainId::Polygon.chain_id(),
            source_token: PROBE_SOURCE_TOKEN,
            dest_token: PROBE_DEST_TOKEN,
            amount: ONE_NATIVE.to_string(),
            from_address: wallet,
            receiver: wallet,
        }
    }
}

impl RequestConfig {
    pub fn to_request(&self) -> CoreResult<RouteRequest> {
        let amount: U256 = crate::parse_amount(&self.amount)?;
        Ok(RouteRequest::new(
            ChainId::try_from(self.source_chain)?,
            ChainId::try_from(self.dest_chain)?,
            self.source_token,
            self.dest_token,
            amount,
        )
        .with_from_address(self.from_address)
        .with_receiver(self.receiver))
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub providers: Vec<ProviderConfig>,
    pub monitor: MonitorConfig,
    pub history: HistoryConfig,
    pub scoring: ScoreWeights,
    pub request: RequestConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            providers: vec![
                ProviderConfig::crosscurve(),
                ProviderConfig::rubic(),
                ProviderConfig::debridge(),
            ],
            monitor: MonitorConfig::default(),
            history: HistoryConfig::default(),
            scoring: ScoreWeights::default(),
            request: RequestConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn enabled_providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.enabled)
    }

    pub fn get_provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Reject configurations the runtime cannot work with
    pub fn validate(&self) -> CoreResult<()> {
        if self.enabled_providers().next().is_none() {
            return Err(CoreError::InvalidConfig("no enabled providers".to_string()));
        }

        let mut seen = HashSet::new();
        for provider in &self.providers {
            if provider.id.trim().is_empty() {
                return Err(CoreError::InvalidConfig("provider with empty id".to_string()));
            }
            if !seen.insert(provider.id.as_str()) {
                return Err(CoreError::InvalidConfig(format!(
                    "duplicate provider id '{}'",
                    provider.id
                )));
            }
            if !provider.enabled {
                continue;
            }
            let missing_url = provider
                .api_url
                .as_deref()
                .map_or(true, |url| url.trim().is_empty());
            if provider.kind.requires_api_url() && missing_url {
                return Err(CoreError::InvalidConfig(format!(
                    "provider '{}' has no api_url",
                    provider.id
                )));
            }
            if let Some(fee) = &provider.fixed_fee {
                crate::parse_amount(fee).map_err(|e| {
                    CoreError::InvalidConfig(format!("provider '{}' fixed_fee: {}", provider.id, e))
                })?;
            }
            if provider.timeout_ms == 0 {
                return Err(CoreError::InvalidConfig(format!(
                    "provider '{}' has a zero timeout",
                    provider.id
                )));
            }
        }

        if self.monitor.interval_ms == 0 {
            return Err(CoreError::InvalidConfig("monitor interval must be positive".to_string()));
        }
        if self.history.retention_secs < self.history.default_window_secs {
            return Err(CoreError::InvalidConfig(
                "history retention is shorter than the default window".to_string(),
            ));
        }
        if self.scoring.values().iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CoreError::InvalidConfig("score weights must be non-negative".to_string()));
        }

        Ok(())
    }
}
