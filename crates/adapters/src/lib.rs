//! Bridge provider adapters
//!
//! Each adapter owns its request construction, response parsing and
//! defaulting policy, and enforces its own call timeout:
//! - CrossCurve (`/routing/scan`)
//! - Rubic (`/routes/quoteBest`)
//! - deBridge (locally encoded gate call)

pub mod crosscurve;
pub mod debridge;
pub mod http;
pub mod parse;
pub mod rubic;

use std::sync::Arc;
use tracing::info;

use bridge_core::{AdapterResult, AppConfig, BridgeAdapter, ProviderConfig, ProviderKind};

pub use crosscurve::CrossCurveAdapter;
pub use debridge::DeBridgeAdapter;
pub use rubic::RubicAdapter;

/// Build the adapter for one provider entry
pub fn build_adapter(config: &ProviderConfig) -> AdapterResult<Arc<dyn BridgeAdapter>> {
    let adapter: Arc<dyn BridgeAdapter> = match config.kind {
        ProviderKind::CrossCurve => Arc::new(CrossCurveAdapter::new(config.clone())?),
        ProviderKind::Rubic => Arc::new(RubicAdapter::new(config.clone())?),
        ProviderKind::DeBridge => Arc::new(DeBridgeAdapter::new(config.clone())?),
    };
    Ok(adapter)
}

/// Build adapters for every enabled provider, in configuration order
pub fn build_adapters(config: &AppConfig) -> AdapterResult<Vec<Arc<dyn BridgeAdapter>>> {
    let adapters = config
        .enabled_providers()
        .map(build_adapter)
        .collect::<AdapterResult<Vec<_>>>()?;

    info!(
        "Configured {} bridge adapters: {}",
        adapters.len(),
        adapters.iter().map(|a| a.id()).collect::<Vec<_>>().join(", ")
    );
    Ok(adapters)
}
