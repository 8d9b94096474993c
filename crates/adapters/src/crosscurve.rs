//! CrossCurve adapter
//!
//! Quotes come from `POST {api}/routing/scan`; the answer is an array of
//! candidate routes and the first one is used.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use bridge_core::{
    AdapterError, AdapterResult, BridgeAdapter, GasCost, ProviderConfig, Quote, RoutePayload,
    RouteRequest,
};

use crate::http::{build_client, endpoint, post_json};
use crate::parse::{f64_field, steps_field, u256_field, u64_field};

/// Gas estimate assumed when the provider omits one (gwei scale)
pub const DEFAULT_GAS_ESTIMATE: u64 = 500_000;

#[derive(Debug)]
pub struct CrossCurveAdapter {
    config: ProviderConfig,
    api_url: String,
    client: Client,
}

impl CrossCurveAdapter {
    pub fn new(config: ProviderConfig) -> AdapterResult<Self> {
        let api_url = config.api_url.clone().ok_or_else(|| AdapterError::Http {
            provider: config.id.clone(),
            message: "api_url not configured".to_string(),
        })?;
        let client = build_client(&config)?;

        Ok(Self {
            config,
            api_url,
            client,
        })
    }

    pub fn request_body(&self, request: &RouteRequest) -> Value {
        json!({
            "params": {
                "chainIdIn": request.source_chain.chain_id(),
                "chainIdOut": request.dest_chain.chain_id(),
                "tokenIn": request.source_token,
                "tokenOut": request.dest_token,
                "amountIn": request.amount.to_string(),
            },
            "slippage": self.config.slippage_percent,
        })
    }
}

/// Turn a `/routing/scan` answer into a quote
///
/// Field policy:
/// - `totalFee.amount` absent: fee is 0
/// - `gasEstimate` absent: [`DEFAULT_GAS_ESTIMATE`], gwei scale
/// - `priceImpact` absent: 0
/// - `amountOut` absent: the requested input amount
pub fn parse_scan_response(
    provider_id: &str,
    body: &Value,
    request: &RouteRequest,
    estimated_time_seconds: u64,
) -> AdapterResult<Quote> {
    let best = match body.as_array().and_then(|routes| routes.first()) {
        Some(route) => route,
        None => {
            return Err(AdapterError::NoRoute {
                provider: provider_id.to_string(),
            })
        }
    };

    if !best.is_object() {
        return Err(AdapterError::InvalidResponse {
            provider: provider_id.to_string(),
            message: "route entry is not an object".to_string(),
        });
    }

    let fee = u256_field(best.pointer("/totalFee/amount")).unwrap_or_default();
    let gas = u64_field(best.get("gasEstimate")).unwrap_or(DEFAULT_GAS_ESTIMATE);
    let price_impact = f64_field(best.get("priceImpact")).unwrap_or(0.0);
    let amount_out = u256_field(best.get("amountOut")).unwrap_or(request.amount);

    Ok(
        Quote::new(provider_id, RoutePayload::Steps(steps_field(best.get("route"))), request)
            .with_fee(fee)
            .with_gas(GasCost::Gwei(gas))
            .with_price_impact(price_impact)
            .with_amount_out(amount_out)
            .with_estimated_time(estimated_time_seconds),
    )
}

#[async_trait]
impl BridgeAdapter for CrossCurveAdapter {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    async fn fetch_quote(&self, request: &RouteRequest) -> AdapterResult<Quote> {
        let url = endpoint(&self.api_url, "routing/scan");
        let body = self.request_body(request);
        let response = post_json(&self.client, self.id(), &url, &body, self.config.timeout()).await?;

        parse_scan_response(
            self.id(),
            &response,
            request,
            self.config.estimated_time_seconds,
        )
    }
}
