//! Rubic adapter
//!
//! Rubic reports gas as a USD amount per transaction. It is converted to
//! native units here, with the configured native coin price, because the
//! normalizer has no notion of fiat prices.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use bridge_core::{
    AdapterError, AdapterResult, BridgeAdapter, GasCost, ProviderConfig, Quote, RoutePayload,
    RouteRequest,
};

use crate::http::{build_client, endpoint, post_json};
use crate::parse::{f64_field, steps_field, u256_field};

pub const REFERRER: &str = "rubic.exchange";

#[derive(Debug)]
pub struct RubicAdapter {
    config: ProviderConfig,
    api_url: String,
    client: Client,
}

impl RubicAdapter {
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
                "srcTokenAddress": request.source_token,
                "dstTokenAddress": request.dest_token,
                "srcTokenAmount": request.amount.to_string(),
                "fromAddress": request.sender(),
                "receiver": request.receiver,
                "referrer": REFERRER,
                "slippage": self.config.slippage_percent,
                "srcTokenBlockchain": request.source_chain.blockchain_name(),
                "dstTokenBlockchain": request.dest_chain.blockchain_name(),
            }
        })
    }
}

/// Turn a `/routes/quoteBest` answer into a quote
///
/// Field policy:
/// - fee: `route[0].totalFee.amount`, 0 when absent
/// - gas: sum of `route[0].txs[].gasFeeUsd` divided by `native_price_usd`;
///   0 when no price is configured
/// - `priceImpact`: `route[0].priceImpact`, 0 when absent
/// - amount out: not reported, so the requested input amount
pub fn parse_quote_response(
    provider_id: &str,
    body: &Value,
    request: &RouteRequest,
    estimated_time_seconds: u64,
    native_price_usd: Option<f64>,
) -> AdapterResult<Quote> {
    if body.is_null() {
        return Err(AdapterError::NoRoute {
            provider: provider_id.to_string(),
        });
    }
    if !body.is_object() {
        return Err(AdapterError::InvalidResponse {
            provider: provider_id.to_string(),
            message: "expected a JSON object".to_string(),
        });
    }

    let steps = steps_field(body.get("route"));
    let first = steps.first();

    let fee = u256_field(first.and_then(|s| s.pointer("/totalFee/amount"))).unwrap_or_default();
    let price_impact = f64_field(first.and_then(|s| s.get("priceImpact"))).unwrap_or(0.0);
    let gas_usd: f64 = first
        .and_then(|s| s.get("txs"))
        .and_then(Value::as_array)
        .map(|txs| txs.iter().filter_map(|tx| f64_field(tx.get("gasFeeUsd"))).sum::<f64>())
        .unwrap_or(0.0);

    let gas_native = match native_price_usd {
        Some(price) if price > 0.0 => gas_usd / price,
        _ => {
            if gas_usd > 0.0 {
                debug!(
                    "{} reported {:.4} USD gas but no native price is configured",
                    provider_id, gas_usd
                );
            }
            0.0
        }
    };

    Ok(Quote::new(provider_id, RoutePayload::Steps(steps), request)
        .with_fee(fee)
        .with_gas(GasCost::Native(gas_native))
        .with_price_impact(price_impact)
        .with_estimated_time(estimated_time_seconds))
}

#[async_trait]
impl BridgeAdapter for RubicAdapter {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    async fn fetch_quote(&self, request: &RouteRequest) -> AdapterResult<Quote> {
        let url = endpoint(&self.api_url, "routes/quoteBest");
        let body = self.request_body(request);
        let response = post_json(&self.client, self.id(), &url, &body, self.config.timeout()).await?;

        parse_quote_response(
            self.id(),
            &response,
            request,
            self.config.estimated_time_seconds,
            self.config.native_price_usd,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};

    fn response() -> Value {
        json!({
            "route": [
                {
                    "totalFee": {"amount": "1500000000000000"},
                    "priceImpact": 0.3,
                    "txs": [{"gasFeeUsd": 2.5}, {"gasFeeUsd": "1.5"}, {"other": 1}]
                },
                {"type": "bridge"}
            ]
        })
    }

    #[test]
    fn test_request_body_uses_blockchain_names() {
        let adapter = RubicAdapter::new(ProviderConfig::rubic()).unwrap();
        let receiver = Address::repeat_byte(3);
        let body = adapter.request_body(&RouteRequest::probe().with_receiver(receiver));

        let params = &body["params"];
        assert_eq!(params["srcTokenBlockchain"], "ETH");
        assert_eq!(params["dstTokenBlockchain"], "POLYGON");
        assert_eq!(params["referrer"], REFERRER);
        // No explicit sender: the receiver is used
        assert_eq!(params["fromAddress"], params["receiver"]);
    }

    #[test]
    fn test_parse_converts_usd_gas() {
        let request = RouteRequest::probe();
        let quote = parse_quote_response("rubic", &response(), &request, 300, Some(2000.0)).unwrap();

        assert_eq!(quote.route.step_count(), 2);
        assert_eq!(quote.fee_smallest_unit, U256::from(1_500_000_000_000_000u64));
        assert_eq!(quote.gas, GasCost::Native(0.002));
        assert_eq!(quote.price_impact_percent, 0.3);
        assert_eq!(quote.amount_out_smallest_unit, request.amount);
    }

    #[test]
    fn test_parse_without_price_records_zero_gas() {
        let quote = parse_quote_response("rubic", &response(), &RouteRequest::probe(), 300, None).unwrap();
        assert_eq!(quote.gas, GasCost::Native(0.0));
    }

    #[test]
    fn test_parse_empty_route() {
        let quote =
            parse_quote_response("rubic", &json!({"route": []}), &RouteRequest::probe(), 300, None)
                .unwrap();
        assert!(!quote.is_usable());
        assert_eq!(quote.fee_smallest_unit, U256::ZERO);
    }

    #[test]
    fn test_parse_null_and_garbage() {
        let request = RouteRequest::probe();
        assert!(matches!(
            parse_quote_response("rubic", &Value::Null, &request, 300, None),
            Err(AdapterError::NoRoute { .. })
        ));
        assert!(matches!(
            parse_quote_response("rubic", &json!([1, 2]), &request, 300, None),
            Err(AdapterError::InvalidResponse { .. })
        ));
    }
}
