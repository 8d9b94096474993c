//! Route request and quote types

use alloy_primitives::{address, Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{ChainId, CoreError, CoreResult};

/// One smallest-unit amount of an 18-decimal asset (1 ETH in wei)
pub const ONE_NATIVE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// WETH on Ethereum, used by the synthetic probe request
pub const PROBE_SOURCE_TOKEN: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
/// WETH on Polygon, used by the synthetic probe request
pub const PROBE_DEST_TOKEN: Address = address!("7ceB23fD6bC0adD59E62ac25578270cFf1b9f619");

/// Generic cross-chain route request sent to every adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub source_chain: ChainId,
    pub dest_chain: ChainId,
    pub source_token: Address,
    pub dest_token: Address,
    /// Input amount in the source asset's smallest unit
    #[serde(with = "decimal_amount")]
    pub amount: U256,
    pub from_address: Address,
    pub receiver: Address,
}

impl RouteRequest {
    pub fn new(
        source_chain: ChainId,
        dest_chain: ChainId,
        source_token: Address,
        dest_token: Address,
        amount: U256,
    ) -> Self {
        Self {
            source_chain,
            dest_chain,
            source_token,
            dest_token,
            amount,
            from_address: Address::ZERO,
            receiver: Address::ZERO,
        }
    }

    pub fn with_from_address(mut self, from: Address) -> Self {
        self.from_address = from;
        self
    }

    pub fn with_receiver(mut self, receiver: Address) -> Self {
        self.receiver = receiver;
        self
    }

    /// Canned low-cost request used for liveness probes: 1 WETH Ethereum -> Polygon
    pub fn probe() -> Self {
        Self::new(
            ChainId::Ethereum,
            ChainId::Polygon,
            PROBE_SOURCE_TOKEN,
            PROBE_DEST_TOKEN,
            ONE_NATIVE,
        )
    }

    /// Sender address, falling back to the receiver when unset
    pub fn sender(&self) -> Address {
        if self.from_address.is_zero() {
            self.receiver
        } else {
            self.from_address
        }
    }
}

/// Parse a string-encoded integer amount (decimal, or hex with `0x`)
pub fn parse_amount(raw: &str) -> CoreResult<U256> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::InvalidAmount("empty amount".to_string()));
    }
    raw.parse::<U256>()
        .map_err(|e| CoreError::InvalidAmount(format!("{raw}: {e}")))
}

mod decimal_amount {
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_amount(&raw).map_err(serde::de::Error::custom)
    }
}

/// Provider-specific route, passed through to the caller unmodified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RoutePayload {
    /// Ordered execution steps as returned by the provider
    Steps(Vec<serde_json::Value>),
    /// Pre-encoded call data for providers that do not return steps
    Encoded(Bytes),
}

impl RoutePayload {
    /// A route is usable only when it carries at least one step or some payload bytes
    pub fn is_present(&self) -> bool {
        match self {
            RoutePayload::Steps(steps) => !steps.is_empty(),
            RoutePayload::Encoded(data) => !data.is_empty(),
        }
    }

    pub fn step_count(&self) -> usize {
        match self {
            RoutePayload::Steps(steps) => steps.len(),
            RoutePayload::Encoded(_) => 1,
        }
    }
}

/// Gas cost as reported by a provider
///
/// Adapters decide the unit at ingestion; the normalizer never guesses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum GasCost {
    /// Gas-price-scale units; 10^9 of them make one native coin
    Gwei(u64),
    /// Already expressed in native coin units
    Native(f64),
}

impl Default for GasCost {
    fn default() -> Self {
        GasCost::Gwei(0)
    }
}

/// One provider's answer to a route request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub provider_id: String,
    pub route: RoutePayload,
    pub fee_smallest_unit: U256,
    pub gas: GasCost,
    pub estimated_time_seconds: u64,
    /// 0 when the provider does not report it
    pub price_impact_percent: f64,
    pub amount_out_smallest_unit: U256,
}

impl Quote {
    /// Start a quote whose output defaults to the requested input amount
    pub fn new(provider_id: impl Into<String>, route: RoutePayload, request: &RouteRequest) -> Self {
        Self {
            provider_id: provider_id.into(),
            route,
            fee_smallest_unit: U256::ZERO,
            gas: GasCost::default(),
            estimated_time_seconds: 0,
            price_impact_percent: 0.0,
            amount_out_smallest_unit: request.amount,
        }
    }

    pub fn with_fee(mut self, fee: U256) -> Self {
        self.fee_smallest_unit = fee;
        self
    }

    pub fn with_gas(mut self, gas: GasCost) -> Self {
        self.gas = gas;
        self
    }

    pub fn with_estimated_time(mut self, seconds: u64) -> Self {
        self.estimated_time_seconds = seconds;
        self
    }

    pub fn with_price_impact(mut self, percent: f64) -> Self {
        self.price_impact_percent = percent;
        self
    }

    pub fn with_amount_out(mut self, amount: U256) -> Self {
        self.amount_out_smallest_unit = amount;
        self
    }

    /// Whether this quote may enter the candidate set
    pub fn is_usable(&self) -> bool {
        self.route.is_present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1000000000000000000").unwrap(), ONE_NATIVE);
        assert_eq!(parse_amount("0x10").unwrap(), U256::from(16u64));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("1.5").is_err());
        assert!(parse_amount("-3").is_err());
    }

    #[test]
    fn test_request_amount_is_decimal_string() {
        let request = RouteRequest::probe();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["amount"], "1000000000000000000");
        assert_eq!(json["sourceChain"], 1);
        assert_eq!(json["destChain"], 137);

        let back: RouteRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_sender_falls_back_to_receiver() {
        let receiver = Address::repeat_byte(7);
        let request = RouteRequest::probe().with_receiver(receiver);
        assert_eq!(request.sender(), receiver);

        let from = Address::repeat_byte(9);
        assert_eq!(request.with_from_address(from).sender(), from);
    }

    #[test]
    fn test_route_presence() {
        assert!(!RoutePayload::Steps(vec![]).is_present());
        assert!(RoutePayload::Steps(vec![serde_json::json!({"type": "bridge"})]).is_present());
        assert!(!RoutePayload::Encoded(Bytes::new()).is_present());
        assert!(RoutePayload::Encoded(Bytes::from_static(&[0xab])).is_present());
    }

    #[test]
    fn test_quote_amount_out_defaults_to_input() {
        let request = RouteRequest::probe();
        let quote = Quote::new("crosscurve", RoutePayload::Steps(vec![]), &request);

        assert_eq!(quote.amount_out_smallest_unit, request.amount);
        assert_eq!(quote.fee_smallest_unit, U256::ZERO);
        assert!(!quote.is_usable());
    }
}
