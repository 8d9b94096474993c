//! Unit normalization of provider quotes
//!
//! Providers report fees and amounts in smallest-unit integers and gas in
//! provider-specific scales. Everything is converted to native coin units
//! here so quotes from different providers can be compared directly.
//!
//! All assets are assumed to have 18 decimals. Tokens with other decimals
//! (USDC, WBTC, ...) are a known gap and will be mis-scaled.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{GasCost, Quote};

/// Decimals assumed for every asset
pub const NATIVE_DECIMALS: u8 = 18;

/// Gas-price-scale units per native coin
pub const GAS_UNITS_PER_NATIVE: f64 = 1e9;

/// Unit-consistent view of a single quote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMetrics {
    pub fee_in_native_units: f64,
    pub gas_in_native_units: f64,
    pub amount_out_in_native_units: f64,
    pub total_cost: f64,
    pub net_return: f64,
    pub estimated_time_seconds: u64,
    pub price_impact_percent: f64,
}

/// Converts quotes into [`NormalizedMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsNormalizer {
    decimals: u8,
}

impl MetricsNormalizer {
    pub fn new() -> Self {
        Self { decimals: NATIVE_DECIMALS }
    }

    pub fn with_decimals(decimals: u8) -> Self {
        Self { decimals }
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Smallest-unit integer to native units
    pub fn to_native(&self, amount: U256) -> f64 {
        let raw: f64 = amount.to_string().parse().unwrap_or(0.0);
        raw / 10f64.powi(self.decimals as i32)
    }

    pub fn gas_to_native(&self, gas: GasCost) -> f64 {
        match gas {
            GasCost::Gwei(units) => units as f64 / GAS_UNITS_PER_NATIVE,
            GasCost::Native(value) => value,
        }
    }

    pub fn normalize(&self, quote: &Quote) -> NormalizedMetrics {
        let fee = self.to_native(quote.fee_smallest_unit);
        let gas = self.gas_to_native(quote.gas);
        let amount_out = self.to_native(quote.amount_out_smallest_unit);
        let total_cost = fee + gas;

        NormalizedMetrics {
            fee_in_native_units: fee,
            gas_in_native_units: gas,
            amount_out_in_native_units: amount_out,
            total_cost,
            net_return: amount_out - total_cost,
            estimated_time_seconds: quote.estimated_time_seconds,
            price_impact_percent: quote.price_impact_percent,
        }
    }
}

impl Default for MetricsNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&Quote> for NormalizedMetrics {
    fn from(quote: &Quote) -> Self {
        MetricsNormalizer::new().normalize(quote)
    }
}
