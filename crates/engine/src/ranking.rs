//! Ranking of normalized quotes

use serde::Serialize;
use std::cmp::Ordering;

use bridge_core::{BridgeBreakdown, BridgeResult, MetricsNormalizer, Quote, Savings};

/// A usable quote together with the display name of the adapter that produced it
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub name: String,
    pub quote: Quote,
}

impl Candidate {
    pub fn new(name: impl Into<String>, quote: Quote) -> Self {
        Self {
            name: name.into(),
            quote,
        }
    }
}

/// Orders bridge results by net return
///
/// Ties on net return go to the faster route, then to the smaller
/// provider id, so the order never depends on fetch completion order.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    normalizer: MetricsNormalizer,
}

impl RankingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(normalizer: MetricsNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &MetricsNormalizer {
        &self.normalizer
    }

    /// Normalize every candidate and sort best-first
    pub fn rank(&self, candidates: Vec<Candidate>) -> Vec<BridgeResult> {
        let mut results: Vec<BridgeResult> = candidates
            .into_iter()
            .map(|c| BridgeResult {
                metrics: self.normalizer.normalize(&c.quote),
                provider_id: c.quote.provider_id,
                name: c.name,
                route: c.quote.route,
            })
            .collect();

        results.sort_by(compare_results);
        results
    }

    /// Presentation row relative to the input amount (native units)
    pub fn breakdown(&self, result: &BridgeResult, input_amount: f64) -> BridgeBreakdown {
        let m = &result.metrics;
        let relative = |value: f64| (input_amount > 0.0).then(|| value / input_amount * 100.0);

        BridgeBreakdown {
            provider_id: result.provider_id.clone(),
            name: result.name.clone(),
            output_amount: m.amount_out_in_native_units,
            fee: m.fee_in_native_units,
            gas_cost: m.gas_in_native_units,
            total_cost: m.total_cost,
            net_return: m.net_return,
            slippage_percent: relative(input_amount - m.amount_out_in_native_units),
            efficiency_percent: relative(m.net_return),
            estimated_time_seconds: m.estimated_time_seconds,
            price_impact_percent: m.price_impact_percent,
            score: None,
        }
    }
}

/// Best-first ordering of two results
pub fn compare_results(a: &BridgeResult, b: &BridgeResult) -> Ordering {
    b.metrics
        .net_return
        .total_cmp(&a.metrics.net_return)
        .then_with(|| {
            a.metrics
                .estimated_time_seconds
                .cmp(&b.metrics.estimated_time_seconds)
        })
        .then_with(|| a.provider_id.cmp(&b.provider_id))
}

/// Advantage of the first result over the second, for two or more results
pub fn savings(results: &[BridgeResult]) -> Option<Savings> {
    let [best, second, ..] = results else {
        return None;
    };

    let amount = best.net_return() - second.net_return();
    let percent = if second.net_return() == 0.0 {
        None
    } else {
        Some(amount / second.net_return() * 100.0).filter(|p| p.is_finite())
    };

    Some(Savings {
        versus: second.provider_id.clone(),
        amount,
        percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use bridge_core::{GasCost, RoutePayload, RouteRequest};
    use proptest::prelude::*;

    const MILLI: u64 = 1_000_000_000_000_000;

    fn candidate(id: &str, net_milli: u64, seconds: u64) -> Candidate {
        let route = RoutePayload::Steps(vec![serde_json::json!({ "type": "bridge" })]);
        let quote = Quote::new(id, route, &RouteRequest::probe())
            .with_amount_out(U256::from(net_milli) * U256::from(MILLI))
            .with_gas(GasCost::Gwei(0))
            .with_estimated_time(seconds);
        Candidate::new(id.to_uppercase(), quote)
    }

    #[test]
    fn test_rank_orders_by_net_return() {
        let engine = RankingEngine::new();
        let results = engine.rank(vec![
            candidate("a", 950, 300),
            candidate("b", 970, 300),
            candidate("c", 900, 300),
        ]);

        let ids: Vec<&str> = results.iter().map(|r| r.provider_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(results[0].name, "B");
        assert!((results[0].net_return() - 0.97).abs() < 1e-9);
    }

    #[test]
    fn test_savings_against_runner_up() {
        let engine = RankingEngine::new();
        let results = engine.rank(vec![
            candidate("a", 950, 300),
            candidate("b", 970, 300),
            candidate("c", 900, 300),
        ]);

        let savings = savings(&results).unwrap();
        assert_eq!(savings.versus, "a");
        assert!((savings.amount - 0.02).abs() < 1e-9);
        assert!((savings.percent.unwrap() - 0.02 / 0.95 * 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_savings_needs_two_results() {
        let engine = RankingEngine::new();
        assert!(savings(&[]).is_none());
        assert!(savings(&engine.rank(vec![candidate("a", 950, 300)])).is_none());
    }

    #[test]
    fn test_savings_percent_omitted_for_zero_runner_up() {
        let engine = RankingEngine::new();
        let results = engine.rank(vec![candidate("a", 500, 300), candidate("b", 0, 300)]);

        let savings = savings(&results).unwrap();
        assert!((savings.amount - 0.5).abs() < 1e-9);
        assert!(savings.percent.is_none());
    }

    #[test]
    fn test_ties_prefer_faster_then_smaller_id() {
        let engine = RankingEngine::new();
        let results = engine.rank(vec![
            candidate("zeta", 950, 600),
            candidate("beta", 950, 120),
            candidate("alpha", 950, 600),
        ]);

        let ids: Vec<&str> = results.iter().map(|r| r.provider_id.as_str()).collect();
        assert_eq!(ids, vec!["beta", "alpha", "zeta"]);
    }

    #[test]
    fn test_breakdown_relative_to_input() {
        let engine = RankingEngine::new();
        let results = engine.rank(vec![candidate("a", 990, 300)]);
        let row = engine.breakdown(&results[0], 1.0);

        assert!((row.output_amount - 0.99).abs() < 1e-9);
        assert!((row.slippage_percent.unwrap() - 1.0).abs() < 1e-6);
        assert!((row.efficiency_percent.unwrap() - 99.0).abs() < 1e-6);
        assert!(row.score.is_none());
    }

    #[test]
    fn test_breakdown_zero_input() {
        let engine = RankingEngine::new();
        let results = engine.rank(vec![candidate("a", 990, 300)]);
        let row = engine.breakdown(&results[0], 0.0);

        assert!(row.slippage_percent.is_none());
        assert!(row.efficiency_percent.is_none());
    }

    proptest! {
        #[test]
        fn prop_rank_is_sorted_descending(
            entries in proptest::collection::vec((0u64..2_000, 0u64..900), 0..12)
        ) {
            let engine = RankingEngine::new();
            let candidates = entries
                .iter()
                .enumerate()
                .map(|(i, (net, secs))| candidate(&format!("p{i}"), *net, *secs))
                .collect();

            let results = engine.rank(candidates);
            prop_assert_eq!(results.len(), entries.len());
            for pair in results.windows(2) {
                prop_assert!(pair[0].net_return() >= pair[1].net_return());
            }
        }
    }
}
