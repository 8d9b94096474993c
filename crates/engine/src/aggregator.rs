//! Quote aggregator - fans a route request out to every adapter
//!
//! All adapter calls are polled concurrently on the calling task and every
//! outcome is awaited before ranking. There is no aggregate timeout: each
//! adapter must bound its own call, otherwise one stuck provider stalls the
//! whole comparison.

use chrono::Utc;
use futures::future::join_all;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use bridge_core::{BridgeAdapter, ComparisonResult, ProviderStatsSource, RouteRequest, ScoreWeights};

use crate::ranking::{savings, Candidate, RankingEngine};
use crate::scoring::BridgeScorer;

pub struct QuoteAggregator {
    adapters: Vec<Arc<dyn BridgeAdapter>>,
    ranking: RankingEngine,
    scorer: BridgeScorer,
    stats: Option<Arc<dyn ProviderStatsSource>>,
}

impl QuoteAggregator {
    pub fn new(adapters: Vec<Arc<dyn BridgeAdapter>>) -> Self {
        Self {
            adapters,
            ranking: RankingEngine::new(),
            scorer: BridgeScorer::default(),
            stats: None,
        }
    }

    /// Attach provider statistics so breakdown rows carry a composite score
    pub fn with_stats_source(mut self, stats: Arc<dyn ProviderStatsSource>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.scorer = BridgeScorer::new(weights);
        self
    }

    pub fn adapters(&self) -> &[Arc<dyn BridgeAdapter>] {
        &self.adapters
    }

    pub fn ranking(&self) -> &RankingEngine {
        &self.ranking
    }

    /// Query all adapters and keep the usable quotes
    ///
    /// Errors, empty routes and panics exclude only the adapter concerned.
    pub async fn fetch_quotes(&self, request: &RouteRequest) -> Vec<Candidate> {
        let started = Instant::now();
        debug!("Fetching quotes from {} adapters", self.adapters.len());

        let calls = self.adapters.iter().map(|adapter| async move {
            let outcome = AssertUnwindSafe(adapter.get_route(request)).catch_unwind().await;
            match outcome {
                Ok(Some(quote)) if quote.is_usable() => Some(Candidate::new(adapter.name(), quote)),
                Ok(Some(_)) => {
                    debug!("{} returned an empty route, excluded", adapter.id());
                    None
                }
                Ok(None) => None,
                Err(_) => {
                    error!("{} adapter panicked while quoting, excluded", adapter.id());
                    None
                }
            }
        });

        let candidates: Vec<Candidate> = join_all(calls).await.into_iter().flatten().collect();

        info!(
            "Quote aggregation completed: {} usable quotes from {} adapters in {:?}",
            candidates.len(),
            self.adapters.len(),
            started.elapsed()
        );
        candidates
    }

    /// Fetch, normalize and rank quotes for one request
    ///
    /// Never fails: when no adapter produced a usable quote the result has
    /// no best bridge and an empty list.
    pub async fn compare(&self, request: &RouteRequest) -> ComparisonResult {
        let input_amount = self.ranking.normalizer().to_native(request.amount);
        let candidates = self.fetch_quotes(request).await;

        if candidates.is_empty() {
            info!("No valid bridges found for {} -> {}", request.source_chain, request.dest_chain);
            return ComparisonResult::empty(input_amount);
        }

        let all_bridges = self.ranking.rank(candidates);
        let comparison = all_bridges
            .iter()
            .map(|result| {
                let mut row = self.ranking.breakdown(result, input_amount);
                row.score = self
                    .stats
                    .as_ref()
                    .and_then(|stats| stats.provider_stats(&result.provider_id))
                    .map(|stats| self.scorer.score(&result.metrics, &stats, input_amount));
                row
            })
            .collect();

        let savings = savings(&all_bridges);
        let best_bridge = all_bridges.first().cloned();

        if let Some(best) = &best_bridge {
            info!(
                "Best bridge {} with net return {:.6} out of {} candidates",
                best.provider_id,
                best.net_return(),
                all_bridges.len()
            );
        }

        ComparisonResult {
            best_bridge,
            all_bridges,
            comparison,
            savings,
            input_amount,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::testing::{MockAdapter, MockOutcome};
    use bridge_core::ProviderStats;
    use std::time::Duration;

    fn aggregator(adapters: Vec<MockAdapter>) -> QuoteAggregator {
        QuoteAggregator::new(
            adapters
                .into_iter()
                .map(|a| Arc::new(a) as Arc<dyn BridgeAdapter>)
                .collect(),
        )
    }

    struct FixedStats;

    impl ProviderStatsSource for FixedStats {
        fn provider_stats(&self, provider_id: &str) -> Option<ProviderStats> {
            (provider_id == "a").then_some(ProviderStats {
                is_operational: true,
                success_rate: 100.0,
                average_processing_time_ms: 0.0,
                current_liquidity: 10.0,
            })
        }
    }

    #[tokio::test]
    async fn test_compare_ranks_and_computes_savings() {
        let aggregator = aggregator(vec![
            MockAdapter::net_return("a", 0.95),
            MockAdapter::net_return("b", 0.97),
            MockAdapter::net_return("c", 0.90),
        ]);

        let result = aggregator.compare(&RouteRequest::probe()).await;

        let nets: Vec<f64> = result.all_bridges.iter().map(|b| b.net_return()).collect();
        assert_eq!(nets.len(), 3);
        assert!((nets[0] - 0.97).abs() < 1e-9);
        assert!((nets[1] - 0.95).abs() < 1e-9);
        assert!((nets[2] - 0.90).abs() < 1e-9);

        let best = result.best_bridge.unwrap();
        assert_eq!(best.provider_id, "b");
        assert!((result.savings.unwrap().amount - 0.02).abs() < 1e-9);
        assert_eq!(result.comparison.len(), 3);
        assert!((result.input_amount - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_failing_adapter_is_excluded() {
        let aggregator = aggregator(vec![
            MockAdapter::failing("a"),
            MockAdapter::net_return("b", 0.97),
            MockAdapter::net_return("c", 0.90),
        ]);

        let result = aggregator.compare(&RouteRequest::probe()).await;
        assert_eq!(result.all_bridges.len(), 2);
        assert!(result.all_bridges.iter().all(|b| b.provider_id != "a"));
    }

    #[tokio::test]
    async fn test_all_failing_gives_empty_result() {
        let aggregator = aggregator(vec![
            MockAdapter::failing("a"),
            MockAdapter::new("b", MockOutcome::EmptyRoute),
        ]);

        let result = aggregator.compare(&RouteRequest::probe()).await;
        assert!(result.best_bridge.is_none());
        assert!(result.all_bridges.is_empty());
        assert!(result.savings.is_none());
    }

    #[tokio::test]
    async fn test_no_adapters_gives_empty_result() {
        let result = aggregator(vec![]).compare(&RouteRequest::probe()).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_panicking_adapter_is_excluded() {
        let aggregator = aggregator(vec![
            MockAdapter::new("a", MockOutcome::Panic),
            MockAdapter::net_return("b", 0.97),
        ]);

        let result = aggregator.compare(&RouteRequest::probe()).await;
        assert_eq!(result.all_bridges.len(), 1);
        assert_eq!(result.best_bridge.unwrap().provider_id, "b");
        assert!(result.savings.is_none());
    }

    #[tokio::test]
    async fn test_empty_route_is_excluded() {
        let aggregator = aggregator(vec![
            MockAdapter::new("a", MockOutcome::EmptyRoute),
            MockAdapter::net_return("b", 0.97),
        ]);

        let candidates = aggregator.fetch_quotes(&RouteRequest::probe()).await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].quote.provider_id, "b");
    }

    #[tokio::test]
    async fn test_adapters_are_queried_concurrently() {
        let delay = Duration::from_millis(200);
        let adapters: Vec<MockAdapter> = ["a", "b", "c"]
            .iter()
            .map(|id| MockAdapter::net_return(id, 0.9).with_delay(delay))
            .collect();
        let handles = adapters.clone();
        let aggregator = aggregator(adapters);

        let started = Instant::now();
        let result = aggregator.compare(&RouteRequest::probe()).await;

        assert_eq!(result.all_bridges.len(), 3);
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(handles.iter().all(|a| a.calls() == 1));
    }

    #[tokio::test]
    async fn test_scores_attached_from_stats_source() {
        let aggregator = aggregator(vec![
            MockAdapter::net_return("a", 0.95),
            MockAdapter::net_return("b", 0.97),
        ])
        .with_stats_source(Arc::new(FixedStats));

        let result = aggregator.compare(&RouteRequest::probe()).await;

        let row_a = result.comparison.iter().find(|r| r.provider_id == "a").unwrap();
        let row_b = result.comparison.iter().find(|r| r.provider_id == "b").unwrap();
        assert!(row_a.score.is_some());
        assert!(row_b.score.is_none());
        // Scores never change the order
        assert_eq!(result.best_bridge.unwrap().provider_id, "b");
    }
}
