//! Quote aggregation and ranking engine
//!
//! Features:
//! - Concurrent fan-out to every bridge adapter with partial-failure tolerance
//! - Unit normalization into native-asset metrics
//! - Deterministic best-first ranking with savings versus the runner-up
//! - Optional weighted composite score from provider statistics

pub mod aggregator;
pub mod ranking;
pub mod scoring;

pub use aggregator::QuoteAggregator;
pub use ranking::{compare_results, savings, Candidate, RankingEngine};
pub use scoring::BridgeScorer;
