//! Weighted composite score for a bridge
//!
//! Purely informational: the score is shown next to each breakdown row but
//! never changes the ranking, which is decided by net return alone.

use bridge_core::{NormalizedMetrics, ProviderStats, ScoreWeights};

/// Estimated time at which the speed score reaches zero
pub const MAX_PROCESSING_TIME_SECS: f64 = 300.0;

/// Fee share of the input at which the cost score reaches zero
pub const MAX_FEE_PERCENT: f64 = 5.0;

/// Liquidity, as a multiple of the input amount, that earns a full score
pub const IDEAL_LIQUIDITY_MULTIPLE: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct BridgeScorer {
    weights: ScoreWeights,
}

impl BridgeScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn speed_score(&self, processing_time_secs: f64) -> f64 {
        (1.0 - processing_time_secs / MAX_PROCESSING_TIME_SECS).max(0.0)
    }

    /// `fee` and `amount` in the same unit; a zero amount scores 0
    pub fn cost_score(&self, fee: f64, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let fee_percent = fee / amount * 100.0;
        (1.0 - fee_percent / MAX_FEE_PERCENT).max(0.0)
    }

    pub fn liquidity_score(&self, liquidity: f64, amount: f64) -> f64 {
        if amount <= 0.0 {
            return if liquidity > 0.0 { 1.0 } else { 0.0 };
        }
        (liquidity / (amount * IDEAL_LIQUIDITY_MULTIPLE)).clamp(0.0, 1.0)
    }

    /// `success_rate` in percent
    pub fn reliability_score(&self, success_rate: f64) -> f64 {
        (success_rate / 100.0).clamp(0.0, 1.0)
    }

    /// Score one quote against the provider's observed stats
    pub fn score(&self, metrics: &NormalizedMetrics, stats: &ProviderStats, input_amount: f64) -> f64 {
        let w = &self.weights;
        let total = self.speed_score(metrics.estimated_time_seconds as f64) * w.speed
            + self.cost_score(metrics.fee_in_native_units, input_amount) * w.cost
            + self.liquidity_score(stats.current_liquidity, input_amount) * w.liquidity
            + self.reliability_score(stats.success_rate) * w.reliability;

        if total.is_finite() {
            total
        } else {
            0.0
        }
    }
}
