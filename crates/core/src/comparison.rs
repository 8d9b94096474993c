//! Comparison output types

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::{NormalizedMetrics, RoutePayload};

/// Ranking unit: one provider's normalized quote plus its untouched route
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResult {
    pub provider_id: String,
    pub name: String,
    pub route: RoutePayload,
    pub metrics: NormalizedMetrics,
}

impl BridgeResult {
    pub fn net_return(&self) -> f64 {
        self.metrics.net_return
    }
}

/// Human-presentable row for one bridge, relative to the input amount
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeBreakdown {
    pub provider_id: String,
    pub name: String,
    pub output_amount: f64,
    pub fee: f64,
    pub gas_cost: f64,
    pub total_cost: f64,
    pub net_return: f64,
    /// `None` when the input amount is zero
    pub slippage_percent: Option<f64>,
    /// `None` when the input amount is zero
    pub efficiency_percent: Option<f64>,
    pub estimated_time_seconds: u64,
    pub price_impact_percent: f64,
    /// Weighted composite score, present when provider stats were available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

fn fmt_percent(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}%"),
        None => "n/a".to_string(),
    }
}

impl fmt::Display for BridgeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        writeln!(f, "Output Amount: {:.6} ETH", self.output_amount)?;
        writeln!(f, "Bridge Fee: {:.6} ETH", self.fee)?;
        writeln!(f, "Gas Cost: {:.6} ETH", self.gas_cost)?;
        writeln!(f, "Total Cost: {:.6} ETH", self.total_cost)?;
        writeln!(f, "Net Return: {:.6} ETH", self.net_return)?;
        writeln!(f, "Slippage: {}", fmt_percent(self.slippage_percent, 3))?;
        writeln!(f, "Efficiency: {}", fmt_percent(self.efficiency_percent, 2))?;
        if let Some(score) = self.score {
            writeln!(f, "Score: {score:.3}")?;
        }
        write!(f, "Time Estimate: {} seconds", self.estimated_time_seconds)
    }
}

/// Advantage of the best bridge over the runner-up
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Savings {
    pub versus: String,
    pub amount: f64,
    /// `None` when the runner-up's net return is zero
    pub percent: Option<f64>,
}

/// Output of one aggregation cycle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub best_bridge: Option<BridgeResult>,
    /// Descending by net return
    pub all_bridges: Vec<BridgeResult>,
    pub comparison: Vec<BridgeBreakdown>,
    pub savings: Option<Savings>,
    pub input_amount: f64,
    pub timestamp: DateTime<Utc>,
}

impl ComparisonResult {
    /// Result for a cycle in which no provider produced a usable quote
    pub fn empty(input_amount: f64) -> Self {
        Self {
            best_bridge: None,
            all_bridges: Vec::new(),
            comparison: Vec::new(),
            savings: None,
            input_amount,
            timestamp: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.all_bridges.is_empty()
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input Amount: {:.6} ETH", self.input_amount)?;
        writeln!(f, "Bridge Comparison Results:")?;
        writeln!(f, "========================")?;
        for row in &self.comparison {
            writeln!(f)?;
            writeln!(f, "{row}")?;
        }
        writeln!(f)?;

        match (&self.best_bridge, &self.savings) {
            (Some(best), Some(savings)) => {
                writeln!(f, "Best Bridge: {}", best.name)?;
                write!(
                    f,
                    "Savings vs Next Best: {:.6} ETH ({})",
                    savings.amount,
                    fmt_percent(savings.percent, 2)
                )
            }
            (Some(best), None) => write!(f, "Best Bridge: {} (Only Valid Option)", best.name),
            (None, _) => write!(f, "No valid bridges found"),
        }
    }
}
