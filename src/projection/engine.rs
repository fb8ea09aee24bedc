//! Strategy dispatch and the serializable analysis snapshot

use serde::{Deserialize, Serialize};

use super::brrrr::{calculate_brrrr, BrrrrMetrics, BrrrrResult};
use super::buy_hold::{calculate_buy_hold, BuyHoldResult, RentalMetrics};
use super::cashflows::{AnnualSummary, MonthlyResult};
use super::flip::{calculate_flip, FlipMetrics, FlipResult};
use crate::deal::{Strategy, StrategyInputs};

/// Result of projecting one deal, tagged like its inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StrategyResult {
    BuyHold(BuyHoldResult),
    Brrrr(BrrrrResult),
    Flip(FlipResult),
}

impl StrategyResult {
    pub fn strategy(&self) -> Strategy {
        match self {
            StrategyResult::BuyHold(_) => Strategy::BuyHold,
            StrategyResult::Brrrr(_) => Strategy::Brrrr,
            StrategyResult::Flip(_) => Strategy::Flip,
        }
    }

    pub fn monthly(&self) -> &[MonthlyResult] {
        match self {
            StrategyResult::BuyHold(r) => &r.monthly,
            StrategyResult::Brrrr(r) => &r.monthly,
            StrategyResult::Flip(r) => &r.monthly,
        }
    }

    /// Annual rollup; flips report metrics only
    pub fn annual(&self) -> Option<&[AnnualSummary]> {
        match self {
            StrategyResult::BuyHold(r) => Some(&r.annual),
            StrategyResult::Brrrr(r) => Some(&r.annual),
            StrategyResult::Flip(_) => None,
        }
    }

    pub fn metrics(&self) -> StrategyMetrics {
        match self {
            StrategyResult::BuyHold(r) => StrategyMetrics::Rental(r.metrics.clone()),
            StrategyResult::Brrrr(r) => StrategyMetrics::Brrrr(r.metrics.clone()),
            StrategyResult::Flip(r) => StrategyMetrics::Flip(r.metrics.clone()),
        }
    }

    /// Snapshot for saving or sharing an analysis: metrics and the annual
    /// view without the monthly ledger
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            strategy: self.strategy(),
            metrics: self.metrics(),
            annual: self.annual().map(|a| a.to_vec()),
        }
    }
}

/// Headline metrics of any strategy.
///
/// Untagged; `Brrrr` is listed first since its fields are a superset of
/// `Rental`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrategyMetrics {
    Brrrr(BrrrrMetrics),
    Rental(RentalMetrics),
    Flip(FlipMetrics),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub strategy: Strategy,
    pub metrics: StrategyMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual: Option<Vec<AnnualSummary>>,
}

/// Project a deal with the calculator matching its strategy
pub fn calculate(inputs: &StrategyInputs) -> StrategyResult {
    match inputs {
        StrategyInputs::BuyHold(i) => StrategyResult::BuyHold(calculate_buy_hold(i)),
        StrategyInputs::Brrrr(i) => StrategyResult::Brrrr(calculate_brrrr(i)),
        StrategyInputs::Flip(i) => StrategyResult::Flip(calculate_flip(i)),
    }
}
