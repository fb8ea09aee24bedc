//! Scenario runner for batch and sensitivity projections
//!
//! Holds one assumption set and runs deals against it. Deals in a batch are
//! independent, so batches and rate sweeps run in parallel.

use std::path::Path;

use rayon::prelude::*;

use crate::deal::{Strategy, StrategyInputs};
use crate::error::LoadError;
use crate::projection::{calculate, StrategyResult};
use crate::Assumptions;

/// One point of a rate sweep
#[derive(Debug, Clone, PartialEq)]
pub struct RateScenario {
    pub interest_rate_annual: f64,
    pub result: StrategyResult,
}

/// Pre-loaded runner for projecting many deals
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv_path(Path::new("data/assumptions.csv"))?;
///
/// let deal = runner.template(Strategy::Brrrr);
/// for point in runner.rate_sensitivity(&deal, &[0.06, 0.07, 0.08]) {
///     println!("{} {:?}", point.interest_rate_annual, point.result.summary());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    base_assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Create runner with the default assumption table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner with defaults overridden from a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv_path(path)?,
        })
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Starter deal for a strategy under this runner's assumptions
    pub fn template(&self, strategy: Strategy) -> StrategyInputs {
        self.base_assumptions.template(strategy)
    }

    /// Project a single deal as given
    pub fn run(&self, inputs: &StrategyInputs) -> StrategyResult {
        calculate(inputs)
    }

    /// Project a deal after resetting its rates to this runner's assumptions
    pub fn run_with_assumptions(&self, inputs: &StrategyInputs) -> StrategyResult {
        let mut inputs = inputs.clone();
        self.base_assumptions.apply_to(&mut inputs);
        calculate(&inputs)
    }

    /// Project many deals; results keep the input order
    pub fn run_batch(&self, deals: &[StrategyInputs]) -> Vec<StrategyResult> {
        log::info!("projecting {} deals", deals.len());
        deals.par_iter().map(calculate).collect()
    }

    /// Re-run one deal at each annual rate.
    ///
    /// The rate replaces the loan that carries the deal: the amortizing loan
    /// for buy-and-hold, the long-term loan for BRRRR and the bridge for a flip.
    pub fn rate_sensitivity(&self, inputs: &StrategyInputs, rates: &[f64]) -> Vec<RateScenario> {
        rates
            .par_iter()
            .map(|&rate| {
                let deal = with_interest_rate(inputs, rate);
                RateScenario {
                    interest_rate_annual: rate,
                    result: calculate(&deal),
                }
            })
            .collect()
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.base_assumptions
    }
}

fn with_interest_rate(inputs: &StrategyInputs, rate: f64) -> StrategyInputs {
    let mut deal = inputs.clone();
    match &mut deal {
        StrategyInputs::BuyHold(d) => d.loan.interest_rate_annual = rate,
        StrategyInputs::Brrrr(d) => d.long_term_loan.interest_rate_annual = rate,
        StrategyInputs::Flip(d) => d.bridge.interest_rate_annual = rate,
    }
    deal
}
