//! Deal Projection - cash-flow projection engine for real-estate investments
//!
//! This library provides:
//! - Loan math (periodic rates, payments, amortization schedules)
//! - Rehab budget aggregation over a tiered cost catalog
//! - Month-by-month projections for buy-and-hold, BRRRR and fix-and-flip deals
//! - Annual rollups and headline investment metrics
//! - Batch and rate-sensitivity runs over an assumption set

pub mod error;
pub mod finance;
pub mod rehab;
pub mod deal;
pub mod assumptions;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::LoadError;
pub use deal::{Strategy, StrategyInputs};
pub use assumptions::Assumptions;
pub use projection::{calculate, AnalysisSummary, AnnualSummary, MonthlyResult, StrategyResult};
pub use scenario::ScenarioRunner;
