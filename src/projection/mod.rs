//! Projection engine: monthly ledgers, annual rollups and metrics per strategy

mod state;
mod timeline;
mod cashflows;
mod buy_hold;
mod brrrr;
mod flip;
mod engine;

pub use state::{property_value_for_month, rent_for_month, ProjectionState};
pub use timeline::{PhaseSpan, Step, Timeline};
pub use cashflows::{rollup_annual, AnnualSummary, MonthlyResult, Phase, RollupBasis};
pub use buy_hold::{calculate_buy_hold, BuyHoldResult, RentalMetrics};
pub use brrrr::{calculate_brrrr, BrrrrMetrics, BrrrrResult};
pub use flip::{calculate_flip, FlipMetrics, FlipResult};
pub use engine::{calculate, AnalysisSummary, StrategyMetrics, StrategyResult};
