//! Running ledger state and the growth curves shared by every strategy

use super::cashflows::MonthlyResult;

/// Ledger being built by a calculator walk
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Running sum of cash flow, starting at minus the initial outlay
    cumulative_cash_flow: f64,

    rows: Vec<MonthlyResult>,
}

impl ProjectionState {
    /// Start a ledger after `initial_outlay` has left the investor's pocket
    pub fn seeded(initial_outlay: f64, capacity: usize) -> Self {
        Self {
            cumulative_cash_flow: -initial_outlay,
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Post a month, filling in its cumulative cash flow
    pub fn record(&mut self, mut row: MonthlyResult) {
        self.cumulative_cash_flow += row.cash_flow;
        row.cumulative_cash_flow = self.cumulative_cash_flow;
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[MonthlyResult] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<MonthlyResult> {
        self.rows
    }
}

/// Rent in effect for a projection month.
///
/// Steps up once every 12 months: `rent * (1 + g)^floor((month - 1) / 12)`.
pub fn rent_for_month(base_rent: f64, annual_increase_rate: f64, month: u32) -> f64 {
    let year_index = month.saturating_sub(1) / 12;
    base_rent * (1.0 + annual_increase_rate).powi(year_index as i32)
}

/// Property value after `month - 1` months of compounding from `start_value`
pub fn property_value_for_month(start_value: f64, monthly_appreciation_rate: f64, month: u32) -> f64 {
    start_value * (1.0 + monthly_appreciation_rate).powi(month.saturating_sub(1) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Phase;
    use approx::assert_relative_eq;

    #[test]
    fn test_rent_steps_only_at_year_boundaries() {
        assert_eq!(rent_for_month(2000.0, 0.05, 1), 2000.0);
        assert_eq!(rent_for_month(2000.0, 0.05, 12), 2000.0);
        assert_relative_eq!(rent_for_month(2000.0, 0.05, 13), 2100.0);
        assert_relative_eq!(rent_for_month(2000.0, 0.05, 24), 2100.0);
        assert_relative_eq!(rent_for_month(2000.0, 0.05, 25), 2205.0);
    }

    #[test]
    fn test_value_compounds_monthly() {
        assert_eq!(property_value_for_month(100_000.0, 0.01, 1), 100_000.0);
        assert_relative_eq!(property_value_for_month(100_000.0, 0.01, 3), 102_010.0);
    }

    #[test]
    fn test_cumulative_starts_from_outlay() {
        let mut state = ProjectionState::seeded(1_000.0, 2);
        for month in 1..=2 {
            state.record(MonthlyResult {
                month,
                rent: 0.0,
                gross_income: 0.0,
                vacancy: 0.0,
                operating_expenses: 0.0,
                noi: 0.0,
                debt_service: 0.0,
                cash_flow: 250.0,
                cumulative_cash_flow: 0.0,
                property_value: 0.0,
                equity: 0.0,
                loan_balance: 0.0,
                taxes: 0.0,
                insurance: 0.0,
                rehab_spend: 0.0,
                phase: Phase::Current,
            });
        }
        let rows = state.into_rows();
        assert_eq!(rows[0].cumulative_cash_flow, -750.0);
        assert_eq!(rows[1].cumulative_cash_flow, -500.0);
    }
}
