//! Ledger output structures: monthly rows and annual rollups

use serde::{Deserialize, Serialize};

use crate::finance::safe_ratio;

/// Descriptive tag for what the property is doing in a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Current,
    Rehab,
    Stabilized,
    Marketing,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Current => "current",
            Phase::Rehab => "rehab",
            Phase::Stabilized => "stabilized",
            Phase::Marketing => "marketing",
        }
    }
}

/// One simulated month of a deal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyResult {
    /// Projection month (1-indexed, continuous across phases)
    pub month: u32,
    pub rent: f64,
    pub gross_income: f64,
    pub vacancy: f64,
    pub operating_expenses: f64,
    /// Gross income less operating expenses
    pub noi: f64,
    pub debt_service: f64,
    pub cash_flow: f64,
    /// Running cash flow, seeded with the negative of the initial outlay
    pub cumulative_cash_flow: f64,
    pub property_value: f64,
    pub equity: f64,
    pub loan_balance: f64,
    pub taxes: f64,
    pub insurance: f64,
    pub rehab_spend: f64,
    pub phase: Phase,
}

/// One projection year aggregated from up to 12 consecutive months
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualSummary {
    pub year: u32,
    /// Property value at the last month of the year
    pub value: f64,
    pub debt: f64,
    pub equity: f64,
    pub cash_invested: f64,
    pub total_cash_invested: f64,
    pub interest_paid: f64,
    pub rent: f64,
    pub expenses: f64,
    pub cash_flow: f64,
    /// Equity at year end less equity at the start of the projection
    pub equity_growth: f64,
    pub total_return: f64,
    pub annual_return_on_invested_cash: Option<f64>,
    /// NOI over debt service; `None` for years with no debt service
    pub dscr: Option<f64>,
}

/// Fixed figures an annual rollup is measured against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollupBasis {
    pub cash_invested: f64,
    /// Equity at the start of the projection
    pub baseline_equity: f64,
}

/// Roll a monthly ledger into 12-month slices.
///
/// `interest_for` maps a zero-based ledger index to the interest paid that
/// month, which lets callers attribute interest to the loan active at the time.
/// A trailing partial year is kept as its own slice.
pub fn rollup_annual<F>(monthly: &[MonthlyResult], basis: RollupBasis, interest_for: F) -> Vec<AnnualSummary>
where
    F: Fn(usize) -> f64,
{
    monthly
        .chunks(12)
        .enumerate()
        .filter_map(|(year_idx, slice)| {
            let last = slice.last()?;
            let start_idx = year_idx * 12;

            let rent: f64 = slice.iter().map(|r| r.rent).sum();
            let expenses: f64 = slice.iter().map(|r| r.operating_expenses).sum();
            let cash_flow: f64 = slice.iter().map(|r| r.cash_flow).sum();
            let noi: f64 = slice.iter().map(|r| r.noi).sum();
            let debt_service: f64 = slice.iter().map(|r| r.debt_service).sum();
            let interest_paid: f64 = (start_idx..start_idx + slice.len()).map(&interest_for).sum();

            let equity_growth = last.equity - basis.baseline_equity;
            let total_return = cash_flow + equity_growth;

            Some(AnnualSummary {
                year: year_idx as u32 + 1,
                value: last.property_value,
                debt: last.loan_balance,
                equity: last.equity,
                cash_invested: basis.cash_invested,
                total_cash_invested: basis.cash_invested,
                interest_paid,
                rent,
                expenses,
                cash_flow,
                equity_growth,
                total_return,
                annual_return_on_invested_cash: safe_ratio(total_return, basis.cash_invested),
                dscr: safe_ratio(noi, debt_service),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn row(month: u32, rent: f64, expenses: f64, debt_service: f64) -> MonthlyResult {
        let noi = rent - expenses;
        MonthlyResult {
            month,
            rent,
            gross_income: rent,
            vacancy: 0.0,
            operating_expenses: expenses,
            noi,
            debt_service,
            cash_flow: noi - debt_service,
            cumulative_cash_flow: 0.0,
            property_value: 100_000.0 + month as f64 * 100.0,
            equity: 20_000.0 + month as f64 * 150.0,
            loan_balance: 80_000.0 - month as f64 * 50.0,
            taxes: 0.0,
            insurance: 0.0,
            rehab_spend: 0.0,
            phase: Phase::Stabilized,
        }
    }

    #[test]
    fn test_partial_final_year() {
        let monthly: Vec<_> = (1..=30).map(|m| row(m, 1000.0, 300.0, 500.0)).collect();
        let basis = RollupBasis { cash_invested: 20_000.0, baseline_equity: 20_000.0 };
        let annual = rollup_annual(&monthly, basis, |_| 400.0);

        assert_eq!(annual.len(), 3);
        assert_eq!(annual[2].year, 3);
        assert_abs_diff_eq!(annual[2].rent, 6_000.0);
        assert_abs_diff_eq!(annual[2].interest_paid, 2_400.0);
        assert_abs_diff_eq!(annual[2].equity, monthly[29].equity);
    }

    #[test]
    fn test_year_sums_and_ratios() {
        let monthly: Vec<_> = (1..=12).map(|m| row(m, 1000.0, 300.0, 500.0)).collect();
        let basis = RollupBasis { cash_invested: 10_000.0, baseline_equity: 20_000.0 };
        let year = &rollup_annual(&monthly, basis, |_| 0.0)[0];

        assert_abs_diff_eq!(year.cash_flow, 2_400.0);
        assert_abs_diff_eq!(year.equity_growth, 12.0 * 150.0);
        assert_abs_diff_eq!(year.total_return, 2_400.0 + 1_800.0);
        assert_abs_diff_eq!(year.annual_return_on_invested_cash.unwrap(), 0.42, epsilon = 1e-12);
        assert_abs_diff_eq!(year.dscr.unwrap(), 700.0 / 500.0, epsilon = 1e-12);
    }

    #[test]
    fn test_undefined_ratios_are_none() {
        let monthly: Vec<_> = (1..=12).map(|m| row(m, 1000.0, 300.0, 0.0)).collect();
        let basis = RollupBasis { cash_invested: 0.0, baseline_equity: 0.0 };
        let year = &rollup_annual(&monthly, basis, |_| 0.0)[0];

        assert_eq!(year.dscr, None);
        assert_eq!(year.annual_return_on_invested_cash, None);
    }

    #[test]
    fn test_empty_ledger() {
        let basis = RollupBasis { cash_invested: 1.0, baseline_equity: 0.0 };
        assert!(rollup_annual(&[], basis, |_| 0.0).is_empty());
    }
}
