//! Buy-and-hold: one amortizing loan, rent from month 1, held for the loan term

use serde::{Deserialize, Serialize};

use super::cashflows::{rollup_annual, AnnualSummary, MonthlyResult, Phase, RollupBasis};
use super::state::{property_value_for_month, rent_for_month, ProjectionState};
use super::timeline::{Step, Timeline};
use crate::deal::BuyHoldInputs;
use crate::finance::{build_amortization_schedule, safe_ratio, AmortizationParams, AmortizationRow};

/// Headline numbers for rental strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalMetrics {
    pub cash_required: f64,
    pub year_one_cash_flow: f64,
    /// Year-one DSCR; `None` when there is no debt service
    pub dscr: Option<f64>,
    pub cash_on_cash_return: f64,
    /// Total return at the final projection year
    pub total_return: f64,
}

impl RentalMetrics {
    pub fn from_annual(cash_required: f64, annual: &[AnnualSummary]) -> Self {
        let year_one_cash_flow = annual.first().map(|y| y.cash_flow).unwrap_or(0.0);
        Self {
            cash_required,
            year_one_cash_flow,
            dscr: annual.first().and_then(|y| y.dscr),
            cash_on_cash_return: safe_ratio(year_one_cash_flow, cash_required).unwrap_or(0.0),
            total_return: annual.last().map(|y| y.total_return).unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyHoldResult {
    pub monthly: Vec<MonthlyResult>,
    pub annual: Vec<AnnualSummary>,
    pub metrics: RentalMetrics,
}

/// Derived figures shared by every month of the walk
struct BuyHoldModel<'a> {
    inputs: &'a BuyHoldInputs,
    starting_value: f64,
    monthly_appreciation: f64,
    schedule: Vec<AmortizationRow>,
}

impl BuyHoldModel<'_> {
    fn stabilized_month(&self, step: Step) -> MonthlyResult {
        let inputs = self.inputs;
        let m = step.global_month;

        let rent = rent_for_month(inputs.rental.monthly_rent, inputs.base.annual_rent_increase_rate, m);
        let property_value = property_value_for_month(self.starting_value, self.monthly_appreciation, m);
        let scheduled = self.schedule.get(step.local_month as usize - 1);
        let debt_service = scheduled.map(|r| r.payment).unwrap_or(0.0);
        let loan_balance = scheduled.map(|r| r.balance).unwrap_or(0.0);

        let reserves = inputs.rental.expenses_for(rent);
        let taxes = inputs.base.monthly_taxes(property_value);
        let insurance = inputs.base.insurance_per_month;
        let operating_expenses = reserves.total() + taxes + insurance;
        let noi = rent - operating_expenses;

        MonthlyResult {
            month: m,
            rent,
            gross_income: rent,
            vacancy: reserves.vacancy,
            operating_expenses,
            noi,
            debt_service,
            cash_flow: noi - debt_service,
            cumulative_cash_flow: 0.0,
            property_value,
            equity: property_value - loan_balance,
            loan_balance,
            taxes,
            insurance,
            rehab_spend: if m == 1 { inputs.base.rehab_cost } else { 0.0 },
            phase: step.phase,
        }
    }
}

/// Project a buy-and-hold deal over its loan term
pub fn calculate_buy_hold(inputs: &BuyHoldInputs) -> BuyHoldResult {
    let base = &inputs.base;
    let financing = inputs.loan.financing(base.purchase_price);

    let points = inputs.loan.points_rate * financing.loan_amount;
    let loan_closing_costs = inputs.loan.loan_closing_cost_rate * financing.loan_amount;
    let initial_cash_invested = financing.down_payment
        + base.rehab_cost
        + points
        + loan_closing_costs
        + base.purchase_closing_costs();

    // A zero ARV means "not given"
    let starting_value = if base.arv != 0.0 { base.arv } else { base.purchase_price };
    let term = inputs.loan.loan_term_months;

    let model = BuyHoldModel {
        inputs,
        starting_value,
        monthly_appreciation: base.monthly_appreciation_rate(),
        schedule: build_amortization_schedule(&AmortizationParams::new(
            financing.loan_amount,
            inputs.loan.monthly_rate(),
            term,
        )),
    };

    log::debug!(
        "buy-hold: loan {:.2}, down {:.2}, cash invested {:.2}, {} months",
        financing.loan_amount,
        financing.down_payment,
        initial_cash_invested,
        term
    );

    let timeline = Timeline::new().then(Phase::Stabilized, term);
    let mut state = ProjectionState::seeded(initial_cash_invested, term as usize);
    for step in timeline.steps() {
        state.record(model.stabilized_month(step));
    }
    let monthly = state.into_rows();

    let basis = RollupBasis {
        cash_invested: initial_cash_invested,
        baseline_equity: starting_value - financing.loan_amount,
    };
    let annual = rollup_annual(&monthly, basis, |idx| {
        model.schedule.get(idx).map(|r| r.interest).unwrap_or(0.0)
    });
    let metrics = RentalMetrics::from_annual(initial_cash_invested, &annual);

    BuyHoldResult { monthly, annual, metrics }
}
