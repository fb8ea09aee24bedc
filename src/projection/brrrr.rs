//! BRRRR: interest-only bridge through rehab, a cash-out refinance at ARV,
//! then a stabilized rental on the long-term loan
//!
//! The refinance is an instantaneous event between the two phases and never
//! appears as a ledger month.

use serde::{Deserialize, Serialize};

use super::buy_hold::RentalMetrics;
use super::cashflows::{rollup_annual, AnnualSummary, MonthlyResult, Phase, RollupBasis};
use super::state::{property_value_for_month, rent_for_month, ProjectionState};
use super::timeline::{Step, Timeline};
use crate::deal::BrrrrInputs;
use crate::finance::{build_amortization_schedule, AmortizationParams, AmortizationRow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrrrrMetrics {
    #[serde(flatten)]
    pub rental: RentalMetrics,
    /// Cash still in the deal after the refinance; negative when the
    /// cash-out exceeded what went in
    pub cash_left_in_deal: f64,
    /// Gross refinance loan amount
    pub refi_proceeds: f64,
    /// Interest accrued on the bridge over the rehab phase
    pub bridge_interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrrrrResult {
    pub monthly: Vec<MonthlyResult>,
    pub annual: Vec<AnnualSummary>,
    pub metrics: BrrrrMetrics,
}

/// Outcome of the refinance event
#[derive(Debug, Clone, Copy, PartialEq)]
struct Refinance {
    loan_amount: f64,
    closing_costs: f64,
    points: f64,
    bridge_payoff: f64,
}

impl Refinance {
    fn cash_out(&self) -> f64 {
        self.loan_amount - self.closing_costs - self.points - self.bridge_payoff
    }
}

struct BrrrrModel<'a> {
    inputs: &'a BrrrrInputs,
    starting_value: f64,
    monthly_appreciation: f64,
    bridge_principal: f64,
    bridge_monthly_interest: f64,
    long_term_schedule: Vec<AmortizationRow>,
}

impl BrrrrModel<'_> {
    /// Bridge carry with no income
    fn rehab_month(&self, step: Step) -> MonthlyResult {
        let base = &self.inputs.base;
        let m = step.global_month;

        let property_value = property_value_for_month(self.starting_value, self.monthly_appreciation, m);
        let taxes = base.monthly_taxes(property_value);
        let insurance = base.insurance_per_month;
        let operating_expenses = taxes + insurance;
        let interest = self.bridge_monthly_interest;

        MonthlyResult {
            month: m,
            rent: 0.0,
            gross_income: 0.0,
            vacancy: 0.0,
            operating_expenses,
            noi: -operating_expenses,
            debt_service: interest,
            cash_flow: -operating_expenses - interest,
            cumulative_cash_flow: 0.0,
            property_value,
            equity: property_value - self.bridge_principal,
            loan_balance: self.bridge_principal,
            taxes,
            insurance,
            rehab_spend: if m == 1 { base.rehab_cost } else { 0.0 },
            phase: step.phase,
        }
    }

    /// Rented on the long-term loan. Rent escalates on the global month while
    /// value and the loan schedule start over at the refinance.
    fn stabilized_month(&self, step: Step) -> MonthlyResult {
        let inputs = self.inputs;
        let j = step.local_month;

        let property_value = property_value_for_month(inputs.base.arv, self.monthly_appreciation, j);
        let rent = rent_for_month(
            inputs.rental.monthly_rent,
            inputs.base.annual_rent_increase_rate,
            step.global_month,
        );
        let reserves = inputs.rental.expenses_for(rent);
        let taxes = inputs.base.monthly_taxes(property_value);
        let insurance = inputs.base.insurance_per_month;
        let operating_expenses = taxes + insurance + reserves.total();

        let scheduled = self.long_term_schedule.get(j as usize - 1);
        let debt_service = scheduled.map(|r| r.payment).unwrap_or(0.0);
        let loan_balance = scheduled.map(|r| r.balance).unwrap_or(0.0);
        let noi = rent - operating_expenses;

        MonthlyResult {
            month: step.global_month,
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
            rehab_spend: if step.global_month == 1 { inputs.base.rehab_cost } else { 0.0 },
            phase: step.phase,
        }
    }

    /// Interest for a zero-based ledger index, bridge or long-term by phase
    fn interest_at(&self, idx: usize) -> f64 {
        let rehab_months = self.inputs.rehab_months as usize;
        if idx < rehab_months {
            self.bridge_monthly_interest
        } else {
            self.long_term_schedule
                .get(idx - rehab_months)
                .map(|r| r.interest)
                .unwrap_or(0.0)
        }
    }
}

/// Project a BRRRR deal through rehab, refinance and the long-term hold
pub fn calculate_brrrr(inputs: &BrrrrInputs) -> BrrrrResult {
    let base = &inputs.base;

    let bridge_principal = inputs.bridge.principal(base.purchase_price, base.rehab_cost);
    let cash_invested_before_refi = (base.purchase_price + base.rehab_cost - bridge_principal).max(0.0)
        + base.purchase_closing_costs();

    let refi_loan = inputs.refinance.ltv * base.arv;
    let refinance = Refinance {
        loan_amount: refi_loan,
        closing_costs: inputs.refinance.closing_cost_rate * refi_loan,
        points: inputs.refinance.points_rate * refi_loan,
        // Interest-only bridge, so the payoff is the original principal
        bridge_payoff: bridge_principal,
    };
    let cash_left_in_deal = cash_invested_before_refi - refinance.cash_out();
    let cash_required = cash_left_in_deal.max(0.0);

    let long_term_months = inputs.long_term_loan.loan_term_months;
    let model = BrrrrModel {
        inputs,
        starting_value: base.as_is_starting_value(),
        monthly_appreciation: base.monthly_appreciation_rate(),
        bridge_principal,
        bridge_monthly_interest: inputs.bridge.monthly_interest(bridge_principal),
        long_term_schedule: build_amortization_schedule(&AmortizationParams::new(
            refi_loan,
            inputs.long_term_loan.monthly_rate(),
            long_term_months,
        )),
    };

    log::debug!(
        "brrrr: bridge {:.2}, cash before refi {:.2}, refi loan {:.2}, cash-out {:.2}, left in deal {:.2}",
        bridge_principal,
        cash_invested_before_refi,
        refi_loan,
        refinance.cash_out(),
        cash_left_in_deal
    );

    let timeline = Timeline::new()
        .then(Phase::Rehab, inputs.rehab_months)
        .then(Phase::Stabilized, long_term_months);

    let mut state = ProjectionState::seeded(cash_invested_before_refi, timeline.total_months() as usize);
    for step in timeline.steps() {
        let row = match step.phase {
            Phase::Rehab => model.rehab_month(step),
            _ => model.stabilized_month(step),
        };
        state.record(row);
    }
    let monthly = state.into_rows();

    let basis = RollupBasis {
        cash_invested: cash_required,
        baseline_equity: model.starting_value - bridge_principal,
    };
    let annual = rollup_annual(&monthly, basis, |idx| model.interest_at(idx));

    let metrics = BrrrrMetrics {
        rental: RentalMetrics::from_annual(cash_required, &annual),
        cash_left_in_deal,
        refi_proceeds: refi_loan,
        bridge_interest: inputs.rehab_months as f64 * model.bridge_monthly_interest,
    };

    BrrrrResult { monthly, annual, metrics }
}
