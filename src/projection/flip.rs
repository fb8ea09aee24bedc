//! Fix-and-flip: interest-only carry through rehab and marketing, closed out
//! by a single sale event

use serde::{Deserialize, Serialize};

use super::cashflows::{MonthlyResult, Phase};
use super::state::{property_value_for_month, ProjectionState};
use super::timeline::{Step, Timeline};
use crate::deal::FlipInputs;
use crate::finance::safe_ratio;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipMetrics {
    /// Cash at purchase plus every carrying cost of the hold
    pub total_cash_required: f64,
    pub profit_before_tax: f64,
    /// Taxed at the marginal rate only when profitable
    pub profit_after_tax: f64,
    pub roi: f64,
    pub hold_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipResult {
    pub monthly: Vec<MonthlyResult>,
    pub metrics: FlipMetrics,
}

/// Sale-side figures
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sale {
    price: f64,
    agent_fees: f64,
    seller_closing_costs: f64,
}

impl Sale {
    fn disposition_costs(&self) -> f64 {
        self.agent_fees + self.seller_closing_costs
    }

    fn proceeds_after_costs(&self) -> f64 {
        self.price - self.disposition_costs()
    }
}

struct FlipModel<'a> {
    inputs: &'a FlipInputs,
    starting_value: f64,
    monthly_appreciation: f64,
    bridge_principal: f64,
    bridge_monthly_interest: f64,
}

impl FlipModel<'_> {
    /// Rehab and marketing months carry identically; only the tag differs
    fn hold_month(&self, step: Step) -> MonthlyResult {
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

    /// Synthetic month after the hold: sale, disposition costs, bridge payoff
    fn sale_event(&self, month: u32, sale: Sale) -> MonthlyResult {
        let net_after_payoff = sale.proceeds_after_costs() - self.bridge_principal;

        MonthlyResult {
            month,
            rent: 0.0,
            gross_income: sale.price,
            vacancy: 0.0,
            operating_expenses: sale.disposition_costs(),
            noi: sale.proceeds_after_costs(),
            debt_service: self.bridge_principal,
            cash_flow: net_after_payoff,
            cumulative_cash_flow: 0.0,
            property_value: sale.price,
            equity: sale.price - self.bridge_principal,
            loan_balance: 0.0,
            taxes: 0.0,
            insurance: 0.0,
            rehab_spend: 0.0,
            phase: Phase::Marketing,
        }
    }
}

/// Project a flip from purchase through sale
pub fn calculate_flip(inputs: &FlipInputs) -> FlipResult {
    let base = &inputs.base;
    let hold_months = inputs.hold_months();

    let bridge_principal = inputs.bridge.principal(base.purchase_price, base.rehab_cost);
    let down_payment = (base.purchase_price + base.rehab_cost - bridge_principal).max(0.0);
    let cash_invested_at_purchase = down_payment + base.purchase_closing_costs();

    let model = FlipModel {
        inputs,
        starting_value: base.as_is_starting_value(),
        monthly_appreciation: base.monthly_appreciation_rate(),
        bridge_principal,
        bridge_monthly_interest: inputs.bridge.monthly_interest(bridge_principal),
    };

    let sale_price = inputs.sale_price();
    let sale = Sale {
        price: sale_price,
        agent_fees: sale_price * inputs.agent_fee_rate,
        seller_closing_costs: sale_price * inputs.seller_closing_cost_rate,
    };

    let timeline = Timeline::new()
        .then(Phase::Rehab, inputs.rehab_months)
        .then(Phase::Marketing, inputs.months_on_market);

    let mut state = ProjectionState::seeded(cash_invested_at_purchase, hold_months as usize + 1);
    for step in timeline.steps() {
        state.record(model.hold_month(step));
    }

    let hold = state.rows();
    let interest_total = hold_months as f64 * model.bridge_monthly_interest;
    let taxes_total: f64 = hold.iter().map(|r| r.taxes).sum();
    let insurance_total = hold_months as f64 * base.insurance_per_month;

    state.record(model.sale_event(hold_months + 1, sale));
    let monthly = state.into_rows();

    let net_after_payoff = sale.proceeds_after_costs() - bridge_principal;
    let total_cash_required = cash_invested_at_purchase + interest_total + taxes_total + insurance_total;
    let profit_before_tax = net_after_payoff - total_cash_required;
    let profit_after_tax = if profit_before_tax > 0.0 {
        profit_before_tax * (1.0 - inputs.marginal_tax_rate)
    } else {
        profit_before_tax
    };
    let roi = if total_cash_required > 0.0 {
        safe_ratio(profit_before_tax, total_cash_required).unwrap_or(0.0)
    } else {
        0.0
    };

    log::debug!(
        "flip: bridge {:.2}, cash at purchase {:.2}, sale proceeds {:.2}, net after payoff {:.2}, {} hold months",
        bridge_principal,
        cash_invested_at_purchase,
        sale.proceeds_after_costs(),
        net_after_payoff,
        hold_months
    );

    FlipResult {
        monthly,
        metrics: FlipMetrics {
            total_cash_required,
            profit_before_tax,
            profit_after_tax,
            roi,
            hold_months,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{BridgeLoan, DealBase};
    use crate::finance::periodic_rate_from_annual;
    use approx::assert_abs_diff_eq;

    fn scenario() -> FlipInputs {
        FlipInputs {
            base: DealBase {
                purchase_price: 120_000.0,
                rehab_cost: 30_000.0,
                arv: 200_000.0,
                purchase_closing_cost_rate: 0.01,
                annual_appreciation_rate: 0.0,
                annual_rent_increase_rate: 0.0,
                property_tax_rate: 0.01,
                insurance_per_month: 100.0,
                as_is_value: None,
            },
            rehab_months: 4,
            months_on_market: 2,
            sale_price: None,
            agent_fee_rate: 0.06,
            seller_closing_cost_rate: 0.02,
            marginal_tax_rate: 0.25,
            bridge: BridgeLoan {
                ltv: Some(0.9),
                interest_rate_annual: 0.1,
                term_months: None,
            },
        }
    }

    #[test]
    fn test_hold_costs_and_sale_profit() {
        let result = calculate_flip(&scenario());

        assert_eq!(result.monthly.len(), 7);
        assert_eq!(result.metrics.hold_months, 6);

        let bridge_principal = 0.9 * 150_000.0;
        let interest_total = 6.0 * periodic_rate_from_annual(0.1) * bridge_principal;
        let cash_invested = 150_000.0 - bridge_principal + 1_200.0;
        let taxes_total = 6.0 * 0.01 * 120_000.0 / 12.0;
        let expected = cash_invested + interest_total + taxes_total + 600.0;
        assert_abs_diff_eq!(result.metrics.total_cash_required, expected, epsilon = 0.5);

        assert_abs_diff_eq!(
            result.metrics.roi,
            result.metrics.profit_before_tax / result.metrics.total_cash_required,
            epsilon = 1e-9
        );

        let net = 200_000.0 * (1.0 - 0.08) - bridge_principal;
        assert_abs_diff_eq!(result.metrics.profit_before_tax, net - result.metrics.total_cash_required, epsilon = 1e-6);
        assert!(result.metrics.profit_before_tax > 0.0);
        assert_abs_diff_eq!(
            result.metrics.profit_after_tax,
            result.metrics.profit_before_tax * 0.75,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_phase_tags_and_sale_row() {
        let result = calculate_flip(&scenario());

        let phases: Vec<Phase> = result.monthly.iter().map(|r| r.phase).collect();
        assert_eq!(
            phases,
            vec![
                Phase::Rehab,
                Phase::Rehab,
                Phase::Rehab,
                Phase::Rehab,
                Phase::Marketing,
                Phase::Marketing,
                Phase::Marketing,
            ]
        );

        let sale = result.monthly.last().unwrap();
        assert_eq!(sale.month, 7);
        assert_eq!(sale.gross_income, 200_000.0);
        assert_abs_diff_eq!(sale.operating_expenses, 16_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sale.debt_service, 135_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(sale.cash_flow, 184_000.0 - 135_000.0, epsilon = 1e-6);
        assert_eq!(sale.loan_balance, 0.0);
        assert_eq!(sale.taxes, 0.0);
    }

    #[test]
    fn test_hold_months_are_interest_only() {
        let result = calculate_flip(&scenario());
        let interest = 135_000.0 * periodic_rate_from_annual(0.1);

        for row in &result.monthly[..6] {
            assert_abs_diff_eq!(row.debt_service, interest, epsilon = 1e-6);
            assert_abs_diff_eq!(row.loan_balance, 135_000.0, epsilon = 1e-6);
            assert_eq!(row.rent, 0.0);
        }
        assert_eq!(result.monthly[0].rehab_spend, 30_000.0);
        assert_eq!(result.monthly[1].rehab_spend, 0.0);
    }

    #[test]
    fn test_cumulative_ends_at_profit() {
        let result = calculate_flip(&scenario());
        let last = result.monthly.last().unwrap();
        assert_abs_diff_eq!(last.cumulative_cash_flow, result.metrics.profit_before_tax, epsilon = 0.5);
    }

    #[test]
    fn test_loss_is_not_taxed() {
        let mut inputs = scenario();
        inputs.sale_price = Some(140_000.0);
        let result = calculate_flip(&inputs);

        assert!(result.metrics.profit_before_tax < 0.0);
        assert_eq!(result.metrics.profit_after_tax, result.metrics.profit_before_tax);
        assert!(result.metrics.roi < 0.0);
    }

    #[test]
    fn test_explicit_sale_price_overrides_arv() {
        let mut inputs = scenario();
        inputs.sale_price = Some(210_000.0);
        let result = calculate_flip(&inputs);
        assert_eq!(result.monthly.last().unwrap().gross_income, 210_000.0);
    }

    #[test]
    fn test_fully_financed_flip_without_costs_has_zero_roi() {
        let mut inputs = scenario();
        inputs.bridge.ltv = None;
        inputs.bridge.interest_rate_annual = 0.0;
        inputs.base.purchase_closing_cost_rate = 0.0;
        inputs.base.property_tax_rate = 0.0;
        inputs.base.insurance_per_month = 0.0;
        let result = calculate_flip(&inputs);

        assert_eq!(result.metrics.total_cash_required, 0.0);
        assert_eq!(result.metrics.roi, 0.0);
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let inputs = scenario();
        assert_eq!(calculate_flip(&inputs), calculate_flip(&inputs));
    }
}
