//! Strategy input records
//!
//! All rates are decimals (0.07 = 7%). Optional rates that are simply absent
//! deserialize to 0; fields whose presence changes the calculation are `Option`.

use serde::{Deserialize, Serialize};

use crate::finance::periodic_rate_from_annual;

/// Investment strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    BuyHold,
    Brrrr,
    Flip,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::BuyHold => "buy_hold",
            Strategy::Brrrr => "brrrr",
            Strategy::Flip => "flip",
        }
    }
}

/// Fields every strategy shares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealBase {
    pub purchase_price: f64,
    #[serde(default)]
    pub rehab_cost: f64,
    /// After-repair value
    pub arv: f64,
    #[serde(default)]
    pub purchase_closing_cost_rate: f64,
    #[serde(default)]
    pub annual_appreciation_rate: f64,
    #[serde(default)]
    pub annual_rent_increase_rate: f64,
    /// Annual property tax as a fraction of property value
    #[serde(default)]
    pub property_tax_rate: f64,
    #[serde(default)]
    pub insurance_per_month: f64,
    /// Pre-rehab value; purchase price when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_is_value: Option<f64>,
}

impl DealBase {
    pub fn purchase_closing_costs(&self) -> f64 {
        self.purchase_closing_cost_rate * self.purchase_price
    }

    /// Value the property carries before any rehab
    pub fn as_is_starting_value(&self) -> f64 {
        self.as_is_value.unwrap_or(self.purchase_price)
    }

    /// Monthly equivalent of the annual appreciation rate
    pub fn monthly_appreciation_rate(&self) -> f64 {
        periodic_rate_from_annual(self.annual_appreciation_rate)
    }

    /// One month of property tax on the given value
    pub fn monthly_taxes(&self, property_value: f64) -> f64 {
        self.property_tax_rate * property_value / 12.0
    }
}

/// Rent and rent-proportional reserve assumptions for rental strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalIncome {
    pub monthly_rent: f64,
    #[serde(default)]
    pub vacancy_rate: f64,
    #[serde(default)]
    pub repairs_rate: f64,
    #[serde(default)]
    pub capex_rate: f64,
    #[serde(default)]
    pub management_rate: f64,
    /// Charged every rental month
    #[serde(default)]
    pub lease_up_fee: f64,
}

/// Operating cost breakdown for one rental month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentalExpenses {
    pub vacancy: f64,
    pub repairs: f64,
    pub capex: f64,
    pub management: f64,
    pub lease_up: f64,
}

impl RentalExpenses {
    pub fn total(&self) -> f64 {
        self.vacancy + self.repairs + self.capex + self.management + self.lease_up
    }
}

impl RentalIncome {
    pub fn expenses_for(&self, rent: f64) -> RentalExpenses {
        RentalExpenses {
            vacancy: rent * self.vacancy_rate,
            repairs: rent * self.repairs_rate,
            capex: rent * self.capex_rate,
            management: rent * self.management_rate,
            lease_up: self.lease_up_fee,
        }
    }
}

/// Amortizing loan terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_term_months: u32,
    pub interest_rate_annual: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ltv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_amount: Option<f64>,
    #[serde(default)]
    pub points_rate: f64,
    #[serde(default)]
    pub loan_closing_cost_rate: f64,
}

/// How a purchase is split between debt and cash
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Financing {
    pub loan_amount: f64,
    pub down_payment: f64,
}

impl LoanTerms {
    /// Split a purchase into loan and down payment.
    ///
    /// Precedence: explicit loan amount, then LTV, then explicit down payment.
    /// With none of them the purchase is all cash.
    pub fn financing(&self, purchase_price: f64) -> Financing {
        if let Some(loan_amount) = self.loan_amount {
            return Financing {
                loan_amount,
                down_payment: (purchase_price - loan_amount).max(0.0),
            };
        }
        if let Some(ltv) = self.ltv {
            let loan_amount = purchase_price * ltv;
            return Financing {
                loan_amount,
                down_payment: (purchase_price - loan_amount).max(0.0),
            };
        }
        if let Some(down_payment) = self.down_payment {
            return Financing {
                loan_amount: (purchase_price - down_payment).max(0.0),
                down_payment,
            };
        }
        Financing {
            loan_amount: 0.0,
            down_payment: purchase_price,
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        periodic_rate_from_annual(self.interest_rate_annual)
    }
}

/// Short-term interest-only loan covering purchase and rehab
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BridgeLoan {
    /// Fraction of purchase + rehab financed; fully financed when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ltv: Option<f64>,
    #[serde(default)]
    pub interest_rate_annual: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
}

impl BridgeLoan {
    pub fn principal(&self, purchase_price: f64, rehab_cost: f64) -> f64 {
        self.ltv.unwrap_or(1.0) * (purchase_price + rehab_cost)
    }

    pub fn monthly_rate(&self) -> f64 {
        periodic_rate_from_annual(self.interest_rate_annual)
    }

    /// Interest-only carry for one month; principal never amortizes
    pub fn monthly_interest(&self, principal: f64) -> f64 {
        principal * self.monthly_rate()
    }
}

/// Cash-out refinance terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceTerms {
    /// Loan as a fraction of ARV
    pub ltv: f64,
    #[serde(default)]
    pub points_rate: f64,
    #[serde(default)]
    pub closing_cost_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyHoldInputs {
    #[serde(flatten)]
    pub base: DealBase,
    #[serde(flatten)]
    pub rental: RentalIncome,
    #[serde(flatten)]
    pub loan: LoanTerms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrrrrInputs {
    #[serde(flatten)]
    pub base: DealBase,
    #[serde(flatten)]
    pub rental: RentalIncome,
    #[serde(default)]
    pub bridge: BridgeLoan,
    pub rehab_months: u32,
    pub refinance: RefinanceTerms,
    pub long_term_loan: LoanTerms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipInputs {
    #[serde(flatten)]
    pub base: DealBase,
    pub rehab_months: u32,
    pub months_on_market: u32,
    /// Defaults to ARV
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub agent_fee_rate: f64,
    #[serde(default)]
    pub seller_closing_cost_rate: f64,
    #[serde(default)]
    pub marginal_tax_rate: f64,
    #[serde(default)]
    pub bridge: BridgeLoan,
}

impl FlipInputs {
    pub fn hold_months(&self) -> u32 {
        self.rehab_months + self.months_on_market
    }

    pub fn sale_price(&self) -> f64 {
        self.sale_price.unwrap_or(self.base.arv)
    }
}

/// A deal tagged with its strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StrategyInputs {
    BuyHold(BuyHoldInputs),
    Brrrr(BrrrrInputs),
    Flip(FlipInputs),
}

impl StrategyInputs {
    pub fn strategy(&self) -> Strategy {
        match self {
            StrategyInputs::BuyHold(_) => Strategy::BuyHold,
            StrategyInputs::Brrrr(_) => Strategy::Brrrr,
            StrategyInputs::Flip(_) => Strategy::Flip,
        }
    }

    pub fn base(&self) -> &DealBase {
        match self {
            StrategyInputs::BuyHold(inputs) => &inputs.base,
            StrategyInputs::Brrrr(inputs) => &inputs.base,
            StrategyInputs::Flip(inputs) => &inputs.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut DealBase {
        match self {
            StrategyInputs::BuyHold(inputs) => &mut inputs.base,
            StrategyInputs::Brrrr(inputs) => &mut inputs.base,
            StrategyInputs::Flip(inputs) => &mut inputs.base,
        }
    }

    /// Fold a rehab budget (e.g. from the rehab catalog) into the deal
    pub fn with_rehab_cost(mut self, rehab_cost: f64) -> Self {
        self.base_mut().rehab_cost = rehab_cost;
        self
    }

    /// Rental assumptions, absent for flips
    pub fn rental(&self) -> Option<&RentalIncome> {
        match self {
            StrategyInputs::BuyHold(inputs) => Some(&inputs.rental),
            StrategyInputs::Brrrr(inputs) => Some(&inputs.rental),
            StrategyInputs::Flip(_) => None,
        }
    }

    /// The amortizing loan, absent for flips
    pub fn amortizing_loan(&self) -> Option<&LoanTerms> {
        match self {
            StrategyInputs::BuyHold(inputs) => Some(&inputs.loan),
            StrategyInputs::Brrrr(inputs) => Some(&inputs.long_term_loan),
            StrategyInputs::Flip(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan() -> LoanTerms {
        LoanTerms {
            loan_term_months: 360,
            interest_rate_annual: 0.06,
            ltv: None,
            down_payment: None,
            loan_amount: None,
            points_rate: 0.0,
            loan_closing_cost_rate: 0.0,
        }
    }

    #[test]
    fn test_financing_precedence() {
        let all = LoanTerms {
            loan_amount: Some(150_000.0),
            ltv: Some(0.5),
            down_payment: Some(10_000.0),
            ..loan()
        };
        assert_eq!(all.financing(200_000.0), Financing { loan_amount: 150_000.0, down_payment: 50_000.0 });

        let ltv_and_down = LoanTerms { loan_amount: None, ..all.clone() };
        assert_eq!(ltv_and_down.financing(200_000.0), Financing { loan_amount: 100_000.0, down_payment: 100_000.0 });

        let down_only = LoanTerms { down_payment: Some(30_000.0), ..loan() };
        assert_eq!(down_only.financing(200_000.0), Financing { loan_amount: 170_000.0, down_payment: 30_000.0 });
    }

    #[test]
    fn test_financing_defaults_to_all_cash() {
        assert_eq!(loan().financing(200_000.0), Financing { loan_amount: 0.0, down_payment: 200_000.0 });
    }

    #[test]
    fn test_down_payment_never_negative() {
        let over_financed = LoanTerms { loan_amount: Some(250_000.0), ..loan() };
        assert_eq!(over_financed.financing(200_000.0).down_payment, 0.0);
    }

    #[test]
    fn test_bridge_defaults_to_full_financing() {
        let bridge = BridgeLoan::default();
        assert_eq!(bridge.principal(150_000.0, 30_000.0), 180_000.0);

        let partial = BridgeLoan { ltv: Some(0.9), ..BridgeLoan::default() };
        assert_eq!(partial.principal(150_000.0, 30_000.0), 0.9 * 180_000.0);
    }

    #[test]
    fn test_tagged_json_round_trip() {
        let json = r#"{
            "strategy": "flip",
            "purchase_price": 120000,
            "rehab_cost": 30000,
            "arv": 200000,
            "rehab_months": 4,
            "months_on_market": 2,
            "bridge": { "ltv": 0.9, "interest_rate_annual": 0.1 }
        }"#;
        let inputs: StrategyInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.strategy(), Strategy::Flip);
        assert_eq!(inputs.base().purchase_price, 120_000.0);
        assert_eq!(inputs.base().property_tax_rate, 0.0);

        match &inputs {
            StrategyInputs::Flip(flip) => {
                assert_eq!(flip.hold_months(), 6);
                assert_eq!(flip.sale_price(), 200_000.0);
                assert_eq!(flip.bridge.ltv, Some(0.9));
            }
            other => panic!("expected flip, got {:?}", other.strategy()),
        }

        let encoded = serde_json::to_string(&inputs).unwrap();
        let decoded: StrategyInputs = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, inputs);
    }

    #[test]
    fn test_with_rehab_cost_replaces_budget() {
        let json = r#"{
            "strategy": "buy_hold",
            "purchase_price": 200000,
            "arv": 200000,
            "monthly_rent": 2000,
            "loan_term_months": 360,
            "interest_rate_annual": 0.06,
            "ltv": 0.8
        }"#;
        let inputs: StrategyInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.base().rehab_cost, 0.0);

        let inputs = inputs.with_rehab_cost(12_500.0);
        assert_eq!(inputs.base().rehab_cost, 12_500.0);
        assert_eq!(inputs.amortizing_loan().and_then(|l| l.ltv), Some(0.8));
    }
}
