//! Market and financing assumptions used to seed and reset deal inputs
//!
//! The engine never reads these directly: they are turned into input records
//! (`template`) or written over an existing record (`apply_to`), so tests and
//! callers can substitute any assumption set they like.

pub mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::deal::{
    BridgeLoan, BrrrrInputs, BuyHoldInputs, DealBase, FlipInputs, LoanTerms, RefinanceTerms,
    RentalIncome, Strategy, StrategyInputs,
};
use crate::error::LoadError;
use crate::rehab::TierMultipliers;

const FLIP_TEMPLATE_SALE_PRICE: f64 = 235_000.0;

/// Industry-average rates and costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub purchase_closing_cost_rate: f64,
    pub refi_closing_cost_rate: f64,
    pub refi_points_rate: f64,
    pub annual_appreciation_rate: f64,
    pub annual_rent_increase_rate: f64,
    pub property_tax_rate: f64,
    pub insurance_per_month: f64,
    pub vacancy_rate: f64,
    pub repairs_rate: f64,
    pub capex_rate: f64,
    pub management_rate: f64,
    pub lease_up_fee: f64,
    pub buy_hold_ltv: f64,
    pub long_term_interest_rate_annual: f64,
    /// Stored as a float so every entry can be overridden the same way
    pub long_term_loan_term_months: f64,
    pub bridge_ltv: f64,
    pub bridge_interest_rate_annual: f64,
    pub bridge_term_months: f64,
    pub refi_ltv: f64,
    pub agent_fee_rate: f64,
    pub seller_closing_cost_rate: f64,
    pub marginal_tax_rate: f64,
    pub rehab_tiers: TierMultipliers,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            purchase_closing_cost_rate: 0.025,
            refi_closing_cost_rate: 0.025,
            refi_points_rate: 0.01,
            annual_appreciation_rate: 0.03,
            annual_rent_increase_rate: 0.025,
            property_tax_rate: 0.0125,
            insurance_per_month: 135.0,
            vacancy_rate: 0.06,
            repairs_rate: 0.08,
            capex_rate: 0.05,
            management_rate: 0.08,
            lease_up_fee: 500.0,
            buy_hold_ltv: 0.75,
            long_term_interest_rate_annual: 0.0675,
            long_term_loan_term_months: 360.0,
            bridge_ltv: 0.85,
            bridge_interest_rate_annual: 0.10,
            bridge_term_months: 6.0,
            refi_ltv: 0.75,
            agent_fee_rate: 0.06,
            seller_closing_cost_rate: 0.02,
            marginal_tax_rate: 0.25,
            rehab_tiers: TierMultipliers::default(),
        }
    }
}

impl Assumptions {
    /// Load overrides from a CSV file on top of the defaults
    pub fn from_csv_path(path: &Path) -> Result<Self, LoadError> {
        loader::load_overrides(path)
    }

    /// Mutable access to an entry by its CSV name
    pub fn slot_mut(&mut self, name: &str) -> Option<&mut f64> {
        let slot = match name {
            "purchase_closing_cost_rate" => &mut self.purchase_closing_cost_rate,
            "refi_closing_cost_rate" => &mut self.refi_closing_cost_rate,
            "refi_points_rate" => &mut self.refi_points_rate,
            "annual_appreciation_rate" => &mut self.annual_appreciation_rate,
            "annual_rent_increase_rate" => &mut self.annual_rent_increase_rate,
            "property_tax_rate" => &mut self.property_tax_rate,
            "insurance_per_month" => &mut self.insurance_per_month,
            "vacancy_rate" => &mut self.vacancy_rate,
            "repairs_rate" => &mut self.repairs_rate,
            "capex_rate" => &mut self.capex_rate,
            "management_rate" => &mut self.management_rate,
            "lease_up_fee" => &mut self.lease_up_fee,
            "buy_hold_ltv" => &mut self.buy_hold_ltv,
            "long_term_interest_rate_annual" => &mut self.long_term_interest_rate_annual,
            "long_term_loan_term_months" => &mut self.long_term_loan_term_months,
            "bridge_ltv" => &mut self.bridge_ltv,
            "bridge_interest_rate_annual" => &mut self.bridge_interest_rate_annual,
            "bridge_term_months" => &mut self.bridge_term_months,
            "refi_ltv" => &mut self.refi_ltv,
            "agent_fee_rate" => &mut self.agent_fee_rate,
            "seller_closing_cost_rate" => &mut self.seller_closing_cost_rate,
            "marginal_tax_rate" => &mut self.marginal_tax_rate,
            "rehab_tier_a_multiplier" => &mut self.rehab_tiers.a,
            "rehab_tier_b_multiplier" => &mut self.rehab_tiers.b,
            "rehab_tier_c_multiplier" => &mut self.rehab_tiers.c,
            _ => return None,
        };
        Some(slot)
    }

    fn long_term_months(&self) -> u32 {
        self.long_term_loan_term_months.max(0.0).round() as u32
    }

    fn bridge_months(&self) -> u32 {
        self.bridge_term_months.max(0.0).round() as u32
    }

    fn rental(&self, monthly_rent: f64) -> RentalIncome {
        RentalIncome {
            monthly_rent,
            vacancy_rate: self.vacancy_rate,
            repairs_rate: self.repairs_rate,
            capex_rate: self.capex_rate,
            management_rate: self.management_rate,
            lease_up_fee: self.lease_up_fee,
        }
    }

    fn base(&self, purchase_price: f64, rehab_cost: f64, arv: f64) -> DealBase {
        DealBase {
            purchase_price,
            rehab_cost,
            arv,
            purchase_closing_cost_rate: self.purchase_closing_cost_rate,
            annual_appreciation_rate: self.annual_appreciation_rate,
            annual_rent_increase_rate: self.annual_rent_increase_rate,
            property_tax_rate: self.property_tax_rate,
            insurance_per_month: self.insurance_per_month,
            as_is_value: None,
        }
    }

    fn long_term_loan(&self, ltv: f64) -> LoanTerms {
        LoanTerms {
            loan_term_months: self.long_term_months(),
            interest_rate_annual: self.long_term_interest_rate_annual,
            ltv: Some(ltv),
            down_payment: None,
            loan_amount: None,
            points_rate: 0.0,
            loan_closing_cost_rate: 0.0,
        }
    }

    fn bridge(&self, with_term: bool) -> BridgeLoan {
        BridgeLoan {
            ltv: Some(self.bridge_ltv),
            interest_rate_annual: self.bridge_interest_rate_annual,
            term_months: with_term.then(|| self.bridge_months()),
        }
    }

    /// A starter deal for the strategy, priced like a typical single-family purchase
    pub fn template(&self, strategy: Strategy) -> StrategyInputs {
        match strategy {
            Strategy::BuyHold => StrategyInputs::BuyHold(BuyHoldInputs {
                base: self.base(250_000.0, 0.0, 250_000.0),
                rental: self.rental(2_000.0),
                loan: self.long_term_loan(self.buy_hold_ltv),
            }),
            Strategy::Brrrr => StrategyInputs::Brrrr(BrrrrInputs {
                base: self.base(200_000.0, 40_000.0, 280_000.0),
                rental: self.rental(2_300.0),
                bridge: self.bridge(true),
                rehab_months: 6,
                refinance: RefinanceTerms {
                    ltv: self.refi_ltv,
                    points_rate: self.refi_points_rate,
                    closing_cost_rate: self.refi_closing_cost_rate,
                },
                long_term_loan: self.long_term_loan(self.refi_ltv),
            }),
            Strategy::Flip => {
                let mut base = self.base(150_000.0, 35_000.0, 235_000.0);
                base.annual_rent_increase_rate = 0.0;
                StrategyInputs::Flip(FlipInputs {
                    base,
                    rehab_months: 5,
                    months_on_market: 2,
                    sale_price: Some(FLIP_TEMPLATE_SALE_PRICE),
                    agent_fee_rate: self.agent_fee_rate,
                    seller_closing_cost_rate: self.seller_closing_cost_rate,
                    marginal_tax_rate: self.marginal_tax_rate,
                    bridge: self.bridge(false),
                })
            }
        }
    }

    /// Reset every rate in `inputs` to this assumption set.
    ///
    /// Prices, rent and timing are kept; any that are not finite numbers are
    /// replaced with the strategy template's values.
    pub fn apply_to(&self, inputs: &mut StrategyInputs) {
        let fallback = self.template(inputs.strategy());

        let base = inputs.base_mut();
        base.purchase_price = finite_or(base.purchase_price, fallback.base().purchase_price);
        base.rehab_cost = finite_or(base.rehab_cost, fallback.base().rehab_cost);
        base.arv = finite_or(base.arv, fallback.base().arv);
        base.purchase_closing_cost_rate = self.purchase_closing_cost_rate;
        base.annual_appreciation_rate = self.annual_appreciation_rate;
        base.property_tax_rate = self.property_tax_rate;
        base.insurance_per_month = self.insurance_per_month;

        let fallback_rent = fallback.rental().map(|r| r.monthly_rent).unwrap_or(0.0);

        match inputs {
            StrategyInputs::BuyHold(deal) => {
                deal.base.annual_rent_increase_rate = self.annual_rent_increase_rate;
                deal.rental = self.rental(finite_or(deal.rental.monthly_rent, fallback_rent));
                deal.loan.interest_rate_annual = self.long_term_interest_rate_annual;
                deal.loan.loan_term_months = self.long_term_months();
                deal.loan.ltv = Some(self.buy_hold_ltv);
            }
            StrategyInputs::Brrrr(deal) => {
                deal.base.annual_rent_increase_rate = self.annual_rent_increase_rate;
                deal.rental = self.rental(finite_or(deal.rental.monthly_rent, fallback_rent));
                deal.bridge = self.bridge(true);
                deal.refinance = RefinanceTerms {
                    ltv: self.refi_ltv,
                    points_rate: self.refi_points_rate,
                    closing_cost_rate: self.refi_closing_cost_rate,
                };
                deal.long_term_loan.loan_term_months = self.long_term_months();
                deal.long_term_loan.interest_rate_annual = self.long_term_interest_rate_annual;
                deal.long_term_loan.ltv = Some(self.refi_ltv);
            }
            StrategyInputs::Flip(deal) => {
                let sale = deal.sale_price.unwrap_or(deal.base.arv);
                deal.sale_price = Some(finite_or(sale, FLIP_TEMPLATE_SALE_PRICE));
                deal.agent_fee_rate = self.agent_fee_rate;
                deal.seller_closing_cost_rate = self.seller_closing_cost_rate;
                deal.marginal_tax_rate = self.marginal_tax_rate;
                deal.bridge.interest_rate_annual = self.bridge_interest_rate_annual;
                deal.bridge.ltv = Some(self.bridge_ltv);
            }
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
