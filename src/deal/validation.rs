//! Advisory input checks
//!
//! These never block a projection; they produce human-readable warnings the
//! caller can show next to the results.

use super::inputs::StrategyInputs;

/// Collect warnings for inputs that will project but probably aren't intended
pub fn advisory_warnings(inputs: &StrategyInputs) -> Vec<String> {
    let mut warnings = Vec::new();
    let base = inputs.base();

    if base.purchase_price <= 0.0 {
        warnings.push("Purchase price should be greater than zero.".to_string());
    }
    if base.arv <= 0.0 {
        warnings.push("ARV should be greater than zero.".to_string());
    }

    if let Some(loan) = inputs.amortizing_loan() {
        if loan.loan_term_months == 0 {
            warnings.push("Loan term should be greater than zero months.".to_string());
        }
        if !loan.interest_rate_annual.is_finite() {
            warnings.push("Interest rate looks missing.".to_string());
        }
    }

    if let Some(rental) = inputs.rental() {
        if rental.monthly_rent <= 0.0 {
            warnings.push("Monthly rent should be greater than zero for rental strategies.".to_string());
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> StrategyInputs {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_clean_buy_hold_has_no_warnings() {
        let inputs = parse(
            r#"{"strategy":"buy_hold","purchase_price":200000,"arv":210000,"monthly_rent":1800,
                "loan_term_months":360,"interest_rate_annual":0.065,"ltv":0.75}"#,
        );
        assert!(advisory_warnings(&inputs).is_empty());
    }

    #[test]
    fn test_rental_problems_are_reported() {
        let inputs = parse(
            r#"{"strategy":"buy_hold","purchase_price":0,"arv":0,"monthly_rent":0,
                "loan_term_months":0,"interest_rate_annual":0.065}"#,
        );
        let warnings = advisory_warnings(&inputs);
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().any(|w| w.contains("Loan term")));
        assert!(warnings.iter().any(|w| w.contains("Monthly rent")));
    }

    #[test]
    fn test_flip_ignores_rent_and_loan_checks() {
        let inputs = parse(
            r#"{"strategy":"flip","purchase_price":150000,"arv":230000,
                "rehab_months":4,"months_on_market":2}"#,
        );
        assert!(advisory_warnings(&inputs).is_empty());
    }

    #[test]
    fn test_brrrr_checks_long_term_loan() {
        let inputs = parse(
            r#"{"strategy":"brrrr","purchase_price":150000,"arv":220000,"monthly_rent":1900,
                "rehab_months":6,"refinance":{"ltv":0.75},
                "long_term_loan":{"loan_term_months":0,"interest_rate_annual":0.07}}"#,
        );
        assert_eq!(advisory_warnings(&inputs), vec!["Loan term should be greater than zero months.".to_string()]);
    }
}
