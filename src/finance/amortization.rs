//! Level-payment annuity math and amortization schedule construction
//!
//! Rates are decimals per period (0.005 = 0.5% per month). Payments are
//! returned as positive amounts.

use serde::{Deserialize, Serialize};

/// When in the period the payment is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentTiming {
    /// Payment at period end (ordinary annuity)
    #[default]
    End,
    /// Payment at period start (annuity due)
    Begin,
}

/// One period of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Period number (1-indexed)
    pub period: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    /// Balance after this period's payment, floored at 0
    pub balance: f64,
}

/// Parameters for [`build_amortization_schedule`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmortizationParams {
    pub principal: f64,
    pub rate_per_period: f64,
    pub total_payments: u32,
    /// Fixed payment override; derived with [`payment`] when `None`
    pub payment: Option<f64>,
    pub future_value: f64,
    pub timing: PaymentTiming,
}

impl AmortizationParams {
    /// Standard fully-amortizing loan with end-of-period payments
    pub fn new(principal: f64, rate_per_period: f64, total_payments: u32) -> Self {
        Self {
            principal,
            rate_per_period,
            total_payments,
            payment: None,
            future_value: 0.0,
            timing: PaymentTiming::End,
        }
    }
}

/// Convert an annual rate to the equivalent compounded monthly rate.
///
/// `(1 + annual)^(1/12) - 1`, so 0.07 annual gives ~0.005654 monthly.
/// Zero and negative rates pass through unclamped.
pub fn periodic_rate_from_annual(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}

/// Level periodic payment (spreadsheet PMT, sign flipped to positive).
///
/// Returns 0 when there are no periods and straight-line
/// `(principal + future_value) / n` when the rate is zero.
pub fn payment(
    rate_per_period: f64,
    number_of_periods: u32,
    principal: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> f64 {
    if number_of_periods == 0 {
        return 0.0;
    }
    if rate_per_period == 0.0 {
        return (principal + future_value) / number_of_periods as f64;
    }

    let type_flag = match timing {
        PaymentTiming::End => 0.0,
        PaymentTiming::Begin => 1.0,
    };
    let growth = (1.0 + rate_per_period).powi(number_of_periods as i32);
    let numerator = rate_per_period * (principal * growth + future_value);
    let denominator = (1.0 + rate_per_period * type_flag) * (growth - 1.0);
    numerator / denominator
}

/// Walk a loan period by period at a constant payment.
///
/// Interest is always taken on the current balance. With `Begin` timing the
/// payment is applied first and interest accrues on what remains.
pub fn build_amortization_schedule(params: &AmortizationParams) -> Vec<AmortizationRow> {
    if params.total_payments == 0 {
        return Vec::new();
    }

    let payment_amount = params.payment.unwrap_or_else(|| {
        payment(
            params.rate_per_period,
            params.total_payments,
            params.principal,
            params.future_value,
            params.timing,
        )
    });

    let mut rows = Vec::with_capacity(params.total_payments as usize);
    let mut balance = params.principal;

    for period in 1..=params.total_payments {
        let (interest, principal) = match params.timing {
            PaymentTiming::End => {
                let interest = params.rate_per_period * balance;
                let principal = payment_amount - interest;
                balance = (balance - principal).max(0.0);
                (interest, principal)
            }
            PaymentTiming::Begin => {
                balance = (balance - payment_amount).max(0.0);
                (params.rate_per_period * balance, payment_amount)
            }
        };

        rows.push(AmortizationRow {
            period,
            payment: payment_amount,
            interest,
            principal,
            balance,
        });
    }

    rows
}

/// Interest component of a single period's payment (IPMT).
///
/// Out-of-range periods return 0.
pub fn interest_portion(
    rate_per_period: f64,
    period: u32,
    number_of_periods: u32,
    principal: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> f64 {
    if period < 1 || period > number_of_periods {
        return 0.0;
    }
    schedule_row(rate_per_period, period, number_of_periods, principal, future_value, timing)
        .map(|row| row.interest)
        .unwrap_or(0.0)
}

/// Principal component of a single period's payment (PPMT).
///
/// Callers are expected to pass a period within the term; anything past the
/// schedule yields 0.
pub fn principal_portion(
    rate_per_period: f64,
    period: u32,
    number_of_periods: u32,
    principal: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> f64 {
    schedule_row(rate_per_period, period, number_of_periods, principal, future_value, timing)
        .map(|row| row.principal)
        .unwrap_or(0.0)
}

fn schedule_row(
    rate_per_period: f64,
    period: u32,
    number_of_periods: u32,
    principal: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> Option<AmortizationRow> {
    let schedule = build_amortization_schedule(&AmortizationParams {
        principal,
        rate_per_period,
        total_payments: number_of_periods,
        payment: None,
        future_value,
        timing,
    });
    let idx = (period as usize).checked_sub(1)?;
    schedule.get(idx).copied()
}
