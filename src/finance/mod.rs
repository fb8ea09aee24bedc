//! Loan math primitives: rate conversion, level payments and amortization schedules

mod amortization;
mod ratio;

pub use amortization::{
    periodic_rate_from_annual, payment, interest_portion, principal_portion,
    build_amortization_schedule, AmortizationParams, AmortizationRow, PaymentTiming,
};
pub use ratio::safe_ratio;
