//! Deal inputs for the three investment strategies

mod file;
mod inputs;
mod validation;

pub use file::{load_deals, load_deals_from_reader};
pub use inputs::{
    BridgeLoan, BrrrrInputs, BuyHoldInputs, DealBase, Financing, FlipInputs, LoanTerms,
    RefinanceTerms, RentalExpenses, RentalIncome, Strategy, StrategyInputs,
};
pub use validation::advisory_warnings;
