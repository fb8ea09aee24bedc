//! Rehab budget estimation from a priced catalog of line items

mod catalog;
pub mod loader;

pub use catalog::{
    line_total, price_bands, standard_catalog, total_rehab_cost, BasePrices, PriceBands,
    QualityTier, RehabItem, RehabSelection, TierMultipliers, UnitType,
};
pub use loader::{load_catalog, load_selections};
