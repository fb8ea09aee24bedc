//! CSV-based assumption overrides
//!
//! The file holds `name,value` rows, values as decimals:
//!
//! ```text
//! name,value
//! property_tax_rate,0.0185
//! insurance_per_month,160
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::Assumptions;
use crate::error::LoadError;

/// Default path to the overrides file
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions.csv";

#[derive(Debug, serde::Deserialize)]
struct OverrideRow {
    name: String,
    value: f64,
}

/// Apply `name,value` overrides from any reader on top of `base`
pub fn apply_overrides_from_reader<R: Read>(
    base: Assumptions,
    reader: R,
) -> Result<Assumptions, LoadError> {
    let mut assumptions = base;
    let mut csv_reader = csv::Reader::from_reader(reader);

    for result in csv_reader.deserialize() {
        let row: OverrideRow = result?;
        let slot = assumptions
            .slot_mut(row.name.trim())
            .ok_or_else(|| LoadError::UnknownAssumption(row.name.clone()))?;
        *slot = row.value;
        log::debug!("assumption override {} = {}", row.name.trim(), row.value);
    }

    Ok(assumptions)
}

/// Load overrides from a CSV file on top of the industry defaults
pub fn load_overrides(path: &Path) -> Result<Assumptions, LoadError> {
    let file = File::open(path)?;
    apply_overrides_from_reader(Assumptions::default(), file)
}
