//! Load rehab catalogs and selections from CSV
//!
//! Catalog columns: `id,category,label,unit_type,unit_price,base_price_b,base_price_c,default_quantity`
//! Selection columns: `id,selected,quantity,override_unit_price`
//! Blank cells are treated as missing values.

use std::io::Read;
use std::path::Path;

use csv::Reader;

use super::catalog::{BasePrices, RehabItem, RehabSelection, UnitType};
use crate::error::LoadError;

/// Raw CSV row for a catalog item
#[derive(Debug, serde::Deserialize)]
struct ItemRow {
    id: String,
    category: Option<String>,
    label: String,
    unit_type: String,
    unit_price: Option<f64>,
    base_price_b: Option<f64>,
    base_price_c: Option<f64>,
    default_quantity: Option<f64>,
}

impl ItemRow {
    fn into_item(self) -> Result<RehabItem, LoadError> {
        let unit_type = match self.unit_type.trim().to_ascii_lowercase().as_str() {
            "fixed" => UnitType::Fixed,
            "quantity" => UnitType::Quantity,
            _ => {
                return Err(LoadError::UnknownUnitType {
                    id: self.id,
                    unit_type: self.unit_type,
                })
            }
        };

        let base_prices = if self.base_price_b.is_some() || self.base_price_c.is_some() {
            Some(BasePrices {
                b: self.base_price_b,
                c: self.base_price_c,
            })
        } else {
            None
        };

        Ok(RehabItem {
            id: self.id,
            category: self.category.filter(|c| !c.is_empty()),
            label: self.label,
            unit_type,
            unit_price: self.unit_price,
            base_prices,
            default_quantity: self.default_quantity,
        })
    }
}

/// Load a catalog from any reader
pub fn load_catalog_from_reader<R: Read>(reader: R) -> Result<Vec<RehabItem>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut items = Vec::new();

    for result in csv_reader.deserialize() {
        let row: ItemRow = result?;
        items.push(row.into_item()?);
    }

    Ok(items)
}

/// Load a catalog from a CSV file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<RehabItem>, LoadError> {
    let file = std::fs::File::open(path)?;
    load_catalog_from_reader(file)
}

/// Load selections from any reader
pub fn load_selections_from_reader<R: Read>(reader: R) -> Result<Vec<RehabSelection>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut selections = Vec::new();

    for result in csv_reader.deserialize() {
        let selection: RehabSelection = result?;
        selections.push(selection);
    }

    Ok(selections)
}

/// Load selections from a CSV file
pub fn load_selections<P: AsRef<Path>>(path: P) -> Result<Vec<RehabSelection>, LoadError> {
    let file = std::fs::File::open(path)?;
    load_selections_from_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rehab::{total_rehab_cost, QualityTier, TierMultipliers};

    const CATALOG: &str = "\
id,category,label,unit_type,unit_price,base_price_b,base_price_c,default_quantity
paint,General,Interior paint,quantity,,2.5,1.5,1000
roof,,New roof,fixed,9000,,,
";

    #[test]
    fn test_load_catalog() {
        let items = load_catalog_from_reader(CATALOG.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].unit_type, UnitType::Quantity);
        assert_eq!(items[0].base_prices, Some(BasePrices { b: Some(2.5), c: Some(1.5) }));
        assert_eq!(items[0].default_quantity, Some(1000.0));

        assert_eq!(items[1].category, None);
        assert_eq!(items[1].unit_price, Some(9000.0));
        assert_eq!(items[1].base_prices, None);
    }

    #[test]
    fn test_bad_unit_type_is_rejected() {
        let csv = "id,category,label,unit_type,unit_price,base_price_b,base_price_c,default_quantity\nx,,X,bundle,1,,,\n";
        let err = load_catalog_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::UnknownUnitType { .. }));
    }

    #[test]
    fn test_selections_drive_total() {
        let items = load_catalog_from_reader(CATALOG.as_bytes()).unwrap();
        let selections = load_selections_from_reader(
            "id,selected,quantity,override_unit_price\npaint,true,,\nroof,false,1,\n".as_bytes(),
        )
        .unwrap();

        let total = total_rehab_cost(&items, &selections, QualityTier::B, &TierMultipliers::default());
        assert_eq!(total, 2.5 * 1000.0);
    }
}
