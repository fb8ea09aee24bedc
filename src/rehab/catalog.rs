//! Rehab line items, quality-tier pricing and budget aggregation

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Finish quality for a rehab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualityTier {
    /// Premium finishes
    A,
    /// Rental-ready
    #[default]
    B,
    /// Value-driven
    C,
}

impl QualityTier {
    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::A => "A - premium",
            QualityTier::B => "B - rental ready",
            QualityTier::C => "C - value-driven",
        }
    }
}

/// Price multipliers relative to the B tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierMultipliers {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for TierMultipliers {
    fn default() -> Self {
        Self { a: 1.3, b: 1.0, c: 0.8 }
    }
}

impl TierMultipliers {
    pub fn get(&self, tier: QualityTier) -> f64 {
        match tier {
            QualityTier::A => self.a,
            QualityTier::B => self.b,
            QualityTier::C => self.c,
        }
    }
}

/// How an item is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    /// One-off job priced as a whole
    Fixed,
    /// Priced per unit (square foot, window, door...)
    Quantity,
}

/// Known B and C tier prices for an item
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BasePrices {
    pub b: Option<f64>,
    pub c: Option<f64>,
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehabItem {
    /// Unique key, referenced by selections
    pub id: String,
    #[serde(default)]
    pub category: Option<String>,
    pub label: String,
    pub unit_type: UnitType,
    /// Flat B-tier price used when no base price map is known
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub base_prices: Option<BasePrices>,
    #[serde(default)]
    pub default_quantity: Option<f64>,
}

impl RehabItem {
    /// Item priced from a C/B base price pair
    pub fn tiered(
        id: &str,
        category: &str,
        label: &str,
        unit_type: UnitType,
        c_price: f64,
        b_price: f64,
        default_quantity: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            category: Some(category.to_string()),
            label: label.to_string(),
            unit_type,
            unit_price: None,
            base_prices: Some(BasePrices { b: Some(b_price), c: Some(c_price) }),
            default_quantity: Some(default_quantity),
        }
    }

    /// Item with a single flat unit price
    pub fn flat(id: &str, label: &str, unit_type: UnitType, unit_price: f64) -> Self {
        Self {
            id: id.to_string(),
            category: None,
            label: label.to_string(),
            unit_type,
            unit_price: Some(unit_price),
            base_prices: None,
            default_quantity: Some(1.0),
        }
    }

    /// Unit price at a quality tier, ignoring any selection override
    pub fn unit_price_for(&self, tier: QualityTier, multipliers: &TierMultipliers) -> f64 {
        if let Some(base) = self.base_prices {
            let derived = match tier {
                QualityTier::A => base
                    .b
                    .map(|b| b * multipliers.a)
                    .or_else(|| base.c.map(|c| c * multipliers.a)),
                QualityTier::B => base.b.or_else(|| {
                    let c_mult = if multipliers.c == 0.0 { 1.0 } else { multipliers.c };
                    base.c.map(|c| c / c_mult)
                }),
                QualityTier::C => base.c.or_else(|| base.b.map(|b| b * multipliers.c)),
            };
            if let Some(price) = derived {
                return price;
            }
        }
        self.unit_price.unwrap_or(0.0) * multipliers.get(tier)
    }
}

/// The investor's choice for one catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehabSelection {
    /// Catalog item id
    pub id: String,
    pub selected: bool,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub override_unit_price: Option<f64>,
}

impl RehabSelection {
    pub fn picked(id: &str, quantity: f64) -> Self {
        Self {
            id: id.to_string(),
            selected: true,
            quantity: Some(quantity),
            override_unit_price: None,
        }
    }

    /// One unselected selection per item, seeded with the default quantity
    pub fn unselected_for(items: &[RehabItem]) -> Vec<Self> {
        items
            .iter()
            .map(|item| Self {
                id: item.id.clone(),
                selected: false,
                quantity: Some(item.default_quantity.unwrap_or(1.0)),
                override_unit_price: None,
            })
            .collect()
    }
}

/// Per-tier prices for an item plus the one that will actually be charged
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBands {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub active: f64,
}

pub fn price_bands(
    item: &RehabItem,
    selection: &RehabSelection,
    tier: QualityTier,
    multipliers: &TierMultipliers,
) -> PriceBands {
    let a = item.unit_price_for(QualityTier::A, multipliers);
    let b = item.unit_price_for(QualityTier::B, multipliers);
    let c = item.unit_price_for(QualityTier::C, multipliers);
    let tier_price = match tier {
        QualityTier::A => a,
        QualityTier::B => b,
        QualityTier::C => c,
    };
    PriceBands {
        a,
        b,
        c,
        active: selection.override_unit_price.unwrap_or(tier_price),
    }
}

/// Price one selected line; unselected lines cost nothing
pub fn line_total(
    item: &RehabItem,
    selection: &RehabSelection,
    tier: QualityTier,
    multipliers: &TierMultipliers,
) -> f64 {
    if !selection.selected {
        return 0.0;
    }
    let unit_price = selection
        .override_unit_price
        .unwrap_or_else(|| item.unit_price_for(tier, multipliers));
    let quantity = selection.quantity.or(item.default_quantity).unwrap_or(1.0);
    unit_price * quantity
}

/// Total rehab budget for the selected catalog items.
///
/// Selections pointing at ids missing from the catalog are ignored.
pub fn total_rehab_cost(
    items: &[RehabItem],
    selections: &[RehabSelection],
    tier: QualityTier,
    multipliers: &TierMultipliers,
) -> f64 {
    let by_id: HashMap<&str, &RehabSelection> =
        selections.iter().map(|s| (s.id.as_str(), s)).collect();

    items
        .iter()
        .filter_map(|item| by_id.get(item.id.as_str()).map(|sel| (item, *sel)))
        .map(|(item, sel)| line_total(item, sel, tier, multipliers))
        .sum()
}

/// Built-in catalog of common single-family rehab items (C price, B price)
pub fn standard_catalog() -> Vec<RehabItem> {
    use UnitType::{Fixed, Quantity};

    vec![
        // Flooring
        RehabItem::tiered("floor-lvp", "Flooring", "LVP flooring (per sq ft)", Quantity, 4.5, 6.5, 1000.0),
        RehabItem::tiered("floor-carpet", "Flooring", "Carpet (per sq ft)", Quantity, 3.0, 4.5, 800.0),
        RehabItem::tiered("floor-bath-tile", "Flooring", "Bathroom floor tile", Fixed, 800.0, 1200.0, 1.0),
        // Kitchen
        RehabItem::tiered("kitchen-cabinets", "Kitchen", "Kitchen cabinets", Fixed, 5000.0, 8000.0, 1.0),
        RehabItem::tiered("kitchen-countertops", "Kitchen", "Countertops", Fixed, 3000.0, 5000.0, 1.0),
        RehabItem::tiered("kitchen-appliances", "Kitchen", "Appliance package", Fixed, 2500.0, 4000.0, 1.0),
        RehabItem::tiered("kitchen-sink", "Kitchen", "Sink and faucet", Fixed, 400.0, 700.0, 1.0),
        // Bathrooms
        RehabItem::tiered("bath-full-reno", "Bathrooms", "Full bathroom renovation", Fixed, 4500.0, 7500.0, 1.0),
        RehabItem::tiered("bath-vanity", "Bathrooms", "Vanity with sink", Fixed, 600.0, 1200.0, 1.0),
        RehabItem::tiered("bath-toilet", "Bathrooms", "Toilet", Quantity, 300.0, 500.0, 2.0),
        // General interior
        RehabItem::tiered("general-int-paint", "General", "Interior paint (per sq ft)", Quantity, 1.5, 2.5, 1000.0),
        RehabItem::tiered("general-drywall", "General", "Drywall repair (per sq ft)", Quantity, 0.5, 0.8, 200.0),
        RehabItem::tiered("general-interior-doors", "General", "Interior doors", Quantity, 250.0, 350.0, 8.0),
        RehabItem::tiered("general-windows", "General", "Windows (each)", Quantity, 450.0, 650.0, 10.0),
        RehabItem::tiered("general-detectors", "General", "Smoke/CO detectors", Quantity, 35.0, 35.0, 6.0),
        // Systems and exterior
        RehabItem::tiered("infra-exterior-paint", "Infrastructure", "Exterior paint", Fixed, 4000.0, 6000.0, 1.0),
        RehabItem::tiered("infra-roof", "Infrastructure", "Roof replacement", Fixed, 8000.0, 10000.0, 1.0),
        RehabItem::tiered("infra-electrical", "Infrastructure", "Electrical update", Fixed, 4000.0, 6000.0, 1.0),
        RehabItem::tiered("infra-plumbing", "Infrastructure", "Plumbing update", Fixed, 3500.0, 5000.0, 1.0),
        RehabItem::tiered("infra-water-heater", "Infrastructure", "Water heater", Fixed, 1200.0, 1800.0, 1.0),
        RehabItem::tiered("infra-hvac", "Infrastructure", "AC unit", Fixed, 5000.0, 6500.0, 1.0),
        RehabItem::tiered("infra-landscaping", "Infrastructure", "Landscaping", Fixed, 2000.0, 3500.0, 1.0),
        // Contingency
        RehabItem::tiered("contingency", "Contingency", "Contingency (per sq ft)", Quantity, 2.0, 3.0, 1000.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_items() -> Vec<RehabItem> {
        vec![
            RehabItem::flat("paint", "Paint", UnitType::Fixed, 3000.0),
            RehabItem::flat("floor", "Flooring", UnitType::Quantity, 5000.0),
        ]
    }

    #[test]
    fn test_sums_selected_quantities() {
        let selections = vec![RehabSelection::picked("paint", 1.0), RehabSelection::picked("floor", 2.0)];
        let total = total_rehab_cost(&flat_items(), &selections, QualityTier::B, &TierMultipliers::default());
        assert_eq!(total, 3000.0 + 2.0 * 5000.0);
    }

    #[test]
    fn test_unselected_items_cost_nothing() {
        let selections = vec![
            RehabSelection {
                id: "paint".to_string(),
                selected: false,
                quantity: Some(40.0),
                override_unit_price: Some(99_999.0),
            },
            RehabSelection {
                override_unit_price: Some(6000.0),
                ..RehabSelection::picked("floor", 1.0)
            },
        ];
        let total = total_rehab_cost(&flat_items(), &selections, QualityTier::B, &TierMultipliers::default());
        assert_eq!(total, 6000.0);
    }

    #[test]
    fn test_override_wins_over_tier_pricing() {
        let items = vec![RehabItem::tiered("cab", "Kitchen", "Cabinets", UnitType::Fixed, 5000.0, 8000.0, 1.0)];
        let selections = vec![RehabSelection {
            override_unit_price: Some(7100.0),
            ..RehabSelection::picked("cab", 1.0)
        }];
        for tier in [QualityTier::A, QualityTier::B, QualityTier::C] {
            let total = total_rehab_cost(&items, &selections, tier, &TierMultipliers::default());
            assert_eq!(total, 7100.0);
        }
    }

    #[test]
    fn test_a_tier_scales_b_base_price() {
        let items = vec![RehabItem::tiered("cab", "Kitchen", "Cabinets", UnitType::Fixed, 5000.0, 8000.0, 1.0)];
        let selections = vec![RehabSelection::picked("cab", 1.0)];
        let total = total_rehab_cost(&items, &selections, QualityTier::A, &TierMultipliers::default());
        assert_relative_eq!(total, 8000.0 * 1.3);
    }

    #[test]
    fn test_tier_fallbacks_from_partial_base_prices() {
        let multipliers = TierMultipliers::default();
        let c_only = RehabItem {
            base_prices: Some(BasePrices { b: None, c: Some(400.0) }),
            ..RehabItem::flat("x", "X", UnitType::Fixed, 0.0)
        };
        assert_relative_eq!(c_only.unit_price_for(QualityTier::B, &multipliers), 500.0);
        assert_relative_eq!(c_only.unit_price_for(QualityTier::A, &multipliers), 520.0);

        let b_only = RehabItem {
            base_prices: Some(BasePrices { b: Some(1000.0), c: None }),
            ..RehabItem::flat("y", "Y", UnitType::Fixed, 0.0)
        };
        assert_relative_eq!(b_only.unit_price_for(QualityTier::C, &multipliers), 800.0);
    }

    #[test]
    fn test_flat_price_scales_with_tier_multiplier() {
        let item = RehabItem::flat("paint", "Paint", UnitType::Fixed, 3000.0);
        let multipliers = TierMultipliers::default();
        assert_relative_eq!(item.unit_price_for(QualityTier::A, &multipliers), 3900.0);
        assert_relative_eq!(item.unit_price_for(QualityTier::C, &multipliers), 2400.0);
    }

    #[test]
    fn test_quantity_falls_back_to_item_default() {
        let items = vec![RehabItem::tiered("doors", "General", "Doors", UnitType::Quantity, 250.0, 350.0, 8.0)];
        let selections = vec![RehabSelection {
            id: "doors".to_string(),
            selected: true,
            quantity: None,
            override_unit_price: None,
        }];
        let total = total_rehab_cost(&items, &selections, QualityTier::B, &TierMultipliers::default());
        assert_relative_eq!(total, 350.0 * 8.0);
    }

    #[test]
    fn test_price_bands_report_active_price() {
        let item = RehabItem::tiered("roof", "Infrastructure", "Roof", UnitType::Fixed, 8000.0, 10000.0, 1.0);
        let selection = RehabSelection::picked("roof", 1.0);
        let bands = price_bands(&item, &selection, QualityTier::C, &TierMultipliers::default());
        assert_relative_eq!(bands.a, 13000.0);
        assert_relative_eq!(bands.b, 10000.0);
        assert_relative_eq!(bands.c, 8000.0);
        assert_relative_eq!(bands.active, 8000.0);
    }

    #[test]
    fn test_standard_catalog_ids_unique_and_nothing_selected() {
        let catalog = standard_catalog();
        let mut ids: Vec<&str> = catalog.iter().map(|i| i.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());

        let selections = RehabSelection::unselected_for(&catalog);
        let total = total_rehab_cost(&catalog, &selections, QualityTier::A, &TierMultipliers::default());
        assert_eq!(total, 0.0);
    }
}
