//! Quantity scaling
//!
//! Converts a per-medium-unit snapshot into the amount for a chosen quantity.

use serde::Serialize;

use super::registry::{normalize_food_name, FoodRegistry, ProfileMatch};
use crate::error::{NutriError, NutriResult};
use crate::models::{NutrientSnapshot, QuantitySelection};

/// A snapshot scaled to a quantity selection, with the inputs it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustedSnapshot {
    pub food: String,
    pub selection: QuantitySelection,
    /// multiplier × unit factor
    pub factor: f64,
    /// Scaling table the factor came from
    pub table: ProfileMatch,
    pub values: NutrientSnapshot,
}

/// Combined scale factor for a food and selection
pub fn combined_factor(
    registry: &FoodRegistry,
    food: &str,
    selection: &QuantitySelection,
) -> (f64, ProfileMatch) {
    let (table, matched) = registry.scaling_for(food);
    (selection.multiplier() * table.factor(selection.unit()), matched)
}

/// Scale a per-medium-unit snapshot linearly by the combined factor
///
/// Fails instead of storing a value that overflowed.
pub fn scale(
    registry: &FoodRegistry,
    base: &NutrientSnapshot,
    food: &str,
    selection: QuantitySelection,
) -> NutriResult<AdjustedSnapshot> {
    let (factor, table) = combined_factor(registry, food, &selection);
    if !factor.is_finite() || base.iter().any(|(_, value)| !(value * factor).is_finite()) {
        return Err(NutriError::invalid_input(format!(
            "Quantity {} is too large to scale",
            selection.describe(food)
        )));
    }

    tracing::debug!(
        "Scaling '{}' by {:.4} ({} x {})",
        food.trim(),
        factor,
        selection.multiplier(),
        selection.unit()
    );

    Ok(AdjustedSnapshot {
        food: normalize_food_name(food),
        selection,
        factor,
        table,
        values: base.scale(factor),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NutrientKey, QuantityUnit, MAX_MULTIPLIER};
    use crate::nutrition::{FoodProfile, UnitScalingTable};

    fn banana_base() -> NutrientSnapshot {
        NutrientSnapshot::from_values([89.0, 1.1, 0.3, 22.8, 2.6, 12.2, 1.0, 0.0])
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_two_big_bananas() {
        let registry = FoodRegistry::builtin().unwrap();
        let selection = QuantitySelection::new(2.0, QuantityUnit::Big).unwrap();
        let adjusted = scale(&registry, &banana_base(), "banana", selection).unwrap();

        assert_close(adjusted.factor, 2.0 * 150.0 / 118.0);
        assert!((adjusted.values.get(NutrientKey::Calories) - 226.27).abs() < 0.01);
        assert!((adjusted.factor - 2.542).abs() < 0.001);
    }

    #[test]
    fn test_one_medium_is_identity() {
        let registry = FoodRegistry::builtin().unwrap();
        for food in ["banana", "oats", "egg", "kiwi"] {
            let base = banana_base();
            let adjusted = scale(&registry, &base, food, QuantitySelection::default()).unwrap();
            assert_eq!(adjusted.factor, 1.0);
            assert_eq!(adjusted.values, base, "{}", food);
        }
    }

    #[test]
    fn test_scaling_is_linear() {
        let registry = FoodRegistry::builtin().unwrap();
        let base = banana_base();
        for unit in QuantityUnit::ALL {
            let m1 = 1.5;
            let m2 = 3.0;
            let once =
                scale(&registry, &base, "oats", QuantitySelection::new(m1 * m2, unit).unwrap())
                    .unwrap();
            let first =
                scale(&registry, &base, "oats", QuantitySelection::new(m1, unit).unwrap()).unwrap();
            let second = first.values.scale(m2);
            for key in NutrientKey::ALL {
                assert!((once.values.get(key) - second.get(key)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_unknown_food_uses_default_table() {
        let registry = FoodRegistry::builtin().unwrap();
        let selection = QuantitySelection::new(3.0, QuantityUnit::Cup).unwrap();
        let adjusted = scale(&registry, &banana_base(), "Kiwi", selection).unwrap();
        assert_eq!(adjusted.table, ProfileMatch::Default);
        assert_close(adjusted.factor, 6.0);
        assert_eq!(adjusted.food, "kiwi");
    }

    #[test]
    fn test_overflowing_product_is_rejected() {
        let huge_cup = UnitScalingTable::new(0.75, 1.25, 0.01, 1e306).unwrap();
        let registry = FoodRegistry::builtin().unwrap().with_profile(FoodProfile {
            name: "melon".to_string(),
            fallback: None,
            scaling: Some(huge_cup),
        });
        let selection = QuantitySelection::new(MAX_MULTIPLIER, QuantityUnit::Cup).unwrap();

        let result = scale(&registry, &banana_base(), "melon", selection);
        assert!(matches!(result, Err(NutriError::InvalidInput(_))));

        // Same table stays usable for sane units
        let small = QuantitySelection::new(2.0, QuantityUnit::Small).unwrap();
        let adjusted = scale(&registry, &banana_base(), "melon", small).unwrap();
        assert_close(adjusted.values.get(NutrientKey::Calories), 89.0 * 1.5);
    }

    #[test]
    fn test_records_food_and_selection() {
        let registry = FoodRegistry::builtin().unwrap();
        let selection = QuantitySelection::new(2.0, QuantityUnit::Small).unwrap();
        let adjusted = scale(&registry, &banana_base(), " Banana", selection).unwrap();
        assert_eq!(adjusted.food, "banana");
        assert_eq!(adjusted.selection, selection);
        assert_eq!(adjusted.table, ProfileMatch::Registered("banana".to_string()));
    }
}
