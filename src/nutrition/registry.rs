//! Built-in food registry
//!
//! Fallback profiles, unit scaling tables and reference daily amounts.
//! Built once at startup and shared read-only.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{NutriError, NutriResult};
use crate::models::{NutrientKey, NutrientSnapshot, QuantityUnit};

/// Registry key of the generic profile
pub const DEFAULT_PROFILE: &str = "default";

/// Normalize a food name for registry lookup
pub fn normalize_food_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Scale factors per serving unit, relative to one medium unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitScalingTable {
    small: f64,
    big: f64,
    gram: f64,
    cup: f64,
}

impl UnitScalingTable {
    /// Build a table from factors relative to medium. Medium is always 1.0.
    pub fn new(small: f64, big: f64, gram: f64, cup: f64) -> NutriResult<Self> {
        for (unit, factor) in [("small", small), ("big", big), ("gram", gram), ("cup", cup)] {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(NutriError::Config(format!(
                    "Scaling factor for '{}' must be positive, got {}",
                    unit, factor
                )));
            }
        }
        Ok(Self { small, big, gram, cup })
    }

    /// Build a table from gram weights of each serving size
    pub fn from_grams(medium: f64, small: f64, big: f64, cup: f64) -> NutriResult<Self> {
        if !medium.is_finite() || medium <= 0.0 {
            return Err(NutriError::Config(format!(
                "Medium serving weight must be positive, got {}",
                medium
            )));
        }
        Self::new(small / medium, big / medium, 1.0 / medium, cup / medium)
    }

    pub fn factor(&self, unit: QuantityUnit) -> f64 {
        match unit {
            QuantityUnit::Small => self.small,
            QuantityUnit::Medium => 1.0,
            QuantityUnit::Big => self.big,
            QuantityUnit::Gram => self.gram,
            QuantityUnit::Cup => self.cup,
        }
    }
}

/// Recommended daily amount per nutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceTable {
    amounts: NutrientSnapshot,
}

impl ReferenceTable {
    pub fn new(amounts: NutrientSnapshot) -> Self {
        Self { amounts }
    }

    pub fn amount(&self, key: NutrientKey) -> f64 {
        self.amounts.get(key)
    }

    fn daily_values() -> Self {
        // Calories, Protein, Fat, Carbohydrates, Fiber, Sugar, Sodium, Cholesterol
        Self::new(NutrientSnapshot::from_values([
            2000.0, 50.0, 70.0, 310.0, 30.0, 30.0, 2300.0, 300.0,
        ]))
    }
}

/// Known data for one registered food
#[derive(Debug, Clone, Serialize)]
pub struct FoodProfile {
    pub name: String,
    /// Values for one medium unit, used where parsed data is missing
    pub fallback: Option<NutrientSnapshot>,
    pub scaling: Option<UnitScalingTable>,
}

/// Which profile a lookup resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum ProfileMatch {
    Registered(String),
    Default,
}

impl ProfileMatch {
    pub fn is_default(&self) -> bool {
        matches!(self, ProfileMatch::Default)
    }

    pub fn name(&self) -> &str {
        match self {
            ProfileMatch::Registered(name) => name,
            ProfileMatch::Default => DEFAULT_PROFILE,
        }
    }
}

/// Immutable registry of food profiles with a designated default entry
#[derive(Debug, Clone)]
pub struct FoodRegistry {
    profiles: HashMap<String, FoodProfile>,
    default_fallback: NutrientSnapshot,
    default_scaling: UnitScalingTable,
    reference: ReferenceTable,
}

impl FoodRegistry {
    /// Empty registry with only default values
    pub fn new(
        default_fallback: NutrientSnapshot,
        default_scaling: UnitScalingTable,
        reference: ReferenceTable,
    ) -> Self {
        Self {
            profiles: HashMap::new(),
            default_fallback,
            default_scaling,
            reference,
        }
    }

    /// Add or replace a profile. The name is normalized.
    pub fn with_profile(mut self, mut profile: FoodProfile) -> Self {
        profile.name = normalize_food_name(&profile.name);
        self.profiles.insert(profile.name.clone(), profile);
        self
    }

    /// The built-in registry: banana, oats, egg and a generic default
    ///
    /// Scaling tables go through the same validation as custom ones.
    pub fn builtin() -> NutriResult<Self> {
        // Calories, Protein, Fat, Carbohydrates, Fiber, Sugar, Sodium, Cholesterol
        let default_fallback =
            NutrientSnapshot::from_values([52.0, 0.3, 0.2, 13.8, 2.4, 10.4, 1.0, 0.0]);

        let registry = Self::new(
            default_fallback,
            UnitScalingTable::new(0.75, 1.25, 0.01, 2.0)?,
            ReferenceTable::daily_values(),
        )
        // Medium banana ~118g
        .with_profile(FoodProfile {
            name: "banana".to_string(),
            fallback: Some(NutrientSnapshot::from_values([
                89.0, 1.1, 0.3, 22.8, 2.6, 12.2, 1.0, 0.0,
            ])),
            scaling: Some(UnitScalingTable::from_grams(118.0, 90.0, 150.0, 225.0)?),
        })
        // 1/2 cup dry rolled oats ~40g
        .with_profile(FoodProfile {
            name: "oats".to_string(),
            fallback: Some(NutrientSnapshot::from_values([
                150.0, 5.0, 2.5, 27.0, 4.0, 1.0, 0.0, 0.0,
            ])),
            scaling: Some(UnitScalingTable::from_grams(40.0, 20.0, 60.0, 80.0)?),
        })
        // Medium egg ~50g
        .with_profile(FoodProfile {
            name: "egg".to_string(),
            fallback: Some(NutrientSnapshot::from_values([
                68.0, 6.0, 5.0, 0.5, 0.0, 0.5, 70.0, 186.0,
            ])),
            scaling: Some(UnitScalingTable::from_grams(50.0, 40.0, 63.0, 243.0)?),
        });

        Ok(registry)
    }

    pub fn profile(&self, food: &str) -> Option<&FoodProfile> {
        self.profiles.get(&normalize_food_name(food))
    }

    /// Fallback values for a food, or the default profile's
    pub fn fallback_for(&self, food: &str) -> (&NutrientSnapshot, ProfileMatch) {
        match self.profile(food) {
            Some(FoodProfile { name, fallback: Some(fallback), .. }) => {
                (fallback, ProfileMatch::Registered(name.clone()))
            }
            _ => (&self.default_fallback, ProfileMatch::Default),
        }
    }

    /// Scaling table for a food, or the default table
    pub fn scaling_for(&self, food: &str) -> (&UnitScalingTable, ProfileMatch) {
        match self.profile(food) {
            Some(FoodProfile { name, scaling: Some(scaling), .. }) => {
                (scaling, ProfileMatch::Registered(name.clone()))
            }
            _ => (&self.default_scaling, ProfileMatch::Default),
        }
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    /// Registered food names, sorted
    pub fn known_foods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_valid() {
        let registry = FoodRegistry::builtin().unwrap();
        for food in ["banana", "oats", "egg", "kiwi"] {
            let (table, _) = registry.scaling_for(food);
            for unit in QuantityUnit::ALL {
                let factor = table.factor(unit);
                assert!(factor.is_finite() && factor > 0.0, "{} {:?}", food, unit);
            }
            assert_eq!(table.factor(QuantityUnit::Medium), 1.0);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = FoodRegistry::builtin().unwrap();
        let (fallback, matched) = registry.fallback_for("  BaNaNa ");
        assert_eq!(matched, ProfileMatch::Registered("banana".to_string()));
        assert_eq!(fallback.get(NutrientKey::Calories), 89.0);
    }

    #[test]
    fn test_unknown_food_uses_default() {
        let registry = FoodRegistry::builtin().unwrap();
        let (fallback, matched) = registry.fallback_for("kiwi");
        assert!(matched.is_default());
        assert_eq!(matched.name(), DEFAULT_PROFILE);
        assert_eq!(fallback.get(NutrientKey::Calories), 52.0);

        let (table, matched) = registry.scaling_for("kiwi");
        assert!(matched.is_default());
        assert_eq!(table.factor(QuantityUnit::Cup), 2.0);
    }

    #[test]
    fn test_banana_scaling_from_grams() {
        let registry = FoodRegistry::builtin().unwrap();
        let (table, _) = registry.scaling_for("banana");
        assert!((table.factor(QuantityUnit::Big) - 150.0 / 118.0).abs() < 1e-12);
        assert!((table.factor(QuantityUnit::Gram) - 1.0 / 118.0).abs() < 1e-12);
    }

    #[test]
    fn test_scaling_table_validation() {
        assert!(UnitScalingTable::new(0.5, 1.5, 0.01, 2.0).is_ok());
        assert!(UnitScalingTable::new(0.0, 1.5, 0.01, 2.0).is_err());
        assert!(UnitScalingTable::from_grams(0.0, 10.0, 20.0, 30.0).is_err());
        let table = UnitScalingTable::from_grams(100.0, 50.0, 200.0, 250.0).unwrap();
        assert_eq!(table.factor(QuantityUnit::Big), 2.0);
    }

    #[test]
    fn test_profile_without_scaling_uses_default_table() {
        let registry = FoodRegistry::builtin().unwrap().with_profile(FoodProfile {
            name: "Apple".to_string(),
            fallback: Some(NutrientSnapshot::zero().with(NutrientKey::Calories, 95.0)),
            scaling: None,
        });
        let (_, fallback_match) = registry.fallback_for("apple");
        let (_, scaling_match) = registry.scaling_for("apple");
        assert_eq!(fallback_match, ProfileMatch::Registered("apple".to_string()));
        assert!(scaling_match.is_default());
        assert_eq!(registry.known_foods(), vec!["apple", "banana", "egg", "oats"]);
    }

    #[test]
    fn test_reference_amounts() {
        let registry = FoodRegistry::builtin().unwrap();
        assert_eq!(registry.reference().amount(NutrientKey::Calories), 2000.0);
        assert_eq!(registry.reference().amount(NutrientKey::Sodium), 2300.0);
    }
}
