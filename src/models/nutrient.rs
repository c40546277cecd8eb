//! Nutrient keys and their display metadata
//!
//! The tracked nutrient set is closed: eight keys, each with a fixed unit
//! and category.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NutriError;

/// Unit of measure for a nutrient value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientUnit {
    Kcal,
    G,
    Mg,
}

impl NutrientUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientUnit::Kcal => "kcal",
            NutrientUnit::G => "g",
            NutrientUnit::Mg => "mg",
        }
    }
}

/// Semantic grouping used for card filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutrientCategory {
    Macro,
    Energy,
    Mineral,
    Lipid,
}

impl NutrientCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientCategory::Macro => "Macro",
            NutrientCategory::Energy => "Energy",
            NutrientCategory::Mineral => "Mineral",
            NutrientCategory::Lipid => "Lipid",
        }
    }
}

/// One of the eight tracked nutrients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientKey {
    Calories,
    Protein,
    Fat,
    Carbohydrates,
    Fiber,
    Sugar,
    Sodium,
    Cholesterol,
}

impl NutrientKey {
    /// All keys in canonical order
    pub const ALL: [NutrientKey; 8] = [
        NutrientKey::Calories,
        NutrientKey::Protein,
        NutrientKey::Fat,
        NutrientKey::Carbohydrates,
        NutrientKey::Fiber,
        NutrientKey::Sugar,
        NutrientKey::Sodium,
        NutrientKey::Cholesterol,
    ];

    /// Order in which nutrient cards are presented
    pub const CARD_ORDER: [NutrientKey; 8] = [
        NutrientKey::Protein,
        NutrientKey::Fiber,
        NutrientKey::Fat,
        NutrientKey::Carbohydrates,
        NutrientKey::Sugar,
        NutrientKey::Calories,
        NutrientKey::Sodium,
        NutrientKey::Cholesterol,
    ];

    /// Bars of the macronutrient chart
    pub const MACRO_CHART: [NutrientKey; 6] = [
        NutrientKey::Calories,
        NutrientKey::Protein,
        NutrientKey::Fat,
        NutrientKey::Carbohydrates,
        NutrientKey::Fiber,
        NutrientKey::Sugar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientKey::Calories => "calories",
            NutrientKey::Protein => "protein",
            NutrientKey::Fat => "fat",
            NutrientKey::Carbohydrates => "carbohydrates",
            NutrientKey::Fiber => "fiber",
            NutrientKey::Sugar => "sugar",
            NutrientKey::Sodium => "sodium",
            NutrientKey::Cholesterol => "cholesterol",
        }
    }

    /// Display label, e.g. "Protein (g)"
    pub fn label(&self) -> &'static str {
        match self {
            NutrientKey::Calories => "Calories",
            NutrientKey::Protein => "Protein (g)",
            NutrientKey::Fat => "Fat (g)",
            NutrientKey::Carbohydrates => "Carbohydrates (g)",
            NutrientKey::Fiber => "Fiber (g)",
            NutrientKey::Sugar => "Sugar (g)",
            NutrientKey::Sodium => "Sodium (mg)",
            NutrientKey::Cholesterol => "Cholesterol (mg)",
        }
    }

    pub fn unit(&self) -> NutrientUnit {
        match self {
            NutrientKey::Calories => NutrientUnit::Kcal,
            NutrientKey::Sodium | NutrientKey::Cholesterol => NutrientUnit::Mg,
            _ => NutrientUnit::G,
        }
    }

    pub fn category(&self) -> NutrientCategory {
        match self {
            NutrientKey::Calories => NutrientCategory::Energy,
            NutrientKey::Sodium => NutrientCategory::Mineral,
            NutrientKey::Cholesterol => NutrientCategory::Lipid,
            _ => NutrientCategory::Macro,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            NutrientKey::Calories => "🔥",
            NutrientKey::Protein => "🥩",
            NutrientKey::Fat => "🧈",
            NutrientKey::Carbohydrates => "🍞",
            NutrientKey::Fiber => "🌾",
            NutrientKey::Sugar => "🍬",
            NutrientKey::Sodium => "🧂",
            NutrientKey::Cholesterol => "🩸",
        }
    }

    /// Position in `ALL`, used as a storage index
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for NutrientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category selection for nutrient cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Macro,
    Energy,
    Mineral,
    Lipid,
}

impl CategoryFilter {
    pub fn matches(&self, key: NutrientKey) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Macro => key.category() == NutrientCategory::Macro,
            CategoryFilter::Energy => key.category() == NutrientCategory::Energy,
            CategoryFilter::Mineral => key.category() == NutrientCategory::Mineral,
            CategoryFilter::Lipid => key.category() == NutrientCategory::Lipid,
        }
    }

    /// Keys selected by this filter, in card order
    pub fn keys(&self) -> Vec<NutrientKey> {
        NutrientKey::CARD_ORDER
            .into_iter()
            .filter(|k| self.matches(*k))
            .collect()
    }
}

impl FromStr for CategoryFilter {
    type Err = NutriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(CategoryFilter::All),
            "macro" => Ok(CategoryFilter::Macro),
            "energy" => Ok(CategoryFilter::Energy),
            "mineral" => Ok(CategoryFilter::Mineral),
            "lipid" => Ok(CategoryFilter::Lipid),
            other => Err(NutriError::invalid_input(format!(
                "Unknown category '{}'. Expected one of: all, macro, energy, mineral, lipid",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_canonical_order() {
        for (i, key) in NutrientKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn test_units() {
        assert_eq!(NutrientKey::Calories.unit(), NutrientUnit::Kcal);
        assert_eq!(NutrientKey::Protein.unit(), NutrientUnit::G);
        assert_eq!(NutrientKey::Sodium.unit(), NutrientUnit::Mg);
        assert_eq!(NutrientKey::Cholesterol.unit(), NutrientUnit::Mg);
    }

    #[test]
    fn test_category_filter_selects_by_metadata() {
        assert_eq!(CategoryFilter::All.keys().len(), 8);
        assert_eq!(
            CategoryFilter::Macro.keys(),
            vec![
                NutrientKey::Protein,
                NutrientKey::Fiber,
                NutrientKey::Fat,
                NutrientKey::Carbohydrates,
                NutrientKey::Sugar,
            ]
        );
        assert_eq!(CategoryFilter::Energy.keys(), vec![NutrientKey::Calories]);
        assert_eq!(CategoryFilter::Mineral.keys(), vec![NutrientKey::Sodium]);
        assert_eq!(CategoryFilter::Lipid.keys(), vec![NutrientKey::Cholesterol]);
    }

    #[test]
    fn test_category_filter_from_str() {
        assert_eq!("Macro".parse::<CategoryFilter>().unwrap(), CategoryFilter::Macro);
        assert_eq!("".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert!("vitamin".parse::<CategoryFilter>().is_err());
    }
}
