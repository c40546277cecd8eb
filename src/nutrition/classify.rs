//! Reference classification
//!
//! Compares adjusted values with recommended daily amounts and builds the
//! nutrient cards shown to the user.

use serde::Serialize;

use super::registry::ReferenceTable;
use crate::models::{CategoryFilter, NutrientCategory, NutrientKey, NutrientSnapshot, NutrientUnit};

// ============================================================================
// Band Colors
// ============================================================================

const COLOR_NEAR_TARGET: &str = "#d4edda"; // Green
const COLOR_MODERATE: &str = "#fff3cd"; // Yellow
const COLOR_LARGE: &str = "#f8d7da"; // Red
const COLOR_UNAVAILABLE: &str = "#e0e0e0"; // Gray

/// How far a value is from its reference amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// Ratio in [0.9, 1.1]
    NearTarget,
    /// Ratio in [0.7, 1.3] outside the near-target range
    ModerateDeviation,
    LargeDeviation,
    /// No usable reference amount
    Unavailable,
}

impl Band {
    pub fn color(&self) -> &'static str {
        match self {
            Band::NearTarget => COLOR_NEAR_TARGET,
            Band::ModerateDeviation => COLOR_MODERATE,
            Band::LargeDeviation => COLOR_LARGE,
            Band::Unavailable => COLOR_UNAVAILABLE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::NearTarget => "near-target",
            Band::ModerateDeviation => "moderate deviation",
            Band::LargeDeviation => "large deviation",
            Band::Unavailable => "unavailable",
        }
    }
}

/// Classify a value against its reference amount
pub fn classify(value: f64, reference: f64) -> Band {
    if !reference.is_finite() || reference <= 0.0 {
        return Band::Unavailable;
    }

    let ratio = value / reference;
    if (0.9..=1.1).contains(&ratio) {
        Band::NearTarget
    } else if (0.7..=1.3).contains(&ratio) {
        Band::ModerateDeviation
    } else {
        Band::LargeDeviation
    }
}

/// One classified nutrient, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientCard {
    pub key: NutrientKey,
    pub label: &'static str,
    pub emoji: &'static str,
    pub category: NutrientCategory,
    pub unit: NutrientUnit,
    pub value: f64,
    pub reference: f64,
    pub band: Band,
    pub color: &'static str,
}

/// Classified cards for the keys selected by `filter`, in card order
pub fn nutrient_cards(
    values: &NutrientSnapshot,
    reference: &ReferenceTable,
    filter: CategoryFilter,
) -> Vec<NutrientCard> {
    filter
        .keys()
        .into_iter()
        .map(|key| {
            let value = values.get(key);
            let reference = reference.amount(key);
            let band = classify(value, reference);
            NutrientCard {
                key,
                label: key.label(),
                emoji: key.emoji(),
                category: key.category(),
                unit: key.unit(),
                value,
                reference,
                band,
                color: band.color(),
            }
        })
        .collect()
}
