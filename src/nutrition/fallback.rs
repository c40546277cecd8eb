//! Fallback resolution
//!
//! Fills missing nutrient values from the registry. A value of exactly 0.0
//! counts as missing: the upstream text omits labels inconsistently, so a
//! zero cannot be told apart from an absent field. Foods that genuinely
//! contain none of a nutrient take the profile's value too, which is an
//! accepted approximation.

use serde::Serialize;

use super::registry::{FoodRegistry, ProfileMatch};
use crate::models::{NutrientKey, NutrientSnapshot};

/// Result of applying fallback values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackOutcome {
    pub snapshot: NutrientSnapshot,
    /// Profile the values came from
    pub profile: ProfileMatch,
    /// Set when the generic default profile was used
    pub low_confidence: bool,
    /// Keys replaced by fallback values
    pub filled: Vec<NutrientKey>,
}

/// Replace every zero value with the food's fallback value
pub fn apply_fallback(
    registry: &FoodRegistry,
    snapshot: &NutrientSnapshot,
    food: &str,
) -> FallbackOutcome {
    let (fallback, profile) = registry.fallback_for(food);

    let mut filled_snapshot = *snapshot;
    let mut filled = Vec::new();
    for key in snapshot.zero_keys() {
        let value = fallback.get(key);
        filled_snapshot.set(key, value);
        if value != 0.0 {
            filled.push(key);
        }
    }

    let low_confidence = profile.is_default();
    if low_confidence {
        tracing::warn!("Using default nutrient values for '{}'", food.trim());
    } else if !filled.is_empty() {
        tracing::info!(
            "Filled {} missing nutrient(s) for '{}' from the '{}' profile",
            filled.len(),
            food.trim(),
            profile.name()
        );
    }

    FallbackOutcome {
        snapshot: filled_snapshot,
        profile,
        low_confidence,
        filled,
    }
}
