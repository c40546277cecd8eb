//! Quantity selection
//!
//! A multiplier and a serving unit chosen by the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NutriError, NutriResult};

/// Smallest accepted quantity multiplier
pub const MIN_MULTIPLIER: f64 = 0.1;

/// Largest accepted quantity multiplier
pub const MAX_MULTIPLIER: f64 = 10_000.0;

/// Serving unit, relative to the food's medium unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityUnit {
    Small,
    #[default]
    Medium,
    Big,
    Gram,
    Cup,
}

impl QuantityUnit {
    pub const ALL: [QuantityUnit; 5] = [
        QuantityUnit::Small,
        QuantityUnit::Medium,
        QuantityUnit::Big,
        QuantityUnit::Gram,
        QuantityUnit::Cup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityUnit::Small => "small",
            QuantityUnit::Medium => "medium",
            QuantityUnit::Big => "big",
            QuantityUnit::Gram => "gram",
            QuantityUnit::Cup => "cup",
        }
    }

    /// Size units describe the food itself ("big banana"), the rest are measures
    pub fn is_size(&self) -> bool {
        matches!(self, QuantityUnit::Small | QuantityUnit::Medium | QuantityUnit::Big)
    }
}

impl fmt::Display for QuantityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantityUnit {
    type Err = NutriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(QuantityUnit::Small),
            "medium" => Ok(QuantityUnit::Medium),
            "big" => Ok(QuantityUnit::Big),
            "gram" => Ok(QuantityUnit::Gram),
            "cup" => Ok(QuantityUnit::Cup),
            other => Err(NutriError::invalid_input(format!(
                "Unknown unit '{}'. Expected one of: small, medium, big, gram, cup",
                other
            ))),
        }
    }
}

/// Quantity multiplier and unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantitySelection {
    multiplier: f64,
    unit: QuantityUnit,
}

impl QuantitySelection {
    /// Validate and build a selection
    pub fn new(multiplier: f64, unit: QuantityUnit) -> NutriResult<Self> {
        if !multiplier.is_finite() || multiplier < MIN_MULTIPLIER {
            return Err(NutriError::invalid_input(format!(
                "Quantity must be at least {}, got {}",
                MIN_MULTIPLIER, multiplier
            )));
        }
        if multiplier > MAX_MULTIPLIER {
            return Err(NutriError::invalid_input(format!(
                "Quantity must be at most {}, got {}",
                MAX_MULTIPLIER, multiplier
            )));
        }
        Ok(Self { multiplier, unit })
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn unit(&self) -> QuantityUnit {
        self.unit
    }

    /// Human-readable label, e.g. "x2 big bananas" or "x30 grams"
    pub fn describe(&self, food: &str) -> String {
        if self.unit.is_size() {
            format!("x{} {} {}s", self.multiplier, self.unit, food.trim().to_lowercase())
        } else {
            format!("x{} {}s", self.multiplier, self.unit)
        }
    }
}

impl Default for QuantitySelection {
    /// One medium unit
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            unit: QuantityUnit::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_from_str() {
        assert_eq!("Big".parse::<QuantityUnit>().unwrap(), QuantityUnit::Big);
        assert_eq!(" cup ".parse::<QuantityUnit>().unwrap(), QuantityUnit::Cup);
        assert!("slice".parse::<QuantityUnit>().is_err());
    }

    #[test]
    fn test_selection_rejects_small_or_invalid_multiplier() {
        assert!(QuantitySelection::new(0.0, QuantityUnit::Medium).is_err());
        assert!(QuantitySelection::new(-1.0, QuantityUnit::Medium).is_err());
        assert!(QuantitySelection::new(0.05, QuantityUnit::Medium).is_err());
        assert!(QuantitySelection::new(f64::INFINITY, QuantityUnit::Medium).is_err());
        assert!(QuantitySelection::new(MIN_MULTIPLIER, QuantityUnit::Medium).is_ok());
    }

    #[test]
    fn test_selection_rejects_huge_multiplier() {
        assert!(QuantitySelection::new(MAX_MULTIPLIER, QuantityUnit::Cup).is_ok());
        let err = QuantitySelection::new(1e308, QuantityUnit::Cup).unwrap_err();
        assert!(matches!(err, NutriError::InvalidInput(_)));
        assert!(err.to_string().contains("at most"));
    }

    #[test]
    fn test_describe() {
        let big = QuantitySelection::new(2.0, QuantityUnit::Big).unwrap();
        assert_eq!(big.describe("Banana"), "x2 big bananas");

        let grams = QuantitySelection::new(30.0, QuantityUnit::Gram).unwrap();
        assert_eq!(grams.describe("banana"), "x30 grams");
    }

    #[test]
    fn test_default_is_one_medium() {
        let selection = QuantitySelection::default();
        assert_eq!(selection.multiplier(), 1.0);
        assert_eq!(selection.unit(), QuantityUnit::Medium);
    }
}
