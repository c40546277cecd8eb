//! Nutrient snapshot
//!
//! Amounts of the eight tracked nutrients for one serving of one food.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::NutrientKey;

/// Nutrient amounts keyed by `NutrientKey`
///
/// All eight keys are always present. Values are never negative: storing a
/// negative or non-finite amount stores 0.0 instead.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutrientSnapshot {
    values: [f64; 8],
}

impl NutrientSnapshot {
    /// Create a snapshot with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from values in `NutrientKey::ALL` order
    pub fn from_values(values: [f64; 8]) -> Self {
        let mut snapshot = Self::zero();
        for (key, value) in NutrientKey::ALL.into_iter().zip(values) {
            snapshot.set(key, value);
        }
        snapshot
    }

    pub fn get(&self, key: NutrientKey) -> f64 {
        self.values[key.index()]
    }

    pub fn set(&mut self, key: NutrientKey, value: f64) {
        self.values[key.index()] = if value.is_finite() && value > 0.0 { value } else { 0.0 };
    }

    pub fn with(mut self, key: NutrientKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Iterate over (key, value) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (NutrientKey, f64)> + '_ {
        NutrientKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    /// Keys whose value is exactly zero
    pub fn zero_keys(&self) -> Vec<NutrientKey> {
        self.iter().filter(|(_, v)| *v == 0.0).map(|(k, _)| k).collect()
    }

    /// Scale every value by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        let mut scaled = Self::zero();
        for (key, value) in self.iter() {
            scaled.set(key, value * multiplier);
        }
        scaled
    }
}

impl Serialize for NutrientSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NutrientKey::ALL.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.as_str(), &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_has_all_keys() {
        let snapshot = NutrientSnapshot::zero();
        assert_eq!(snapshot.iter().count(), 8);
        assert_eq!(snapshot.zero_keys().len(), 8);
    }

    #[test]
    fn test_set_never_stores_negative() {
        let mut snapshot = NutrientSnapshot::zero();
        snapshot.set(NutrientKey::Fat, -3.0);
        snapshot.set(NutrientKey::Sugar, f64::NAN);
        snapshot.set(NutrientKey::Protein, 4.5);
        assert_eq!(snapshot.get(NutrientKey::Fat), 0.0);
        assert_eq!(snapshot.get(NutrientKey::Sugar), 0.0);
        assert_eq!(snapshot.get(NutrientKey::Protein), 4.5);
    }

    #[test]
    fn test_scale() {
        let snapshot = NutrientSnapshot::zero()
            .with(NutrientKey::Calories, 100.0)
            .with(NutrientKey::Sodium, 10.0);
        let scaled = snapshot.scale(2.5);
        assert!((scaled.get(NutrientKey::Calories) - 250.0).abs() < 1e-9);
        assert!((scaled.get(NutrientKey::Sodium) - 25.0).abs() < 1e-9);
        assert_eq!(scaled.get(NutrientKey::Fat), 0.0);
    }

    #[test]
    fn test_serializes_as_keyed_object() {
        let snapshot = NutrientSnapshot::zero().with(NutrientKey::Protein, 1.1);
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["protein"], 1.1);
        assert_eq!(json["cholesterol"], 0.0);
        assert_eq!(json.as_object().unwrap().len(), 8);
    }
}
