//! Analysis session
//!
//! The food currently being looked at and the quantity chosen for it.
//! A new analysis replaces the previous one wholesale.

use serde::Serialize;

use super::{NutrientKey, NutrientSnapshot, QuantitySelection};
use crate::error::{NutriError, NutriResult};
use crate::nutrition::{
    apply_fallback, normalize_food_name, scale, AdjustedSnapshot, FoodRegistry, NutrientEntry,
    ParseWarning, ParsedNutrition, ProfileMatch,
};

/// One analyzed food with its current quantity
#[derive(Debug, Clone, Serialize)]
pub struct FoodAnalysis {
    /// Normalized food name
    pub food: String,
    /// Title-cased name for display
    pub display_name: String,
    /// Values as parsed, before fallback
    pub parsed: NutrientSnapshot,
    /// Fallback-filled values for one medium unit
    pub base: NutrientSnapshot,
    pub entries: Vec<NutrientEntry>,
    pub warnings: Vec<ParseWarning>,
    pub profile: ProfileMatch,
    pub low_confidence: bool,
    pub filled: Vec<NutrientKey>,
    pub analyzed_at: String,
    adjusted: AdjustedSnapshot,
}

impl FoodAnalysis {
    /// Fill, then scale to one medium unit
    pub fn new(registry: &FoodRegistry, food: &str, parsed: ParsedNutrition) -> NutriResult<Self> {
        let outcome = apply_fallback(registry, &parsed.snapshot, food);
        let adjusted = scale(registry, &outcome.snapshot, food, QuantitySelection::default())?;

        Ok(Self {
            food: normalize_food_name(food),
            display_name: title_case(food),
            parsed: parsed.snapshot,
            base: outcome.snapshot,
            entries: parsed.entries,
            warnings: parsed.warnings,
            profile: outcome.profile,
            low_confidence: outcome.low_confidence,
            filled: outcome.filled,
            analyzed_at: chrono::Utc::now().to_rfc3339(),
            adjusted,
        })
    }

    pub fn selection(&self) -> QuantitySelection {
        self.adjusted.selection
    }

    pub fn adjusted(&self) -> &AdjustedSnapshot {
        &self.adjusted
    }

    /// Recompute the adjusted values for a new selection
    ///
    /// On error the previous selection is kept.
    pub fn set_quantity(
        &mut self,
        registry: &FoodRegistry,
        selection: QuantitySelection,
    ) -> NutriResult<()> {
        self.adjusted = scale(registry, &self.base, &self.food, selection)?;
        Ok(())
    }

    pub fn selection_label(&self) -> String {
        self.selection().describe(&self.food)
    }
}

/// Session state for one interactive user
#[derive(Debug, Default)]
pub struct AnalysisSession {
    current: Option<FoodAnalysis>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current analysis
    pub fn begin(&mut self, analysis: FoodAnalysis) -> &FoodAnalysis {
        self.current.insert(analysis)
    }

    pub fn current(&self) -> Option<&FoodAnalysis> {
        self.current.as_ref()
    }

    pub fn require(&self) -> NutriResult<&FoodAnalysis> {
        self.current.as_ref().ok_or(NutriError::NoAnalysis)
    }

    /// Change the quantity of the current food
    pub fn set_quantity(
        &mut self,
        registry: &FoodRegistry,
        selection: QuantitySelection,
    ) -> NutriResult<&FoodAnalysis> {
        let analysis = self.current.as_mut().ok_or(NutriError::NoAnalysis)?;
        analysis.set_quantity(registry, selection)?;
        Ok(&*analysis)
    }

    /// Drop the current analysis. Returns whether one was loaded.
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }
}

fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuantityUnit, MAX_MULTIPLIER};
    use crate::nutrition::{parse_nutrition_text, FoodProfile, UnitScalingTable};

    fn analyze(registry: &FoodRegistry, food: &str, text: &str) -> FoodAnalysis {
        FoodAnalysis::new(registry, food, parse_nutrition_text(text)).unwrap()
    }

    #[test]
    fn test_new_analysis_starts_at_one_medium() {
        let registry = FoodRegistry::builtin().unwrap();
        let analysis = analyze(&registry, "banana", "Energy: 89.0 kcal - Protein: 1.1 g");
        assert_eq!(analysis.selection(), QuantitySelection::default());
        assert_eq!(analysis.adjusted().values, analysis.base);
        assert_eq!(analysis.display_name, "Banana");
        assert_eq!(analysis.parsed.get(NutrientKey::Fat), 0.0);
        assert_eq!(analysis.base.get(NutrientKey::Fat), 0.3);
    }

    #[test]
    fn test_set_quantity_recomputes() {
        let registry = FoodRegistry::builtin().unwrap();
        let mut session = AnalysisSession::new();
        session.begin(analyze(&registry, "banana", "Energy: 89.0 kcal"));

        let selection = QuantitySelection::new(2.0, QuantityUnit::Big).unwrap();
        let analysis = session.set_quantity(&registry, selection).unwrap();
        assert_eq!(analysis.adjusted().selection, selection);
        let calories = analysis.adjusted().values.get(NutrientKey::Calories);
        assert!((calories - 226.27).abs() < 0.01);
        assert_eq!(analysis.selection_label(), "x2 big bananas");
    }

    #[test]
    fn test_new_food_replaces_previous_selection() {
        let registry = FoodRegistry::builtin().unwrap();
        let mut session = AnalysisSession::new();
        session.begin(analyze(&registry, "banana", "Energy: 89.0 kcal"));
        let selection = QuantitySelection::new(3.0, QuantityUnit::Cup).unwrap();
        session.set_quantity(&registry, selection).unwrap();

        let analysis = session.begin(analyze(&registry, "egg", "Protein: 6 g"));
        assert_eq!(analysis.food, "egg");
        assert_eq!(analysis.selection(), QuantitySelection::default());
        assert_eq!(analysis.adjusted().food, "egg");
        assert_eq!(analysis.adjusted().selection, QuantitySelection::default());
        assert_eq!(analysis.adjusted().values.get(NutrientKey::Calories), 68.0);
    }

    #[test]
    fn test_quantity_without_analysis_fails() {
        let registry = FoodRegistry::builtin().unwrap();
        let mut session = AnalysisSession::new();
        let result = session.set_quantity(&registry, QuantitySelection::default());
        assert!(matches!(result, Err(NutriError::NoAnalysis)));
        assert!(session.require().is_err());
    }

    #[test]
    fn test_failed_rescale_keeps_selection() {
        let registry = FoodRegistry::builtin()
            .unwrap()
            .with_profile(FoodProfile {
                name: "melon".to_string(),
                fallback: None,
                scaling: Some(UnitScalingTable::new(0.75, 1.25, 0.01, 1e306).unwrap()),
            });
        let mut session = AnalysisSession::new();
        session.begin(analyze(&registry, "melon", "Energy: 34 kcal"));
        let two_big = QuantitySelection::new(2.0, QuantityUnit::Big).unwrap();
        session.set_quantity(&registry, two_big).unwrap();

        let huge = QuantitySelection::new(MAX_MULTIPLIER, QuantityUnit::Cup).unwrap();
        let result = session.set_quantity(&registry, huge);
        assert!(matches!(result, Err(NutriError::InvalidInput(_))));

        let analysis = session.require().unwrap();
        assert_eq!(analysis.selection(), two_big);
        assert_eq!(analysis.adjusted().values.get(NutrientKey::Calories), 34.0 * 1.25);
    }

    #[test]
    fn test_clear() {
        let registry = FoodRegistry::builtin().unwrap();
        let mut session = AnalysisSession::new();
        assert!(!session.clear());
        session.begin(analyze(&registry, "oats", ""));
        assert!(session.clear());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("  green APPLE "), "Green Apple");
        assert_eq!(title_case(""), "");
    }
}
