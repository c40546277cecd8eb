//! Food analysis tools
//!
//! Request-scoped pipelines over the analysis session:
//! fetch -> parse -> fallback -> scale -> classify.

use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::NutriError;
use crate::external::NutritionSource;
use crate::models::{
    AnalysisSession, CategoryFilter, FoodAnalysis, NutrientKey, NutrientSnapshot,
    QuantitySelection, QuantityUnit,
};
use crate::nutrition::{
    nutrient_cards, parse_nutrition_text, FoodRegistry, NutrientCard, NutrientEntry, ProfileMatch,
};

/// Full view of the current analysis
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub food: String,
    pub display_name: String,
    pub selection: QuantitySelection,
    /// e.g. "x2 big bananas"
    pub selection_label: String,
    pub factor: f64,
    pub scaling_table: ProfileMatch,
    /// Per medium unit, after fallback
    pub base: NutrientSnapshot,
    /// Scaled to the selection
    pub adjusted: NutrientSnapshot,
    pub entries: Vec<NutrientEntry>,
    pub warnings: Vec<String>,
    pub fallback_profile: ProfileMatch,
    pub low_confidence: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_confidence_message: Option<String>,
    pub filled: Vec<NutrientKey>,
    pub cards: Vec<NutrientCard>,
    pub analyzed_at: String,
}

impl AnalysisResponse {
    pub fn from_analysis(analysis: &FoodAnalysis, registry: &FoodRegistry) -> Self {
        let adjusted = analysis.adjusted();
        let low_confidence_message = analysis.low_confidence.then(|| {
            format!(
                "Using default nutrient values for '{}' as specific data is unavailable.",
                analysis.display_name
            )
        });

        Self {
            food: analysis.food.clone(),
            display_name: analysis.display_name.clone(),
            selection: adjusted.selection,
            selection_label: analysis.selection_label(),
            factor: adjusted.factor,
            scaling_table: adjusted.table.clone(),
            base: analysis.base,
            adjusted: adjusted.values,
            entries: analysis.entries.clone(),
            warnings: analysis.warnings.iter().map(ToString::to_string).collect(),
            fallback_profile: analysis.profile.clone(),
            low_confidence: analysis.low_confidence,
            low_confidence_message,
            filled: analysis.filled.clone(),
            cards: nutrient_cards(&adjusted.values, registry.reference(), CategoryFilter::All),
            analyzed_at: analysis.analyzed_at.clone(),
        }
    }
}

/// Response for nutrient_cards
#[derive(Debug, Serialize)]
pub struct NutrientCardsResponse {
    pub food: String,
    pub selection_label: String,
    pub category: CategoryFilter,
    pub cards: Vec<NutrientCard>,
}

/// Response for clear_analysis
#[derive(Debug, Serialize)]
pub struct ClearAnalysisResponse {
    pub success: bool,
    pub message: String,
}

fn require_food(food: &str) -> Result<&str, String> {
    let food = food.trim();
    if food.is_empty() {
        return Err(NutriError::invalid_input("Please enter a valid food item.").to_string());
    }
    Ok(food)
}

/// Look a food up in the nutrition source and start a new analysis
///
/// The session is locked only after the lookup returns. On any error the
/// session keeps its previous analysis.
pub async fn analyze_food(
    source: &dyn NutritionSource,
    registry: &FoodRegistry,
    session: &Mutex<AnalysisSession>,
    food: &str,
) -> Result<AnalysisResponse, String> {
    let food = require_food(food)?;
    tracing::info!("Analyzing food: {}", food);

    let text = source.nutrition_text(food).await.map_err(|e| {
        tracing::error!("Nutrition lookup failed for '{}': {}", food, e);
        e.to_string()
    })?;

    let mut session = session.lock().await;
    begin_analysis(registry, &mut session, food, &text)
}

/// Start a new analysis from nutrition text supplied by the caller
pub fn analyze_nutrition_text(
    registry: &FoodRegistry,
    session: &mut AnalysisSession,
    food: &str,
    nutrition_text: &str,
) -> Result<AnalysisResponse, String> {
    let food = require_food(food)?;
    begin_analysis(registry, session, food, nutrition_text)
}

fn begin_analysis(
    registry: &FoodRegistry,
    session: &mut AnalysisSession,
    food: &str,
    text: &str,
) -> Result<AnalysisResponse, String> {
    let parsed = parse_nutrition_text(text);
    for warning in &parsed.warnings {
        tracing::warn!("{}", warning);
    }

    let analysis = FoodAnalysis::new(registry, food, parsed).map_err(|e| e.to_string())?;
    let analysis = session.begin(analysis);
    Ok(AnalysisResponse::from_analysis(analysis, registry))
}

/// Rescale the current food to a new quantity and unit
pub fn adjust_quantity(
    registry: &FoodRegistry,
    session: &mut AnalysisSession,
    quantity: f64,
    unit: &str,
) -> Result<AnalysisResponse, String> {
    let unit: QuantityUnit = unit.parse().map_err(|e: NutriError| e.to_string())?;
    let selection = QuantitySelection::new(quantity, unit).map_err(|e| e.to_string())?;

    let analysis = session
        .set_quantity(registry, selection)
        .map_err(|e| e.to_string())?;
    tracing::info!("Adjusted '{}' to {}", analysis.food, analysis.selection_label());

    Ok(AnalysisResponse::from_analysis(analysis, registry))
}

/// Classified cards for the current food, filtered by category
pub fn get_nutrient_cards(
    registry: &FoodRegistry,
    session: &AnalysisSession,
    category: &str,
) -> Result<NutrientCardsResponse, String> {
    let category: CategoryFilter = category.parse().map_err(|e: NutriError| e.to_string())?;
    let analysis = session.require().map_err(|e| e.to_string())?;

    Ok(NutrientCardsResponse {
        food: analysis.food.clone(),
        selection_label: analysis.selection_label(),
        category,
        cards: nutrient_cards(&analysis.adjusted().values, registry.reference(), category),
    })
}

/// Drop the current analysis
pub fn clear_analysis(session: &mut AnalysisSession) -> ClearAnalysisResponse {
    if session.clear() {
        ClearAnalysisResponse {
            success: true,
            message: "Analysis cleared".to_string(),
        }
    } else {
        ClearAnalysisResponse {
            success: false,
            message: "No analysis to clear".to_string(),
        }
    }
}
