//! Nutrition engine
//!
//! Parse, fill, scale and classify nutrient data:
//! raw text -> parsed snapshot -> fallback-filled -> scaled -> classified.

pub mod classify;
pub mod fallback;
pub mod parser;
pub mod registry;
pub mod scaler;

pub use classify::{classify, nutrient_cards, Band, NutrientCard};
pub use fallback::{apply_fallback, FallbackOutcome};
pub use parser::{parse_nutrition_text, NutrientEntry, ParseWarning, ParsedNutrition};
pub use registry::{
    normalize_food_name, FoodProfile, FoodRegistry, ProfileMatch, ReferenceTable,
    UnitScalingTable,
};
pub use scaler::{combined_factor, scale, AdjustedSnapshot};
