//! Data models
//!
//! Nutrient values, quantity selections and the analysis session.

mod nutrient;
mod nutrition;
mod quantity;
mod session;

pub use nutrient::{CategoryFilter, NutrientCategory, NutrientKey, NutrientUnit};
pub use nutrition::NutrientSnapshot;
pub use quantity::{QuantitySelection, QuantityUnit, MAX_MULTIPLIER, MIN_MULTIPLIER};
pub use session::{AnalysisSession, FoodAnalysis};
