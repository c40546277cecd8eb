//! External data sources
//!
//! The nutrition database and the language model are opaque text producers.
//! Each is a trait so tools can run against stub sources in tests.

pub mod ollama;
pub mod usda;

use async_trait::async_trait;

use crate::error::NutriResult;

pub use ollama::OllamaClient;
pub use usda::UsdaClient;

/// Produces nutrition text for a food name
///
/// On no match the source returns an informational "no data" message, not an
/// error. Errors mean the source could not be reached or understood.
#[async_trait]
pub trait NutritionSource: Send + Sync {
    async fn nutrition_text(&self, food: &str) -> NutriResult<String>;
}

/// Answers free-text nutrition questions
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    async fn answer(&self, question: &str) -> NutriResult<String>;
}
