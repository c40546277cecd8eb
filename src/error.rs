//! Error types
//!
//! Request-level failures. Parse warnings and fallback use are not errors;
//! they travel inside the analysis result.

use thiserror::Error;

/// NutriFit error types
#[derive(Debug, Error)]
pub enum NutriError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{service} unavailable: {message}")]
    UpstreamUnavailable { service: &'static str, message: String },

    #[error("No food has been analyzed yet. Call analyze_food first.")]
    NoAnalysis,

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NutriError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        NutriError::InvalidInput(message.into())
    }

    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        NutriError::UpstreamUnavailable {
            service,
            message: message.into(),
        }
    }
}

/// Result type for NutriFit operations
pub type NutriResult<T> = Result<T, NutriError>;
