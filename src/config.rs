//! Runtime configuration
//!
//! Read once from the environment at startup.

use serde::Serialize;

use crate::error::{NutriError, NutriResult};

pub const DEFAULT_USDA_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b";

/// Service configuration
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// USDA FoodData Central API key
    #[serde(skip_serializing)]
    pub usda_api_key: Option<String>,
    pub usda_base_url: String,
    /// Ollama generate endpoint
    pub ollama_url: String,
    pub ollama_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            usda_api_key: None,
            usda_base_url: DEFAULT_USDA_BASE_URL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Load from process environment variables
    pub fn from_env() -> NutriResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> NutriResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        let config = Self {
            usda_api_key: get("NUTRIFIT_USDA_API_KEY").or_else(|| get("USDA_API_KEY")),
            usda_base_url: get("NUTRIFIT_USDA_BASE_URL").unwrap_or(defaults.usda_base_url),
            ollama_url: get("NUTRIFIT_OLLAMA_URL").unwrap_or(defaults.ollama_url),
            ollama_model: get("NUTRIFIT_OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
        };

        for (name, url) in [
            ("NUTRIFIT_USDA_BASE_URL", &config.usda_base_url),
            ("NUTRIFIT_OLLAMA_URL", &config.ollama_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(NutriError::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        Ok(config)
    }

    pub fn has_usda_api_key(&self) -> bool {
        self.usda_api_key.is_some()
    }
}
