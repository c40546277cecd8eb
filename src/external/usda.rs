//! USDA FoodData Central client
//!
//! Looks a food up by name and renders its nutrient list as
//! "label: amount unit" lines for the nutrient parser.
//!
//! API reference: <https://fdc.nal.usda.gov/api-guide.html>

use std::fmt::Write;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::NutritionSource;
use crate::config::Config;
use crate::error::{NutriError, NutriResult};

const SERVICE: &str = "USDA API";

/// A nutrient as reported by the details endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct FoodNutrient {
    pub name: String,
    pub amount: Option<f64>,
    pub unit: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
struct SearchFood {
    #[serde(rename = "fdcId")]
    fdc_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct FoodDetailsResponse {
    #[serde(rename = "foodNutrients", default)]
    food_nutrients: Vec<FoodNutrientResponse>,
}

#[derive(Debug, Deserialize)]
struct FoodNutrientResponse {
    nutrient: Option<NutrientInfo>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NutrientInfo {
    name: Option<String>,
    #[serde(rename = "unitName")]
    unit_name: Option<String>,
}

impl From<FoodNutrientResponse> for FoodNutrient {
    fn from(response: FoodNutrientResponse) -> Self {
        let (name, unit) = match response.nutrient {
            Some(info) => (info.name, info.unit_name),
            None => (None, None),
        };
        Self {
            name: name.unwrap_or_else(|| "Unknown Nutrient".to_string()),
            amount: response.amount,
            unit: unit.unwrap_or_default(),
        }
    }
}

/// Render nutrients in the "Nutrition info for ..." text format
pub fn format_nutrition_text(food: &str, nutrients: &[FoodNutrient]) -> String {
    let mut text = format!("Nutrition info for {}:\n", food);
    for nutrient in nutrients {
        let amount = nutrient
            .amount
            .map(|a| a.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        // Writing to a String cannot fail
        let _ = writeln!(text, "- {}: {} {}", nutrient.name, amount, nutrient.unit);
    }
    text
}

/// Message returned when the search finds nothing
pub fn no_data_message(food: &str) -> String {
    format!("No detailed nutrition information found for '{}'.", food)
}

/// USDA FoodData Central client
pub struct UsdaClient {
    api_key: Option<String>,
    base_url: String,
    http_client: reqwest::Client,
}

impl UsdaClient {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.usda_api_key.clone(),
            base_url: config.usda_base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    fn api_key(&self) -> NutriResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            NutriError::upstream(
                SERVICE,
                "USDA API key is not configured, cannot fetch nutrition information.",
            )
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> NutriResult<T> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error calling USDA API: {}", e);
                NutriError::upstream(SERVICE, format!("Network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("USDA API returned HTTP {}", status);
            return Err(NutriError::upstream(SERVICE, format!("HTTP {}", status)));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("JSON decoding error from USDA API: {}", e);
            NutriError::upstream(SERVICE, format!("JSON parse error: {}", e))
        })
    }

    /// FDC ID of the first search hit, if any
    pub async fn search_first(&self, food: &str) -> NutriResult<Option<u64>> {
        let api_key = self.api_key()?;
        let url = format!("{}/foods/search", self.base_url);
        tracing::info!("Searching USDA for: {}", food);

        let search: SearchResponse = self
            .get_json(&url, &[("query", food), ("api_key", api_key)])
            .await?;

        Ok(search.foods.into_iter().next().and_then(|f| f.fdc_id))
    }

    /// Nutrient list for an FDC ID
    pub async fn food_nutrients(&self, fdc_id: u64) -> NutriResult<Vec<FoodNutrient>> {
        let api_key = self.api_key()?;
        let url = format!("{}/food/{}", self.base_url, fdc_id);
        tracing::info!("Fetching nutrient details for FDC ID: {}", fdc_id);

        let details: FoodDetailsResponse = self.get_json(&url, &[("api_key", api_key)]).await?;

        Ok(details
            .food_nutrients
            .into_iter()
            .map(FoodNutrient::from)
            .collect())
    }
}

#[async_trait]
impl NutritionSource for UsdaClient {
    async fn nutrition_text(&self, food: &str) -> NutriResult<String> {
        let Some(fdc_id) = self.search_first(food).await? else {
            tracing::warn!("No food items found for '{}' in USDA search", food);
            return Ok(no_data_message(food));
        };

        let nutrients = self.food_nutrients(fdc_id).await?;
        if nutrients.is_empty() {
            tracing::info!("No nutrient data found for FDC ID {} ({})", fdc_id, food);
            return Ok(format!("No detailed nutrient data available for {}.", food));
        }

        tracing::info!("Fetched {} nutrients for {}", nutrients.len(), food);
        Ok(format_nutrition_text(food, &nutrients))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutrientKey;
    use crate::nutrition::parse_nutrition_text;

    fn nutrient(name: &str, amount: f64, unit: &str) -> FoodNutrient {
        FoodNutrient {
            name: name.to_string(),
            amount: Some(amount),
            unit: unit.to_string(),
        }
    }

    #[test]
    fn test_format_nutrition_text() {
        let text = format_nutrition_text(
            "banana",
            &[nutrient("Energy", 89.0, "kcal"), nutrient("Protein", 1.09, "g")],
        );
        assert_eq!(
            text,
            "Nutrition info for banana:\n- Energy: 89 kcal\n- Protein: 1.09 g\n"
        );
    }

    #[test]
    fn test_formatted_text_parses() {
        let text = format_nutrition_text(
            "egg",
            &[
                nutrient("Energy", 143.0, "kcal"),
                nutrient("Total lipid (fat)", 9.51, "g"),
                nutrient("Sodium, Na", 142.0, "mg"),
                FoodNutrient { name: "Water".into(), amount: None, unit: "g".into() },
            ],
        );
        let parsed = parse_nutrition_text(&text);
        assert_eq!(parsed.snapshot.get(NutrientKey::Calories), 143.0);
        assert_eq!(parsed.snapshot.get(NutrientKey::Fat), 9.51);
        assert_eq!(parsed.snapshot.get(NutrientKey::Sodium), 142.0);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_details_response_deserializes() {
        let json = r#"{
            "fdcId": 173944,
            "foodNutrients": [
                {"nutrient": {"id": 1008, "name": "Energy", "unitName": "kcal"}, "amount": 89.0},
                {"nutrient": {"id": 1003, "name": "Protein", "unitName": "g"}},
                {"amount": 3.0}
            ]
        }"#;
        let details: FoodDetailsResponse = serde_json::from_str(json).unwrap();
        let nutrients: Vec<FoodNutrient> =
            details.food_nutrients.into_iter().map(FoodNutrient::from).collect();
        assert_eq!(nutrients[0], nutrient("Energy", 89.0, "kcal"));
        assert_eq!(nutrients[1].amount, None);
        assert_eq!(nutrients[2].name, "Unknown Nutrient");
    }

    #[test]
    fn test_search_response_without_foods() {
        let search: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(search.foods.is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_upstream_error() {
        let client = UsdaClient::new(&Config::default());
        let result = client.nutrition_text("banana").await;
        assert!(matches!(result, Err(NutriError::UpstreamUnavailable { .. })));
    }
}
