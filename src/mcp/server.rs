//! NutriFit MCP Server Implementation
//!
//! Implements the MCP server with all NutriFit tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::external::{KnowledgeSource, NutritionSource, OllamaClient, UsdaClient};
use crate::models::AnalysisSession;
use crate::nutrition::FoodRegistry;
use crate::tools::analysis;
use crate::tools::charts;
use crate::tools::knowledge;
use crate::tools::status::StatusTracker;

/// NutriFit MCP Service
#[derive(Clone)]
pub struct NutrifitService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    registry: Arc<FoodRegistry>,
    /// The single interactive session this server holds
    session: Arc<Mutex<AnalysisSession>>,
    nutrition_source: Arc<dyn NutritionSource>,
    knowledge_source: Arc<dyn KnowledgeSource>,
    tool_router: ToolRouter<NutrifitService>,
}

impl NutrifitService {
    /// Service backed by USDA FoodData Central and a local Ollama server
    pub fn new(config: Config, registry: FoodRegistry) -> Self {
        let usda = Arc::new(UsdaClient::new(&config));
        let ollama = Arc::new(OllamaClient::new(&config));
        Self::with_sources(config, registry, usda, ollama)
    }

    pub fn with_sources(
        config: Config,
        registry: FoodRegistry,
        nutrition_source: Arc<dyn NutritionSource>,
        knowledge_source: Arc<dyn KnowledgeSource>,
    ) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config))),
            registry: Arc::new(registry),
            session: Arc::new(Mutex::new(AnalysisSession::new())),
            nutrition_source,
            knowledge_source,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Analysis Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeFoodParams {
    /// Food name to look up (e.g., "banana", "rolled oats")
    pub food: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeNutritionTextParams {
    /// Food name the text describes
    pub food: String,
    /// Nutrition text, "label: value unit" items separated by " - " or newlines
    pub nutrition_text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AdjustQuantityParams {
    /// Quantity multiplier, from 0.1 to 10000
    pub quantity: f64,
    /// Unit: small, medium, big, gram, or cup
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String { "medium".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NutrientCardsParams {
    /// Category filter: all, macro, energy, mineral, or lipid
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String { "all".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RenderMacroChartParams {
    /// Output path for the PNG file (e.g., "/tmp/banana_macros.png")
    pub file_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AskNutritionParams {
    /// Free-form nutrition question
    pub question: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutrifitService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriFit service including build info, upstream configuration, the food currently analyzed, and process information")]
    async fn nutrifit_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let session = self.session.lock().await;
        let status = tracker.get_status(&self.registry, &session);
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for analyzing foods. Call this when starting a nutrition analysis session or when unsure how to use the analysis tools.")]
    fn analysis_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::ANALYSIS_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(ANALYSIS_INSTRUCTIONS)]))
    }

    // --- Analysis ---

    #[tool(description = "Look up a food in USDA FoodData Central and start a new analysis at x1 medium. Missing nutrients are filled from built-in profiles; unknown foods are flagged low_confidence.")]
    async fn analyze_food(&self, Parameters(p): Parameters<AnalyzeFoodParams>) -> Result<CallToolResult, McpError> {
        // Locks the session only after the lookup returns
        let result = analysis::analyze_food(self.nutrition_source.as_ref(), &self.registry, &self.session, &p.food)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Start a new analysis from nutrition text you already have (e.g., \"Energy: 89 kcal - Protein: 1.1 g\") instead of looking the food up")]
    async fn analyze_nutrition_text(&self, Parameters(p): Parameters<AnalyzeNutritionTextParams>) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let result = analysis::analyze_nutrition_text(&self.registry, &mut session, &p.food, &p.nutrition_text)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Rescale the current food to a quantity and unit (small, medium, big, gram, cup). Returns the full adjusted analysis.")]
    async fn adjust_quantity(&self, Parameters(p): Parameters<AdjustQuantityParams>) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let result = analysis::adjust_quantity(&self.registry, &mut session, p.quantity, &p.unit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get classified nutrient cards for the current food. Each card compares the adjusted amount with a daily reference value. Category: all, macro, energy, mineral, lipid.")]
    async fn nutrient_cards(&self, Parameters(p): Parameters<NutrientCardsParams>) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        let result = analysis::get_nutrient_cards(&self.registry, &session, &p.category)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Render a PNG bar chart of calories, protein, fat, carbohydrates, fiber and sugar for the current food and quantity")]
    async fn render_macro_chart(&self, Parameters(p): Parameters<RenderMacroChartParams>) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        let result = charts::render_macro_chart(&session, &p.file_path)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Clear the current food analysis")]
    async fn clear_analysis(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let result = analysis::clear_analysis(&mut session);
        json_result(&result)
    }

    // --- Questions ---

    #[tool(description = "Ask a free-form nutrition question to the local language model")]
    async fn ask_nutrition(&self, Parameters(p): Parameters<AskNutritionParams>) -> Result<CallToolResult, McpError> {
        let result = knowledge::ask_nutrition(self.knowledge_source.as_ref(), &p.question)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutrifitService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrifit".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriFit Nutrition Analyzer".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriFit - Single-food nutrition analysis. \
                 IMPORTANT: Call analysis_instructions before a new session. \
                 Analysis: analyze_food (USDA lookup) or analyze_nutrition_text (your own label text), \
                 then adjust_quantity, nutrient_cards, render_macro_chart. \
                 A new analysis resets the quantity to x1 medium. clear_analysis drops it. \
                 Questions: ask_nutrition. Status: nutrifit_status."
                    .into(),
            ),
        }
    }
}
