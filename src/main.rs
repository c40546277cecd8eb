//! NutriFit
//!
//! An MCP server for single-food nutrition analysis.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutrifit::build_info;
use nutrifit::config::Config;
use nutrifit::mcp::NutrifitService;
use nutrifit::nutrition::FoodRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrifit=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env()?;
    eprintln!("USDA endpoint: {}", config.usda_base_url);
    if !config.has_usda_api_key() {
        eprintln!("Warning: no USDA API key set (NUTRIFIT_USDA_API_KEY); analyze_food will fail");
    }
    eprintln!("Ollama endpoint: {} ({})", config.ollama_url, config.ollama_model);

    let registry = FoodRegistry::builtin()?;
    eprintln!("Built-in food profiles: {}", registry.known_foods().join(", "));

    // Create the NutriFit service
    let service = NutrifitService::new(config, registry);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
