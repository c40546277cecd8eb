//! Analyze nutrition text offline
//!
//! Usage: cargo run --bin parse_nutrition -- <food> [quantity] [unit] < label.txt
//!
//! Reads nutrition text from stdin, runs it through the same pipeline as
//! the MCP tools, and prints the analysis as JSON.

use std::io::Read;

use nutrifit::models::AnalysisSession;
use nutrifit::nutrition::FoodRegistry;
use nutrifit::tools::analysis;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let Some(food) = args.get(1) else {
        eprintln!("Usage: parse_nutrition <food> [quantity] [unit] < nutrition.txt");
        std::process::exit(2);
    };
    let quantity: Option<f64> = args.get(2).map(|q| q.parse()).transpose()?;
    let unit = args.get(3).map(String::as_str).unwrap_or("medium");

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;

    let registry = FoodRegistry::builtin()?;
    let mut session = AnalysisSession::new();

    let mut response = analysis::analyze_nutrition_text(&registry, &mut session, food, &text)?;
    if let Some(quantity) = quantity {
        response = analysis::adjust_quantity(&registry, &mut session, quantity, unit)?;
    }

    for warning in &response.warnings {
        eprintln!("Warning: {}", warning);
    }
    if let Some(message) = &response.low_confidence_message {
        eprintln!("{}", message);
    }

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
