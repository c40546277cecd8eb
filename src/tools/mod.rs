//! NutriFit Tools module
//!
//! MCP tool implementations for the NutriFit analyzer.

pub mod analysis;
pub mod charts;
pub mod knowledge;
pub mod status;
