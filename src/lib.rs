//! NutriFit Library
//!
//! Nutrition text parsing, fallback filling, quantity scaling and
//! reference classification for single-food analysis.

pub mod build_info;
pub mod config;
pub mod error;
pub mod external;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
