//! NutriFit Status Tool
//!
//! Provides runtime status information about the NutriFit service.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::Config;
use crate::models::AnalysisSession;
use crate::nutrition::FoodRegistry;

/// Analysis workflow instructions for AI assistants
pub const ANALYSIS_INSTRUCTIONS: &str = r#"
# NutriFit Analysis Instructions

## Workflow

1. `analyze_food(food: "banana")` looks the food up in USDA FoodData Central
   and starts a new analysis at **x1 medium**.
2. `adjust_quantity(quantity: 2, unit: "big")` rescales the current food.
3. `nutrient_cards(category: "macro")` returns classified nutrient cards.
4. `render_macro_chart(file_path: "/tmp/banana.png")` writes a PNG bar chart.
5. `clear_analysis` drops the current food.

Starting a new analysis always resets the quantity to x1 medium.

If you already have label text, use `analyze_nutrition_text` instead of
`analyze_food`. Text is a list of `label: value unit` items separated by
`" - "` or newlines, for example:

```
Energy: 89 kcal - Protein: 1.1 g - Sodium, Na: 1 mg
```

## Units

| Unit | Meaning |
|------|---------|
| `small` / `medium` / `big` | Size of one piece; medium is the reference |
| `gram` | One gram |
| `cup` | One cup |

The quantity must be between 0.1 and 10000.

## Missing Values

A nutrient that reads as zero is treated as missing and filled from the
food's built-in profile. Foods without a profile use generic values and the
result is flagged `low_confidence`; say so when presenting the numbers.

## Card Colors

Each card compares the adjusted amount with a daily reference value:

| Band | Ratio to reference | Color |
|------|--------------------|-------|
| near_target | 0.9 to 1.1 | green |
| moderate_deviation | 0.7 to 1.3 | orange |
| large_deviation | otherwise | red |
| unavailable | no reference | gray |

## Questions

`ask_nutrition(question: "...")` forwards a free-form question to the local
language model. If the model is down, a fixed message is returned instead
of an error.
"#;

/// Runtime status of the NutriFit service
#[derive(Debug, Clone, Serialize)]
pub struct NutrifitStatus {
    pub build: BuildInfo,

    /// Upstream configuration
    pub usda_base_url: String,
    pub usda_api_key_configured: bool,
    pub ollama_url: String,
    pub ollama_model: String,

    /// Analysis state
    pub known_foods: Vec<String>,
    pub current_food: Option<String>,
    pub current_selection: Option<String>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    config: Config,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(config: Config) -> Self {
        Self {
            start_time: Instant::now(),
            config,
        }
    }

    /// Get the current status
    pub fn get_status(&self, registry: &FoodRegistry, session: &AnalysisSession) -> NutrifitStatus {
        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        let current = session.current();

        NutrifitStatus {
            build: BuildInfo::current(),
            usda_base_url: self.config.usda_base_url.clone(),
            usda_api_key_configured: self.config.has_usda_api_key(),
            ollama_url: self.config.ollama_url.clone(),
            ollama_model: self.config.ollama_model.clone(),
            known_foods: registry.known_foods().into_iter().map(String::from).collect(),
            current_food: current.map(|a| a.food.clone()),
            current_selection: current.map(|a| a.selection_label()),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
