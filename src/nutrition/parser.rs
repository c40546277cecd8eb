//! Nutrient text parser
//!
//! Turns the loosely structured "label: amount unit" text returned by the
//! nutrition database into a `NutrientSnapshot`.
//!
//! Extraction is rule based: each rule pairs a nutrient key with a label
//! synonym and the unit expected after the number. Rules are evaluated
//! independently against the whole text, so a missing or garbled nutrient
//! never affects the others.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::{NutrientKey, NutrientSnapshot};

/// Delimiter between "label: value" segments
pub const SEGMENT_DELIMITER: &str = " - ";

/// Prefix of the header line that precedes the segments
const HEADER_PREFIX: &str = "nutrition info for";

/// One extraction rule
#[derive(Debug, Clone, Copy)]
pub struct LabelRule {
    pub key: NutrientKey,
    /// Label as written by the source, matched case-insensitively
    pub label: &'static str,
    /// Unit token expected after the amount
    pub unit: &'static str,
}

/// Extraction rules in priority order. The first rule that matches a key wins.
pub const LABEL_RULES: &[LabelRule] = &[
    LabelRule { key: NutrientKey::Calories, label: "energy", unit: "kcal" },
    LabelRule { key: NutrientKey::Protein, label: "protein", unit: "g" },
    LabelRule { key: NutrientKey::Fat, label: "total lipid (fat)", unit: "g" },
    LabelRule { key: NutrientKey::Carbohydrates, label: "carbohydrate, by difference", unit: "g" },
    LabelRule { key: NutrientKey::Fiber, label: "fiber, total dietary", unit: "g" },
    LabelRule { key: NutrientKey::Sugar, label: "sugars, total including nlea", unit: "g" },
    LabelRule { key: NutrientKey::Sugar, label: "sugars, total", unit: "g" },
    LabelRule { key: NutrientKey::Sodium, label: "sodium, na", unit: "mg" },
    LabelRule { key: NutrientKey::Cholesterol, label: "cholesterol", unit: "mg" },
];

struct CompiledRule {
    rule: LabelRule,
    pattern: Regex,
}

static COMPILED_RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    LABEL_RULES
        .iter()
        .map(|rule| CompiledRule {
            rule: *rule,
            pattern: Regex::new(&format!(
                r"(?i){}:?\s*([\d.]+)\s*{}",
                regex::escape(rule.label),
                regex::escape(rule.unit)
            ))
            .expect("Invalid nutrient label regex"),
        })
        .collect()
});

/// Non-fatal problem found while parsing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// Segment without a "label: value" split
    InvalidSegment { segment: String },
    /// Label matched but the amount is not a number
    InvalidNumber { key: NutrientKey, raw: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::InvalidSegment { segment } => write!(
                f,
                "Invalid format: '{}'. Expected 'key: value'. Skipping...",
                segment
            ),
            ParseWarning::InvalidNumber { key, raw } => {
                write!(f, "Could not parse {} value '{}'. Skipping...", key, raw)
            }
        }
    }
}

/// A "label: value" pair from the source text, kept verbatim for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientEntry {
    pub label: String,
    pub value: String,
}

/// Result of parsing one nutrition text
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedNutrition {
    pub snapshot: NutrientSnapshot,
    pub entries: Vec<NutrientEntry>,
    pub warnings: Vec<ParseWarning>,
}

/// Parse nutrition text into a snapshot, detail entries and warnings
///
/// Never fails: unrecognized text yields an all-zero snapshot.
pub fn parse_nutrition_text(text: &str) -> ParsedNutrition {
    let normalized = text.replace(['\r', '\n'], " ");
    let mut parsed = ParsedNutrition::default();

    split_segments(&normalized, &mut parsed);
    extract_values(&normalized, &mut parsed);

    if !parsed.warnings.is_empty() {
        tracing::debug!("Nutrition text parsed with {} warning(s)", parsed.warnings.len());
    }

    parsed
}

fn split_segments(text: &str, parsed: &mut ParsedNutrition) {
    for part in text.split(SEGMENT_DELIMITER) {
        let part = part.trim().trim_start_matches('-').trim();
        if part.is_empty() || is_header(part) {
            continue;
        }

        match part.split_once(": ") {
            Some((label, value)) => parsed.entries.push(NutrientEntry {
                label: label.trim().to_string(),
                value: value.trim().to_string(),
            }),
            None => parsed.warnings.push(ParseWarning::InvalidSegment {
                segment: part.to_string(),
            }),
        }
    }
}

fn is_header(part: &str) -> bool {
    part.to_lowercase().starts_with(HEADER_PREFIX) && part.ends_with(':')
}

fn extract_values(text: &str, parsed: &mut ParsedNutrition) {
    let mut matched: Vec<NutrientKey> = Vec::new();

    for compiled in COMPILED_RULES.iter() {
        let key = compiled.rule.key;
        if matched.contains(&key) {
            continue;
        }

        let Some(raw) = compiled
            .pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        else {
            continue;
        };

        matched.push(key);
        match raw.parse::<f64>() {
            Ok(value) => parsed.snapshot.set(key, value),
            Err(_) => parsed.warnings.push(ParseWarning::InvalidNumber {
                key,
                raw: raw.to_string(),
            }),
        }
    }
}
