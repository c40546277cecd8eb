//! Macronutrient chart tool
//!
//! Renders the adjusted calories and macronutrients of the current food
//! as a PNG bar chart.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use serde::Serialize;

use crate::error::{NutriError, NutriResult};
use crate::models::{AnalysisSession, NutrientKey, NutrientSnapshot};

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 500;

// ============================================================================
// Bar Colors (one per charted nutrient, in chart order)
// ============================================================================

const MACRO_COLORS: [(&str, (u8, u8, u8)); 6] = [
    ("#ff9999", (255, 153, 153)), // Calories
    ("#66b3ff", (102, 179, 255)), // Protein
    ("#99ff99", (153, 255, 153)), // Fat
    ("#ffcc99", (255, 204, 153)), // Carbohydrates
    ("#c2c2f0", (194, 194, 240)), // Fiber
    ("#ffb3e6", (255, 179, 230)), // Sugar
];

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MacroBar {
    pub key: NutrientKey,
    pub label: &'static str,
    pub value: f64,
    pub color: &'static str,
    #[serde(skip)]
    rgb: (u8, u8, u8),
}

#[derive(Debug, Serialize)]
pub struct RenderChartResponse {
    pub success: bool,
    pub file_path: String,
    pub food: String,
    pub selection_label: String,
    pub bytes_written: usize,
    pub bars: Vec<MacroBar>,
    pub message: String,
}

/// Bars for the charted nutrients, in chart order
pub fn macro_bars(values: &NutrientSnapshot) -> Vec<MacroBar> {
    NutrientKey::MACRO_CHART
        .iter()
        .zip(MACRO_COLORS)
        .map(|(key, (hex, rgb))| MacroBar {
            key: *key,
            label: key.label(),
            value: values.get(*key),
            color: hex,
            rgb,
        })
        .collect()
}

// ============================================================================
// Chart Rendering
// ============================================================================

/// Render the bar chart to PNG bytes
pub fn generate_macro_chart(
    bars: &[MacroBar],
    title: &str,
    width: u32,
    height: u32,
) -> NutriResult<Vec<u8>> {
    use plotters::prelude::*;

    if bars.is_empty() {
        return Err(NutriError::Chart("No data to chart".to_string()));
    }
    if width == 0 || height == 0 {
        return Err(NutriError::Chart(format!(
            "Invalid chart size {}x{}",
            width, height
        )));
    }

    let chart_err = |e: &dyn std::fmt::Display| NutriError::Chart(e.to_string());
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| chart_err(&e))?;

        // Headroom for the value labels
        let y_max = bars.iter().map(|b| b.value).fold(0.0, f64::max).max(1.0) * 1.15;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24).into_font())
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0..bars.len() as i32).into_segmented(), 0f64..y_max)
            .map_err(|e| chart_err(&e))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars.len())
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) => bars
                    .get(*i as usize)
                    .map(|b| b.label.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .y_desc("Amount")
            .draw()
            .map_err(|e| chart_err(&e))?;

        chart
            .draw_series(bars.iter().enumerate().map(|(i, bar)| {
                let (r, g, b) = bar.rgb;
                let mut rect = Rectangle::new(
                    [
                        (SegmentValue::Exact(i as i32), 0.0),
                        (SegmentValue::Exact(i as i32 + 1), bar.value),
                    ],
                    RGBColor(r, g, b).filled(),
                );
                rect.set_margin(0, 0, 10, 10);
                rect
            }))
            .map_err(|e| chart_err(&e))?;

        // Value labels above each bar
        chart
            .draw_series(bars.iter().enumerate().map(|(i, bar)| {
                Text::new(
                    format!("{:.1}", bar.value),
                    (SegmentValue::CenterOf(i as i32), bar.value + y_max * 0.05),
                    ("sans-serif", 14).into_font(),
                )
            }))
            .map_err(|e| chart_err(&e))?;

        root.present().map_err(|e| chart_err(&e))?;
    }

    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| NutriError::Chart("Failed to create image from buffer".to_string()))?;

    let mut png_bytes: Vec<u8> = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| NutriError::Chart(format!("Failed to encode PNG: {}", e)))?;

    Ok(png_bytes)
}

/// Render the chart for the current food and write it to `file_path`
pub fn render_macro_chart(
    session: &AnalysisSession,
    file_path: &str,
) -> Result<RenderChartResponse, String> {
    let file_path = file_path.trim();
    if file_path.is_empty() {
        return Err(NutriError::invalid_input("A file path for the chart is required.").to_string());
    }

    let analysis = session.require().map_err(|e| e.to_string())?;
    let selection_label = analysis.selection_label();
    let bars = macro_bars(&analysis.adjusted().values);
    let title = format!("Macronutrients: {}", selection_label);

    let png = generate_macro_chart(&bars, &title, CHART_WIDTH, CHART_HEIGHT)
        .map_err(|e| e.to_string())?;

    let path = Path::new(file_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            NutriError::Chart(format!("Failed to create directory: {}", e)).to_string()
        })?;
    }
    std::fs::write(path, &png)
        .map_err(|e| NutriError::Chart(format!("Failed to write chart: {}", e)).to_string())?;

    tracing::info!("Wrote macro chart for '{}' to {}", analysis.food, file_path);

    Ok(RenderChartResponse {
        success: true,
        file_path: file_path.to_string(),
        food: analysis.food.clone(),
        selection_label,
        bytes_written: png.len(),
        bars,
        message: format!("Chart saved ({} bytes)", png.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodAnalysis;
    use crate::nutrition::{parse_nutrition_text, FoodRegistry};

    #[test]
    fn test_macro_bars_order_and_colors() {
        let values = NutrientSnapshot::from_values([89.0, 1.1, 0.3, 22.8, 2.6, 12.2, 1.0, 0.0]);
        let bars = macro_bars(&values);

        let keys: Vec<NutrientKey> = bars.iter().map(|b| b.key).collect();
        assert_eq!(keys, NutrientKey::MACRO_CHART.to_vec());
        assert_eq!(bars[0].value, 89.0);
        assert_eq!(bars[0].color, "#ff9999");
        assert_eq!(bars[5].key, NutrientKey::Sugar);
        assert_eq!(bars[5].color, "#ffb3e6");
        // Sodium and cholesterol are not charted
        assert!(bars.iter().all(|b| b.key != NutrientKey::Sodium));
    }

    #[test]
    fn test_generate_rejects_bad_input() {
        let bars = macro_bars(&NutrientSnapshot::zero());
        assert!(matches!(
            generate_macro_chart(&bars, "t", 0, 100),
            Err(NutriError::Chart(_))
        ));
        assert!(matches!(
            generate_macro_chart(&[], "t", 100, 100),
            Err(NutriError::Chart(_))
        ));
    }

    #[test]
    fn test_render_requires_analysis() {
        let session = AnalysisSession::new();
        let err = render_macro_chart(&session, "/tmp/chart.png").unwrap_err();
        assert!(err.contains("No food has been analyzed"));
    }

    #[test]
    fn test_render_writes_png() {
        let registry = FoodRegistry::builtin().unwrap();
        let mut session = AnalysisSession::new();
        let analysis =
            FoodAnalysis::new(&registry, "banana", parse_nutrition_text("Energy: 89 kcal")).unwrap();
        session.begin(analysis);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("banana.png");
        let response = render_macro_chart(&session, path.to_str().unwrap()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(response.bytes_written, bytes.len());
        assert_eq!(response.selection_label, "x1 medium bananas");
        assert_eq!(response.bars[0].value, 89.0);
    }

    #[test]
    fn test_render_requires_path() {
        let session = AnalysisSession::new();
        assert!(render_macro_chart(&session, "  ").unwrap_err().contains("file path"));
    }
}
