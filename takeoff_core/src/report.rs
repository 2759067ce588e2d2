//! # Text Report
//!
//! Plain-text rendering of a [`CalculationResult`] for terminals and logs.
//! Three outcomes render differently:
//!
//! - errors: every message, then a prompt to fix the inputs
//! - success: item summaries followed by the Material / Quantity / Unit table
//! - valid input with nothing to buy: a distinct "no materials" message

use std::fmt::Write;

use crate::estimate::{CalculationResult, ItemDetails, ItemSummary};

/// Shown when valid input yields no quantities
pub const NO_MATERIALS_MESSAGE: &str =
    "No materials could be computed from the entered dimensions.";

/// Shown after the error list
pub const CORRECT_INPUTS_PROMPT: &str = "Please correct the inputs and calculate again.";

/// Render a result as plain text.
///
/// ## Example
///
/// ```rust
/// use takeoff_core::estimate::calculate;
/// use takeoff_core::report::render_text;
///
/// let text = render_text(&calculate(&[]));
/// assert!(text.contains("No items to calculate."));
/// ```
pub fn render_text(result: &CalculationResult) -> String {
    let mut out = String::new();

    if result.has_errors() {
        let _ = writeln!(out, "ERRORS");
        for error in &result.errors {
            let _ = writeln!(out, "  - {}", error);
        }
        let _ = writeln!(out, "{}", CORRECT_INPUTS_PROMPT);
        if result.item_summaries.is_empty() {
            return out;
        }
        out.push('\n');
    }

    if result.materials_total.is_empty() {
        let _ = writeln!(out, "{}", NO_MATERIALS_MESSAGE);
        return out;
    }

    let _ = writeln!(out, "ITEMS");
    for summary in &result.item_summaries {
        write_summary(&mut out, summary);
    }
    out.push('\n');

    write_totals_table(&mut out, result);
    out
}

fn write_summary(out: &mut String, summary: &ItemSummary) {
    match &summary.details {
        ItemDetails::Wall {
            faces,
            face1_panel,
            face2_panel,
            post_spacing_m,
            double_structure,
            total_width_m,
            total_area_m2,
            segments,
        } => {
            let _ = writeln!(out, "  {}. {} (Wall)", summary.number, summary.label);
            let panels = match face2_panel {
                Some(face2) => format!("{} / {}", face1_panel, face2),
                None => face1_panel.to_string(),
            };
            let _ = writeln!(
                out,
                "     Faces: {}  Panels: {}  Post spacing: {:.2} m  Double structure: {}",
                faces,
                panels,
                post_spacing_m,
                if *double_structure { "yes" } else { "no" }
            );
            for m in segments {
                let _ = writeln!(
                    out,
                    "     Segment {}: {:.2} m x {:.2} m = {:.2} m²",
                    m.number, m.segment.width_m, m.segment.height_m, m.area_m2
                );
            }
            let _ = writeln!(
                out,
                "     Total width: {:.2} m  Total area: {:.2} m²",
                total_width_m, total_area_m2
            );
        }
        ItemDetails::Ceiling {
            panel,
            plenum_m,
            total_area_m2,
            perimeter_sum_m,
            segments,
        } => {
            let _ = writeln!(out, "  {}. {} (Ceiling)", summary.number, summary.label);
            let _ = writeln!(out, "     Panel: {}  Plenum: {:.2} m", panel, plenum_m);
            for m in segments {
                let _ = writeln!(
                    out,
                    "     Segment {}: {:.2} m x {:.2} m = {:.2} m²",
                    m.number, m.segment.width_m, m.segment.length_m, m.area_m2
                );
            }
            let _ = writeln!(
                out,
                "     Total area: {:.2} m²  Perimeter sum: {:.2} m",
                total_area_m2, perimeter_sum_m
            );
        }
    }
}

fn write_totals_table(out: &mut String, result: &CalculationResult) {
    let lines = result.materials_total.lines();
    let names: Vec<String> = lines.iter().map(|l| l.material.name()).collect();
    let width = names
        .iter()
        .map(|n| n.chars().count())
        .chain(std::iter::once("Material".len()))
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "MATERIALS");
    let _ = writeln!(out, "  {:<width$}  {:>8}  {}", "Material", "Quantity", "Unit");
    let _ = writeln!(out, "  {}", "-".repeat(width + 16));
    for (line, name) in lines.iter().zip(&names) {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>8}  {}",
            name, line.quantity, line.unit
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PanelType;
    use crate::estimate::{calculate, ErrorPolicy, Estimator};
    use crate::items::{CeilingInput, StructureItem, WallInput};

    #[test]
    fn test_error_rendering() {
        let item: StructureItem = WallInput::new(PanelType::Normal).into();
        let text = render_text(&calculate(&[item]));
        assert!(text.contains("Error in Wall #1: must have at least one segment"));
        assert!(text.contains(CORRECT_INPUTS_PROMPT));
        assert!(!text.contains("MATERIALS"));
    }

    #[test]
    fn test_success_rendering() {
        let items: Vec<StructureItem> = vec![
            WallInput::new(PanelType::Normal).with_segment(3.0, 2.4).into(),
            CeilingInput::new(PanelType::Normal).with_label("Lobby").with_segment(1.0, 1.2).into(),
        ];
        let text = render_text(&calculate(&items));

        assert!(text.contains("1. Wall #1 (Wall)"));
        assert!(text.contains("2. Lobby (Ceiling)"));
        assert!(text.contains("Segment 1: 3.00 m x 2.40 m = 7.20 m²"));
        assert!(text.contains("Panel:Normal"));
        assert!(text.contains("Paper Tape"));
        assert!(!text.contains("ERRORS"));
    }

    #[test]
    fn test_empty_takeoff_message() {
        let text = render_text(&CalculationResult::default());
        assert_eq!(text.trim(), NO_MATERIALS_MESSAGE);
    }

    #[test]
    fn test_best_effort_shows_errors_and_totals() {
        let items: Vec<StructureItem> = vec![
            WallInput::new(PanelType::Normal).with_segment(0.0, 2.4).into(),
            WallInput::new(PanelType::Normal).with_segment(3.0, 2.4).into(),
        ];
        let result = Estimator::default()
            .with_policy(ErrorPolicy::BestEffort)
            .calculate(&items);
        let text = render_text(&result);
        assert!(text.contains("Error in Wall #1"));
        assert!(text.contains("2. Wall #2 (Wall)"));
        assert!(text.contains("MATERIALS"));
    }
}
