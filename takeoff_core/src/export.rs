//! # Spreadsheet Export
//!
//! Renders a calculation result as a CSV sheet with two blocks:
//!
//! 1. **Item detail**: per item an options row carrying the validated
//!    configuration and totals, followed by one row per measured segment.
//! 2. **Material totals**: material, quantity and unit, in name order.
//!
//! Exports only make sense for a complete takeoff, so every exporter first
//! calls [`ensure_exportable`].
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::catalog::PanelType;
//! use takeoff_core::estimate::calculate;
//! use takeoff_core::export::render_csv;
//! use takeoff_core::items::{StructureItem, WallInput};
//!
//! let items = vec![StructureItem::Wall(WallInput::new(PanelType::Normal).with_segment(3.0, 2.4))];
//! let csv = render_csv(&calculate(&items)).unwrap();
//! assert!(csv.contains("Panel:Normal,3,pcs"));
//!
//! // Nothing to export from a failed pass
//! assert!(render_csv(&calculate(&[])).is_err());
//! ```

use chrono::Utc;

use crate::estimate::{CalculationResult, ItemDetails, ItemSummary};
use crate::errors::{CalcError, CalcResult};

/// Reason given when an export is refused
pub const EXPORT_REFUSED_REASON: &str = "Run a valid calculation before exporting.";

/// Columns of the item-detail block
const ITEM_HEADER: [&str; 13] = [
    "Item Type",
    "Item No.",
    "Detail",
    "Faces",
    "Face 1 Panel",
    "Face 2 Panel",
    "Ceiling Panel",
    "Post Spacing (m)",
    "Plenum (m)",
    "Double Structure",
    "Total Width (m)",
    "Perimeter Sum (m)",
    "Total Area (m2)",
];

/// Refuse to export anything but a complete takeoff.
///
/// A result is exportable when it has both material totals and at least one
/// item summary.
pub fn ensure_exportable(result: &CalculationResult, format: &str) -> CalcResult<()> {
    if result.materials_total.is_empty() || result.item_summaries.is_empty() {
        tracing::warn!("Refusing {} export: no complete calculation", format);
        return Err(CalcError::export_refused(format, EXPORT_REFUSED_REASON));
    }
    Ok(())
}

/// Quote a CSV field when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn push_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let row: Vec<String> = fields.iter().map(|f| csv_field(f.as_ref())).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

fn meters(value: f64) -> String {
    format!("{:.2}", value)
}

/// Configuration columns 0..=9 for an item, with the detail column empty
fn item_columns(summary: &ItemSummary) -> Vec<String> {
    let mut columns = vec![
        summary.details.kind_name().to_string(),
        summary.number.to_string(),
        String::new(),
    ];
    match &summary.details {
        ItemDetails::Wall {
            faces,
            face1_panel,
            face2_panel,
            post_spacing_m,
            double_structure,
            ..
        } => {
            columns.push(faces.to_string());
            columns.push(face1_panel.to_string());
            columns.push(face2_panel.map(|p| p.to_string()).unwrap_or_default());
            columns.push(String::new());
            columns.push(meters(*post_spacing_m));
            columns.push(String::new());
            columns.push(if *double_structure { "Yes" } else { "No" }.to_string());
        }
        ItemDetails::Ceiling {
            panel, plenum_m, ..
        } => {
            columns.extend([String::new(), String::new(), String::new()]);
            columns.push(panel.to_string());
            columns.push(String::new());
            columns.push(meters(*plenum_m));
            columns.push(String::new());
        }
    }
    columns
}

/// Rows for one item: options row with totals, then its segments
fn push_item_rows(out: &mut String, summary: &ItemSummary) {
    let common = item_columns(summary);
    let blank_totals = [String::new(), String::new(), String::new()];

    let mut options = common.clone();
    options[2] = format!("Options: {}", summary.label);
    match &summary.details {
        ItemDetails::Wall {
            total_width_m,
            total_area_m2,
            ..
        } => options.extend([meters(*total_width_m), String::new(), meters(*total_area_m2)]),
        ItemDetails::Ceiling {
            perimeter_sum_m,
            total_area_m2,
            ..
        } => options.extend([String::new(), meters(*perimeter_sum_m), meters(*total_area_m2)]),
    }
    push_row(out, &options);

    let segment_details: Vec<String> = match &summary.details {
        ItemDetails::Wall { segments, .. } => segments
            .iter()
            .map(|m| {
                format!(
                    "Seg {}: {:.2}m x {:.2}m",
                    m.number, m.segment.width_m, m.segment.height_m
                )
            })
            .collect(),
        ItemDetails::Ceiling { segments, .. } => segments
            .iter()
            .map(|m| {
                format!(
                    "Seg {}: {:.2}m x {:.2}m",
                    m.number, m.segment.width_m, m.segment.length_m
                )
            })
            .collect(),
    };

    for detail in segment_details {
        let mut row = common.clone();
        row[2] = detail;
        row.extend(blank_totals.iter().cloned());
        push_row(out, &row);
    }
}

/// Render a complete takeoff as CSV.
///
/// # Errors
///
/// * `CalcError::ExportRefused` - the result has no totals or no item summaries
pub fn render_csv(result: &CalculationResult) -> CalcResult<String> {
    ensure_exportable(result, "csv")?;

    let mut out = String::new();
    push_row(&mut out, &["Drywall Material Takeoff"]);
    push_row(
        &mut out,
        &[format!("Calculated: {}", Utc::now().format("%Y-%m-%d"))],
    );
    out.push('\n');

    push_row(&mut out, &["Item Detail"]);
    push_row(&mut out, &ITEM_HEADER);
    for summary in &result.item_summaries {
        push_item_rows(&mut out, summary);
    }
    out.push('\n');

    push_row(&mut out, &["Material Totals (quantities to purchase)"]);
    push_row(&mut out, &["Material", "Quantity", "Unit"]);
    for line in result.materials_total.lines() {
        push_row(
            &mut out,
            &[
                line.material.name(),
                line.quantity.to_string(),
                line.unit.to_string(),
            ],
        );
    }

    tracing::debug!(
        "Rendered CSV export: {} items, {} materials",
        result.item_summaries.len(),
        result.materials_total.len()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PanelType;
    use crate::estimate::calculate;
    use crate::items::{CeilingInput, StructureItem, WallInput};

    fn sample_result() -> CalculationResult {
        let items: Vec<StructureItem> = vec![
            WallInput::new(PanelType::Normal)
                .with_label("North, main")
                .with_segment(3.0, 2.4)
                .with_segment(1.0, 1.0)
                .into(),
            CeilingInput::new(PanelType::Exterior)
                .with_segment(3.0, 4.0)
                .with_plenum(0.5)
                .into(),
        ];
        calculate(&items)
    }

    #[test]
    fn test_refuses_failed_pass() {
        let err = ensure_exportable(&calculate(&[]), "csv").unwrap_err();
        assert_eq!(err.error_code(), "EXPORT_REFUSED");
        assert_eq!(
            err,
            CalcError::export_refused("csv", "Run a valid calculation before exporting.")
        );
    }

    #[test]
    fn test_refuses_default_result() {
        assert!(ensure_exportable(&CalculationResult::default(), "pdf").is_err());
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("Studs"), "Studs");
        assert_eq!(csv_field("North, main"), "\"North, main\"");
        assert_eq!(csv_field("Fine Screws 1\""), "\"Fine Screws 1\"\"\"");
    }

    #[test]
    fn test_csv_layout() {
        let csv = render_csv(&sample_result()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Drywall Material Takeoff");
        assert!(lines.contains(&"Item Detail"));
        assert!(csv.contains(
            "Wall,1,\"Options: North, main\",1,Normal,,,0.40,,No,4.00,,8.20"
        ));
        assert!(csv.contains("Wall,1,Seg 2: 1.00m x 1.00m,1,Normal,,,0.40,,No,,,"));
        assert!(csv.contains("Ceiling,2,Options: Ceiling #2,,,,Exterior,,0.50,,,7.00,12.00"));
        assert!(csv.contains("Material,Quantity,Unit"));
        assert!(csv.contains("\"Fine Screws 1\"\"\",111,pcs"));
        assert!(csv.contains("Mesh Tape,12,m"));
    }

    #[test]
    fn test_totals_block_in_name_order() {
        let result = sample_result();
        let csv = render_csv(&result).unwrap();
        let totals_start = csv.find("Material,Quantity,Unit").unwrap();
        let rows: Vec<&str> = csv[totals_start..].lines().skip(1).collect();
        assert_eq!(rows.len(), result.materials_total.len());
        assert!(rows[0].starts_with("Angle Trim,"));
    }
}
