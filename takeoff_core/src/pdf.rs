//! # PDF Generation Module
//!
//! Renders a takeoff to PDF using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected by placeholder substitution before compilation
//! - User text enters the markup as Typst string literals
//! - Fonts come from `typst-assets`, so no system fonts are needed
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use takeoff_core::catalog::PanelType;
//! use takeoff_core::items::WallInput;
//! use takeoff_core::pdf::render_takeoff_pdf;
//! use takeoff_core::project::Project;
//!
//! let mut project = Project::new("Jane Estimator", "25-001", "ACME Corp");
//! project.add_item(WallInput::new(PanelType::Normal).with_segment(3.0, 2.4).into());
//!
//! let result = project.calculate()?;
//! let pdf_bytes = render_takeoff_pdf(&project.meta, &result)?;
//! std::fs::write("takeoff.pdf", pdf_bytes).unwrap();
//! # Ok::<(), takeoff_core::errors::CalcError>(())
//! ```

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{CalcError, CalcResult};
use crate::estimate::{CalculationResult, ItemDetails, ItemSummary};
use crate::export::ensure_exportable;
use crate::project::ProjectMetadata;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Template
// ============================================================================

const TAKEOFF_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Drywall Material Takeoff]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Job: {{JOB_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "New Computer Modern", size: 10pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Material Takeoff]
    #v(4pt)
    #text(size: 12pt)[{{CLIENT}}]
  ]
]

#v(12pt)

#table(
  columns: (auto, 1fr),
  stroke: none,
  row-gutter: 4pt,
  [Estimator:], [{{ESTIMATOR}}],
  [Job ID:], [{{JOB_ID}}],
  [Client:], [{{CLIENT}}],
  [Date:], [{{DATE}}],
)

#v(12pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

== Items

{{ITEMS}}

#v(12pt)

== Materials to Purchase

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Material*], [*Quantity*], [*Unit*]),
{{MATERIAL_ROWS}}
)

#v(24pt)
#text(size: 9pt, fill: gray)[
  Quantities are rounded up to whole purchase units. Boards are pooled across items by panel type.
]
"##;

/// Embed user-provided text as a Typst string literal (`#"..."`).
///
/// The text enters the document as data, so `//`, `/*`, `=` or `*` are
/// printed verbatim instead of being parsed as markup.
fn typst_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 3);
    out.push_str("#\"");
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Replace `{{KEY}}` placeholders in a single pass. Inserted values are
/// not rescanned; unknown keys are left as they are.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let found = after.find("}}").and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (end, *value))
        });
        match found {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// One block per item: heading line, configuration, segment table
fn build_item_block(summary: &ItemSummary) -> String {
    let (kind, config, segment_rows, totals) = match &summary.details {
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
            let panels = match face2_panel {
                Some(face2) => format!("{} / {}", face1_panel, face2),
                None => face1_panel.to_string(),
            };
            let config = format!(
                "Faces: {} #h(1em) Panels: {} #h(1em) Post spacing: {:.2} m #h(1em) Double structure: {}",
                faces,
                typst_text(&panels),
                post_spacing_m,
                if *double_structure { "yes" } else { "no" }
            );
            let rows: Vec<String> = segments
                .iter()
                .map(|m| {
                    format!(
                        "  [{}], [{:.2}], [{:.2}], [{:.2}],",
                        m.number, m.segment.width_m, m.segment.height_m, m.area_m2
                    )
                })
                .collect();
            let totals = format!(
                "Total width: {:.2} m #h(1em) Total area: {:.2} m#super[2]",
                total_width_m, total_area_m2
            );
            ("Wall", config, rows, totals)
        }
        ItemDetails::Ceiling {
            panel,
            plenum_m,
            total_area_m2,
            perimeter_sum_m,
            segments,
        } => {
            let config = format!(
                "Panel: {} #h(1em) Plenum: {:.2} m",
                typst_text(panel.display_name()),
                plenum_m
            );
            let rows: Vec<String> = segments
                .iter()
                .map(|m| {
                    format!(
                        "  [{}], [{:.2}], [{:.2}], [{:.2}],",
                        m.number, m.segment.width_m, m.segment.length_m, m.area_m2
                    )
                })
                .collect();
            let totals = format!(
                "Total area: {:.2} m#super[2] #h(1em) Perimeter sum: {:.2} m",
                total_area_m2, perimeter_sum_m
            );
            ("Ceiling", config, rows, totals)
        }
    };

    let second_header = if kind == "Wall" { "Height (m)" } else { "Length (m)" };
    format!(
        r##"
=== Item {number}: {label} ({kind})

{config}

#table(
  columns: (auto, 1fr, 1fr, 1fr),
  inset: 5pt,
  stroke: 0.5pt,
  align: (center, right, right, right),
  table.header([*Seg.*], [*Width (m)*], [*{second_header}*], [*Area (m#super[2])*]),
{rows}
)

{totals}
"##,
        number = summary.number,
        label = typst_text(&summary.label),
        kind = kind,
        config = config,
        second_header = second_header,
        rows = segment_rows.join("\n"),
        totals = totals,
    )
}

fn build_material_rows(result: &CalculationResult) -> String {
    result
        .materials_total
        .lines()
        .iter()
        .map(|line| {
            format!(
                "  [{}], [{}], [{}],",
                typst_text(&line.material.name()),
                line.quantity,
                line.unit
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a takeoff to PDF.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError::ExportRefused)` - the result is not a complete takeoff
/// * `Err(CalcError::Internal)` - Typst compilation or PDF rendering failed
pub fn render_takeoff_pdf(meta: &ProjectMetadata, result: &CalculationResult) -> CalcResult<Vec<u8>> {
    ensure_exportable(result, "pdf")?;

    let items: String = result.item_summaries.iter().map(build_item_block).collect();
    let job_id = typst_text(&meta.job_id);
    let client = typst_text(&meta.client);
    let estimator = typst_text(&meta.estimator);
    let date = Utc::now().format("%Y-%m-%d").to_string();
    let material_rows = build_material_rows(result);
    let source = fill_template(
        TAKEOFF_TEMPLATE,
        &[
            ("JOB_ID", job_id.as_str()),
            ("CLIENT", client.as_str()),
            ("ESTIMATOR", estimator.as_str()),
            ("DATE", date.as_str()),
            ("ITEMS", items.as_str()),
            ("MATERIAL_ROWS", material_rows.as_str()),
        ],
    );

    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })?;

    tracing::debug!("Rendered takeoff PDF ({} bytes)", pdf_bytes.len());
    Ok(pdf_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PanelType;
    use crate::items::{CeilingInput, WallInput};
    use crate::project::Project;

    #[test]
    fn test_typst_text_is_string_literal() {
        assert_eq!(typst_text("W-1 #2"), "#\"W-1 #2\"");
        assert_eq!(typst_text("ACME // north"), "#\"ACME // north\"");
        assert_eq!(typst_text("Fine Screws 1\""), "#\"Fine Screws 1\\\"\"");
        assert_eq!(typst_text("a\\b\nc"), "#\"a\\\\b\\nc\"");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let filled = fill_template(
            "{{CLIENT}} | {{DATE}} | {{OTHER}}",
            &[("CLIENT", "Acme {{DATE}}"), ("DATE", "2025-01-01")],
        );
        assert_eq!(filled, "Acme {{DATE}} | 2025-01-01 | {{OTHER}}");
    }

    #[test]
    fn test_material_rows_escape_names() {
        let mut project = Project::default();
        project.add_item(WallInput::new(PanelType::Normal).with_segment(3.0, 2.4).into());
        let result = project.calculate().unwrap();

        let rows = build_material_rows(&result);
        assert!(rows.contains("[#\"Fine Screws 1\\\"\"], [97], [pcs],"));
        assert!(rows.contains("[#\"Panel:Normal\"], [3], [pcs],"));
    }

    #[test]
    fn test_refuses_failed_pass() {
        let project = Project::default();
        let result = project.calculate().unwrap();
        let err = render_takeoff_pdf(&project.meta, &result).unwrap_err();
        assert_eq!(err.error_code(), "EXPORT_REFUSED");
    }

    #[test]
    fn test_pdf_generation() {
        let mut project = Project::new("Test Estimator", "TEST-001", "Client #1 <Main>");
        project.add_item(
            WallInput::new(PanelType::Normal)
                .with_label("W_1 *north*")
                .with_segment(3.0, 2.4)
                .with_second_face(PanelType::FireResistant)
                .into(),
        );
        project.add_item(
            CeilingInput::new(PanelType::Exterior)
                .with_segment(3.0, 4.0)
                .with_plenum(0.5)
                .into(),
        );
        let result = project.calculate().unwrap();

        let pdf = render_takeoff_pdf(&project.meta, &result);
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }

    #[test]
    fn test_pdf_with_comment_markers_in_user_text() {
        let mut project = Project::new("Estimator {{ITEMS}}", "J-1 /* x", "ACME // north site");
        project.add_item(
            WallInput::new(PanelType::Normal)
                .with_label("W1 /* lobby")
                .with_segment(3.0, 2.4)
                .into(),
        );
        project.add_item(
            CeilingInput::new(PanelType::Normal)
                .with_label("= C-1 \\ {{DATE}} $x$ \"quoted\"")
                .with_segment(2.0, 2.0)
                .into(),
        );
        let result = project.calculate().unwrap();

        let pdf = render_takeoff_pdf(&project.meta, &result);
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());
        assert!(pdf.unwrap().starts_with(b"%PDF"));
    }
}
