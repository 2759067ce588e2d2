//! # Structure Items
//!
//! Input descriptions of the walls and ceilings to estimate. These mirror
//! what a user enters in an editor, so configuration values are kept raw
//! (panel types as strings, faces as a plain integer) and checked by the
//! [`validation`](crate::validation) module rather than rejected at parse time.
//! A mistyped panel type therefore produces an item error, not a file error.
//!
//! ## JSON Example
//!
//! ```json
//! [
//!   {
//!     "kind": "Wall",
//!     "label": "Corridor",
//!     "faces": 2,
//!     "face1_panel": "Normal",
//!     "face2_panel": "Moisture-Resistant",
//!     "post_spacing_m": 0.40,
//!     "double_structure": false,
//!     "segments": [ { "width_m": 3.0, "height_m": 2.4 } ]
//!   },
//!   {
//!     "kind": "Ceiling",
//!     "panel": "Normal",
//!     "plenum_m": 0.5,
//!     "segments": [ { "width_m": 3.0, "length_m": 4.0 } ]
//!   }
//! ]
//! ```
//!
//! ## Builder Example
//!
//! ```rust
//! use takeoff_core::catalog::PanelType;
//! use takeoff_core::items::{CeilingInput, StructureItem, WallInput};
//!
//! let wall = WallInput::new(PanelType::Normal)
//!     .with_segment(3.0, 2.4)
//!     .with_second_face(PanelType::FireResistant);
//! let ceiling = CeilingInput::new(PanelType::Normal)
//!     .with_segment(3.0, 4.0)
//!     .with_plenum(0.5);
//!
//! let items = vec![StructureItem::Wall(wall), StructureItem::Ceiling(ceiling)];
//! assert_eq!(items[1].display_label(2), "Ceiling #2");
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::PanelType;
use crate::segments::{CeilingSegment, WallSegment};

/// Default stud spacing (m)
pub const DEFAULT_POST_SPACING_M: f64 = 0.40;

fn default_faces() -> i32 {
    1
}

fn default_post_spacing() -> f64 {
    DEFAULT_POST_SPACING_M
}

/// Wall or ceiling to estimate.
///
/// Kind-specific fields live in the variant payloads, so a wall can never be
/// checked against ceiling rules or the other way round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StructureItem {
    /// Framed partition, sheathed on one or two faces
    Wall(WallInput),
    /// Suspended ceiling
    Ceiling(CeilingInput),
}

impl StructureItem {
    /// Get the user-provided label (may be empty)
    pub fn label(&self) -> &str {
        match self {
            StructureItem::Wall(w) => &w.label,
            StructureItem::Ceiling(c) => &c.label,
        }
    }

    /// Get the item kind as a string
    pub fn kind_name(&self) -> &'static str {
        match self {
            StructureItem::Wall(_) => "Wall",
            StructureItem::Ceiling(_) => "Ceiling",
        }
    }

    /// Label shown in summaries and error messages.
    ///
    /// Falls back to `"<Kind> #<number>"` when the user gave no label.
    pub fn display_label(&self, number: usize) -> String {
        let label = self.label().trim();
        if label.is_empty() {
            format!("{} #{}", self.kind_name(), number)
        } else {
            label.to_string()
        }
    }

    /// Number of segments entered (valid or not)
    pub fn segment_count(&self) -> usize {
        match self {
            StructureItem::Wall(w) => w.segments.len(),
            StructureItem::Ceiling(c) => c.segments.len(),
        }
    }
}

/// Wall description as entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallInput {
    /// User label (e.g., "W-1", "Corridor north")
    #[serde(default)]
    pub label: String,

    /// Number of sheathed faces, must be 1 or 2
    #[serde(default = "default_faces")]
    pub faces: i32,

    /// Panel type for face 1; also selects framing gauge and finishing
    pub face1_panel: String,

    /// Panel type for face 2, required when `faces` is 2
    #[serde(default)]
    pub face2_panel: Option<String>,

    /// Stud spacing in meters
    #[serde(default = "default_post_spacing")]
    pub post_spacing_m: f64,

    /// Two independent stud rows (doubles studs and track)
    #[serde(default)]
    pub double_structure: bool,

    #[serde(default)]
    pub segments: Vec<WallSegment>,
}

impl WallInput {
    /// Single-face wall at the default stud spacing, with no segments yet
    pub fn new(face1_panel: PanelType) -> Self {
        WallInput {
            label: String::new(),
            faces: 1,
            face1_panel: face1_panel.display_name().to_string(),
            face2_panel: None,
            post_spacing_m: DEFAULT_POST_SPACING_M,
            double_structure: false,
            segments: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a segment (builder pattern)
    pub fn with_segment(mut self, width_m: f64, height_m: f64) -> Self {
        self.segments.push(WallSegment::new(width_m, height_m));
        self
    }

    /// Sheath the second face
    pub fn with_second_face(mut self, panel: PanelType) -> Self {
        self.faces = 2;
        self.face2_panel = Some(panel.display_name().to_string());
        self
    }

    pub fn with_post_spacing(mut self, spacing_m: f64) -> Self {
        self.post_spacing_m = spacing_m;
        self
    }

    pub fn with_double_structure(mut self) -> Self {
        self.double_structure = true;
        self
    }
}

/// Ceiling description as entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeilingInput {
    /// User label (e.g., "C-1", "Lobby")
    #[serde(default)]
    pub label: String,

    /// Panel type for the ceiling boards
    pub panel: String,

    /// Depth of the plenum (m); `None` when hanger drops are not estimated
    #[serde(default)]
    pub plenum_m: Option<f64>,

    #[serde(default)]
    pub segments: Vec<CeilingSegment>,
}

impl CeilingInput {
    /// Ceiling without plenum and with no segments yet
    pub fn new(panel: PanelType) -> Self {
        CeilingInput {
            label: String::new(),
            panel: panel.display_name().to_string(),
            plenum_m: None,
            segments: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a segment (builder pattern)
    pub fn with_segment(mut self, width_m: f64, length_m: f64) -> Self {
        self.segments.push(CeilingSegment::new(width_m, length_m));
        self
    }

    pub fn with_plenum(mut self, plenum_m: f64) -> Self {
        self.plenum_m = Some(plenum_m);
        self
    }
}

impl From<WallInput> for StructureItem {
    fn from(wall: WallInput) -> Self {
        StructureItem::Wall(wall)
    }
}

impl From<CeilingInput> for StructureItem {
    fn from(ceiling: CeilingInput) -> Self {
        StructureItem::Ceiling(ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_json_defaults() {
        let json = r#"{
            "kind": "Wall",
            "face1_panel": "Normal",
            "segments": [ { "width_m": 3.0, "height_m": 2.4 } ]
        }"#;
        let item: StructureItem = serde_json::from_str(json).unwrap();
        match item {
            StructureItem::Wall(wall) => {
                assert_eq!(wall.faces, 1);
                assert_eq!(wall.post_spacing_m, DEFAULT_POST_SPACING_M);
                assert!(!wall.double_structure);
                assert!(wall.face2_panel.is_none());
                assert_eq!(wall.segments.len(), 1);
            }
            StructureItem::Ceiling(_) => panic!("expected a wall"),
        }
    }

    #[test]
    fn test_ceiling_json() {
        let json = r#"{
            "kind": "Ceiling",
            "label": "Lobby",
            "panel": "Exterior",
            "plenum_m": 0.6,
            "segments": [ { "width_m": 3.0, "length_m": 4.0 } ]
        }"#;
        let item: StructureItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind_name(), "Ceiling");
        assert_eq!(item.display_label(4), "Lobby");
        assert_eq!(item.segment_count(), 1);
    }

    #[test]
    fn test_unknown_panel_string_still_parses() {
        let json = r#"{ "kind": "Ceiling", "panel": "Glass" }"#;
        let item: StructureItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.segment_count(), 0);
    }

    #[test]
    fn test_display_label_fallback() {
        let wall: StructureItem = WallInput::new(PanelType::Normal).into();
        assert_eq!(wall.display_label(3), "Wall #3");

        let labelled: StructureItem = WallInput::new(PanelType::Normal).with_label("  W-7 ").into();
        assert_eq!(labelled.display_label(3), "W-7");
    }

    #[test]
    fn test_builder_roundtrip() {
        let item: StructureItem = WallInput::new(PanelType::Exterior)
            .with_segment(2.0, 2.4)
            .with_second_face(PanelType::Normal)
            .with_post_spacing(0.61)
            .with_double_structure()
            .into();
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"kind\":\"Wall\""));
        let roundtrip: StructureItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, roundtrip);
    }
}
