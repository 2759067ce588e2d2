//! # Item Validator
//!
//! Structural checks on one wall or ceiling. Every problem is collected (the
//! validator never stops at the first one) so the user sees the full list in a
//! single message per item. Segment geometry is checked by the
//! [`segments`](crate::segments) aggregator; this module checks configuration
//! and turns the raw input fields into typed configs the formulas can trust.
//!
//! Only the fields of the item's own kind are validated.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::items::WallInput;
//! use takeoff_core::catalog::PanelType;
//! use takeoff_core::validation::validate_wall_config;
//!
//! let mut wall = WallInput::new(PanelType::Normal).with_segment(3.0, 2.4);
//! wall.faces = 3;
//!
//! let issues = validate_wall_config(&wall).unwrap_err();
//! assert_eq!(issues[0].to_string(), "invalid number of faces 3 (must be 1 or 2)");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::PanelType;
use crate::items::{CeilingInput, WallInput};
use crate::units::Meters;

// ============================================================================
// Issues
// ============================================================================

/// Which panel-type field an issue refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelField {
    Face1,
    Face2,
    Ceiling,
}

impl fmt::Display for PanelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelField::Face1 => write!(f, "face 1"),
            PanelField::Face2 => write!(f, "face 2"),
            PanelField::Ceiling => write!(f, "ceiling"),
        }
    }
}

/// One problem found on an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ValidationIssue {
    NoSegments,
    NoValidSegments,
    InvalidSegment { number: usize },
    InvalidFaces { faces: i32 },
    InvalidPostSpacing { value: f64 },
    UnknownPanelType { field: PanelField, value: String },
    MissingPanelType { field: PanelField },
    InvalidPlenum { value: f64 },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NoSegments => write!(f, "must have at least one segment"),
            ValidationIssue::NoValidSegments => {
                write!(f, "no segment has valid dimensions (> 0)")
            }
            ValidationIssue::InvalidSegment { number } => {
                write!(f, "Segment {}: invalid dimensions", number)
            }
            ValidationIssue::InvalidFaces { faces } => {
                write!(f, "invalid number of faces {} (must be 1 or 2)", faces)
            }
            ValidationIssue::InvalidPostSpacing { value } => {
                write!(f, "invalid post spacing {} (must be > 0)", value)
            }
            ValidationIssue::UnknownPanelType { field, value } => {
                write!(f, "unknown {} panel type '{}'", field, value)
            }
            ValidationIssue::MissingPanelType { field } => {
                write!(f, "missing {} panel type", field)
            }
            ValidationIssue::InvalidPlenum { value } => {
                write!(f, "invalid plenum {} (must be >= 0)", value)
            }
        }
    }
}

/// All issues of one item, displayed as a single user-facing line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemErrors {
    /// 1-based position in the batch
    pub number: usize,
    pub label: String,
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ItemErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.issues.iter().map(|issue| issue.to_string()).collect();
        write!(f, "Error in {}: {}", self.label, joined.join(", "))
    }
}

// ============================================================================
// Typed configurations
// ============================================================================

/// Wall configuration after validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallConfig {
    pub faces: u8,
    pub face1: PanelType,
    /// Present exactly when `faces == 2`
    pub face2: Option<PanelType>,
    pub post_spacing: Meters,
    pub double_structure: bool,
}

impl WallConfig {
    /// Panel types to record, one per sheathed face
    pub fn sheathed_faces(&self) -> impl Iterator<Item = PanelType> {
        std::iter::once(self.face1).chain(self.face2)
    }
}

/// Ceiling configuration after validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CeilingConfig {
    pub panel: PanelType,
    /// Plenum depth (m); zero when not given
    pub plenum: Meters,
}

fn parse_panel(
    field: PanelField,
    raw: Option<&str>,
    issues: &mut Vec<ValidationIssue>,
) -> Option<PanelType> {
    let raw = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => {
            issues.push(ValidationIssue::MissingPanelType { field });
            return None;
        }
    };

    match PanelType::from_str_flexible(raw) {
        Ok(panel_type) => Some(panel_type),
        Err(_) => {
            issues.push(ValidationIssue::UnknownPanelType {
                field,
                value: raw.to_string(),
            });
            None
        }
    }
}

/// Check a wall's configuration fields (segments are checked elsewhere).
pub fn validate_wall_config(wall: &WallInput) -> Result<WallConfig, Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    let faces = match wall.faces {
        1 => Some(1u8),
        2 => Some(2u8),
        other => {
            issues.push(ValidationIssue::InvalidFaces { faces: other });
            None
        }
    };

    let spacing = Meters(wall.post_spacing_m);
    if !spacing.is_positive() {
        issues.push(ValidationIssue::InvalidPostSpacing {
            value: wall.post_spacing_m,
        });
    }

    let face1 = parse_panel(PanelField::Face1, Some(&wall.face1_panel), &mut issues);
    let face2 = if faces == Some(2) {
        parse_panel(PanelField::Face2, wall.face2_panel.as_deref(), &mut issues)
    } else {
        None
    };

    match (faces, face1) {
        (Some(faces), Some(face1)) if issues.is_empty() => Ok(WallConfig {
            faces,
            face1,
            face2,
            post_spacing: spacing,
            double_structure: wall.double_structure,
        }),
        _ => Err(issues),
    }
}

/// Check a ceiling's configuration fields (segments are checked elsewhere).
pub fn validate_ceiling_config(
    ceiling: &CeilingInput,
) -> Result<CeilingConfig, Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    let panel = parse_panel(PanelField::Ceiling, Some(&ceiling.panel), &mut issues);

    let plenum = match ceiling.plenum_m {
        Some(value) if !value.is_finite() || value < 0.0 => {
            issues.push(ValidationIssue::InvalidPlenum { value });
            Meters(0.0)
        }
        Some(value) => Meters(value),
        None => Meters(0.0),
    };

    match panel {
        Some(panel) if issues.is_empty() => Ok(CeilingConfig { panel, plenum }),
        _ => Err(issues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_single_face_wall() {
        let wall = WallInput::new(PanelType::Normal).with_segment(3.0, 2.4);
        let config = validate_wall_config(&wall).unwrap();
        assert_eq!(config.faces, 1);
        assert_eq!(config.face1, PanelType::Normal);
        assert!(config.face2.is_none());
        assert_eq!(config.sheathed_faces().count(), 1);
    }

    #[test]
    fn test_face2_ignored_for_single_face() {
        let mut wall = WallInput::new(PanelType::Normal);
        wall.face2_panel = Some("Glass".to_string());
        let config = validate_wall_config(&wall).unwrap();
        assert!(config.face2.is_none());
    }

    #[test]
    fn test_two_faces_require_face2() {
        let mut wall = WallInput::new(PanelType::Normal);
        wall.faces = 2;
        let issues = validate_wall_config(&wall).unwrap_err();
        assert_eq!(
            issues,
            vec![ValidationIssue::MissingPanelType {
                field: PanelField::Face2
            }]
        );
        assert_eq!(issues[0].to_string(), "missing face 2 panel type");
    }

    #[test]
    fn test_wall_collects_all_issues() {
        let mut wall = WallInput::new(PanelType::Normal);
        wall.faces = 0;
        wall.post_spacing_m = 0.0;
        wall.face1_panel = "Glass".to_string();

        let issues = validate_wall_config(&wall).unwrap_err();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[1].to_string(), "invalid post spacing 0 (must be > 0)");
        assert_eq!(issues[2].to_string(), "unknown face 1 panel type 'Glass'");
    }

    #[test]
    fn test_two_face_wall_config() {
        let wall = WallInput::new(PanelType::Exterior).with_second_face(PanelType::Normal);
        let config = validate_wall_config(&wall).unwrap();
        let faces: Vec<PanelType> = config.sheathed_faces().collect();
        assert_eq!(faces, vec![PanelType::Exterior, PanelType::Normal]);
    }

    #[test]
    fn test_ceiling_plenum_rules() {
        let ceiling = CeilingInput::new(PanelType::Normal);
        assert_eq!(validate_ceiling_config(&ceiling).unwrap().plenum, Meters(0.0));

        let zero = CeilingInput::new(PanelType::Normal).with_plenum(0.0);
        assert!(validate_ceiling_config(&zero).is_ok());

        let negative = CeilingInput::new(PanelType::Normal).with_plenum(-0.1);
        let issues = validate_ceiling_config(&negative).unwrap_err();
        assert_eq!(issues[0].to_string(), "invalid plenum -0.1 (must be >= 0)");
    }

    #[test]
    fn test_ceiling_unknown_panel() {
        let mut ceiling = CeilingInput::new(PanelType::Normal);
        ceiling.panel = "Wood".to_string();
        let issues = validate_ceiling_config(&ceiling).unwrap_err();
        assert_eq!(issues[0].to_string(), "unknown ceiling panel type 'Wood'");
    }

    #[test]
    fn test_item_errors_message() {
        let errors = ItemErrors {
            number: 2,
            label: "Wall #2".to_string(),
            issues: vec![
                ValidationIssue::InvalidSegment { number: 1 },
                ValidationIssue::InvalidFaces { faces: 3 },
            ],
        };
        assert_eq!(
            errors.to_string(),
            "Error in Wall #2: Segment 1: invalid dimensions, invalid number of faces 3 (must be 1 or 2)"
        );
    }
}
