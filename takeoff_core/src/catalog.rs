//! # Unit & Catalog Tables
//!
//! Static reference data shared by the engine and by every renderer:
//!
//! - [`PanelType`] - the board types an item may be sheathed with
//! - [`FinishingSet`] - which finishing materials (and screw family) a panel type takes
//! - [`Material`] - every purchasable material, as a structured record
//! - [`Unit`] - the unit each material is bought in
//!
//! Materials are identified by a [`MaterialKind`] plus an optional panel
//! variant, never by matching on name strings. The name is only a display and
//! serialization key.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::catalog::{Material, MaterialKind, PanelType, Unit};
//!
//! let board = Material::panel(PanelType::Exterior);
//! assert_eq!(board.name(), "Panel:Exterior");
//! assert_eq!(board.unit(), Unit::Each);
//!
//! let compound = Material::of(MaterialKind::JointCompound);
//! assert_eq!(compound.unit(), Unit::Box);
//! assert_eq!(Material::from_name("Joint Compound").unwrap(), compound);
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Panel Types
// ============================================================================

/// Board types available for walls and ceilings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PanelType {
    /// Standard gypsum board
    #[serde(rename = "Normal")]
    Normal,
    /// Moisture-resistant gypsum board
    #[serde(rename = "Moisture-Resistant")]
    MoistureResistant,
    /// Fire-rated gypsum board
    #[serde(rename = "Fire-Resistant")]
    FireResistant,
    /// Abuse/impact-resistant gypsum board
    #[serde(rename = "High-Resistance")]
    HighResistance,
    /// Cement board for exterior and wet areas
    #[serde(rename = "Exterior")]
    Exterior,
}

impl PanelType {
    /// All panel types, in catalog order
    pub const ALL: [PanelType; 5] = [
        PanelType::Normal,
        PanelType::MoistureResistant,
        PanelType::FireResistant,
        PanelType::HighResistance,
        PanelType::Exterior,
    ];

    /// Get display name (also the serialized form)
    pub fn display_name(&self) -> &'static str {
        match self {
            PanelType::Normal => "Normal",
            PanelType::MoistureResistant => "Moisture-Resistant",
            PanelType::FireResistant => "Fire-Resistant",
            PanelType::HighResistance => "High-Resistance",
            PanelType::Exterior => "Exterior",
        }
    }

    /// Parse from common string representations.
    ///
    /// Case, spaces and underscores are ignored, so `"fire resistant"` and
    /// `"FIRE_RESISTANT"` both resolve to [`PanelType::FireResistant`].
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_uppercase().replace([' ', '_'], "-").as_str() {
            "NORMAL" | "STANDARD" => Ok(PanelType::Normal),
            "MOISTURE-RESISTANT" | "MR" => Ok(PanelType::MoistureResistant),
            "FIRE-RESISTANT" | "FR" => Ok(PanelType::FireResistant),
            "HIGH-RESISTANCE" | "HR" => Ok(PanelType::HighResistance),
            "EXTERIOR" | "CEMENT-BOARD" => Ok(PanelType::Exterior),
            _ => Err(CalcError::invalid_input(
                "panel_type",
                s,
                "Unknown panel type",
            )),
        }
    }

    /// Finishing materials applied over this board's seams
    pub fn finishing(&self) -> FinishingSet {
        match self {
            PanelType::Exterior => FinishingSet::CementBoard,
            _ => FinishingSet::JointCompound,
        }
    }

    /// Cement board hangs on heavy-gauge framing
    pub fn uses_heavy_gauge_framing(&self) -> bool {
        matches!(self, PanelType::Exterior)
    }
}

impl fmt::Display for PanelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Finishing family selected by a panel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishingSet {
    /// Joint compound, paper tape, sandpaper; fine-thread screws
    JointCompound,
    /// Basecoat and mesh tape; coarse-thread (self-drilling) screws
    CementBoard,
}

impl FinishingSet {
    /// Screw used to attach boards of this family (1")
    pub fn board_screw(&self) -> Material {
        match self {
            FinishingSet::JointCompound => Material::of(MaterialKind::FineScrew1In),
            FinishingSet::CementBoard => Material::of(MaterialKind::CoarseScrew1In),
        }
    }

    /// Screw used for framing connections (1/2")
    pub fn framing_screw(&self) -> Material {
        match self {
            FinishingSet::JointCompound => Material::of(MaterialKind::FineScrewHalfIn),
            FinishingSet::CementBoard => Material::of(MaterialKind::CoarseScrewHalfIn),
        }
    }
}

// ============================================================================
// Units
// ============================================================================

/// Unit a material is purchased in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Individual pieces
    Each,
    /// Boxes (joint compound)
    Box,
    /// Linear meters (tape)
    Meter,
    /// Sheets (sandpaper)
    Sheet,
    /// Bags (basecoat)
    Bag,
}

impl Unit {
    /// Short label for tables
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Unit::Each => "pcs",
            Unit::Box => "box",
            Unit::Meter => "m",
            Unit::Sheet => "sheet",
            Unit::Bag => "bag",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

// ============================================================================
// Materials
// ============================================================================

/// Every kind of material the estimator can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Boards (one material per [`PanelType`])
    Panel,
    Studs,
    HeavyGaugeStuds,
    Track,
    HeavyGaugeTrack,
    JointCompound,
    PaperTape,
    Sandpaper,
    Basecoat,
    MeshTape,
    FineScrew1In,
    FineScrewHalfIn,
    CoarseScrew1In,
    CoarseScrewHalfIn,
    WasherNails,
    PowderCaps,
    FurringChannel,
    CarryingChannel,
    AngleTrim,
    HangerClips,
    /// Furring channel stock cut into hanger drops
    HangerStock,
}

impl MaterialKind {
    /// Every kind except [`MaterialKind::Panel`], which needs a variant
    pub const NON_PANEL: [MaterialKind; 20] = [
        MaterialKind::Studs,
        MaterialKind::HeavyGaugeStuds,
        MaterialKind::Track,
        MaterialKind::HeavyGaugeTrack,
        MaterialKind::JointCompound,
        MaterialKind::PaperTape,
        MaterialKind::Sandpaper,
        MaterialKind::Basecoat,
        MaterialKind::MeshTape,
        MaterialKind::FineScrew1In,
        MaterialKind::FineScrewHalfIn,
        MaterialKind::CoarseScrew1In,
        MaterialKind::CoarseScrewHalfIn,
        MaterialKind::WasherNails,
        MaterialKind::PowderCaps,
        MaterialKind::FurringChannel,
        MaterialKind::CarryingChannel,
        MaterialKind::AngleTrim,
        MaterialKind::HangerClips,
        MaterialKind::HangerStock,
    ];

    /// Base display name
    pub fn base_name(&self) -> &'static str {
        match self {
            MaterialKind::Panel => "Panel",
            MaterialKind::Studs => "Studs",
            MaterialKind::HeavyGaugeStuds => "Heavy-Gauge Studs",
            MaterialKind::Track => "Track",
            MaterialKind::HeavyGaugeTrack => "Heavy-Gauge Track",
            MaterialKind::JointCompound => "Joint Compound",
            MaterialKind::PaperTape => "Paper Tape",
            MaterialKind::Sandpaper => "Sandpaper (120 grit)",
            MaterialKind::Basecoat => "Basecoat",
            MaterialKind::MeshTape => "Mesh Tape",
            MaterialKind::FineScrew1In => "Fine Screws 1\"",
            MaterialKind::FineScrewHalfIn => "Fine Screws 1/2\"",
            MaterialKind::CoarseScrew1In => "Coarse Screws 1\"",
            MaterialKind::CoarseScrewHalfIn => "Coarse Screws 1/2\"",
            MaterialKind::WasherNails => "Nails with Washer",
            MaterialKind::PowderCaps => "Powder-Actuated Caps",
            MaterialKind::FurringChannel => "Furring Channel",
            MaterialKind::CarryingChannel => "Carrying Channel",
            MaterialKind::AngleTrim => "Angle Trim",
            MaterialKind::HangerClips => "Hanger Clips",
            MaterialKind::HangerStock => "Furring Channel (hangers)",
        }
    }

    /// Purchase unit
    pub fn unit(&self) -> Unit {
        match self {
            MaterialKind::JointCompound => Unit::Box,
            MaterialKind::PaperTape | MaterialKind::MeshTape => Unit::Meter,
            MaterialKind::Sandpaper => Unit::Sheet,
            MaterialKind::Basecoat => Unit::Bag,
            _ => Unit::Each,
        }
    }
}

/// A purchasable material: a kind plus, for boards, the panel variant.
///
/// Ordering follows [`Material::name`] so maps keyed by `Material` iterate in
/// lexicographic name order. Serializes as its name string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Material {
    kind: MaterialKind,
    panel: Option<PanelType>,
}

impl Material {
    /// Board material for a panel type
    pub fn panel(panel_type: PanelType) -> Self {
        Material {
            kind: MaterialKind::Panel,
            panel: Some(panel_type),
        }
    }

    /// Non-board material.
    ///
    /// Passing [`MaterialKind::Panel`] yields the Normal board; use
    /// [`Material::panel`] to pick a variant.
    pub fn of(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Panel => Material::panel(PanelType::Normal),
            _ => Material { kind, panel: None },
        }
    }

    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    /// Panel variant (only for boards)
    pub fn panel_type(&self) -> Option<PanelType> {
        self.panel
    }

    pub fn is_panel(&self) -> bool {
        self.kind == MaterialKind::Panel
    }

    /// Display and serialization key, e.g. `"Studs"` or `"Panel:Normal"`
    pub fn name(&self) -> String {
        match self.panel {
            Some(panel_type) => format!("{}:{}", self.kind.base_name(), panel_type.display_name()),
            None => self.kind.base_name().to_string(),
        }
    }

    pub fn unit(&self) -> Unit {
        self.kind.unit()
    }

    /// Every material in the catalog (boards first, in panel catalog order)
    pub fn catalog() -> impl Iterator<Item = Material> {
        PanelType::ALL
            .into_iter()
            .map(Material::panel)
            .chain(MaterialKind::NON_PANEL.into_iter().map(Material::of))
    }

    /// Look a material up by its name
    pub fn from_name(name: &str) -> CalcResult<Self> {
        Material::catalog()
            .find(|m| m.name() == name)
            .ok_or_else(|| CalcError::material_not_found(name))
    }
}

impl Ord for Material {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(&other.name())
    }
}

impl PartialOrd for Material {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<Material> for String {
    fn from(material: Material) -> Self {
        material.name()
    }
}

impl TryFrom<String> for Material {
    type Error = CalcError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Material::from_name(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_type_parsing() {
        assert_eq!(PanelType::from_str_flexible("Normal").unwrap(), PanelType::Normal);
        assert_eq!(
            PanelType::from_str_flexible("fire resistant").unwrap(),
            PanelType::FireResistant
        );
        assert_eq!(
            PanelType::from_str_flexible("MOISTURE_RESISTANT").unwrap(),
            PanelType::MoistureResistant
        );
        assert!(PanelType::from_str_flexible("Glass").is_err());
        assert!(PanelType::from_str_flexible("").is_err());
    }

    #[test]
    fn test_panel_type_serialization() {
        let json = serde_json::to_string(&PanelType::HighResistance).unwrap();
        assert_eq!(json, "\"High-Resistance\"");
        let parsed: PanelType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PanelType::HighResistance);
    }

    #[test]
    fn test_finishing_sets() {
        for panel_type in PanelType::ALL {
            let expected = if panel_type == PanelType::Exterior {
                FinishingSet::CementBoard
            } else {
                FinishingSet::JointCompound
            };
            assert_eq!(panel_type.finishing(), expected);
        }
        assert_eq!(
            FinishingSet::CementBoard.framing_screw(),
            Material::of(MaterialKind::CoarseScrewHalfIn)
        );
        assert_eq!(
            FinishingSet::JointCompound.board_screw(),
            Material::of(MaterialKind::FineScrew1In)
        );
    }

    #[test]
    fn test_material_units() {
        assert_eq!(Material::of(MaterialKind::JointCompound).unit(), Unit::Box);
        assert_eq!(Material::of(MaterialKind::PaperTape).unit(), Unit::Meter);
        assert_eq!(Material::of(MaterialKind::MeshTape).unit(), Unit::Meter);
        assert_eq!(Material::of(MaterialKind::Sandpaper).unit(), Unit::Sheet);
        assert_eq!(Material::of(MaterialKind::Basecoat).unit(), Unit::Bag);
        assert_eq!(Material::of(MaterialKind::Studs).unit(), Unit::Each);
        assert_eq!(Material::panel(PanelType::FireResistant).unit(), Unit::Each);
    }

    #[test]
    fn test_catalog_names_unique_and_resolvable() {
        let materials: Vec<Material> = Material::catalog().collect();
        assert_eq!(materials.len(), PanelType::ALL.len() + MaterialKind::NON_PANEL.len());

        let mut names: Vec<String> = materials.iter().map(|m| m.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), materials.len());

        for material in materials {
            assert_eq!(Material::from_name(&material.name()).unwrap(), material);
        }
    }

    #[test]
    fn test_unknown_material_name() {
        let err = Material::from_name("Panel:Glass").unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_material_ordering_by_name() {
        let mut materials = vec![
            Material::of(MaterialKind::Track),
            Material::panel(PanelType::Normal),
            Material::of(MaterialKind::AngleTrim),
        ];
        materials.sort();
        let names: Vec<String> = materials.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Angle Trim", "Panel:Normal", "Track"]);
    }

    #[test]
    fn test_material_serializes_as_name() {
        let material = Material::of(MaterialKind::FineScrewHalfIn);
        let json = serde_json::to_string(&material).unwrap();
        assert_eq!(json, "\"Fine Screws 1/2\\\"\"");
        let parsed: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, material);
    }

    #[test]
    fn test_of_panel_kind_defaults_to_normal() {
        assert_eq!(Material::of(MaterialKind::Panel), Material::panel(PanelType::Normal));
    }

    #[test]
    fn test_panel_materials_carry_their_variant() {
        let board = Material::panel(PanelType::Exterior);
        assert!(board.is_panel());
        assert_eq!(board.kind(), MaterialKind::Panel);
        assert_eq!(board.panel_type(), Some(PanelType::Exterior));

        let studs = Material::of(MaterialKind::Studs);
        assert!(!studs.is_panel());
        assert_eq!(studs.kind(), MaterialKind::Studs);
        assert_eq!(studs.panel_type(), None);

        let boards = Material::catalog().filter(Material::is_panel).count();
        assert_eq!(boards, PanelType::ALL.len());
    }
}
