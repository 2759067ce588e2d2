//! # Derived Quantity Calculator
//!
//! Converts one item's aggregated dimensions into purchasable quantities of
//! everything except boards (boards go through the
//! [`PanelAccumulator`](crate::panels::PanelAccumulator)).
//!
//! Each item is computed in two stages:
//!
//! 1. Framing and finishing as raw floats.
//! 2. A fastener pass driven by the item's framing counts *rounded up*, since
//!    nails and screws go into whole pieces of stock.
//!
//! The finished [`QuantitySheet`] is then rounded up per material, once, and
//! only those rounded values are summed across items.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::catalog::{Material, MaterialKind, PanelType};
//! use takeoff_core::items::WallInput;
//! use takeoff_core::quantities::wall_quantities;
//! use takeoff_core::segments::aggregate;
//! use takeoff_core::settings::EstimatorSettings;
//! use takeoff_core::validation::validate_wall_config;
//!
//! let wall = WallInput::new(PanelType::Normal).with_segment(3.0, 2.4);
//! let config = validate_wall_config(&wall).unwrap();
//! let totals = aggregate(&wall.segments);
//!
//! let sheet = wall_quantities(&config, totals.total_width, totals.total_area, &EstimatorSettings::default());
//! let rounded = sheet.rounded();
//! assert_eq!(rounded.get(Material::of(MaterialKind::Studs)), 8);
//! assert_eq!(rounded.get(Material::of(MaterialKind::FineScrew1In)), 97);
//! ```

use std::collections::BTreeMap;

use crate::catalog::{FinishingSet, Material, MaterialKind};
use crate::settings::EstimatorSettings;
use crate::totals::MaterialsTotal;
use crate::units::{Meters, SquareMeters};
use crate::validation::{CeilingConfig, WallConfig};

/// Unrounded quantities for one item
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuantitySheet(BTreeMap<Material, f64>);

impl QuantitySheet {
    pub fn new() -> Self {
        QuantitySheet(BTreeMap::new())
    }

    /// Add to a material's raw quantity
    pub fn add(&mut self, material: Material, quantity: f64) {
        *self.0.entry(material).or_insert(0.0) += quantity;
    }

    /// Raw quantity (zero when absent)
    pub fn get(&self, material: Material) -> f64 {
        self.0.get(&material).copied().unwrap_or(0.0)
    }

    /// Round every quantity up; non-positive and non-finite values are dropped
    pub fn rounded(&self) -> MaterialsTotal {
        self.0
            .iter()
            .filter(|(_, quantity)| quantity.is_finite() && **quantity > 0.0)
            .map(|(material, quantity)| (*material, quantity.ceil() as u64))
            .collect()
    }
}

// ============================================================================
// Finishing
// ============================================================================

/// Seam treatment for `area` of board.
///
/// Compound finishing adds compound, paper tape and sandpaper; cement-board
/// finishing adds basecoat and mesh tape. Board screws are not included.
fn add_finishing(
    sheet: &mut QuantitySheet,
    finishing: FinishingSet,
    area: SquareMeters,
    settings: &EstimatorSettings,
) {
    let a = area.value();
    match finishing {
        FinishingSet::JointCompound => {
            sheet.add(
                Material::of(MaterialKind::JointCompound),
                a / settings.compound_coverage_m2,
            );
            sheet.add(Material::of(MaterialKind::PaperTape), a * settings.tape_m_per_m2);
            sheet.add(
                Material::of(MaterialKind::Sandpaper),
                boards_for(area, settings) / settings.panels_per_sandpaper_sheet,
            );
        }
        FinishingSet::CementBoard => {
            sheet.add(
                Material::of(MaterialKind::Basecoat),
                a / settings.basecoat_coverage_m2,
            );
            sheet.add(Material::of(MaterialKind::MeshTape), a * settings.tape_m_per_m2);
        }
    }
}

/// Unrounded board equivalent of an area
fn boards_for(area: SquareMeters, settings: &EstimatorSettings) -> f64 {
    area.value() / settings.panel_coverage_m2
}

// ============================================================================
// Walls
// ============================================================================

/// Stud count along a run: two for a run shorter than one bay, else one per
/// bay plus the closing stud.
pub fn stud_count(total_width: Meters, post_spacing: Meters) -> f64 {
    if total_width < post_spacing {
        2.0
    } else {
        (total_width.value() / post_spacing.value()).floor() + 1.0
    }
}

/// Non-board quantities for a validated wall.
///
/// Framing gauge and finishing follow the face-1 panel type. The second face
/// only adds boards, so nothing here depends on `config.faces`.
pub fn wall_quantities(
    config: &WallConfig,
    total_width: Meters,
    total_area: SquareMeters,
    settings: &EstimatorSettings,
) -> QuantitySheet {
    let mut sheet = QuantitySheet::new();
    let structure_factor = if config.double_structure { 2.0 } else { 1.0 };
    let heavy = config.face1.uses_heavy_gauge_framing();
    let finishing = config.face1.finishing();

    let (stud_kind, track_kind) = if heavy {
        (MaterialKind::HeavyGaugeStuds, MaterialKind::HeavyGaugeTrack)
    } else {
        (MaterialKind::Studs, MaterialKind::Track)
    };

    let studs = stud_count(total_width, config.post_spacing) * structure_factor;
    let track = (total_width.value() * 2.0) / settings.track_length_m * structure_factor;
    sheet.add(Material::of(stud_kind), studs);
    sheet.add(Material::of(track_kind), track);

    add_finishing(&mut sheet, finishing, total_area, settings);
    sheet.add(
        finishing.board_screw(),
        boards_for(total_area, settings) * settings.screws_per_panel,
    );

    if total_width.value() > 0.0 {
        let rounded_studs = studs.ceil();
        let rounded_track = track.ceil();
        let nails = rounded_track * settings.nails_per_track;
        sheet.add(Material::of(MaterialKind::WasherNails), nails);
        sheet.add(Material::of(MaterialKind::PowderCaps), nails);
        sheet.add(
            finishing.framing_screw(),
            rounded_studs * settings.screws_per_stud,
        );
    }

    sheet
}

// ============================================================================
// Ceilings
// ============================================================================

/// Non-board quantities for a validated ceiling.
///
/// `perimeter_sum` is Σ(width + length) over the segments, used for angle trim.
pub fn ceiling_quantities(
    config: &CeilingConfig,
    total_area: SquareMeters,
    perimeter_sum: Meters,
    settings: &EstimatorSettings,
) -> QuantitySheet {
    let mut sheet = QuantitySheet::new();
    let a = total_area.value();

    let furring = (a / settings.furring_spacing_m) / settings.channel_length_m;
    let carrying = (a / settings.carrying_spacing_m) / settings.channel_length_m;
    let angle = perimeter_sum.value() / settings.angle_length_m;
    let clips = carrying * settings.clips_per_carrying_channel;

    sheet.add(Material::of(MaterialKind::FurringChannel), furring);
    sheet.add(Material::of(MaterialKind::CarryingChannel), carrying);
    sheet.add(Material::of(MaterialKind::AngleTrim), angle);
    sheet.add(Material::of(MaterialKind::HangerClips), clips);

    let rounded_clips = clips.ceil();
    let plenum = config.plenum.value();
    if plenum > 0.0 && rounded_clips > 0.0 {
        sheet.add(
            Material::of(MaterialKind::HangerStock),
            rounded_clips * plenum / settings.channel_length_m,
        );
    }

    // Ceiling boards go up on self-drilling screws whatever the board type
    sheet.add(
        Material::of(MaterialKind::CoarseScrew1In),
        boards_for(total_area, settings) * settings.screws_per_panel,
    );

    add_finishing(&mut sheet, config.panel.finishing(), total_area, settings);

    if a > 0.0 || perimeter_sum.value() > 0.0 {
        let nails = angle.ceil() * settings.nails_per_angle
            + carrying.ceil() * settings.nails_per_carrying_channel;
        sheet.add(Material::of(MaterialKind::WasherNails), nails);
        sheet.add(Material::of(MaterialKind::PowderCaps), nails);
        sheet.add(
            Material::of(MaterialKind::FineScrewHalfIn),
            furring.ceil() * settings.screws_per_furring_channel
                + rounded_clips * settings.screws_per_clip,
        );
    }

    sheet
}
