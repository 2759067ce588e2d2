//! # Panel Accumulator
//!
//! Boards are counted across the whole batch, per panel type, with two
//! rounding policies:
//!
//! - **Small segments** (`area < small_area_threshold_m2`) add their exact
//!   fraction of a board to a shared pool. Offcuts from one small piece can
//!   cover another, so the pool is rounded once at the end.
//! - **Large segments** (`area >= small_area_threshold_m2`) are rounded up on
//!   their own and added to an integer sum.
//!
//! The final count for a type is `ceil(fractional pool) + rounded sum`.
//! Boards are never rounded per item, and both faces of a wall feed the same
//! accumulator.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::catalog::PanelType;
//! use takeoff_core::panels::PanelAccumulator;
//! use takeoff_core::settings::EstimatorSettings;
//! use takeoff_core::units::SquareMeters;
//!
//! let mut panels = PanelAccumulator::new(&EstimatorSettings::default());
//! panels.record(PanelType::Normal, SquareMeters(1.0));
//! panels.record(PanelType::Normal, SquareMeters(0.4));
//! panels.record(PanelType::Normal, SquareMeters(0.2));
//! assert_eq!(panels.finalize(PanelType::Normal), 1);
//!
//! panels.record(PanelType::Normal, SquareMeters(3.0));
//! assert_eq!(panels.finalize(PanelType::Normal), 3);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Material, PanelType};
use crate::settings::EstimatorSettings;
use crate::units::SquareMeters;

/// Running board count for one panel type
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelTally {
    /// Σ area / coverage over small segments (not yet rounded)
    pub fractional_small_sum: f64,
    /// Σ ceil(area / coverage) over large segments
    pub rounded_large_sum: u64,
}

impl PanelTally {
    /// Boards to purchase for this type
    pub fn final_count(&self) -> u64 {
        self.fractional_small_sum.ceil() as u64 + self.rounded_large_sum
    }
}

/// Board counter for one calculation pass.
///
/// Create a fresh accumulator per pass; nothing is shared between passes.
#[derive(Debug, Clone)]
pub struct PanelAccumulator {
    coverage_m2: f64,
    threshold_m2: f64,
    tallies: BTreeMap<PanelType, PanelTally>,
}

impl PanelAccumulator {
    pub fn new(settings: &EstimatorSettings) -> Self {
        PanelAccumulator {
            coverage_m2: settings.panel_coverage_m2,
            threshold_m2: settings.small_area_threshold_m2,
            tallies: BTreeMap::new(),
        }
    }

    /// Record one segment's area against a panel type.
    ///
    /// Areas that are not finite and strictly positive contribute nothing.
    pub fn record(&mut self, panel_type: PanelType, area: SquareMeters) {
        if !area.is_positive() {
            return;
        }

        let boards = area.value() / self.coverage_m2;
        let tally = self.tallies.entry(panel_type).or_default();
        if area.value() < self.threshold_m2 {
            tally.fractional_small_sum += boards;
        } else {
            tally.rounded_large_sum += boards.ceil() as u64;
        }
    }

    /// Current tally for a type (zero if nothing was recorded)
    pub fn tally(&self, panel_type: PanelType) -> PanelTally {
        self.tallies.get(&panel_type).copied().unwrap_or_default()
    }

    /// Final board count for a type
    pub fn finalize(&self, panel_type: PanelType) -> u64 {
        self.tally(panel_type).final_count()
    }

    /// Final board counts keyed by board material, zero counts omitted
    pub fn totals(&self) -> BTreeMap<Material, u64> {
        self.tallies
            .iter()
            .map(|(panel_type, tally)| (Material::panel(*panel_type), tally.final_count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}
