//! # Estimator Settings
//!
//! Coverage rates, stock lengths and fastener ratios used by the takeoff.
//! The defaults are the standard rates for 1.22 m × 2.44 m boards on
//! light-gauge steel framing. Settings travel with the project file and are
//! passed explicitly to every calculation pass.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::settings::EstimatorSettings;
//!
//! let settings = EstimatorSettings::default();
//! assert_eq!(settings.panel_coverage_m2, 2.98);
//! assert!(settings.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Nominal area covered by one board (m²)
pub const PANEL_COVERAGE_M2: f64 = 2.98;

/// Segments below this area are pooled fractionally (m²)
pub const SMALL_AREA_THRESHOLD_M2: f64 = 1.5;

/// Rates and ratios driving the derived quantities.
///
/// Every field has a serde default, so a project file may override only the
/// values it cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorSettings {
    // === Boards ===
    /// Area covered by one board (m²)
    pub panel_coverage_m2: f64,
    /// Segment area below which board counts are pooled before rounding (m²)
    pub small_area_threshold_m2: f64,

    // === Wall framing ===
    /// Stock length of wall track (m)
    pub track_length_m: f64,
    /// Nails with washer per track piece
    pub nails_per_track: f64,
    /// Framing screws per stud
    pub screws_per_stud: f64,

    // === Ceiling framing ===
    /// Spacing between furring channels (m)
    pub furring_spacing_m: f64,
    /// Spacing between carrying channels (m)
    pub carrying_spacing_m: f64,
    /// Stock length of furring and carrying channel (m)
    pub channel_length_m: f64,
    /// Stock length of angle trim (m)
    pub angle_length_m: f64,
    /// Hanger clips per carrying channel
    pub clips_per_carrying_channel: f64,
    /// Nails with washer per angle trim piece
    pub nails_per_angle: f64,
    /// Nails with washer per carrying channel
    pub nails_per_carrying_channel: f64,
    /// Framing screws per furring channel
    pub screws_per_furring_channel: f64,
    /// Framing screws per hanger clip
    pub screws_per_clip: f64,

    // === Finishing ===
    /// Area finished by one box of joint compound (m²)
    pub compound_coverage_m2: f64,
    /// Area finished by one bag of basecoat (m²)
    pub basecoat_coverage_m2: f64,
    /// Meters of tape per m² of board
    pub tape_m_per_m2: f64,
    /// Boards sanded per sandpaper sheet
    pub panels_per_sandpaper_sheet: f64,
    /// Board screws per board
    pub screws_per_panel: f64,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        EstimatorSettings {
            panel_coverage_m2: PANEL_COVERAGE_M2,
            small_area_threshold_m2: SMALL_AREA_THRESHOLD_M2,
            track_length_m: 3.05,
            nails_per_track: 8.0,
            screws_per_stud: 4.0,
            furring_spacing_m: 0.40,
            carrying_spacing_m: 0.90,
            channel_length_m: 3.66,
            angle_length_m: 2.44,
            clips_per_carrying_channel: 4.0,
            nails_per_angle: 5.0,
            nails_per_carrying_channel: 8.0,
            screws_per_furring_channel: 12.0,
            screws_per_clip: 2.0,
            compound_coverage_m2: 22.0,
            basecoat_coverage_m2: 8.0,
            tape_m_per_m2: 1.0,
            panels_per_sandpaper_sheet: 2.0,
            screws_per_panel: 40.0,
        }
    }
}

impl EstimatorSettings {
    /// Validate that every divisor is usable and every ratio is non-negative.
    pub fn validate(&self) -> CalcResult<()> {
        let divisors = [
            ("panel_coverage_m2", self.panel_coverage_m2),
            ("small_area_threshold_m2", self.small_area_threshold_m2),
            ("track_length_m", self.track_length_m),
            ("furring_spacing_m", self.furring_spacing_m),
            ("carrying_spacing_m", self.carrying_spacing_m),
            ("channel_length_m", self.channel_length_m),
            ("angle_length_m", self.angle_length_m),
            ("compound_coverage_m2", self.compound_coverage_m2),
            ("basecoat_coverage_m2", self.basecoat_coverage_m2),
            ("panels_per_sandpaper_sheet", self.panels_per_sandpaper_sheet),
        ];
        for (field, value) in divisors {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a positive number",
                ));
            }
        }

        let ratios = [
            ("nails_per_track", self.nails_per_track),
            ("screws_per_stud", self.screws_per_stud),
            ("clips_per_carrying_channel", self.clips_per_carrying_channel),
            ("nails_per_angle", self.nails_per_angle),
            ("nails_per_carrying_channel", self.nails_per_carrying_channel),
            ("screws_per_furring_channel", self.screws_per_furring_channel),
            ("screws_per_clip", self.screws_per_clip),
            ("tape_m_per_m2", self.tape_m_per_m2),
            ("screws_per_panel", self.screws_per_panel),
        ];
        for (field, value) in ratios {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be zero or a positive number",
                ));
            }
        }

        Ok(())
    }
}
