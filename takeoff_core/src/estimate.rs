//! # Calculation Pass
//!
//! Runs one takeoff over a batch of items:
//!
//! 1. Each item is aggregated and validated independently; all of its
//!    problems are collected into a single [`ItemErrors`].
//! 2. Under [`ErrorPolicy::Strict`], any item error stops the pass and the
//!    result carries errors only. Under [`ErrorPolicy::BestEffort`], invalid
//!    items are reported and the rest are estimated.
//! 3. Boards of every included item (both faces of two-face walls) are fed to
//!    one [`PanelAccumulator`]; every other material is rounded per item and
//!    summed.
//!
//! The pass is a pure function of its inputs. Nothing outlives the call.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::catalog::{Material, PanelType};
//! use takeoff_core::estimate::calculate;
//! use takeoff_core::items::{StructureItem, WallInput};
//!
//! let items = vec![StructureItem::Wall(
//!     WallInput::new(PanelType::Normal).with_segment(3.0, 2.4),
//! )];
//!
//! let result = calculate(&items);
//! assert!(result.errors.is_empty());
//! assert_eq!(result.materials_total.get(Material::panel(PanelType::Normal)), 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::PanelType;
use crate::errors::CalcResult;
use crate::items::{CeilingInput, StructureItem, WallInput};
use crate::panels::PanelAccumulator;
use crate::quantities::{ceiling_quantities, wall_quantities};
use crate::segments::{aggregate, CeilingSegment, MeasuredSegment, WallSegment};
use crate::settings::EstimatorSettings;
use crate::totals::MaterialsTotal;
use crate::units::SquareMeters;
use crate::validation::{validate_ceiling_config, validate_wall_config, ItemErrors};

/// Error shown for a batch without items
pub const NO_ITEMS_MESSAGE: &str = "No items to calculate.";

/// Error added when best-effort leaves nothing to estimate
pub const NO_VALID_ITEMS_MESSAGE: &str = "No valid items to calculate.";

// ============================================================================
// Result types
// ============================================================================

/// What to do when some items are invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorPolicy {
    /// Any invalid item voids the whole result
    #[default]
    Strict,
    /// Estimate the valid items, report the invalid ones
    BestEffort,
}

/// Validated input and measurements echoed back for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ItemDetails {
    Wall {
        faces: u8,
        face1_panel: PanelType,
        face2_panel: Option<PanelType>,
        post_spacing_m: f64,
        double_structure: bool,
        total_width_m: f64,
        total_area_m2: f64,
        segments: Vec<MeasuredSegment<WallSegment>>,
    },
    Ceiling {
        panel: PanelType,
        plenum_m: f64,
        total_area_m2: f64,
        perimeter_sum_m: f64,
        segments: Vec<MeasuredSegment<CeilingSegment>>,
    },
}

impl ItemDetails {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ItemDetails::Wall { .. } => "Wall",
            ItemDetails::Ceiling { .. } => "Ceiling",
        }
    }
}

/// One estimated item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    /// 1-based position in the batch
    pub number: usize,
    pub label: String,
    pub details: ItemDetails,
    /// This item's rounded non-board quantities
    pub materials: MaterialsTotal,
}

/// Output of one calculation pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationResult {
    pub materials_total: MaterialsTotal,
    pub item_summaries: Vec<ItemSummary>,
    /// One line per invalid item, plus batch-level messages
    pub errors: Vec<String>,
}

impl CalculationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        CalculationResult {
            errors,
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

// ============================================================================
// Estimator
// ============================================================================

/// An item that passed validation, with its board areas still to record
struct EvaluatedItem {
    summary: ItemSummary,
    panel_records: Vec<(PanelType, SquareMeters)>,
}

/// Runs calculation passes with fixed settings and error policy
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    settings: EstimatorSettings,
    policy: ErrorPolicy,
}

impl Estimator {
    /// Create an estimator, rejecting settings that cannot drive a takeoff.
    pub fn new(settings: EstimatorSettings) -> CalcResult<Self> {
        settings.validate()?;
        Ok(Estimator {
            settings,
            policy: ErrorPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn settings(&self) -> &EstimatorSettings {
        &self.settings
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Run one pass over `items`.
    pub fn calculate(&self, items: &[StructureItem]) -> CalculationResult {
        tracing::info!(
            "Starting takeoff: {} items, policy {:?}",
            items.len(),
            self.policy
        );

        if items.is_empty() {
            tracing::warn!("Takeoff requested with no items");
            return CalculationResult::from_errors(vec![NO_ITEMS_MESSAGE.to_string()]);
        }

        let mut evaluated = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let number = index + 1;
            match self.evaluate(number, item) {
                Ok(item) => evaluated.push(item),
                Err(item_errors) => {
                    tracing::warn!("{}", item_errors);
                    errors.push(item_errors.to_string());
                }
            }
        }

        if !errors.is_empty() && self.policy == ErrorPolicy::Strict {
            tracing::info!("Takeoff rejected: {} invalid items", errors.len());
            return CalculationResult::from_errors(errors);
        }

        if evaluated.is_empty() {
            errors.push(NO_VALID_ITEMS_MESSAGE.to_string());
            return CalculationResult::from_errors(errors);
        }

        let mut panels = PanelAccumulator::new(&self.settings);
        let mut materials_total = MaterialsTotal::new();
        let mut item_summaries = Vec::with_capacity(evaluated.len());
        for item in evaluated {
            for (panel_type, area) in item.panel_records {
                panels.record(panel_type, area);
            }
            materials_total.add_all(&item.summary.materials);
            item_summaries.push(item.summary);
        }
        materials_total.merge_panels(panels.totals());

        tracing::info!(
            "Takeoff complete: {} items estimated, {} materials, {} errors",
            item_summaries.len(),
            materials_total.len(),
            errors.len()
        );

        CalculationResult {
            materials_total,
            item_summaries,
            errors,
        }
    }

    fn evaluate(&self, number: usize, item: &StructureItem) -> Result<EvaluatedItem, ItemErrors> {
        let label = item.display_label(number);
        tracing::debug!("Evaluating {} '{}'", item.kind_name(), label);

        match item {
            StructureItem::Wall(wall) => self.evaluate_wall(number, label, wall),
            StructureItem::Ceiling(ceiling) => self.evaluate_ceiling(number, label, ceiling),
        }
    }

    fn evaluate_wall(
        &self,
        number: usize,
        label: String,
        wall: &WallInput,
    ) -> Result<EvaluatedItem, ItemErrors> {
        let totals = aggregate(&wall.segments);
        let config = match validate_wall_config(wall) {
            Ok(config) if totals.issues.is_empty() => config,
            outcome => {
                let mut issues = totals.issues;
                if let Err(more) = outcome {
                    issues.extend(more);
                }
                return Err(ItemErrors {
                    number,
                    label,
                    issues,
                });
            }
        };

        let panel_records = config
            .sheathed_faces()
            .flat_map(|panel_type| {
                totals
                    .measured
                    .iter()
                    .map(move |m| (panel_type, SquareMeters(m.area_m2)))
            })
            .collect();

        let materials = wall_quantities(
            &config,
            totals.total_width,
            totals.total_area,
            &self.settings,
        )
        .rounded();

        Ok(EvaluatedItem {
            summary: ItemSummary {
                number,
                label,
                details: ItemDetails::Wall {
                    faces: config.faces,
                    face1_panel: config.face1,
                    face2_panel: config.face2,
                    post_spacing_m: config.post_spacing.value(),
                    double_structure: config.double_structure,
                    total_width_m: totals.total_width.value(),
                    total_area_m2: totals.total_area.value(),
                    segments: totals.measured,
                },
                materials,
            },
            panel_records,
        })
    }

    fn evaluate_ceiling(
        &self,
        number: usize,
        label: String,
        ceiling: &CeilingInput,
    ) -> Result<EvaluatedItem, ItemErrors> {
        let totals = aggregate(&ceiling.segments);
        let config = match validate_ceiling_config(ceiling) {
            Ok(config) if totals.issues.is_empty() => config,
            outcome => {
                let mut issues = totals.issues;
                if let Err(more) = outcome {
                    issues.extend(more);
                }
                return Err(ItemErrors {
                    number,
                    label,
                    issues,
                });
            }
        };

        let panel_records = totals
            .measured
            .iter()
            .map(|m| (config.panel, SquareMeters(m.area_m2)))
            .collect();

        let materials = ceiling_quantities(
            &config,
            totals.total_area,
            totals.perimeter_sum,
            &self.settings,
        )
        .rounded();

        Ok(EvaluatedItem {
            summary: ItemSummary {
                number,
                label,
                details: ItemDetails::Ceiling {
                    panel: config.panel,
                    plenum_m: config.plenum.value(),
                    total_area_m2: totals.total_area.value(),
                    perimeter_sum_m: totals.perimeter_sum.value(),
                    segments: totals.measured,
                },
                materials,
            },
            panel_records,
        })
    }
}

/// Run a strict pass with default settings
pub fn calculate(items: &[StructureItem]) -> CalculationResult {
    Estimator::default().calculate(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Material, MaterialKind};

    fn unit_wall() -> StructureItem {
        WallInput::new(PanelType::Normal).with_segment(3.0, 2.4).into()
    }

    fn broken_wall() -> StructureItem {
        WallInput::new(PanelType::Normal).with_segment(-1.0, 2.4).into()
    }

    #[test]
    fn test_empty_batch() {
        let result = calculate(&[]);
        assert_eq!(result.errors, vec![NO_ITEMS_MESSAGE.to_string()]);
        assert!(result.materials_total.is_empty());
    }

    #[test]
    fn test_single_wall() {
        let result = calculate(&[unit_wall()]);
        assert!(!result.has_errors());
        assert_eq!(result.item_summaries.len(), 1);
        assert_eq!(result.item_summaries[0].label, "Wall #1");

        let total = &result.materials_total;
        assert_eq!(total.get(Material::panel(PanelType::Normal)), 3);
        assert_eq!(total.get(Material::of(MaterialKind::Studs)), 8);
        assert_eq!(total.get(Material::of(MaterialKind::FineScrew1In)), 97);
        // Boards are not part of the per-item sheet
        assert_eq!(
            result.item_summaries[0]
                .materials
                .get(Material::panel(PanelType::Normal)),
            0
        );
    }

    #[test]
    fn test_two_faces_record_boards_twice() {
        let item: StructureItem = WallInput::new(PanelType::Normal)
            .with_segment(3.0, 2.4)
            .with_second_face(PanelType::FireResistant)
            .into();
        let result = calculate(&[item]);
        let total = &result.materials_total;
        assert_eq!(total.get(Material::panel(PanelType::Normal)), 3);
        assert_eq!(total.get(Material::panel(PanelType::FireResistant)), 3);
        // Framing is not duplicated
        assert_eq!(total.get(Material::of(MaterialKind::Studs)), 8);
    }

    #[test]
    fn test_strict_policy_is_all_or_nothing() {
        let result = calculate(&[unit_wall(), broken_wall()]);
        assert!(result.materials_total.is_empty());
        assert!(result.item_summaries.is_empty());
        assert_eq!(
            result.errors,
            vec!["Error in Wall #2: Segment 1: invalid dimensions, no segment has valid dimensions (> 0)".to_string()]
        );
    }

    #[test]
    fn test_best_effort_keeps_valid_items() {
        assert_eq!(Estimator::default().policy(), ErrorPolicy::Strict);
        let estimator = Estimator::default().with_policy(ErrorPolicy::BestEffort);
        assert_eq!(estimator.policy(), ErrorPolicy::BestEffort);
        let result = estimator.calculate(&[broken_wall(), unit_wall()]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.item_summaries.len(), 1);
        assert_eq!(result.item_summaries[0].number, 2);
        assert_eq!(result.materials_total.get(Material::panel(PanelType::Normal)), 3);
    }

    #[test]
    fn test_best_effort_with_no_valid_items() {
        let estimator = Estimator::default().with_policy(ErrorPolicy::BestEffort);
        let result = estimator.calculate(&[broken_wall()]);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[1], NO_VALID_ITEMS_MESSAGE);
        assert!(result.materials_total.is_empty());
    }

    #[test]
    fn test_small_pieces_pool_across_items() {
        let first: StructureItem = CeilingInput::new(PanelType::Normal).with_segment(1.0, 1.0).into();
        let second: StructureItem = WallInput::new(PanelType::Normal).with_segment(1.0, 1.0).into();
        let result = calculate(&[first, second]);
        // 2 x (1.0 / 2.98) pooled, rounded once
        assert_eq!(result.materials_total.get(Material::panel(PanelType::Normal)), 1);
    }

    #[test]
    fn test_other_materials_rounded_per_item() {
        let walls: Vec<StructureItem> = (0..2)
            .map(|_| WallInput::new(PanelType::Normal).with_segment(3.0, 2.4).into())
            .collect();
        let result = calculate(&walls);
        // 7.2 / 22 rounds to 1 per wall, not ceil(14.4 / 22) = 1
        assert_eq!(result.materials_total.get(Material::of(MaterialKind::JointCompound)), 2);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = EstimatorSettings {
            channel_length_m: 0.0,
            ..Default::default()
        };
        assert!(Estimator::new(settings).is_err());
    }

    #[test]
    fn test_result_serialization() {
        let result = calculate(&[unit_wall()]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["materials_total"]["Panel:Normal"], 3);
        assert_eq!(json["item_summaries"][0]["details"]["kind"], "Wall");
        assert_eq!(json["item_summaries"][0]["details"]["segments"][0]["number"], 1);

        let roundtrip: CalculationResult = serde_json::from_value(json).unwrap();
        assert_eq!(roundtrip.materials_total, result.materials_total);
        assert_eq!(roundtrip.item_summaries[0].label, "Wall #1");
    }
}
