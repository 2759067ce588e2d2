//! # takeoff_core - Drywall Material Takeoff Engine
//!
//! `takeoff_core` turns wall and ceiling measurements into a purchase list of
//! boards, framing, finishing materials and fasteners. All inputs and outputs
//! are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: a calculation pass is a pure function of items and settings
//! - **JSON-First**: all input and result types implement Serialize/Deserialize
//! - **Errors as data**: item problems are reported in the result, not raised
//! - **No waste on offcuts**: boards from small pieces are pooled before rounding
//!
//! ## Quick Start
//!
//! ```rust
//! use takeoff_core::catalog::{Material, MaterialKind, PanelType};
//! use takeoff_core::estimate::calculate;
//! use takeoff_core::items::{CeilingInput, StructureItem, WallInput};
//!
//! let items: Vec<StructureItem> = vec![
//!     WallInput::new(PanelType::Normal).with_segment(3.0, 2.4).into(),
//!     CeilingInput::new(PanelType::Normal).with_segment(1.0, 1.2).into(),
//! ];
//!
//! let result = calculate(&items);
//! assert!(result.errors.is_empty());
//! assert_eq!(result.materials_total.get(Material::of(MaterialKind::Studs)), 8);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Panel types, materials, units and finishing sets
//! - [`segments`] - Segment validation and aggregation
//! - [`panels`] - Cross-item board accumulator
//! - [`quantities`] - Framing, finishing and fastener formulas
//! - [`validation`] - Item configuration checks
//! - [`totals`] - Material totals
//! - [`estimate`] - The calculation pass
//! - [`project`] - Project container and settings
//! - [`file_io`] - Atomic project saves and loads
//! - [`report`], [`export`], [`pdf`] - Text, CSV and PDF output

pub mod catalog;
pub mod errors;
pub mod estimate;
pub mod export;
pub mod file_io;
pub mod items;
pub mod panels;
pub mod pdf;
pub mod project;
pub mod quantities;
pub mod report;
pub mod segments;
pub mod settings;
pub mod totals;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use catalog::{Material, MaterialKind, PanelType, Unit};
pub use errors::{CalcError, CalcResult};
pub use estimate::{calculate, CalculationResult, ErrorPolicy, Estimator, ItemSummary};
pub use file_io::{load_project, save_project};
pub use items::{CeilingInput, StructureItem, WallInput};
pub use project::{Project, ProjectItem, ProjectMetadata};
pub use settings::EstimatorSettings;
pub use totals::MaterialsTotal;
