//! # Project Data Structures
//!
//! The `Project` struct is the root container for a takeoff's *input*: the
//! walls and ceilings being estimated and the settings used to estimate them.
//! Results are never stored; every calculation is a fresh pass over the items.
//! Projects serialize to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, estimator, job info, timestamps)
//! ├── settings: EstimatorSettings (coverage rates, stock lengths, ratios)
//! └── items: Vec<ProjectItem> (walls and ceilings, in takeoff order)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::catalog::PanelType;
//! use takeoff_core::items::WallInput;
//! use takeoff_core::project::Project;
//!
//! let mut project = Project::new("Jane Estimator", "25-042", "ACME Corp");
//! project.add_item(WallInput::new(PanelType::Normal).with_segment(3.0, 2.4).into());
//!
//! let result = project.calculate().unwrap();
//! assert!(result.errors.is_empty());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CalcResult;
use crate::estimate::{CalculationResult, ErrorPolicy, Estimator};
use crate::items::StructureItem;
use crate::settings::EstimatorSettings;

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Items are kept in a `Vec` because their order is the takeoff order: item
/// numbers in summaries and error messages are positions in this list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, estimator, job info)
    pub meta: ProjectMetadata,

    /// Rates and ratios for every calculation on this project
    #[serde(default)]
    pub settings: EstimatorSettings,

    /// Walls and ceilings, in takeoff order
    #[serde(default)]
    pub items: Vec<ProjectItem>,
}

/// An item plus the stable id used to address it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub id: Uuid,
    #[serde(flatten)]
    pub item: StructureItem,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `estimator` - Name of the person preparing the takeoff
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    ///
    /// # Example
    ///
    /// ```rust
    /// use takeoff_core::project::Project;
    ///
    /// let project = Project::new("John Doe", "25-001", "Client Corp");
    /// assert_eq!(project.meta.estimator, "John Doe");
    /// ```
    pub fn new(estimator: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                estimator: estimator.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: EstimatorSettings::default(),
            items: Vec::new(),
        }
    }

    /// Append an item; returns the id assigned to it.
    pub fn add_item(&mut self, item: StructureItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.push(ProjectItem { id, item });
        self.touch();
        id
    }

    /// Remove an item by id, keeping the order of the rest.
    ///
    /// Returns the removed item if it existed.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<StructureItem> {
        let index = self.items.iter().position(|entry| entry.id == *id)?;
        let removed = self.items.remove(index);
        self.touch();
        Some(removed.item)
    }

    /// Get an item by id.
    pub fn get_item(&self, id: &Uuid) -> Option<&StructureItem> {
        self.items
            .iter()
            .find(|entry| entry.id == *id)
            .map(|entry| &entry.item)
    }

    /// Get a mutable reference to an item by id.
    ///
    /// Marks the project as modified when the item is found.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut StructureItem> {
        let entry = self.items.iter_mut().find(|entry| entry.id == *id)?;
        self.meta.modified = Utc::now();
        Some(&mut entry.item)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Items in takeoff order, without their ids
    pub fn structure_items(&self) -> Vec<StructureItem> {
        self.items.iter().map(|entry| entry.item.clone()).collect()
    }

    /// Run a strict calculation pass with this project's settings.
    pub fn calculate(&self) -> CalcResult<CalculationResult> {
        self.calculate_with(ErrorPolicy::Strict)
    }

    /// Run a calculation pass with the given error policy.
    pub fn calculate_with(&self, policy: ErrorPolicy) -> CalcResult<CalculationResult> {
        let estimator = Estimator::new(self.settings.clone())?.with_policy(policy);
        Ok(estimator.calculate(&self.structure_items()))
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the person preparing the takeoff
    pub estimator: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}
