//! # Totals Aggregator
//!
//! [`MaterialsTotal`] is the purchase list: one integer quantity per
//! material, iterated in lexicographic order of material name. Zero
//! quantities are never stored, so "absent" and "zero" mean the same thing.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::catalog::{Material, MaterialKind};
//! use takeoff_core::totals::MaterialsTotal;
//!
//! let mut total = MaterialsTotal::new();
//! total.add(Material::of(MaterialKind::Studs), 8);
//! total.add(Material::of(MaterialKind::Studs), 4);
//! total.add(Material::of(MaterialKind::Track), 0);
//!
//! assert_eq!(total.get(Material::of(MaterialKind::Studs)), 12);
//! assert_eq!(total.len(), 1);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Material, Unit};

/// Integer purchase quantities keyed by material
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialsTotal(BTreeMap<Material, u64>);

/// One row of the totals table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub material: Material,
    pub quantity: u64,
    pub unit: Unit,
}

impl MaterialsTotal {
    pub fn new() -> Self {
        MaterialsTotal(BTreeMap::new())
    }

    /// Add a quantity (zero is a no-op)
    pub fn add(&mut self, material: Material, quantity: u64) {
        if quantity == 0 {
            return;
        }
        *self.0.entry(material).or_insert(0) += quantity;
    }

    /// Add every entry of another total
    pub fn add_all(&mut self, other: &MaterialsTotal) {
        for (material, quantity) in other.iter() {
            self.add(material, quantity);
        }
    }

    /// Merge finalized board counts
    pub fn merge_panels(&mut self, panels: BTreeMap<Material, u64>) {
        for (material, quantity) in panels {
            self.add(material, quantity);
        }
    }

    /// Quantity for a material (zero when absent)
    pub fn get(&self, material: Material) -> u64 {
        self.0.get(&material).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Entries in material-name order
    pub fn iter(&self) -> impl Iterator<Item = (Material, u64)> + '_ {
        self.0.iter().map(|(material, quantity)| (*material, *quantity))
    }

    /// Table rows with units, in material-name order
    pub fn lines(&self) -> Vec<MaterialLine> {
        self.iter()
            .map(|(material, quantity)| MaterialLine {
                material,
                quantity,
                unit: material.unit(),
            })
            .collect()
    }
}

impl FromIterator<(Material, u64)> for MaterialsTotal {
    fn from_iter<I: IntoIterator<Item = (Material, u64)>>(iter: I) -> Self {
        let mut total = MaterialsTotal::new();
        for (material, quantity) in iter {
            total.add(material, quantity);
        }
        total
    }
}
