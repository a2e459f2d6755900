//! # Concrete Estimate
//!
//! Work-items ("ouvrages") group concrete components that share one dosage.
//! Each work-item is aggregated on its own, converted to materials with its
//! dosage, and the results are rolled up by dosage key and overall.
//!
//! A work-item whose dosage is unset or unknown is reported as not
//! computable and contributes nothing to the totals.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "work_items": [
//!     {
//!       "name": "Fondations",
//!       "dosage": "250",
//!       "components": [
//!         { "name": "Semelles", "shape": "rectangular",
//!           "length_m": 1.0, "width_m": 1.0, "height_m": 0.3, "quantity": 6 }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aggregate::{aggregate, Aggregate};
use super::convert::{concrete_materials, ConcreteMaterials};
use super::geometry::ConcreteComponent;
use super::Outcome;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{concrete, deserialize_dosage_key};

/// A group of components poured with the same mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkItem {
    /// Optional label (e.g., "Fondations")
    #[serde(default)]
    pub name: String,

    /// Concrete dosage key (e.g., "350"); `None` until the user picks one
    #[serde(default, deserialize_with = "deserialize_dosage_key")]
    pub dosage: Option<String>,

    /// Components, in display order
    #[serde(default)]
    pub components: Vec<ConcreteComponent>,
}

impl WorkItem {
    pub fn new(name: impl Into<String>, dosage: impl Into<String>) -> Self {
        WorkItem {
            name: name.into(),
            dosage: Some(dosage.into()),
            components: Vec::new(),
        }
    }

    /// Append a component (builder style)
    pub fn with_component(mut self, component: ConcreteComponent) -> Self {
        self.components.push(component);
        self
    }

    /// Total volume of the work-item (m³)
    pub fn volume_m3(&self) -> f64 {
        super::aggregate::total(&self.components)
    }
}

/// Input for the concrete tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConcreteInput {
    #[serde(default)]
    pub work_items: Vec<WorkItem>,
}

/// Result for one computable work-item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItemEstimate {
    pub name: String,
    /// Normalized dosage key
    pub dosage: String,
    /// Display name of the mix
    pub dosage_name: String,
    pub volume_m3: f64,
    /// Per-component volumes, same order as the input
    pub component_volumes_m3: Vec<f64>,
    pub materials: ConcreteMaterials,
}

/// Volume and materials summed over all work-items sharing a dosage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DosageTotals {
    pub work_item_count: usize,
    pub volume_m3: f64,
    pub materials: ConcreteMaterials,
}

/// Result for the concrete tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteResult {
    /// Sum of computable work-item volumes (m³)
    pub total_volume_m3: f64,
    /// Sum of computable work-item materials
    pub total_materials: ConcreteMaterials,
    /// One entry per work-item, same order as the input
    pub work_items: Vec<Outcome<WorkItemEstimate>>,
    /// Totals grouped by dosage key, ordered by key
    pub by_dosage: BTreeMap<String, DosageTotals>,
}

/// Estimate a single work-item.
pub fn estimate_work_item(item: &WorkItem) -> CalcResult<WorkItemEstimate> {
    let key = item
        .dosage
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| CalcError::missing_field("dosage"))?;
    let mix = concrete::lookup(key)?;

    let Aggregate { total, subtotals } = aggregate(&item.components);

    Ok(WorkItemEstimate {
        name: item.name.clone(),
        dosage: mix.key.to_string(),
        dosage_name: mix.name.to_string(),
        volume_m3: total,
        component_volumes_m3: subtotals,
        materials: concrete_materials(total, mix),
    })
}

/// Estimate the whole concrete tab.
///
/// ## Example
///
/// ```rust
/// use calc_core::calculations::concrete::{calculate, ConcreteInput, WorkItem};
/// use calc_core::calculations::geometry::ConcreteComponent;
///
/// let input = ConcreteInput {
///     work_items: vec![
///         WorkItem::new("Dalle", "350")
///             .with_component(ConcreteComponent::rectangular("Dalle", 10.0, 5.0, 0.2)),
///     ],
/// };
/// let result = calculate(&input);
/// assert_eq!(result.total_materials.cement_bags, 70);
/// ```
pub fn calculate(input: &ConcreteInput) -> ConcreteResult {
    let mut total_volume_m3 = 0.0;
    let mut total_materials = ConcreteMaterials::default();
    let mut by_dosage: BTreeMap<String, DosageTotals> = BTreeMap::new();
    let mut work_items = Vec::with_capacity(input.work_items.len());

    for (index, item) in input.work_items.iter().enumerate() {
        match estimate_work_item(item) {
            Ok(estimate) => {
                total_volume_m3 += estimate.volume_m3;
                total_materials.accumulate(&estimate.materials);

                let group = by_dosage.entry(estimate.dosage.clone()).or_default();
                group.work_item_count += 1;
                group.volume_m3 += estimate.volume_m3;
                group.materials.accumulate(&estimate.materials);

                work_items.push(Outcome::Computed(estimate));
            }
            Err(error) => {
                debug!(index, error = %error, "work-item not computable");
                work_items.push(Outcome::not_computable(error));
            }
        }
    }

    ConcreteResult {
        total_volume_m3,
        total_materials,
        work_items,
        by_dosage,
    }
}
