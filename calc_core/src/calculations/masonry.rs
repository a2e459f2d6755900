//! # Masonry Estimate
//!
//! Block count and laying mortar for a set of walls built from one block size.
//!
//! ## Formulas
//!
//! - blocks/m² = 1 / ((block length + joint) × (block height + joint))
//! - blocks = ceil(wall surface × blocks/m²)
//! - mortar volume = wall surface × joint thickness
//!
//! The wall surface computed here is also what the plaster and waterproofing
//! tabs receive (see [`super::bridge`]).

use serde::{Deserialize, Serialize};

use super::aggregate::aggregate;
use super::convert::{binder_materials, ceil_count, BinderMaterials};
use super::geometry::WallComponent;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{deserialize_dosage_key, mortar};

/// Input for the masonry tab.
///
/// ## JSON Example
///
/// ```json
/// {
///   "block_length_m": 0.4,
///   "block_height_m": 0.2,
///   "block_thickness_m": 0.15,
///   "joint_thickness_m": 0.015,
///   "mortar_dosage": "300",
///   "components": [ { "name": "Façade", "length_m": 10.0, "height_m": 2.5 } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasonryInput {
    /// Block length (m)
    pub block_length_m: f64,

    /// Block height (m)
    pub block_height_m: f64,

    /// Block thickness (m); informational only
    pub block_thickness_m: Option<f64>,

    /// Mortar joint thickness (m)
    pub joint_thickness_m: f64,

    /// Laying mortar dosage key; mortar materials are omitted when unset
    #[serde(deserialize_with = "deserialize_dosage_key")]
    pub mortar_dosage: Option<String>,

    /// Walls, in display order
    pub components: Vec<WallComponent>,
}

impl Default for MasonryInput {
    /// Standard 20×40 cm block with a 1.5 cm joint and no walls
    fn default() -> Self {
        MasonryInput {
            block_length_m: 0.4,
            block_height_m: 0.2,
            block_thickness_m: Some(0.15),
            joint_thickness_m: 0.015,
            mortar_dosage: None,
            components: Vec::new(),
        }
    }
}

impl MasonryInput {
    /// Validate block geometry.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.block_length_m.is_finite() && self.block_length_m > 0.0) {
            return Err(CalcError::invalid_input(
                "block_length_m",
                self.block_length_m.to_string(),
                "Block length must be positive",
            ));
        }
        if !(self.block_height_m.is_finite() && self.block_height_m > 0.0) {
            return Err(CalcError::invalid_input(
                "block_height_m",
                self.block_height_m.to_string(),
                "Block height must be positive",
            ));
        }
        if !(self.joint_thickness_m.is_finite() && self.joint_thickness_m >= 0.0) {
            return Err(CalcError::invalid_input(
                "joint_thickness_m",
                self.joint_thickness_m.to_string(),
                "Joint thickness cannot be negative",
            ));
        }
        Ok(())
    }

    /// Blocks per m² of wall, joints included.
    pub fn blocks_per_m2(&self) -> CalcResult<f64> {
        self.validate()?;
        let module_area = (self.block_length_m + self.joint_thickness_m)
            * (self.block_height_m + self.joint_thickness_m);
        let per_m2 = 1.0 / module_area;
        if !per_m2.is_finite() {
            return Err(CalcError::invalid_input(
                "block_length_m",
                self.block_length_m.to_string(),
                "Block module area is degenerate",
            ));
        }
        Ok(per_m2)
    }
}

/// Laying mortar for the walls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortarEstimate {
    pub volume_m3: f64,
    /// Present only when a known mortar dosage is selected
    pub dosage: Option<String>,
    pub materials: Option<BinderMaterials>,
}

/// Result for the masonry tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasonryResult {
    pub total_surface_m2: f64,
    /// Per-wall areas, same order as the input
    pub component_surfaces_m2: Vec<f64>,
    pub blocks_per_m2: f64,
    pub blocks_needed: u64,
    pub mortar: MortarEstimate,
}

/// Estimate the masonry tab.
///
/// Fails only on invalid block geometry or an unknown mortar dosage; an empty
/// wall list gives zero blocks.
///
/// ```rust
/// use calc_core::calculations::masonry::{calculate, MasonryInput};
/// use calc_core::calculations::geometry::WallComponent;
///
/// let input = MasonryInput {
///     components: vec![WallComponent::new("Mur", 10.0, 2.5)],
///     ..MasonryInput::default()
/// };
/// let result = calculate(&input).unwrap();
/// assert_eq!(result.blocks_needed, 281);
/// ```
pub fn calculate(input: &MasonryInput) -> CalcResult<MasonryResult> {
    let blocks_per_m2 = input.blocks_per_m2()?;
    let surfaces = aggregate(&input.components);

    let mortar_volume_m3 = surfaces.total * input.joint_thickness_m;
    let mortar = match input.mortar_dosage.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(key) => {
            let mix = mortar::lookup_mortar(key)?;
            MortarEstimate {
                volume_m3: mortar_volume_m3,
                dosage: Some(mix.key.to_string()),
                materials: Some(binder_materials(mortar_volume_m3, mix)),
            }
        }
        None => MortarEstimate {
            volume_m3: mortar_volume_m3,
            dosage: None,
            materials: None,
        },
    };

    Ok(MasonryResult {
        total_surface_m2: surfaces.total,
        component_surfaces_m2: surfaces.subtotals,
        blocks_per_m2,
        blocks_needed: ceil_count(surfaces.total * blocks_per_m2),
        mortar,
    })
}
