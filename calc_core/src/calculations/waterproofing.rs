//! # Waterproofing Estimate
//!
//! Coating product over the masonry wall surface plus any extra areas entered
//! directly (foundations, buried walls).
//!
//! product (kg) = surface × consumption (kg/m²/layer) × layers

use serde::{Deserialize, Serialize};

use super::aggregate::aggregate;
use super::bridge::SurfaceInput;
use super::geometry::SurfaceComponent;
use crate::errors::{CalcError, CalcResult};

fn default_consumption() -> f64 {
    1.5
}

fn default_layers() -> u32 {
    2
}

/// Input for the waterproofing tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterproofingInput {
    /// Product consumption per layer (kg/m²)
    #[serde(default = "default_consumption")]
    pub consumption_kg_per_m2: f64,

    /// Number of layers
    #[serde(default = "default_layers")]
    pub layers: u32,

    /// Areas that are not masonry walls
    #[serde(default)]
    pub components: Vec<SurfaceComponent>,
}

impl Default for WaterproofingInput {
    fn default() -> Self {
        WaterproofingInput {
            consumption_kg_per_m2: default_consumption(),
            layers: default_layers(),
            components: Vec::new(),
        }
    }
}

/// Result for the waterproofing tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterproofingResult {
    /// Part of the surface coming from the masonry walls (m²)
    pub wall_surface_m2: f64,
    /// Extra areas, same order as the input (m²)
    pub component_surfaces_m2: Vec<f64>,
    pub total_surface_m2: f64,
    /// Product needed (kg)
    pub product_kg: f64,
}

/// Estimate waterproofing product.
///
/// Returns `NoSurfaceDefined` when neither the walls nor the extra areas
/// define a surface.
pub fn calculate(input: &WaterproofingInput, wall_surface: SurfaceInput) -> CalcResult<WaterproofingResult> {
    if !(input.consumption_kg_per_m2.is_finite() && input.consumption_kg_per_m2 > 0.0) {
        return Err(CalcError::invalid_input(
            "consumption_kg_per_m2",
            input.consumption_kg_per_m2.to_string(),
            "Consumption must be positive",
        ));
    }
    if input.layers == 0 {
        return Err(CalcError::invalid_input("layers", "0", "At least one layer is required"));
    }

    let wall_surface_m2 = wall_surface.area_m2().unwrap_or(0.0);
    let extras = aggregate(&input.components);
    let total_surface_m2 = wall_surface_m2 + extras.total;
    if total_surface_m2 <= 0.0 {
        return Err(CalcError::no_surface("waterproofing"));
    }

    Ok(WaterproofingResult {
        wall_surface_m2,
        component_surfaces_m2: extras.subtotals,
        total_surface_m2,
        product_kg: total_surface_m2 * input.consumption_kg_per_m2 * input.layers as f64,
    })
}
