//! # Plaster Estimate
//!
//! Render (enduit) volume and materials over the masonry wall surface.

use serde::{Deserialize, Serialize};

use super::bridge::SurfaceInput;
use super::convert::{binder_materials, BinderMaterials};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{deserialize_dosage_key, mortar};

/// Input for the plaster tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlasterInput {
    /// Render thickness (m)
    pub thickness_m: f64,

    /// Plaster dosage key (e.g., "300")
    #[serde(deserialize_with = "deserialize_dosage_key")]
    pub dosage: Option<String>,
}

impl Default for PlasterInput {
    /// 1.5 cm of standard render
    fn default() -> Self {
        PlasterInput {
            thickness_m: 0.015,
            dosage: Some("300".to_string()),
        }
    }
}

/// Result for the plaster tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasterResult {
    pub total_surface_m2: f64,
    pub volume_m3: f64,
    pub dosage: String,
    pub materials: BinderMaterials,
}

/// Estimate render over `surface`.
///
/// Returns `NoSurfaceDefined` when the masonry tab has no walls.
pub fn calculate(input: &PlasterInput, surface: SurfaceInput) -> CalcResult<PlasterResult> {
    let key = input
        .dosage
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| CalcError::missing_field("dosage"))?;
    let mix = mortar::lookup_plaster(key)?;

    if !(input.thickness_m.is_finite() && input.thickness_m > 0.0) {
        return Err(CalcError::invalid_input(
            "thickness_m",
            input.thickness_m.to_string(),
            "Thickness must be positive",
        ));
    }

    let area_m2 = surface.area_m2().ok_or_else(|| CalcError::no_surface("plaster"))?;
    let volume_m3 = area_m2 * input.thickness_m;

    Ok(PlasterResult {
        total_surface_m2: area_m2,
        volume_m3,
        dosage: mix.key.to_string(),
        materials: binder_materials(volume_m3, mix),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaster_over_wall_surface() {
        let input = PlasterInput {
            thickness_m: 0.02,
            dosage: Some("350".to_string()),
        };
        let result = calculate(&input, SurfaceInput::from_area(100.0)).unwrap();
        assert!((result.volume_m3 - 2.0).abs() < 1e-9);
        // 2 m³ × 350 = 700 kg → 14 bags
        assert_eq!(result.materials.cement_bags, 14);
        assert!((result.materials.sand_m3 - 1.9).abs() < 1e-9);
    }

    #[test]
    fn test_no_surface_reported() {
        let err = calculate(&PlasterInput::default(), SurfaceInput::NoSurface).unwrap_err();
        assert_eq!(err, CalcError::no_surface("plaster"));
    }

    #[test]
    fn test_missing_dosage_and_bad_thickness() {
        let surface = SurfaceInput::from_area(10.0);
        let no_dosage = PlasterInput {
            dosage: None,
            ..PlasterInput::default()
        };
        assert_eq!(calculate(&no_dosage, surface).unwrap_err().error_code(), "MISSING_FIELD");

        let flat = PlasterInput {
            thickness_m: 0.0,
            ..PlasterInput::default()
        };
        assert_eq!(calculate(&flat, surface).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_partial_record_keeps_defaults() {
        let thicker: PlasterInput = serde_json::from_str(r#"{ "thickness_m": 0.02 }"#).unwrap();
        assert_eq!(thicker.dosage.as_deref(), Some("300"));

        let numeric: PlasterInput = serde_json::from_str(r#"{ "dosage": 400 }"#).unwrap();
        assert_eq!(numeric.thickness_m, 0.015);
        let result = calculate(&numeric, SurfaceInput::from_area(10.0)).unwrap();
        assert_eq!(result.dosage, "400");
    }
}
