//! # Geometry Evaluator
//!
//! Volume of concrete components and area of surface components.
//!
//! Every function here is total: missing dimensions deserialize as 0, and
//! negative or non-finite values are clamped to 0 before use, so the result
//! is always a finite number ≥ 0.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::geometry::{ConcreteComponent, Solid};
//!
//! let footing = ConcreteComponent {
//!     name: "Semelle S1".to_string(),
//!     solid: Solid::Rectangular { length_m: 1.0, width_m: 1.0, height_m: 0.3 },
//!     quantity: 4,
//! };
//! assert!((footing.volume_m3() - 1.2).abs() < 1e-9);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Clamp a user-entered dimension to a usable value.
pub(crate) fn dim(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Anything that contributes a measurable quantity (volume or area) to a total.
pub trait Measured {
    /// The component's contribution, always finite and ≥ 0
    fn measure(&self) -> f64;
}

/// Shape of a concrete component with its dimensions (m).
///
/// A record without `"shape"` reads as rectangular, and missing dimensions
/// read as 0.
///
/// ## JSON Example
///
/// ```json
/// { "shape": "cylindrical", "diameter_m": 0.3, "height_m": 3.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Solid {
    /// Rectangular prism
    Rectangular {
        length_m: f64,
        width_m: f64,
        height_m: f64,
    },
    /// Right circular cylinder
    Cylindrical {
        diameter_m: f64,
        height_m: f64,
    },
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ShapeKind {
    #[default]
    Rectangular,
    Cylindrical,
}

/// Flat form record behind [`Solid`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SolidRecord {
    shape: ShapeKind,
    length_m: f64,
    width_m: f64,
    height_m: f64,
    diameter_m: f64,
}

impl From<SolidRecord> for Solid {
    fn from(record: SolidRecord) -> Self {
        match record.shape {
            ShapeKind::Rectangular => Solid::Rectangular {
                length_m: record.length_m,
                width_m: record.width_m,
                height_m: record.height_m,
            },
            ShapeKind::Cylindrical => Solid::Cylindrical {
                diameter_m: record.diameter_m,
                height_m: record.height_m,
            },
        }
    }
}

impl<'de> Deserialize<'de> for Solid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        SolidRecord::deserialize(deserializer).map(Solid::from)
    }
}

impl Default for Solid {
    fn default() -> Self {
        Solid::Rectangular {
            length_m: 0.0,
            width_m: 0.0,
            height_m: 0.0,
        }
    }
}

impl Solid {
    /// Volume of a single element (m³)
    pub fn unit_volume_m3(&self) -> f64 {
        match *self {
            Solid::Rectangular {
                length_m,
                width_m,
                height_m,
            } => dim(length_m) * dim(width_m) * dim(height_m),
            Solid::Cylindrical {
                diameter_m,
                height_m,
            } => {
                let radius = dim(diameter_m) / 2.0;
                PI * radius * radius * dim(height_m)
            }
        }
    }
}

fn default_quantity() -> u32 {
    1
}

/// A concrete element inside a work-item (footing, column, slab, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteComponent {
    /// User label (e.g., "Poteaux P1")
    #[serde(default)]
    pub name: String,

    /// Shape and dimensions
    #[serde(flatten)]
    pub solid: Solid,

    /// Number of identical elements
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl ConcreteComponent {
    /// Rectangular component with quantity 1
    pub fn rectangular(name: impl Into<String>, length_m: f64, width_m: f64, height_m: f64) -> Self {
        ConcreteComponent {
            name: name.into(),
            solid: Solid::Rectangular {
                length_m,
                width_m,
                height_m,
            },
            quantity: 1,
        }
    }

    /// Cylindrical component with quantity 1
    pub fn cylindrical(name: impl Into<String>, diameter_m: f64, height_m: f64) -> Self {
        ConcreteComponent {
            name: name.into(),
            solid: Solid::Cylindrical {
                diameter_m,
                height_m,
            },
            quantity: 1,
        }
    }

    /// Set the number of identical elements
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Total volume: unit volume × quantity (m³)
    pub fn volume_m3(&self) -> f64 {
        self.solid.unit_volume_m3() * self.quantity as f64
    }
}

impl Measured for ConcreteComponent {
    fn measure(&self) -> f64 {
        self.volume_m3()
    }
}

/// A wall panel in the masonry tab. Area is length × height with no
/// quantity multiplier; repeated walls are entered as separate rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WallComponent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub length_m: f64,
    #[serde(default)]
    pub height_m: f64,
}

impl WallComponent {
    pub fn new(name: impl Into<String>, length_m: f64, height_m: f64) -> Self {
        WallComponent {
            name: name.into(),
            length_m,
            height_m,
        }
    }

    /// Wall face area (m²)
    pub fn area_m2(&self) -> f64 {
        dim(self.length_m) * dim(self.height_m)
    }
}

impl Measured for WallComponent {
    fn measure(&self) -> f64 {
        self.area_m2()
    }
}

/// A surface entered directly by area (waterproofing extras: foundations,
/// buried walls).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SurfaceComponent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub area_m2: f64,
}

impl SurfaceComponent {
    pub fn new(name: impl Into<String>, area_m2: f64) -> Self {
        SurfaceComponent {
            name: name.into(),
            area_m2,
        }
    }
}

impl Measured for SurfaceComponent {
    fn measure(&self) -> f64 {
        dim(self.area_m2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_volume() {
        let slab = ConcreteComponent::rectangular("Dalle", 5.0, 4.0, 0.15).with_quantity(2);
        assert!((slab.volume_m3() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_cylindrical_volume() {
        let column = ConcreteComponent::cylindrical("Poteau rond", 0.3, 3.0).with_quantity(4);
        let expected = PI * 0.15 * 0.15 * 3.0 * 4.0;
        assert!((column.volume_m3() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cylinder_degenerates_to_zero() {
        let mut previous = f64::MAX;
        for d in [1.0, 0.1, 0.01, 0.001, 0.0] {
            let v = ConcreteComponent::cylindrical("c", d, 2.0).volume_m3();
            assert!(v <= previous);
            previous = v;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn test_volume_monotonic_in_each_dimension() {
        let base = ConcreteComponent::rectangular("b", 2.0, 1.0, 0.5).volume_m3();
        assert!(ConcreteComponent::rectangular("b", 2.5, 1.0, 0.5).volume_m3() >= base);
        assert!(ConcreteComponent::rectangular("b", 2.0, 1.2, 0.5).volume_m3() >= base);
        assert!(ConcreteComponent::rectangular("b", 2.0, 1.0, 0.6).volume_m3() >= base);
    }

    #[test]
    fn test_bad_dimensions_never_produce_nan() {
        let weird = ConcreteComponent::rectangular("x", f64::NAN, -2.0, f64::INFINITY);
        assert_eq!(weird.volume_m3(), 0.0);
        let weird = ConcreteComponent::cylindrical("x", -0.3, 3.0);
        assert_eq!(weird.volume_m3(), 0.0);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let json = r#"{ "name": "Longrine", "shape": "rectangular", "length_m": 4.0 }"#;
        let component: ConcreteComponent = serde_json::from_str(json).unwrap();
        assert_eq!(component.quantity, 1);
        assert_eq!(component.volume_m3(), 0.0);
    }

    #[test]
    fn test_cylinder_json() {
        let json = r#"{ "name": "Pieu", "shape": "cylindrical", "diameter_m": 0.4, "height_m": 5.0, "quantity": 3 }"#;
        let component: ConcreteComponent = serde_json::from_str(json).unwrap();
        assert!(matches!(component.solid, Solid::Cylindrical { .. }));
        assert!((component.volume_m3() - PI * 0.04 * 5.0 * 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_shape_defaults_to_rectangular() {
        let json = r#"{ "name": "Dalle", "length_m": 5, "width_m": 4, "height_m": 0.15 }"#;
        let component: ConcreteComponent = serde_json::from_str(json).unwrap();
        assert!(matches!(component.solid, Solid::Rectangular { .. }));
        assert!((component.volume_m3() - 3.0).abs() < 1e-9);

        let bare: ConcreteComponent = serde_json::from_str("{}").unwrap();
        assert_eq!(bare.solid, Solid::default());
        assert_eq!(bare.quantity, 1);
    }

    #[test]
    fn test_serialized_component_reads_back() {
        let component = ConcreteComponent::cylindrical("Pieu", 0.4, 5.0).with_quantity(2);
        let json = serde_json::to_string(&component).unwrap();
        assert!(json.contains(r#""shape":"cylindrical""#));
        let back: ConcreteComponent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, component);
    }

    #[test]
    fn test_wall_area_ignores_nothing_but_bad_values() {
        assert!((WallComponent::new("Façade", 10.0, 2.5).area_m2() - 25.0).abs() < 1e-9);
        assert_eq!(WallComponent::new("Vide", -1.0, 2.5).area_m2(), 0.0);
    }

    #[test]
    fn test_surface_component_measure() {
        assert_eq!(SurfaceComponent::new("Fondations", 50.0).measure(), 50.0);
        assert_eq!(SurfaceComponent::new("Erreur", f64::NAN).measure(), 0.0);
    }
}
