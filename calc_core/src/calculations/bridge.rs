//! # Wall Surface Bridge
//!
//! The plaster and waterproofing calculators work on the wall surface entered
//! in the masonry tab. They receive it as an explicit [`SurfaceInput`] value
//! rather than reading the masonry form themselves.

use serde::{Deserialize, Serialize};

use super::aggregate::total;
use super::masonry::MasonryInput;

/// Surface handed to downstream calculators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceInput {
    /// A positive wall surface (m²)
    Defined { area_m2: f64 },
    /// The masonry tab has no walls, or they add up to nothing
    NoSurface,
}

impl SurfaceInput {
    /// Wrap a raw area; anything not strictly positive is `NoSurface`
    pub fn from_area(area_m2: f64) -> Self {
        if area_m2.is_finite() && area_m2 > 0.0 {
            SurfaceInput::Defined { area_m2 }
        } else {
            SurfaceInput::NoSurface
        }
    }

    pub fn area_m2(&self) -> Option<f64> {
        match self {
            SurfaceInput::Defined { area_m2 } => Some(*area_m2),
            SurfaceInput::NoSurface => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, SurfaceInput::Defined { .. })
    }
}

/// Σ length × height over the masonry walls (m²)
pub fn wall_surface(masonry: &MasonryInput) -> f64 {
    total(&masonry.components)
}

/// The masonry wall surface as a downstream input.
///
/// ```rust
/// use calc_core::calculations::bridge::{surface_input, SurfaceInput};
/// use calc_core::calculations::masonry::MasonryInput;
///
/// assert_eq!(surface_input(&MasonryInput::default()), SurfaceInput::NoSurface);
/// ```
pub fn surface_input(masonry: &MasonryInput) -> SurfaceInput {
    if masonry.components.is_empty() {
        return SurfaceInput::NoSurface;
    }
    SurfaceInput::from_area(wall_surface(masonry))
}
