//! # Quantity Calculations
//!
//! Every tab follows the same pattern:
//!
//! - `*Input` - Form data for the tab (JSON-serializable)
//! - `*Result` - Derived quantities (JSON-serializable)
//! - `calculate(input) -> *Result` or `CalcResult<*Result>` - Pure calculation
//!
//! Shared building blocks:
//!
//! - [`geometry`] - Component volume and area
//! - [`aggregate`] - Ordered subtotals and totals
//! - [`convert`] - Dosage × volume → materials
//! - [`bridge`] - Masonry wall surface handed to the finishes tabs
//!
//! Tabs:
//!
//! - [`concrete`] - Work-items, volumes, cement/sand/gravel/water
//! - [`masonry`] - Blocks and laying mortar
//! - [`plaster`] - Render over the wall surface
//! - [`waterproofing`] - Coating product over walls and extra areas
//! - [`steel`] - Rebar weight, by diameter, in commercial bars

pub mod aggregate;
pub mod bridge;
pub mod concrete;
pub mod convert;
pub mod geometry;
pub mod masonry;
pub mod plaster;
pub mod steel;
pub mod waterproofing;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

// Re-export commonly used types
pub use bridge::SurfaceInput;
pub use concrete::{ConcreteInput, ConcreteResult, WorkItem};
pub use geometry::{ConcreteComponent, Measured, Solid, SurfaceComponent, WallComponent};
pub use masonry::{MasonryInput, MasonryResult};
pub use plaster::{PlasterInput, PlasterResult};
pub use steel::{SteelInput, SteelMember, SteelMemberInput, SteelResult};
pub use waterproofing::{WaterproofingInput, WaterproofingResult};

/// Either a computed value or the reason it could not be computed.
///
/// Used wherever one entry of a list (or one tab of a report) may fail on its
/// own without affecting the others.
///
/// ## JSON Example
///
/// ```json
/// { "status": "not_computable",
///   "error": { "type": "MissingField", "details": { "field": "dosage" } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Computed(T),
    NotComputable { error: CalcError },
}

impl<T> Outcome<T> {
    pub fn not_computable(error: CalcError) -> Self {
        Outcome::NotComputable { error }
    }

    /// The computed value, if any
    pub fn computed(&self) -> Option<&T> {
        match self {
            Outcome::Computed(value) => Some(value),
            Outcome::NotComputable { .. } => None,
        }
    }

    /// The reason for not computing, if any
    pub fn error(&self) -> Option<&CalcError> {
        match self {
            Outcome::Computed(_) => None,
            Outcome::NotComputable { error } => Some(error),
        }
    }
}

impl<T> From<Result<T, CalcError>> for Outcome<T> {
    fn from(result: Result<T, CalcError>) -> Self {
        match result {
            Ok(value) => Outcome::Computed(value),
            Err(error) => Outcome::NotComputable { error },
        }
    }
}
