//! Reinforcing Bar Sizes (HA)
//!
//! Linear weight of high-adherence bars by nominal diameter. Weights follow
//! `7850 kg/m³ × π d² / 4`, rounded the way supplier tables print them.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Length of a commercial bar (m)
pub const COMMERCIAL_BAR_LENGTH_M: f64 = 12.0;

/// One row of the linear-weight table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebarSize {
    /// Nominal diameter (mm)
    pub diameter_mm: u32,
    /// Linear weight (kg/m)
    pub kg_per_m: f64,
}

impl RebarSize {
    /// Display label, e.g. "HA 12"
    pub fn label(&self) -> String {
        format!("HA {}", self.diameter_mm)
    }
}

/// Supported diameters, smallest first
pub static REBAR_SIZES: [RebarSize; 9] = [
    RebarSize { diameter_mm: 6, kg_per_m: 0.222 },
    RebarSize { diameter_mm: 8, kg_per_m: 0.395 },
    RebarSize { diameter_mm: 10, kg_per_m: 0.617 },
    RebarSize { diameter_mm: 12, kg_per_m: 0.888 },
    RebarSize { diameter_mm: 14, kg_per_m: 1.21 },
    RebarSize { diameter_mm: 16, kg_per_m: 1.58 },
    RebarSize { diameter_mm: 20, kg_per_m: 2.47 },
    RebarSize { diameter_mm: 25, kg_per_m: 3.85 },
    RebarSize { diameter_mm: 32, kg_per_m: 6.31 },
];

static BY_DIAMETER: Lazy<HashMap<u32, f64>> =
    Lazy::new(|| REBAR_SIZES.iter().map(|s| (s.diameter_mm, s.kg_per_m)).collect());

/// Linear weight (kg/m) for a diameter in mm
pub fn linear_weight(diameter_mm: u32) -> CalcResult<f64> {
    BY_DIAMETER
        .get(&diameter_mm)
        .copied()
        .ok_or(CalcError::UnknownDiameter { diameter_mm })
}
