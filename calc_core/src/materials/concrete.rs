//! Concrete Dosages
//!
//! Reference mixes keyed by cement content in kg/m³. Ratios are per m³ of
//! finished concrete.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::{normalize_key, Dosage};
use crate::errors::{CalcError, CalcResult};

/// One concrete mix from the reference table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConcreteDosage {
    /// Table key (cement kg/m³ as a string, e.g. "350")
    pub key: &'static str,
    /// Display name including intended use
    pub name: &'static str,
    /// Cement (kg/m³)
    pub cement_kg_per_m3: f64,
    /// Sand (m³/m³)
    pub sand_m3_per_m3: f64,
    /// Gravel (m³/m³)
    pub gravel_m3_per_m3: f64,
    /// Mixing water (L/m³)
    pub water_l_per_m3: f64,
}

impl Dosage for ConcreteDosage {
    fn key(&self) -> &'static str {
        self.key
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn cement_kg_per_m3(&self) -> f64 {
        self.cement_kg_per_m3
    }

    fn sand_m3_per_m3(&self) -> f64 {
        self.sand_m3_per_m3
    }
}

/// All concrete mixes, leanest first
pub static CONCRETE_DOSAGES: [ConcreteDosage; 6] = [
    ConcreteDosage {
        key: "150",
        name: "Béton de propreté (150 kg/m³)",
        cement_kg_per_m3: 150.0,
        sand_m3_per_m3: 0.4,
        gravel_m3_per_m3: 0.8,
        water_l_per_m3: 75.0,
    },
    ConcreteDosage {
        key: "200",
        name: "Béton pour fondations légères (200 kg/m³)",
        cement_kg_per_m3: 200.0,
        sand_m3_per_m3: 0.45,
        gravel_m3_per_m3: 0.85,
        water_l_per_m3: 100.0,
    },
    ConcreteDosage {
        key: "250",
        name: "Fondations / Semelles (250 kg/m³)",
        cement_kg_per_m3: 250.0,
        sand_m3_per_m3: 0.5,
        gravel_m3_per_m3: 0.9,
        water_l_per_m3: 125.0,
    },
    ConcreteDosage {
        key: "300",
        name: "Dallage / Chaussées (300 kg/m³)",
        cement_kg_per_m3: 300.0,
        sand_m3_per_m3: 0.4,
        gravel_m3_per_m3: 0.7,
        water_l_per_m3: 150.0,
    },
    ConcreteDosage {
        key: "350",
        name: "Poteaux / Poutres / Chaînages (350 kg/m³)",
        cement_kg_per_m3: 350.0,
        sand_m3_per_m3: 0.4,
        gravel_m3_per_m3: 0.6,
        water_l_per_m3: 175.0,
    },
    ConcreteDosage {
        key: "400",
        name: "Béton de haute résistance (400 kg/m³)",
        cement_kg_per_m3: 400.0,
        sand_m3_per_m3: 0.35,
        gravel_m3_per_m3: 0.55,
        water_l_per_m3: 200.0,
    },
];

static BY_KEY: Lazy<HashMap<&'static str, &'static ConcreteDosage>> =
    Lazy::new(|| CONCRETE_DOSAGES.iter().map(|d| (d.key, d)).collect());

/// Look up a concrete mix by key.
///
/// Keys are normalized first, so `" 350"` and `"350.0"` both resolve.
pub fn lookup(key: &str) -> CalcResult<&'static ConcreteDosage> {
    let normalized = normalize_key(key);
    BY_KEY
        .get(normalized.as_str())
        .copied()
        .ok_or_else(|| CalcError::unknown_dosage("concrete", key.trim()))
}
