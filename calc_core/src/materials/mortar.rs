//! Mortar and Plaster Dosages
//!
//! Binder mixes without coarse aggregate: laying mortar for block walls and
//! render (plaster) mixes. Both carry cement kg/m³ and sand m³/m³ only.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::{normalize_key, Dosage};
use crate::errors::{CalcError, CalcResult};

/// A cement + sand mix
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinderDosage {
    pub key: &'static str,
    pub name: &'static str,
    /// Cement (kg/m³)
    pub cement_kg_per_m3: f64,
    /// Sand (m³/m³)
    pub sand_m3_per_m3: f64,
}

impl Dosage for BinderDosage {
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

/// Laying mortar for block masonry
pub static MORTAR_DOSAGES: [BinderDosage; 4] = [
    BinderDosage {
        key: "250",
        name: "Mortier bâtard (250 kg/m³)",
        cement_kg_per_m3: 250.0,
        sand_m3_per_m3: 1.1,
    },
    BinderDosage {
        key: "300",
        name: "Mortier de pose courant (300 kg/m³)",
        cement_kg_per_m3: 300.0,
        sand_m3_per_m3: 1.05,
    },
    BinderDosage {
        key: "350",
        name: "Mortier de pose renforcé (350 kg/m³)",
        cement_kg_per_m3: 350.0,
        sand_m3_per_m3: 1.0,
    },
    BinderDosage {
        key: "400",
        name: "Mortier riche (400 kg/m³)",
        cement_kg_per_m3: 400.0,
        sand_m3_per_m3: 0.95,
    },
];

/// Render mixes, from base coat to finish coat
pub static PLASTER_DOSAGES: [BinderDosage; 5] = [
    BinderDosage {
        key: "250",
        name: "Enduit courant (250 kg/m³)",
        cement_kg_per_m3: 250.0,
        sand_m3_per_m3: 1.05,
    },
    BinderDosage {
        key: "300",
        name: "Enduit standard (300 kg/m³)",
        cement_kg_per_m3: 300.0,
        sand_m3_per_m3: 1.0,
    },
    BinderDosage {
        key: "350",
        name: "Enduit riche (350 kg/m³)",
        cement_kg_per_m3: 350.0,
        sand_m3_per_m3: 0.95,
    },
    BinderDosage {
        key: "400",
        name: "Gobetis (400 kg/m³)",
        cement_kg_per_m3: 400.0,
        sand_m3_per_m3: 0.9,
    },
    BinderDosage {
        key: "500",
        name: "Enduit de finition (500 kg/m³)",
        cement_kg_per_m3: 500.0,
        sand_m3_per_m3: 0.85,
    },
];

static MORTAR_BY_KEY: Lazy<HashMap<&'static str, &'static BinderDosage>> =
    Lazy::new(|| MORTAR_DOSAGES.iter().map(|d| (d.key, d)).collect());

static PLASTER_BY_KEY: Lazy<HashMap<&'static str, &'static BinderDosage>> =
    Lazy::new(|| PLASTER_DOSAGES.iter().map(|d| (d.key, d)).collect());

/// Look up a laying-mortar mix by key
pub fn lookup_mortar(key: &str) -> CalcResult<&'static BinderDosage> {
    MORTAR_BY_KEY
        .get(normalize_key(key).as_str())
        .copied()
        .ok_or_else(|| CalcError::unknown_dosage("mortar", key.trim()))
}

/// Look up a plaster mix by key
pub fn lookup_plaster(key: &str) -> CalcResult<&'static BinderDosage> {
    PLASTER_BY_KEY
        .get(normalize_key(key).as_str())
        .copied()
        .ok_or_else(|| CalcError::unknown_dosage("plaster", key.trim()))
}
