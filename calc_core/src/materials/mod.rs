//! # Materials Database
//!
//! Static reference data used by the estimators. Entries are immutable and
//! process-wide; nothing here is user-editable.
//!
//! ## Tables
//!
//! - **Concrete**: cement kg, sand m³, gravel m³ and water L per m³ of concrete
//! - **Mortar**: laying mortar for block walls (cement kg, sand m³ per m³)
//! - **Plaster**: render mixes (cement kg, sand m³ per m³)
//! - **Rebar**: linear weight of HA bars by nominal diameter
//!
//! ## Example
//!
//! ```rust
//! use calc_core::materials::{concrete, rebar};
//!
//! let mix = concrete::lookup("350").unwrap();
//! assert_eq!(mix.cement_kg_per_m3, 350.0);
//!
//! let ha12 = rebar::linear_weight(12).unwrap();
//! assert_eq!(ha12, 0.888);
//! ```

pub mod concrete;
pub mod mortar;
pub mod rebar;

use serde::{Deserialize, Deserializer};

pub use concrete::{ConcreteDosage, CONCRETE_DOSAGES};
pub use mortar::{BinderDosage, MORTAR_DOSAGES, PLASTER_DOSAGES};
pub use rebar::{RebarSize, COMMERCIAL_BAR_LENGTH_M, REBAR_SIZES};

/// Weight of one bag of cement (kg).
pub const CEMENT_BAG_KG: f64 = 50.0;

/// Common behaviour of the cement-based dosage tables
pub trait Dosage {
    /// Table key (e.g. "350")
    fn key(&self) -> &'static str;

    /// Human-readable mix name
    fn name(&self) -> &'static str;

    /// Cement content in kg per m³ of mix
    fn cement_kg_per_m3(&self) -> f64;

    /// Sand content in m³ per m³ of mix
    fn sand_m3_per_m3(&self) -> f64;
}

/// Normalize a user-supplied dosage key ("350", " 350 ", "350.0") to table form.
pub(crate) fn normalize_key(key: &str) -> String {
    let trimmed = key.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v >= 0.0 => format!("{}", v as u64),
        _ => trimmed.to_string(),
    }
}

/// Read an optional dosage key entered either as text (`"350"`) or as a
/// number (`350`). Numbers are stored in table form.
pub(crate) fn deserialize_dosage_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawKey {
        Text(String),
        Number(f64),
    }

    Ok(Option::<RawKey>::deserialize(deserializer)?.map(|raw| match raw {
        RawKey::Text(text) => text,
        RawKey::Number(value) => normalize_key(&value.to_string()),
    }))
}
