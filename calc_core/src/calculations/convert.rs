//! # Material Converter
//!
//! Applies a dosage entry to an aggregated volume. Cement is always reported
//! both in kg and in whole 50 kg bags (rounded up).

use serde::{Deserialize, Serialize};

use super::geometry::dim;
use crate::materials::{ConcreteDosage, Dosage, CEMENT_BAG_KG};

/// Tolerance used when rounding counts up, so that 3.0 / 0.15 counts 20 ties
/// and not 21.
const COUNT_TOLERANCE: f64 = 1e-9;

/// Round a non-negative quantity up to a whole count.
///
/// Values within a small tolerance of an integer snap to it. Negative or
/// non-finite inputs count as 0.
pub fn ceil_count(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let nearest = value.round();
    if (value - nearest).abs() < COUNT_TOLERANCE {
        nearest as u64
    } else {
        value.ceil() as u64
    }
}

/// Whole cement bags needed for a cement mass
pub fn cement_bags(cement_kg: f64) -> u64 {
    ceil_count(cement_kg / CEMENT_BAG_KG)
}

/// Materials for a concrete volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ConcreteMaterials {
    pub cement_kg: f64,
    pub cement_bags: u64,
    pub sand_m3: f64,
    pub gravel_m3: f64,
    pub water_l: f64,
}

impl ConcreteMaterials {
    /// Add another set of materials. Bags are summed as counted, not
    /// recomputed from the summed mass.
    pub fn accumulate(&mut self, other: &ConcreteMaterials) {
        self.cement_kg += other.cement_kg;
        self.cement_bags += other.cement_bags;
        self.sand_m3 += other.sand_m3;
        self.gravel_m3 += other.gravel_m3;
        self.water_l += other.water_l;
    }
}

/// Materials for a mortar or plaster volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BinderMaterials {
    pub cement_kg: f64,
    pub cement_bags: u64,
    pub sand_m3: f64,
}

/// Cement, sand, gravel and water for `volume_m3` of concrete.
///
/// ```rust
/// use calc_core::calculations::convert::concrete_materials;
/// use calc_core::materials::concrete;
///
/// let m = concrete_materials(10.0, concrete::lookup("350").unwrap());
/// assert_eq!(m.cement_bags, 70);
/// assert_eq!(m.water_l, 1750.0);
/// ```
pub fn concrete_materials(volume_m3: f64, dosage: &ConcreteDosage) -> ConcreteMaterials {
    let volume = dim(volume_m3);
    let cement_kg = volume * dosage.cement_kg_per_m3;
    ConcreteMaterials {
        cement_kg,
        cement_bags: cement_bags(cement_kg),
        sand_m3: volume * dosage.sand_m3_per_m3,
        gravel_m3: volume * dosage.gravel_m3_per_m3,
        water_l: volume * dosage.water_l_per_m3,
    }
}

/// Cement and sand for `volume_m3` of mortar or plaster
pub fn binder_materials<D: Dosage + ?Sized>(volume_m3: f64, dosage: &D) -> BinderMaterials {
    let volume = dim(volume_m3);
    let cement_kg = volume * dosage.cement_kg_per_m3();
    BinderMaterials {
        cement_kg,
        cement_bags: cement_bags(cement_kg),
        sand_m3: volume * dosage.sand_m3_per_m3(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{concrete, mortar};

    #[test]
    fn test_concrete_350_ten_cubic_meters() {
        let m = concrete_materials(10.0, concrete::lookup("350").unwrap());
        assert_eq!(m.cement_bags, 70);
        assert!((m.cement_kg - 3500.0).abs() < 1e-9);
        assert!((m.sand_m3 - 4.0).abs() < 1e-9);
        assert!((m.gravel_m3 - 6.0).abs() < 1e-9);
        assert!((m.water_l - 1750.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_volume_is_all_zero() {
        let m = concrete_materials(0.0, concrete::lookup("250").unwrap());
        assert_eq!(m, ConcreteMaterials::default());
    }

    #[test]
    fn test_negative_volume_clamped() {
        let m = binder_materials(-3.0, mortar::lookup_plaster("300").unwrap());
        assert_eq!(m, BinderMaterials::default());
    }

    #[test]
    fn test_cement_bags_monotonic() {
        let mix = concrete::lookup("300").unwrap();
        let mut previous = 0;
        for step in 0..200 {
            let volume = step as f64 * 0.037;
            let bags = concrete_materials(volume, mix).cement_bags;
            assert!(bags >= previous);
            previous = bags;
        }
    }

    #[test]
    fn test_ceil_count() {
        assert_eq!(ceil_count(3.0 / 0.15), 20);
        assert_eq!(ceil_count(20.2), 21);
        assert_eq!(ceil_count(0.0), 0);
        assert_eq!(ceil_count(f64::NAN), 0);
        assert_eq!(ceil_count(-4.0), 0);
        assert_eq!(cement_bags(51.0), 2);
    }

    #[test]
    fn test_accumulate_sums_bags() {
        let mix = concrete::lookup("350").unwrap();
        let mut total = concrete_materials(0.1, mix);
        total.accumulate(&concrete_materials(0.1, mix));
        // 35 kg each rounds up to one bag each
        assert_eq!(total.cement_bags, 2);
        assert!((total.cement_kg - 70.0).abs() < 1e-9);
    }
}
