//! # Reinforcing Steel Estimate
//!
//! Weight of longitudinal bars and transversal ties for reinforced-concrete
//! members, rolled up by bar diameter into commercial 12 m bars.
//!
//! ## Member model
//!
//! The form sends a flat [`SteelMemberInput`]. It converts into a typed
//! [`SteelMember`] with `TryFrom`, which is where invalid combinations are
//! rejected:
//!
//! - beams and footings always have a rectangular section
//! - columns have a rectangular or a circular section
//! - only rectangular sections choose between stirrups and hairpins; circular
//!   sections always use closed circular ties
//!
//! ## Formulas
//!
//! - longitudinal length = member length × bar count × quantity
//! - stirrup length = 2 × ((w − 2c) + (h − 2c))
//! - hairpin length = (w − 2c) + 2 × (h − 2c)
//! - circular tie length = π × (d − 2c)
//! - tie count = ceil(member length / spacing)
//! - commercial bars = ceil(total length for a diameter / 12 m)
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::steel::{steel_for, SteelMember, SteelMemberInput};
//!
//! let input = SteelMemberInput::rectangular_beam("Poutre", 3.0, 0.3, 0.3);
//! let member = SteelMember::try_from(&input).unwrap();
//! let steel = steel_for(&member).unwrap();
//! assert_eq!(steel.tie_count, 20);
//! ```

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::convert::ceil_count;
use super::Outcome;
use crate::errors::{CalcError, CalcResult};
use crate::materials::rebar::{self, COMMERCIAL_BAR_LENGTH_M};

/// Default concrete cover (m)
pub const DEFAULT_COATING_M: f64 = 0.025;

/// Structural role of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberType {
    /// Poutre
    #[default]
    #[serde(alias = "poutre")]
    Beam,
    /// Poteau
    #[serde(alias = "poteau")]
    Column,
    /// Semelle
    #[serde(alias = "semelle")]
    Footing,
}

/// Cross-section shape as entered in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SectionShape {
    #[default]
    Rectangular,
    Circular,
}

/// Transversal tie style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieType {
    /// Closed tie (cadre / étrier)
    #[default]
    #[serde(alias = "etrier")]
    Stirrup,
    /// Open U-shaped tie (épingle)
    #[serde(alias = "epingle")]
    Hairpin,
}

/// Main bars running along the member
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LongitudinalBars {
    /// HA diameter (mm)
    pub diameter_mm: u32,
    /// Number of bars in the section
    pub count: u32,
}

/// Ties as entered in the form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TransversalBars {
    pub tie_type: TieType,
    /// HA diameter (mm)
    pub diameter_mm: u32,
    /// Centre-to-centre spacing along the member (m)
    pub spacing_m: f64,
}

fn default_quantity() -> u32 {
    1
}

fn default_coating() -> f64 {
    DEFAULT_COATING_M
}

/// Flat member record as sent by the form.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Poteaux P1",
///   "member_type": "column",
///   "shape": "rectangular",
///   "width_m": 0.3,
///   "height_m": 0.3,
///   "length_m": 3.0,
///   "quantity": 4,
///   "longitudinal_bars": { "diameter_mm": 10, "count": 4 },
///   "transversal_bars": { "tie_type": "stirrup", "diameter_mm": 6, "spacing_m": 0.15 },
///   "coating_m": 0.025
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelMemberInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub member_type: MemberType,
    #[serde(default)]
    pub shape: SectionShape,
    /// Section width (m), rectangular only
    #[serde(default)]
    pub width_m: f64,
    /// Section height (m), rectangular only
    #[serde(default)]
    pub height_m: f64,
    /// Section diameter (m), circular only
    #[serde(default)]
    pub diameter_m: f64,
    /// Member length (m)
    #[serde(default)]
    pub length_m: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub longitudinal_bars: LongitudinalBars,
    #[serde(default)]
    pub transversal_bars: TransversalBars,
    /// Concrete cover (m)
    #[serde(default = "default_coating")]
    pub coating_m: f64,
}

impl SteelMemberInput {
    /// Rectangular beam with 4 HA10 bars and HA6 stirrups every 15 cm
    pub fn rectangular_beam(name: impl Into<String>, length_m: f64, width_m: f64, height_m: f64) -> Self {
        SteelMemberInput {
            name: name.into(),
            member_type: MemberType::Beam,
            shape: SectionShape::Rectangular,
            width_m,
            height_m,
            diameter_m: 0.0,
            length_m,
            quantity: 1,
            longitudinal_bars: LongitudinalBars {
                diameter_mm: 10,
                count: 4,
            },
            transversal_bars: TransversalBars {
                tie_type: TieType::Stirrup,
                diameter_mm: 6,
                spacing_m: 0.15,
            },
            coating_m: DEFAULT_COATING_M,
        }
    }
}

/// Rectangular section with its tie style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularSection {
    pub width_m: f64,
    pub height_m: f64,
    pub tie: TieType,
}

/// Circular section; ties are always closed circles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularSection {
    pub diameter_m: f64,
}

/// Sections a column can have
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSection {
    Rectangular(RectangularSection),
    Circular(CircularSection),
}

/// Member role together with the sections that role allows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Beam(RectangularSection),
    Column(ColumnSection),
    Footing(RectangularSection),
}

/// Borrowed view of a member's section
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Section<'a> {
    Rectangular(&'a RectangularSection),
    Circular(&'a CircularSection),
}

impl MemberKind {
    pub fn section(&self) -> Section<'_> {
        match self {
            MemberKind::Beam(rect) | MemberKind::Footing(rect) => Section::Rectangular(rect),
            MemberKind::Column(ColumnSection::Rectangular(rect)) => Section::Rectangular(rect),
            MemberKind::Column(ColumnSection::Circular(circle)) => Section::Circular(circle),
        }
    }

    pub fn member_type(&self) -> MemberType {
        match self {
            MemberKind::Beam(_) => MemberType::Beam,
            MemberKind::Column(_) => MemberType::Column,
            MemberKind::Footing(_) => MemberType::Footing,
        }
    }
}

/// Tie bars once the tie style has moved onto the section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TieBars {
    pub diameter_mm: u32,
    pub spacing_m: f64,
}

/// A validated member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelMember {
    pub name: String,
    pub kind: MemberKind,
    pub length_m: f64,
    pub quantity: u32,
    pub longitudinal: LongitudinalBars,
    pub ties: TieBars,
    pub coating_m: f64,
}

impl TryFrom<&SteelMemberInput> for SteelMember {
    type Error = CalcError;

    fn try_from(input: &SteelMemberInput) -> CalcResult<Self> {
        let rectangular = RectangularSection {
            width_m: input.width_m,
            height_m: input.height_m,
            tie: input.transversal_bars.tie_type,
        };

        let kind = match (input.member_type, input.shape) {
            (MemberType::Beam, SectionShape::Rectangular) => MemberKind::Beam(rectangular),
            (MemberType::Footing, SectionShape::Rectangular) => MemberKind::Footing(rectangular),
            (MemberType::Column, SectionShape::Rectangular) => {
                MemberKind::Column(ColumnSection::Rectangular(rectangular))
            }
            (MemberType::Column, SectionShape::Circular) => {
                if input.transversal_bars.tie_type == TieType::Hairpin {
                    return Err(CalcError::invalid_member(
                        &input.name,
                        "Hairpin ties are not possible on a circular section",
                    ));
                }
                MemberKind::Column(ColumnSection::Circular(CircularSection {
                    diameter_m: input.diameter_m,
                }))
            }
            (_, SectionShape::Circular) => {
                return Err(CalcError::invalid_member(
                    &input.name,
                    "Only columns can have a circular section",
                ));
            }
        };

        Ok(SteelMember {
            name: input.name.clone(),
            kind,
            length_m: input.length_m,
            quantity: input.quantity,
            longitudinal: input.longitudinal_bars,
            ties: TieBars {
                diameter_mm: input.transversal_bars.diameter_mm,
                spacing_m: input.transversal_bars.spacing_m,
            },
            coating_m: input.coating_m,
        })
    }
}

impl SteelMember {
    /// Validate lengths, spacing and cover.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.length_m.is_finite() && self.length_m >= 0.0) {
            return Err(CalcError::invalid_input(
                "length_m",
                self.length_m.to_string(),
                "Length cannot be negative",
            ));
        }
        if !(self.ties.spacing_m.is_finite() && self.ties.spacing_m > 0.0) {
            return Err(CalcError::invalid_input(
                "spacing_m",
                self.ties.spacing_m.to_string(),
                "Tie spacing must be positive",
            ));
        }
        if !(self.coating_m.is_finite() && self.coating_m >= 0.0) {
            return Err(CalcError::invalid_input(
                "coating_m",
                self.coating_m.to_string(),
                "Cover cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Reduce a section dimension by the cover on both faces.
fn inner_dimension(field: &str, outer_m: f64, coating_m: f64) -> CalcResult<f64> {
    let inner = outer_m - 2.0 * coating_m;
    if !inner.is_finite() || inner < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            outer_m.to_string(),
            format!("Cover of {} m leaves no room for ties", coating_m),
        ));
    }
    Ok(inner)
}

/// Length of one tie (m).
///
/// Fails when the cover consumes a whole section dimension.
pub fn tie_length_m(section: Section<'_>, coating_m: f64) -> CalcResult<f64> {
    match section {
        Section::Rectangular(rect) => {
            let w = inner_dimension("width_m", rect.width_m, coating_m)?;
            let h = inner_dimension("height_m", rect.height_m, coating_m)?;
            Ok(match rect.tie {
                TieType::Stirrup => 2.0 * (w + h),
                TieType::Hairpin => w + 2.0 * h,
            })
        }
        Section::Circular(circle) => {
            let d = inner_dimension("diameter_m", circle.diameter_m, coating_m)?;
            Ok(PI * d)
        }
    }
}

/// Steel for one member (all `quantity` copies)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSteel {
    pub name: String,
    pub member_type: MemberType,
    pub longitudinal_diameter_mm: u32,
    pub longitudinal_length_m: f64,
    pub longitudinal_weight_kg: f64,
    pub tie_diameter_mm: u32,
    /// Length of a single tie (m)
    pub tie_length_m: f64,
    /// Ties per member
    pub tie_count: u64,
    pub transversal_length_m: f64,
    pub transversal_weight_kg: f64,
    pub total_weight_kg: f64,
}

/// Compute longitudinal and transversal steel for a member.
pub fn steel_for(member: &SteelMember) -> CalcResult<MemberSteel> {
    member.validate()?;
    let longi_kg_per_m = rebar::linear_weight(member.longitudinal.diameter_mm)?;
    let tie_kg_per_m = rebar::linear_weight(member.ties.diameter_mm)?;
    let quantity = member.quantity as f64;

    let longitudinal_length_m = member.length_m * member.longitudinal.count as f64 * quantity;
    let longitudinal_weight_kg = longitudinal_length_m * longi_kg_per_m;

    let single_tie_m = tie_length_m(member.kind.section(), member.coating_m)?;
    let tie_count = ceil_count(member.length_m / member.ties.spacing_m);
    let transversal_length_m = single_tie_m * tie_count as f64 * quantity;
    let transversal_weight_kg = transversal_length_m * tie_kg_per_m;

    Ok(MemberSteel {
        name: member.name.clone(),
        member_type: member.kind.member_type(),
        longitudinal_diameter_mm: member.longitudinal.diameter_mm,
        longitudinal_length_m,
        longitudinal_weight_kg,
        tie_diameter_mm: member.ties.diameter_mm,
        tie_length_m: single_tie_m,
        tie_count,
        transversal_length_m,
        transversal_weight_kg,
        total_weight_kg: longitudinal_weight_kg + transversal_weight_kg,
    })
}

/// Input for the steel tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SteelInput {
    #[serde(default)]
    pub members: Vec<SteelMemberInput>,
}

/// Totals for one bar diameter across all members
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DiameterTotals {
    pub length_m: f64,
    pub weight_kg: f64,
    /// 12 m bars to order
    pub commercial_bars: u64,
}

impl DiameterTotals {
    fn add(&mut self, length_m: f64, weight_kg: f64) {
        self.length_m += length_m;
        self.weight_kg += weight_kg;
        self.commercial_bars = ceil_count(self.length_m / COMMERCIAL_BAR_LENGTH_M);
    }
}

/// Result for the steel tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelResult {
    pub total_weight_kg: f64,
    /// One entry per member, same order as the input
    pub members: Vec<Outcome<MemberSteel>>,
    /// Keyed by HA diameter (mm), smallest first
    pub by_diameter: BTreeMap<u32, DiameterTotals>,
}

/// Estimate the steel tab. Invalid members are reported individually and
/// the rest still compute.
pub fn calculate(input: &SteelInput) -> SteelResult {
    let mut total_weight_kg = 0.0;
    let mut by_diameter: BTreeMap<u32, DiameterTotals> = BTreeMap::new();
    let mut members = Vec::with_capacity(input.members.len());

    for (index, member_input) in input.members.iter().enumerate() {
        let computed = SteelMember::try_from(member_input).and_then(|m| steel_for(&m));
        match computed {
            Ok(steel) => {
                total_weight_kg += steel.total_weight_kg;
                by_diameter
                    .entry(steel.longitudinal_diameter_mm)
                    .or_default()
                    .add(steel.longitudinal_length_m, steel.longitudinal_weight_kg);
                by_diameter
                    .entry(steel.tie_diameter_mm)
                    .or_default()
                    .add(steel.transversal_length_m, steel.transversal_weight_kg);
                members.push(Outcome::Computed(steel));
            }
            Err(error) => {
                debug!(index, error = %error, "steel member not computable");
                members.push(Outcome::not_computable(error));
            }
        }
    }

    SteelResult {
        total_weight_kg,
        members,
        by_diameter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(shape: SectionShape, tie_type: TieType) -> SteelMemberInput {
        SteelMemberInput {
            name: "P1".to_string(),
            member_type: MemberType::Column,
            shape,
            width_m: 0.3,
            height_m: 0.3,
            diameter_m: 0.3,
            length_m: 3.0,
            quantity: 4,
            longitudinal_bars: LongitudinalBars {
                diameter_mm: 10,
                count: 4,
            },
            transversal_bars: TransversalBars {
                tie_type,
                diameter_mm: 6,
                spacing_m: 0.15,
            },
            coating_m: 0.025,
        }
    }

    #[test]
    fn test_reference_stirrup_example() {
        let mut input = SteelMemberInput::rectangular_beam("Poutre", 3.0, 0.3, 0.3);
        input.coating_m = 0.025;
        let steel = steel_for(&SteelMember::try_from(&input).unwrap()).unwrap();

        assert!((steel.tie_length_m - 1.0).abs() < 1e-9);
        assert_eq!(steel.tie_count, 20);
        assert!((steel.transversal_weight_kg - 4.44).abs() < 1e-9);
        // 3 m × 4 bars × 0.617
        assert!((steel.longitudinal_weight_kg - 7.404).abs() < 1e-9);
        assert!((steel.total_weight_kg - (4.44 + 7.404)).abs() < 1e-9);
    }

    #[test]
    fn test_hairpin_length() {
        let rect = RectangularSection {
            width_m: 0.3,
            height_m: 0.5,
            tie: TieType::Hairpin,
        };
        // 0.25 + 2 × 0.45
        let length = tie_length_m(Section::Rectangular(&rect), 0.025).unwrap();
        assert!((length - 1.15).abs() < 1e-9);
    }

    #[test]
    fn test_circular_column() {
        let member = SteelMember::try_from(&column(SectionShape::Circular, TieType::Stirrup)).unwrap();
        let steel = steel_for(&member).unwrap();
        assert!((steel.tie_length_m - PI * 0.25).abs() < 1e-9);
        assert!((steel.transversal_length_m - PI * 0.25 * 20.0 * 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_circular_only_for_columns() {
        let mut input = column(SectionShape::Circular, TieType::Stirrup);
        input.member_type = MemberType::Beam;
        let err = SteelMember::try_from(&input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_MEMBER");

        input.member_type = MemberType::Footing;
        assert!(SteelMember::try_from(&input).is_err());
    }

    #[test]
    fn test_hairpin_rejected_on_circular() {
        let input = column(SectionShape::Circular, TieType::Hairpin);
        assert_eq!(
            SteelMember::try_from(&input).unwrap_err().error_code(),
            "INVALID_MEMBER"
        );
        // Same tie on a rectangular column is fine
        assert!(SteelMember::try_from(&column(SectionShape::Rectangular, TieType::Hairpin)).is_ok());
    }

    #[test]
    fn test_oversized_cover_not_computable() {
        let mut input = column(SectionShape::Rectangular, TieType::Stirrup);
        input.coating_m = 0.2;
        let member = SteelMember::try_from(&input).unwrap();
        let err = steel_for(&member).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_zero_spacing_not_computable() {
        let mut input = column(SectionShape::Rectangular, TieType::Stirrup);
        input.transversal_bars.spacing_m = 0.0;
        let member = SteelMember::try_from(&input).unwrap();
        assert!(steel_for(&member).is_err());
    }

    #[test]
    fn test_unknown_diameter() {
        let mut input = column(SectionShape::Rectangular, TieType::Stirrup);
        input.longitudinal_bars.diameter_mm = 18;
        let member = SteelMember::try_from(&input).unwrap();
        assert_eq!(
            steel_for(&member).unwrap_err(),
            CalcError::UnknownDiameter { diameter_mm: 18 }
        );
    }

    #[test]
    fn test_by_diameter_and_commercial_bars() {
        let beam = SteelMemberInput {
            longitudinal_bars: LongitudinalBars {
                diameter_mm: 12,
                count: 6,
            },
            transversal_bars: TransversalBars {
                tie_type: TieType::Stirrup,
                diameter_mm: 8,
                spacing_m: 0.2,
            },
            ..SteelMemberInput::rectangular_beam("Poutre principale", 6.0, 0.25, 0.4)
        };
        let input = SteelInput {
            members: vec![beam, column(SectionShape::Rectangular, TieType::Stirrup)],
        };
        let result = calculate(&input);

        assert_eq!(result.by_diameter.keys().copied().collect::<Vec<_>>(), vec![6, 8, 10, 12]);

        // HA12: 6 m × 6 bars = 36 m → 3 bars
        let ha12 = result.by_diameter[&12];
        assert!((ha12.length_m - 36.0).abs() < 1e-9);
        assert_eq!(ha12.commercial_bars, 3);

        // HA10: 3 m × 4 bars × 4 columns = 48 m → 4 bars
        let ha10 = result.by_diameter[&10];
        assert!((ha10.length_m - 48.0).abs() < 1e-9);
        assert_eq!(ha10.commercial_bars, 4);

        // HA8 ties: 2 × (0.2 + 0.35) = 1.1 m × 30 ties = 33 m → 3 bars
        let ha8 = result.by_diameter[&8];
        assert!((ha8.length_m - 33.0).abs() < 1e-9);
        assert_eq!(ha8.commercial_bars, 3);

        let sum: f64 = result.by_diameter.values().map(|d| d.weight_kg).sum();
        assert!((sum - result.total_weight_kg).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_member_does_not_block_others() {
        let mut bad = column(SectionShape::Circular, TieType::Stirrup);
        bad.member_type = MemberType::Beam;
        let input = SteelInput {
            members: vec![bad, column(SectionShape::Rectangular, TieType::Stirrup)],
        };
        let result = calculate(&input);
        assert!(result.members[0].computed().is_none());
        assert!(result.members[1].computed().is_some());
        assert!(result.total_weight_kg > 0.0);
    }

    #[test]
    fn test_input_json_with_french_aliases() {
        let json = r#"{
            "name": "Semelle filante",
            "member_type": "semelle",
            "width_m": 0.5, "height_m": 0.3, "length_m": 10.0,
            "longitudinal_bars": { "diameter_mm": 12, "count": 4 },
            "transversal_bars": { "tie_type": "epingle", "diameter_mm": 8, "spacing_m": 0.25 }
        }"#;
        let input: SteelMemberInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.quantity, 1);
        assert_eq!(input.coating_m, DEFAULT_COATING_M);
        let member = SteelMember::try_from(&input).unwrap();
        assert!(matches!(member.kind, MemberKind::Footing(RectangularSection { tie: TieType::Hairpin, .. })));
    }

    #[test]
    fn test_incomplete_rows_are_not_computable() {
        let json = r#"{
            "members": [
                { "name": "Sans espacement", "width_m": 0.3, "height_m": 0.3, "length_m": 3.0,
                  "longitudinal_bars": { "diameter_mm": 10, "count": 4 },
                  "transversal_bars": { "diameter_mm": 6 } },
                { "name": "Sans filants", "width_m": 0.3, "height_m": 0.3, "length_m": 3.0,
                  "transversal_bars": { "diameter_mm": 6, "spacing_m": 0.15 } },
                { "name": "Complet", "width_m": 0.3, "height_m": 0.3, "length_m": 3.0,
                  "longitudinal_bars": { "diameter_mm": 10, "count": 4 },
                  "transversal_bars": { "diameter_mm": 6, "spacing_m": 0.15 } }
            ]
        }"#;
        let input: SteelInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.members[0].transversal_bars.spacing_m, 0.0);
        assert_eq!(input.members[1].longitudinal_bars, LongitudinalBars::default());

        let result = calculate(&input);
        assert_eq!(result.members[0].error().map(|e| e.error_code()), Some("INVALID_INPUT"));
        assert_eq!(result.members[1].error().map(|e| e.error_code()), Some("UNKNOWN_DIAMETER"));
        assert!(result.members[2].computed().is_some());
        assert!(result.total_weight_kg > 0.0);
    }
}
