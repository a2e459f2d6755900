//! # Form State and Estimate Report
//!
//! `FormState` is the root container for everything the user has entered, one
//! field per tab. It is a plain value: the UI layer owns and mutates it, and
//! hands a reference to [`estimate`] whenever something changes.
//!
//! ## Structure
//!
//! ```text
//! FormState
//! ├── concrete: ConcreteInput (work-items → components)
//! ├── masonry: MasonryInput (block size, walls)
//! ├── plaster: PlasterInput (thickness, dosage)
//! ├── waterproofing: WaterproofingInput (consumption, layers, extra areas)
//! └── steel: SteelInput (members)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::form_state::{estimate, FormState};
//!
//! let state = FormState::sample();
//! let report = estimate(&state);
//! assert!(report.concrete.total_volume_m3 > 0.0);
//!
//! // Snapshots are plain JSON
//! let json = serde_json::to_string_pretty(&state).unwrap();
//! let back: FormState = serde_json::from_str(&json).unwrap();
//! assert_eq!(estimate(&back), report);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::bridge::{surface_input, SurfaceInput};
use crate::calculations::concrete::{self, ConcreteInput, ConcreteResult, WorkItem};
use crate::calculations::geometry::{ConcreteComponent, SurfaceComponent, WallComponent};
use crate::calculations::masonry::{self, MasonryInput, MasonryResult};
use crate::calculations::plaster::{self, PlasterInput, PlasterResult};
use crate::calculations::steel::{
    self, LongitudinalBars, MemberType, SteelInput, SteelMemberInput, SteelResult, TransversalBars, TieType,
};
use crate::calculations::waterproofing::{self, WaterproofingInput, WaterproofingResult};
use crate::calculations::Outcome;

/// Everything entered in every tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FormState {
    #[serde(default)]
    pub concrete: ConcreteInput,
    #[serde(default)]
    pub masonry: MasonryInput,
    #[serde(default)]
    pub plaster: PlasterInput,
    #[serde(default)]
    pub waterproofing: WaterproofingInput,
    #[serde(default)]
    pub steel: SteelInput,
}

impl FormState {
    /// A small house: footings and frame in concrete, block walls, render,
    /// foundation waterproofing and the matching rebar.
    pub fn sample() -> Self {
        FormState {
            concrete: ConcreteInput {
                work_items: vec![
                    WorkItem::new("Fondations", "250")
                        .with_component(ConcreteComponent::rectangular("Semelles isolées", 1.0, 1.0, 0.3).with_quantity(6))
                        .with_component(ConcreteComponent::rectangular("Longrines", 24.0, 0.2, 0.3)),
                    WorkItem::new("Structure", "350")
                        .with_component(ConcreteComponent::rectangular("Poteaux", 0.2, 0.2, 3.0).with_quantity(6))
                        .with_component(ConcreteComponent::cylindrical("Poteaux ronds", 0.3, 3.0).with_quantity(2))
                        .with_component(ConcreteComponent::rectangular("Poutres", 6.0, 0.2, 0.4).with_quantity(4)),
                ],
            },
            masonry: MasonryInput {
                mortar_dosage: Some("300".to_string()),
                components: vec![
                    WallComponent::new("Façade principale", 10.0, 2.5),
                    WallComponent::new("Mur latéral", 8.0, 2.5),
                ],
                ..MasonryInput::default()
            },
            plaster: PlasterInput::default(),
            waterproofing: WaterproofingInput {
                components: vec![
                    SurfaceComponent::new("Fondations", 50.0),
                    SurfaceComponent::new("Murs enterrés", 30.0),
                ],
                ..WaterproofingInput::default()
            },
            steel: SteelInput {
                members: vec![
                    SteelMemberInput {
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
                    },
                    SteelMemberInput {
                        member_type: MemberType::Column,
                        quantity: 4,
                        ..SteelMemberInput::rectangular_beam("Poteaux P1", 3.0, 0.3, 0.3)
                    },
                ],
            },
        }
    }
}

/// Derived quantities for every tab.
///
/// Tabs that can fail as a whole carry an [`Outcome`]; the concrete and steel
/// tabs report failures per work-item or per member instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    pub concrete: ConcreteResult,
    pub masonry: Outcome<MasonryResult>,
    /// Wall surface handed from masonry to plaster and waterproofing
    pub wall_surface: SurfaceInput,
    pub plaster: Outcome<PlasterResult>,
    pub waterproofing: Outcome<WaterproofingResult>,
    pub steel: SteelResult,
}

/// Run every calculator over a form snapshot.
pub fn estimate(state: &FormState) -> EstimateReport {
    let wall_surface = surface_input(&state.masonry);

    EstimateReport {
        concrete: concrete::calculate(&state.concrete),
        masonry: masonry::calculate(&state.masonry).into(),
        wall_surface,
        plaster: plaster::calculate(&state.plaster, wall_surface).into(),
        waterproofing: waterproofing::calculate(&state.waterproofing, wall_surface).into(),
        steel: steel::calculate(&state.steel),
    }
}
