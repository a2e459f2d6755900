//! # calc_core - Construction Quantity Estimation Engine
//!
//! `calc_core` is the computational heart of Metrical. It turns the dimensions
//! entered on a building site form into material quantities: concrete and its
//! ingredients, concrete blocks and laying mortar, render, waterproofing product
//! and reinforcing steel. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take a form snapshot and return quantities
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Never fatal**: Incomplete entries are reported as not computable, never panic
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::{estimate, FormState};
//!
//! let state = FormState::sample();
//! let report = estimate(&state);
//!
//! println!("Concrete: {:.2} m³", report.concrete.total_volume_m3);
//! println!("Steel: {:.1} kg", report.steel.total_weight_kg);
//! ```
//!
//! ## Modules
//!
//! - [`form_state`] - Root form container and the full estimate report
//! - [`calculations`] - Per-tab calculators (concrete, masonry, plaster, waterproofing, steel)
//! - [`materials`] - Dosage and rebar reference tables
//! - [`store`] - Snapshot persistence with debounced, atomic saves
//! - [`config`] - Store settings from TOML
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod errors;
pub mod form_state;
pub mod materials;
pub mod store;

// Re-export commonly used types at crate root for convenience
pub use calculations::Outcome;
pub use config::EstimatorConfig;
pub use errors::{CalcError, CalcResult};
pub use form_state::{estimate, EstimateReport, FormState};
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
pub use store::{FormPersistence, KeyValueStore, MemoryStore, StoredSnapshot};
