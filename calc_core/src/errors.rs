//! # Error Types
//!
//! Structured error types for calc_core. Every error is serializable so that a
//! result record can carry the reason a tab or an item was not computed, and
//! the display layer can explain it instead of showing a bare zero.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_spacing(spacing_m: f64) -> CalcResult<()> {
//!     if spacing_m <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "spacing_m".to_string(),
//!             value: spacing_m.to_string(),
//!             reason: "Spacing must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for estimation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, degenerate geometry, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Dosage key not present in the reference table
    #[error("Unknown {table} dosage: {key}")]
    UnknownDosage { table: String, key: String },

    /// Rebar diameter not present in the linear-weight table
    #[error("Unknown rebar diameter: HA{diameter_mm}")]
    UnknownDiameter { diameter_mm: u32 },

    /// Member type, section shape and tie type do not form a valid combination
    #[error("Invalid member '{member}': {reason}")]
    InvalidMember { member: String, reason: String },

    /// The masonry tab defines no wall surface to work from
    #[error("No surface defined for {calculator}")]
    NoSurfaceDefined { calculator: String },

    /// Local store I/O error
    #[error("Store error: {operation} on '{key}' - {reason}")]
    StoreError {
        operation: String,
        key: String,
        reason: String,
    },

    /// Store file is locked by another process
    #[error("Store locked: '{path}'")]
    StoreLocked { path: String },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownDosage error
    pub fn unknown_dosage(table: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::UnknownDosage {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create an InvalidMember error
    pub fn invalid_member(member: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidMember {
            member: member.into(),
            reason: reason.into(),
        }
    }

    /// Create a NoSurfaceDefined error
    pub fn no_surface(calculator: impl Into<String>) -> Self {
        CalcError::NoSurfaceDefined {
            calculator: calculator.into(),
        }
    }

    /// Create a StoreError
    pub fn store_error(operation: impl Into<String>, key: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::StoreError {
            operation: operation.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::StoreLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::UnknownDosage { .. } => "UNKNOWN_DOSAGE",
            CalcError::UnknownDiameter { .. } => "UNKNOWN_DIAMETER",
            CalcError::InvalidMember { .. } => "INVALID_MEMBER",
            CalcError::NoSurfaceDefined { .. } => "NO_SURFACE_DEFINED",
            CalcError::StoreError { .. } => "STORE_ERROR",
            CalcError::StoreLocked { .. } => "STORE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::serialization(e.to_string())
    }
}
