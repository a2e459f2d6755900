//! # Configuration
//!
//! Settings for the local snapshot store. All fields have defaults, so an
//! empty or partial TOML file is valid.
//!
//! ```toml
//! store_dir = ".metrical"
//! form_id = "chantier-dupont"
//! debounce_ms = 500
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Default debounce window between the last edit and the snapshot write
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Default form identifier used as the store key
pub const DEFAULT_FORM_ID: &str = "metrical-form";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Directory holding one JSON file per form identifier
    pub store_dir: PathBuf,
    /// Key under which the form snapshot is stored
    pub form_id: String,
    /// Debounce window for snapshot writes (ms)
    pub debounce_ms: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        EstimatorConfig {
            store_dir: PathBuf::from(".metrical"),
            form_id: DEFAULT_FORM_ID.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl EstimatorConfig {
    /// Parse a TOML document
    pub fn from_toml_str(contents: &str) -> CalcResult<Self> {
        toml::from_str(contents).map_err(|e| CalcError::serialization(format!("Invalid config: {}", e)))
    }

    /// Load a TOML file
    pub fn load(path: &Path) -> CalcResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CalcError::store_error("read config", path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
