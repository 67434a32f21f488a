//! External engine configuration.
//!
//! The rule file location is always an explicit value; it is never derived
//! from where the binary happens to be installed.
//!
//! Example:
//! ```toml
//! enabled = true
//! binary = "swipl"
//! rule_file = "rules/validation_core.pl"
//! timeout_ms = 5000
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use stagegate_contracts::error::{StageGateError, StageGateResult};

pub const DEFAULT_BINARY: &str = "swipl";
pub const DEFAULT_RULE_FILE: &str = "rules/validation_core.pl";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// When false the engine is never probed and every query falls back.
    pub enabled: bool,
    /// Executable name (resolved on `PATH`) or path.
    pub binary: String,
    /// The rule file consulted by every query.
    pub rule_file: PathBuf,
    /// Hard limit on a single query.
    pub timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            binary: DEFAULT_BINARY.to_string(),
            rule_file: PathBuf::from(DEFAULT_RULE_FILE),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `StageGateError::ConfigError` if the TOML is malformed or
    /// does not match `EngineConfig`.
    pub fn from_toml_str(s: &str) -> StageGateResult<Self> {
        toml::from_str(s).map_err(|e| StageGateError::ConfigError {
            reason: format!("failed to parse engine TOML: {}", e),
        })
    }

    /// Read and parse the TOML file at `path`.
    pub fn from_file(path: &Path) -> StageGateResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| StageGateError::ConfigError {
            reason: format!("failed to read engine config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// A configuration that never touches an external engine.
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }
}
