//! Top-level validator configuration.
//!
//! Example:
//! ```toml
//! [engine]
//! binary = "swipl"
//! rule_file = "rules/validation_core.pl"
//! timeout_ms = 5000
//!
//! [stack]
//! complex_deploy = ["kubernetes", "k8s", "docker-compose", "nomad"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use stagegate_contracts::error::{StageGateError, StageGateResult};
use stagegate_logic::EngineConfig;
use stagegate_stack::StackPolicy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub engine: EngineConfig,
    pub stack: StackPolicy,
}

impl ValidatorConfig {
    pub fn from_toml_str(s: &str) -> StageGateResult<Self> {
        toml::from_str(s).map_err(|e| StageGateError::ConfigError {
            reason: format!("failed to parse validator TOML: {}", e),
        })
    }

    pub fn from_file(path: &Path) -> StageGateResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| StageGateError::ConfigError {
            reason: format!("failed to read validator config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Defaults with the external engine switched off.
    pub fn fallback_only() -> Self {
        Self { engine: EngineConfig::disabled(), stack: StackPolicy::default() }
    }
}
