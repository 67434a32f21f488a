//! # stagegate-logic
//!
//! Adapter for an optional, separately installed declarative logic engine
//! used to cross-validate financial metrics.
//!
//! [`ExternalEngine`] implements [`LogicEngine`](stagegate_core::traits::LogicEngine).
//! When the engine binary is missing, disabled, slow or failing, queries
//! return `None` and the metrics evaluator uses its local comparison.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use stagegate_logic::{EngineConfig, ExternalEngine};
//!
//! let engine = ExternalEngine::new(&EngineConfig::default())?;
//! if engine.is_available() {
//!     // Hand it to stagegate_core::MetricEvaluator::new(Box::new(engine)).
//! }
//! ```

pub mod config;
pub mod engine;

pub use config::EngineConfig;
pub use engine::ExternalEngine;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use stagegate_contracts::error::StageGateError;

    use crate::EngineConfig;

    #[test]
    fn defaults_apply_to_empty_document() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.enabled);
        assert_eq!(config.binary, "swipl");
        assert_eq!(config.rule_file, PathBuf::from("rules/validation_core.pl"));
        assert_eq!(config.timeout_ms, 5_000);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config = EngineConfig::from_toml_str(
            r#"
            binary = "/opt/swipl/bin/swipl"
            timeout_ms = 1500
        "#,
        )
        .unwrap();
        assert_eq!(config.binary, "/opt/swipl/bin/swipl");
        assert_eq!(config.timeout_ms, 1500);
        assert!(config.enabled);
    }

    #[test]
    fn parse_error_is_config_error() {
        match EngineConfig::from_toml_str("timeout_ms = \"soon\"") {
            Err(StageGateError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse engine TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineConfig::from_file(&dir.path().join("engine.toml"));
        assert!(matches!(result, Err(StageGateError::ConfigError { .. })));
    }
}
