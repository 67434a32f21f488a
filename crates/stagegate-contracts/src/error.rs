//! Error types for the stagegate engine.
//!
//! Validation itself never fails: `InvalidInput` and `UnknownGate` are
//! rendered into the `reason` of a structured result, and
//! `EngineUnavailable` is absorbed by the external engine adapter. Only
//! configuration and decision trail I/O surface as `Err`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageGateError {
    /// A metric precondition failed (non-positive denominator, out-of-range value).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The phase identifier does not name one of the five gates.
    #[error("unknown phase: {phase}")]
    UnknownGate { phase: String },

    /// The external logic engine could not be used for a query.
    #[error("external engine unavailable: {reason}")]
    EngineUnavailable { reason: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The decision trail could not persist a record.
    #[error("decision trail write failed: {reason}")]
    TrailWriteFailed { reason: String },

    /// The decision trail could not be read back.
    #[error("decision trail read failed: {reason}")]
    TrailReadFailed { reason: String },

    /// A result could not be serialized for output.
    #[error("failed to serialize output: {reason}")]
    Serialization { reason: String },

    /// A stored decision trail entry no longer matches its hash link.
    #[error("decision trail integrity violated: {reason}")]
    TrailIntegrity { reason: String },
}

pub type StageGateResult<T> = Result<T, StageGateError>;
