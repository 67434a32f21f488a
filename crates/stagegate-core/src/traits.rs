//! The reasoning seam between the metrics evaluator and a logic engine.
//!
//! Two implementations exist:
//!
//! - `FallbackEngine` (this crate): the local threshold comparison
//! - `ExternalEngine` (stagegate-logic): an external declarative rule engine
//!
//! The `MetricEvaluator` is handed exactly one of them at construction and
//! never re-selects.

use stagegate_contracts::metric::ValidatedBy;

use crate::metrics::MetricCheck;

/// A reasoning path able to confirm whether a metric check passes.
pub trait LogicEngine: Send + Sync {
    /// Which path this engine represents in `MetricResult::validated_by`.
    fn kind(&self) -> ValidatedBy;

    /// Ask the engine whether `check` satisfies its threshold.
    ///
    /// `Some(true)` confirms, `Some(false)` rejects, and `None` means the
    /// engine could not be used for this query. Implementations must never
    /// panic or block beyond their own bounded timeout.
    fn confirm(&self, check: &MetricCheck) -> Option<bool>;
}

/// The deterministic local engine. It answers every query it can compute.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEngine;

impl LogicEngine for FallbackEngine {
    fn kind(&self) -> ValidatedBy {
        ValidatedBy::Fallback
    }

    fn confirm(&self, check: &MetricCheck) -> Option<bool> {
        check.compute().ok().map(|value| check.passes(value))
    }
}
