//! Threshold metrics: ROI, LTV:CAC and margin.
//!
//! The evaluator always computes the numeric readout itself. A logic engine
//! is consulted only for the boolean verdict, and its confirmation is
//! accepted only when it agrees with the local threshold comparison, so the
//! external and fallback paths can never disagree on `valid`.

use tracing::{debug, warn};

use stagegate_contracts::{
    error::{StageGateError, StageGateResult},
    metric::{Metric, MetricResult, ValidatedBy},
};

use crate::traits::{FallbackEngine, LogicEngine};

/// Minimum acceptable `(revenue - costs) / costs`.
pub const ROI_THRESHOLD: f64 = 1.5;
/// Minimum acceptable `ltv / cac`.
pub const LTV_CAC_THRESHOLD: f64 = 3.0;
/// Minimum acceptable margin, in percent.
pub const MARGIN_THRESHOLD: f64 = 20.0;

/// One metric request: the metric and its two numeric operands.
///
/// Operand order is `(revenue, costs)` for ROI and margin, `(ltv, cac)` for
/// LTV:CAC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricCheck {
    pub metric: Metric,
    pub lhs: f64,
    pub rhs: f64,
}

impl MetricCheck {
    pub fn roi(revenue: f64, costs: f64) -> Self {
        Self { metric: Metric::Roi, lhs: revenue, rhs: costs }
    }

    pub fn ltv_cac(ltv: f64, cac: f64) -> Self {
        Self { metric: Metric::LtvCac, lhs: ltv, rhs: cac }
    }

    pub fn margin(revenue: f64, costs: f64) -> Self {
        Self { metric: Metric::Margin, lhs: revenue, rhs: costs }
    }

    /// The fixed threshold for this metric.
    pub fn threshold(&self) -> f64 {
        match self.metric {
            Metric::Roi => ROI_THRESHOLD,
            Metric::LtvCac => LTV_CAC_THRESHOLD,
            Metric::Margin => MARGIN_THRESHOLD,
        }
    }

    /// True if `value` meets the threshold (inclusive).
    pub fn passes(&self, value: f64) -> bool {
        value >= self.threshold()
    }

    /// Compute the metric value, checking its preconditions.
    pub fn compute(&self) -> StageGateResult<f64> {
        if !self.lhs.is_finite() || !self.rhs.is_finite() {
            return Err(StageGateError::InvalidInput {
                reason: format!("{} inputs must be finite numbers", self.metric),
            });
        }

        let value = match self.metric {
            Metric::Roi => {
                let (revenue, costs) = (self.lhs, self.rhs);
                if costs <= 0.0 {
                    return Err(invalid("costs must be positive"));
                }
                (revenue - costs) / costs
            }
            Metric::LtvCac => {
                let (ltv, cac) = (self.lhs, self.rhs);
                if cac <= 0.0 {
                    return Err(invalid("cac must be positive"));
                }
                ltv / cac
            }
            Metric::Margin => {
                let (revenue, costs) = (self.lhs, self.rhs);
                if revenue <= 0.0 {
                    return Err(invalid("revenue must be positive"));
                }
                (revenue - costs) / revenue * 100.0
            }
        };

        if !value.is_finite() {
            return Err(StageGateError::InvalidInput {
                reason: format!("{} result is not a finite number", self.metric),
            });
        }
        Ok(value)
    }

    fn verdict_reason(&self, valid: bool) -> &'static str {
        match (self.metric, valid) {
            (Metric::Roi, true) => "ROI acceptable",
            (Metric::Roi, false) => "ROI below 1.5x threshold",
            (Metric::LtvCac, true) => "Unit economics strong",
            (Metric::LtvCac, false) => "LTV:CAC below 3:1 threshold",
            (Metric::Margin, true) => "Margin acceptable",
            (Metric::Margin, false) => "Margin below 20% threshold",
        }
    }
}

fn invalid(reason: &str) -> StageGateError {
    StageGateError::InvalidInput { reason: reason.to_string() }
}

/// Facade over the selected logic engine.
///
/// Construct once with the engine chosen at startup; evaluation never
/// re-probes or switches engines.
pub struct MetricEvaluator {
    engine: Box<dyn LogicEngine>,
}

impl MetricEvaluator {
    pub fn new(engine: Box<dyn LogicEngine>) -> Self {
        Self { engine }
    }

    /// An evaluator that never consults anything but the local comparison.
    pub fn fallback_only() -> Self {
        Self::new(Box::new(FallbackEngine))
    }

    /// The engine kind selected at construction.
    pub fn engine_kind(&self) -> ValidatedBy {
        self.engine.kind()
    }

    pub fn evaluate_roi(&self, revenue: f64, costs: f64) -> MetricResult {
        self.evaluate(MetricCheck::roi(revenue, costs))
    }

    pub fn evaluate_ltv_cac(&self, ltv: f64, cac: f64) -> MetricResult {
        self.evaluate(MetricCheck::ltv_cac(ltv, cac))
    }

    pub fn evaluate_margin(&self, revenue: f64, costs: f64) -> MetricResult {
        self.evaluate(MetricCheck::margin(revenue, costs))
    }

    /// Judge one metric check.
    ///
    /// Precondition failures never reach the engine and come back as
    /// `valid: false, value: None`.
    pub fn evaluate(&self, check: MetricCheck) -> MetricResult {
        let threshold = check.threshold();

        let value = match check.compute() {
            Ok(value) => value,
            Err(e) => {
                debug!(metric = %check.metric, reason = %e, "metric precondition failed");
                return MetricResult {
                    metric: check.metric,
                    valid: false,
                    value: None,
                    threshold,
                    reason: e.to_string(),
                    validated_by: ValidatedBy::Fallback,
                };
            }
        };

        let local_valid = check.passes(value);

        let validated_by = match (self.engine.kind(), self.engine.confirm(&check)) {
            (ValidatedBy::External, Some(true)) if local_valid => ValidatedBy::External,
            (ValidatedBy::External, Some(true)) => {
                warn!(
                    metric = %check.metric,
                    value,
                    threshold,
                    "external engine confirmed a value below threshold; using fallback verdict"
                );
                ValidatedBy::Fallback
            }
            _ => ValidatedBy::Fallback,
        };

        debug!(
            metric = %check.metric,
            value,
            threshold,
            valid = local_valid,
            validated_by = ?validated_by,
            "metric evaluated"
        );

        MetricResult {
            metric: check.metric,
            valid: local_valid,
            value: Some(value),
            threshold,
            reason: check.verdict_reason(local_valid).to_string(),
            validated_by,
        }
    }
}

impl Default for MetricEvaluator {
    fn default() -> Self {
        Self::fallback_only()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
