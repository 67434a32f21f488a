//! Financial metric result types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three financial ratios judged against fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Return on investment: `(revenue - costs) / costs`.
    Roi,
    /// Lifetime value over customer acquisition cost.
    LtvCac,
    /// Margin percentage: `(revenue - costs) / revenue * 100`.
    Margin,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Roi => "ROI",
            Metric::LtvCac => "LTV:CAC",
            Metric::Margin => "margin",
        };
        f.write_str(name)
    }
}

/// Which reasoning path produced the final verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatedBy {
    /// The external logic engine confirmed the result.
    External,
    /// The local threshold comparison decided.
    Fallback,
}

/// The outcome of judging one metric.
///
/// `value` is `None` only when a precondition (a positive denominator)
/// failed, and in that case `valid` is always `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub metric: Metric,
    pub valid: bool,
    /// The locally computed readout. The external engine never supplies it.
    pub value: Option<f64>,
    pub threshold: f64,
    pub reason: String,
    pub validated_by: ValidatedBy,
}
