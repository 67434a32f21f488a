//! Phase gate result types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One evaluated sub-criterion of a gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateCheck {
    /// Human-readable description of what was checked, e.g. "Market validated".
    pub label: String,
    pub passed: bool,
}

impl GateCheck {
    pub fn pass(label: impl Into<String>) -> Self {
        Self { label: label.into(), passed: true }
    }

    pub fn fail(label: impl Into<String>) -> Self {
        Self { label: label.into(), passed: false }
    }
}

impl fmt::Display for GateCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.passed { '✓' } else { '✗' };
        write!(f, "{} {}", marker, self.label)
    }
}

/// The decision for a single gate evaluation.
///
/// For every known gate, `valid` equals the logical AND of `checks[*].passed`.
/// An unknown gate carries no checks and is never valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateResult {
    pub valid: bool,
    /// Human label, e.g. "P1 → P2".
    pub gate: String,
    /// Every sub-criterion evaluated, in evaluation order.
    pub checks: Vec<GateCheck>,
    /// "PROCEED …" or "HALT …".
    pub decision: String,
    pub reason: String,
}

impl GateResult {
    /// The checks rendered for display, each prefixed with a pass/fail marker.
    pub fn rendered_checks(&self) -> Vec<String> {
        self.checks.iter().map(ToString::to_string).collect()
    }

    /// True if every recorded check passed.
    pub fn all_checks_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }
}
