//! Technology audit result types.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Approved,
    Reconsider,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Approved => f.write_str("✓ Approved"),
            Recommendation::Reconsider => f.write_str("⚠ Reconsider"),
        }
    }
}

/// The audit of a single named technology against the three policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechChoice {
    pub tech: String,
    /// Complexity-avoidance passed (simple, or no known simpler alternative).
    pub simpler_checked: bool,
    pub ai_friendly: bool,
    pub deploy_simple: bool,
    pub recommendation: Recommendation,
    /// The suggested simpler alternative, when complexity-avoidance failed.
    pub warning: Option<String>,
}

/// The aggregate audit over a whole technology list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackAudit {
    /// True only if every choice is approved.
    pub valid: bool,
    pub tech_choices: Vec<TechChoice>,
    pub overall: String,
}
