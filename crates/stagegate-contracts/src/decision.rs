//! Decision trail record types.
//!
//! A `DecisionRecord` captures one free-form decision together with the
//! alternatives that were considered and the conditions under which the
//! chosen path stays viable.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Business impact of a decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    #[default]
    High,
    Medium,
    Low,
}

/// How hard a decision is to undo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reversibility {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        })
    }
}

impl fmt::Display for Reversibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reversibility::Easy => "easy",
            Reversibility::Medium => "medium",
            Reversibility::Hard => "hard",
        })
    }
}

/// Provenance attached to every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionMeta {
    pub client: String,
    pub framework: String,
    pub version: String,
}

/// A single logged decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: uuid::Uuid,
    pub timestamp: DateTime<Utc>,
    pub topic: String,
    pub chosen: String,
    pub alternatives: Vec<String>,
    pub rationale: String,
    /// "Works IF …" conditions for the chosen path.
    pub viability_conditions: String,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    pub impact: Impact,
    pub reversibility: Reversibility,
    #[serde(default)]
    pub trade_offs: BTreeMap<String, String>,
    pub meta: DecisionMeta,
}
