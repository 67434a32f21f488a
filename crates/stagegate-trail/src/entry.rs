//! Trail entry types.
//!
//! `TrailEntry` is one line of `decisions.jsonl`: a `DecisionRecord` wrapped
//! with its sequence number and the SHA-256 hashes that link it to the
//! previous line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stagegate_contracts::decision::DecisionRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailEntry {
    /// Position in the trail, starting at 0.
    pub sequence: u64,

    pub record: DecisionRecord,

    /// SHA-256 hash (hex) of the previous entry, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// SHA-256 hash (hex) over (client, sequence, prev_hash, record JSON).
    pub this_hash: String,
}

impl TrailEntry {
    /// The sentinel `prev_hash` of the first entry in every trail.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// Everything needed to pick a plan B for a topic.
///
/// Built from the most recent decision whose topic matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativePaths {
    pub current_choice: String,
    pub alternatives: Vec<String>,
    pub conditions_for_current: String,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}
