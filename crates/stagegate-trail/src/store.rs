//! File-backed decision trail.
//!
//! Layout under the trail root:
//!
//!   client/<client>/decisions.jsonl             one `TrailEntry` per line
//!   client/<client>/decision_<stamp>_<seq>.md   one rendered record per decision
//!
//! The JSONL file is append-only. Within a process, appends are serialized
//! by a mutex so sequence numbers and hash links stay consistent.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, info};

use stagegate_contracts::{
    decision::{DecisionMeta, DecisionRecord, Impact, Reversibility},
    error::{StageGateError, StageGateResult},
};

use crate::{
    chain::{first_broken_link, hash_entry},
    entry::{AlternativePaths, TrailEntry},
    markdown::render_markdown,
};

const DECISIONS_FILE: &str = "decisions.jsonl";
const FRAMEWORK: &str = "stagegate";
const FORMAT_VERSION: &str = "1.0";

/// The caller-supplied part of a decision.
#[derive(Debug, Clone, Default)]
pub struct NewDecision {
    pub topic: String,
    pub chosen: String,
    pub alternatives: Vec<String>,
    pub rationale: String,
    pub viability_conditions: String,
    pub confidence: f64,
    pub impact: Impact,
    pub reversibility: Reversibility,
    pub trade_offs: BTreeMap<String, String>,
}

impl NewDecision {
    fn validate(&self) -> StageGateResult<()> {
        if self.topic.trim().is_empty() {
            return Err(StageGateError::InvalidInput { reason: "topic must not be empty".to_string() });
        }
        if self.chosen.trim().is_empty() {
            return Err(StageGateError::InvalidInput { reason: "chosen option must not be empty".to_string() });
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(StageGateError::InvalidInput {
                reason: format!("confidence must be within 0.0..=1.0, got {}", self.confidence),
            });
        }
        Ok(())
    }
}

/// The decision trail of one client.
#[derive(Debug)]
pub struct DecisionTrail {
    client: String,
    dir: PathBuf,
    decisions_file: PathBuf,
    append_lock: Mutex<()>,
}

impl DecisionTrail {
    /// Open (creating if needed) the trail for `client` under `root`.
    pub fn open(root: &Path, client: &str) -> StageGateResult<Self> {
        let client = client.trim();
        if client.is_empty() || client.contains(['/', '\\']) || client == "." || client == ".." {
            return Err(StageGateError::InvalidInput {
                reason: format!("invalid client name '{}'", client),
            });
        }

        let dir = root.join("client").join(client);
        fs::create_dir_all(&dir).map_err(|e| StageGateError::TrailWriteFailed {
            reason: format!("failed to create '{}': {}", dir.display(), e),
        })?;

        Ok(Self {
            client: client.to_string(),
            decisions_file: dir.join(DECISIONS_FILE),
            dir,
            append_lock: Mutex::new(()),
        })
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn decisions_file(&self) -> &Path {
        &self.decisions_file
    }

    /// Validate, link, render and append one decision.
    ///
    /// Returns the stored record. On any error nothing is committed to the
    /// JSONL file. The markdown path is logged at `info`.
    pub fn log_decision(&self, decision: NewDecision) -> StageGateResult<DecisionRecord> {
        decision.validate()?;

        let _guard = self.append_lock.lock().map_err(|e| StageGateError::TrailWriteFailed {
            reason: format!("trail lock poisoned: {}", e),
        })?;

        let existing = self.entries()?;
        let sequence = existing.len() as u64;
        let prev_hash = existing
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_else(|| TrailEntry::GENESIS_HASH.to_string());

        let record = DecisionRecord {
            id: uuid::Uuid::new_v4(),
            timestamp: Utc::now(),
            topic: decision.topic,
            chosen: decision.chosen,
            alternatives: decision.alternatives,
            rationale: decision.rationale,
            viability_conditions: decision.viability_conditions,
            confidence: decision.confidence,
            impact: decision.impact,
            reversibility: decision.reversibility,
            trade_offs: decision.trade_offs,
            meta: DecisionMeta {
                client: self.client.clone(),
                framework: FRAMEWORK.to_string(),
                version: FORMAT_VERSION.to_string(),
            },
        };

        let this_hash = hash_entry(&self.client, sequence, &record, &prev_hash)?;
        let entry = TrailEntry { sequence, record, prev_hash, this_hash };

        let line = serde_json::to_string(&entry).map_err(|e| StageGateError::TrailWriteFailed {
            reason: format!("failed to serialize trail entry: {}", e),
        })?;

        // The JSONL append is the commit point: the markdown goes first and is
        // removed again if the append fails.
        let md_path = self.dir.join(format!(
            "decision_{}_{:04}.md",
            entry.record.timestamp.format("%Y%m%d_%H%M%S"),
            sequence
        ));
        fs::write(&md_path, render_markdown(&entry.record)).map_err(|e| write_failed(&md_path, e))?;

        if let Err(e) = self.append_line(&line) {
            let _ = fs::remove_file(&md_path);
            return Err(e);
        }

        info!(
            client = %self.client,
            sequence,
            topic = %entry.record.topic,
            markdown = %md_path.display(),
            "decision logged"
        );

        Ok(entry.record)
    }

    fn append_line(&self, line: &str) -> StageGateResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.decisions_file)
            .map_err(|e| write_failed(&self.decisions_file, e))?;
        writeln!(file, "{}", line).map_err(|e| write_failed(&self.decisions_file, e))
    }

    /// Every stored entry in trail order. A missing file is an empty trail.
    pub fn entries(&self) -> StageGateResult<Vec<TrailEntry>> {
        if !self.decisions_file.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.decisions_file).map_err(|e| {
            StageGateError::TrailReadFailed {
                reason: format!("failed to read '{}': {}", self.decisions_file.display(), e),
            }
        })?;

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|e| StageGateError::TrailReadFailed {
                    reason: format!("line {} of '{}': {}", idx + 1, self.decisions_file.display(), e),
                })
            })
            .collect()
    }

    /// Stored decisions, optionally filtered by case-insensitive topic substring.
    pub fn decisions(&self, topic_filter: Option<&str>) -> StageGateResult<Vec<DecisionRecord>> {
        let needle = topic_filter.map(str::to_lowercase);
        let records: Vec<DecisionRecord> = self
            .entries()?
            .into_iter()
            .map(|e| e.record)
            .filter(|r| match &needle {
                Some(n) => r.topic.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .collect();

        debug!(client = %self.client, filter = ?topic_filter, count = records.len(), "decisions loaded");
        Ok(records)
    }

    /// The alternatives recorded with the most recent decision on `topic`.
    pub fn find_alternatives(&self, topic: &str) -> StageGateResult<Option<AlternativePaths>> {
        let latest = self.decisions(Some(topic))?.pop();
        Ok(latest.map(|r| AlternativePaths {
            current_choice: r.chosen,
            alternatives: r.alternatives,
            conditions_for_current: r.viability_conditions,
            confidence: r.confidence,
            timestamp: r.timestamp,
        }))
    }

    /// Re-check every hash link.
    ///
    /// Returns `TrailIntegrity` naming the first broken entry.
    pub fn verify_integrity(&self) -> StageGateResult<()> {
        let entries = self.entries()?;
        match first_broken_link(&self.client, &entries) {
            None => Ok(()),
            Some(idx) => Err(StageGateError::TrailIntegrity {
                reason: format!("entry {} of client '{}' does not match its hash link", idx, self.client),
            }),
        }
    }
}

fn write_failed(path: &Path, e: std::io::Error) -> StageGateError {
    StageGateError::TrailWriteFailed {
        reason: format!("failed to write '{}': {}", path.display(), e),
    }
}
