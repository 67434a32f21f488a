//! Hash-link primitives.
//!
//! Hash input layout (bytes, in order):
//!   1. client name as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the decision record

use sha2::{Digest, Sha256};

use stagegate_contracts::{
    decision::DecisionRecord,
    error::{StageGateError, StageGateResult},
};

use crate::entry::TrailEntry;

/// Compute the lowercase hex SHA-256 for one entry.
pub fn hash_entry(
    client: &str,
    sequence: u64,
    record: &DecisionRecord,
    prev_hash: &str,
) -> StageGateResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| StageGateError::TrailWriteFailed {
        reason: format!("failed to serialize decision record: {}", e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(client.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Find the first entry that breaks the chain.
///
/// Checks sequence continuity, prev-hash linkage, and that every stored
/// `this_hash` matches the recomputed value. `None` means the chain is
/// intact; an empty chain is intact.
pub fn first_broken_link(client: &str, entries: &[TrailEntry]) -> Option<u64> {
    let mut expected_prev = TrailEntry::GENESIS_HASH.to_string();

    for (idx, entry) in entries.iter().enumerate() {
        if entry.sequence != idx as u64 || entry.prev_hash != expected_prev {
            return Some(idx as u64);
        }

        match hash_entry(client, entry.sequence, &entry.record, &entry.prev_hash) {
            Ok(recomputed) if recomputed == entry.this_hash => {}
            _ => return Some(idx as u64),
        }

        expected_prev = entry.this_hash.clone();
    }

    None
}

/// True when `entries` form an intact chain for `client`.
pub fn verify_chain(client: &str, entries: &[TrailEntry]) -> bool {
    first_broken_link(client, entries).is_none()
}
