//! # stagegate-trail
//!
//! Append-only decision trail, one per client.
//!
//! ## Overview
//!
//! Each logged decision is stored as one JSON line that links to the
//! previous line through a SHA-256 hash, and is also rendered to a
//! standalone markdown file for people to read. Editing any stored line
//! breaks the chain, and `verify_integrity` reports it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stagegate_trail::{DecisionTrail, NewDecision};
//!
//! let trail = DecisionTrail::open(Path::new("."), "acme")?;
//! trail.log_decision(NewDecision { topic: "Cloud migration".into(), .. })?;
//! let plan_b = trail.find_alternatives("cloud")?;
//! ```

pub mod chain;
pub mod entry;
pub mod markdown;
pub mod store;

pub use chain::{first_broken_link, hash_entry, verify_chain};
pub use entry::{AlternativePaths, TrailEntry};
pub use markdown::render_markdown;
pub use store::{DecisionTrail, NewDecision};

// ── Tests ─────────────────────────────────────────────────────────────────────
