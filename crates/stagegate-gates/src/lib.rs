//! # stagegate-gates
//!
//! The five-gate phase state machine.
//!
//! ## Gates
//!
//! | Phase id | Gate | Pass rule |
//! |---|---|---|
//! | `p1` | P0 → P1 | research complete AND tier ∈ {T1, T2} |
//! | `p2` | P1 → P2 | business model sound AND market validated |
//! | `p3` | P2 → P3 | AND of every evaluated commitment check, ROI included when figures are present |
//! | `p4` | P3 → P4 | code complete AND tests passing AND deployment ready |
//! | `p5` | P4 → P5 | validation complete AND actual ROI (when present) AND sustainability proven |
//!
//! ```rust,ignore
//! use stagegate_core::MetricEvaluator;
//! use stagegate_gates::PhaseGates;
//!
//! let metrics = MetricEvaluator::fallback_only();
//! let result = PhaseGates::new(&metrics).validate("p2", &ctx);
//! ```

pub mod gate;
pub mod machine;

pub use gate::{Gate, Tier};
pub use machine::PhaseGates;

// ── Tests ─────────────────────────────────────────────────────────────────────
