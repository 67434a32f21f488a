//! stagegate-validator: the single entry point callers construct.
//!
//! A `Validator` owns the metric evaluator (external engine or fallback,
//! chosen once at construction) and the stack auditor, and exposes:
//!
//! | Operation              | Delegates to                    |
//! |------------------------|---------------------------------|
//! | `evaluate_roi` etc.    | `stagegate_core::MetricEvaluator` |
//! | `validate_phase_gate`  | `stagegate_gates::PhaseGates`   |
//! | `validate_tech_stack`  | `stagegate_stack::StackAuditor` |
//! | `generate_report`      | `report::compile`               |
//!
//! All operations take `&self`; a validator can be shared across threads.

pub mod config;
pub mod report;
pub mod validator;

pub use config::ValidatorConfig;
pub use validator::Validator;

// ── Tests ────────────────────────────────────────────────────────────────────
