//! # stagegate-core
//!
//! The reasoning core of the stagegate engine.
//!
//! This crate provides:
//! - The `LogicEngine` trait and its local `FallbackEngine` implementation
//! - The `MetricEvaluator` facade that judges ROI, LTV:CAC and margin
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stagegate_core::MetricEvaluator;
//!
//! let metrics = MetricEvaluator::fallback_only();
//! assert!(metrics.evaluate_roi(300_000.0, 100_000.0).valid);
//! ```

pub mod metrics;
pub mod traits;

pub use metrics::{MetricCheck, MetricEvaluator};
pub use traits::{FallbackEngine, LogicEngine};
