//! # stagegate-contracts
//!
//! Shared types, result records, and errors for the stagegate validation
//! engine.
//!
//! Every other crate in the workspace imports from here. No decision logic
//! lives in this crate, only data definitions and the error enum.

pub mod context;
pub mod decision;
pub mod error;
pub mod gate;
pub mod metric;
pub mod stack;

pub use context::Context;
pub use error::{StageGateError, StageGateResult};
