//! The validator facade.
//!
//! `Validator::new` is the only place the external engine is probed. The
//! chosen `MetricEvaluator` and the stack auditor are then shared read-only
//! by every call, so a single validator can serve concurrent callers.

use tracing::info;

use stagegate_contracts::{
    context::Context,
    error::StageGateResult,
    gate::GateResult,
    metric::{MetricResult, ValidatedBy},
    stack::StackAudit,
};
use stagegate_core::MetricEvaluator;
use stagegate_gates::{Gate, PhaseGates};
use stagegate_logic::ExternalEngine;
use stagegate_stack::StackAuditor;

use crate::{config::ValidatorConfig, report};

pub struct Validator {
    metrics: MetricEvaluator,
    stack: StackAuditor,
}

impl Validator {
    /// Build a validator, probing the external engine once.
    ///
    /// Fails only when the engine is present but its rule file is missing.
    pub fn new(config: ValidatorConfig) -> StageGateResult<Self> {
        let engine = ExternalEngine::new(&config.engine)?;
        let metrics = if engine.is_available() {
            MetricEvaluator::new(Box::new(engine))
        } else {
            MetricEvaluator::fallback_only()
        };

        info!(engine = ?metrics.engine_kind(), "validator constructed");

        Ok(Self::with_parts(metrics, StackAuditor::new(config.stack)))
    }

    /// A validator that never consults an external engine.
    pub fn fallback_only() -> Self {
        Self::with_parts(MetricEvaluator::fallback_only(), StackAuditor::default())
    }

    /// Assemble a validator from already-built parts.
    pub fn with_parts(metrics: MetricEvaluator, stack: StackAuditor) -> Self {
        Self { metrics, stack }
    }

    /// Which path confirms metrics: `External` if an engine was found.
    pub fn engine_kind(&self) -> ValidatedBy {
        self.metrics.engine_kind()
    }

    pub fn metrics(&self) -> &MetricEvaluator {
        &self.metrics
    }

    pub fn evaluate_roi(&self, revenue: f64, costs: f64) -> MetricResult {
        self.metrics.evaluate_roi(revenue, costs)
    }

    pub fn evaluate_ltv_cac(&self, ltv: f64, cac: f64) -> MetricResult {
        self.metrics.evaluate_ltv_cac(ltv, cac)
    }

    pub fn evaluate_margin(&self, revenue: f64, costs: f64) -> MetricResult {
        self.metrics.evaluate_margin(revenue, costs)
    }

    /// Validate the gate into `phase` ("p1" … "p5").
    pub fn validate_phase_gate(&self, phase: &str, ctx: &Context) -> GateResult {
        PhaseGates::new(&self.metrics).validate(phase, ctx)
    }

    /// Evaluate every gate against the same evidence.
    pub fn validate_all_gates(&self, ctx: &Context) -> Vec<(Gate, GateResult)> {
        PhaseGates::new(&self.metrics).evaluate_all(ctx)
    }

    pub fn validate_tech_stack<S: AsRef<str>>(&self, techs: &[S]) -> StackAudit {
        self.stack.audit(techs)
    }

    /// Compile the markdown report for `ctx`.
    pub fn generate_report(&self, ctx: &Context) -> String {
        report::compile(self, ctx)
    }
}
