//! The phase gate evaluator.
//!
//! Each gate reads the facts it needs from the `Context`, records one
//! `GateCheck` per sub-criterion, and derives `valid` as the AND of those
//! checks. The rendered check strings are for display only and are never
//! inspected to reach a decision.

use serde_json::Value;
use tracing::{debug, info};

use stagegate_contracts::{
    context::Context,
    error::StageGateError,
    gate::{GateCheck, GateResult},
};
use stagegate_core::MetricEvaluator;

use crate::gate::{Gate, Tier};

/// Tier assumed when the context does not name one.
const DEFAULT_TIER: &str = "t4";

/// Decision and reason wording for one gate.
struct Outcome {
    proceed: &'static str,
    halt: &'static str,
    pass_reason: &'static str,
    fail_reason: &'static str,
}

impl Gate {
    fn outcome(self) -> Outcome {
        match self {
            Gate::P0ToP1 => Outcome {
                proceed: "PROCEED",
                halt: "HALT",
                pass_reason: "Research validated, tier acceptable",
                fail_reason: "Research or tier insufficient",
            },
            Gate::P1ToP2 => Outcome {
                proceed: "PROCEED",
                halt: "HALT",
                pass_reason: "Business model and market validated",
                fail_reason: "Business model or market not validated",
            },
            Gate::P2ToP3 => Outcome {
                proceed: "PROCEED (commit resources)",
                halt: "HALT (hold resources)",
                pass_reason: "All validation passed",
                fail_reason: "Critical validation failed",
            },
            Gate::P3ToP4 => Outcome {
                proceed: "PROCEED",
                halt: "HALT",
                pass_reason: "Build complete and deployable",
                fail_reason: "Build not ready",
            },
            Gate::P4ToP5 => Outcome {
                proceed: "PROCEED (iterate)",
                halt: "HALT (pivot or kill)",
                pass_reason: "Sustainable",
                fail_reason: "Not sustainable",
            },
        }
    }
}

/// Evaluates gates against caller-supplied evidence.
///
/// Holds no state of its own; gates that need ROI delegate to the borrowed
/// `MetricEvaluator`.
pub struct PhaseGates<'m> {
    metrics: &'m MetricEvaluator,
}

impl<'m> PhaseGates<'m> {
    pub fn new(metrics: &'m MetricEvaluator) -> Self {
        Self { metrics }
    }

    /// Validate the gate into `phase` ("p1" … "p5").
    ///
    /// Unknown identifiers produce `valid: false` with an "unknown phase"
    /// reason rather than an error.
    pub fn validate(&self, phase: &str, ctx: &Context) -> GateResult {
        match Gate::from_phase_id(phase) {
            Some(gate) => self.evaluate(gate, ctx),
            None => {
                let reason = StageGateError::UnknownGate { phase: phase.to_string() }.to_string();
                info!(phase, "unknown phase requested");
                GateResult {
                    valid: false,
                    gate: "unknown".to_string(),
                    checks: Vec::new(),
                    decision: "HALT".to_string(),
                    reason,
                }
            }
        }
    }

    /// Evaluate a specific gate.
    pub fn evaluate(&self, gate: Gate, ctx: &Context) -> GateResult {
        let checks = match gate {
            Gate::P0ToP1 => self.research_checks(ctx),
            Gate::P1ToP2 => vec![
                flag(ctx, "business_model_sound", "Business model sound", "Business model weak"),
                flag(ctx, "market_validated", "Market validated", "Market not validated"),
            ],
            Gate::P2ToP3 => self.commitment_checks(ctx),
            Gate::P3ToP4 => vec![
                flag(ctx, "code_complete", "Code complete", "Code incomplete"),
                flag(ctx, "tests_passing", "All tests passing", "Tests failing"),
                flag(ctx, "deployment_ready", "Deployment ready", "Deployment not ready"),
            ],
            Gate::P4ToP5 => self.sustainability_checks(ctx),
        };

        decide(gate, checks)
    }

    /// Evaluate every gate against the same evidence, in process order.
    pub fn evaluate_all(&self, ctx: &Context) -> Vec<(Gate, GateResult)> {
        Gate::all().into_iter().map(|gate| (gate, self.evaluate(gate, ctx))).collect()
    }

    // ── Gate-specific check lists ─────────────────────────────────────────────

    fn research_checks(&self, ctx: &Context) -> Vec<GateCheck> {
        let research = flag(ctx, "research_complete", "Research complete", "Research incomplete");

        let raw_tier = match ctx.get("tier") {
            None | Some(Value::Null) => DEFAULT_TIER.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        let tier = match raw_tier.parse::<Tier>() {
            Ok(tier) if tier.allows_proceed() => GateCheck::pass(format!("Tier {} (proceed)", tier)),
            Ok(tier) => GateCheck::fail(format!("Tier {} (no-go)", tier)),
            Err(_) => GateCheck::fail(format!("Tier '{}' unrecognized (no-go)", raw_tier)),
        };

        vec![research, tier]
    }

    fn commitment_checks(&self, ctx: &Context) -> Vec<GateCheck> {
        let mut checks = vec![
            flag(ctx, "business_model_sound", "Business model sound", "Business model weak"),
            absent(ctx, "unvalidated_claims", "No unvalidated claims", "Unvalidated claims exist"),
        ];

        if let (Some(revenue), Some(costs)) =
            (ctx.present_number("revenue"), ctx.present_number("costs"))
        {
            checks.push(self.roi_check("ROI", revenue, costs));
        }

        checks.push(flag(ctx, "timeline_realistic", "Timeline realistic", "Timeline unrealistic"));
        checks.push(flag(ctx, "risks_mitigated", "Risks mitigated", "Risks not addressed"));
        checks.push(flag(
            ctx,
            "tech_stack_validated",
            "Tech stack validated",
            "Tech stack not validated",
        ));
        checks
    }

    fn sustainability_checks(&self, ctx: &Context) -> Vec<GateCheck> {
        let mut checks = vec![flag(
            ctx,
            "validation_complete",
            "Validation complete",
            "Validation incomplete",
        )];

        // Actual results only; projected revenue/costs are ignored here.
        if let (Some(revenue), Some(costs)) =
            (ctx.present_number("actual_revenue"), ctx.present_number("actual_costs"))
        {
            checks.push(self.roi_check("Actual ROI:", revenue, costs));
        }

        checks.push(flag(
            ctx,
            "sustainability_proven",
            "Sustainability proven",
            "Sustainability not proven",
        ));
        checks
    }

    fn roi_check(&self, prefix: &str, revenue: f64, costs: f64) -> GateCheck {
        let roi = self.metrics.evaluate_roi(revenue, costs);
        match roi.value {
            Some(value) if roi.valid => GateCheck::pass(format!("{} {:.2}x", prefix, value)),
            Some(value) => GateCheck::fail(format!("{} {:.2}x (need 1.5x+)", prefix, value)),
            None => GateCheck::fail(format!("{} unavailable ({})", prefix, roi.reason)),
        }
    }
}

/// A sub-criterion that passes when `key` is set.
fn flag(ctx: &Context, key: &str, pass: &str, fail: &str) -> GateCheck {
    let check = if ctx.flag(key) { GateCheck::pass(pass) } else { GateCheck::fail(fail) };
    debug!(key, passed = check.passed, "gate check");
    check
}

/// A sub-criterion that passes when `key` is unset.
fn absent(ctx: &Context, key: &str, pass: &str, fail: &str) -> GateCheck {
    let check = if ctx.flag(key) { GateCheck::fail(fail) } else { GateCheck::pass(pass) };
    debug!(key, passed = check.passed, "gate check");
    check
}

/// Aggregate the checks into a result: `valid` is their logical AND.
fn decide(gate: Gate, checks: Vec<GateCheck>) -> GateResult {
    let valid = checks.iter().all(|c| c.passed);
    let outcome = gate.outcome();

    let (decision, reason) = if valid {
        (outcome.proceed, outcome.pass_reason.to_string())
    } else {
        let failed: Vec<&str> =
            checks.iter().filter(|c| !c.passed).map(|c| c.label.as_str()).collect();
        (outcome.halt, format!("{}: {}", outcome.fail_reason, failed.join("; ")))
    };

    info!(gate = %gate, valid, check_count = checks.len(), "gate evaluated");

    GateResult {
        valid,
        gate: gate.label().to_string(),
        checks,
        decision: decision.to_string(),
        reason,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use stagegate_contracts::{context::Context, metric::ValidatedBy};
    use stagegate_core::{traits::LogicEngine, MetricCheck, MetricEvaluator};

    use super::PhaseGates;
    use crate::gate::Gate;

    fn commitment_context() -> Context {
        Context::new()
            .with("business_model_sound", true)
            .with("unvalidated_claims", false)
            .with("revenue", 300_000)
            .with("costs", 100_000)
            .with("timeline_realistic", true)
            .with("risks_mitigated", true)
            .with("tech_stack_validated", true)
    }

    fn assert_invariant(result: &stagegate_contracts::gate::GateResult) {
        assert_eq!(
            result.valid,
            result.checks.iter().all(|c| c.passed),
            "valid must equal the AND of recorded checks: {result:?}"
        );
    }

    // ── P0 → P1 ──────────────────────────────────────────────────────────────

    #[test]
    fn research_gate_requires_research_and_good_tier() {
        let metrics = MetricEvaluator::fallback_only();
        let gates = PhaseGates::new(&metrics);

        let pass = gates.validate("p1", &Context::new().with("research_complete", true).with("tier", "t2"));
        assert!(pass.valid);
        assert_eq!(pass.gate, "P0 → P1");
        assert_eq!(pass.decision, "PROCEED");
        assert_eq!(pass.rendered_checks(), vec!["✓ Research complete", "✓ Tier T2 (proceed)"]);

        let bad_tier = gates.validate("p1", &Context::new().with("research_complete", true).with("tier", "t3"));
        assert!(!bad_tier.valid);
        assert_eq!(bad_tier.decision, "HALT");
        assert!(bad_tier.rendered_checks().contains(&"✗ Tier T3 (no-go)".to_string()));

        let no_research = gates.validate("p1", &Context::new().with("tier", "t1"));
        assert!(!no_research.valid);
        assert_invariant(&no_research);
    }

    #[test]
    fn research_gate_defaults_to_tier_four() {
        let metrics = MetricEvaluator::fallback_only();
        let result = PhaseGates::new(&metrics)
            .validate("p1", &Context::new().with("research_complete", true));
        assert!(!result.valid);
        assert_eq!(result.checks[1].label, "Tier T4 (no-go)");
    }

    #[test]
    fn research_gate_rejects_unrecognized_tier() {
        let metrics = MetricEvaluator::fallback_only();
        let result = PhaseGates::new(&metrics).validate(
            "p1",
            &Context::new().with("research_complete", true).with("tier", "gold"),
        );
        assert!(!result.valid);
        assert!(result.checks[1].label.contains("unrecognized"));
    }

    // ── P1 → P2 and P3 → P4 ──────────────────────────────────────────────────

    #[test]
    fn business_gate_is_and_of_both_flags() {
        let metrics = MetricEvaluator::fallback_only();
        let gates = PhaseGates::new(&metrics);

        for (model, market) in [(true, true), (true, false), (false, true), (false, false)] {
            let ctx = Context::new()
                .with("business_model_sound", model)
                .with("market_validated", market);
            let result = gates.validate("p2", &ctx);
            assert_eq!(result.valid, model && market);
            assert_eq!(result.checks.len(), 2);
            assert_invariant(&result);
        }
    }

    #[test]
    fn build_gate_requires_all_three() {
        let metrics = MetricEvaluator::fallback_only();
        let gates = PhaseGates::new(&metrics);
        let full = Context::new()
            .with("code_complete", true)
            .with("tests_passing", true)
            .with("deployment_ready", true);

        assert!(gates.validate("p4", &full).valid);

        let failing = full.clone().with("tests_passing", false);
        let result = gates.validate("p4", &failing);
        assert!(!result.valid);
        assert!(result.reason.contains("Tests failing"), "reason: {}", result.reason);
        assert_invariant(&result);
    }

    // ── P2 → P3 ──────────────────────────────────────────────────────────────

    #[test]
    fn commitment_gate_proceeds_when_everything_holds() {
        let metrics = MetricEvaluator::fallback_only();
        let result = PhaseGates::new(&metrics).validate("p3", &commitment_context());

        assert!(result.valid);
        assert!(result.decision.starts_with("PROCEED"), "decision: {}", result.decision);
        assert_eq!(result.checks.len(), 6);
        assert!(result.rendered_checks().contains(&"✓ ROI 2.00x".to_string()));
        assert_invariant(&result);
    }

    #[test]
    fn commitment_gate_halts_on_any_single_failure() {
        let metrics = MetricEvaluator::fallback_only();
        let gates = PhaseGates::new(&metrics);

        let flips: Vec<(&str, serde_json::Value)> = vec![
            ("business_model_sound", json!(false)),
            ("unvalidated_claims", json!(true)),
            ("revenue", json!(200_000)),
            ("costs", json!(150_000)),
            ("timeline_realistic", json!(false)),
            ("risks_mitigated", json!(false)),
            ("tech_stack_validated", json!(false)),
        ];

        for (key, value) in flips {
            let ctx = commitment_context().with(key, value);
            let result = gates.validate("p3", &ctx);
            assert!(!result.valid, "flipping {key} must halt");
            assert!(result.decision.starts_with("HALT"), "decision for {key}: {}", result.decision);
            assert_invariant(&result);
        }
    }

    #[test]
    fn commitment_gate_skips_roi_without_figures() {
        let metrics = MetricEvaluator::fallback_only();
        let ctx = Context::new()
            .with("business_model_sound", true)
            .with("timeline_realistic", true)
            .with("risks_mitigated", true)
            .with("tech_stack_validated", true);

        let result = PhaseGates::new(&metrics).validate("p3", &ctx);
        assert!(result.valid);
        assert_eq!(result.checks.len(), 5);
        assert!(result.checks.iter().all(|c| !c.label.starts_with("ROI")));
    }

    #[test]
    fn commitment_gate_fails_roi_on_negative_costs() {
        let metrics = MetricEvaluator::fallback_only();
        let ctx = commitment_context().with("costs", -5);
        let result = PhaseGates::new(&metrics).validate("p3", &ctx);

        assert!(!result.valid);
        let roi = result.checks.iter().find(|c| c.label.starts_with("ROI")).unwrap();
        assert!(!roi.passed);
        assert!(roi.label.contains("costs must be positive"), "label: {}", roi.label);
    }

    /// Rendered strings never drive the verdict: a label that happens to
    /// contain a pass marker still fails when its boolean is false.
    #[test]
    fn verdict_does_not_depend_on_rendered_text() {
        let metrics = MetricEvaluator::fallback_only();
        let ctx = commitment_context().with("risks_mitigated", false);
        let result = PhaseGates::new(&metrics).validate("p3", &ctx);

        assert!(!result.valid);
        assert!(result.rendered_checks().iter().any(|c| c.contains('✓')));
    }

    // ── P4 → P5 ──────────────────────────────────────────────────────────────

    #[test]
    fn sustainability_gate_uses_actual_figures_only() {
        let metrics = MetricEvaluator::fallback_only();
        let gates = PhaseGates::new(&metrics);

        let ctx = Context::new()
            .with("validation_complete", true)
            .with("sustainability_proven", true)
            // Projected figures would fail ROI, but this gate ignores them.
            .with("revenue", 100)
            .with("costs", 100);
        let result = gates.validate("p5", &ctx);
        assert!(result.valid);
        assert_eq!(result.checks.len(), 2);

        let with_actuals = ctx.clone().with("actual_revenue", 110_000).with("actual_costs", 100_000);
        let result = gates.validate("p5", &with_actuals);
        assert!(!result.valid);
        assert_eq!(result.decision, "HALT (pivot or kill)");
        assert!(result.rendered_checks().contains(&"✗ Actual ROI: 0.10x (need 1.5x+)".to_string()));

        let strong = ctx.with("actual_revenue", 400_000).with("actual_costs", 100_000);
        let result = gates.validate("p5", &strong);
        assert!(result.valid);
        assert_eq!(result.decision, "PROCEED (iterate)");
    }

    // ── Unknown gates, delegation, idempotence ───────────────────────────────

    #[test]
    fn unknown_phase_is_reported_not_raised() {
        let metrics = MetricEvaluator::fallback_only();
        let gates = PhaseGates::new(&metrics);

        for ctx in [Context::new(), commitment_context()] {
            let result = gates.validate("p9", &ctx);
            assert!(!result.valid);
            assert_eq!(result.reason, "unknown phase: p9");
            assert!(result.checks.is_empty());
        }
    }

    struct AlwaysConfirms;

    impl LogicEngine for AlwaysConfirms {
        fn kind(&self) -> ValidatedBy {
            ValidatedBy::External
        }

        fn confirm(&self, _check: &MetricCheck) -> Option<bool> {
            Some(true)
        }
    }

    #[test]
    fn external_engine_cannot_pass_a_failing_roi() {
        let metrics = MetricEvaluator::new(Box::new(AlwaysConfirms));
        let ctx = commitment_context().with("revenue", 120_000);
        let result = PhaseGates::new(&metrics).validate("p3", &ctx);
        assert!(!result.valid);
    }

    #[test]
    fn evaluate_all_covers_gates_in_order() {
        let metrics = MetricEvaluator::fallback_only();
        let results = PhaseGates::new(&metrics).evaluate_all(&commitment_context());
        let order: Vec<Gate> = results.iter().map(|(g, _)| *g).collect();
        assert_eq!(order, Gate::all().to_vec());
        for (_, result) in &results {
            assert_invariant(result);
        }
    }

    #[test]
    fn gate_results_are_idempotent() {
        let metrics = MetricEvaluator::fallback_only();
        let gates = PhaseGates::new(&metrics);
        let ctx = commitment_context();

        let first = serde_json::to_vec(&gates.validate("p3", &ctx)).unwrap();
        let second = serde_json::to_vec(&gates.validate("p3", &ctx)).unwrap();
        assert_eq!(first, second);
    }
}
