//! Markdown validation report.
//!
//! Sections appear in a fixed order (ROI, unit economics, phase gate, tech
//! stack) and each is emitted only when its input keys are present in the
//! context. An empty context yields the title alone.

use stagegate_contracts::{context::Context, metric::MetricResult};
use stagegate_core::metrics::{LTV_CAC_THRESHOLD, ROI_THRESHOLD};

use crate::validator::Validator;

pub const TITLE: &str = "# Validation Report";

pub(crate) fn compile(validator: &Validator, ctx: &Context) -> String {
    let mut lines: Vec<String> = vec![TITLE.to_string(), String::new()];

    if ctx.contains("revenue") && ctx.contains("costs") {
        lines.push("## ROI Validation".to_string());
        let readout = operands(ctx, "revenue", "costs")
            .map(|(revenue, costs)| validator.evaluate_roi(revenue, costs));
        push_metric(&mut lines, "ROI", "x", ROI_THRESHOLD, readout);
    }

    if ctx.contains("ltv") && ctx.contains("cac") {
        lines.push("## Unit Economics Validation".to_string());
        let readout = operands(ctx, "ltv", "cac")
            .map(|(ltv, cac)| validator.evaluate_ltv_cac(ltv, cac));
        push_metric(&mut lines, "LTV:CAC", "", LTV_CAC_THRESHOLD, readout);
    }

    if ctx.contains("current_phase") {
        let phase = ctx.text("current_phase").unwrap_or_default();
        let gate = validator.validate_phase_gate(phase, ctx);
        lines.push(format!("## Phase Gate: {}", gate.gate));
        lines.extend(gate.checks.iter().map(|check| format!("- {}", check)));
        lines.push(format!("- Decision: **{}**", gate.decision));
        if !gate.valid {
            lines.push(format!("- Reason: {}", gate.reason));
        }
        lines.push(String::new());
    }

    if ctx.contains("tech_stack") {
        let techs = ctx.list("tech_stack").unwrap_or_default();
        let audit = validator.validate_tech_stack(&techs);
        lines.push("## Tech Stack Validation".to_string());
        for choice in &audit.tech_choices {
            lines.push(format!("- {}: {}", choice.tech, choice.recommendation));
            if let Some(warning) = &choice.warning {
                lines.push(format!("  ⚠ {}", warning));
            }
        }
        lines.push(format!("- Overall: {}", audit.overall));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Both operands as numbers, or the reason one of them is not.
fn operands(ctx: &Context, lhs: &str, rhs: &str) -> Result<(f64, f64), String> {
    let read = |key: &str| ctx.number(key).ok_or_else(|| format!("{} is not a number", key));
    Ok((read(lhs)?, read(rhs)?))
}

fn push_metric(
    lines: &mut Vec<String>,
    name: &str,
    suffix: &str,
    threshold: f64,
    readout: Result<MetricResult, String>,
) {
    let (value, valid, reason) = match readout {
        Ok(result) => (result.value, result.valid, result.reason),
        Err(reason) => (None, false, reason),
    };
    let value = match value {
        Some(v) => format!("{:.2}{}", v, suffix),
        None => "n/a".to_string(),
    };

    lines.push(format!("- {}: {} (threshold: {:.1}{})", name, value, threshold, suffix));
    if valid {
        lines.push("- Status: ✓ PASS".to_string());
    } else {
        lines.push("- Status: ✗ FAIL".to_string());
        lines.push(format!("- Reason: {}", reason));
    }
    lines.push(String::new());
}
