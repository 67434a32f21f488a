//! Human-readable markdown rendering of a decision record.

use std::fmt::Write;

use stagegate_contracts::decision::DecisionRecord;

/// Render `record` as a standalone markdown document.
pub fn render_markdown(record: &DecisionRecord) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# Decision: {}\n", record.topic);
    let _ = writeln!(out, "**Date**: {}", record.timestamp.to_rfc3339());
    let _ = writeln!(out, "**Confidence**: {:.0}%", record.confidence * 100.0);
    let _ = writeln!(out, "**Impact**: {}", record.impact);
    let _ = writeln!(out, "**Reversibility**: {}\n", record.reversibility);
    out.push_str("---\n\n");

    let _ = writeln!(out, "## Chosen Path\n\n{}\n", record.chosen);
    let _ = writeln!(out, "### Rationale\n\n{}\n", record.rationale);
    let _ = writeln!(out, "### Viability Conditions\n\n{}\n", record.viability_conditions);
    out.push_str("---\n\n## Alternatives Considered\n\n");
    for (i, alt) in record.alternatives.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, alt);
    }

    if !record.trade_offs.is_empty() {
        out.push_str("\n---\n\n## Trade-Offs\n\n");
        for (key, value) in &record.trade_offs {
            let _ = writeln!(out, "- **{}**: {}", key, value);
        }
    }

    out.push_str("\n---\n\n## When to Revisit This Decision\n\n");
    out.push_str("If any viability condition changes, re-evaluate.\n\n");
    out.push_str("Alternative paths remain viable under different conditions:\n");
    for alt in &record.alternatives {
        let _ = writeln!(out, "- {}", alt);
    }

    out
}
