//! stagegate: validate business metrics, phase gates, and technology choices,
//! and keep a per-client decision trail.
//!
//! Usage:
//!   stagegate roi 300000 100000
//!   stagegate gate p3 --context '{"business_model_sound": true, ...}'
//!   stagegate stack fastapi react kubernetes
//!   stagegate report --context @evidence.json
//!   stagegate decide --client acme --topic pricing --chosen "Usage based" \
//!       --alternative "Flat rate" --confidence 0.7
//!   stagegate alternatives --client acme --topic pricing

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stagegate_contracts::{
    context::Context,
    decision::{Impact, Reversibility},
    error::{StageGateError, StageGateResult},
    gate::GateResult,
    metric::MetricResult,
    stack::StackAudit,
};
use stagegate_trail::{DecisionTrail, NewDecision};
use stagegate_validator::{Validator, ValidatorConfig};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Stage-gate validation for early-stage business decisions.
#[derive(Parser)]
#[command(
    name = "stagegate",
    about = "Stage-gate business validation engine",
    long_about = "Checks ROI, LTV:CAC and margin thresholds, evaluates phase gates,\n\
                  audits technology choices, and records decisions in a\n\
                  hash-linked per-client trail."
)]
struct Cli {
    /// Validator configuration (TOML with [engine] and [stack] tables).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// ROI = (revenue - costs) / costs, threshold 1.5x.
    Roi {
        #[arg(allow_negative_numbers = true)]
        revenue: f64,
        #[arg(allow_negative_numbers = true)]
        costs: f64,
    },
    /// LTV / CAC, threshold 3.0.
    LtvCac {
        #[arg(allow_negative_numbers = true)]
        ltv: f64,
        #[arg(allow_negative_numbers = true)]
        cac: f64,
    },
    /// Gross margin percentage, threshold 20%.
    Margin {
        #[arg(allow_negative_numbers = true)]
        revenue: f64,
        #[arg(allow_negative_numbers = true)]
        costs: f64,
    },
    /// Evaluate the gate into a phase (p1 … p5).
    Gate {
        phase: String,
        /// Evidence as inline JSON, or @path to a JSON file.
        #[arg(long, default_value = "{}")]
        context: String,
    },
    /// Audit a technology stack.
    Stack {
        #[arg(required = true)]
        techs: Vec<String>,
    },
    /// Compile a markdown validation report.
    Report {
        /// Evidence as inline JSON, or @path to a JSON file.
        #[arg(long)]
        context: String,
    },
    /// Record a decision in a client's trail.
    Decide {
        #[command(flatten)]
        trail: TrailArgs,
        #[arg(long)]
        topic: String,
        #[arg(long)]
        chosen: String,
        /// An alternative that was considered (repeatable).
        #[arg(long = "alternative")]
        alternatives: Vec<String>,
        #[arg(long, default_value = "")]
        rationale: String,
        /// Conditions under which the chosen path stays viable.
        #[arg(long, default_value = "")]
        conditions: String,
        #[arg(long, default_value_t = 0.8)]
        confidence: f64,
        #[arg(long, value_enum, default_value_t = ImpactArg::High)]
        impact: ImpactArg,
        #[arg(long, value_enum, default_value_t = ReversibilityArg::Medium)]
        reversibility: ReversibilityArg,
        /// A trade-off as key=value (repeatable).
        #[arg(long = "trade-off", value_parser = parse_trade_off)]
        trade_offs: Vec<(String, String)>,
    },
    /// List a client's decisions.
    Decisions {
        #[command(flatten)]
        trail: TrailArgs,
        /// Case-insensitive topic substring.
        #[arg(long)]
        topic: Option<String>,
    },
    /// Show the alternatives recorded with the latest decision on a topic.
    Alternatives {
        #[command(flatten)]
        trail: TrailArgs,
        #[arg(long)]
        topic: String,
    },
    /// Verify the hash links of a client's trail.
    Verify {
        #[command(flatten)]
        trail: TrailArgs,
    },
}

#[derive(clap::Args)]
struct TrailArgs {
    #[arg(long)]
    client: String,
    /// Directory holding the `client/<name>/` trail folders.
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

impl TrailArgs {
    fn open(&self) -> StageGateResult<DecisionTrail> {
        DecisionTrail::open(&self.root, &self.client)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ImpactArg {
    High,
    Medium,
    Low,
}

impl From<ImpactArg> for Impact {
    fn from(arg: ImpactArg) -> Self {
        match arg {
            ImpactArg::High => Impact::High,
            ImpactArg::Medium => Impact::Medium,
            ImpactArg::Low => Impact::Low,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ReversibilityArg {
    Easy,
    Medium,
    Hard,
}

impl From<ReversibilityArg> for Reversibility {
    fn from(arg: ReversibilityArg) -> Self {
        match arg {
            ReversibilityArg::Easy => Reversibility::Easy,
            ReversibilityArg::Medium => Reversibility::Medium,
            ReversibilityArg::Hard => Reversibility::Hard,
        }
    }
}

fn parse_trade_off(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.trim().to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=debug shows engine queries and gate evaluations.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("stagegate: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> StageGateResult<()> {
    let json = cli.json;
    match cli.command {
        Command::Roi { revenue, costs } => {
            let v = build_validator(cli.config.as_deref())?;
            print_metric(&v.evaluate_roi(revenue, costs), json)
        }
        Command::LtvCac { ltv, cac } => {
            let v = build_validator(cli.config.as_deref())?;
            print_metric(&v.evaluate_ltv_cac(ltv, cac), json)
        }
        Command::Margin { revenue, costs } => {
            let v = build_validator(cli.config.as_deref())?;
            print_metric(&v.evaluate_margin(revenue, costs), json)
        }
        Command::Gate { phase, context } => {
            let v = build_validator(cli.config.as_deref())?;
            let ctx = load_context(&context)?;
            print_gate(&v.validate_phase_gate(&phase, &ctx), json)
        }
        Command::Stack { techs } => {
            let v = build_validator(cli.config.as_deref())?;
            print_stack(&v.validate_tech_stack(&techs), json)
        }
        Command::Report { context } => {
            let v = build_validator(cli.config.as_deref())?;
            let report = v.generate_report(&load_context(&context)?);
            if json {
                print_json(&serde_json::json!({ "report": report }))
            } else {
                println!("{}", report);
                Ok(())
            }
        }
        Command::Decide {
            trail,
            topic,
            chosen,
            alternatives,
            rationale,
            conditions,
            confidence,
            impact,
            reversibility,
            trade_offs,
        } => {
            let record = trail.open()?.log_decision(NewDecision {
                topic,
                chosen,
                alternatives,
                rationale,
                viability_conditions: conditions,
                confidence,
                impact: impact.into(),
                reversibility: reversibility.into(),
                trade_offs: trade_offs.into_iter().collect::<BTreeMap<_, _>>(),
            })?;
            if json {
                print_json(&record)
            } else {
                println!("Decision logged: {} → {} ({})", record.topic, record.chosen, record.id);
                Ok(())
            }
        }
        Command::Decisions { trail, topic } => {
            let records = trail.open()?.decisions(topic.as_deref())?;
            if json {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("No decisions recorded.");
            }
            for r in &records {
                println!(
                    "{}  {}: {}  (confidence {:.0}%, impact {}, reversibility {})",
                    r.timestamp.format("%Y-%m-%d %H:%M"),
                    r.topic,
                    r.chosen,
                    r.confidence * 100.0,
                    r.impact,
                    r.reversibility
                );
            }
            Ok(())
        }
        Command::Alternatives { trail, topic } => {
            let paths = trail.open()?.find_alternatives(&topic)?;
            if json {
                return print_json(&paths);
            }
            match paths {
                None => println!("No decision found for topic '{}'.", topic),
                Some(p) => {
                    println!("Current choice: {} ({:.0}% confidence)", p.current_choice, p.confidence * 100.0);
                    println!("Viable while:   {}", p.conditions_for_current);
                    println!("Alternatives:");
                    for (i, alt) in p.alternatives.iter().enumerate() {
                        println!("  {}. {}", i + 1, alt);
                    }
                }
            }
            Ok(())
        }
        Command::Verify { trail } => {
            let trail = trail.open()?;
            trail.verify_integrity()?;
            println!("Trail for '{}' is intact.", trail.client());
            Ok(())
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn build_validator(config: Option<&Path>) -> StageGateResult<Validator> {
    debug!(config = ?config, "building validator");
    let config = match config {
        Some(path) => ValidatorConfig::from_file(path)?,
        None => ValidatorConfig::default(),
    };
    Validator::new(config)
}

/// Parse inline JSON, or read it from a file when prefixed with `@`.
fn load_context(arg: &str) -> StageGateResult<Context> {
    let raw = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).map_err(|e| StageGateError::InvalidInput {
            reason: format!("failed to read context file '{}': {}", path, e),
        })?,
        None => arg.to_string(),
    };
    serde_json::from_str(&raw).map_err(|e| StageGateError::InvalidInput {
        reason: format!("context must be a JSON object: {}", e),
    })
}

fn to_json<T: Serialize>(value: &T) -> StageGateResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| StageGateError::Serialization { reason: e.to_string() })
}

fn print_json<T: Serialize>(value: &T) -> StageGateResult<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

fn print_metric(result: &MetricResult, json: bool) -> StageGateResult<()> {
    if json {
        return print_json(result);
    }
    let status = if result.valid { "✓ PASS" } else { "✗ FAIL" };
    match result.value {
        Some(v) => println!("{}: {:.2} (threshold {}) {}", result.metric, v, result.threshold, status),
        None => println!("{}: n/a (threshold {}) {}", result.metric, result.threshold, status),
    }
    println!("  {} [{:?}]", result.reason, result.validated_by);
    Ok(())
}

fn print_gate(result: &GateResult, json: bool) -> StageGateResult<()> {
    if json {
        return print_json(result);
    }
    println!("Gate: {}", result.gate);
    for check in &result.checks {
        println!("  {}", check);
    }
    println!("Decision: {}", result.decision);
    println!("Reason:   {}", result.reason);
    Ok(())
}

fn print_stack(audit: &StackAudit, json: bool) -> StageGateResult<()> {
    if json {
        return print_json(audit);
    }
    for choice in &audit.tech_choices {
        println!("{}: {}", choice.tech, choice.recommendation);
        if let Some(warning) = &choice.warning {
            println!("  ⚠ {}", warning);
        }
    }
    println!("{}", audit.overall);
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use std::collections::HashMap;

    use stagegate_contracts::error::StageGateError;

    use super::{load_context, parse_trade_off, to_json, Cli, Command};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["stagegate", "roi", "300", "100", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Roi { revenue, costs } if revenue == 300.0 && costs == 100.0));
    }

    #[test]
    fn metric_operands_accept_negative_numbers() {
        let cli = Cli::try_parse_from(["stagegate", "roi", "100", "-5"]).unwrap();
        assert!(matches!(cli.command, Command::Roi { revenue, costs } if revenue == 100.0 && costs == -5.0));

        let cli = Cli::try_parse_from(["stagegate", "margin", "-10", "3", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Margin { revenue, .. } if revenue == -10.0));

        let cli = Cli::try_parse_from(["stagegate", "ltv-cac", "900", "-300"]).unwrap();
        assert!(matches!(cli.command, Command::LtvCac { cac, .. } if cac == -300.0));
    }

    #[test]
    fn unserializable_output_is_a_serialization_error() {
        let mut keyed_by_pair = HashMap::new();
        keyed_by_pair.insert((1, 2), "x");
        assert!(matches!(to_json(&keyed_by_pair), Err(StageGateError::Serialization { .. })));
        assert_eq!(to_json(&vec![1, 2]).unwrap(), "[\n  1,\n  2\n]");
    }

    #[test]
    fn trade_offs_parse_as_pairs() {
        assert_eq!(
            parse_trade_off("speed = cost").unwrap(),
            ("speed".to_string(), "cost".to_string())
        );
        assert!(parse_trade_off("no-separator").is_err());
        assert!(parse_trade_off("=value").is_err());
    }

    #[test]
    fn context_from_inline_json_or_file() {
        let ctx = load_context(r#"{"revenue": 300, "current_phase": "p3"}"#).unwrap();
        assert_eq!(ctx.number("revenue"), Some(300.0));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctx.json");
        std::fs::write(&path, r#"{"tech_stack": ["go"]}"#).unwrap();
        let ctx = load_context(&format!("@{}", path.display())).unwrap();
        assert_eq!(ctx.list("tech_stack"), Some(vec!["go".to_string()]));

        assert!(load_context("[1, 2]").is_err());
        assert!(load_context("@/no/such/context.json").is_err());
    }
}
