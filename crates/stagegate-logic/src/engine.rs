//! Adapter for the external declarative logic engine.
//!
//! `ExternalEngine` translates a `MetricCheck` into a goal against a fixed
//! rule file, runs the engine binary with a bounded timeout, and reduces the
//! exit status to a boolean:
//!
//!   <binary> -g <goal> -t halt <rule_file>
//!
//! Exit code zero confirms. Availability is probed exactly once, in
//! `ExternalEngine::new`; an engine installed later is only picked up by
//! constructing a new adapter. Every runtime failure (not installed,
//! timeout, spawn or wait error) degrades to `None` and never reaches the
//! caller as an error.

use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

use stagegate_contracts::{
    error::{StageGateError, StageGateResult},
    metric::{Metric, ValidatedBy},
};
use stagegate_core::{traits::LogicEngine, MetricCheck};

use crate::config::EngineConfig;

/// The rule-file predicate that checks a metric.
pub fn predicate_name(metric: Metric) -> &'static str {
    match metric {
        Metric::Roi => "roi_positive",
        Metric::LtvCac => "ltv_cac_acceptable",
        Metric::Margin => "margin_acceptable",
    }
}

/// Render the goal for `check`, leaving the computed value unbound.
///
/// e.g. `roi_positive(300000, 100000, _)`
pub fn goal_for(check: &MetricCheck) -> String {
    format!("{}({}, {}, _)", predicate_name(check.metric), check.lhs, check.rhs)
}

/// The external engine adapter.
#[derive(Debug, Clone)]
pub struct ExternalEngine {
    binary: PathBuf,
    rule_file: PathBuf,
    timeout: Duration,
    available: bool,
}

impl ExternalEngine {
    /// Probe for the engine and build the adapter.
    ///
    /// A missing or disabled engine is not an error: the adapter is built
    /// unavailable and every query returns `None`. The one fatal case is an
    /// engine that is present while the configured rule file is not.
    pub fn new(config: &EngineConfig) -> StageGateResult<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let unavailable = |binary: PathBuf| Self {
            binary,
            rule_file: config.rule_file.clone(),
            timeout,
            available: false,
        };

        if !config.enabled {
            info!("external logic engine disabled by configuration");
            return Ok(unavailable(PathBuf::from(&config.binary)));
        }

        let binary = match which::which(&config.binary) {
            Ok(path) => path,
            Err(e) => {
                warn!(
                    binary = %config.binary,
                    error = %e,
                    "external logic engine not found; using fallback validation"
                );
                return Ok(unavailable(PathBuf::from(&config.binary)));
            }
        };

        let mut version = Command::new(&binary);
        version.arg("--version");
        match run_with_timeout(version, timeout) {
            Ok(status) if status.success() => {}
            Ok(status) => {
                warn!(binary = %binary.display(), %status, "engine version probe failed; using fallback validation");
                return Ok(unavailable(binary));
            }
            Err(e) => {
                warn!(binary = %binary.display(), error = %e, "engine version probe failed; using fallback validation");
                return Ok(unavailable(binary));
            }
        }

        if !config.rule_file.is_file() {
            return Err(StageGateError::ConfigError {
                reason: format!(
                    "external engine '{}' is available but rule file '{}' does not exist",
                    binary.display(),
                    config.rule_file.display()
                ),
            });
        }

        info!(
            binary = %binary.display(),
            rule_file = %config.rule_file.display(),
            timeout_ms = config.timeout_ms,
            "external logic engine available"
        );

        Ok(Self {
            binary,
            rule_file: config.rule_file.clone(),
            timeout,
            available: true,
        })
    }

    /// The cached result of the construction-time probe.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Run `goal` against the rule file.
    ///
    /// `Some(true)` on exit code zero, `Some(false)` on any other exit code,
    /// `None` when the engine could not be used.
    pub fn query(&self, goal: &str) -> Option<bool> {
        if !self.available {
            return None;
        }

        match self.run_goal(goal) {
            Ok(confirmed) => {
                debug!(goal, confirmed, "external engine answered");
                Some(confirmed)
            }
            Err(e) => {
                warn!(goal, error = %e, "external engine query failed; falling back");
                None
            }
        }
    }

    fn run_goal(&self, goal: &str) -> StageGateResult<bool> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-g").arg(goal).arg("-t").arg("halt").arg(&self.rule_file);
        let status = run_with_timeout(cmd, self.timeout)?;
        Ok(status.success())
    }
}

impl LogicEngine for ExternalEngine {
    fn kind(&self) -> ValidatedBy {
        ValidatedBy::External
    }

    fn confirm(&self, check: &MetricCheck) -> Option<bool> {
        self.query(&goal_for(check))
    }
}

/// Spawn `cmd` and wait at most `timeout` for it to exit.
///
/// On timeout the child is killed and reaped before returning.
fn run_with_timeout(mut cmd: Command, timeout: Duration) -> StageGateResult<ExitStatus> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| StageGateError::EngineUnavailable {
            reason: format!("failed to spawn engine: {}", e),
        })?;

    match child.wait_timeout(timeout) {
        Ok(Some(status)) => Ok(status),
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            Err(StageGateError::EngineUnavailable {
                reason: format!("query exceeded {}ms timeout", timeout.as_millis()),
            })
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            Err(StageGateError::EngineUnavailable {
                reason: format!("failed to wait for engine: {}", e),
            })
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
