//! Technology policy lists.
//!
//! A `StackPolicy` holds the fixed lists the auditor matches against. The
//! built-in lists are the defaults; a TOML document may replace any of them.
//! Matching is case-insensitive substring matching, so a pattern also fires
//! inside longer names ("go" matches "mongodb" and "django").
//!
//! Example:
//! ```toml
//! simple = ["fastapi", "postgres"]
//! ai_unfriendly = ["react"]
//! complex_deploy = ["kubernetes", "k8s"]
//!
//! [[alternatives]]
//! pattern = "react"
//! suggestion = "Consider HTMX + Alpine.js for simpler SSR"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use stagegate_contracts::error::{StageGateError, StageGateResult};

/// A complex technology and the simpler path to suggest instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub pattern: String,
    pub suggestion: String,
}

impl Alternative {
    fn new(pattern: &str, suggestion: &str) -> Self {
        Self { pattern: pattern.to_string(), suggestion: suggestion.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackPolicy {
    /// Simple, well-understood technologies. A match passes complexity-avoidance outright.
    pub simple: Vec<String>,
    /// Complex technologies with a suggested alternative. First match wins.
    pub alternatives: Vec<Alternative>,
    /// Technologies known to generate poorly with automated code generation.
    pub ai_unfriendly: Vec<String>,
    /// Technologies implying multi-step orchestrated deployment.
    pub complex_deploy: Vec<String>,
}

impl Default for StackPolicy {
    fn default() -> Self {
        let strings = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            simple: strings(&[
                "fastapi", "flask", "go", "htmx", "alpine", "tailwind", "postgres", "sqlite",
            ]),
            alternatives: vec![
                Alternative::new("react", "Consider HTMX + Alpine.js for simpler SSR"),
                Alternative::new("angular", "Consider HTMX or plain JS"),
                Alternative::new("kubernetes", "Consider Fly.io or Heroku unless 10K+ users"),
                Alternative::new("microservices", "Start with monolith, split later"),
                Alternative::new("mongodb", "Use PostgreSQL unless specific need validated"),
            ],
            ai_unfriendly: strings(&["react", "angular", "vue", "django"]),
            complex_deploy: strings(&["kubernetes", "k8s", "docker-compose"]),
        }
    }
}

impl StackPolicy {
    /// Parse `s` as TOML. Omitted lists keep their built-in defaults.
    pub fn from_toml_str(s: &str) -> StageGateResult<Self> {
        toml::from_str(s).map_err(|e| StageGateError::ConfigError {
            reason: format!("failed to parse stack policy TOML: {}", e),
        })
    }

    /// Read and parse the TOML file at `path`.
    pub fn from_file(path: &Path) -> StageGateResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| StageGateError::ConfigError {
            reason: format!("failed to read stack policy '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Case-insensitive substring test against any pattern in `patterns`.
pub(crate) fn matches_any<'p, I>(tech_lower: &str, patterns: I) -> bool
where
    I: IntoIterator<Item = &'p String>,
{
    patterns.into_iter().any(|p| tech_lower.contains(&p.to_lowercase()))
}
