//! The technology choice auditor.
//!
//! Each technology is judged independently against three orthogonal
//! policies:
//!
//! 1. complexity-avoidance: simple technologies pass; a known complex one
//!    fails with a suggested alternative
//! 2. automation-generation friendliness: fails on the `ai_unfriendly` list
//! 3. deployment simplicity: fails on the `complex_deploy` list
//!
//! A technology is approved only when all three pass.

use tracing::debug;

use stagegate_contracts::stack::{Recommendation, StackAudit, TechChoice};

use crate::policy::{matches_any, StackPolicy};

#[derive(Debug, Clone, Default)]
pub struct StackAuditor {
    policy: StackPolicy,
}

impl StackAuditor {
    pub fn new(policy: StackPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &StackPolicy {
        &self.policy
    }

    /// Audit every technology in `techs`, preserving input order.
    ///
    /// An empty list is trivially approved.
    pub fn audit<S: AsRef<str>>(&self, techs: &[S]) -> StackAudit {
        let tech_choices: Vec<TechChoice> =
            techs.iter().map(|t| self.audit_one(t.as_ref())).collect();
        let valid = tech_choices.iter().all(|c| c.recommendation == Recommendation::Approved);

        StackAudit {
            valid,
            tech_choices,
            overall: if valid { "Stack approved" } else { "Stack needs review" }.to_string(),
        }
    }

    /// Audit a single technology.
    pub fn audit_one(&self, tech: &str) -> TechChoice {
        let warning = self.simpler_alternative(tech).map(str::to_string);
        let simpler_checked = warning.is_none();
        let ai_friendly = self.is_ai_friendly(tech);
        let deploy_simple = self.is_deploy_simple(tech);

        let recommendation = if simpler_checked && ai_friendly && deploy_simple {
            Recommendation::Approved
        } else {
            Recommendation::Reconsider
        };

        debug!(
            tech,
            simpler_checked,
            ai_friendly,
            deploy_simple,
            recommendation = %recommendation,
            "technology audited"
        );

        TechChoice {
            tech: tech.to_string(),
            simpler_checked,
            ai_friendly,
            deploy_simple,
            recommendation,
            warning,
        }
    }

    /// The suggested alternative when `tech` fails complexity-avoidance.
    ///
    /// Simple technologies short-circuit before the alternatives are consulted.
    pub fn simpler_alternative(&self, tech: &str) -> Option<&str> {
        let lower = tech.to_lowercase();
        if matches_any(&lower, &self.policy.simple) {
            return None;
        }
        self.policy
            .alternatives
            .iter()
            .find(|alt| lower.contains(&alt.pattern.to_lowercase()))
            .map(|alt| alt.suggestion.as_str())
    }

    pub fn is_ai_friendly(&self, tech: &str) -> bool {
        !matches_any(&tech.to_lowercase(), &self.policy.ai_unfriendly)
    }

    pub fn is_deploy_simple(&self, tech: &str) -> bool {
        !matches_any(&tech.to_lowercase(), &self.policy.complex_deploy)
    }
}
