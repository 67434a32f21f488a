//! # stagegate-stack
//!
//! Technology choice auditing against three orthogonal policies:
//! complexity-avoidance, automation-generation friendliness, and deployment
//! simplicity.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use stagegate_stack::StackAuditor;
//!
//! let audit = StackAuditor::default().audit(&["postgres", "react", "kubernetes"]);
//! assert!(!audit.valid);
//! ```
//!
//! ## Known limitation
//!
//! Patterns match as case-insensitive substrings, not whole names. "go" in
//! the simple list also matches "mongodb", "django" or "go-router", and
//! "vue" matches any name containing it. This is kept on purpose so results
//! stay comparable with existing audits; see the tests below.

pub mod auditor;
pub mod policy;

pub use auditor::StackAuditor;
pub use policy::{Alternative, StackPolicy};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use stagegate_contracts::{error::StageGateError, stack::Recommendation};

    use crate::{StackAuditor, StackPolicy};

    #[test]
    fn mixed_stack_audit() {
        let audit = StackAuditor::default().audit(&["postgres", "react", "kubernetes"]);

        assert!(!audit.valid);
        assert_eq!(audit.overall, "Stack needs review");
        assert_eq!(audit.tech_choices.len(), 3);

        let approved: Vec<&str> = audit
            .tech_choices
            .iter()
            .filter(|c| c.recommendation == Recommendation::Approved)
            .map(|c| c.tech.as_str())
            .collect();
        assert_eq!(approved, vec!["postgres"]);

        let react = &audit.tech_choices[1];
        assert_eq!(react.recommendation, Recommendation::Reconsider);
        assert!(!react.ai_friendly);
        assert!(!react.simpler_checked);
        let warning = react.warning.as_deref().unwrap();
        assert!(warning.contains("HTMX"), "warning: {warning}");

        let k8s = &audit.tech_choices[2];
        assert_eq!(k8s.recommendation, Recommendation::Reconsider);
        assert!(!k8s.deploy_simple);
        assert!(k8s.ai_friendly);
        assert!(k8s.warning.as_deref().unwrap().contains("Fly.io"));
    }

    #[test]
    fn simple_stack_is_approved() {
        let audit = StackAuditor::default().audit(&["FastAPI", "HTMX", "SQLite", "Tailwind"]);
        assert!(audit.valid);
        assert_eq!(audit.overall, "Stack approved");
        assert!(audit.tech_choices.iter().all(|c| c.warning.is_none()));
    }

    #[test]
    fn empty_stack_is_trivially_approved() {
        let audit = StackAuditor::default().audit::<&str>(&[]);
        assert!(audit.valid);
        assert!(audit.tech_choices.is_empty());
    }

    #[test]
    fn unknown_technology_passes_all_policies() {
        let choice = StackAuditor::default().audit_one("elixir");
        assert_eq!(choice.recommendation, Recommendation::Approved);
        assert!(choice.warning.is_none());
    }

    #[test]
    fn ai_unfriendly_without_alternative_has_no_warning() {
        let choice = StackAuditor::default().audit_one("vue");
        assert_eq!(choice.recommendation, Recommendation::Reconsider);
        assert!(!choice.ai_friendly);
        assert!(choice.simpler_checked);
        assert!(choice.warning.is_none());
    }

    #[test]
    fn docker_compose_fails_deployment_policy_only() {
        let choice = StackAuditor::default().audit_one("docker-compose");
        assert!(!choice.deploy_simple);
        assert!(choice.ai_friendly);
        assert!(choice.simpler_checked);
        assert_eq!(choice.recommendation, Recommendation::Reconsider);
    }

    /// Substring semantics produce known false positives; these pin them down.
    #[test]
    fn substring_matching_false_positives_are_preserved() {
        let auditor = StackAuditor::default();

        // "mongodb" contains "go", so the simple list short-circuits its alternative.
        assert_eq!(auditor.simpler_alternative("mongodb"), None);

        // "django" contains "go" as well, yet still fails automation friendliness.
        let django = auditor.audit_one("django");
        assert!(django.simpler_checked);
        assert!(!django.ai_friendly);

        // A simple-list match also shields a complex name containing it.
        assert_eq!(auditor.simpler_alternative("go-microservices"), None);
        assert!(auditor.simpler_alternative("microservices").is_some());
    }

    #[test]
    fn audit_is_idempotent() {
        let auditor = StackAuditor::default();
        let techs = ["postgres", "react", "kubernetes"];
        let first = serde_json::to_vec(&auditor.audit(&techs)).unwrap();
        let second = serde_json::to_vec(&auditor.audit(&techs)).unwrap();
        assert_eq!(first, second);
    }

    // ── Policy configuration ──────────────────────────────────────────────────

    #[test]
    fn toml_overrides_only_named_lists() {
        let policy = StackPolicy::from_toml_str(
            r#"
            complex_deploy = ["Nomad"]

            [[alternatives]]
            pattern = "Svelte"
            suggestion = "Consider server-rendered templates"
        "#,
        )
        .unwrap();

        assert_eq!(policy.simple, StackPolicy::default().simple);
        assert_eq!(policy.ai_unfriendly, StackPolicy::default().ai_unfriendly);

        let auditor = StackAuditor::new(policy);
        assert!(!auditor.is_deploy_simple("nomad-cluster"));
        assert!(auditor.is_deploy_simple("kubernetes"));
        assert_eq!(
            auditor.simpler_alternative("sveltekit"),
            Some("Consider server-rendered templates")
        );
    }

    #[test]
    fn malformed_policy_is_config_error() {
        match StackPolicy::from_toml_str("simple = 3") {
            Err(StageGateError::ConfigError { reason }) => {
                assert!(reason.contains("stack policy"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }
}
