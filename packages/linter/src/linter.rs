use crate::diagnostic::Finding;
use crate::rules::RuleRegistry;
use serde_json::Value;
use tracing::debug;

/// Options for configuring the linter
#[derive(Debug, Default)]
pub struct LintOptions {
    /// Custom rule registry (uses default if None)
    pub registry: Option<RuleRegistry>,
}

/// Run every registered rule over a document projection
pub fn lint_spec(spec: &Value, options: LintOptions) -> Vec<Finding> {
    let registry = options.registry.unwrap_or_default();
    run_rules(spec, &registry)
}

pub(crate) fn run_rules(spec: &Value, registry: &RuleRegistry) -> Vec<Finding> {
    let mut findings = Vec::new();
    for rule in registry.rules() {
        let found = rule.check(spec);
        if !found.is_empty() {
            debug!(rule = rule.name(), count = found.len(), "rule reported findings");
        }
        findings.extend(found);
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ServersDefinedRule;
    use serde_json::json;

    #[test]
    fn test_custom_registry() {
        let mut registry = RuleRegistry::empty();
        registry.add_rule(Box::new(ServersDefinedRule));
        let findings = lint_spec(
            &json!({}),
            LintOptions {
                registry: Some(registry),
            },
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, "servers-defined");
    }

    #[test]
    fn test_default_registry_on_minimal_spec() {
        let spec = json!({
            "openapi": "3.0.3",
            "info": {"title": "T", "version": "1"},
            "servers": [{"url": "/"}],
            "paths": {}
        });
        assert!(lint_spec(&spec, LintOptions::default()).is_empty());
    }
}
