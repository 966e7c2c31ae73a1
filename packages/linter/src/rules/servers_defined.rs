use crate::diagnostic::Finding;
use crate::rules::LintRule;
use serde_json::Value;

pub struct ServersDefinedRule;

impl LintRule for ServersDefinedRule {
    fn name(&self) -> &'static str {
        "servers-defined"
    }

    fn description(&self) -> &'static str {
        "Suggest declaring at least one server"
    }

    fn check(&self, spec: &Value) -> Vec<Finding> {
        match spec.get("servers") {
            Some(Value::Array(servers)) if !servers.is_empty() => Vec::new(),
            _ => vec![Finding::hint(self.name(), "/servers", "No servers are declared")
                .with_suggestion("Add a servers list with the API base URL")],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::RuleSeverity;
    use serde_json::json;

    #[test]
    fn test_hint_when_missing() {
        let findings = ServersDefinedRule.check(&json!({"servers": []}));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, RuleSeverity::Hint);
        assert!(ServersDefinedRule.check(&json!({"servers": [{"url": "/"}]})).is_empty());
    }
}
