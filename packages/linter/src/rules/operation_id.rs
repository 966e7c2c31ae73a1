use crate::diagnostic::Finding;
use crate::rules::{operations, LintRule};
use serde_json::Value;
use std::collections::HashMap;

/// Operations should carry an operationId, and ids must be unique
pub struct OperationIdRule;

impl LintRule for OperationIdRule {
    fn name(&self) -> &'static str {
        "operation-id"
    }

    fn description(&self) -> &'static str {
        "Operations should have a unique operationId"
    }

    fn check(&self, spec: &Value) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut seen: HashMap<&str, String> = HashMap::new();

        for op in operations(spec) {
            match op.body.get("operationId").and_then(Value::as_str) {
                Some(id) => {
                    if let Some(first) = seen.get(id) {
                        findings.push(Finding::error(
                            self.name(),
                            op.path().child("operationId").to_pointer(),
                            format!("operationId '{}' is already used by {}", id, first),
                        ));
                    } else {
                        seen.insert(id, op.label());
                    }
                }
                None => findings.push(Finding::warn(
                    self.name(),
                    op.pointer(),
                    format!("{} has no operationId", op.label()),
                )),
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::RuleSeverity;
    use serde_json::json;

    #[test]
    fn test_missing_and_duplicate_ids() {
        let spec = json!({
            "paths": {
                "/a": {"get": {"operationId": "list"}, "post": {}},
                "/b": {"get": {"operationId": "list"}}
            }
        });
        let findings = OperationIdRule.check(&spec);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].severity, RuleSeverity::Warn);
        assert_eq!(findings[1].severity, RuleSeverity::Error);
        assert_eq!(findings[1].pointer, "/paths/~1b/get/operationId");
        assert!(findings[1].message.contains("GET /a"));
    }
}
