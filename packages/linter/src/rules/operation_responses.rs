use crate::diagnostic::Finding;
use crate::rules::{operations, LintRule};
use serde_json::Value;

/// Every operation must describe at least one response
pub struct OperationResponsesRule;

impl LintRule for OperationResponsesRule {
    fn name(&self) -> &'static str {
        "operation-responses"
    }

    fn description(&self) -> &'static str {
        "Operations must declare a non-empty responses object"
    }

    fn check(&self, spec: &Value) -> Vec<Finding> {
        let mut findings = Vec::new();
        for op in operations(spec) {
            match op.body.get("responses") {
                Some(Value::Object(responses)) if !responses.is_empty() => {}
                Some(Value::Object(_)) => findings.push(Finding::error(
                    self.name(),
                    op.path().child("responses").to_pointer(),
                    format!("{} declares no responses", op.label()),
                )),
                Some(_) => findings.push(Finding::error(
                    self.name(),
                    op.path().child("responses").to_pointer(),
                    format!("Responses of {} must be an object", op.label()),
                )),
                None => findings.push(
                    Finding::error(
                        self.name(),
                        op.pointer(),
                        format!("{} is missing required field 'responses'", op.label()),
                    )
                    .with_suggestion("Describe at least one response, e.g. '200'"),
                ),
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_and_empty_responses() {
        let spec = json!({
            "paths": {
                "/a": {
                    "get": {"responses": {"200": {"description": "ok"}}},
                    "post": {},
                    "put": {"responses": {}}
                }
            }
        });
        let findings = OperationResponsesRule.check(&spec);
        let pointers: Vec<&str> = findings.iter().map(|f| f.pointer.as_str()).collect();
        assert_eq!(pointers, vec!["/paths/~1a/put/responses", "/paths/~1a/post"]);
    }
}
