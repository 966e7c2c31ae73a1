use crate::diagnostic::Finding;
use crate::rules::{operations, LintRule};
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

static TEMPLATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^{}/]+)\}").unwrap());

/// Templated path segments must match declared `in: path` parameters
pub struct PathParamsRule;

impl LintRule for PathParamsRule {
    fn name(&self) -> &'static str {
        "path-params"
    }

    fn description(&self) -> &'static str {
        "Path template variables must be declared as required path parameters"
    }

    fn check(&self, spec: &Value) -> Vec<Finding> {
        let mut findings = Vec::new();

        for op in operations(spec) {
            let templated: BTreeSet<&str> = TEMPLATE
                .captures_iter(op.route)
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
                .collect();

            // Path-level parameters first, operation-level ones override
            let mut declared = BTreeSet::new();
            let sources = [
                (op.item.get("parameters"), None),
                (op.body.get("parameters"), Some(op.method)),
            ];
            for (params, method) in sources {
                let Some(params) = params.and_then(Value::as_array) else {
                    continue;
                };
                for (index, param) in params.iter().enumerate() {
                    if param.get("in").and_then(Value::as_str) != Some("path") {
                        continue;
                    }
                    let Some(name) = param.get("name").and_then(Value::as_str) else {
                        continue;
                    };
                    declared.insert(name);

                    let mut at = op.path();
                    if method.is_none() {
                        at = at.parent().unwrap_or(at);
                    }
                    let at = at.child("parameters").child(index);

                    if !templated.contains(name) {
                        findings.push(Finding::error(
                            self.name(),
                            at.to_pointer(),
                            format!("Path parameter '{}' does not appear in '{}'", name, op.route),
                        ));
                    } else if param.get("required") != Some(&Value::Bool(true)) {
                        findings.push(
                            Finding::error(
                                self.name(),
                                at.child("required").to_pointer(),
                                format!("Path parameter '{}' must be required", name),
                            )
                            .with_suggestion("Set `required: true`"),
                        );
                    }
                }
            }

            for name in templated.difference(&declared) {
                findings.push(
                    Finding::error(
                        self.name(),
                        op.pointer(),
                        format!("{} does not declare path parameter '{}'", op.label(), name),
                    )
                    .with_suggestion(format!(
                        "Add a parameter with `name: {}`, `in: path` and `required: true`",
                        name
                    )),
                );
            }
        }

        // Path-level parameters are seen once per operation
        let mut seen = HashSet::new();
        findings.retain(|f| seen.insert((f.pointer.clone(), f.message.clone())));
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_declared_params_pass() {
        let spec = json!({
            "paths": {
                "/pets/{id}": {
                    "parameters": [{"name": "id", "in": "path", "required": true}],
                    "get": {},
                    "delete": {}
                }
            }
        });
        assert!(PathParamsRule.check(&spec).is_empty());
    }

    #[test]
    fn test_undeclared_and_unknown_params() {
        let spec = json!({
            "paths": {
                "/pets/{id}": {
                    "get": {
                        "parameters": [
                            {"name": "other", "in": "path", "required": true},
                            {"name": "limit", "in": "query"}
                        ]
                    }
                }
            }
        });
        let findings = PathParamsRule.check(&spec);
        let pointers: Vec<&str> = findings.iter().map(|f| f.pointer.as_str()).collect();
        assert_eq!(
            pointers,
            vec!["/paths/~1pets~1{id}/get/parameters/0", "/paths/~1pets~1{id}/get"]
        );
    }

    #[test]
    fn test_path_params_must_be_required() {
        let spec = json!({
            "paths": {"/a/{x}": {"get": {"parameters": [{"name": "x", "in": "path"}]}}}
        });
        let findings = PathParamsRule.check(&spec);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pointer, "/paths/~1a~1{x}/get/parameters/0/required");
    }
}
