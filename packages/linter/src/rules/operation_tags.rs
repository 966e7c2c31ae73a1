use crate::diagnostic::Finding;
use crate::rules::{operations, LintRule};
use serde_json::Value;
use std::collections::HashSet;

/// Operation tags should be declared in the top-level tags list
pub struct OperationTagsRule;

impl LintRule for OperationTagsRule {
    fn name(&self) -> &'static str {
        "operation-tags"
    }

    fn description(&self) -> &'static str {
        "Tags used by operations should be declared globally"
    }

    fn check(&self, spec: &Value) -> Vec<Finding> {
        let declared: HashSet<&str> = spec
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(|tag| tag.get("name").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        let mut findings = Vec::new();
        for op in operations(spec) {
            let Some(tags) = op.body.get("tags").and_then(Value::as_array) else {
                continue;
            };
            for (index, tag) in tags.iter().enumerate() {
                let Some(name) = tag.as_str() else {
                    continue;
                };
                if !declared.contains(name) {
                    findings.push(
                        Finding::info(
                            self.name(),
                            op.path().child("tags").child(index).to_pointer(),
                            format!("Tag '{}' is not declared in the top-level tags", name),
                        )
                        .with_suggestion(format!("Add `- name: {}` to the tags list", name)),
                    );
                }
            }
        }
        findings
    }
}
