use crate::diagnostic::Finding;
use crate::rules::LintRule;
use apistudio_document::{pointer_to_path, NodePath};
use serde_json::Value;

/// Local `$ref` values (`#/...`) must point at an existing node.
/// References to other files are not followed.
pub struct LocalRefsRule;

impl LintRule for LocalRefsRule {
    fn name(&self) -> &'static str {
        "local-refs"
    }

    fn description(&self) -> &'static str {
        "Local references must resolve inside the document"
    }

    fn check(&self, spec: &Value) -> Vec<Finding> {
        let mut findings = Vec::new();
        walk(spec, spec, &mut NodePath::root(), &mut findings);
        findings
    }
}

fn walk(spec: &Value, node: &Value, at: &mut NodePath, findings: &mut Vec<Finding>) {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                if let Some(pointer) = reference.strip_prefix('#') {
                    if resolve(spec, &pointer_to_path(pointer)).is_none() {
                        findings.push(Finding::error(
                            "local-refs",
                            at.child("$ref").to_pointer(),
                            format!("Reference '{}' does not resolve", reference),
                        ));
                    }
                }
            }
            for (key, value) in map {
                at.push(key);
                walk(spec, value, at, findings);
                at.pop();
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                at.push(index);
                walk(spec, value, at, findings);
                at.pop();
            }
        }
        _ => {}
    }
}

fn resolve<'a>(spec: &'a Value, path: &NodePath) -> Option<&'a Value> {
    path.segments().iter().try_fold(spec, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_broken_local_ref() {
        let spec = json!({
            "components": {"schemas": {"Pet": {"type": "object"}}},
            "paths": {
                "/a": {
                    "get": {
                        "responses": {
                            "200": {"$ref": "#/components/schemas/Pet"},
                            "404": {"$ref": "#/components/schemas/Missing"},
                            "500": {"$ref": "errors.yaml#/Error"}
                        }
                    }
                }
            }
        });
        let findings = LocalRefsRule.check(&spec);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pointer, "/paths/~1a/get/responses/404/$ref");
    }

    #[test]
    fn test_escaped_ref_segments() {
        let spec = json!({
            "paths": {"/a/b": {"get": {}}},
            "x-link": {"$ref": "#/paths/~1a~1b/get"}
        });
        assert!(LocalRefsRule.check(&spec).is_empty());
    }
}
