use crate::diagnostic::Finding;
use crate::rules::LintRule;
use apistudio_document::NodePath;
use serde_json::Value;

/// Path templates must start with `/`
pub struct PathKeysRule;

impl LintRule for PathKeysRule {
    fn name(&self) -> &'static str {
        "path-keys"
    }

    fn description(&self) -> &'static str {
        "Keys of the paths object must start with a slash"
    }

    fn check(&self, spec: &Value) -> Vec<Finding> {
        let Some(paths) = spec.get("paths").and_then(Value::as_object) else {
            return Vec::new();
        };

        paths
            .keys()
            .filter(|route| !route.starts_with('/') && !route.starts_with("x-"))
            .map(|route| {
                Finding::error(
                    self.name(),
                    NodePath::from(["paths", route.as_str()]).to_pointer(),
                    format!("Path '{}' must start with '/'", route),
                )
                .with_suggestion(format!("Rename the path to '/{}'", route))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flags_relative_paths() {
        let spec = json!({"paths": {"/ok": {}, "pets": {}, "x-internal": {}}});
        let findings = PathKeysRule.check(&spec);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pointer, "/paths/pets");
    }
}
