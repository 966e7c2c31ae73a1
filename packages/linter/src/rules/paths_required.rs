use crate::diagnostic::Finding;
use crate::rules::LintRule;
use serde_json::Value;

/// Requires a `paths` object. OpenAPI 3.1 documents may omit it when they
/// declare webhooks or components instead.
pub struct PathsRequiredRule;

impl LintRule for PathsRequiredRule {
    fn name(&self) -> &'static str {
        "paths-required"
    }

    fn description(&self) -> &'static str {
        "The document must declare a paths object"
    }

    fn check(&self, spec: &Value) -> Vec<Finding> {
        match spec.get("paths") {
            Some(Value::Object(_)) => Vec::new(),
            Some(_) => vec![Finding::error(
                self.name(),
                "/paths",
                "The paths field must be an object",
            )],
            None => {
                let is_31 = spec
                    .get("openapi")
                    .and_then(Value::as_str)
                    .is_some_and(|v| v.starts_with("3.1"));
                let has_alternative =
                    spec.get("webhooks").is_some() || spec.get("components").is_some();
                if is_31 && has_alternative {
                    Vec::new()
                } else {
                    vec![Finding::error(self.name(), "/paths", "Missing required field 'paths'")
                        .with_suggestion("Add `paths: {}`")]
                }
            }
        }
    }
}
