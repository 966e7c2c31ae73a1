use crate::diagnostic::Finding;
use crate::rules::LintRule;
use serde_json::Value;

/// Requires a string `openapi` field naming a 3.x version
pub struct OpenApiVersionRule;

impl LintRule for OpenApiVersionRule {
    fn name(&self) -> &'static str {
        "openapi-version"
    }

    fn description(&self) -> &'static str {
        "The openapi field must be present and declare a 3.x version"
    }

    fn check(&self, spec: &Value) -> Vec<Finding> {
        let rule = self.name();
        match spec.get("openapi") {
            None => vec![Finding::error(rule, "/openapi", "Missing required field 'openapi'")
                .with_suggestion("Add `openapi: 3.0.3` at the top of the document")],
            Some(Value::String(version)) if version.starts_with("3.") => Vec::new(),
            Some(Value::String(version)) => vec![Finding::error(
                rule,
                "/openapi",
                format!("Unsupported OpenAPI version '{}'", version),
            )],
            Some(Value::Number(number)) => {
                let text = number.to_string();
                let mut findings = vec![Finding::warn(
                    rule,
                    "/openapi",
                    "The openapi version should be a string",
                )
                .with_suggestion(format!("Quote the version: openapi: \"{}\"", text))];
                if !text.starts_with("3.") {
                    findings.push(Finding::error(
                        rule,
                        "/openapi",
                        format!("Unsupported OpenAPI version '{}'", text),
                    ));
                }
                findings
            }
            Some(_) => vec![Finding::error(rule, "/openapi", "The openapi field must be a string")],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::RuleSeverity;
    use serde_json::json;

    #[test]
    fn test_accepts_3x_strings() {
        assert!(OpenApiVersionRule.check(&json!({"openapi": "3.1.0"})).is_empty());
    }

    #[test]
    fn test_missing_and_unsupported() {
        let findings = OpenApiVersionRule.check(&json!({}));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, RuleSeverity::Error);

        let findings = OpenApiVersionRule.check(&json!({"openapi": "2.0"}));
        assert_eq!(findings[0].message, "Unsupported OpenAPI version '2.0'");
    }

    #[test]
    fn test_numeric_version_warns() {
        let findings = OpenApiVersionRule.check(&json!({"openapi": 3.1}));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, RuleSeverity::Warn);
    }
}
