use crate::diagnostic::Finding;
use crate::rules::LintRule;
use serde_json::Value;

/// Requires `info` with a title and a version
pub struct InfoRequiredRule;

impl LintRule for InfoRequiredRule {
    fn name(&self) -> &'static str {
        "info-required"
    }

    fn description(&self) -> &'static str {
        "The info object must declare a title and a version"
    }

    fn check(&self, spec: &Value) -> Vec<Finding> {
        let rule = self.name();
        let info = match spec.get("info") {
            None => return vec![Finding::error(rule, "/info", "Missing required field 'info'")],
            Some(Value::Object(info)) => info,
            Some(_) => {
                return vec![Finding::error(rule, "/info", "The info field must be an object")]
            }
        };

        let mut findings = Vec::new();

        match info.get("title") {
            Some(Value::String(title)) if !title.trim().is_empty() => {}
            Some(Value::String(_)) => {
                findings.push(Finding::error(rule, "/info/title", "The API title is empty"))
            }
            Some(_) => findings.push(Finding::error(
                rule,
                "/info/title",
                "The API title must be a string",
            )),
            None => findings.push(Finding::error(
                rule,
                "/info/title",
                "Missing required field 'info.title'",
            )),
        }

        match info.get("version") {
            Some(Value::String(_)) => {}
            Some(Value::Number(n)) => findings.push(
                Finding::warn(rule, "/info/version", "The API version should be a string")
                    .with_suggestion(format!("Quote the version: version: \"{}\"", n)),
            ),
            Some(_) => findings.push(Finding::error(
                rule,
                "/info/version",
                "The API version must be a string",
            )),
            None => findings.push(Finding::error(
                rule,
                "/info/version",
                "Missing required field 'info.version'",
            )),
        }

        findings
    }
}
