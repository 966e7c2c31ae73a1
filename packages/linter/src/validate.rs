//! Text in, diagnostics out.
//!
//! Rule findings are located by JSON pointer; this module turns them into
//! [`ValidationError`]s carrying a [`NodePath`] and the source position of
//! the node they name (or its nearest existing ancestor).

use crate::diagnostic::{Finding, Severity, ValidationError, ValidationResult};
use crate::linter::run_rules;
use crate::rules::RuleRegistry;
use apistudio_document::{nearest_position, parse, pointer_to_path, Document, NodePath, ParseError};

/// Validate document text with the built-in rules
pub fn validate(text: &str) -> ValidationResult {
    validate_with(text, &RuleRegistry::default())
}

/// Validate document text with a custom rule set.
///
/// Never fails: unparsable text yields a single error with an empty path.
pub fn validate_with(text: &str, registry: &RuleRegistry) -> ValidationResult {
    let parsed = match parse(text) {
        Ok(parsed) => parsed,
        Err(err) => return ValidationResult::new(vec![parse_failure(&err)]),
    };

    let errors = run_rules(&parsed.projection, registry)
        .into_iter()
        .map(|finding| to_validation_error(finding, &parsed.document))
        .collect();
    ValidationResult::new(errors)
}

fn parse_failure(err: &ParseError) -> ValidationError {
    let error =
        ValidationError::new(err.to_string(), NodePath::root(), Severity::Error).with_rule("parse");
    match err.position() {
        Some(pos) => error.at(pos.line, pos.column),
        None => error,
    }
}

fn to_validation_error(finding: Finding, document: &Document) -> ValidationError {
    let path = pointer_to_path(&finding.pointer);
    let pos = nearest_position(document, &path);
    ValidationError {
        message: finding.message,
        path,
        severity: finding.severity.into(),
        source_location: None,
        rule: Some(finding.rule),
        suggestion: finding.suggestion,
    }
    .at(pos.line, pos.column)
}
