mod diagnostic;
mod linter;
mod rules;
mod validate;

pub use diagnostic::{
    Finding, RuleSeverity, Severity, SeverityCounts, SourceLocation, ValidationError,
    ValidationResult,
};
pub use linter::{lint_spec, LintOptions};
pub use rules::{LintRule, RuleRegistry};
pub use validate::{validate, validate_with};
