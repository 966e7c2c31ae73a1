use apistudio_document::NodePath;
use serde::{Deserialize, Serialize};

/// Severity as reported by rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Error,
    Warn,
    Info,
    Hint,
}

/// A rule finding, located by JSON pointer into the projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: String,
    pub severity: RuleSeverity,
    pub pointer: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl Finding {
    pub fn new(
        rule: impl Into<String>,
        severity: RuleSeverity,
        pointer: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity,
            pointer: pointer.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn error(
        rule: impl Into<String>,
        pointer: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(rule, RuleSeverity::Error, pointer, message)
    }

    pub fn warn(
        rule: impl Into<String>,
        pointer: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(rule, RuleSeverity::Warn, pointer, message)
    }

    pub fn info(
        rule: impl Into<String>,
        pointer: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(rule, RuleSeverity::Info, pointer, message)
    }

    pub fn hint(
        rule: impl Into<String>,
        pointer: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(rule, RuleSeverity::Hint, pointer, message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl From<RuleSeverity> for Severity {
    fn from(severity: RuleSeverity) -> Self {
        match severity {
            RuleSeverity::Error => Severity::Error,
            RuleSeverity::Warn => Severity::Warning,
            RuleSeverity::Info | RuleSeverity::Hint => Severity::Info,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// 1-based position in the validated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

/// A diagnostic attached to a location in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Human-readable message
    pub message: String,

    /// Location in the projection; empty for document-level problems
    pub path: NodePath,

    /// The severity level
    pub severity: Severity,

    /// Where the problem was found in the source text
    pub source_location: Option<SourceLocation>,

    /// The rule that generated this diagnostic
    pub rule: Option<String>,

    /// Optional suggestion for fixing the issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, path: NodePath, severity: Severity) -> Self {
        Self {
            message: message.into(),
            path,
            severity,
            source_location: None,
            rule: None,
            suggestion: None,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.source_location = Some(SourceLocation { line, column });
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

/// Outcome of one validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub counts: SeverityCounts,
}

impl ValidationResult {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        let mut counts = SeverityCounts::default();
        for error in &errors {
            match error.severity {
                Severity::Error => counts.errors += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Info => counts.infos += 1,
            }
        }
        Self { errors, counts }
    }

    /// A result holding one document-level error
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(vec![ValidationError::new(message, NodePath::root(), Severity::Error)])
    }

    pub fn has_errors(&self) -> bool {
        self.counts.errors > 0
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_normalizes_to_info() {
        assert_eq!(Severity::from(RuleSeverity::Hint), Severity::Info);
        assert_eq!(Severity::from(RuleSeverity::Warn), Severity::Warning);
    }

    #[test]
    fn test_counts_sum_to_total() {
        let result = ValidationResult::new(vec![
            ValidationError::new("a", NodePath::root(), Severity::Error),
            ValidationError::new("b", NodePath::root(), Severity::Warning),
            ValidationError::new("c", NodePath::root(), Severity::Info),
            ValidationError::new("d", NodePath::root(), Severity::Info),
        ]);
        assert_eq!(result.counts.total(), result.errors.len());
        assert_eq!(result.counts.infos, 2);
        assert!(result.has_errors());
    }

    #[test]
    fn test_failure_has_empty_path() {
        let result = ValidationResult::failure("boom");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].path.is_root());
        assert_eq!(result.errors[0].severity, Severity::Error);
    }
}
