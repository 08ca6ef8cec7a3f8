//! Semantic diagnostics: the output of [`crate::analyze`]. Diagnostics are
//! plain data (§7 of the spec) — the analyzer never panics or aborts to
//! report a user-facing error.

use crate::token::Span;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Stable diagnostic codes, per the external interface contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCode {
    UndefinedVariable,
    UndefinedFunction,
    TypeMismatch,
    DuplicateDeclaration,
    InvalidAttribute,
    InvalidConstructor,
    InvalidReadsWrites,
    InvalidAssignment,
    UninitializedVariable,
    MissingReturn,
    NumericOverflow,
    DuplicateField,
    MissingField,
    UndefinedModule,
    VoidInExpression,
    StorageAccess,
    UnreachableCode,
    GenericSemantic,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::UndefinedVariable => "E0001",
            DiagnosticCode::UndefinedFunction => "E0002",
            DiagnosticCode::TypeMismatch => "E0003",
            DiagnosticCode::DuplicateDeclaration => "E0004",
            DiagnosticCode::InvalidAttribute => "E0005",
            DiagnosticCode::InvalidConstructor => "E0006",
            DiagnosticCode::InvalidReadsWrites => "E0007",
            DiagnosticCode::InvalidAssignment => "E0008",
            DiagnosticCode::UninitializedVariable => "E0009",
            DiagnosticCode::MissingReturn => "E0010",
            DiagnosticCode::NumericOverflow => "E0011",
            DiagnosticCode::DuplicateField => "E0012",
            DiagnosticCode::MissingField => "E0013",
            DiagnosticCode::UndefinedModule => "E0014",
            DiagnosticCode::VoidInExpression => "E0015",
            DiagnosticCode::StorageAccess => "E0016",
            DiagnosticCode::UnreachableCode => "E0017",
            DiagnosticCode::GenericSemantic => "E0099",
        }
    }
}

/// Serializes as the stable `"E0001"`-style identifier rather than the
/// variant name, since that's the contract external tooling consumes.
impl Serialize for DiagnosticCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub message: String,
    pub replacement_span: Option<Span>,
    pub replacement: Option<String>,
}

impl Suggestion {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), replacement_span: None, replacement: None }
    }

    pub fn with_replacement(mut self, span: Span, replacement: impl Into<String>) -> Self {
        self.replacement_span = Some(span);
        self.replacement = Some(replacement.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub help: Option<String>,
    pub suggestions: Vec<Suggestion>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            span,
            help: None,
            suggestions: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            span,
            help: None,
            suggestions: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Span;

    #[test]
    fn code_strings_are_stable() {
        assert_eq!(DiagnosticCode::UndefinedVariable.as_str(), "E0001");
        assert_eq!(DiagnosticCode::UnreachableCode.as_str(), "E0017");
        assert_eq!(DiagnosticCode::GenericSemantic.as_str(), "E0099");
    }

    #[test]
    fn builder_chains_suggestions_and_notes() {
        let diag = Diagnostic::error(DiagnosticCode::InvalidAssignment, "bad", Span::new(0, 1))
            .with_help("try this")
            .with_suggestion(Suggestion::new("add 'mut'"))
            .with_note("see also");
        assert_eq!(diag.suggestions.len(), 1);
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.as_deref(), Some("try this"));
    }
}
