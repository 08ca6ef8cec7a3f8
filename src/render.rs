//! Diagnostic pretty-printing for the `kalc` CLI, in the caret-underline
//! style of [`crate::error::ParseError::display_with_source`]. Library
//! consumers of [`crate::analyze`] get plain `Diagnostic` values; this
//! module is purely an outer-surface concern.

use crate::diagnostic::{Diagnostic, Severity};
use crate::token::LineIndex;

pub fn render_diagnostic(diag: &Diagnostic, filename: &str, source: &str) -> String {
    let idx = LineIndex::new(filename, source);
    let start = idx.span_start(diag.span);
    let line_content = idx.line_text(source, start.line);
    let col = start.column.saturating_sub(1) as usize;
    let len = (diag.span.end - diag.span.start).max(1) as usize;
    let underline = format!("{}{}", " ".repeat(col), "^".repeat(len));

    let level = match diag.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };

    let mut out = format!(
        "{level}[{}]: {}\n  --> {filename}:{}:{}\n{:4} | {}\n     | {}",
        diag.code.as_str(),
        diag.message,
        start.line,
        start.column,
        start.line,
        line_content,
        underline
    );

    if let Some(help) = &diag.help {
        out.push_str(&format!("\n     = help: {help}"));
    }
    for suggestion in &diag.suggestions {
        out.push_str(&format!("\n     = suggestion: {}", suggestion.message));
    }
    for note in &diag.notes {
        out.push_str(&format!("\n     = note: {note}"));
    }
    out
}

pub fn render_scan_error(err: &crate::error::ScanError, filename: &str, source: &str) -> String {
    let idx = LineIndex::new(filename, source);
    let start = idx.span_start(err.span);
    format!("error: {} at {filename}:{}:{}", err.message(), start.line, start.column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;
    use crate::token::Span;

    #[test]
    fn render_includes_code_and_caret() {
        let diag = Diagnostic::error(DiagnosticCode::UndefinedVariable, "undefined variable 'x'", Span::new(4, 5));
        let rendered = render_diagnostic(&diag, "t.ka", "let y = x;");
        assert!(rendered.contains("E0001"));
        assert!(rendered.contains('^'));
    }
}
