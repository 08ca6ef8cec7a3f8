//! Scan and parse errors: recoverable, span-carrying, never fatal to the
//! pipeline. Semantic-level findings live in [`crate::diagnostic`].

use crate::token::{LineIndex, Span, TokenKind};

#[derive(Debug, Clone)]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ScanErrorKind {
    UnexpectedByte(char),
    UnterminatedString,
    InvalidEscape(char),
}

impl ScanError {
    pub fn message(&self) -> String {
        match &self.kind {
            ScanErrorKind::UnexpectedByte(c) => format!("unexpected character '{}'", c),
            ScanErrorKind::UnterminatedString => "unterminated string literal".to_string(),
            ScanErrorKind::InvalidEscape(c) => format!("invalid escape sequence '\\{}'", c),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ParseErrorKind {
    UnexpectedToken { expected: &'static str, found: TokenKind },
    ExpectedIdentifier { found: TokenKind },
    ExpectedExpression { found: TokenKind },
    ExpectedStatement { found: TokenKind },
    ExpectedType { found: TokenKind },
    UnexpectedEof { expected: &'static str },
    DuplicateStructField { name: String },
}

impl ParseError {
    pub fn message(&self) -> String {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                format!("expected {}, found {:?}", expected, found)
            }
            ParseErrorKind::ExpectedIdentifier { found } => {
                format!("expected an identifier, found {:?}", found)
            }
            ParseErrorKind::ExpectedExpression { found } => {
                format!("expected an expression, found {:?}", found)
            }
            ParseErrorKind::ExpectedStatement { found } => {
                format!("expected a statement, found {:?}", found)
            }
            ParseErrorKind::ExpectedType { found } => {
                format!("expected a type, found {:?}", found)
            }
            ParseErrorKind::UnexpectedEof { expected } => {
                format!("unexpected end of file, expected {}", expected)
            }
            ParseErrorKind::DuplicateStructField { name } => {
                format!("duplicate struct field '{}'", name)
            }
        }
    }

    /// Render the error with a caret pointing at the offending span, in the
    /// style of the teacher's `error.rs::display_with_source`.
    pub fn display_with_source(&self, filename: &str, source: &str) -> String {
        let idx = LineIndex::new(filename, source);
        let start = idx.span_start(self.span);
        let line_content = idx.line_text(source, start.line);
        let col = start.column.saturating_sub(1) as usize;
        let len = (self.span.end - self.span.start).max(1) as usize;
        let underline = format!("{}{}", " ".repeat(col), "^".repeat(len));
        format!(
            "error: {}\n\n{:4} | {}\n     | {}",
            self.message(),
            start.line,
            line_content,
            underline
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_caret_under_span() {
        let err = ParseError {
            kind: ParseErrorKind::ExpectedExpression { found: TokenKind::Semicolon },
            span: Span::new(4, 5),
        };
        let rendered = err.display_with_source("t.ka", "let x;");
        assert!(rendered.contains("^"));
        assert!(rendered.contains("let x;"));
    }
}
