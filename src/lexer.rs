//! Scanner: UTF-8 byte stream -> token stream. Never aborts; on an
//! unexpected byte it emits a [`ScanError`] and resynchronizes at the next
//! whitespace or punctuation byte, per §4.1.

use crate::error::{ScanError, ScanErrorKind};
use crate::intern::Interner;
use crate::token::{AssignOp, NumberBase, Span, Token, TokenKind, TriviaKind, KEYWORDS};

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    interner: &'a mut Interner,
    errors: Vec<ScanError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, interner: &'a mut Interner) -> Self {
        Self { source, bytes: source.as_bytes(), pos: 0, interner, errors: Vec::new() }
    }

    /// Scan the whole source, returning the token stream (always ending in
    /// `Eof`) plus any scan errors encountered along the way.
    pub fn scan(mut self) -> (Vec<Token>, Vec<ScanError>) {
        let mut tokens = Vec::new();
        loop {
            self.skip_inline_whitespace();
            let start = self.pos;
            match self.bump() {
                None => {
                    tokens.push(Token::new(TokenKind::Eof, Span::new(start as u32, start as u32)));
                    break;
                }
                Some(b) => {
                    if let Some(tok) = self.scan_token(b, start) {
                        tokens.push(tok);
                    }
                }
            }
        }
        (tokens, self.errors)
    }

    fn skip_inline_whitespace(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b' ' || b == b'\t' || b == b'\r' || b == b'\n' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.pos += 1;
        Some(b)
    }

    fn span(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }

    fn scan_token(&mut self, b: u8, start: usize) -> Option<Token> {
        match b {
            b'{' => Some(Token::new(TokenKind::LBrace, self.span(start))),
            b'}' => Some(Token::new(TokenKind::RBrace, self.span(start))),
            b'(' => Some(Token::new(TokenKind::LParen, self.span(start))),
            b')' => Some(Token::new(TokenKind::RParen, self.span(start))),
            b'[' => Some(Token::new(TokenKind::LBracket, self.span(start))),
            b']' => Some(Token::new(TokenKind::RBracket, self.span(start))),
            b',' => Some(Token::new(TokenKind::Comma, self.span(start))),
            b';' => Some(Token::new(TokenKind::Semicolon, self.span(start))),
            b':' => {
                if self.peek_byte() == Some(b':') {
                    self.pos += 1;
                    Some(Token::new(TokenKind::ColonColon, self.span(start)))
                } else {
                    Some(Token::new(TokenKind::Colon, self.span(start)))
                }
            }
            b'.' => Some(Token::new(TokenKind::Dot, self.span(start))),
            b'@' => Some(Token::new(TokenKind::At, self.span(start))),
            b'?' => Some(Token::new(TokenKind::Question, self.span(start))),
            b'&' => {
                if self.peek_byte() == Some(b'&') {
                    self.pos += 1;
                    Some(Token::new(TokenKind::AndAnd, self.span(start)))
                } else {
                    Some(Token::new(TokenKind::Amp, self.span(start)))
                }
            }
            b'|' => {
                if self.peek_byte() == Some(b'|') {
                    self.pos += 1;
                    Some(Token::new(TokenKind::OrOr, self.span(start)))
                } else {
                    self.error_unexpected(b, start);
                    None
                }
            }
            b'#' => {
                if self.peek_byte() == Some(b'[') {
                    self.pos += 1;
                    Some(Token::new(TokenKind::AttrLeadIn, self.span(start)))
                } else {
                    Some(Token::new(TokenKind::Hash, self.span(start)))
                }
            }
            b'!' => {
                if self.peek_byte() == Some(b'=') {
                    self.pos += 1;
                    Some(Token::new(TokenKind::NotEq, self.span(start)))
                } else {
                    Some(Token::new(TokenKind::Bang, self.span(start)))
                }
            }
            b'=' => {
                if self.peek_byte() == Some(b'=') {
                    self.pos += 1;
                    Some(Token::new(TokenKind::EqEq, self.span(start)))
                } else {
                    Some(Token::new(TokenKind::Assign(AssignOp::Assign), self.span(start)))
                }
            }
            b'<' => {
                if self.peek_byte() == Some(b'=') {
                    self.pos += 1;
                    Some(Token::new(TokenKind::LtEq, self.span(start)))
                } else {
                    Some(Token::new(TokenKind::Lt, self.span(start)))
                }
            }
            b'>' => {
                if self.peek_byte() == Some(b'=') {
                    self.pos += 1;
                    Some(Token::new(TokenKind::GtEq, self.span(start)))
                } else {
                    Some(Token::new(TokenKind::Gt, self.span(start)))
                }
            }
            b'+' => Some(self.scan_maybe_assign(start, TokenKind::Plus, AssignOp::AddAssign)),
            b'-' => {
                if self.peek_byte() == Some(b'>') {
                    self.pos += 1;
                    Some(Token::new(TokenKind::Arrow, self.span(start)))
                } else {
                    Some(self.scan_maybe_assign(start, TokenKind::Minus, AssignOp::SubAssign))
                }
            }
            b'*' => Some(self.scan_maybe_assign(start, TokenKind::Star, AssignOp::MulAssign)),
            b'%' => Some(self.scan_maybe_assign(start, TokenKind::Percent, AssignOp::RemAssign)),
            b'/' => {
                if self.peek_byte() == Some(b'/') {
                    self.pos += 1;
                    let is_doc = self.peek_byte() == Some(b'/');
                    if is_doc {
                        self.pos += 1;
                    }
                    self.scan_comment(start, is_doc)
                } else {
                    Some(self.scan_maybe_assign(start, TokenKind::Slash, AssignOp::DivAssign))
                }
            }
            b'"' => self.scan_string(start),
            b'0'..=b'9' => Some(self.scan_number(b, start)),
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => Some(self.scan_ident(start)),
            other => {
                self.error_unexpected(other, start);
                None
            }
        }
    }

    fn scan_maybe_assign(&mut self, start: usize, plain: TokenKind, compound: AssignOp) -> Token {
        if self.peek_byte() == Some(b'=') {
            self.pos += 1;
            Token::new(TokenKind::Assign(compound), self.span(start))
        } else {
            Token::new(plain, self.span(start))
        }
    }

    fn scan_comment(&mut self, start: usize, is_doc: bool) -> Option<Token> {
        let text_start = self.pos;
        while let Some(b) = self.peek_byte() {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
        let text = &self.source[text_start..self.pos];
        let sym = self.interner.intern(text.trim());
        let kind = if is_doc { TriviaKind::Doc } else { TriviaKind::Line };
        Some(Token::new(TokenKind::Trivia(kind, sym), self.span(start)))
    }

    fn scan_ident(&mut self, start: usize) -> Token {
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];
        for (kw, kind) in KEYWORDS {
            if *kw == text {
                return Token::new(*kind, self.span(start));
            }
        }
        let sym = self.interner.intern(text);
        Token::new(TokenKind::Ident(sym), self.span(start))
    }

    fn scan_number(&mut self, first: u8, start: usize) -> Token {
        if first == b'0' && self.peek_byte() == Some(b'x') {
            self.pos += 1;
            let digits_start = self.pos;
            while let Some(b) = self.peek_byte() {
                if b.is_ascii_hexdigit() {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            if self.pos == digits_start {
                // Bare `0x` with no digits; still emit a (empty) hex literal,
                // semantic analysis will flag the overflow/format error.
            }
            let text = &self.source[start..self.pos];
            let sym = self.interner.intern(text);
            return Token::new(TokenKind::Number(NumberBase::Hex, sym), self.span(start));
        }
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_digit() {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];
        let sym = self.interner.intern(text);
        Token::new(TokenKind::Number(NumberBase::Decimal, sym), self.span(start))
    }

    fn scan_string(&mut self, start: usize) -> Option<Token> {
        let mut buf = String::new();
        loop {
            match self.peek_byte() {
                None | Some(b'\n') => {
                    self.errors.push(ScanError {
                        kind: ScanErrorKind::UnterminatedString,
                        span: self.span(start),
                    });
                    let sym = self.interner.intern(&buf);
                    return Some(Token::new(TokenKind::String(sym), self.span(start)));
                }
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.bump() {
                        Some(b'n') => buf.push('\n'),
                        Some(b't') => buf.push('\t'),
                        Some(b'r') => buf.push('\r'),
                        Some(b'\\') => buf.push('\\'),
                        Some(b'"') => buf.push('"'),
                        Some(b'\'') => buf.push('\''),
                        Some(b'0') => buf.push('\0'),
                        Some(b'x') => {
                            let hex_start = self.pos;
                            for _ in 0..2 {
                                self.bump();
                            }
                            let hex = &self.source[hex_start..self.pos.min(self.source.len())];
                            match u8::from_str_radix(hex, 16) {
                                Ok(v) => buf.push(v as char),
                                Err(_) => self.errors.push(ScanError {
                                    kind: ScanErrorKind::InvalidEscape('x'),
                                    span: self.span(start),
                                }),
                            }
                        }
                        Some(b'u') => {
                            let hex_start = self.pos;
                            for _ in 0..4 {
                                self.bump();
                            }
                            let hex = &self.source[hex_start..self.pos.min(self.source.len())];
                            match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                                Some(c) => buf.push(c),
                                None => self.errors.push(ScanError {
                                    kind: ScanErrorKind::InvalidEscape('u'),
                                    span: self.span(start),
                                }),
                            }
                        }
                        Some(other) => {
                            self.errors.push(ScanError {
                                kind: ScanErrorKind::InvalidEscape(other as char),
                                span: self.span(start),
                            });
                        }
                        None => {}
                    }
                }
                Some(_) => {
                    let ch_start = self.pos;
                    let ch = self.source[ch_start..].chars().next().unwrap();
                    self.pos += ch.len_utf8();
                    buf.push(ch);
                }
            }
        }
        let sym = self.interner.intern(&buf);
        Some(Token::new(TokenKind::String(sym), self.span(start)))
    }

    fn error_unexpected(&mut self, b: u8, start: usize) {
        // Resynchronize at the next whitespace or punctuation byte first, so
        // the error span covers the whole illegal run rather than just `b` —
        // otherwise bytes consumed below would be dropped silently, with no
        // token and no error accounting for them (§4.1, round-trip per §8.1).
        while let Some(&nb) = self.bytes.get(self.pos) {
            if nb.is_ascii_whitespace() || b"{}()[],;:.".contains(&nb) {
                break;
            }
            self.pos += 1;
        }
        self.errors.push(ScanError {
            kind: ScanErrorKind::UnexpectedByte(b as char),
            span: self.span(start),
        });
    }
}

/// Convenience entry point used by [`crate::parse_source`].
pub fn scan(source: &str, interner: &mut Interner) -> (Vec<Token>, Vec<ScanError>) {
    Lexer::new(source, interner).scan()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut interner = Interner::new();
        let (tokens, errors) = scan(source, &mut interner);
        assert!(errors.is_empty(), "unexpected scan errors: {:?}", errors);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_keywords_and_idents() {
        let ks = kinds("contract Foo");
        assert_eq!(ks[0], TokenKind::Contract);
        assert!(matches!(ks[1], TokenKind::Ident(_)));
        assert_eq!(ks[2], TokenKind::Eof);
    }

    #[test]
    fn prefers_two_char_operators() {
        let ks = kinds("a == b != c <= d >= e && f || g");
        assert!(ks.contains(&TokenKind::EqEq));
        assert!(ks.contains(&TokenKind::NotEq));
        assert!(ks.contains(&TokenKind::LtEq));
        assert!(ks.contains(&TokenKind::GtEq));
        assert!(ks.contains(&TokenKind::AndAnd));
        assert!(ks.contains(&TokenKind::OrOr));
    }

    #[test]
    fn scans_compound_assign() {
        let ks = kinds("x += 1");
        assert!(ks.contains(&TokenKind::Assign(AssignOp::AddAssign)));
    }

    #[test]
    fn scans_hex_and_decimal_numbers() {
        let mut interner = Interner::new();
        let (tokens, _) = scan("0x1A 42", &mut interner);
        match tokens[0].kind {
            TokenKind::Number(NumberBase::Hex, sym) => assert_eq!(interner.resolve(sym), "0x1A"),
            _ => panic!("expected hex literal"),
        }
        match tokens[1].kind {
            TokenKind::Number(NumberBase::Decimal, sym) => assert_eq!(interner.resolve(sym), "42"),
            _ => panic!("expected decimal literal"),
        }
    }

    #[test]
    fn scans_address_like_hex_literal_as_number() {
        let mut interner = Interner::new();
        let addr = format!("0x{}", "0".repeat(40));
        let (tokens, _) = scan(&addr, &mut interner);
        assert!(matches!(tokens[0].kind, TokenKind::Number(NumberBase::Hex, _)));
    }

    #[test]
    fn scans_string_with_escapes() {
        let mut interner = Interner::new();
        let (tokens, errors) = scan(r#""a\nb\t\"c""#, &mut interner);
        assert!(errors.is_empty());
        match tokens[0].kind {
            TokenKind::String(sym) => assert_eq!(interner.resolve(sym), "a\nb\t\"c"),
            _ => panic!("expected string literal"),
        }
    }

    #[test]
    fn unterminated_string_reports_error() {
        let mut interner = Interner::new();
        let (_, errors) = scan("\"abc", &mut interner);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].kind, ScanErrorKind::UnterminatedString));
    }

    #[test]
    fn scans_attribute_lead_in_as_single_token() {
        let ks = kinds("#[storage]");
        assert_eq!(ks[0], TokenKind::AttrLeadIn);
        assert!(matches!(ks[1], TokenKind::Ident(_)));
        assert_eq!(ks[2], TokenKind::RBracket);
    }

    #[test]
    fn scans_line_and_doc_comments_as_trivia() {
        let mut interner = Interner::new();
        let (tokens, _) = scan("// hi\n/// doc\nfn", &mut interner);
        assert!(matches!(tokens[0].kind, TokenKind::Trivia(TriviaKind::Line, _)));
        assert!(matches!(tokens[1].kind, TokenKind::Trivia(TriviaKind::Doc, _)));
        assert_eq!(tokens[2].kind, TokenKind::Fn);
    }

    #[test]
    fn unexpected_byte_recovers_and_continues() {
        let mut interner = Interner::new();
        let (tokens, errors) = scan("a $ b", &mut interner);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].kind, ScanErrorKind::UnexpectedByte('$')));
        // scanning continues after the bad byte
        assert!(tokens.iter().any(|t| matches!(t.kind, TokenKind::Ident(_))));
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn unexpected_byte_run_covers_every_consumed_byte() {
        let mut interner = Interner::new();
        let (_, errors) = scan("$$", &mut interner);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, crate::token::Span::new(0, 2));
    }

    #[test]
    fn never_panics_on_random_bytes() {
        let mut interner = Interner::new();
        let weird = "{}()[]<>!@#$%^&*,;: \t\n\"\\unterminated";
        let (tokens, _errors) = scan(weird, &mut interner);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }
}
