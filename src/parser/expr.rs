//! Pratt expression parser (§4.2 "Pratt expression parser"): precedence
//! climbing over a fixed binding-power table, with a separate unary/postfix
//! layer so statement-level assignment detection can parse the left-hand
//! side once and decide whether it is followed by an assignment operator.

use super::Parser;
use crate::ast::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
use crate::intern::Symbol;
use crate::token::{NumberBase, Span, TokenKind};

fn binding_power(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    Some(match kind {
        TokenKind::OrOr => (BinaryOp::Or, 1),
        TokenKind::AndAnd => (BinaryOp::And, 2),
        TokenKind::EqEq => (BinaryOp::Eq, 3),
        TokenKind::NotEq => (BinaryOp::NotEq, 3),
        TokenKind::Lt => (BinaryOp::Lt, 4),
        TokenKind::LtEq => (BinaryOp::LtEq, 4),
        TokenKind::Gt => (BinaryOp::Gt, 4),
        TokenKind::GtEq => (BinaryOp::GtEq, 4),
        TokenKind::Plus => (BinaryOp::Add, 5),
        TokenKind::Minus => (BinaryOp::Sub, 5),
        TokenKind::Star => (BinaryOp::Mul, 6),
        TokenKind::Slash => (BinaryOp::Div, 6),
        TokenKind::Percent => (BinaryOp::Rem, 6),
        _ => return None,
    })
}

impl<'a, 'i> Parser<'a, 'i> {
    fn mk(&mut self, span: Span, kind: ExprKind<'a>) -> &'a Expr<'a> {
        let id = self.next_id();
        self.ctx.alloc_expr(Expr { id, span, kind })
    }

    /// A full expression: unary/postfix left operand, then binary operators
    /// climbed by precedence. Never used directly for the statement-level
    /// assignment LHS — see [`Parser::parse_unary`] for that.
    pub(super) fn parse_expr(&mut self) -> &'a Expr<'a> {
        let left = self.parse_unary();
        self.parse_binary_from(left, 0)
    }

    pub(super) fn parse_binary_from(&mut self, mut left: &'a Expr<'a>, min_bp: u8) -> &'a Expr<'a> {
        loop {
            let Some((op, bp)) = binding_power(self.peek()) else { break };
            if bp < min_bp {
                break;
            }
            self.advance();
            let right_start = self.parse_unary();
            let right = self.parse_binary_from(right_start, bp + 1);
            let span = left.span.to(right.span);
            left = self.mk(span, ExprKind::Binary { op, left, right });
        }
        left
    }

    /// Prefix unary operators (`- + !`) followed by a postfix chain. Kept
    /// separate from [`Parser::parse_expr`] so the statement parser can
    /// parse exactly an l-value-shaped expression before deciding whether an
    /// assignment operator follows (§4.2 "Identifier/path/field/index LHS").
    /// Note: `&` is not modeled as a unary operator here — this language has
    /// no pointer/reference types, so a leading `&` is a parse error.
    pub(super) fn parse_unary(&mut self) -> &'a Expr<'a> {
        let start = self.current_span();
        let op = match self.peek() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary();
            let span = start.to(operand.span);
            return self.mk(span, ExprKind::Unary { op, operand });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> &'a Expr<'a> {
        let mut expr = self.parse_primary();
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.advance();
                    let (field, field_span) = self.expect_ident().unwrap_or((Symbol::EMPTY, self.current_span()));
                    let span = expr.span.to(field_span);
                    expr = self.mk(span, ExprKind::FieldAccess { base: expr, field, field_span });
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr();
                    let end = self.current_span();
                    let _ = self.expect(&TokenKind::RBracket, "']'");
                    let span = expr.span.to(end);
                    expr = self.mk(span, ExprKind::Index { base: expr, index });
                }
                TokenKind::LParen => {
                    self.advance();
                    let mut args = Vec::new();
                    while !self.check(&TokenKind::RParen) && !self.is_at_end() {
                        args.push(self.parse_expr());
                        if self.check(&TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                    let end = self.current_span();
                    let _ = self.expect(&TokenKind::RParen, "')'");
                    let span = expr.span.to(end);
                    expr = self.mk(span, ExprKind::Call { callee: expr, generics: Vec::new(), args });
                }
                TokenKind::ColonColon => {
                    self.advance();
                    let (seg, seg_span) = self.expect_ident().unwrap_or((Symbol::EMPTY, self.current_span()));
                    expr = self.extend_path(expr, seg, seg_span);
                }
                _ => break,
            }
        }
        expr
    }

    fn extend_path(&mut self, base: &'a Expr<'a>, seg: Symbol, seg_span: Span) -> &'a Expr<'a> {
        let span = base.span.to(seg_span);
        let kind = match &base.kind {
            ExprKind::Ident(s) => ExprKind::Path(vec![*s, seg]),
            ExprKind::Path(segs) => {
                let mut segs = segs.clone();
                segs.push(seg);
                ExprKind::Path(segs)
            }
            _ => ExprKind::Bad,
        };
        self.mk(span, kind)
    }

    fn parse_primary(&mut self) -> &'a Expr<'a> {
        let start = self.current_span();
        match *self.peek() {
            TokenKind::True => {
                self.advance();
                self.mk(start, ExprKind::Literal(Literal::Bool(true)))
            }
            TokenKind::False => {
                self.advance();
                self.mk(start, ExprKind::Literal(Literal::Bool(false)))
            }
            TokenKind::Number(base, sym) => {
                self.advance();
                let text = self.interner.resolve(sym).to_string();
                self.mk(start, ExprKind::Literal(Literal::Number { text, is_hex: base == NumberBase::Hex }))
            }
            TokenKind::String(sym) => {
                self.advance();
                let text = self.interner.resolve(sym).to_string();
                self.mk(start, ExprKind::Literal(Literal::String(text)))
            }
            TokenKind::Ident(sym) => {
                self.advance();
                let base = self.mk(start, ExprKind::Ident(sym));
                if !self.no_struct_literal && self.check(&TokenKind::LBrace) {
                    self.parse_struct_literal(base)
                } else {
                    base
                }
            }
            TokenKind::LParen => self.parse_paren_or_tuple(),
            _ => {
                self.error_unexpected("an expression");
                self.mk(start, ExprKind::Bad)
            }
        }
    }

    fn parse_struct_literal(&mut self, path: &'a Expr<'a>) -> &'a Expr<'a> {
        self.advance(); // `{`
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let Ok((name, name_span)) = self.expect_ident() else {
                self.synchronize_until(&[TokenKind::Comma, TokenKind::RBrace]);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                }
                continue;
            };
            let _ = self.expect(&TokenKind::Colon, "':'");
            let value = self.parse_expr();
            fields.push((name, name_span, value));
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        let end = self.current_span();
        let _ = self.expect(&TokenKind::RBrace, "'}'");
        self.mk(path.span.to(end), ExprKind::StructLiteral { path, fields })
    }

    fn parse_paren_or_tuple(&mut self) -> &'a Expr<'a> {
        let start = self.current_span();
        self.advance(); // `(`
        if self.check(&TokenKind::RParen) {
            let end = self.current_span();
            self.advance();
            return self.mk(start.to(end), ExprKind::Tuple(Vec::new()));
        }
        let first = self.parse_expr();
        if self.check(&TokenKind::Comma) {
            let mut elements = vec![first];
            while self.check(&TokenKind::Comma) {
                self.advance();
                if self.check(&TokenKind::RParen) {
                    break;
                }
                elements.push(self.parse_expr());
            }
            let end = self.current_span();
            let _ = self.expect(&TokenKind::RParen, "')'");
            self.mk(start.to(end), ExprKind::Tuple(elements))
        } else {
            let end = self.current_span();
            let _ = self.expect(&TokenKind::RParen, "')'");
            self.mk(start.to(end), ExprKind::Paren(first))
        }
    }
}
