//! Statement and block parsing (§4.2 "Statement parser").

use super::Parser;
use crate::ast::{Block, Stmt, StmtKind};
use crate::intern::{Symbol, SymbolEq};
use crate::token::{AssignOp, TokenKind};

impl<'a, 'i> Parser<'a, 'i> {
    pub(super) fn parse_block(&mut self) -> Block<'a> {
        let start = self.current_span();
        if self.check(&TokenKind::LBrace) {
            self.advance();
        } else {
            self.error_unexpected("'{'");
        }

        let mut items = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if let Some(c) = self.pull_comment() {
                let id = self.next_id();
                items.push(Stmt { id, span: c.span, kind: StmtKind::Comment });
                continue;
            }
            let before = self.pos;
            items.push(self.parse_statement());
            if self.pos == before {
                self.advance();
            }
        }

        let mut tail_expr = None;
        if matches!(items.last().map(|s| &s.kind), Some(StmtKind::ExprStmt { has_semi: false, .. })) {
            if let Some(last) = items.pop() {
                if let StmtKind::ExprStmt { expr, .. } = last.kind {
                    tail_expr = Some(expr);
                }
            }
        }

        let end = self.current_span();
        if self.check(&TokenKind::RBrace) {
            self.advance();
        } else {
            self.error_unexpected("'}'");
        }
        Block { span: start.to(end), items, tail_expr }
    }

    fn parse_statement(&mut self) -> Stmt<'a> {
        match *self.peek() {
            TokenKind::Let => self.parse_let(),
            TokenKind::Return => self.parse_return(),
            TokenKind::If => self.parse_if(),
            TokenKind::Ident(sym) if self.looks_like_require(sym) => self.parse_require(),
            _ => self.parse_expr_or_assign_stmt(),
        }
    }

    fn looks_like_require(&self, sym: Symbol) -> bool {
        sym.is(self.interner, "require")
            && matches!(self.peek_at(1), TokenKind::Bang)
            && matches!(self.peek_at(2), TokenKind::LParen)
    }

    fn parse_require(&mut self) -> Stmt<'a> {
        let id = self.next_id();
        let start = self.current_span();
        self.advance(); // require
        self.advance(); // !
        self.advance(); // (
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
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        } else {
            self.error_unexpected("';'");
        }
        Stmt { id, span: start.to(end), kind: StmtKind::Require { args } }
    }

    fn parse_let(&mut self) -> Stmt<'a> {
        let id = self.next_id();
        let start = self.current_span();
        self.advance(); // let
        let mutable = self.eat(&TokenKind::Mut);
        let (name, name_span) = self.expect_ident().unwrap_or((Symbol::EMPTY, start));
        let declared_type = if self.check(&TokenKind::Colon) {
            self.advance();
            Some(self.parse_type())
        } else {
            None
        };
        let init = if matches!(self.peek(), TokenKind::Assign(AssignOp::Assign)) {
            self.advance();
            Some(self.parse_expr())
        } else {
            None
        };
        let end = self.current_span();
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        } else {
            self.error_unexpected("';'");
        }
        Stmt { id, span: start.to(end), kind: StmtKind::Let { mutable, name, name_span, declared_type, init } }
    }

    fn parse_return(&mut self) -> Stmt<'a> {
        let id = self.next_id();
        let start = self.current_span();
        self.advance(); // return
        let value = if self.check(&TokenKind::Semicolon) { None } else { Some(self.parse_expr()) };
        let end = self.current_span();
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        } else {
            self.error_unexpected("';'");
        }
        Stmt { id, span: start.to(end), kind: StmtKind::Return { value } }
    }

    fn parse_if(&mut self) -> Stmt<'a> {
        let id = self.next_id();
        let start = self.current_span();
        self.advance(); // if

        let prev = self.no_struct_literal;
        self.no_struct_literal = true;
        let condition = self.parse_expr();
        self.no_struct_literal = prev;

        let then_block = if self.check(&TokenKind::LBrace) {
            self.parse_block()
        } else {
            self.error_unexpected("'{'");
            Block { span: self.current_span(), items: Vec::new(), tail_expr: None }
        };

        let else_block = if self.check(&TokenKind::Else) {
            self.advance();
            if self.check(&TokenKind::If) {
                let nested = self.parse_if();
                Some(Block { span: nested.span, items: vec![nested], tail_expr: None })
            } else if self.check(&TokenKind::LBrace) {
                Some(self.parse_block())
            } else {
                self.error_unexpected("'{' or 'if'");
                None
            }
        } else {
            None
        };

        let end = else_block.as_ref().map(|b| b.span).unwrap_or(then_block.span);
        Stmt { id, span: start.to(end), kind: StmtKind::If { condition, then_block, else_block } }
    }

    fn parse_expr_or_assign_stmt(&mut self) -> Stmt<'a> {
        let start = self.current_span();
        let left = self.parse_unary();
        if let TokenKind::Assign(op) = *self.peek() {
            self.advance();
            let value = self.parse_expr();
            let end = value.span;
            if self.check(&TokenKind::Semicolon) {
                self.advance();
            } else {
                self.error_unexpected("';'");
            }
            let id = self.next_id();
            return Stmt { id, span: start.to(end), kind: StmtKind::Assign { target: left, op, value } };
        }
        let expr = self.parse_binary_from(left, 0);
        let has_semi = self.eat(&TokenKind::Semicolon);
        let id = self.next_id();
        Stmt { id, span: start.to(expr.span), kind: StmtKind::ExprStmt { expr, has_semi } }
    }
}
