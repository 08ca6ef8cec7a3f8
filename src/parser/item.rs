//! Top-level and declaration parsing: `contract`, `use`, `struct`, `fn`
//! (§4.2 "Item parser" / "Declaration details").

use super::Parser;
use crate::ast::{
    Contract, ContractItem, FunctionAttr, FunctionDecl, Param, StructAttr, StructDecl, StructField,
    Type, TypeKind, UseDecl,
};
use crate::intern::{Symbol, SymbolEq};
use crate::token::{Span, TokenKind};

impl<'a, 'i> Parser<'a, 'i> {
    pub(super) fn parse_contract(&mut self) -> Contract<'a> {
        let mut leading_trivia = Vec::new();
        while let Some(c) = self.pull_comment() {
            leading_trivia.push(c);
        }
        leading_trivia.extend(self.take_doc());

        let start = self.current_span();
        if self.check(&TokenKind::Contract) {
            self.advance();
        } else {
            self.error_unexpected("'contract'");
        }

        let (name, name_span) = self.expect_ident().unwrap_or((Symbol::EMPTY, start));

        if self.check(&TokenKind::LBrace) {
            self.advance();
        } else {
            self.error_unexpected("'{'");
        }

        let mut items = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if let Some(c) = self.pull_comment() {
                items.push(ContractItem::Comment(c));
                continue;
            }
            let before = self.pos;
            items.push(self.parse_contract_item());
            if self.pos == before {
                // Safety valve: guarantee forward progress even if an item
                // parser leaves the cursor untouched on a malformed token.
                self.advance();
            }
        }
        let end_span = self.current_span();
        if self.check(&TokenKind::RBrace) {
            self.advance();
        }

        Contract { leading_trivia, name, name_span, items, span: start.to(end_span) }
    }

    fn parse_contract_item(&mut self) -> ContractItem<'a> {
        let doc = self.take_doc();
        let attribute = self.try_parse_attribute();

        match self.peek() {
            TokenKind::Use => ContractItem::Use(self.parse_use()),
            TokenKind::Struct => ContractItem::Struct(self.parse_struct(attribute, doc)),
            TokenKind::Fn | TokenKind::Ext => ContractItem::Function(self.parse_function(attribute, doc)),
            _ => {
                self.error_unexpected("'use', 'struct', 'fn', 'ext fn', or an attribute");
                self.synchronize_until(&[
                    TokenKind::Use,
                    TokenKind::Struct,
                    TokenKind::Fn,
                    TokenKind::Ext,
                    TokenKind::RBrace,
                ]);
                ContractItem::Comment(crate::ast::Trivia {
                    span: self.current_span(),
                    kind: crate::token::TriviaKind::Line,
                    text: String::new(),
                })
            }
        }
    }

    /// `#[` IDENT `]`; returns the raw identifier text and its span, since
    /// callers interpret it differently for structs vs. functions.
    fn try_parse_attribute(&mut self) -> Option<(Symbol, Span)> {
        if !self.check(&TokenKind::AttrLeadIn) {
            return None;
        }
        let start = self.current_span();
        self.advance();
        let ident = self.expect_ident().ok();
        let end = self.current_span();
        if self.check(&TokenKind::RBracket) {
            self.advance();
        } else {
            self.error_unexpected("']'");
        }
        ident.map(|(sym, _)| (sym, start.to(end)))
    }

    fn parse_use(&mut self) -> UseDecl {
        let id = self.next_id();
        let start = self.current_span();
        self.advance(); // `use`

        let mut namespace_path = Vec::new();
        loop {
            match self.expect_ident() {
                Ok(pair) => namespace_path.push(pair),
                Err(_) => break,
            }
            if self.check(&TokenKind::ColonColon) {
                self.advance();
                if self.check(&TokenKind::LBrace) {
                    break;
                }
            } else {
                break;
            }
        }

        let mut imports = Vec::new();
        if self.check(&TokenKind::LBrace) {
            self.advance();
            while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                if let Ok(pair) = self.expect_ident() {
                    imports.push(pair);
                }
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            if self.check(&TokenKind::RBrace) {
                self.advance();
            } else {
                self.error_unexpected("'}'");
            }
        }

        let end = self.current_span();
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        } else {
            self.error_unexpected("';'");
        }
        self.synchronize_until(&[TokenKind::Use, TokenKind::Struct, TokenKind::Fn, TokenKind::Ext, TokenKind::RBrace]);

        UseDecl { id, span: start.to(end), namespace_path, imports }
    }

    fn parse_struct(&mut self, attribute: Option<(Symbol, Span)>, doc: Option<crate::ast::Trivia>) -> StructDecl<'a> {
        let id = self.next_id();
        let start = self.current_span();
        self.advance(); // `struct`

        let (name, name_span) = self.expect_ident().unwrap_or((Symbol::EMPTY, start));

        let mut fields = Vec::new();
        if self.check(&TokenKind::LBrace) {
            self.advance();
            while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                let field_start = self.current_span();
                let Ok((fname, fname_span)) = self.expect_ident() else {
                    self.synchronize_until(&[TokenKind::Comma, TokenKind::RBrace]);
                    if self.check(&TokenKind::Comma) {
                        self.advance();
                    }
                    continue;
                };
                if self.check(&TokenKind::Colon) {
                    self.advance();
                } else {
                    self.error_unexpected("':'");
                }
                let ty = self.parse_type();
                let span = field_start.to(ty.span);
                fields.push(StructField { span, name: fname, name_span: fname_span, ty });
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            if self.check(&TokenKind::RBrace) {
                self.advance();
            } else {
                self.error_unexpected("'}'");
            }
        } else {
            self.error_unexpected("'{'");
        }

        let end = self.current_span();
        let struct_attr = attribute.and_then(|(sym, span)| self.resolve_struct_attr(sym).map(|a| (a, span)));
        StructDecl { id, span: start.to(end), attribute: struct_attr, doc, name, name_span, fields }
    }

    fn resolve_struct_attr(&mut self, sym: Symbol) -> Option<StructAttr> {
        if sym.is(self.interner, "storage") {
            Some(StructAttr::Storage)
        } else if sym.is(self.interner, "event") {
            Some(StructAttr::Event)
        } else {
            self.errors.push(crate::error::ParseError {
                kind: crate::error::ParseErrorKind::UnexpectedToken {
                    expected: "'storage' or 'event'",
                    found: TokenKind::Ident(sym),
                },
                span: self.current_span(),
            });
            None
        }
    }

    fn resolve_function_attr(&mut self, sym: Symbol) -> Option<FunctionAttr> {
        if sym.is(self.interner, "create") {
            Some(FunctionAttr::Create)
        } else {
            self.errors.push(crate::error::ParseError {
                kind: crate::error::ParseErrorKind::UnexpectedToken {
                    expected: "'create'",
                    found: TokenKind::Ident(sym),
                },
                span: self.current_span(),
            });
            None
        }
    }

    fn parse_function(&mut self, attribute: Option<(Symbol, Span)>, doc: Option<crate::ast::Trivia>) -> FunctionDecl<'a> {
        let id = self.next_id();
        let start = self.current_span();
        let external = self.eat(&TokenKind::Ext);
        if self.check(&TokenKind::Fn) {
            self.advance();
        } else {
            self.error_unexpected("'fn'");
        }

        let (name, name_span) = self.expect_ident().unwrap_or((Symbol::EMPTY, start));

        let mut params = Vec::new();
        if self.check(&TokenKind::LParen) {
            self.advance();
            while !self.check(&TokenKind::RParen) && !self.is_at_end() {
                let pstart = self.current_span();
                let Ok((pname, pname_span)) = self.expect_ident() else {
                    self.synchronize_until(&[TokenKind::Comma, TokenKind::RParen]);
                    if self.check(&TokenKind::Comma) {
                        self.advance();
                    }
                    continue;
                };
                if self.check(&TokenKind::Colon) {
                    self.advance();
                } else {
                    self.error_unexpected("':'");
                }
                let ty = self.parse_type();
                params.push(Param { span: pstart.to(ty.span), name: pname, name_span: pname_span, ty });
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            if self.check(&TokenKind::RParen) {
                self.advance();
            } else {
                self.error_unexpected("')'");
            }
        } else {
            self.error_unexpected("'('");
        }

        let return_type = if self.check(&TokenKind::Arrow) {
            self.advance();
            Some(self.parse_type())
        } else {
            None
        };

        let reads = self.parse_ident_list_after(&TokenKind::Reads);
        let writes = self.parse_ident_list_after(&TokenKind::Writes);

        let body = if self.check(&TokenKind::LBrace) { Some(self.parse_block()) } else {
            self.error_unexpected("'{'");
            None
        };

        let end = body.as_ref().map(|b| b.span).unwrap_or(self.current_span());
        let fn_attr = attribute.and_then(|(sym, span)| self.resolve_function_attr(sym).map(|a| (a, span)));

        FunctionDecl {
            id,
            span: start.to(end),
            attribute: fn_attr,
            doc,
            external,
            name,
            name_span,
            params,
            return_type,
            reads,
            writes,
            body,
        }
    }

    /// `reads`/`writes` IDENT*, space-separated (no commas), per §6.2.
    fn parse_ident_list_after(&mut self, keyword: &TokenKind) -> Vec<(Symbol, Span)> {
        let mut out = Vec::new();
        if self.check(keyword) {
            self.advance();
            while let TokenKind::Ident(sym) = *self.peek() {
                let span = self.current_span();
                self.advance();
                out.push((sym, span));
            }
        }
        out
    }

    pub(super) fn parse_type(&mut self) -> Type<'a> {
        let id = self.next_id();
        let start = self.current_span();
        if self.check(&TokenKind::LParen) {
            self.advance();
            let mut elements = Vec::new();
            while !self.check(&TokenKind::RParen) && !self.is_at_end() {
                elements.push(self.parse_type());
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            let end = self.current_span();
            if self.check(&TokenKind::RParen) {
                self.advance();
            } else {
                self.error_unexpected("')'");
            }
            let elements = self.ctx.alloc_type_slice(elements);
            return Type { id, span: start.to(end), kind: TypeKind::Tuple { elements } };
        }

        let Ok((name, name_span)) = self.expect_ident() else {
            return Type { id, span: start, kind: TypeKind::Bad };
        };
        let mut end = name_span;
        let mut generics = Vec::new();
        if self.check(&TokenKind::Lt) {
            self.advance();
            while !self.check(&TokenKind::Gt) && !self.is_at_end() {
                generics.push(self.parse_type());
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            end = self.current_span();
            if self.check(&TokenKind::Gt) {
                self.advance();
            } else {
                self.error_unexpected("'>'");
            }
        }
        let generics = self.ctx.alloc_type_slice(generics);
        Type { id, span: start.to(end), kind: TypeKind::Named { name, generics } }
    }
}
