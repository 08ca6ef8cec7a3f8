use super::{Block, NodeId, Trivia, Type};
use crate::intern::Symbol;
use crate::token::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructAttr {
    Storage,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionAttr {
    Create,
}

#[derive(Debug)]
pub struct UseDecl {
    pub id: NodeId,
    pub span: Span,
    pub namespace_path: Vec<(Symbol, Span)>,
    /// The brace-list; empty means a whole-module import (alias = last
    /// path segment).
    pub imports: Vec<(Symbol, Span)>,
}

#[derive(Debug)]
pub struct StructField<'a> {
    pub span: Span,
    pub name: Symbol,
    pub name_span: Span,
    pub ty: Type<'a>,
}

#[derive(Debug)]
pub struct StructDecl<'a> {
    pub id: NodeId,
    pub span: Span,
    pub attribute: Option<(StructAttr, Span)>,
    pub doc: Option<Trivia>,
    pub name: Symbol,
    pub name_span: Span,
    pub fields: Vec<StructField<'a>>,
}

#[derive(Debug)]
pub struct Param<'a> {
    pub span: Span,
    pub name: Symbol,
    pub name_span: Span,
    pub ty: Type<'a>,
}

#[derive(Debug)]
pub struct FunctionDecl<'a> {
    pub id: NodeId,
    pub span: Span,
    pub attribute: Option<(FunctionAttr, Span)>,
    pub doc: Option<Trivia>,
    pub external: bool,
    pub name: Symbol,
    pub name_span: Span,
    pub params: Vec<Param<'a>>,
    pub return_type: Option<Type<'a>>,
    pub reads: Vec<(Symbol, Span)>,
    pub writes: Vec<(Symbol, Span)>,
    pub body: Option<Block<'a>>,
}

#[derive(Debug)]
pub enum ContractItem<'a> {
    Comment(Trivia),
    Use(UseDecl),
    Struct(StructDecl<'a>),
    Function(FunctionDecl<'a>),
}

#[derive(Debug)]
pub struct Contract<'a> {
    pub leading_trivia: Vec<Trivia>,
    pub name: Symbol,
    pub name_span: Span,
    pub items: Vec<ContractItem<'a>>,
    pub span: Span,
}
