use super::{NodeId, Type};
use crate::intern::Symbol;
use crate::token::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    /// Decimal or hex digits, exactly as scanned; kind/width is resolved
    /// during semantic analysis (promotion ladder, address detection).
    Number { text: String, is_hex: bool },
    String(String),
}

#[derive(Debug)]
pub struct Expr<'a> {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind<'a>,
}

#[derive(Debug)]
pub enum ExprKind<'a> {
    Literal(Literal),
    Ident(Symbol),
    /// `a::b::c` — two or more segments. A single-segment path is
    /// represented as `Ident` instead, so callers never need to special
    /// case a one-element `Path`.
    Path(Vec<Symbol>),
    Binary { op: BinaryOp, left: &'a Expr<'a>, right: &'a Expr<'a> },
    Unary { op: UnaryOp, operand: &'a Expr<'a> },
    Call { callee: &'a Expr<'a>, generics: Vec<Type<'a>>, args: Vec<&'a Expr<'a>> },
    FieldAccess { base: &'a Expr<'a>, field: Symbol, field_span: Span },
    Index { base: &'a Expr<'a>, index: &'a Expr<'a> },
    StructLiteral { path: &'a Expr<'a>, fields: Vec<(Symbol, Span, &'a Expr<'a>)> },
    Tuple(Vec<&'a Expr<'a>>),
    Paren(&'a Expr<'a>),
    /// A malformed sub-expression; parsing resynchronizes and continues.
    Bad,
}
