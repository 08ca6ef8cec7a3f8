//! AST: a discriminated union per category (item, statement, expression,
//! type), each wrapping a shared `{ id, span, kind }` prologue per the
//! Design Notes (§9) — no inheritance emulation, no post-construction
//! mutation. Side tables keyed by `NodeId` carry anything computed later
//! (inferred types, storage-access records).

pub mod expr;
pub mod item;
pub mod stmt;
pub mod ty;

pub use expr::{Expr, ExprKind, Literal};
pub use item::{
    Contract, ContractItem, FunctionAttr, FunctionDecl, Param, StructAttr, StructDecl,
    StructField, UseDecl,
};
pub use stmt::{Block, Stmt, StmtKind};
pub use ty::{Type, TypeKind};

use crate::token::{Span, TriviaKind};

/// A stable identifier assigned to a node at construction time, used to key
/// side tables instead of mutating nodes.
pub type NodeId = u32;

/// Per-parse `NodeId` allocator. One lives inside the `Parser` (and nowhere
/// else) so that no counter state survives past a single `parse_source`
/// call, matching the "no state persists between analyses" lifecycle rule.
#[derive(Debug, Default)]
pub struct NodeIdGen(NodeId);

impl NodeIdGen {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn next(&mut self) -> NodeId {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Trivia {
    pub span: Span,
    pub kind: TriviaKind,
    pub text: String,
}
