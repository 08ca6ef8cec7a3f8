use super::{Expr, NodeId, Type};
use crate::intern::Symbol;
use crate::token::{AssignOp, Span};

#[derive(Debug)]
pub struct Block<'a> {
    pub span: Span,
    pub items: Vec<Stmt<'a>>,
    pub tail_expr: Option<&'a Expr<'a>>,
}

#[derive(Debug)]
pub struct Stmt<'a> {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind<'a>,
}

#[derive(Debug)]
pub enum StmtKind<'a> {
    Let {
        mutable: bool,
        name: Symbol,
        name_span: Span,
        declared_type: Option<Type<'a>>,
        init: Option<&'a Expr<'a>>,
    },
    Assign {
        target: &'a Expr<'a>,
        op: AssignOp,
        value: &'a Expr<'a>,
    },
    Require {
        args: Vec<&'a Expr<'a>>,
    },
    If {
        condition: &'a Expr<'a>,
        then_block: Block<'a>,
        else_block: Option<Block<'a>>,
    },
    Return {
        value: Option<&'a Expr<'a>>,
    },
    ExprStmt {
        expr: &'a Expr<'a>,
        has_semi: bool,
    },
    Comment,
}
