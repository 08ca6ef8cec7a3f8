//! Bump-allocated backing store for the AST, grounded in the teacher's
//! `arena_ctx.rs`: one `Arena<T>` per node kind, referenced by `&'a`
//! borrows rather than indices, with ids (see [`crate::ast::NodeIdGen`])
//! layered on top for side-table keys.

use crate::arena::Arena;
use crate::ast::{Expr, Type};

pub struct AstContext<'a> {
    exprs: &'a Arena<Expr<'a>>,
    types: &'a Arena<Type<'a>>,
}

impl<'a> AstContext<'a> {
    pub fn new(exprs: &'a Arena<Expr<'a>>, types: &'a Arena<Type<'a>>) -> Self {
        AstContext { exprs, types }
    }

    pub fn alloc_expr(&self, expr: Expr<'a>) -> &'a Expr<'a> {
        self.exprs.alloc(expr)
    }

    pub fn alloc_type(&self, ty: Type<'a>) -> &'a Type<'a> {
        self.types.alloc(ty)
    }

    pub fn alloc_type_slice(&self, types: Vec<Type<'a>>) -> &'a [Type<'a>] {
        self.types.alloc_slice(types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, Literal};
    use crate::token::Span;

    #[test]
    fn allocates_stable_expr_references() {
        let exprs: Arena<Expr> = Arena::new();
        let types: Arena<Type> = Arena::new();
        let ctx = AstContext::new(&exprs, &types);
        let e1 = ctx.alloc_expr(Expr { id: 1, span: Span::new(0, 1), kind: ExprKind::Literal(Literal::Bool(true)) });
        let e2 = ctx.alloc_expr(Expr { id: 2, span: Span::new(1, 2), kind: ExprKind::Literal(Literal::Bool(false)) });
        assert!(matches!(e1.kind, ExprKind::Literal(Literal::Bool(true))));
        assert!(matches!(e2.kind, ExprKind::Literal(Literal::Bool(false))));
    }
}
