//! Body analysis (§4.5 pass 2 steps 3-5): opens the function scope, walks
//! statements recording diagnostics/effects via [`FnCtx`], and performs the
//! flow analysis of §4.7 (definite return, unreachable code) in the same
//! walk, since both need the same statement-order traversal.

use super::expr_infer::FnCtx;
use crate::ast::{Block, FunctionDecl, Stmt, StmtKind};
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::symbol::{SymEntry, SymbolKind};
use crate::types::TypeRef;

/// Binds parameters, walks the body, and runs flow analysis. Returns
/// nothing — all findings land in `ctx.diagnostics`.
pub fn analyze_function<'r, 'a, 'i>(ctx: &mut FnCtx<'r, 'a, 'i>, decl: &'a FunctionDecl<'a>) {
    for param in &decl.params {
        let ty = ctx.resolve_type(&param.ty);
        let entry = SymEntry::new(param.name, SymbolKind::Parameter, param.name_span, ty, false);
        if ctx.scopes.declare(entry).is_err() {
            ctx.diagnostics.push(Diagnostic::error(
                DiagnosticCode::DuplicateDeclaration,
                format!("duplicate parameter '{}'", ctx.interner.resolve(param.name)),
                param.name_span,
            ));
        }
    }

    let return_type = match &decl.return_type {
        Some(t) => ctx.resolve_type(t),
        None => None,
    };

    let Some(body) = &decl.body else { return };
    let definitely_returns = analyze_block(ctx, body, return_type.as_ref());

    if decl.return_type.is_some() && !definitely_returns {
        ctx.diagnostics.push(Diagnostic::error(
            DiagnosticCode::MissingReturn,
            format!(
                "function '{}' must return a value of type '{}'",
                ctx.interner.resolve(decl.name),
                return_type.map(|t| t.display(ctx.interner)).unwrap_or_default()
            ),
            decl.span,
        ));
    }
}

/// Walks one block in source order, returning whether it definitely
/// returns a value (§4.7). Reports exactly one `E0017` at the first
/// statement following termination.
fn analyze_block<'r, 'a, 'i>(ctx: &mut FnCtx<'r, 'a, 'i>, block: &'a Block<'a>, return_type: Option<&TypeRef>) -> bool {
    ctx.scopes.push_scope();
    let mut terminated = false;
    let mut reported_unreachable = false;

    for stmt in &block.items {
        if terminated {
            if !reported_unreachable {
                ctx.diagnostics.push(Diagnostic::warning(DiagnosticCode::UnreachableCode, "unreachable code", stmt.span));
                reported_unreachable = true;
            }
            continue;
        }
        if analyze_stmt(ctx, stmt, return_type) {
            terminated = true;
        }
    }

    let mut block_returns = terminated;
    if !terminated {
        if let Some(tail) = block.tail_expr {
            let tail_ty = ctx.infer(tail, return_type);
            block_returns = match (&tail_ty, return_type) {
                (Some(t), Some(rt)) => ctx.compatible(t, rt),
                _ => false,
            };
        }
    }

    for entry in ctx.scopes.pop_scope_entries() {
        report_variable_liveness(ctx, &entry);
    }
    block_returns
}

/// Per-variable liveness (§4.5 pass 4, the `Variable`-symbol half). Checked
/// as each block scope closes, since that is the last point the bindings
/// declared in it are still reachable — `ScopeStack::pop_scope_entries`
/// hands them back instead of discarding them. Unreachable-local-function
/// liveness is a separate, whole-call-graph concern handled in
/// `pass4_liveness`.
fn report_variable_liveness<'r, 'a, 'i>(ctx: &mut FnCtx<'r, 'a, 'i>, entry: &SymEntry) {
    if entry.kind != SymbolKind::Variable {
        return;
    }
    let name = ctx.interner.resolve(entry.name).to_string();
    if !entry.used {
        ctx.diagnostics.push(Diagnostic::warning(
            DiagnosticCode::GenericSemantic,
            format!("variable '{name}' is declared but never used"),
            entry.declared_at,
        ));
    }
    if entry.mutable && !entry.modified {
        ctx.diagnostics.push(Diagnostic::warning(
            DiagnosticCode::GenericSemantic,
            format!("variable '{name}' is declared as mutable but never modified"),
            entry.declared_at,
        ));
    }
    if entry.modified && !entry.read_after_modify {
        ctx.diagnostics.push(Diagnostic::warning(
            DiagnosticCode::GenericSemantic,
            format!("variable '{name}' is modified but the new value is never used"),
            entry.last_modify_pos.unwrap_or(entry.declared_at),
        ));
    }
}

/// Analyzes one statement; returns true if it definitely terminates control
/// flow with a return (directly, or via an exhaustive if/else).
fn analyze_stmt<'r, 'a, 'i>(ctx: &mut FnCtx<'r, 'a, 'i>, stmt: &'a Stmt<'a>, return_type: Option<&TypeRef>) -> bool {
    match &stmt.kind {
        StmtKind::Comment => false,
        StmtKind::Let { mutable, name, name_span, declared_type, init } => {
            if !*mutable && init.is_none() {
                ctx.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::UninitializedVariable,
                    format!("immutable variable '{}' must be initialized", ctx.interner.resolve(*name)),
                    *name_span,
                ));
            }
            let declared = declared_type.as_ref().and_then(|t| ctx.resolve_type(t));
            let init_ty = init.and_then(|e| ctx.infer(e, declared.as_ref()));
            if let (Some(d), Some(i)) = (&declared, &init_ty) {
                if !ctx.compatible(i, d) {
                    ctx.diagnostics.push(Diagnostic::error(
                        DiagnosticCode::TypeMismatch,
                        format!(
                            "initializer has type '{}', expected '{}'",
                            i.display(ctx.interner),
                            d.display(ctx.interner)
                        ),
                        init.unwrap().span,
                    ));
                }
            }
            let ty = declared.or(init_ty);
            let entry = SymEntry::new(*name, SymbolKind::Variable, *name_span, ty, *mutable);
            if ctx.scopes.declare(entry).is_err() {
                ctx.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::DuplicateDeclaration,
                    format!("'{}' is already declared in this scope", ctx.interner.resolve(*name)),
                    *name_span,
                ));
            }
            false
        }
        StmtKind::Assign { target, op: _, value } => {
            let target_ty = ctx.analyze_assign_target(target);
            let value_ty = ctx.infer(value, target_ty.as_ref());
            if let (Some(t), Some(v)) = (&target_ty, &value_ty) {
                if !ctx.compatible(v, t) {
                    ctx.diagnostics.push(Diagnostic::error(
                        DiagnosticCode::TypeMismatch,
                        format!(
                            "cannot assign value of type '{}' to target of type '{}'",
                            v.display(ctx.interner),
                            t.display(ctx.interner)
                        ),
                        value.span,
                    ));
                }
            }
            false
        }
        StmtKind::Require { args } => {
            for a in args {
                ctx.infer(a, None);
            }
            false
        }
        StmtKind::If { condition, then_block, else_block } => {
            ctx.infer(condition, None);
            let then_returns = analyze_block(ctx, then_block, return_type);
            match else_block {
                Some(eb) => {
                    let else_returns = analyze_block(ctx, eb, return_type);
                    then_returns && else_returns
                }
                None => false,
            }
        }
        StmtKind::Return { value } => {
            match value {
                Some(v) => {
                    ctx.infer(v, return_type);
                }
                None => {
                    if return_type.is_some() {
                        ctx.diagnostics.push(Diagnostic::error(
                            DiagnosticCode::VoidInExpression,
                            "expected a return value",
                            stmt.span,
                        ));
                    }
                }
            }
            true
        }
        StmtKind::ExprStmt { expr, .. } => {
            ctx.infer(expr, None);
            false
        }
    }
}
