//! Semantic analyzer (§4.5): four passes over a parsed [`Contract`],
//! producing a flat diagnostic list. Nothing here mutates the AST; all
//! findings are collected side-by-side in `Vec<Diagnostic>`.

mod builtins;
mod expr_infer;
mod pass1_decls;
mod pass2_body;
mod pass2_signatures;
mod pass3_closure;
mod pass4_liveness;

use crate::ast::Contract;
use crate::callgraph::CallGraph;
use crate::diagnostic::Diagnostic;
use crate::intern::Interner;
use builtins::BuiltinSymbols;
use expr_infer::FnCtx;

/// Runs declaration collection, signature/body analysis, call-graph
/// closure, and liveness over `contract`, returning every diagnostic found.
///
/// Takes `&mut Interner` rather than the spec's plain `analyze(contract)`
/// signature: builtin type names (`U8`, `Address`, ...) may never appear
/// literally in source text but still need `Symbol`s to build `TypeRef`s,
/// so [`BuiltinSymbols`] interns them on first use (see DESIGN.md).
pub fn analyze(contract: &Contract, interner: &mut Interner) -> Vec<Diagnostic> {
    let pass1 = pass1_decls::run(contract, interner);
    let mut diagnostics = pass1.diagnostics;
    let builtins = BuiltinSymbols::new(interner);

    let mut graph = CallGraph::new();
    let mut create_seen = false;

    for decl in pass1.functions.values() {
        pass2_signatures::validate_signature(decl, &pass1.storage_structs, interner, &mut create_seen, &mut diagnostics);

        let mut ctx = FnCtx {
            registry: &pass1.registry,
            storage_structs: &pass1.storage_structs,
            functions: &pass1.functions,
            interner: &mut *interner,
            builtins: &builtins,
            scopes: crate::symbol::ScopeStack::new(),
            effects: Default::default(),
            diagnostics: Vec::new(),
        };
        pass2_body::analyze_function(&mut ctx, decl);
        diagnostics.append(&mut ctx.diagnostics);
        *graph.function_effects_mut(decl.name) = ctx.effects;
    }

    diagnostics.extend(pass3_closure::run(&graph, &pass1.functions, interner));
    diagnostics.extend(pass4_liveness::run(&graph, &pass1.functions, interner));

    diagnostics
}
