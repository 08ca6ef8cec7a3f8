//! Pass 3 — call-graph fixed-point closure (§4.5). Closes each function's
//! `RequiredReads`/`RequiredWrites` over its transitive local calls, then
//! checks the closure against the function's declared `reads`/`writes`
//! clauses.

use crate::ast::FunctionDecl;
use crate::callgraph::CallGraph;
use crate::diagnostic::{Diagnostic, DiagnosticCode, Suggestion};
use crate::intern::{Interner, Symbol};
use std::collections::{HashMap, HashSet};

pub fn run(
    graph: &CallGraph,
    functions: &HashMap<Symbol, &FunctionDecl>,
    interner: &Interner,
) -> Vec<Diagnostic> {
    let closed = graph.close();
    let mut diagnostics = Vec::new();

    for (&name, decl) in functions {
        let Some(required) = closed.get(&name) else { continue };
        let declared_reads: HashSet<Symbol> = decl.reads.iter().map(|(n, _)| *n).collect();
        let declared_writes: HashSet<Symbol> = decl.writes.iter().map(|(n, _)| *n).collect();

        let mut missing_reads: Vec<Symbol> = required
            .reads
            .iter()
            .copied()
            .filter(|s| !declared_reads.contains(s) && !declared_writes.contains(s))
            .collect();
        missing_reads.sort_by_key(|s| interner.resolve(*s).to_string());

        let mut missing_writes: Vec<Symbol> =
            required.writes.iter().copied().filter(|s| !declared_writes.contains(s)).collect();
        missing_writes.sort_by_key(|s| interner.resolve(*s).to_string());

        for struct_name in missing_reads {
            diagnostics.push(missing_clause(interner, decl, struct_name, "reads"));
        }
        for struct_name in missing_writes {
            diagnostics.push(missing_clause(interner, decl, struct_name, "writes"));
        }
    }

    diagnostics
}

fn missing_clause(interner: &Interner, decl: &FunctionDecl, struct_name: Symbol, clause: &str) -> Diagnostic {
    let fn_name = interner.resolve(decl.name);
    let struct_str = interner.resolve(struct_name);
    Diagnostic::error(
        DiagnosticCode::StorageAccess,
        format!("function '{fn_name}' accesses storage struct '{struct_str}' but does not declare it in {clause} clause"),
        decl.name_span,
    )
    .with_suggestion(Suggestion::new(format!("add '{struct_str}' to the {clause} clause of '{fn_name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, FunctionDecl, Param};
    use crate::callgraph::AccessKind;
    use crate::token::Span;

    fn sp() -> Span {
        Span::new(0, 1)
    }

    fn decl<'a>(interner: &mut Interner, name: &str) -> FunctionDecl<'a> {
        FunctionDecl {
            id: 1,
            span: sp(),
            attribute: None,
            doc: None,
            external: true,
            name: interner.intern(name),
            name_span: sp(),
            params: Vec::<Param<'a>>::new(),
            return_type: None,
            reads: Vec::new(),
            writes: Vec::new(),
            body: Some(Block { items: Vec::new(), tail_expr: None, span: sp() }),
        }
    }

    #[test]
    fn undeclared_write_is_reported() {
        let mut interner = Interner::new();
        let f = decl(&mut interner, "transfer");
        let balances = interner.intern("Balances");
        let amount = interner.intern("amount");

        let mut graph = CallGraph::new();
        graph.function_effects_mut(f.name).record_access(balances, amount, AccessKind::Write, sp());

        let mut functions = HashMap::new();
        functions.insert(f.name, &f);

        let diags = run(&graph, &functions, &interner);
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::StorageAccess));
    }

    #[test]
    fn declared_write_is_silent() {
        let mut interner = Interner::new();
        let mut f = decl(&mut interner, "transfer");
        let balances = interner.intern("Balances");
        let amount = interner.intern("amount");
        f.writes.push((balances, sp()));

        let mut graph = CallGraph::new();
        graph.function_effects_mut(f.name).record_access(balances, amount, AccessKind::Write, sp());

        let mut functions = HashMap::new();
        functions.insert(f.name, &f);

        let diags = run(&graph, &functions, &interner);
        assert!(diags.is_empty());
    }
}
