//! Pass 4, the function-liveness half (§4.5): a local function that is
//! neither `ext` nor `#[create]` and unreachable from any entry point
//! through `CalledLocal` edges is dead. The `Variable`-symbol half of pass 4
//! is checked inline in `pass2_body` as each block scope closes.

use crate::ast::{FunctionAttr, FunctionDecl};
use crate::callgraph::CallGraph;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::intern::{Interner, Symbol};
use std::collections::{HashMap, HashSet, VecDeque};

pub fn run(graph: &CallGraph, functions: &HashMap<Symbol, &FunctionDecl>, interner: &Interner) -> Vec<Diagnostic> {
    let mut reachable: HashSet<Symbol> = HashSet::new();
    let mut queue: VecDeque<Symbol> = VecDeque::new();

    for (&name, decl) in functions {
        if decl.external || matches!(decl.attribute, Some((FunctionAttr::Create, _))) {
            if reachable.insert(name) {
                queue.push_back(name);
            }
        }
    }

    while let Some(caller) = queue.pop_front() {
        let Some(effects) = graph.function_effects(caller) else { continue };
        for &callee in &effects.called_locals {
            if reachable.insert(callee) {
                queue.push_back(callee);
            }
        }
    }

    let mut diagnostics = Vec::new();
    for (&name, decl) in functions {
        if !reachable.contains(&name) {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::GenericSemantic,
                format!("function '{}' is defined but never used", interner.resolve(name)),
                decl.name_span,
            ));
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, Param};
    use crate::token::Span;

    fn sp() -> Span {
        Span::new(0, 1)
    }

    fn decl<'a>(interner: &mut Interner, name: &str, external: bool) -> FunctionDecl<'a> {
        FunctionDecl {
            id: 1,
            span: sp(),
            attribute: None,
            doc: None,
            external,
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
    fn unreachable_helper_is_reported() {
        let mut interner = Interner::new();
        let entry = decl(&mut interner, "transfer", true);
        let helper = decl(&mut interner, "helper", false);

        let graph = CallGraph::new();
        let mut functions = HashMap::new();
        functions.insert(entry.name, &entry);
        functions.insert(helper.name, &helper);

        let diags = run(&graph, &functions, &interner);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("helper"));
    }

    #[test]
    fn helper_called_from_entry_is_live() {
        let mut interner = Interner::new();
        let entry = decl(&mut interner, "transfer", true);
        let helper = decl(&mut interner, "helper", false);

        let mut graph = CallGraph::new();
        graph.function_effects_mut(entry.name).record_call(helper.name);

        let mut functions = HashMap::new();
        functions.insert(entry.name, &entry);
        functions.insert(helper.name, &helper);

        let diags = run(&graph, &functions, &interner);
        assert!(diags.is_empty());
    }
}
