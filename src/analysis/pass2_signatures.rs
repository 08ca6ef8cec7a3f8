//! Pass 2 steps 1-2 (§4.5): validates a function's `#[create]` attribute
//! and its `reads`/`writes` clauses before the body is ever walked, so
//! step 3 onward (`pass2_body`) can assume both are well-formed.

use crate::ast::{FunctionAttr, FunctionDecl};
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::intern::{Interner, Symbol};
use std::collections::HashSet;

/// Validates one function's attribute and effect clauses. `create_seen`
/// tracks whether a prior function in the same contract already carried
/// `#[create]`, enforcing "at most one `create` per contract" across calls.
pub fn validate_signature(
    decl: &FunctionDecl,
    storage_structs: &HashSet<Symbol>,
    interner: &Interner,
    create_seen: &mut bool,
    out: &mut Vec<Diagnostic>,
) {
    if let Some((FunctionAttr::Create, attr_span)) = decl.attribute {
        if *create_seen {
            out.push(Diagnostic::error(
                DiagnosticCode::InvalidConstructor,
                "at most one function may be annotated '#[create]' per contract",
                attr_span,
            ));
        }
        *create_seen = true;

        if decl.return_type.is_some() {
            out.push(Diagnostic::error(
                DiagnosticCode::InvalidConstructor,
                "a '#[create]' function must not declare a return type",
                attr_span,
            ));
        }
        if decl.writes.is_empty() {
            out.push(Diagnostic::error(
                DiagnosticCode::InvalidConstructor,
                "a '#[create]' function must declare a non-empty writes clause",
                attr_span,
            ));
        } else if !decl.writes.iter().any(|(name, _)| storage_structs.contains(name)) {
            out.push(Diagnostic::error(
                DiagnosticCode::InvalidConstructor,
                "a '#[create]' function must write at least one storage struct",
                attr_span,
            ));
        }
    }

    validate_effect_list(&decl.reads, storage_structs, interner, "reads", out);
    validate_effect_list(&decl.writes, storage_structs, interner, "writes", out);

    let write_names: HashSet<Symbol> = decl.writes.iter().map(|(n, _)| *n).collect();
    for &(name, span) in &decl.reads {
        if write_names.contains(&name) {
            out.push(Diagnostic::error(
                DiagnosticCode::InvalidReadsWrites,
                format!(
                    "'{}' appears in both reads and writes clauses; writes already implies read access",
                    interner.resolve(name)
                ),
                span,
            ));
        }
    }
}

fn validate_effect_list(
    list: &[(Symbol, crate::token::Span)],
    storage_structs: &HashSet<Symbol>,
    interner: &Interner,
    clause: &str,
    out: &mut Vec<Diagnostic>,
) {
    let mut seen = HashSet::new();
    for &(name, span) in list {
        if !seen.insert(name) {
            out.push(Diagnostic::error(
                DiagnosticCode::InvalidReadsWrites,
                format!("duplicate '{}' in {clause} clause", interner.resolve(name)),
                span,
            ));
            continue;
        }
        if !storage_structs.contains(&name) {
            out.push(Diagnostic::error(
                DiagnosticCode::InvalidReadsWrites,
                format!(
                    "{clause} clause references non-storage struct '{}'",
                    interner.resolve(name)
                ),
                span,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, Param};
    use crate::token::Span;

    fn sp() -> Span {
        Span::new(0, 1)
    }

    fn base_decl<'a>(interner: &mut Interner) -> FunctionDecl<'a> {
        FunctionDecl {
            id: 1,
            span: sp(),
            attribute: None,
            doc: None,
            external: false,
            name: interner.intern("f"),
            name_span: sp(),
            params: Vec::<Param<'a>>::new(),
            return_type: None,
            reads: Vec::new(),
            writes: Vec::new(),
            body: Some(Block { items: Vec::new(), tail_expr: None, span: sp() }),
        }
    }

    #[test]
    fn non_storage_write_is_rejected() {
        let mut interner = Interner::new();
        let mut decl = base_decl(&mut interner);
        let helper = interner.intern("Helper");
        decl.writes.push((helper, sp()));
        let mut out = Vec::new();
        validate_signature(&decl, &HashSet::new(), &interner, &mut false, &mut out);
        assert!(out.iter().any(|d| d.code == DiagnosticCode::InvalidReadsWrites));
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let mut interner = Interner::new();
        let mut decl = base_decl(&mut interner);
        let state = interner.intern("State");
        decl.attribute = Some((FunctionAttr::Create, sp()));
        decl.writes.push((state, sp()));
        let mut storage = HashSet::new();
        storage.insert(state);
        let mut seen = true;
        let mut out = Vec::new();
        validate_signature(&decl, &storage, &interner, &mut seen, &mut out);
        assert!(out.iter().any(|d| d.code == DiagnosticCode::InvalidConstructor));
    }
}
