//! Pass 1 — declaration collection (§4.5). Walks contract items in source
//! order, registers structs and `use` imports in the [`ContextRegistry`],
//! records local function names, and tracks which structs carry the
//! `storage` attribute.

use crate::ast::{Contract, ContractItem, FunctionDecl, StructAttr};
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::intern::{Interner, Symbol};
use crate::registry::ContextRegistry;
use crate::token::Span;
use std::collections::{HashMap, HashSet};

pub struct Pass1Output<'a> {
    pub registry: ContextRegistry<'a>,
    pub storage_structs: HashSet<Symbol>,
    pub functions: HashMap<Symbol, &'a FunctionDecl<'a>>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn run<'a>(contract: &'a Contract<'a>, interner: &Interner) -> Pass1Output<'a> {
    let mut registry = ContextRegistry::new();
    let mut storage_structs = HashSet::new();
    let mut functions: HashMap<Symbol, &'a FunctionDecl<'a>> = HashMap::new();
    let mut declared_at: HashMap<Symbol, Span> = HashMap::new();
    let mut diagnostics = Vec::new();

    for item in &contract.items {
        match item {
            ContractItem::Use(use_decl) => {
                for message in registry.process_use(use_decl, interner) {
                    diagnostics.push(Diagnostic::error(DiagnosticCode::UndefinedModule, message, use_decl.span));
                }
            }
            ContractItem::Struct(decl) => {
                if let Some(prev) = declared_at.insert(decl.name, decl.name_span) {
                    diagnostics.push(duplicate_decl(interner, decl.name, decl.name_span, prev));
                } else if let Err(prev) = registry.add_user_type(decl.name, decl) {
                    diagnostics.push(duplicate_decl(interner, decl.name, decl.name_span, prev));
                }
                if matches!(decl.attribute, Some((StructAttr::Storage, _))) {
                    storage_structs.insert(decl.name);
                }
            }
            ContractItem::Function(decl) => {
                if let Some(prev) = declared_at.insert(decl.name, decl.name_span) {
                    diagnostics.push(duplicate_decl(interner, decl.name, decl.name_span, prev));
                } else {
                    functions.insert(decl.name, decl);
                }
            }
            ContractItem::Comment(_) => {}
        }
    }

    Pass1Output { registry, storage_structs, functions, diagnostics }
}

fn duplicate_decl(interner: &Interner, name: Symbol, span: Span, _prev: Span) -> Diagnostic {
    Diagnostic::error(
        DiagnosticCode::DuplicateDeclaration,
        format!("duplicate declaration '{}'", interner.resolve(name)),
        span,
    )
}
