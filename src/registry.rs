//! Context registry (§4.3): user-defined types, imported functions and
//! imported modules for a single analysis, validated against the
//! immutable [`crate::stdlib`] descriptor.

use crate::ast::{StructDecl, UseDecl};
use crate::intern::{Interner, Symbol};
use crate::stdlib::stdlib;
use crate::suggest::find_similar;
use crate::token::Span;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct ImportedFunction {
    pub module_path: Vec<String>,
    pub name: String,
}

pub struct ContextRegistry<'a> {
    user_types: HashMap<Symbol, &'a StructDecl<'a>>,
    /// name -> the module it was imported from (brace-list imports).
    imported_functions: HashMap<Symbol, ImportedFunction>,
    /// alias -> full module path (whole-module imports).
    imported_modules: HashMap<Symbol, Vec<String>>,
    /// Module paths that were named in a brace-list `use`, whether or not
    /// every imported name in the list resolved — tracked separately from
    /// `imported_functions` so "extend this import" suggestions can tell a
    /// module with a partial import apart from one never mentioned at all.
    brace_import_paths: HashSet<Vec<String>>,
}

impl<'a> ContextRegistry<'a> {
    pub fn new() -> Self {
        Self {
            user_types: HashMap::new(),
            imported_functions: HashMap::new(),
            imported_modules: HashMap::new(),
            brace_import_paths: HashSet::new(),
        }
    }

    /// Registers a struct declaration. Returns `Err` with the previous
    /// declaration's span if `name` was already registered.
    pub fn add_user_type(&mut self, name: Symbol, decl: &'a StructDecl<'a>) -> Result<(), Span> {
        if let Some(existing) = self.user_types.get(&name) {
            return Err(existing.name_span);
        }
        self.user_types.insert(name, decl);
        Ok(())
    }

    pub fn is_user_type(&self, name: Symbol) -> bool {
        self.user_types.contains_key(&name)
    }

    pub fn get_user_type(&self, name: Symbol) -> Option<&'a StructDecl<'a>> {
        self.user_types.get(&name).copied()
    }

    pub fn is_imported_function(&self, name: Symbol) -> bool {
        self.imported_functions.contains_key(&name)
    }

    pub fn is_imported_module(&self, name: Symbol) -> bool {
        self.imported_modules.contains_key(&name)
    }

    pub fn get_function_definition(&self, name: Symbol) -> Option<&ImportedFunction> {
        self.imported_functions.get(&name)
    }

    pub fn get_module_function_definition(&self, module_alias: Symbol, fn_name: &str) -> Option<&'static str> {
        let path = self.imported_modules.get(&module_alias)?;
        let path_refs: Vec<&str> = path.iter().map(String::as_str).collect();
        stdlib().function_in(&path_refs, fn_name).map(|f| f.name)
    }

    pub fn module_path_for_alias(&self, alias: Symbol) -> Option<&[String]> {
        self.imported_modules.get(&alias).map(Vec::as_slice)
    }

    /// The names currently imported from `module_path` via a brace list,
    /// sorted and deduplicated — `None` if that module was never named in a
    /// brace `use` at all (as opposed to having zero successfully-resolved
    /// imports).
    pub fn brace_imported_names(&self, module_path: &[String]) -> Option<Vec<String>> {
        if !self.brace_import_paths.contains(module_path) {
            return None;
        }
        let mut names: Vec<String> = self
            .imported_functions
            .values()
            .filter(|f| f.module_path == module_path)
            .map(|f| f.name.clone())
            .collect();
        names.sort();
        names.dedup();
        Some(names)
    }

    /// Validates a `use` statement against the standard-library descriptor.
    /// Returns one error message per unresolved segment/import; an empty
    /// vec means the import is fully valid and has been registered.
    pub fn process_use(&mut self, use_decl: &UseDecl, interner: &Interner) -> Vec<String> {
        let mut errors = Vec::new();
        let path: Vec<String> =
            use_decl.namespace_path.iter().map(|(sym, _)| interner.resolve(*sym).to_string()).collect();
        let path_refs: Vec<&str> = path.iter().map(String::as_str).collect();

        let lib = stdlib();
        let module = lib.module(&path_refs);
        if module.is_none() {
            let last = path.last().cloned().unwrap_or_default();
            errors.push(format!("unknown function or type '{}'", last));
            return errors;
        }

        if use_decl.imports.is_empty() {
            // Whole-module import; alias is the last path segment.
            if let Some(last) = use_decl.namespace_path.last() {
                self.imported_modules.insert(last.0, path.clone());
            }
            return errors;
        }

        self.brace_import_paths.insert(path.clone());
        let candidates = lib.function_names_in(&path_refs);
        for (import_sym, _span) in &use_decl.imports {
            let import_name = interner.resolve(*import_sym);
            let known = candidates.contains(&import_name) || lib.item_in(&path_refs, import_name);
            if known {
                self.imported_functions.insert(
                    *import_sym,
                    ImportedFunction { module_path: path.clone(), name: import_name.to_string() },
                );
            } else {
                let mut msg = format!("unknown function or type '{}'", import_name);
                if import_name.len() >= 2 {
                    if let Some(suggestion) = find_similar(import_name, &candidates, 2) {
                        msg.push_str(&format!(" (did you mean '{}'?)", suggestion));
                    }
                }
                errors.push(msg);
            }
        }
        errors
    }
}

impl<'a> Default for ContextRegistry<'a> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeId, UseDecl};

    fn use_decl(id: NodeId, namespace: Vec<(Symbol, Span)>, imports: Vec<(Symbol, Span)>) -> UseDecl {
        UseDecl { id, span: Span::new(0, 1), namespace_path: namespace, imports }
    }

    #[test]
    fn whole_module_import_registers_alias() {
        let mut interner = Interner::new();
        let std_sym = interner.intern("std");
        let evm_sym = interner.intern("evm");
        let mut reg = ContextRegistry::new();
        let decl = use_decl(1, vec![(std_sym, Span::new(0, 1)), (evm_sym, Span::new(0, 1))], vec![]);
        let errors = reg.process_use(&decl, &interner);
        assert!(errors.is_empty());
        assert!(reg.is_imported_module(evm_sym));
    }

    #[test]
    fn brace_import_registers_known_function() {
        let mut interner = Interner::new();
        let std_sym = interner.intern("std");
        let evm_sym = interner.intern("evm");
        let sender_sym = interner.intern("sender");
        let mut reg = ContextRegistry::new();
        let decl = use_decl(
            1,
            vec![(std_sym, Span::new(0, 1)), (evm_sym, Span::new(0, 1))],
            vec![(sender_sym, Span::new(0, 1))],
        );
        let errors = reg.process_use(&decl, &interner);
        assert!(errors.is_empty());
        assert!(reg.is_imported_function(sender_sym));
    }

    #[test]
    fn unknown_import_reports_typo_suggestion() {
        let mut interner = Interner::new();
        let std_sym = interner.intern("std");
        let evm_sym = interner.intern("evm");
        let typo_sym = interner.intern("sendr");
        let mut reg = ContextRegistry::new();
        let decl = use_decl(
            1,
            vec![(std_sym, Span::new(0, 1)), (evm_sym, Span::new(0, 1))],
            vec![(typo_sym, Span::new(0, 1))],
        );
        let errors = reg.process_use(&decl, &interner);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("sender"));
    }

    #[test]
    fn brace_imported_names_tracks_partial_import() {
        let mut interner = Interner::new();
        let std_sym = interner.intern("std");
        let evm_sym = interner.intern("evm");
        let emit_sym = interner.intern("emit");
        let mut reg = ContextRegistry::new();
        let decl = use_decl(
            1,
            vec![(std_sym, Span::new(0, 1)), (evm_sym, Span::new(0, 1))],
            vec![(emit_sym, Span::new(0, 1))],
        );
        reg.process_use(&decl, &interner);
        let names = reg.brace_imported_names(&["std".to_string(), "evm".to_string()]).expect("module was imported");
        assert_eq!(names, vec!["emit".to_string()]);
        assert!(reg.brace_imported_names(&["std".to_string(), "address".to_string()]).is_none());
    }

    #[test]
    fn unknown_module_errors() {
        let mut interner = Interner::new();
        let std_sym = interner.intern("std");
        let bogus_sym = interner.intern("bogus");
        let mut reg = ContextRegistry::new();
        let decl = use_decl(1, vec![(std_sym, Span::new(0, 1)), (bogus_sym, Span::new(0, 1))], vec![]);
        let errors = reg.process_use(&decl, &interner);
        assert_eq!(errors.len(), 1);
    }
}
