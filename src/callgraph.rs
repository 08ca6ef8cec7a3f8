//! Call graph and the fixed-point closure of required storage accesses
//! (§3.5, §4.2 pass 3), grounded in the teacher's iterative worklist style
//! in `analysis/mod.rs`.

use crate::intern::Symbol;
use crate::token::Span;
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy)]
pub struct DirectStorageAccess {
    pub struct_name: Symbol,
    pub field_name: Symbol,
    pub kind: AccessKind,
    pub position: Span,
}

/// Per-function accumulator built during pass 2, consumed by pass 3's
/// fixed-point closure.
#[derive(Debug, Default)]
pub struct FunctionEffects {
    pub direct_accesses: Vec<DirectStorageAccess>,
    pub called_locals: BTreeSet<Symbol>,
}

impl FunctionEffects {
    pub fn record_access(&mut self, struct_name: Symbol, field_name: Symbol, kind: AccessKind, position: Span) {
        self.direct_accesses.push(DirectStorageAccess { struct_name, field_name, kind, position });
    }

    pub fn record_call(&mut self, callee: Symbol) {
        self.called_locals.insert(callee);
    }
}

/// Required reads/writes per function, keyed by `struct_name`, after the
/// call-graph has been closed. Writes always imply reads for the same
/// struct (§3.5).
#[derive(Debug, Default, Clone)]
pub struct RequiredAccess {
    pub reads: HashSet<Symbol>,
    pub writes: HashSet<Symbol>,
}

impl RequiredAccess {
    fn union_from(&mut self, other: &RequiredAccess) -> bool {
        let mut grew = false;
        for &s in &other.reads {
            grew |= self.reads.insert(s);
        }
        for &s in &other.writes {
            grew |= self.writes.insert(s);
            grew |= self.reads.insert(s);
        }
        grew
    }
}

pub struct CallGraph {
    effects: HashMap<Symbol, FunctionEffects>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self { effects: HashMap::new() }
    }

    pub fn function_effects_mut(&mut self, name: Symbol) -> &mut FunctionEffects {
        self.effects.entry(name).or_default()
    }

    pub fn function_effects(&self, name: Symbol) -> Option<&FunctionEffects> {
        self.effects.get(&name)
    }

    pub fn functions(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.effects.keys().copied()
    }

    /// Closes required reads/writes transitively over `called_locals`.
    /// Converges in at most `functions().count()` iterations (§5): each
    /// round either grows some function's set or nothing changes, and sets
    /// are bounded by the number of distinct storage structs.
    pub fn close(&self) -> HashMap<Symbol, RequiredAccess> {
        let mut required: HashMap<Symbol, RequiredAccess> = HashMap::new();
        for (&name, effects) in &self.effects {
            let entry = required.entry(name).or_default();
            for access in &effects.direct_accesses {
                match access.kind {
                    AccessKind::Read => {
                        entry.reads.insert(access.struct_name);
                    }
                    AccessKind::Write => {
                        entry.writes.insert(access.struct_name);
                        entry.reads.insert(access.struct_name);
                    }
                }
            }
        }

        loop {
            let mut changed = false;
            for (&caller, effects) in &self.effects {
                for &callee in &effects.called_locals {
                    let Some(callee_access) = required.get(&callee).cloned() else { continue };
                    let caller_access = required.entry(caller).or_default();
                    if caller_access.union_from(&callee_access) {
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        required
    }
}

impl Default for CallGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::Interner;

    fn sp() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn direct_access_is_required() {
        let mut interner = Interner::new();
        let f = interner.intern("transfer");
        let balances = interner.intern("Balances");
        let amount = interner.intern("amount");
        let mut graph = CallGraph::new();
        graph.function_effects_mut(f).record_access(balances, amount, AccessKind::Write, sp());

        let closed = graph.close();
        let req = &closed[&f];
        assert!(req.writes.contains(&balances));
        assert!(req.reads.contains(&balances), "a write implies a read");
    }

    #[test]
    fn transitive_call_propagates_access() {
        let mut interner = Interner::new();
        let inner = interner.intern("inner");
        let outer = interner.intern("outer");
        let balances = interner.intern("Balances");
        let amount = interner.intern("amount");

        let mut graph = CallGraph::new();
        graph.function_effects_mut(inner).record_access(balances, amount, AccessKind::Read, sp());
        graph.function_effects_mut(outer).record_call(inner);

        let closed = graph.close();
        assert!(closed[&outer].reads.contains(&balances));
        assert!(!closed[&outer].writes.contains(&balances));
    }

    #[test]
    fn mutual_recursion_converges() {
        let mut interner = Interner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let balances = interner.intern("Balances");
        let amount = interner.intern("amount");

        let mut graph = CallGraph::new();
        graph.function_effects_mut(a).record_access(balances, amount, AccessKind::Write, sp());
        graph.function_effects_mut(a).record_call(b);
        graph.function_effects_mut(b).record_call(a);

        let closed = graph.close();
        assert!(closed[&a].writes.contains(&balances));
        assert!(closed[&b].writes.contains(&balances));
    }

    #[test]
    fn independent_functions_stay_isolated() {
        let mut interner = Interner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let balances = interner.intern("Balances");
        let amount = interner.intern("amount");

        let mut graph = CallGraph::new();
        graph.function_effects_mut(a).record_access(balances, amount, AccessKind::Read, sp());
        graph.function_effects_mut(b);

        let closed = graph.close();
        assert!(closed[&a].reads.contains(&balances));
        assert!(closed[&b].reads.is_empty());
    }
}
