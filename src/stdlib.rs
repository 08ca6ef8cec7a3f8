//! The bundled, immutable standard-library descriptor (§6.4). Every
//! analysis shares the same static table; nothing here is mutable after
//! `std::sync::OnceLock` first builds it, matching §5's "only shared
//! read-only state" rule.

use std::sync::OnceLock;

#[derive(Debug, Clone, Copy)]
pub struct StdFunction {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub return_type: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub struct StdModule {
    /// Full dotted path, e.g. `["std", "evm"]`.
    pub path: &'static [&'static str],
    pub functions: &'static [StdFunction],
    /// Constants/types exposed by the module besides its functions (e.g.
    /// `std::errors`'s named error constants, `std::ascii::String`).
    pub items: &'static [&'static str],
}

pub const BUILTIN_SCALAR_TYPES: &[&str] =
    &["U8", "U16", "U32", "U64", "U128", "U256", "Bool", "Address"];

pub const BUILTIN_GENERIC_TYPES: &[(&str, usize)] =
    &[("Slots", 2), ("Vector", 1), ("Map", 2)];

const EVM_FUNCTIONS: &[StdFunction] = &[
    StdFunction { name: "sender", params: &[], return_type: Some("Address") },
    StdFunction { name: "emit", params: &["Event"], return_type: None },
];

const ADDRESS_FUNCTIONS: &[StdFunction] =
    &[StdFunction { name: "zero", params: &[], return_type: Some("Address") }];

const ERROR_CONSTANTS: &[&str] = &["INSUFFICIENT_BALANCE", "UNAUTHORIZED", "OVERFLOW"];

pub struct Stdlib {
    pub modules: Vec<StdModule>,
}

impl Stdlib {
    pub fn module(&self, path: &[&str]) -> Option<&StdModule> {
        self.modules.iter().find(|m| m.path == path)
    }

    pub fn function_in(&self, path: &[&str], name: &str) -> Option<&StdFunction> {
        self.module(path)?.functions.iter().find(|f| f.name == name)
    }

    pub fn item_in(&self, path: &[&str], name: &str) -> bool {
        self.module(path).map(|m| m.items.contains(&name)).unwrap_or(false)
    }

    /// Every function name defined anywhere in the standard library, used
    /// as the typo-suggestion candidate pool for `use` resolution failures.
    pub fn all_function_names(&self) -> Vec<&'static str> {
        self.modules.iter().flat_map(|m| m.functions.iter().map(|f| f.name)).collect()
    }

    pub fn function_names_in(&self, path: &[&str]) -> Vec<&'static str> {
        self.module(path).map(|m| m.functions.iter().map(|f| f.name).collect()).unwrap_or_default()
    }

    /// The module(s), if any, that define a function named `name` — used to
    /// offer an "extend this `use`" suggestion when a call references a
    /// stdlib function that exists but was never imported.
    pub fn modules_defining(&self, name: &str) -> Vec<&'static [&'static str]> {
        self.modules.iter().filter(|m| m.functions.iter().any(|f| f.name == name)).map(|m| m.path).collect()
    }
}

static STDLIB: OnceLock<Stdlib> = OnceLock::new();

pub fn stdlib() -> &'static Stdlib {
    STDLIB.get_or_init(|| Stdlib {
        modules: vec![
            StdModule { path: &["std", "evm"], functions: EVM_FUNCTIONS, items: &[] },
            StdModule { path: &["std", "address"], functions: ADDRESS_FUNCTIONS, items: &[] },
            StdModule { path: &["std", "ascii"], functions: &[], items: &["String"] },
            StdModule { path: &["std", "errors"], functions: &[], items: ERROR_CONSTANTS },
        ],
    })
}

pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_SCALAR_TYPES.contains(&name)
        || BUILTIN_GENERIC_TYPES.iter().any(|(n, _)| *n == name)
}

pub fn builtin_generic_arity(name: &str) -> Option<usize> {
    BUILTIN_GENERIC_TYPES.iter().find(|(n, _)| *n == name).map(|(_, a)| *a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evm_module_has_sender_and_emit() {
        let lib = stdlib();
        assert!(lib.function_in(&["std", "evm"], "sender").is_some());
        assert!(lib.function_in(&["std", "evm"], "emit").is_some());
        assert!(lib.function_in(&["std", "evm"], "nope").is_none());
    }

    #[test]
    fn builtin_types_recognized() {
        assert!(is_builtin_type("U256"));
        assert!(is_builtin_type("Address"));
        assert!(is_builtin_type("Slots"));
        assert!(!is_builtin_type("State"));
    }

    #[test]
    fn generic_arity_lookup() {
        assert_eq!(builtin_generic_arity("Slots"), Some(2));
        assert_eq!(builtin_generic_arity("Vector"), Some(1));
        assert_eq!(builtin_generic_arity("U8"), None);
    }
}
