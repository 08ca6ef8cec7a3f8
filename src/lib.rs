//! Compiler front end for the `.ka` smart-contract language: a lexical
//! scanner, a recursive-descent/Pratt parser, and a four-pass semantic
//! analyzer, all sharing a bump-arena-backed AST (§3 of the design notes).

pub mod analysis;
pub mod arena;
pub mod arena_ctx;
pub mod ast;
pub mod callgraph;
pub mod diagnostic;
pub mod error;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod stdlib;
pub mod suggest;
pub mod symbol;
pub mod token;
pub mod types;

#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
pub mod cli;
#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
pub mod render;

pub use arena::Arena;
pub use arena_ctx::AstContext;
pub use ast::Contract;
pub use diagnostic::Diagnostic;
pub use error::{ParseError, ScanError};
pub use intern::{Interner, Symbol};

/// Owns the arenas and interner for one source file's parse and holds the
/// resulting `Contract` alive for as long as analysis needs it.
pub struct ParsedSource<'a> {
    pub contract: Option<Contract<'a>>,
    pub scan_errors: Vec<ScanError>,
    pub parse_errors: Vec<ParseError>,
}

/// Scans and parses one `.ka` source file. Never panics: lexical and
/// syntactic errors are collected and returned rather than aborting, so a
/// caller can still run semantic analysis over whatever AST recovery
/// managed to produce (possibly containing `Bad*` nodes).
pub fn parse_source<'a>(
    source: &str,
    interner: &mut Interner,
    exprs: &'a Arena<ast::Expr<'a>>,
    types: &'a Arena<ast::Type<'a>>,
) -> ParsedSource<'a> {
    let (tokens, scan_errors) = lexer::scan(source, interner);
    let (contract, parse_errors) = parser::parse_source(tokens, exprs, types, interner);
    ParsedSource { contract, scan_errors, parse_errors }
}

/// Runs the four-pass semantic analyzer over a parsed contract (§4.5).
pub fn analyze(contract: &Contract, interner: &mut Interner) -> Vec<Diagnostic> {
    analysis::analyze(contract, interner)
}
