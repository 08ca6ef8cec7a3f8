use kalang::ast::{Expr, Type};
use kalang::diagnostic::Diagnostic;
use kalang::error::{ParseError, ScanError};
use kalang::{analyze, parse_source, Arena, Interner};

/// Parses and analyzes `source`, returning every diagnostic produced by
/// either stage. Scan/parse errors are rendered into the same list so a
/// scenario's "expected error count" can be checked without caring which
/// stage caught it.
pub fn diagnostics(source: &str) -> Vec<String> {
    let mut interner = Interner::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();

    let parsed = parse_source(source, &mut interner, &exprs, &types);
    let mut messages: Vec<String> = Vec::new();
    messages.extend(parsed.scan_errors.iter().map(ScanError::message));
    messages.extend(parsed.parse_errors.iter().map(ParseError::message));

    if let Some(contract) = &parsed.contract {
        let diags = analyze(contract, &mut interner);
        messages.extend(diags.iter().map(|d| format!("{}: {}", d.code.as_str(), d.message)));
    }
    messages
}

/// Like [`diagnostics`] but returns the structured `Diagnostic`s from
/// semantic analysis only (panics if parsing failed to produce a contract).
pub fn analyze_ok(source: &str) -> Vec<Diagnostic> {
    let mut interner = Interner::new();
    let exprs: Arena<Expr> = Arena::new();
    let types: Arena<Type> = Arena::new();

    let parsed = parse_source(source, &mut interner, &exprs, &types);
    assert!(parsed.scan_errors.is_empty(), "unexpected scan errors: {:?}", parsed.scan_errors);
    assert!(parsed.parse_errors.is_empty(), "unexpected parse errors: {:?}", parsed.parse_errors);
    let contract = parsed.contract.expect("parser did not produce a contract");
    analyze(&contract, &mut interner)
}
