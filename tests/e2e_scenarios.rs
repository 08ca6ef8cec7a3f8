//! End-to-end analyzer scenarios (§8.4): each checks one diagnostic
//! category against a small but realistic contract.

mod common;

use common::{analyze_ok, diagnostics};
use kalang::diagnostic::DiagnosticCode;

#[test]
fn valid_transfer_has_no_diagnostics() {
    let src = r#"
contract Token {
    use std::evm::{sender};

    #[storage]
    struct State {
        balances: Slots<Address, U256>,
        total_supply: U256,
    }

    #[create]
    fn create(supply: U256) writes State {
        State.total_supply = supply;
        State.balances[sender()] = supply;
    }
}
"#;
    let diags = analyze_ok(src);
    assert!(diags.is_empty(), "expected no diagnostics, got {diags:?}");
}

#[test]
fn immutable_assignment_is_rejected() {
    let src = r#"
contract C {
    ext fn f() {
        let x = 1;
        x = 2;
    }
}
"#;
    let diags = analyze_ok(src);
    let hit = diags.iter().find(|d| d.code == DiagnosticCode::InvalidAssignment).expect("expected E0008");
    assert!(hit.message.contains("immutable"));
    assert!(hit.suggestions.iter().any(|s| s.message.contains("let mut x")));
}

#[test]
fn undeclared_write_is_rejected() {
    let src = r#"
contract C {
    #[storage]
    struct State {
        total_supply: U256,
    }

    ext fn f() writes {
        State.total_supply = 1;
    }
}
"#;
    let diags = analyze_ok(src);
    assert!(diags.iter().any(|d| d.code == DiagnosticCode::StorageAccess
        && d.message.contains("writes clause")));
}

#[test]
fn numeric_overflow_suggests_wider_width() {
    let src = r#"
contract C {
    ext fn f() {
        let x: U8 = 300;
    }
}
"#;
    let diags = analyze_ok(src);
    let hit = diags.iter().find(|d| d.code == DiagnosticCode::NumericOverflow).expect("expected E0011");
    assert!(hit.suggestions.iter().any(|s| s.message.contains("U16")));
}

#[test]
fn struct_literal_missing_field_is_reported() {
    let src = r#"
contract C {
    struct P {
        a: U8,
        b: U8,
    }

    ext fn f() {
        let p = P { a: 1 };
    }
}
"#;
    let diags = analyze_ok(src);
    assert!(diags.iter().any(|d| d.code == DiagnosticCode::MissingField && d.message.contains('b')));
}

#[test]
fn unused_helper_function_is_reported() {
    let src = r#"
contract C {
    ext fn f() {
        return;
    }

    fn helper() {
        return;
    }
}
"#;
    let diags = analyze_ok(src);
    assert!(diags
        .iter()
        .any(|d| d.code == DiagnosticCode::GenericSemantic && d.message.contains("helper") && d.message.contains("never used")));
}

#[test]
fn uninitialized_immutable_variable_is_rejected() {
    let src = r#"
contract C {
    ext fn f() {
        let x: U8;
    }
}
"#;
    let diags = analyze_ok(src);
    let hit = diags
        .iter()
        .find(|d| d.code == DiagnosticCode::UninitializedVariable)
        .expect("expected E0009");
    assert!(hit.message.contains('x'));
}

#[test]
fn undefined_call_suggests_extending_partial_import() {
    let src = r#"
contract C {
    use std::evm::{emit};

    ext fn f() {
        sender();
    }
}
"#;
    let diags = analyze_ok(src);
    let hit = diags.iter().find(|d| d.code == DiagnosticCode::UndefinedFunction).expect("expected E0002");
    let suggestion = hit.suggestions.first().expect("expected an import-extension suggestion");
    assert!(suggestion.message.contains("use std::evm::{emit}"));
    assert!(suggestion.message.contains("use std::evm::{emit, sender}"));
}

#[test]
fn scan_and_parse_errors_surface_as_messages() {
    let msgs = diagnostics("contract C { struct { } }");
    assert!(!msgs.is_empty());
}
