//! Expression analysis and type inference (§4.6), plus the assignment
//! l-value rules of §4.8. Every expression is walked once, emitting
//! diagnostics and returning an inferred [`TypeRef`] (`None` for void or an
//! already-diagnosed error, so callers don't cascade further complaints).

use super::builtins::BuiltinSymbols;
use crate::ast::{BinaryOp, Expr, ExprKind, FunctionDecl, Literal, StructDecl, Type, TypeKind, UnaryOp};
use crate::callgraph::{AccessKind, FunctionEffects};
use crate::diagnostic::{Diagnostic, DiagnosticCode, Suggestion};
use crate::intern::{Interner, Symbol};
use crate::registry::ContextRegistry;
use crate::stdlib::stdlib;
use crate::suggest::find_similar;
use crate::symbol::{ScopeStack, SymbolKind};
use crate::token::Span;
use crate::types::{fits_in_width, NumericWidth, TypeRef};
use std::collections::HashSet;

pub struct FnCtx<'r, 'a, 'i> {
    pub registry: &'r ContextRegistry<'a>,
    pub storage_structs: &'r HashSet<Symbol>,
    pub functions: &'r std::collections::HashMap<Symbol, &'a FunctionDecl<'a>>,
    pub interner: &'i mut Interner,
    pub builtins: &'r BuiltinSymbols,
    pub scopes: ScopeStack,
    pub effects: FunctionEffects,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'r, 'a, 'i> FnCtx<'r, 'a, 'i> {
    fn is_numeric(&self, ty: &TypeRef) -> Option<NumericWidth> {
        NumericWidth::from_name(self.interner.resolve(ty.name))
    }

    fn is_bool(&self, ty: &TypeRef) -> bool {
        ty.name == self.builtins.bool_
    }

    fn type_name(&self, ty: &TypeRef) -> String {
        ty.display(self.interner)
    }

    /// Resolves a parsed type annotation into a [`TypeRef`], validating that
    /// named types are either built in or a known user struct.
    pub fn resolve_type(&mut self, ty: &Type) -> Option<TypeRef> {
        match &ty.kind {
            TypeKind::Bad => None,
            TypeKind::Tuple { elements } => {
                let mut args = Vec::with_capacity(elements.len());
                for el in elements.iter() {
                    args.push(self.resolve_type(el)?);
                }
                Some(TypeRef::generic(self.builtins.tuple, args))
            }
            TypeKind::Named { name, generics } => {
                let name_str = self.interner.resolve(*name).to_string();
                let known = crate::stdlib::is_builtin_type(&name_str) || self.registry.is_user_type(*name);
                if !known {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticCode::GenericSemantic,
                        format!("unknown type '{}'", name_str),
                        ty.span,
                    ));
                    return None;
                }
                let mut args = Vec::with_capacity(generics.len());
                for g in generics.iter() {
                    args.push(self.resolve_type(g)?);
                }
                Some(TypeRef { name: *name, is_generic_param: false, generic_args: args })
            }
        }
    }

    /// Structural compatibility including numeric promotion; `actual` must
    /// be assignable to `expected`.
    pub fn compatible(&self, actual: &TypeRef, expected: &TypeRef) -> bool {
        if let (Some(a), Some(e)) = (self.is_numeric(actual), self.is_numeric(expected)) {
            return a.promotable_to(e);
        }
        if actual.name != expected.name || actual.generic_args.len() != expected.generic_args.len() {
            return false;
        }
        actual.generic_args.iter().zip(&expected.generic_args).all(|(a, e)| self.compatible(a, e))
    }

    /// If `fn_name` names a stdlib function whose module already has a
    /// brace-list `use` in this contract, suggests extending that list
    /// rather than just reporting the call as undefined (§7: "extend `use
    /// std::evm::{emit}` to `use std::evm::{emit, sender}`", alphabetically
    /// sorted, never duplicating an existing import).
    fn import_extension_suggestion(&self, fn_name: &str) -> Option<Suggestion> {
        for module_path in stdlib().modules_defining(fn_name) {
            let path_strings: Vec<String> = module_path.iter().map(|s| s.to_string()).collect();
            let Some(before) = self.registry.brace_imported_names(&path_strings) else { continue };
            if before.iter().any(|n| n == fn_name) {
                continue;
            }
            let mut after = before.clone();
            after.push(fn_name.to_string());
            after.sort();
            let module_str = path_strings.join("::");
            return Some(Suggestion::new(format!(
                "extend `use {}::{{{}}}` to `use {}::{{{}}}`",
                module_str,
                before.join(", "),
                module_str,
                after.join(", ")
            )));
        }
        None
    }

    fn undefined_variable(&mut self, name: Symbol, span: Span) {
        let text = self.interner.resolve(name).to_string();
        let mut candidates: Vec<&str> =
            self.scopes.all_entries().map(|e| self.interner.resolve(e.name)).collect();
        candidates.sort_unstable();
        candidates.dedup();
        let mut message = format!("undefined variable '{}'", text);
        if text.len() >= 2 {
            if let Some(s) = find_similar(&text, &candidates, 2) {
                message.push_str(&format!(" (did you mean '{}'?)", s));
            }
        }
        self.diagnostics.push(Diagnostic::error(DiagnosticCode::UndefinedVariable, message, span));
    }

    /// Infers an expression's type in a read context.
    pub fn infer(&mut self, expr: &Expr, expected: Option<&TypeRef>) -> Option<TypeRef> {
        self.infer_inner(expr, expected, false)
    }

    /// Infers an expression's type while marking any storage field writes
    /// it bottoms out in (assignment LHS position), per §4.6/§4.8.
    pub fn infer_write_target(&mut self, expr: &Expr) -> Option<TypeRef> {
        self.infer_inner(expr, None, true)
    }

    fn infer_inner(&mut self, expr: &Expr, expected: Option<&TypeRef>, write_ctx: bool) -> Option<TypeRef> {
        match &expr.kind {
            ExprKind::Bad => None,
            ExprKind::Literal(lit) => self.infer_literal(lit, expected, expr.span),
            ExprKind::Ident(name) => self.infer_ident(*name, expr.span, write_ctx),
            ExprKind::Path(segments) => self.infer_path(segments, expr.span),
            ExprKind::Unary { op, operand } => self.infer_unary(*op, operand, expr.span),
            ExprKind::Binary { op, left, right } => self.infer_binary(*op, left, right, expr.span),
            ExprKind::Call { callee, args, .. } => self.infer_call(callee, args, expected, expr.span),
            ExprKind::FieldAccess { base, field, field_span } => {
                self.infer_field_access(base, *field, *field_span, expr.span, write_ctx)
            }
            ExprKind::Index { base, index } => self.infer_index(base, index, expr.span, write_ctx),
            ExprKind::StructLiteral { path, fields } => self.infer_struct_literal(path, fields, expr.span),
            ExprKind::Tuple(elements) => self.infer_tuple(elements),
            ExprKind::Paren(inner) => self.infer_inner(inner, expected, write_ctx),
        }
    }

    fn infer_literal(&mut self, lit: &Literal, expected: Option<&TypeRef>, span: Span) -> Option<TypeRef> {
        match lit {
            Literal::Bool(_) => Some(TypeRef::simple(self.builtins.bool_)),
            Literal::String(_) => None,
            Literal::Number { text, is_hex } => {
                if *is_hex && crate::types::is_address_literal(text) {
                    return Some(TypeRef::simple(self.builtins.address));
                }
                // `text` carries the `0x` prefix for hex literals (as scanned);
                // the width helpers in `crate::types` operate on bare digits.
                let digits = if *is_hex { text.strip_prefix("0x").unwrap_or(text.as_str()) } else { text.as_str() };
                let expected_width = expected.and_then(|t| self.is_numeric(t));
                if let Some(ew) = expected_width {
                    match fits_in_width(digits, *is_hex, ew) {
                        Ok(()) => return Some(TypeRef::simple(self.builtins.width_symbol(ew))),
                        Err(alt) => {
                            let mut diag = Diagnostic::error(
                                DiagnosticCode::NumericOverflow,
                                format!("literal does not fit in '{}'", ew.name()),
                                span,
                            );
                            if let Some(alt_width) = alt {
                                diag = diag.with_suggestion(Suggestion::new(format!(
                                    "change '{}' to '{}'",
                                    ew.name(),
                                    alt_width.name()
                                )));
                            }
                            self.diagnostics.push(diag);
                            return alt.map(|w| TypeRef::simple(self.builtins.width_symbol(w)));
                        }
                    }
                }
                let narrowest = if *is_hex {
                    crate::types::narrowest_hex_width(digits)
                } else {
                    crate::types::narrowest_decimal_width(digits)
                };
                match narrowest {
                    Ok(w) => Some(TypeRef::simple(self.builtins.width_symbol(w))),
                    Err(crate::types::NumericLitError::LeadingZero) => {
                        self.diagnostics.push(Diagnostic::error(
                            DiagnosticCode::NumericOverflow,
                            "decimal literal with a leading zero is not allowed",
                            span,
                        ));
                        None
                    }
                    Err(crate::types::NumericLitError::Overflow) => {
                        self.diagnostics.push(Diagnostic::error(
                            DiagnosticCode::NumericOverflow,
                            "literal exceeds the largest supported width 'U256'",
                            span,
                        ));
                        None
                    }
                }
            }
        }
    }

    fn infer_ident(&mut self, name: Symbol, span: Span, write_ctx: bool) -> Option<TypeRef> {
        if let Some(entry) = self.scopes.lookup(name) {
            let ty = entry.ty.clone();
            let kind = entry.kind;
            if write_ctx {
                if kind != SymbolKind::Variable {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticCode::InvalidAssignment,
                        format!("cannot assign to '{}'", self.interner.resolve(name)),
                        span,
                    ));
                } else if !entry.mutable {
                    let text = self.interner.resolve(name).to_string();
                    self.diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::InvalidAssignment,
                            format!("cannot assign to immutable variable '{}'; change 'let {}' to 'let mut {}'", text, text, text),
                            span,
                        )
                        .with_suggestion(Suggestion::new(format!("change 'let {}' to 'let mut {}'", text, text))),
                    );
                } else {
                    self.scopes.lookup_mut(name).unwrap().mark_modified(span);
                }
            } else {
                self.scopes.lookup_mut(name).unwrap().mark_used();
            }
            return ty;
        }
        if self.registry.is_user_type(name) {
            return Some(TypeRef::simple(name));
        }
        if let Some(f) = self.registry.get_function_definition(name) {
            return self.resolve_imported_return(&f.module_path.clone(), &f.name.clone());
        }
        if write_ctx {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticCode::InvalidAssignment,
                format!("cannot assign to '{}'", self.interner.resolve(name)),
                span,
            ));
        } else {
            self.undefined_variable(name, span);
        }
        None
    }

    fn resolve_imported_return(&mut self, module_path: &[String], fn_name: &str) -> Option<TypeRef> {
        let path_refs: Vec<&str> = module_path.iter().map(String::as_str).collect();
        let ret = stdlib().function_in(&path_refs, fn_name)?.return_type?;
        let sym = self.interner.intern(ret);
        Some(TypeRef::simple(sym))
    }

    fn infer_path(&mut self, segments: &[Symbol], span: Span) -> Option<TypeRef> {
        if segments.len() != 2 {
            self.diagnostics.push(Diagnostic::error(DiagnosticCode::GenericSemantic, "unsupported path expression", span));
            return None;
        }
        let (module_alias, fn_name) = (segments[0], segments[1]);
        if !self.registry.is_imported_module(module_alias) {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticCode::UndefinedModule,
                format!("'{}' is not an imported module", self.interner.resolve(module_alias)),
                span,
            ));
            return None;
        }
        let module_path = self.registry.module_path_for_alias(module_alias)?.to_vec();
        let fn_name_str = self.interner.resolve(fn_name).to_string();
        if self.registry.get_module_function_definition(module_alias, &fn_name_str).is_none() {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticCode::UndefinedFunction,
                format!("'{}' has no member '{}'", self.interner.resolve(module_alias), fn_name_str),
                span,
            ));
            return None;
        }
        self.resolve_imported_return(&module_path, &fn_name_str)
    }

    fn infer_unary(&mut self, op: UnaryOp, operand: &Expr, span: Span) -> Option<TypeRef> {
        let ty = self.infer(operand, None)?;
        match op {
            UnaryOp::Neg | UnaryOp::Plus => {
                if self.is_numeric(&ty).is_some() {
                    Some(ty)
                } else {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticCode::TypeMismatch,
                        format!("unary operator requires a numeric operand, found '{}'", self.type_name(&ty)),
                        span,
                    ));
                    None
                }
            }
            UnaryOp::Not => {
                if self.is_bool(&ty) {
                    Some(ty)
                } else {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticCode::TypeMismatch,
                        format!("'!' requires a 'Bool' operand, found '{}'", self.type_name(&ty)),
                        span,
                    ));
                    None
                }
            }
        }
    }

    fn infer_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, span: Span) -> Option<TypeRef> {
        let lt = self.infer(left, None);
        let rt = self.infer(right, None);
        let (lt, rt) = (lt?, rt?);
        match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                match (self.is_numeric(&lt), self.is_numeric(&rt)) {
                    (Some(a), Some(b)) => Some(TypeRef::simple(self.builtins.width_symbol(a.promote(b)))),
                    _ => {
                        self.mismatch(&lt, &rt, span);
                        None
                    }
                }
            }
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                let ok = match (self.is_numeric(&lt), self.is_numeric(&rt)) {
                    (Some(_), Some(_)) => true,
                    _ => lt.name == rt.name,
                };
                if !ok {
                    self.mismatch(&lt, &rt, span);
                }
                Some(TypeRef::simple(self.builtins.bool_))
            }
            BinaryOp::And | BinaryOp::Or => {
                if !self.is_bool(&lt) || !self.is_bool(&rt) {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticCode::TypeMismatch,
                        "logical operators require 'Bool' operands",
                        span,
                    ));
                }
                Some(TypeRef::simple(self.builtins.bool_))
            }
        }
    }

    fn mismatch(&mut self, lt: &TypeRef, rt: &TypeRef, span: Span) {
        self.diagnostics.push(Diagnostic::error(
            DiagnosticCode::TypeMismatch,
            format!("operand type '{}' does not match operand type '{}'", self.type_name(lt), self.type_name(rt)),
            span,
        ));
    }

    fn infer_call(&mut self, callee: &Expr, args: &[&Expr], expected: Option<&TypeRef>, span: Span) -> Option<TypeRef> {
        let (callee_name, is_path, path_segs): (Option<Symbol>, bool, Vec<Symbol>) = match &callee.kind {
            ExprKind::Ident(s) => (Some(*s), false, Vec::new()),
            ExprKind::Path(segs) => (None, true, segs.clone()),
            _ => (None, false, Vec::new()),
        };

        let (params_expected, return_ty, found): (Vec<Option<TypeRef>>, Option<TypeRef>, bool) = if is_path {
            if path_segs.len() != 2 || !self.registry.is_imported_module(path_segs[0]) {
                self.diagnostics.push(Diagnostic::error(DiagnosticCode::UndefinedModule, "unknown module in call", span));
                for a in args {
                    self.infer(a, None);
                }
                return None;
            }
            let module_path = self.registry.module_path_for_alias(path_segs[0])?.to_vec();
            let fn_name = self.interner.resolve(path_segs[1]).to_string();
            let path_refs: Vec<&str> = module_path.iter().map(String::as_str).collect();
            match stdlib().function_in(&path_refs, &fn_name).cloned() {
                Some(f) => {
                    let params: Vec<Option<TypeRef>> =
                        f.params.iter().map(|p| Some(TypeRef::simple(self.interner.intern(p)))).collect();
                    let ret = f.return_type.map(|r| TypeRef::simple(self.interner.intern(r)));
                    (params, ret, true)
                }
                None => {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticCode::UndefinedFunction,
                        format!("'{}' has no function '{}'", self.interner.resolve(path_segs[0]), fn_name),
                        span,
                    ));
                    (Vec::new(), None, false)
                }
            }
        } else if let Some(name) = callee_name {
            if let Some(decl) = self.functions.get(&name).copied() {
                self.effects.record_call(name);
                let params: Vec<Option<TypeRef>> = decl.params.iter().map(|p| self.resolve_type(&p.ty)).collect();
                let ret = match &decl.return_type {
                    Some(t) => self.resolve_type(t),
                    None => None,
                };
                (params, ret, true)
            } else if self.registry.is_imported_function(name) {
                let def = self.registry.get_function_definition(name).cloned().unwrap();
                let ret = self.resolve_imported_return(&def.module_path, &def.name);
                let path_refs: Vec<&str> = def.module_path.iter().map(String::as_str).collect();
                let params: Vec<Option<TypeRef>> = stdlib()
                    .function_in(&path_refs, &def.name)
                    .map(|f| f.params.iter().map(|p| Some(TypeRef::simple(self.interner.intern(p)))).collect())
                    .unwrap_or_default();
                (params, ret, true)
            } else {
                let text = self.interner.resolve(name).to_string();
                let mut candidates: Vec<&str> = self.functions.keys().map(|s| self.interner.resolve(*s)).collect();
                candidates.sort_unstable();
                let mut message = format!("undefined function '{}'", text);
                if text.len() >= 2 {
                    if let Some(s) = find_similar(&text, &candidates, 2) {
                        message.push_str(&format!(" (did you mean '{}'?)", s));
                    }
                }
                let mut diag = Diagnostic::error(DiagnosticCode::UndefinedFunction, message, span);
                if let Some(suggestion) = self.import_extension_suggestion(&text) {
                    diag = diag.with_suggestion(suggestion);
                }
                self.diagnostics.push(diag);
                (Vec::new(), None, false)
            }
        } else {
            (Vec::new(), None, false)
        };

        if found && params_expected.len() != args.len() {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticCode::TypeMismatch,
                format!("expected {} arguments, got {}", params_expected.len(), args.len()),
                span,
            ));
        }
        for (i, arg) in args.iter().enumerate() {
            let expect = params_expected.get(i).and_then(|t| t.as_ref());
            let actual = self.infer(arg, expect);
            if let (Some(a), Some(e)) = (actual.as_ref(), expect) {
                if !self.compatible(a, e) {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticCode::TypeMismatch,
                        format!("argument type '{}' does not match expected type '{}'", self.type_name(a), self.type_name(e)),
                        arg.span,
                    ));
                }
            }
        }

        if found && return_ty.is_none() {
            if expected.is_some() {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::VoidInExpression,
                    "function does not return a value",
                    span,
                ));
            }
        }
        return_ty
    }

    fn infer_field_access(
        &mut self,
        base: &Expr,
        field: Symbol,
        field_span: Span,
        full_span: Span,
        write_ctx: bool,
    ) -> Option<TypeRef> {
        let base_ty = self.infer(base, None)?;
        let struct_decl: &'a StructDecl<'a> = self.registry.get_user_type(base_ty.name)?;
        let field_decl = struct_decl.fields.iter().find(|f| f.name == field);
        let Some(field_decl) = field_decl else {
            let text = self.interner.resolve(field).to_string();
            let mut names: Vec<&str> =
                struct_decl.fields.iter().map(|f| self.interner.resolve(f.name)).collect();
            names.sort_unstable();
            self.diagnostics.push(Diagnostic::error(
                DiagnosticCode::GenericSemantic,
                format!("struct '{}' has no field '{}' (valid fields: {})", self.type_name(&base_ty), text, names.join(", ")),
                field_span,
            ));
            return None;
        };

        if self.storage_structs.contains(&base_ty.name) {
            let kind = if write_ctx { AccessKind::Write } else { AccessKind::Read };
            self.effects.record_access(base_ty.name, field, kind, full_span);
        }

        self.resolve_type(&field_decl.ty)
    }

    fn infer_index(&mut self, base: &Expr, index: &Expr, span: Span, write_ctx: bool) -> Option<TypeRef> {
        let base_ty = self.infer_inner(base, None, write_ctx)?;
        self.infer(index, None);
        let name = self.interner.resolve(base_ty.name).to_string();
        match name.as_str() {
            "Slots" | "Map" => base_ty.generic_args.get(1).cloned(),
            "Vector" => base_ty.generic_args.first().cloned(),
            _ => {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::TypeMismatch,
                    format!("type '{}' does not support indexing", self.type_name(&base_ty)),
                    span,
                ));
                None
            }
        }
    }

    fn infer_struct_literal(
        &mut self,
        path: &Expr,
        fields: &[(Symbol, Span, &Expr)],
        span: Span,
    ) -> Option<TypeRef> {
        let ExprKind::Ident(type_name) = path.kind else {
            self.diagnostics.push(Diagnostic::error(DiagnosticCode::GenericSemantic, "expected a struct name", span));
            return None;
        };
        let Some(decl) = self.registry.get_user_type(type_name) else {
            self.undefined_variable(type_name, path.span);
            return None;
        };

        let mut seen = HashSet::new();
        for (name, fspan, value) in fields {
            if !seen.insert(*name) {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::DuplicateField,
                    format!("duplicate field '{}'", self.interner.resolve(*name)),
                    *fspan,
                ));
                continue;
            }
            match decl.fields.iter().find(|f| f.name == *name) {
                Some(field_decl) => {
                    let expected = self.resolve_type(&field_decl.ty);
                    let actual = self.infer(value, expected.as_ref());
                    if let (Some(a), Some(e)) = (actual.as_ref(), expected.as_ref()) {
                        if !self.compatible(a, e) {
                            self.diagnostics.push(Diagnostic::error(
                                DiagnosticCode::TypeMismatch,
                                format!(
                                    "field '{}' has type '{}', found '{}'",
                                    self.interner.resolve(*name),
                                    self.type_name(e),
                                    self.type_name(a)
                                ),
                                value.span,
                            ));
                        }
                    }
                }
                None => {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticCode::GenericSemantic,
                        format!("struct '{}' has no field '{}'", self.interner.resolve(type_name), self.interner.resolve(*name)),
                        *fspan,
                    ));
                    self.infer(value, None);
                }
            }
        }
        for field_decl in &decl.fields {
            if !seen.contains(&field_decl.name) {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::MissingField,
                    format!("missing field '{}'", self.interner.resolve(field_decl.name)),
                    span,
                ));
            }
        }
        Some(TypeRef::simple(type_name))
    }

    fn infer_tuple(&mut self, elements: &[&Expr]) -> Option<TypeRef> {
        let mut args = Vec::with_capacity(elements.len());
        for el in elements {
            args.push(self.infer(el, None)?);
        }
        Some(TypeRef::generic(self.builtins.tuple, args))
    }

    /// Assignment target validation (§4.8): only `Ident`/`FieldAccess`/
    /// `Index` are valid l-values.
    pub fn analyze_assign_target(&mut self, target: &Expr) -> Option<TypeRef> {
        match &target.kind {
            ExprKind::Ident(_) | ExprKind::FieldAccess { .. } | ExprKind::Index { .. } => {
                self.infer_write_target(target)
            }
            _ => {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::InvalidAssignment,
                    "cannot assign to this expression",
                    target.span,
                ));
                None
            }
        }
    }
}
