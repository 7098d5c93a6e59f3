//! Phase 3: synthesizing a namespace object for a file that some importer
//! needs as a whole (`import * as x from "M"`, or any cross-bundle
//! consumer that cannot be rewritten to a direct per-property reference).
//!
//! Grounded on the teacher's object-literal construction in its codegen
//! layer (`Expr::Object` built directly from an arena rather than parsed):
//! `var __export_$_<file> = { k: v, ... }`, one property per
//! [`SelfExport`](crate::source_file::SelfExport) the file declares.

use crate::source_file::SelfExport;
use jsbundle_ast::{
    AstArena, DeclKind, Expr, Prop, PropKey, PropKind, PropValue, ScopeId, Stmt, Symbol, SymbolId,
    SymbolKind, VarDef,
};
use jsbundle_base::{Interner, Name};
use jsbundle_scope::SymbolTable;

/// Builds `var <binding_name> = { ... }` declaring the namespace object for
/// a file's exports, and returns the statement plus the freshly minted
/// [`SymbolId`] bound to it (so later phases can build an `Ident`
/// referencing it by `thedef`, the same way every other occurrence in this
/// codebase resolves).
///
/// A [`SelfExport::Binding`] becomes `k: <direct symbol reference>`; a
/// [`SelfExport::Literal`] becomes `k: <the literal expression, as-is>`; a
/// [`SelfExport::ReexportAll`] is the caller's responsibility to flatten
/// before calling this (by the time whole-export synthesis runs, a
/// re-export should already have been resolved against its target file's
/// own export map).
pub fn synthesize_whole_export<'a>(
    binding_name: Name,
    exports: &[SelfExport<'a>],
    root_scope: ScopeId,
    table: &mut SymbolTable,
    arena: &'a AstArena<'a>,
) -> (Stmt<'a>, SymbolId) {
    let binding_id = table.declare_or_reuse(root_scope, binding_name, SymbolKind::Var);
    let props: Vec<Prop<'a>> = exports
        .iter()
        .filter_map(|export| match export {
            SelfExport::Binding { exported_as, symbol_id } => {
                let sym = Symbol::new(*exported_as, SymbolKind::Var);
                sym.thedef.set(Some(*symbol_id));
                Some(Prop {
                    key: PropKey::Ident(*exported_as),
                    value: PropValue::Expr(Expr::Ident(sym)),
                    kind: PropKind::Init,
                    computed: false,
                    shorthand: false,
                })
            }
            SelfExport::Literal { exported_as, value } => Some(Prop {
                key: PropKey::Ident(*exported_as),
                value: PropValue::Expr(clone_literal(value)),
                kind: PropKind::Init,
                computed: false,
                shorthand: false,
            }),
            SelfExport::ReexportAll { .. } => None,
        })
        .collect();

    let object = arena.alloc_expr(Expr::Object(arena.alloc_slice_props(props)));
    let binding_sym = Symbol::new(binding_name, SymbolKind::Var);
    binding_sym.thedef.set(Some(binding_id));
    let decl = Stmt::VarDecl {
        kind: DeclKind::Var,
        decls: arena.alloc_var_defs(vec![VarDef { name: jsbundle_ast::Pattern::Ident(binding_sym), init: Some(object) }]),
    };
    (decl, binding_id)
}

/// Copies a literal export's initializing expression by value (the
/// original still lives in the owning file's own arena-allocated tree;
/// this inlines a fresh occurrence into the synthesized object, preserving
/// any `Ident` occurrence's resolution exactly as [`crate::descend`] does
/// for sibling list elements).
fn clone_literal<'a>(expr: &Expr<'a>) -> Expr<'a> {
    match expr {
        Expr::Ident(sym) => {
            let fresh = Symbol::new(sym.name, sym.kind);
            fresh.thedef.set(sym.thedef.get());
            Expr::Ident(fresh)
        }
        other => jsbundle_ast::transform::clone_expr_ptr(other),
    }
}

/// The standard namespace-binding name for a resolved file path, e.g.
/// `a/b.js` -> `__export_$_a_b_js`, interned into `interner`.
pub fn whole_export_binding_name(resolved_file: &str, interner: &mut Interner) -> Name {
    let mangled: String = resolved_file
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    interner.intern(&format!("__export_$_{mangled}"))
}
