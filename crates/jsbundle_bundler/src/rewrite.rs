//! Phase 4: rewriting a file's require/import sites against the merge
//! plan Phases 1-3 computed.
//!
//! Grounded on the same `Transformer` shape `rename.rs` uses, with
//! [`crate::descend::transform_expr_full`] as the fallback so a `require`
//! buried inside a `Call`/`Dot`/`Object` is still reached. Five rewrite
//! rules, applied in this order of preference at each site:
//!
//! 1. `var x = require("M")` where `x` needs the whole namespace -> `var x
//!    = <M's whole-export identifier>`.
//! 2. `var x = require("M")` where every use of `x` was a `x.prop` access
//!    -> the declaration is dropped; nothing references `x` anymore.
//! 3. `x.prop` where `prop` resolves to a plain binding in `M` -> a direct
//!    reference to that binding, skipping `x` and the namespace object
//!    entirely.
//! 4. A bare occurrence of `x` that needs the whole namespace -> a direct
//!    reference to `M`'s whole-export identifier.
//! 5. `import("M")` -> `__import(splitShortName, propName)`, where
//!    `splitShortName` is `undefined` when `M` lives in the main split
//!    (already eagerly loaded, nothing to fetch), preceded by one
//!    `.then(function(){ return __import(forcedSplit, undefined) })` per
//!    entry in `M`'s split's `ExpandedSplitsForcedLazy`, so every split a
//!    main-split consumer must load first is fetched before the target.

use crate::descend::transform_expr_full;
use crate::source_file::SelfExport;
use crate::split::MAIN_SPLIT;
use jsbundle_ast::{
    AstArena, Expr, FunctionBody, FunctionNode, Pattern, ScopeId, Stmt, Symbol, SymbolId,
    SymbolKind, Transformer, TransformResult, VarDef,
};
use jsbundle_base::{Interner, Name};
use jsbundle_scope::{ScopeKind, SymbolTable};
use std::collections::HashMap;

/// What a `require`-resolved module looks like to the rewrite pass: its
/// flattened export map, the `(Name, SymbolId)` of its synthesized whole-
/// export object (if one was synthesized for it in phase 3) — the `Name`
/// is the canonical identifier text that object's own declaration prints
/// under, needed because a reference built here lives in a *different*
/// file's tree than the one that declared it — and the split it was
/// assigned to for a lazy `import()`.
pub struct ModuleExports<'a, 'b> {
    pub exports: &'b HashMap<Name, SelfExport<'a>>,
    pub whole_export: Option<(Name, SymbolId)>,
    pub split: Option<&'b str>,
    /// The property name `M`'s owning split registers for it, asked for via
    /// `__import(split, prop)` — `None` for a module no `import()` ever
    /// targets.
    pub prop: Option<&'b str>,
    /// `M`'s split's own `ExpandedSplitsForcedLazy`: other splits a
    /// main-split consumer must load before `M`'s own `__import` call
    /// resolves, in load order.
    pub forced_lazy: &'b [String],
}

/// What a local require/import binding stands for: the module it resolves
/// to, and, for a named or default ESM import, which of that module's
/// exports it stands directly for (as opposed to a `var x = require("M")`
/// binding, which only becomes a property access once a later `x.prop`
/// site pins down which property — tracked separately in `exports`).
pub struct BindingRef {
    pub module: String,
    pub imported_name: Option<Name>,
}

pub struct BundlerTreeTransformer<'a, 'b> {
    arena: &'a AstArena<'a>,
    /// `local SymbolId -> what it stands for`, for every require/import
    /// binding this file declared (phase 1's `RequireBinding`s).
    bindings: &'b HashMap<SymbolId, BindingRef>,
    modules: &'b HashMap<String, ModuleExports<'a, 'b>>,
    /// Interned name of the host-provided lazy-chunk loader, called as
    /// `__import(split, prop)` and returning a `Promise` of the named
    /// export.
    import_fn: Name,
    /// Interned name of `then`, used to build the `.then(...)` call a
    /// dynamic `import()` rewrite wraps its loader call in.
    then_name: Name,
    /// The current file's per-file interner, used only to confirm a free
    /// call's callee reads "require" (the same check discovery's `Scanner`
    /// made; `thedef` alone can't distinguish `require(...)` from any other
    /// unresolved global call).
    interner: &'b Interner,
    table: &'b mut SymbolTable,
    root_scope: ScopeId,
}

impl<'a, 'b> BundlerTreeTransformer<'a, 'b> {
    pub fn new(
        arena: &'a AstArena<'a>,
        bindings: &'b HashMap<SymbolId, BindingRef>,
        modules: &'b HashMap<String, ModuleExports<'a, 'b>>,
        import_fn: Name,
        then_name: Name,
        interner: &'b Interner,
        table: &'b mut SymbolTable,
        root_scope: ScopeId,
    ) -> Self {
        Self { arena, bindings, modules, import_fn, then_name, interner, table, root_scope }
    }

    fn is_require_callee(&self, callee: &Expr<'_>) -> bool {
        matches!(callee, Expr::Ident(sym) if sym.thedef.get().is_none() && self.interner.resolve(sym.name) == "require")
    }

    /// Rewrites every require/import site in `stmts`, consuming `self`
    /// (a fresh transformer is built per file being rewritten).
    pub fn rewrite(mut self, stmts: &'a [Stmt<'a>]) -> &'a [Stmt<'a>] {
        self.transform_block(stmts)
    }

    fn binding_of(&self, def: SymbolId) -> Option<&BindingRef> {
        self.bindings.get(&def)
    }

    fn module_of(&self, def: SymbolId) -> Option<&ModuleExports<'a, 'b>> {
        self.modules.get(&self.bindings.get(&def)?.module)
    }

    /// `M`'s export named `prop`, as a standalone reference — a direct
    /// binding becomes a direct `Ident`, a literal is inlined, an
    /// unresolved `ReexportAll` falls back to `<M's whole export>.prop`,
    /// and a genuinely absent property (e.g. a TypeScript-only interface
    /// member) becomes `undefined`.
    fn resolve_export(&self, module: &ModuleExports<'a, 'b>, prop: Name) -> Option<&'a Expr<'a>> {
        match module.exports.get(&prop) {
            Some(SelfExport::Binding { symbol_id, .. }) => Some(self.ident_of(*symbol_id, prop)),
            Some(SelfExport::Literal { value, .. }) => Some(clone_into(value)),
            Some(SelfExport::ReexportAll { .. }) => match module.whole_export {
                Some((whole_name, whole_id)) => {
                    Some(self.arena.alloc_expr(Expr::Dot { expr: self.ident_of(whole_id, whole_name), name: prop }))
                }
                None => Some(self.arena.alloc_expr(Expr::Undefined)),
            },
            None => Some(self.arena.alloc_expr(Expr::Undefined)),
        }
    }

    fn ident_of(&self, id: SymbolId, name: Name) -> &'a Expr<'a> {
        let sym = Symbol::new(name, SymbolKind::Var);
        sym.thedef.set(Some(id));
        self.arena.alloc_expr(Expr::Ident(sym))
    }

    /// A reference to the host's free global helper — never resolved
    /// through `thedef`, the same way a genuinely free identifier is left
    /// unresolved by the scope analyzer.
    fn ident_of_free(&self, name: Name) -> &'a Expr<'a> {
        self.arena.alloc_expr(Expr::Ident(Symbol::new(name, SymbolKind::Var)))
    }

    /// Rule 4 (and the named/default-import equivalent): a bare occurrence
    /// of a require/import-bound identifier becomes either a direct
    /// reference to the specific export it stands for (named/default
    /// import) or a reference to `M`'s whole-export object (namespace
    /// import / CommonJS binding that needs the whole namespace).
    fn rewrite_bare_ident(&self, sym: &Symbol) -> Option<&'a Expr<'a>> {
        let def = sym.thedef.get()?;
        let binding = self.binding_of(def)?;
        let module = self.modules.get(&binding.module)?;
        match binding.imported_name {
            Some(prop) => self.resolve_export(module, prop),
            None => {
                let (whole_name, whole_id) = module.whole_export?;
                Some(self.ident_of(whole_id, whole_name))
            }
        }
    }

    /// Rule 3: `base.prop` where `base` is a tracked CommonJS require
    /// binding (never a named/default import — those are already direct
    /// references and never appear as the base of a `.prop` access).
    fn rewrite_dot(&self, base: &Expr<'a>, prop: Name) -> Option<&'a Expr<'a>> {
        let Expr::Ident(sym) = base else { return None };
        let def = sym.thedef.get()?;
        let module = self.module_of(def)?;
        self.resolve_export(module, prop)
    }

    /// Rule 5: `import("M")` -> `__import(splitShortName, propName)`, built
    /// up one forced split at a time so each of `M`'s split's
    /// `forced_lazy` entries loads, in order, before `M`'s own `__import`
    /// call is reached: `__import(forced1, undefined).then(function(){
    /// return __import(forced2, undefined) }).then(function(){ return
    /// __import(splitShortName, propName) })`.
    fn rewrite_dynamic_import(&mut self, module_spec: &str) -> Option<&'a Expr<'a>> {
        let module = self.modules.get(module_spec)?;
        let final_call = {
            let split_arg = self.split_name_arg(module.split);
            let prop_arg = self.prop_arg(module.prop);
            self.import_call(split_arg, prop_arg)
        };

        let mut forced_calls: Vec<&'a Expr<'a>> = module
            .forced_lazy
            .iter()
            .map(|forced_split| {
                let split_arg = self.split_name_arg(Some(forced_split.as_str()));
                let prop_arg = self.undefined_expr();
                self.import_call(split_arg, prop_arg)
            })
            .collect();
        forced_calls.push(final_call);

        let mut calls = forced_calls.into_iter();
        let mut chain = calls.next().expect("final_call always present");
        for next in calls {
            chain = self.then_returning(chain, next);
        }
        Some(chain)
    }

    fn undefined_expr(&self) -> &'a Expr<'a> {
        self.arena.alloc_expr(Expr::Undefined)
    }

    /// The `__import` call's split argument: `undefined` for the main
    /// split (already eagerly loaded, nothing to fetch) or for a module
    /// `assign_splits` never assigned an owner, a string literal otherwise.
    fn split_name_arg(&self, split: Option<&str>) -> &'a Expr<'a> {
        match split {
            Some(name) if name != MAIN_SPLIT => self.arena.alloc_expr(Expr::Str(self.arena.alloc_str(name.to_string()))),
            _ => self.undefined_expr(),
        }
    }

    fn prop_arg(&self, prop: Option<&str>) -> &'a Expr<'a> {
        match prop {
            Some(name) => self.arena.alloc_expr(Expr::Str(self.arena.alloc_str(name.to_string()))),
            None => self.undefined_expr(),
        }
    }

    fn import_call(&self, split_arg: &'a Expr<'a>, prop_arg: &'a Expr<'a>) -> &'a Expr<'a> {
        self.arena.alloc_expr(Expr::Call {
            callee: self.ident_of_free(self.import_fn),
            args: self.arena.alloc_exprs(vec![clone_into(split_arg), clone_into(prop_arg)]),
        })
    }

    /// `chain.then(function(){ return <next> })`. The trampoline's body
    /// references no binding from the enclosing scope, so unlike
    /// [`Self::import_call`]'s callers it needs no parameters — still
    /// minted its own function scope, the same way [`crate::whole_export`]
    /// mints a scope for a synthesized variable with no counterpart in the
    /// original file's analysis.
    fn then_returning(&mut self, chain: &'a Expr<'a>, next: &'a Expr<'a>) -> &'a Expr<'a> {
        let fn_scope = self.table.push_scope(ScopeKind::Function, Some(self.root_scope));
        let ret = self.arena.alloc_stmt(Stmt::Return { arg: Some(next) });
        let thunk = self.arena.alloc_expr(Expr::Function(self.arena.alloc_function(FunctionNode {
            name: None,
            params: self.arena.alloc_patterns(Vec::new()),
            body: FunctionBody::Block(self.arena.alloc_stmts(vec![ret])),
            is_async: false,
            is_generator: false,
            is_arrow: false,
            scope: fn_scope,
        })));
        let then_dot = self.arena.alloc_expr(Expr::Dot { expr: chain, name: self.then_name });
        self.arena.alloc_expr(Expr::Call { callee: then_dot, args: self.arena.alloc_exprs(vec![clone_into(thunk)]) })
    }

    fn transform_expr_or_keep(&mut self, expr: &'a Expr<'a>) -> &'a Expr<'a> {
        match self.transform_expr(expr) {
            TransformResult::Keep => expr,
            TransformResult::Replace(e) => e,
            TransformResult::Remove => expr,
        }
    }
}

/// Copies an already-arena-allocated expression by value into a fresh slot,
/// preserving an `Ident`'s resolution — the same shape as
/// [`crate::descend`]'s list-rebuild clone, needed here because a rewrite
/// builds new parents (`Dot`, `Call` args) around a reference it didn't
/// just transform itself.
fn clone_into<'a>(expr: &Expr<'a>) -> Expr<'a> {
    if let Expr::Ident(sym) = expr {
        let fresh = Symbol::new(sym.name, sym.kind);
        fresh.thedef.set(sym.thedef.get());
        return Expr::Ident(fresh);
    }
    jsbundle_ast::transform::clone_expr_ptr(expr)
}

impl<'a, 'b> Transformer<'a> for BundlerTreeTransformer<'a, 'b> {
    fn arena(&self) -> &'a AstArena<'a> {
        self.arena
    }

    fn transform_expr(&mut self, expr: &'a Expr<'a>) -> TransformResult<&'a Expr<'a>> {
        match expr {
            Expr::Ident(sym) => {
                if let Some(rewritten) = self.rewrite_bare_ident(sym) {
                    return TransformResult::Replace(rewritten);
                }
                transform_expr_full(self, expr)
            }
            Expr::Dot { expr: base, name } => {
                if let Some(rewritten) = self.rewrite_dot(base, *name) {
                    return TransformResult::Replace(rewritten);
                }
                transform_expr_full(self, expr)
            }
            Expr::ImportExpression { module } => {
                if let Expr::Str(spec) = module {
                    if let Some(rewritten) = self.rewrite_dynamic_import(spec) {
                        return TransformResult::Replace(rewritten);
                    }
                }
                transform_expr_full(self, expr)
            }
            _ => transform_expr_full(self, expr),
        }
    }

    fn transform_stmt(&mut self, stmt: &'a Stmt<'a>) -> TransformResult<&'a Stmt<'a>> {
        let arena = self.arena;
        match stmt {
            Stmt::VarDecl { kind, decls } => {
                let mut new_decls = Vec::with_capacity(decls.len());
                for d in decls.iter() {
                    if let (Pattern::Ident(local), Some(Expr::Call { callee, args })) = (&d.name, d.init) {
                        if self.is_require_callee(callee) {
                            if let [Expr::Str(_)] = args {
                                if let Some(def) = local.thedef.get() {
                                    if let Some(module) = self.module_of(def) {
                                        match module.whole_export {
                                            Some((whole_name, whole_id)) => {
                                                let init = self.ident_of(whole_id, whole_name);
                                                new_decls.push(VarDef { name: Pattern::Ident(Symbol::new(local.name, local.kind)), init: Some(init) });
                                            }
                                            None => { /* rule 2: every use was rewritten to a direct reference; drop the declaration */ }
                                        }
                                        continue;
                                    }
                                }
                            }
                        }
                    }
                    let init = d.init.map(|i| self.transform_expr_or_keep(i));
                    new_decls.push(VarDef { name: clone_pattern(&d.name), init });
                }
                if new_decls.is_empty() {
                    TransformResult::Remove
                } else {
                    TransformResult::Replace(arena.alloc_stmt(Stmt::VarDecl { kind: *kind, decls: arena.alloc_var_defs(new_decls) }))
                }
            }
            Stmt::Simple(Expr::Call { callee, args }) if self.is_require_callee(callee) && matches!(args, [Expr::Str(_)]) => {
                // A bare `require("M");` statement, evaluated only for
                // side effects — `M`'s own statements already run inline
                // at its position in the merged bundle.
                TransformResult::Remove
            }
            Stmt::Import(_) => {
                // Every binding an `import` declares was already recorded
                // as a `RequireBinding` during discovery and is rewritten
                // wherever it's used (rules 3/4); the declaration itself
                // has nothing left to do at its own position.
                TransformResult::Remove
            }
            Stmt::Export(node) => rewrite_export_decl(self, node, arena),
            other => transform_expr_full_stmt(self, other),
        }
    }
}

/// `export`'s own wrapper carries no runtime meaning once every binding it
/// introduces has been captured in `self_exports` (phase 1): a declaring
/// form (`export function f(){}`, `export default class C {}`, ...) keeps
/// its inner declaration — re-dispatched through `transform_stmt` so a
/// `require(...)` inside it still gets rewritten — while a pure re-export
/// form (`export {a}`, `export * from "M"`) has nothing left to emit.
fn rewrite_export_decl<'a, 'b>(
    t: &mut BundlerTreeTransformer<'a, 'b>,
    node: &jsbundle_ast::ExportNode<'a>,
    arena: &'a AstArena<'a>,
) -> TransformResult<&'a Stmt<'a>> {
    use jsbundle_ast::{DefaultExport, ExportNode, ExportedDecl};
    let inner = match node {
        ExportNode::Declaration(ExportedDecl::Function(f)) => Stmt::FunctionDecl(*f),
        ExportNode::Declaration(ExportedDecl::Class(c)) => Stmt::ClassDecl(*c),
        ExportNode::Declaration(ExportedDecl::Var { kind, decls }) => Stmt::VarDecl { kind: *kind, decls: *decls },
        ExportNode::Default(DefaultExport::Function(f)) => Stmt::FunctionDecl(*f),
        ExportNode::Default(DefaultExport::Class(c)) => Stmt::ClassDecl(*c),
        ExportNode::Default(DefaultExport::Expr(_))
        | ExportNode::Named { .. }
        | ExportNode::NamedFrom { .. }
        | ExportNode::All { .. }
        | ExportNode::AllAs { .. } => return TransformResult::Remove,
    };
    let rebuilt = arena.alloc_stmt(inner);
    match t.transform_stmt(rebuilt) {
        TransformResult::Keep => TransformResult::Replace(rebuilt),
        other => other,
    }
}

fn clone_pattern<'a>(pattern: &Pattern<'a>) -> Pattern<'a> {
    jsbundle_ast::transform::clone_pattern_shallow(pattern)
}

/// [`crate::descend::transform_expr_full`] only covers expressions; this
/// thin wrapper falls through to [`jsbundle_ast::transform::transform_stmt_children`]
/// for every statement kind `transform_stmt` doesn't special-case above.
fn transform_expr_full_stmt<'a, T: Transformer<'a> + ?Sized>(
    t: &mut T,
    stmt: &'a Stmt<'a>,
) -> TransformResult<&'a Stmt<'a>> {
    jsbundle_ast::transform::transform_stmt_children(t, stmt)
}
