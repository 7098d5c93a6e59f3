//! Phase 5: moving a file's entire tree from its own parser-minted
//! [`Interner`] into one `Bundler`-owned shared interner.
//!
//! `jsbundle_parser::parse` hands every file a fresh `Interner`, and
//! `Name` is meaningless outside the interner that produced it
//! (`Interner::resolve` panics otherwise) — so a cross-file reference built
//! during [`crate::whole_export`]/[`crate::rewrite`] (the requiring file's
//! tree carrying an identifier that must print under the exporting file's
//! own canonical text) only makes sense once every file agrees on one
//! `Name` namespace. `Symbol.name` is a plain field, not a `Cell`, so unlike
//! `thedef` it cannot be patched in place; this walks the whole tree the
//! same way [`crate::rename`] does and rebuilds every `Symbol` with a `Name`
//! re-interned into the shared table. `SymbolId`/`ScopeId` are untouched:
//! they stay file-local handles into that file's own `SymbolTable` and are
//! never compared across files.
use crate::descend::transform_expr_full;
use crate::source_file::SelfExport;
use jsbundle_ast::{
    AstArena, CatchClause, ClassMember, ClassNode, Expr, ForTarget, FunctionNode, ImportNode,
    NameMapping, Pattern, Stmt, Symbol, Transformer, TransformResult, VarDef,
};
use jsbundle_base::{Interner, Name};
use std::collections::HashMap;

/// Re-interns every `Symbol.name` (and free-standing `Name`, e.g. an
/// `ExportNode::AllAs` namespace alias) in `stmts` from `old` into `shared`,
/// returning the rebuilt tree. A `Name` already seen in this file is
/// resolved at most once and then cached, since the same identifier text
/// commonly recurs across many occurrences of the same binding.
pub fn reintern_tree<'a>(
    stmts: &'a [Stmt<'a>],
    arena: &'a AstArena<'a>,
    old: &Interner,
    shared: &mut Interner,
) -> &'a [Stmt<'a>] {
    let mut pass = Reinterner { arena, old, shared, cache: HashMap::new() };
    pass.transform_block(stmts)
}

/// Re-interns a single `Name` (e.g. a `SelfExport::Binding`'s `exported_as`,
/// held in a side `Vec` the tree walk above never reaches) using the same
/// cache a concurrent [`reintern_tree`] call on the owning file's statements
/// would populate. Call this once per file, against a dedicated cache, right
/// after `reintern_tree` — see [`reintern_self_exports`].
pub fn reintern_name(name: Name, old: &Interner, shared: &mut Interner, cache: &mut HashMap<Name, Name>) -> Name {
    *cache.entry(name).or_insert_with(|| shared.intern(old.resolve(name)))
}

/// Re-interns every [`SelfExport::Binding`]/[`SelfExport::Literal`]'s
/// `exported_as` in place, reusing `cache` so names shared with the file's
/// own tree collapse to the same shared `Name`.
pub fn reintern_self_exports<'a>(
    exports: &[SelfExport<'a>],
    old: &Interner,
    shared: &mut Interner,
    cache: &mut HashMap<Name, Name>,
) -> Vec<SelfExport<'a>> {
    exports
        .iter()
        .map(|export| match export {
            SelfExport::Binding { exported_as, symbol_id } => {
                SelfExport::Binding { exported_as: reintern_name(*exported_as, old, shared, cache), symbol_id: *symbol_id }
            }
            SelfExport::Literal { exported_as, value } => {
                SelfExport::Literal { exported_as: reintern_name(*exported_as, old, shared, cache), value }
            }
            SelfExport::ReexportAll { from } => SelfExport::ReexportAll { from: from.clone() },
        })
        .collect()
}

/// Same shallow resolved-clone `descend::clone_expr_resolved` performs,
/// needed again here since this module rebuilds an `Object` literal's prop
/// list itself (to reintern `PropKey::Ident` text) instead of delegating to
/// `transform_expr_full`.
fn clone_expr_resolved<'a>(expr: &'a Expr<'a>) -> Expr<'a> {
    if let Expr::Ident(sym) = expr {
        let fresh = Symbol::new(sym.name, sym.kind);
        fresh.thedef.set(sym.thedef.get());
        return Expr::Ident(fresh);
    }
    jsbundle_ast::transform::clone_expr_ptr(expr)
}

struct Reinterner<'a, 'b> {
    arena: &'a AstArena<'a>,
    old: &'b Interner,
    shared: &'b mut Interner,
    cache: HashMap<Name, Name>,
}

impl<'a, 'b> Reinterner<'a, 'b> {
    fn name(&mut self, name: Name) -> Name {
        reintern_name(name, self.old, self.shared, &mut self.cache)
    }

    fn sym(&mut self, sym: &Symbol) -> Symbol {
        let fresh = Symbol::new(self.name(sym.name), sym.kind);
        fresh.thedef.set(sym.thedef.get());
        fresh
    }

    fn pattern(&mut self, pattern: &Pattern<'a>) -> Pattern<'a> {
        match pattern {
            Pattern::Ident(s) => Pattern::Ident(self.sym(s)),
            Pattern::Object(props) => {
                let new: Vec<_> = props
                    .iter()
                    .map(|p| {
                        let key = match &p.key {
                            jsbundle_ast::PropKey::Ident(n) => jsbundle_ast::PropKey::Ident(self.name(*n)),
                            jsbundle_ast::PropKey::Computed(e) => jsbundle_ast::PropKey::Computed(self.transform_expr_or_keep(e)),
                            other => *other,
                        };
                        jsbundle_ast::ObjectPatternProp {
                            key,
                            value: self.pattern(&p.value),
                            computed: p.computed,
                            shorthand: p.shorthand,
                        }
                    })
                    .collect();
                Pattern::Object(self.arena.alloc_slice_props_pattern(new))
            }
            Pattern::Array(elements) => {
                let new: Vec<_> = elements.iter().map(|el| el.as_ref().map(|p| self.pattern(p))).collect();
                Pattern::Array(self.arena.alloc_slice_opt_patterns(new))
            }
            Pattern::Assign { left, right } => {
                let left = self.arena.alloc_pattern(self.pattern(left));
                Pattern::Assign { left, right }
            }
            Pattern::Rest(inner) => {
                let renamed = self.arena.alloc_pattern(self.pattern(inner));
                Pattern::Rest(renamed)
            }
        }
    }

    fn for_target(&mut self, target: &ForTarget<'a>) -> ForTarget<'a> {
        match target {
            ForTarget::VarDecl { kind, pattern } => ForTarget::VarDecl { kind: *kind, pattern: self.pattern(pattern) },
            ForTarget::Pattern(p) => ForTarget::Pattern(self.pattern(p)),
        }
    }

    fn function(&mut self, func: &FunctionNode<'a>) -> FunctionNode<'a> {
        let name = func.name.as_ref().map(|n| self.sym(n));
        let params: Vec<_> = func.params.iter().map(|p| self.pattern(p)).collect();
        let body = match &func.body {
            jsbundle_ast::FunctionBody::Block(stmts) => jsbundle_ast::FunctionBody::Block(self.transform_block(stmts)),
            jsbundle_ast::FunctionBody::Expr(e) => jsbundle_ast::FunctionBody::Expr(self.transform_expr_or_keep(e)),
        };
        FunctionNode {
            name,
            params: self.arena.alloc_patterns(params),
            body,
            is_async: func.is_async,
            is_generator: func.is_generator,
            is_arrow: func.is_arrow,
            scope: func.scope,
        }
    }

    fn class(&mut self, class: &ClassNode<'a>) -> ClassNode<'a> {
        let name = class.name.as_ref().map(|n| self.sym(n));
        let superclass = class.superclass.map(|s| self.transform_expr_or_keep(s));
        let members: Vec<ClassMember<'a>> = class
            .body
            .iter()
            .map(|m| {
                let key = match &m.key {
                    jsbundle_ast::PropKey::Ident(n) => jsbundle_ast::PropKey::Ident(self.name(*n)),
                    jsbundle_ast::PropKey::Computed(e) => jsbundle_ast::PropKey::Computed(self.transform_expr_or_keep(e)),
                    other => *other,
                };
                ClassMember { key, kind: m.kind, is_static: m.is_static, value: self.arena.alloc_function(self.function(m.value)) }
            })
            .collect();
        ClassNode { name, superclass, body: self.arena.alloc_slice_class_members(members), scope: class.scope }
    }

    fn name_mapping(&mut self, m: &NameMapping) -> NameMapping {
        NameMapping { foreign_name: self.name(m.foreign_name), local: self.sym(&m.local) }
    }

    fn import_node(&mut self, node: &ImportNode<'a>) -> ImportNode<'a> {
        match node {
            ImportNode::Default { local, module } => ImportNode::Default { local: self.sym(local), module: *module },
            ImportNode::Namespace { local, module } => ImportNode::Namespace { local: self.sym(local), module: *module },
            ImportNode::Named { specifiers, module } => {
                let new: Vec<_> = specifiers.iter().map(|s| self.name_mapping(s)).collect();
                ImportNode::Named { specifiers: self.arena.alloc_name_mappings(new), module: *module }
            }
            ImportNode::Bare { module } => ImportNode::Bare { module: *module },
        }
    }

    fn export_node(&mut self, node: &jsbundle_ast::ExportNode<'a>) -> jsbundle_ast::ExportNode<'a> {
        use jsbundle_ast::{DefaultExport, ExportNode, ExportedDecl};
        match node {
            ExportNode::Named { specifiers } => {
                let new: Vec<_> = specifiers.iter().map(|s| self.name_mapping(s)).collect();
                ExportNode::Named { specifiers: self.arena.alloc_name_mappings(new) }
            }
            ExportNode::NamedFrom { specifiers, module } => {
                let new: Vec<_> = specifiers.iter().map(|s| self.name_mapping(s)).collect();
                ExportNode::NamedFrom { specifiers: self.arena.alloc_name_mappings(new), module: *module }
            }
            ExportNode::All { module } => ExportNode::All { module: *module },
            ExportNode::AllAs { local, module } => ExportNode::AllAs { local: self.name(*local), module: *module },
            ExportNode::Default(DefaultExport::Function(f)) => {
                ExportNode::Default(DefaultExport::Function(self.arena.alloc_function(self.function(f))))
            }
            ExportNode::Default(DefaultExport::Class(c)) => {
                ExportNode::Default(DefaultExport::Class(self.arena.alloc_class(self.class(c))))
            }
            ExportNode::Default(DefaultExport::Expr(e)) => {
                ExportNode::Default(DefaultExport::Expr(self.transform_expr_or_keep(e)))
            }
            ExportNode::Declaration(ExportedDecl::Function(f)) => {
                ExportNode::Declaration(ExportedDecl::Function(self.arena.alloc_function(self.function(f))))
            }
            ExportNode::Declaration(ExportedDecl::Class(c)) => {
                ExportNode::Declaration(ExportedDecl::Class(self.arena.alloc_class(self.class(c))))
            }
            ExportNode::Declaration(ExportedDecl::Var { kind, decls }) => {
                let new: Vec<_> = decls
                    .iter()
                    .map(|d| VarDef { name: self.pattern(&d.name), init: d.init.map(|i| self.transform_expr_or_keep(i)) })
                    .collect();
                ExportNode::Declaration(ExportedDecl::Var { kind: *kind, decls: self.arena.alloc_var_defs(new) })
            }
        }
    }
}

impl<'a, 'b> Transformer<'a> for Reinterner<'a, 'b> {
    fn arena(&self) -> &'a AstArena<'a> {
        self.arena
    }

    fn transform_expr(&mut self, expr: &'a Expr<'a>) -> TransformResult<&'a Expr<'a>> {
        match expr {
            Expr::Ident(s) => TransformResult::Replace(self.arena.alloc_expr(Expr::Ident(self.sym(s)))),
            Expr::Dot { expr: base, name } => {
                let base = self.transform_expr_or_keep(base);
                let name = self.name(*name);
                TransformResult::Replace(self.arena.alloc_expr(Expr::Dot { expr: base, name }))
            }
            Expr::Object(props) => {
                let new: Vec<jsbundle_ast::Prop<'a>> = props
                    .iter()
                    .map(|p| {
                        let key = match &p.key {
                            jsbundle_ast::PropKey::Ident(n) => jsbundle_ast::PropKey::Ident(self.name(*n)),
                            jsbundle_ast::PropKey::Computed(e) => jsbundle_ast::PropKey::Computed(self.transform_expr_or_keep(e)),
                            other => *other,
                        };
                        let value = match &p.value {
                            jsbundle_ast::PropValue::Expr(e) => jsbundle_ast::PropValue::Expr(clone_expr_resolved(self.transform_expr_or_keep(e))),
                            jsbundle_ast::PropValue::Spread(e) => jsbundle_ast::PropValue::Spread(clone_expr_resolved(self.transform_expr_or_keep(e))),
                            jsbundle_ast::PropValue::Method(f) => jsbundle_ast::PropValue::Method(self.arena.alloc_function(self.function(f))),
                        };
                        jsbundle_ast::Prop { key, value, kind: p.kind, computed: p.computed, shorthand: p.shorthand }
                    })
                    .collect();
                TransformResult::Replace(self.arena.alloc_expr(Expr::Object(self.arena.alloc_slice_props(new))))
            }
            _ => transform_expr_full(self, expr),
        }
    }

    fn transform_stmt(&mut self, stmt: &'a Stmt<'a>) -> TransformResult<&'a Stmt<'a>> {
        let arena = self.arena;
        match stmt {
            Stmt::VarDecl { kind, decls } => {
                let new: Vec<_> = decls
                    .iter()
                    .map(|d| VarDef { name: self.pattern(&d.name), init: d.init.map(|i| self.transform_expr_or_keep(i)) })
                    .collect();
                TransformResult::Replace(arena.alloc_stmt(Stmt::VarDecl { kind: *kind, decls: arena.alloc_var_defs(new) }))
            }
            Stmt::ForIn { target, object, body } => {
                let target = self.for_target(target);
                let object = self.transform_expr_or_keep(object);
                let body = self.transform_stmt_or_keep(body);
                TransformResult::Replace(arena.alloc_stmt(Stmt::ForIn { target, object, body }))
            }
            Stmt::ForOf { target, object, body, is_await } => {
                let target = self.for_target(target);
                let object = self.transform_expr_or_keep(object);
                let body = self.transform_stmt_or_keep(body);
                TransformResult::Replace(arena.alloc_stmt(Stmt::ForOf { target, object, body, is_await: *is_await }))
            }
            Stmt::Try { block, handler, finalizer } => {
                let block = self.transform_block(block);
                let handler = handler.as_ref().map(|h| CatchClause {
                    param: h.param.as_ref().map(|p| self.pattern(p)),
                    body: self.transform_block(h.body),
                    scope: h.scope,
                });
                let finalizer = finalizer.map(|f| self.transform_block(f));
                TransformResult::Replace(arena.alloc_stmt(Stmt::Try { block, handler, finalizer }))
            }
            Stmt::FunctionDecl(func) => {
                let renamed = self.function(func);
                TransformResult::Replace(arena.alloc_stmt(Stmt::FunctionDecl(arena.alloc_function(renamed))))
            }
            Stmt::ClassDecl(class) => {
                let renamed = self.class(class);
                TransformResult::Replace(arena.alloc_stmt(Stmt::ClassDecl(arena.alloc_class(renamed))))
            }
            Stmt::Import(node) => {
                let rebuilt = self.import_node(node);
                TransformResult::Replace(arena.alloc_stmt(Stmt::Import(arena.alloc_import(rebuilt))))
            }
            Stmt::Export(node) => {
                let rebuilt = self.export_node(node);
                TransformResult::Replace(arena.alloc_stmt(Stmt::Export(arena.alloc_export(rebuilt))))
            }
            other => jsbundle_ast::transform::transform_stmt_children(self, other),
        }
    }
}

impl<'a, 'b> Reinterner<'a, 'b> {
    fn transform_expr_or_keep(&mut self, expr: &'a Expr<'a>) -> &'a Expr<'a> {
        match self.transform_expr(expr) {
            TransformResult::Keep => expr,
            TransformResult::Replace(e) => e,
            TransformResult::Remove => expr,
        }
    }

    fn transform_stmt_or_keep(&mut self, stmt: &'a Stmt<'a>) -> &'a Stmt<'a> {
        match self.transform_stmt(stmt) {
            TransformResult::Keep => stmt,
            TransformResult::Replace(s) => s,
            TransformResult::Remove => stmt,
        }
    }
}
