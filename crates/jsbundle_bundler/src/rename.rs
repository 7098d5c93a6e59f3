//! Collision-resolution renaming.
//!
//! When two merged files both declare a root-level binding under the same
//! name, the earlier-installed one keeps its name and the later one is
//! renamed via [`Interner::intern_unique`] (`MakeUniqueName`). `Symbol`
//! carries no back-reference list to the occurrences that resolve to it
//! (only the reverse edge, `Symbol.thedef -> SymbolId`), so unlike a
//! reference-counted rename this walks every statement in the owning file
//! and rewrites any occurrence whose `thedef` equals the renamed
//! `SymbolId` — driven by id equality rather than a reference list.

use crate::descend::transform_expr_full;
use jsbundle_ast::{
    AstArena, CatchClause, ClassMember, ClassNode, ForTarget, FunctionNode, Pattern, Stmt, Symbol,
    SymbolId, Transformer, TransformResult, VarDef,
};
use jsbundle_base::Name;

/// Rewrites every `Symbol` occurrence resolving to `target` so it carries
/// `new_name` instead, throughout `stmts`. Occurrences resolving to any
/// other `SymbolId` are left untouched.
pub fn rename_symbol<'a>(
    stmts: &'a [Stmt<'a>],
    arena: &'a AstArena<'a>,
    target: SymbolId,
    new_name: Name,
) -> &'a [Stmt<'a>] {
    let mut renamer = Renamer { arena, target, new_name };
    renamer.transform_block(stmts)
}

struct Renamer<'a> {
    arena: &'a AstArena<'a>,
    target: SymbolId,
    new_name: Name,
}

impl<'a> Renamer<'a> {
    fn maybe_rename(&self, sym: &Symbol) -> Symbol {
        let name = if sym.thedef.get() == Some(self.target) { self.new_name } else { sym.name };
        let fresh = Symbol::new(name, sym.kind);
        fresh.thedef.set(sym.thedef.get());
        fresh
    }

    fn rename_pattern(&self, pattern: &Pattern<'a>) -> Pattern<'a> {
        match pattern {
            Pattern::Ident(sym) => Pattern::Ident(self.maybe_rename(sym)),
            Pattern::Object(props) => {
                let new: Vec<_> = props
                    .iter()
                    .map(|p| jsbundle_ast::ObjectPatternProp {
                        key: p.key,
                        value: self.rename_pattern(&p.value),
                        computed: p.computed,
                        shorthand: p.shorthand,
                    })
                    .collect();
                Pattern::Object(self.arena.alloc_slice_props_pattern(new))
            }
            Pattern::Array(elements) => {
                let new: Vec<_> = elements.iter().map(|el| el.as_ref().map(|p| self.rename_pattern(p))).collect();
                Pattern::Array(self.arena.alloc_slice_opt_patterns(new))
            }
            Pattern::Assign { left, right } => {
                let left = self.arena.alloc_pattern(self.rename_pattern(left));
                Pattern::Assign { left, right }
            }
            Pattern::Rest(inner) => {
                let renamed = self.arena.alloc_pattern(self.rename_pattern(inner));
                Pattern::Rest(renamed)
            }
        }
    }

}

impl<'a> Transformer<'a> for Renamer<'a> {
    fn arena(&self) -> &'a AstArena<'a> {
        self.arena
    }

    fn transform_expr(&mut self, expr: &'a jsbundle_ast::Expr<'a>) -> TransformResult<&'a jsbundle_ast::Expr<'a>> {
        if let jsbundle_ast::Expr::Ident(sym) = expr {
            if sym.thedef.get() == Some(self.target) {
                return TransformResult::Replace(self.arena.alloc_expr(jsbundle_ast::Expr::Ident(self.maybe_rename(sym))));
            }
        }
        transform_expr_full(self, expr)
    }

    fn transform_stmt(&mut self, stmt: &'a Stmt<'a>) -> TransformResult<&'a Stmt<'a>> {
        let arena = self.arena;
        match stmt {
            Stmt::VarDecl { kind, decls } => {
                let new_decls: Vec<VarDef<'a>> = decls
                    .iter()
                    .map(|d| VarDef { name: self.rename_pattern(&d.name), init: d.init.map(|i| self.transform_expr_or_keep(i)) })
                    .collect();
                TransformResult::Replace(arena.alloc_stmt(Stmt::VarDecl { kind: *kind, decls: arena.alloc_var_defs(new_decls) }))
            }
            Stmt::ForIn { target, object, body } => {
                let target = self.rename_for_target(target);
                let object = self.transform_expr_or_keep(object);
                let body = self.transform_stmt_or_keep(body);
                TransformResult::Replace(arena.alloc_stmt(Stmt::ForIn { target, object, body }))
            }
            Stmt::ForOf { target, object, body, is_await } => {
                let target = self.rename_for_target(target);
                let object = self.transform_expr_or_keep(object);
                let body = self.transform_stmt_or_keep(body);
                TransformResult::Replace(arena.alloc_stmt(Stmt::ForOf { target, object, body, is_await: *is_await }))
            }
            Stmt::Try { block, handler, finalizer } => {
                let block = self.transform_block(block);
                let handler = handler.as_ref().map(|h| CatchClause {
                    param: h.param.as_ref().map(|p| self.rename_pattern(p)),
                    body: self.transform_block(h.body),
                    scope: h.scope,
                });
                let finalizer = finalizer.map(|f| self.transform_block(f));
                TransformResult::Replace(arena.alloc_stmt(Stmt::Try { block, handler, finalizer }))
            }
            Stmt::FunctionDecl(func) => {
                let renamed = self.rename_function(func);
                TransformResult::Replace(arena.alloc_stmt(Stmt::FunctionDecl(self.arena.alloc_function(renamed))))
            }
            Stmt::ClassDecl(class) => {
                let renamed = self.rename_class(class);
                TransformResult::Replace(arena.alloc_stmt(Stmt::ClassDecl(self.arena.alloc_class(renamed))))
            }
            other => jsbundle_ast::transform::transform_stmt_children(self, other),
        }
    }
}

impl<'a> Renamer<'a> {
    fn transform_expr_or_keep(&mut self, expr: &'a jsbundle_ast::Expr<'a>) -> &'a jsbundle_ast::Expr<'a> {
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

    fn rename_for_target(&mut self, target: &ForTarget<'a>) -> ForTarget<'a> {
        match target {
            ForTarget::VarDecl { kind, pattern } => ForTarget::VarDecl { kind: *kind, pattern: self.rename_pattern(pattern) },
            ForTarget::Pattern(p) => ForTarget::Pattern(self.rename_pattern(p)),
        }
    }

    /// Renames a function's own name, its parameter bindings, and descends
    /// into its body. A function's inner scope is a separate id space, so
    /// only occurrences actually resolving to `target` (e.g. a captured
    /// outer binding) are touched; an unrelated param of the same surface
    /// name keeps its own, distinct `SymbolId` and is left alone.
    fn rename_function(&mut self, func: &FunctionNode<'a>) -> FunctionNode<'a> {
        let name = func.name.as_ref().map(|n| self.maybe_rename(n));
        let params: Vec<_> = func.params.iter().map(|p| self.rename_pattern(p)).collect();
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

    /// Renames a class's own name and descends into each member's method
    /// body, the same way [`Self::rename_function`] handles a function
    /// declaration. `superclass` is a plain expression and goes through the
    /// normal `transform_expr` path.
    fn rename_class(&mut self, class: &ClassNode<'a>) -> ClassNode<'a> {
        let name = class.name.as_ref().map(|n| self.maybe_rename(n));
        let superclass = class.superclass.map(|s| self.transform_expr_or_keep(s));
        let members: Vec<ClassMember<'a>> = class
            .body
            .iter()
            .map(|m| {
                let key = match &m.key {
                    jsbundle_ast::PropKey::Computed(e) => jsbundle_ast::PropKey::Computed(self.transform_expr_or_keep(e)),
                    other => *other,
                };
                ClassMember { key, kind: m.kind, is_static: m.is_static, value: self.arena.alloc_function(self.rename_function(m.value)) }
            })
            .collect();
        ClassNode { name, superclass, body: self.arena.alloc_slice_class_members(members), scope: class.scope }
    }
}
