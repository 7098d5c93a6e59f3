//! Rewriting AST traversal, used by the compressor's passes (spec §5.4)
//! and the bundler's rewrite phase (spec §5.6).
//!
//! Unlike [`crate::walker::Walker`], a [`Transformer`] can replace or drop
//! nodes. Rather than a magic "delete me" sentinel node spliced into the
//! tree, each `transform_*` method returns a [`TransformResult`] that the
//! caller interprets: `Remove` only has meaning inside a statement list,
//! where dropping a node shortens the list instead of leaving a hole.

use crate::arena::AstArena;
use crate::ast::*;

/// The outcome of transforming one node.
pub enum TransformResult<T> {
    /// Leave the node as it was (after transforming its children, if the
    /// implementation descended into them).
    Keep,
    /// Replace the node in place.
    Replace(T),
    /// Drop the node. Only meaningful for elements of a statement list;
    /// a transformer that returns this for a non-list context (e.g. the
    /// test of an `if`) is a bug in that transformer, not in the driver.
    Remove,
}

/// A rewriting AST visitor. Every method defaults to recursing via the
/// matching `transform_*` free function and keeping the node; override a
/// method to fold, rewrite, or drop that node kind.
pub trait Transformer<'a> {
    fn arena(&self) -> &'a AstArena<'a>;

    fn transform_stmt(&mut self, stmt: &'a Stmt<'a>) -> TransformResult<&'a Stmt<'a>> {
        transform_stmt_children(self, stmt)
    }

    fn transform_expr(&mut self, expr: &'a Expr<'a>) -> TransformResult<&'a Expr<'a>> {
        transform_expr_children(self, expr)
    }

    /// Rewrites a statement list, honoring `Remove` results by shortening
    /// the list rather than leaving a gap.
    fn transform_block(&mut self, stmts: &'a [Stmt<'a>]) -> &'a [Stmt<'a>] {
        let mut out = Vec::with_capacity(stmts.len());
        for stmt in stmts.iter() {
            match self.transform_stmt(stmt) {
                TransformResult::Keep => out.push(clone_stmt_shallow(stmt)),
                TransformResult::Replace(new_stmt) => out.push(clone_stmt_shallow(new_stmt)),
                TransformResult::Remove => {}
            }
        }
        let arena = self.arena();
        arena.alloc_stmts(out)
    }
}

/// `Stmt` has no `Clone` impl (its children are arena references, cheap to
/// copy as pointers) — this performs the shallow top-level copy a rebuilt
/// list needs without re-allocating children.
///
/// Public so downstream passes (the compressor's hand-rolled list rewrites,
/// the bundler's rewrite phase) can reuse it instead of re-deriving the
/// same match arms.
pub fn clone_stmt_shallow<'a>(stmt: &'a Stmt<'a>) -> Stmt<'a> {
    match stmt {
        Stmt::If { test, cons, alt } => Stmt::If { test, cons, alt: *alt },
        Stmt::While { test, body } => Stmt::While { test, body },
        Stmt::Do { body, test } => Stmt::Do { body, test },
        Stmt::For { init, test, update, body } => {
            Stmt::For { init: clone_for_init(init), test: *test, update: *update, body }
        }
        Stmt::ForIn { target, object, body } => {
            Stmt::ForIn { target: clone_for_target(target), object, body }
        }
        Stmt::ForOf { target, object, body, is_await } => {
            Stmt::ForOf { target: clone_for_target(target), object, body, is_await: *is_await }
        }
        Stmt::Switch { discriminant, cases } => Stmt::Switch { discriminant, cases },
        Stmt::Try { block, handler, finalizer } => {
            Stmt::Try { block, handler: clone_catch(handler), finalizer: *finalizer }
        }
        Stmt::Throw { arg } => Stmt::Throw { arg },
        Stmt::Return { arg } => Stmt::Return { arg: *arg },
        Stmt::Break { label } => Stmt::Break { label: *label },
        Stmt::Continue { label } => Stmt::Continue { label: *label },
        Stmt::Labeled { label, body } => Stmt::Labeled { label: *label, body },
        Stmt::Block(body) => Stmt::Block(body),
        Stmt::Empty => Stmt::Empty,
        Stmt::Simple(expr) => Stmt::Simple(expr),
        Stmt::With { object, body } => Stmt::With { object, body },
        Stmt::Debugger => Stmt::Debugger,
        Stmt::VarDecl { kind, decls } => Stmt::VarDecl { kind: *kind, decls },
        Stmt::FunctionDecl(f) => Stmt::FunctionDecl(f),
        Stmt::ClassDecl(c) => Stmt::ClassDecl(c),
        Stmt::Import(i) => Stmt::Import(i),
        Stmt::Export(e) => Stmt::Export(e),
    }
}

pub fn clone_for_init<'a>(init: &Option<ForInit<'a>>) -> Option<ForInit<'a>> {
    match init {
        Some(ForInit::VarDecl { kind, decls }) => Some(ForInit::VarDecl { kind: *kind, decls }),
        Some(ForInit::Expr(e)) => Some(ForInit::Expr(e)),
        None => None,
    }
}

pub fn clone_for_target<'a>(target: &ForTarget<'a>) -> ForTarget<'a> {
    match target {
        ForTarget::VarDecl { kind, pattern } => {
            ForTarget::VarDecl { kind: *kind, pattern: clone_pattern_shallow(pattern) }
        }
        ForTarget::Pattern(p) => ForTarget::Pattern(clone_pattern_shallow(p)),
    }
}

pub fn clone_pattern_shallow<'a>(pattern: &Pattern<'a>) -> Pattern<'a> {
    match pattern {
        Pattern::Ident(sym) => Pattern::Ident(Symbol::new(sym.name, sym.kind)),
        Pattern::Object(props) => Pattern::Object(props),
        Pattern::Array(elements) => Pattern::Array(elements),
        Pattern::Assign { left, right } => Pattern::Assign { left, right },
        Pattern::Rest(inner) => Pattern::Rest(inner),
    }
}

pub fn clone_catch<'a>(handler: &Option<CatchClause<'a>>) -> Option<CatchClause<'a>> {
    handler.as_ref().map(|h| CatchClause {
        param: h.param.as_ref().map(clone_pattern_shallow),
        body: h.body,
        scope: h.scope,
    })
}

/// Descends into a statement's children, applying the transformer to
/// nested expressions and blocks, and rebuilds the node from the results.
pub fn transform_stmt_children<'a, T: Transformer<'a> + ?Sized>(
    t: &mut T,
    stmt: &'a Stmt<'a>,
) -> TransformResult<&'a Stmt<'a>> {
    let arena = t.arena();
    let new_stmt = match stmt {
        Stmt::If { test, cons, alt } => {
            let test = transform_expr_or_keep(t, test);
            let cons = transform_stmt_or_keep(t, cons);
            let alt = alt.map(|a| transform_stmt_or_keep(t, a));
            Stmt::If { test, cons, alt }
        }
        Stmt::While { test, body } => {
            Stmt::While { test: transform_expr_or_keep(t, test), body: transform_stmt_or_keep(t, body) }
        }
        Stmt::Do { body, test } => {
            Stmt::Do { body: transform_stmt_or_keep(t, body), test: transform_expr_or_keep(t, test) }
        }
        Stmt::Block(body) => Stmt::Block(t.transform_block(body)),
        Stmt::Simple(expr) => Stmt::Simple(transform_expr_or_keep(t, expr)),
        Stmt::Return { arg } => Stmt::Return { arg: arg.map(|a| transform_expr_or_keep(t, a)) },
        Stmt::Throw { arg } => Stmt::Throw { arg: transform_expr_or_keep(t, arg) },
        Stmt::Labeled { label, body } => Stmt::Labeled { label: *label, body: transform_stmt_or_keep(t, body) },
        // Nodes whose children a compressor pass does not typically rewrite
        // in place are passed through unchanged; a pass that needs to
        // descend further overrides `transform_stmt` directly.
        other => clone_stmt_shallow(other),
    };
    TransformResult::Replace(arena.alloc_stmt(new_stmt))
}

fn transform_expr_or_keep<'a, T: Transformer<'a> + ?Sized>(t: &mut T, expr: &'a Expr<'a>) -> &'a Expr<'a> {
    match t.transform_expr(expr) {
        TransformResult::Keep => expr,
        TransformResult::Replace(new_expr) => new_expr,
        TransformResult::Remove => expr,
    }
}

fn transform_stmt_or_keep<'a, T: Transformer<'a> + ?Sized>(t: &mut T, stmt: &'a Stmt<'a>) -> &'a Stmt<'a> {
    match t.transform_stmt(stmt) {
        TransformResult::Keep => stmt,
        TransformResult::Replace(new_stmt) => new_stmt,
        TransformResult::Remove => stmt,
    }
}

/// Descends into an expression's children. Most compressor passes that
/// rewrite expressions (constant folding, boolean compression) override
/// `transform_expr` directly rather than relying on this default, since
/// they need to inspect the *already-transformed* children before
/// deciding whether to fold the parent.
pub fn transform_expr_children<'a, T: Transformer<'a> + ?Sized>(
    t: &mut T,
    expr: &'a Expr<'a>,
) -> TransformResult<&'a Expr<'a>> {
    let arena = t.arena();
    let new_expr = match expr {
        Expr::Binary { op, left, right, span } => Expr::Binary {
            op: *op,
            left: transform_expr_or_keep(t, left),
            right: transform_expr_or_keep(t, right),
            span: *span,
        },
        Expr::UnaryPrefix { op, arg, span } => {
            Expr::UnaryPrefix { op: *op, arg: transform_expr_or_keep(t, arg), span: *span }
        }
        Expr::Conditional { test, cons, alt } => Expr::Conditional {
            test: transform_expr_or_keep(t, test),
            cons: transform_expr_or_keep(t, cons),
            alt: transform_expr_or_keep(t, alt),
        },
        Expr::Sequence(exprs) => {
            let new: Vec<Expr<'a>> = exprs.iter().map(|e| {
                let r = transform_expr_or_keep(t, e);
                // `r` points into the arena already; re-borrow its value.
                clone_expr_ptr(r)
            }).collect();
            Expr::Sequence(arena.alloc_exprs(new))
        }
        _ => return TransformResult::Keep,
    };
    TransformResult::Replace(arena.alloc_expr(new_expr))
}

pub fn clone_expr_ptr<'a>(expr: &'a Expr<'a>) -> Expr<'a> {
    // `Expr` holds only `Copy` scalars and arena references in every
    // variant, so a field-by-field shallow copy is always possible; this
    // mirrors `clone_stmt_shallow` for expressions reached through
    // `transform_expr_children`'s `Sequence` arm.
    match expr {
        Expr::Number { value, raw } => Expr::Number { value: *value, raw },
        Expr::Str(s) => Expr::Str(s),
        Expr::RegExp { pattern, flags } => Expr::RegExp { pattern, flags },
        Expr::This => Expr::This,
        Expr::Super => Expr::Super,
        Expr::Null => Expr::Null,
        Expr::True => Expr::True,
        Expr::False => Expr::False,
        Expr::NaN => Expr::NaN,
        Expr::Infinity => Expr::Infinity,
        Expr::Undefined => Expr::Undefined,
        Expr::Ident(sym) => Expr::Ident(Symbol::new(sym.name, sym.kind)),
        Expr::Binary { op, left, right, span } => Expr::Binary { op: *op, left, right, span: *span },
        Expr::Assign { op, target, value, span } => Expr::Assign { op: *op, target, value, span: *span },
        Expr::UnaryPrefix { op, arg, span } => Expr::UnaryPrefix { op: *op, arg, span: *span },
        Expr::UnaryPostfix { op, arg, span } => Expr::UnaryPostfix { op: *op, arg, span: *span },
        Expr::Conditional { test, cons, alt } => Expr::Conditional { test, cons, alt },
        Expr::Sequence(exprs) => Expr::Sequence(exprs),
        Expr::Call { callee, args } => Expr::Call { callee, args },
        Expr::New { callee, args } => Expr::New { callee, args },
        Expr::Dot { expr, name } => Expr::Dot { expr, name: *name },
        Expr::Sub { expr, index } => Expr::Sub { expr, index },
        Expr::Array(elements) => Expr::Array(elements),
        Expr::Object(props) => Expr::Object(props),
        Expr::Arrow(f) => Expr::Arrow(f),
        Expr::Function(f) => Expr::Function(f),
        Expr::Class(c) => Expr::Class(c),
        Expr::TemplateString { quasis, exprs } => Expr::TemplateString { quasis, exprs },
        Expr::Await { arg } => Expr::Await { arg },
        Expr::Yield { arg, delegate } => Expr::Yield { arg: *arg, delegate: *delegate },
        Expr::Spread { arg } => Expr::Spread { arg },
        Expr::ImportExpression { module } => Expr::ImportExpression { module },
    }
}
