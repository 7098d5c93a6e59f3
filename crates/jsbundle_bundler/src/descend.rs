//! Full-coverage expression descent.
//!
//! `jsbundle_ast::transform::transform_expr_children` only rebuilds
//! `Binary`/`UnaryPrefix`/`Conditional`/`Sequence` — every other variant is
//! left as `Keep` for the caller to override one at a time. The linker's
//! rewrite and rename passes need to reach a `require(...)` call or a
//! renamed `Symbol` no matter how deep inside a `Call`/`Dot`/`Object`/
//! `Array`/... it sits, so this module supplies the missing arms as one
//! more free function in the same shape, to be called as the fallback arm
//! of a `Transformer::transform_expr` override instead of
//! `transform_expr_children`.

use jsbundle_ast::transform::clone_expr_ptr;
use jsbundle_ast::{
    ArrayElement, AstArena, Expr, PropKey, PropValue, Symbol, Transformer, TransformResult,
};

/// Like [`clone_expr_ptr`], but preserves `thedef` on an `Ident` node
/// instead of resetting it to unresolved. `clone_expr_ptr` exists to copy
/// an *already-rewritten* reference into a freshly allocated list (the
/// rewritten subtree is what's kept; the clone is just a container move),
/// so losing `thedef` there never matters — the caller only ever clones a
/// node it just finished transforming. Here the same list-rebuild happens
/// to *every* element whether or not that element changed, so an untouched
/// sibling's resolution must survive the round trip.
fn clone_expr_resolved<'a>(expr: &'a Expr<'a>) -> Expr<'a> {
    if let Expr::Ident(sym) = expr {
        let fresh = Symbol::new(sym.name, sym.kind);
        fresh.thedef.set(sym.thedef.get());
        return Expr::Ident(fresh);
    }
    clone_expr_ptr(expr)
}

fn transform_expr_or_keep<'a, T: Transformer<'a> + ?Sized>(t: &mut T, expr: &'a Expr<'a>) -> &'a Expr<'a> {
    match t.transform_expr(expr) {
        TransformResult::Keep => expr,
        TransformResult::Replace(new_expr) => new_expr,
        TransformResult::Remove => expr,
    }
}

/// Descends into every child of `expr` that
/// [`transform_expr_children`](jsbundle_ast::transform::transform_expr_children)
/// leaves untouched, rebuilding the node from the (possibly rewritten)
/// results. Falls through to `transform_expr_children` for the variants it
/// already handles, so a pass can call this as its sole fallback arm.
pub fn transform_expr_full<'a, T: Transformer<'a> + ?Sized>(
    t: &mut T,
    expr: &'a Expr<'a>,
) -> TransformResult<&'a Expr<'a>> {
    let arena = t.arena();
    let new_expr = match expr {
        Expr::Assign { op, target, value, span } => Expr::Assign {
            op: *op,
            target: transform_expr_or_keep(t, target),
            value: transform_expr_or_keep(t, value),
            span: *span,
        },
        Expr::UnaryPostfix { op, arg, span } => {
            Expr::UnaryPostfix { op: *op, arg: transform_expr_or_keep(t, arg), span: *span }
        }
        Expr::Call { callee, args } => Expr::Call {
            callee: transform_expr_or_keep(t, callee),
            args: transform_expr_slice(t, args, arena),
        },
        Expr::New { callee, args } => Expr::New {
            callee: transform_expr_or_keep(t, callee),
            args: transform_expr_slice(t, args, arena),
        },
        Expr::Dot { expr: inner, name } => Expr::Dot { expr: transform_expr_or_keep(t, inner), name: *name },
        Expr::Sub { expr: inner, index } => Expr::Sub {
            expr: transform_expr_or_keep(t, inner),
            index: transform_expr_or_keep(t, index),
        },
        Expr::Array(elements) => {
            let new: Vec<ArrayElement<'a>> = elements
                .iter()
                .map(|el| match el {
                    ArrayElement::Item(e) => ArrayElement::Item(clone_expr_resolved(transform_expr_or_keep(t, e))),
                    ArrayElement::Spread(e) => ArrayElement::Spread(clone_expr_resolved(transform_expr_or_keep(t, e))),
                    ArrayElement::Hole => ArrayElement::Hole,
                })
                .collect();
            Expr::Array(arena.alloc_slice_elements(new))
        }
        Expr::Object(props) => {
            let new: Vec<jsbundle_ast::Prop<'a>> = props
                .iter()
                .map(|p| {
                    let key = match &p.key {
                        PropKey::Computed(k) => PropKey::Computed(transform_expr_or_keep(t, k)),
                        other => *other,
                    };
                    let value = match &p.value {
                        PropValue::Expr(e) => PropValue::Expr(clone_expr_resolved(transform_expr_or_keep(t, e))),
                        PropValue::Spread(e) => PropValue::Spread(clone_expr_resolved(transform_expr_or_keep(t, e))),
                        PropValue::Method(f) => PropValue::Method(f),
                    };
                    jsbundle_ast::Prop { key, value, kind: p.kind, computed: p.computed, shorthand: p.shorthand }
                })
                .collect();
            Expr::Object(arena.alloc_slice_props(new))
        }
        Expr::TemplateString { quasis, exprs } => Expr::TemplateString {
            quasis,
            exprs: transform_expr_slice(t, exprs, arena),
        },
        Expr::Await { arg } => Expr::Await { arg: transform_expr_or_keep(t, arg) },
        Expr::Spread { arg } => Expr::Spread { arg: transform_expr_or_keep(t, arg) },
        Expr::Yield { arg, delegate } => {
            Expr::Yield { arg: arg.map(|a| transform_expr_or_keep(t, a)), delegate: *delegate }
        }
        Expr::ImportExpression { module } => {
            Expr::ImportExpression { module: transform_expr_or_keep(t, module) }
        }
        // Atoms, `Ident`, `Arrow`/`Function`/`Class` (own scope, rewritten
        // only by passes that explicitly descend into function bodies) and
        // the four variants `transform_expr_children` already rebuilds.
        other => return jsbundle_ast::transform::transform_expr_children(t, other),
    };
    TransformResult::Replace(arena.alloc_expr(new_expr))
}

fn transform_expr_slice<'a, T: Transformer<'a> + ?Sized>(
    t: &mut T,
    exprs: &'a [Expr<'a>],
    arena: &'a AstArena<'a>,
) -> &'a [Expr<'a>] {
    let new: Vec<Expr<'a>> = exprs.iter().map(|e| clone_expr_resolved(transform_expr_or_keep(t, e))).collect();
    arena.alloc_exprs(new)
}
