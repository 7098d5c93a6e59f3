//! Unreachable-code elimination: `if`/`while`/`do`/`for` constant-condition
//! reduction.
//!
//! Grounded on the teacher's `optimize::dce::eliminate_dead_code`, adapted
//! to this crate's AST shape: the teacher's `then_block`/`else_block` are
//! statement lists spliced into the parent list on a constant branch, but
//! `Stmt::If`'s `cons`/`alt` here are each a single `&'a Stmt<'a>` already
//! (typically a `Block` wrapping a list) — so folding `if (true) A else B`
//! is just replacing the whole `If` with the `A` reference directly, no
//! splicing required.
//!
//! `for-in`/`for-of`/`with` are explicitly unsupported by this pass (spec's
//! policy, not an oversight): encountering one raises a fatal
//! [`ErrorKind::NotImplemented`] rather than silently leaving it
//! unoptimized, mirroring `JsError`'s recoverable-errors-escalate-to-fatal
//! default. Collected on the pass rather than returned from
//! `transform_stmt` itself, since [`Transformer`] has no fallible variant;
//! the driver checks `errors` after running the pass and aborts the
//! compression run if it's non-empty.

use crate::type_converter::to_boolean;
use jsbundle_ast::{AstArena, ForInit, Stmt, Transformer, TransformResult};
use jsbundle_base::{ErrorKind, JsError, Span};

pub struct UnreachableEliminator<'a> {
    arena: &'a AstArena<'a>,
    pub changed: bool,
    pub errors: Vec<JsError>,
}

impl<'a> UnreachableEliminator<'a> {
    pub fn new(arena: &'a AstArena<'a>) -> Self {
        UnreachableEliminator { arena, changed: false, errors: Vec::new() }
    }

    fn not_implemented(&mut self, what: &str) {
        self.errors.push(JsError::fatal(
            ErrorKind::NotImplemented,
            format!("unreachable-code elimination does not support `{what}`"),
            Span::default(),
        ));
    }
}

impl<'a> Transformer<'a> for UnreachableEliminator<'a> {
    fn arena(&self) -> &'a AstArena<'a> {
        self.arena
    }

    fn transform_stmt(&mut self, stmt: &'a Stmt<'a>) -> TransformResult<&'a Stmt<'a>> {
        match stmt {
            Stmt::If { test, cons, alt } => {
                if let Some(b) = to_boolean(test) {
                    self.changed = true;
                    return if b {
                        TransformResult::Replace(*cons)
                    } else {
                        match alt {
                            Some(a) => TransformResult::Replace(*a),
                            None => TransformResult::Remove,
                        }
                    };
                }
                jsbundle_ast::transform::transform_stmt_children(self, stmt)
            }
            Stmt::While { test, .. } => {
                if to_boolean(test) == Some(false) {
                    self.changed = true;
                    return TransformResult::Remove;
                }
                jsbundle_ast::transform::transform_stmt_children(self, stmt)
            }
            Stmt::Do { body, test } => {
                if to_boolean(test) == Some(false) && !contains_unlabeled_break(body) {
                    self.changed = true;
                    return TransformResult::Replace(*body);
                }
                jsbundle_ast::transform::transform_stmt_children(self, stmt)
            }
            Stmt::For { init, test, .. } => {
                let const_false = test.map_or(false, |t| to_boolean(t) == Some(false));
                if const_false {
                    self.changed = true;
                    return match init {
                        None => TransformResult::Remove,
                        Some(ForInit::VarDecl { kind, decls }) => {
                            TransformResult::Replace(self.arena.alloc_stmt(Stmt::VarDecl { kind: *kind, decls: *decls }))
                        }
                        Some(ForInit::Expr(e)) => {
                            TransformResult::Replace(self.arena.alloc_stmt(Stmt::Simple(*e)))
                        }
                    };
                }
                jsbundle_ast::transform::transform_stmt_children(self, stmt)
            }
            Stmt::ForIn { .. } => {
                self.not_implemented("for-in");
                TransformResult::Keep
            }
            Stmt::ForOf { .. } => {
                self.not_implemented("for-of");
                TransformResult::Keep
            }
            Stmt::With { .. } => {
                self.not_implemented("with");
                TransformResult::Keep
            }
            other => jsbundle_ast::transform::transform_stmt_children(self, other),
        }
    }
}

/// Whether `stmt` can reach an unlabeled `break` that would terminate an
/// enclosing `do`/`while`/`for` loop — i.e. a `break` not already absorbed
/// by a nested loop or `switch`, whose own unlabeled `break` would target
/// the nested construct instead. Labeled breaks are conservatively ignored
/// (treated as not blocking the transform), since this function has no way
/// to know whether a label further up names the loop being considered.
fn contains_unlabeled_break<'a>(stmt: &'a Stmt<'a>) -> bool {
    match stmt {
        Stmt::Break { label: None } => true,
        Stmt::If { cons, alt, .. } => {
            contains_unlabeled_break(cons) || alt.map_or(false, contains_unlabeled_break)
        }
        Stmt::Block(body) => body.iter().any(contains_unlabeled_break),
        Stmt::Labeled { body, .. } => contains_unlabeled_break(body),
        Stmt::Try { block, handler, finalizer } => {
            block.iter().any(contains_unlabeled_break)
                || handler.as_ref().map_or(false, |h| h.body.iter().any(contains_unlabeled_break))
                || finalizer.map_or(false, |f| f.iter().any(contains_unlabeled_break))
        }
        // A nested loop or switch absorbs its own unlabeled `break`s.
        Stmt::While { .. } | Stmt::Do { .. } | Stmt::For { .. } | Stmt::ForIn { .. } | Stmt::ForOf { .. } | Stmt::Switch { .. } => {
            false
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsbundle_ast::Expr;

    #[test]
    fn folds_constant_if_to_chosen_branch() {
        let arena = AstArena::new();
        let cons = arena.alloc_stmt(Stmt::Empty);
        let alt = arena.alloc_stmt(Stmt::Debugger);
        let test = arena.alloc_expr(Expr::False);
        let if_stmt = arena.alloc_stmt(Stmt::If { test, cons, alt: Some(alt) });
        let mut pass = UnreachableEliminator::new(&arena);
        match pass.transform_stmt(if_stmt) {
            TransformResult::Replace(s) => assert!(std::ptr::eq(s, alt)),
            _ => panic!("expected the else branch"),
        }
        assert!(pass.errors.is_empty());
    }

    #[test]
    fn removes_while_false() {
        let arena = AstArena::new();
        let test = arena.alloc_expr(Expr::False);
        let body = arena.alloc_stmt(Stmt::Empty);
        let while_stmt = arena.alloc_stmt(Stmt::While { test, body });
        let mut pass = UnreachableEliminator::new(&arena);
        assert!(matches!(pass.transform_stmt(while_stmt), TransformResult::Remove));
    }

    #[test]
    fn do_while_false_without_break_unwraps_to_body() {
        let arena = AstArena::new();
        let test = arena.alloc_expr(Expr::False);
        let body = arena.alloc_stmt(Stmt::Block(arena.alloc_stmts([Stmt::Empty])));
        let do_stmt = arena.alloc_stmt(Stmt::Do { body, test });
        let mut pass = UnreachableEliminator::new(&arena);
        match pass.transform_stmt(do_stmt) {
            TransformResult::Replace(s) => assert!(std::ptr::eq(s, body)),
            _ => panic!("expected the loop body"),
        }
    }

    #[test]
    fn do_while_false_with_break_is_kept() {
        let arena = AstArena::new();
        let test = arena.alloc_expr(Expr::False);
        let body = arena.alloc_stmt(Stmt::Block(arena.alloc_stmts([Stmt::Break { label: None }])));
        let do_stmt = arena.alloc_stmt(Stmt::Do { body, test });
        let mut pass = UnreachableEliminator::new(&arena);
        assert!(!matches!(pass.transform_stmt(do_stmt), TransformResult::Replace(s) if std::ptr::eq(s, body)));
    }

    #[test]
    fn for_in_raises_not_implemented() {
        let arena = AstArena::new();
        let object = arena.alloc_expr(Expr::Ident(jsbundle_ast::Symbol::new(
            jsbundle_base::Name::default(),
            jsbundle_ast::SymbolKind::Var,
        )));
        let body = arena.alloc_stmt(Stmt::Empty);
        let target = jsbundle_ast::ForTarget::Pattern(jsbundle_ast::Pattern::Ident(jsbundle_ast::Symbol::new(
            jsbundle_base::Name::default(),
            jsbundle_ast::SymbolKind::Var,
        )));
        let for_in = arena.alloc_stmt(Stmt::ForIn { target, object, body });
        let mut pass = UnreachableEliminator::new(&arena);
        pass.transform_stmt(for_in);
        assert_eq!(pass.errors.len(), 1);
        assert_eq!(pass.errors[0].kind, ErrorKind::NotImplemented);
    }
}
