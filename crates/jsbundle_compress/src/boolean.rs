//! Boolean compression: `!0`/`!1`-style rewrites that are exact value
//! replacements everywhere, plus stripping a redundant double-negation
//! from positions where only truthiness is observed (`if`/`while`/`do`
//! tests and the `?:` test) — `!!x` is otherwise not safe to collapse to
//! `x`, since it changes the value from a boolean to `x` itself.

use jsbundle_ast::{AstArena, Expr, Stmt, Transformer, TransformResult, UnaryOp};

pub struct BooleanCompressor<'a> {
    arena: &'a AstArena<'a>,
    pub changed: bool,
}

impl<'a> BooleanCompressor<'a> {
    pub fn new(arena: &'a AstArena<'a>) -> Self {
        BooleanCompressor { arena, changed: false }
    }

    /// `!!x` -> `x` when the result is only ever tested for truthiness.
    fn strip_double_not(&mut self, expr: &'a Expr<'a>) -> &'a Expr<'a> {
        if let Expr::UnaryPrefix { op: UnaryOp::Not, arg: outer_arg, .. } = expr {
            if let Expr::UnaryPrefix { op: UnaryOp::Not, arg: inner, .. } = outer_arg {
                self.changed = true;
                return inner;
            }
        }
        expr
    }

    fn transform_test(&mut self, test: &'a Expr<'a>) -> &'a Expr<'a> {
        let descended = self.transform_expr_or_self(test);
        self.strip_double_not(descended)
    }

    fn transform_expr_or_self(&mut self, expr: &'a Expr<'a>) -> &'a Expr<'a> {
        match self.transform_expr(expr) {
            TransformResult::Keep => expr,
            TransformResult::Replace(e) => e,
            TransformResult::Remove => expr,
        }
    }
}

impl<'a> Transformer<'a> for BooleanCompressor<'a> {
    fn arena(&self) -> &'a AstArena<'a> {
        self.arena
    }

    fn transform_expr(&mut self, expr: &'a Expr<'a>) -> TransformResult<&'a Expr<'a>> {
        // `!0` -> `true`, `!1` (or any nonzero constant) -> `false`: exact
        // value replacements regardless of context, unlike the `!!x`
        // context-bound simplification.
        if let Expr::UnaryPrefix { op: UnaryOp::Not, arg, .. } = expr {
            if let Expr::Number { value, .. } = arg {
                self.changed = true;
                return TransformResult::Replace(self.arena.alloc_expr(if *value == 0.0 { Expr::True } else { Expr::False }));
            }
        }
        jsbundle_ast::transform::transform_expr_children(self, expr)
    }

    fn transform_stmt(&mut self, stmt: &'a Stmt<'a>) -> TransformResult<&'a Stmt<'a>> {
        let arena = self.arena;
        match stmt {
            Stmt::If { test, cons, alt } => {
                let test = self.transform_test(test);
                let cons = self.transform_stmt_or_self(cons);
                let alt = alt.map(|a| self.transform_stmt_or_self(a));
                TransformResult::Replace(arena.alloc_stmt(Stmt::If { test, cons, alt }))
            }
            Stmt::While { test, body } => {
                let test = self.transform_test(test);
                let body = self.transform_stmt_or_self(body);
                TransformResult::Replace(arena.alloc_stmt(Stmt::While { test, body }))
            }
            Stmt::Do { body, test } => {
                let body = self.transform_stmt_or_self(body);
                let test = self.transform_test(test);
                TransformResult::Replace(arena.alloc_stmt(Stmt::Do { body, test }))
            }
            other => jsbundle_ast::transform::transform_stmt_children(self, other),
        }
    }
}

impl<'a> BooleanCompressor<'a> {
    fn transform_stmt_or_self(&mut self, stmt: &'a Stmt<'a>) -> &'a Stmt<'a> {
        match self.transform_stmt(stmt) {
            TransformResult::Keep => stmt,
            TransformResult::Replace(s) => s,
            TransformResult::Remove => stmt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_not_zero_to_true() {
        let arena = AstArena::new();
        let zero = arena.alloc_expr(Expr::Number { value: 0.0, raw: "0" });
        let not_zero = arena.alloc_expr(Expr::UnaryPrefix { op: UnaryOp::Not, arg: zero, span: Default::default() });
        let mut pass = BooleanCompressor::new(&arena);
        match pass.transform_expr(not_zero) {
            TransformResult::Replace(Expr::True) => {}
            _ => panic!("expected `!0` to fold to `true`"),
        }
        assert!(pass.changed);
    }

    #[test]
    fn strips_double_not_in_if_test() {
        let arena = AstArena::new();
        let ident = arena.alloc_expr(Expr::Ident(jsbundle_ast::Symbol::new(
            jsbundle_base::Name::default(),
            jsbundle_ast::SymbolKind::Var,
        )));
        let inner_not = arena.alloc_expr(Expr::UnaryPrefix { op: UnaryOp::Not, arg: ident, span: Default::default() });
        let outer_not = arena.alloc_expr(Expr::UnaryPrefix { op: UnaryOp::Not, arg: inner_not, span: Default::default() });
        let body = arena.alloc_stmt(Stmt::Empty);
        let if_stmt = arena.alloc_stmt(Stmt::If { test: outer_not, cons: body, alt: None });
        let mut pass = BooleanCompressor::new(&arena);
        match pass.transform_stmt(if_stmt) {
            TransformResult::Replace(Stmt::If { test, .. }) => assert!(std::ptr::eq(*test, ident)),
            _ => panic!("expected the if's test to be simplified to the bare identifier"),
        }
    }
}
