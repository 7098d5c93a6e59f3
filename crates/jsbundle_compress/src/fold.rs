//! Constant folding, driven by [`crate::type_converter`].
//!
//! Grounded on the teacher's `optimize::fold::fold_expr`: fold children
//! first, then try to fold the parent; skip reallocating when nothing
//! changed (checked there via `std::ptr::eq`, here via comparing the
//! post-descent reference against the original one). Algebraic identities
//! (`x+0`, `x*1`, `x*0`, `x/1`) are tried the same way the teacher's
//! `try_simplify_algebraic` does, generalized from the teacher's
//! int/float split to JS's single `f64` number type.

use crate::type_converter::{number_literal, to_boolean, to_number};
use jsbundle_ast::{AstArena, BinOp, Expr, Transformer, TransformResult, UnaryOp};

pub struct ConstantFolder<'a> {
    arena: &'a AstArena<'a>,
    pub changed: bool,
}

impl<'a> ConstantFolder<'a> {
    pub fn new(arena: &'a AstArena<'a>) -> Self {
        ConstantFolder { arena, changed: false }
    }

    fn try_fold(&mut self, expr: &'a Expr<'a>) -> Option<&'a Expr<'a>> {
        match expr {
            Expr::Binary { op, left, right, .. } => self.try_fold_binary(*op, left, right),
            Expr::UnaryPrefix { op, arg, .. } => self.try_fold_unary(*op, arg),
            Expr::Conditional { test, cons, alt } => {
                to_boolean(test).map(|b| if b { *cons } else { *alt })
            }
            _ => None,
        }
    }

    fn try_fold_unary(&mut self, op: UnaryOp, arg: &'a Expr<'a>) -> Option<&'a Expr<'a>> {
        match op {
            UnaryOp::Not => to_boolean(arg).map(|b| self.alloc_bool(!b)),
            UnaryOp::Minus => to_number(arg).map(|n| self.alloc_number(-n)),
            UnaryOp::Plus => to_number(arg).map(|n| self.alloc_number(n)),
            UnaryOp::BitNot => to_number(arg).map(|n| self.alloc_number(!to_int32(n) as f64)),
            _ => None,
        }
    }

    fn try_fold_binary(&mut self, op: BinOp, left: &'a Expr<'a>, right: &'a Expr<'a>) -> Option<&'a Expr<'a>> {
        if let Some(folded) = self.try_fold_binary_literal(op, left, right) {
            return Some(folded);
        }
        self.try_simplify_algebraic(op, left, right)
    }

    /// Both operands statically known: compute the exact result.
    fn try_fold_binary_literal(&mut self, op: BinOp, left: &'a Expr<'a>, right: &'a Expr<'a>) -> Option<&'a Expr<'a>> {
        if let (Expr::Str(l), Expr::Str(r)) = (left, right) {
            if op == BinOp::Add {
                let combined = format!("{}{}", l, r);
                let s = self.arena.alloc_str(combined);
                return Some(self.arena.alloc_expr(Expr::Str(s)));
            }
        }
        // Short-circuit operators only need the left operand's truthiness;
        // the right side need not be statically known, since it's returned
        // verbatim rather than coerced.
        if op == BinOp::LogicalAnd {
            return to_boolean(left).map(|b| if b { right } else { left });
        }
        if op == BinOp::LogicalOr {
            return to_boolean(left).map(|b| if b { left } else { right });
        }
        let l = to_number(left)?;
        let r = to_number(right)?;
        match op {
            BinOp::Add => Some(self.alloc_number(l + r)),
            BinOp::Sub => Some(self.alloc_number(l - r)),
            BinOp::Mul => Some(self.alloc_number(l * r)),
            BinOp::Div => Some(self.alloc_number(l / r)),
            BinOp::Mod => Some(self.alloc_number(l % r)),
            BinOp::Pow => Some(self.alloc_number(l.powf(r))),
            BinOp::BitAnd => Some(self.alloc_number((to_int32(l) & to_int32(r)) as f64)),
            BinOp::BitOr => Some(self.alloc_number((to_int32(l) | to_int32(r)) as f64)),
            BinOp::BitXor => Some(self.alloc_number((to_int32(l) ^ to_int32(r)) as f64)),
            BinOp::Shl => Some(self.alloc_number(((to_int32(l) << (to_uint32(r) & 31)) as f64))),
            BinOp::Shr => Some(self.alloc_number(((to_int32(l) >> (to_uint32(r) & 31)) as f64))),
            BinOp::Ushr => Some(self.alloc_number(((to_uint32(l) >> (to_uint32(r) & 31)) as f64))),
            BinOp::Lt => Some(self.alloc_bool(l < r)),
            BinOp::Gt => Some(self.alloc_bool(l > r)),
            BinOp::Le => Some(self.alloc_bool(l <= r)),
            BinOp::Ge => Some(self.alloc_bool(l >= r)),
            BinOp::Eq | BinOp::StrictEq => Some(self.alloc_bool(l == r)),
            BinOp::NotEq | BinOp::StrictNotEq => Some(self.alloc_bool(l != r)),
            BinOp::LogicalAnd | BinOp::LogicalOr => unreachable!("handled above before both sides were coerced"),
            // `in`/`instanceof`/`,` need runtime object identity, not a
            // value coercion; left for the engine.
            BinOp::In | BinOp::Instanceof | BinOp::Comma => None,
        }
    }

    /// One operand is a known identity element: fold without touching the
    /// other side's (possibly non-constant) value.
    fn try_simplify_algebraic(&mut self, op: BinOp, left: &'a Expr<'a>, right: &'a Expr<'a>) -> Option<&'a Expr<'a>> {
        match op {
            BinOp::Add if is_number(right, 0.0) => Some(left),
            BinOp::Add if is_number(left, 0.0) => Some(right),
            BinOp::Sub if is_number(right, 0.0) => Some(left),
            BinOp::Mul if is_number(right, 1.0) => Some(left),
            BinOp::Mul if is_number(left, 1.0) => Some(right),
            BinOp::Mul if is_number(right, 0.0) => Some(right),
            BinOp::Mul if is_number(left, 0.0) => Some(left),
            BinOp::Div if is_number(right, 1.0) => Some(left),
            _ => None,
        }
    }

    fn alloc_number(&self, value: f64) -> &'a Expr<'a> {
        self.arena.alloc_expr(number_literal(self.arena, value))
    }

    fn alloc_bool(&self, value: bool) -> &'a Expr<'a> {
        self.arena.alloc_expr(if value { Expr::True } else { Expr::False })
    }
}

fn is_number(expr: &Expr, value: f64) -> bool {
    matches!(expr, Expr::Number { value: v, .. } if *v == value)
}

fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    let n = n.trunc();
    let modulo = n.rem_euclid(4294967296.0);
    if modulo >= 2147483648.0 {
        (modulo - 4294967296.0) as i32
    } else {
        modulo as i32
    }
}

fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4294967296.0) as u32
}

impl<'a> Transformer<'a> for ConstantFolder<'a> {
    fn arena(&self) -> &'a AstArena<'a> {
        self.arena
    }

    fn transform_expr(&mut self, expr: &'a Expr<'a>) -> TransformResult<&'a Expr<'a>> {
        let descended = match jsbundle_ast::transform::transform_expr_children(self, expr) {
            TransformResult::Replace(e) => e,
            TransformResult::Keep => expr,
            TransformResult::Remove => return TransformResult::Remove,
        };
        if let Some(folded) = self.try_fold(descended) {
            self.changed = true;
            return TransformResult::Replace(folded);
        }
        if std::ptr::eq(descended, expr) {
            TransformResult::Keep
        } else {
            self.changed = true;
            TransformResult::Replace(descended)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsbundle_base::Span;

    #[test]
    fn folds_addition_of_two_numbers() {
        let arena = AstArena::new();
        let left = arena.alloc_expr(Expr::Number { value: 1.0, raw: "1" });
        let right = arena.alloc_expr(Expr::Number { value: 2.0, raw: "2" });
        let bin = arena.alloc_expr(Expr::Binary { op: BinOp::Add, left, right, span: Span::default() });
        let mut folder = ConstantFolder::new(&arena);
        match folder.transform_expr(bin) {
            TransformResult::Replace(Expr::Number { value, .. }) => assert_eq!(*value, 3.0),
            TransformResult::Replace(_) => panic!("expected a folded number literal"),
            TransformResult::Keep => panic!("expected a fold, got Keep"),
            TransformResult::Remove => panic!("unexpected remove"),
        }
    }

    #[test]
    fn simplifies_add_zero_without_folding_rhs() {
        let arena = AstArena::new();
        let left = arena.alloc_expr(Expr::Ident(jsbundle_ast::Symbol::new(
            jsbundle_base::Name::default(),
            jsbundle_ast::SymbolKind::Var,
        )));
        let right = arena.alloc_expr(Expr::Number { value: 0.0, raw: "0" });
        let bin = arena.alloc_expr(Expr::Binary { op: BinOp::Add, left, right, span: Span::default() });
        let mut folder = ConstantFolder::new(&arena);
        match folder.transform_expr(bin) {
            TransformResult::Replace(e) => assert!(std::ptr::eq(e, left)),
            TransformResult::Keep => panic!("expected a fold to the left operand"),
            TransformResult::Remove => panic!("unexpected remove"),
        }
    }

    #[test]
    fn folds_constant_conditional_test() {
        let arena = AstArena::new();
        let cons = arena.alloc_expr(Expr::Number { value: 1.0, raw: "1" });
        let alt = arena.alloc_expr(Expr::Number { value: 2.0, raw: "2" });
        let cond = arena.alloc_expr(Expr::Conditional { test: arena.alloc_expr(Expr::True), cons, alt });
        let mut folder = ConstantFolder::new(&arena);
        match folder.transform_expr(cond) {
            TransformResult::Replace(e) => assert!(std::ptr::eq(e, cons)),
            _ => panic!("expected the true branch"),
        }
    }

    #[test]
    fn leaves_non_constant_binary_untouched_reference() {
        let arena = AstArena::new();
        let left = arena.alloc_expr(Expr::Ident(jsbundle_ast::Symbol::new(
            jsbundle_base::Name::default(),
            jsbundle_ast::SymbolKind::Var,
        )));
        let right = arena.alloc_expr(Expr::Ident(jsbundle_ast::Symbol::new(
            jsbundle_base::Name::default(),
            jsbundle_ast::SymbolKind::Var,
        )));
        let bin = arena.alloc_expr(Expr::Binary { op: BinOp::Add, left, right, span: Span::default() });
        let mut folder = ConstantFolder::new(&arena);
        assert!(matches!(folder.transform_expr(bin), TransformResult::Keep));
    }
}
