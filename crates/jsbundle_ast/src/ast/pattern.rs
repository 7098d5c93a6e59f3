//! Binding patterns: the left-hand side of declarations, parameters,
//! assignment targets, and `for-in`/`for-of` loop heads.

use crate::ast::expr::{Expr, PropKey};
use crate::ast::symbol::Symbol;

/// A destructuring binding target.
///
/// Produced by the parser's `toAssignable`/`toAssignableList` conversion
/// (spec §4.2): an expression parsed optimistically as a value is
/// reinterpreted as a pattern once `=>` or a declarator confirms the
/// context is a binding position.
#[derive(Debug)]
pub enum Pattern<'a> {
    Ident(Symbol),
    Object(&'a [ObjectPatternProp<'a>]),
    Array(&'a [Option<Pattern<'a>>]),
    /// `{ a = 1 }` / `[a = 1]` — a pattern with a default value.
    Assign { left: &'a Pattern<'a>, right: &'a Expr<'a> },
    /// `...rest` as the final element of an object or array pattern.
    Rest(&'a Pattern<'a>),
}

#[derive(Debug)]
pub struct ObjectPatternProp<'a> {
    pub key: PropKey<'a>,
    pub value: Pattern<'a>,
    pub computed: bool,
    pub shorthand: bool,
}
