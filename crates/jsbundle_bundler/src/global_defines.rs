//! Replaces every free (unresolved) identifier matching a configured
//! `global_defines` entry with its literal value, run once per file before
//! compression so the constant folding passes can see through it (e.g.
//! `if (process.env.NODE_ENV === "production")`-style guards collapse once
//! `NODE_ENV` is replaced by a string literal).
//!
//! Grounded on the same `Transformer` shape [`crate::rewrite`] uses for its
//! bare-identifier rule: a free identifier (`thedef.get().is_none()`) whose
//! resolved text matches a define key is swapped for a freshly allocated
//! literal expression; anything already bound to a `SymbolDef` is left
//! alone, since a define only ever shadows a *global*.

use crate::descend::transform_expr_full;
use jsbundle_ast::{AstArena, Expr, Stmt, Transformer, TransformResult};
use jsbundle_base::Interner;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A literal value substituted in for a defined global, e.g.
/// `{"process.env.NODE_ENV": {"type": "string", "value": "production"}}`
/// configured as `DefineValue::Str("production".into())` keyed by
/// `"NODE_ENV"` (dotted-path defines are matched against the identifier's
/// own text only; `a.b.c`-shaped keys are not decomposed into `Dot` chains).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefineValue {
    Bool(bool),
    Number(f64),
    Str(String),
    Null,
    Undefined,
}

impl DefineValue {
    fn into_expr<'a>(&self, arena: &'a AstArena<'a>) -> Expr<'a> {
        match self {
            DefineValue::Bool(true) => Expr::True,
            DefineValue::Bool(false) => Expr::False,
            DefineValue::Number(n) => Expr::Number { value: *n, raw: arena.alloc_str(n.to_string()) },
            DefineValue::Str(s) => Expr::Str(arena.alloc_str(s.clone())),
            DefineValue::Null => Expr::Null,
            DefineValue::Undefined => Expr::Undefined,
        }
    }
}

pub fn apply_global_defines<'a>(
    stmts: &'a [Stmt<'a>],
    arena: &'a AstArena<'a>,
    interner: &Interner,
    defines: &HashMap<String, DefineValue>,
) -> &'a [Stmt<'a>] {
    if defines.is_empty() {
        return stmts;
    }
    let mut pass = DefinesPass { arena, interner, defines };
    pass.transform_block(stmts)
}

struct DefinesPass<'a, 'b> {
    arena: &'a AstArena<'a>,
    interner: &'b Interner,
    defines: &'b HashMap<String, DefineValue>,
}

impl<'a, 'b> Transformer<'a> for DefinesPass<'a, 'b> {
    fn arena(&self) -> &'a AstArena<'a> {
        self.arena
    }

    fn transform_expr(&mut self, expr: &'a Expr<'a>) -> TransformResult<&'a Expr<'a>> {
        if let Expr::Ident(sym) = expr {
            if sym.thedef.get().is_none() {
                if let Some(value) = self.defines.get(self.interner.resolve(sym.name)) {
                    return TransformResult::Replace(self.arena.alloc_expr(value.into_expr(self.arena)));
                }
            }
        }
        transform_expr_full(self, expr)
    }
}
