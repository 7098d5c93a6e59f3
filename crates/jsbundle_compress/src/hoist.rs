//! Return compression and `var` hoisting (spec's single combined pass,
//! grounded on the teacher's `dce.rs` trailing-`Return` truncation,
//! generalized here to also collect and hoist `var` bindings).
//!
//! Scope note: only `Pattern::Ident` `var` declarations are rewritten in
//! place; a destructuring `var` declarator (`var {a, b} = x`) is left
//! exactly as written, since turning it into a bare assignment would need
//! to parenthesize an object pattern used as an assignment target — a
//! rewrite this pass does not attempt.

use jsbundle_ast::transform::{clone_for_target, clone_stmt_shallow};
use jsbundle_ast::{AssignOp, AstArena, DeclKind, Expr, ForInit, ForTarget, Pattern, Stmt, Symbol, VarDef};
use jsbundle_base::Span;

/// Truncates a statement list after its first unconditional `return`, and
/// drops a trailing bare `return;` (redundant: a function implicitly
/// returns `undefined` at its end).
pub fn compress_returns<'a>(stmts: &'a [Stmt<'a>], arena: &'a AstArena<'a>) -> (&'a [Stmt<'a>], bool) {
    let mut changed = false;
    let mut out: Vec<Stmt<'a>> = stmts.iter().map(clone_stmt_shallow).collect();
    if let Some(pos) = out.iter().position(|s| matches!(s, Stmt::Return { .. })) {
        if pos + 1 < out.len() {
            changed = true;
            out.truncate(pos + 1);
        }
    }
    if let Some(Stmt::Return { arg: None }) = out.last() {
        changed = true;
        out.pop();
    }
    if changed {
        (arena.alloc_stmts(out), true)
    } else {
        (stmts, false)
    }
}

/// Hoists every `var` declared anywhere in `stmts` (not descending into
/// nested function/arrow bodies — those are hoisted independently, once
/// per function, by the driver) to a single `var` declaration at the top
/// of the list, in first-declared order. An initializer becomes an
/// in-place assignment where the declaration used to be.
pub fn hoist_vars<'a>(stmts: &'a [Stmt<'a>], arena: &'a AstArena<'a>) -> (&'a [Stmt<'a>], bool) {
    let mut collected: Vec<VarDef<'a>> = Vec::new();
    let mut changed = false;
    let rewritten = hoist_in_list(stmts, arena, &mut collected, &mut changed);
    if collected.is_empty() {
        return (stmts, false);
    }
    let mut out = Vec::with_capacity(rewritten.len() + 1);
    out.push(Stmt::VarDecl { kind: DeclKind::Var, decls: arena.alloc_var_defs(collected) });
    out.extend(rewritten);
    (arena.alloc_stmts(out), true)
}

fn ident_var(sym: &Symbol) -> VarDef<'static> {
    VarDef { name: Pattern::Ident(Symbol::new(sym.name, sym.kind)), init: None }
}

fn hoist_in_list<'a>(
    stmts: &'a [Stmt<'a>],
    arena: &'a AstArena<'a>,
    collected: &mut Vec<VarDef<'a>>,
    changed: &mut bool,
) -> Vec<Stmt<'a>> {
    let mut out = Vec::with_capacity(stmts.len());
    for stmt in stmts.iter() {
        match stmt {
            Stmt::VarDecl { kind: DeclKind::Var, decls } if decls.iter().all(|d| matches!(d.name, Pattern::Ident(_))) => {
                *changed = true;
                for d in decls.iter() {
                    if let Pattern::Ident(sym) = &d.name {
                        collected.push(ident_var(sym));
                        if let Some(init) = d.init {
                            out.push(assign_stmt(arena, sym, init));
                        }
                    }
                }
            }
            Stmt::Block(body) => {
                out.push(Stmt::Block(arena.alloc_stmts(hoist_in_list(body, arena, collected, changed))));
            }
            Stmt::If { test, cons, alt } => {
                let new_cons = hoist_in_stmt(cons, arena, collected, changed);
                let new_alt = alt.map(|a| hoist_in_stmt(a, arena, collected, changed));
                out.push(Stmt::If { test, cons: new_cons, alt: new_alt });
            }
            Stmt::While { test, body } => {
                out.push(Stmt::While { test, body: hoist_in_stmt(body, arena, collected, changed) });
            }
            Stmt::Do { body, test } => {
                out.push(Stmt::Do { body: hoist_in_stmt(body, arena, collected, changed), test });
            }
            Stmt::For { init, test, update, body } => {
                let new_body = hoist_in_stmt(body, arena, collected, changed);
                let new_init = hoist_for_init(init, arena, collected, changed);
                out.push(Stmt::For { init: new_init, test: *test, update: *update, body: new_body });
            }
            Stmt::ForIn { target, object, body } => {
                let new_body = hoist_in_stmt(body, arena, collected, changed);
                let new_target = hoist_for_target(target, collected, changed);
                out.push(Stmt::ForIn { target: new_target, object, body: new_body });
            }
            Stmt::ForOf { target, object, body, is_await } => {
                let new_body = hoist_in_stmt(body, arena, collected, changed);
                let new_target = hoist_for_target(target, collected, changed);
                out.push(Stmt::ForOf { target: new_target, object, body: new_body, is_await: *is_await });
            }
            Stmt::With { object, body } => {
                out.push(Stmt::With { object, body: hoist_in_stmt(body, arena, collected, changed) });
            }
            Stmt::Labeled { label, body } => {
                out.push(Stmt::Labeled { label: *label, body: hoist_in_stmt(body, arena, collected, changed) });
            }
            Stmt::Switch { discriminant, cases } => {
                let new_cases: Vec<jsbundle_ast::SwitchCase<'a>> = cases
                    .iter()
                    .map(|c| jsbundle_ast::SwitchCase {
                        test: c.test,
                        body: arena.alloc_stmts(hoist_in_list(c.body, arena, collected, changed)),
                    })
                    .collect();
                out.push(Stmt::Switch { discriminant, cases: arena.alloc_switch_cases(new_cases) });
            }
            Stmt::Try { block, handler, finalizer } => {
                let new_block = arena.alloc_stmts(hoist_in_list(block, arena, collected, changed));
                let new_handler = handler.as_ref().map(|h| jsbundle_ast::CatchClause {
                    param: h.param.as_ref().map(jsbundle_ast::transform::clone_pattern_shallow),
                    body: arena.alloc_stmts(hoist_in_list(h.body, arena, collected, changed)),
                    scope: h.scope,
                });
                let new_finalizer = finalizer.map(|f| arena.alloc_stmts(hoist_in_list(f, arena, collected, changed)));
                out.push(Stmt::Try { block: new_block, handler: new_handler, finalizer: new_finalizer });
            }
            other => out.push(clone_stmt_shallow(other)),
        }
    }
    out
}

fn hoist_in_stmt<'a>(
    stmt: &'a Stmt<'a>,
    arena: &'a AstArena<'a>,
    collected: &mut Vec<VarDef<'a>>,
    changed: &mut bool,
) -> &'a Stmt<'a> {
    let single = std::slice::from_ref(stmt);
    let mut rewritten = hoist_in_list(single, arena, collected, changed);
    match rewritten.len() {
        0 => arena.alloc_stmt(Stmt::Empty),
        1 => arena.alloc_stmt(rewritten.pop().unwrap()),
        _ => arena.alloc_stmt(Stmt::Block(arena.alloc_stmts(rewritten))),
    }
}

fn hoist_for_init<'a>(
    init: &Option<ForInit<'a>>,
    arena: &'a AstArena<'a>,
    collected: &mut Vec<VarDef<'a>>,
    changed: &mut bool,
) -> Option<ForInit<'a>> {
    match init {
        Some(ForInit::VarDecl { kind: DeclKind::Var, decls }) if decls.iter().all(|d| matches!(d.name, Pattern::Ident(_))) => {
            *changed = true;
            let mut assigns = Vec::new();
            for d in decls.iter() {
                if let Pattern::Ident(sym) = &d.name {
                    collected.push(ident_var(sym));
                    if let Some(init_expr) = d.init {
                        assigns.push(assign_expr(arena, sym, init_expr));
                    }
                }
            }
            match assigns.len() {
                0 => None,
                1 => Some(ForInit::Expr(arena.alloc_expr(assigns.into_iter().next().unwrap()))),
                _ => Some(ForInit::Expr(arena.alloc_expr(Expr::Sequence(arena.alloc_exprs(assigns))))),
            }
        }
        Some(ForInit::VarDecl { kind, decls }) => Some(ForInit::VarDecl { kind: *kind, decls }),
        Some(ForInit::Expr(e)) => Some(ForInit::Expr(e)),
        None => None,
    }
}

fn hoist_for_target<'a>(target: &ForTarget<'a>, collected: &mut Vec<VarDef<'a>>, changed: &mut bool) -> ForTarget<'a> {
    match target {
        ForTarget::VarDecl { kind: DeclKind::Var, pattern: Pattern::Ident(sym) } => {
            *changed = true;
            collected.push(ident_var(sym));
            ForTarget::Pattern(Pattern::Ident(Symbol::new(sym.name, sym.kind)))
        }
        other => clone_for_target(other),
    }
}

fn assign_expr<'a>(arena: &'a AstArena<'a>, sym: &Symbol, init: &'a Expr<'a>) -> Expr<'a> {
    let target = arena.alloc_expr(Expr::Ident(Symbol::new(sym.name, sym.kind)));
    Expr::Assign { op: AssignOp::Assign, target, value: init, span: Span::default() }
}

fn assign_stmt<'a>(arena: &'a AstArena<'a>, sym: &Symbol, init: &'a Expr<'a>) -> Stmt<'a> {
    Stmt::Simple(arena.alloc_expr(assign_expr(arena, sym, init)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsbundle_ast::SymbolKind;

    #[test]
    fn truncates_dead_code_after_return() {
        let arena = AstArena::new();
        let stmts = arena.alloc_stmts(vec![Stmt::Return { arg: None }, Stmt::Debugger]);
        let (out, changed) = compress_returns(stmts, &arena);
        assert!(changed);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn drops_trailing_bare_return() {
        let arena = AstArena::new();
        let stmts = arena.alloc_stmts(vec![Stmt::Debugger, Stmt::Return { arg: None }]);
        let (out, changed) = compress_returns(stmts, &arena);
        assert!(changed);
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Stmt::Debugger));
    }

    #[test]
    fn hoists_var_with_initializer_to_top() {
        let arena = AstArena::new();
        let sym = Symbol::new(jsbundle_base::Name::default(), SymbolKind::Var);
        let init = arena.alloc_expr(Expr::Number { value: 1.0, raw: "1" });
        let decls = arena.alloc_var_defs(vec![VarDef { name: Pattern::Ident(sym), init: Some(init) }]);
        let stmts = arena.alloc_stmts(vec![Stmt::VarDecl { kind: DeclKind::Var, decls }]);
        let (out, changed) = hoist_vars(stmts, &arena);
        assert!(changed);
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0], Stmt::VarDecl { kind: DeclKind::Var, .. }));
        assert!(matches!(out[1], Stmt::Simple(_)));
    }

    #[test]
    fn hoists_var_out_of_nested_if() {
        let arena = AstArena::new();
        let sym = Symbol::new(jsbundle_base::Name::default(), SymbolKind::Var);
        let decls = arena.alloc_var_defs(vec![VarDef { name: Pattern::Ident(sym), init: None }]);
        let inner = arena.alloc_stmt(Stmt::VarDecl { kind: DeclKind::Var, decls });
        let test = arena.alloc_expr(Expr::True);
        let if_stmt = arena.alloc_stmt(Stmt::If { test, cons: inner, alt: None });
        let mut collected = Vec::new();
        let mut changed = false;
        let rewritten = hoist_in_list(std::slice::from_ref(if_stmt), &arena, &mut collected, &mut changed);
        assert!(changed);
        assert_eq!(collected.len(), 1);
        match &rewritten[0] {
            Stmt::If { cons, .. } => assert!(matches!(cons, Stmt::Empty)),
            _ => panic!("expected an If node"),
        }
    }
}
