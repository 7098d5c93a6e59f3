//! Statement node taxonomy.

use crate::ast::expr::{ClassNode, Expr, FunctionNode};
use crate::ast::module::{ExportNode, ImportNode};
use crate::ast::pattern::Pattern;
use crate::ast::symbol::ScopeId;
use jsbundle_base::Name;

#[derive(Debug)]
pub enum Stmt<'a> {
    If { test: &'a Expr<'a>, cons: &'a Stmt<'a>, alt: Option<&'a Stmt<'a>> },
    While { test: &'a Expr<'a>, body: &'a Stmt<'a> },
    Do { body: &'a Stmt<'a>, test: &'a Expr<'a> },
    For { init: Option<ForInit<'a>>, test: Option<&'a Expr<'a>>, update: Option<&'a Expr<'a>>, body: &'a Stmt<'a> },
    ForIn { target: ForTarget<'a>, object: &'a Expr<'a>, body: &'a Stmt<'a> },
    ForOf { target: ForTarget<'a>, object: &'a Expr<'a>, body: &'a Stmt<'a>, is_await: bool },
    Switch { discriminant: &'a Expr<'a>, cases: &'a [SwitchCase<'a>] },
    Try { block: &'a [Stmt<'a>], handler: Option<CatchClause<'a>>, finalizer: Option<&'a [Stmt<'a>]> },
    Throw { arg: &'a Expr<'a> },
    Return { arg: Option<&'a Expr<'a>> },
    Break { label: Option<Name> },
    Continue { label: Option<Name> },
    Labeled { label: Name, body: &'a Stmt<'a> },
    Block(&'a [Stmt<'a>]),
    Empty,
    /// An expression used as a statement (spec §3's `SimpleStatement`).
    Simple(&'a Expr<'a>),
    With { object: &'a Expr<'a>, body: &'a Stmt<'a> },
    Debugger,
    VarDecl { kind: DeclKind, decls: &'a [VarDef<'a>] },
    FunctionDecl(&'a FunctionNode<'a>),
    ClassDecl(&'a ClassNode<'a>),
    Import(&'a ImportNode<'a>),
    Export(&'a ExportNode<'a>),
}

/// The head of a C-style `for` loop's initializer clause.
#[derive(Debug)]
pub enum ForInit<'a> {
    VarDecl { kind: DeclKind, decls: &'a [VarDef<'a>] },
    Expr(&'a Expr<'a>),
}

/// The binding target of a `for-in`/`for-of` loop head: either a fresh
/// declaration or an existing assignable expression/pattern.
#[derive(Debug)]
pub enum ForTarget<'a> {
    VarDecl { kind: DeclKind, pattern: Pattern<'a> },
    Pattern(Pattern<'a>),
}

#[derive(Debug)]
pub struct SwitchCase<'a> {
    /// `None` for the `default:` clause.
    pub test: Option<&'a Expr<'a>>,
    pub body: &'a [Stmt<'a>],
}

#[derive(Debug)]
pub struct CatchClause<'a> {
    pub param: Option<Pattern<'a>>,
    pub body: &'a [Stmt<'a>],
    pub scope: ScopeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

#[derive(Debug)]
pub struct VarDef<'a> {
    pub name: Pattern<'a>,
    pub init: Option<&'a Expr<'a>>,
}
