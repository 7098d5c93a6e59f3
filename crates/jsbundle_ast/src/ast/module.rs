//! Import/export declarations consumed by the bundler's linking passes
//! (spec §5.6).

use crate::ast::expr::{ClassNode, FunctionNode};
use crate::ast::symbol::Symbol;
use jsbundle_base::Name;

/// A local binding introduced or re-exported under a possibly different
/// external name, e.g. `import { foo as bar } from "./a"` or
/// `export { x as y }`.
#[derive(Debug)]
pub struct NameMapping {
    pub foreign_name: Name,
    pub local: Symbol,
}

#[derive(Debug)]
pub enum ImportNode<'a> {
    /// `import defaultExport from "module"`.
    Default { local: Symbol, module: &'a str },
    /// `import * as ns from "module"`.
    Namespace { local: Symbol, module: &'a str },
    /// `import { a, b as c } from "module"`.
    Named { specifiers: &'a [NameMapping], module: &'a str },
    /// `import "module"` — evaluated for side effects only.
    Bare { module: &'a str },
}

#[derive(Debug)]
pub enum ExportNode<'a> {
    /// `export { a, b as c }` with no module specifier.
    Named { specifiers: &'a [NameMapping] },
    /// `export { a, b as c } from "module"` — a re-export that never binds
    /// the name locally in this module.
    NamedFrom { specifiers: &'a [NameMapping], module: &'a str },
    /// `export * from "module"`.
    All { module: &'a str },
    /// `export * as ns from "module"`.
    AllAs { local: Name, module: &'a str },
    /// `export default <expr|function|class>`.
    Default(DefaultExport<'a>),
    /// `export const x = 1`, `export function f() {}`, `export class C {}`.
    Declaration(ExportedDecl<'a>),
}

#[derive(Debug)]
pub enum DefaultExport<'a> {
    Function(&'a FunctionNode<'a>),
    Class(&'a ClassNode<'a>),
    Expr(&'a crate::ast::expr::Expr<'a>),
}

#[derive(Debug)]
pub enum ExportedDecl<'a> {
    Function(&'a FunctionNode<'a>),
    Class(&'a ClassNode<'a>),
    Var { kind: crate::ast::stmt::DeclKind, decls: &'a [crate::ast::stmt::VarDef<'a>] },
}
