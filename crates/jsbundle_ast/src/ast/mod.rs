//! The AST node taxonomy, split one file per syntactic category.

pub mod expr;
pub mod module;
pub mod ops;
pub mod pattern;
pub mod stmt;
pub mod symbol;

pub use expr::{
    ArrayElement, ClassMember, ClassNode, Expr, FunctionBody, FunctionNode, MethodKind, Prop,
    PropKey, PropKind, PropValue, TemplateChunk,
};
pub use module::{DefaultExport, ExportNode, ExportedDecl, ImportNode, NameMapping};
pub use ops::{AssignOp, BinOp, UnaryOp};
pub use pattern::{ObjectPatternProp, Pattern};
pub use stmt::{CatchClause, DeclKind, ForInit, ForTarget, Stmt, SwitchCase, VarDef};
pub use symbol::{ScopeId, Symbol, SymbolId, SymbolKind};

/// A full parsed module, as handed off to the scope analyzer.
#[derive(Debug)]
pub struct Program<'a> {
    pub body: &'a [Stmt<'a>],
    pub scope: ScopeId,
    pub source_type: SourceType,
}

/// Whether a file was parsed under the module grammar (`import`/`export`
/// allowed, implicit strict mode) or the classic script grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Script,
    Module,
}
