//! Scope and symbol analysis: resolves every `Symbol` a parsed [`Program`]
//! contains against a [`SymbolTable`], the definition side of the
//! `Symbol`/`SymbolId` split `jsbundle_ast` describes but doesn't itself
//! populate.

pub mod analyzer;
pub mod symbol_table;

pub use analyzer::analyze;
pub use symbol_table::{Scope, ScopeKind, SymbolDef, SymbolTable, SymbolUsage};
