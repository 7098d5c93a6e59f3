//! Symbol occurrences and the scope/definition handles they reference.
//!
//! `Symbol` nodes (identifier occurrences) and `SymbolDef`s (variable
//! identities) are split across crates: this crate owns the occurrence
//! (`Symbol`) and the opaque handles (`SymbolId`, `ScopeId`); `jsbundle_scope`
//! owns the definition table the handles index into. This mirrors the
//! bump-arena-plus-integer-handle encoding described for `SymbolDef ↔ Symbol`
//! back-edges: a `Symbol` node is exclusively owned by its parent in the
//! tree, while `Thedef` is a weak, resolved-after-parse reference.

use jsbundle_base::Name;
use std::cell::Cell;

/// Opaque handle into the scope analyzer's `SymbolDef` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

/// Opaque handle into the scope analyzer's `Scope` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// The syntactic role a `Symbol` occurrence plays, used by the scope
/// analyzer to decide hoisting, collision, and pinning behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Let,
    Const,
    Funarg,
    Defun,
    Lambda,
    Catch,
    Import,
    ImportForeign,
    Export,
    ExportForeign,
    Method,
    Declaration,
}

/// An identifier occurrence in the AST.
///
/// `thedef` starts unresolved (`None`) as produced by the parser and is
/// filled in by the scope analyzer; it stays `None` forever only if the
/// identifier refers to a free global (spec §3 invariant).
#[derive(Debug)]
pub struct Symbol {
    pub name: Name,
    pub kind: SymbolKind,
    pub thedef: Cell<Option<SymbolId>>,
}

impl Symbol {
    pub fn new(name: Name, kind: SymbolKind) -> Self {
        Self { name, kind, thedef: Cell::new(None) }
    }

    pub fn is_resolved(&self) -> bool {
        self.thedef.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsbundle_base::Interner;

    #[test]
    fn new_symbol_is_unresolved() {
        let mut interner = Interner::new();
        let name = interner.intern("x");
        let sym = Symbol::new(name, SymbolKind::Var);
        assert!(!sym.is_resolved());
    }

    #[test]
    fn resolving_sets_thedef() {
        let mut interner = Interner::new();
        let name = interner.intern("x");
        let sym = Symbol::new(name, SymbolKind::Var);
        sym.thedef.set(Some(SymbolId(3)));
        assert!(sym.is_resolved());
        assert_eq!(sym.thedef.get(), Some(SymbolId(3)));
    }
}
