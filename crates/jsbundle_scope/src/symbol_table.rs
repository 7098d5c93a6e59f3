//! `SymbolDef` and `Scope` tables: the definition side of the `Symbol ↔
//! SymbolDef` split described in `jsbundle_ast::ast::symbol` — this crate
//! owns what `Symbol.thedef` points at.
//!
//! Grounded on the teacher's `logicaffeine_language::scope::ScopeStack`
//! (`Vec<HashMap<String, Entry>>` with `push_scope`/`pop_scope`/`bind`/
//! `lookup`), generalized from an ephemeral codegen stack to a persistent,
//! integer-handle-indexed table: results must outlive the traversal that
//! built them, so scopes and defs live in flat `Vec`s addressed by
//! `ScopeId`/`SymbolId` rather than a stack that unwinds.

use jsbundle_ast::{ScopeId, SymbolId, SymbolKind};
use jsbundle_base::Name;
use std::collections::{HashMap, HashSet};

/// What kind of lexical boundary a [`Scope`] represents. Only
/// `Function`/`Global`/`Module` are hoist targets for `var`/function
/// declarations; the rest are plain lexical (block) scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Module,
    Function,
    Block,
    Catch,
}

impl ScopeKind {
    pub fn is_hoist_target(self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::Module | ScopeKind::Function)
    }
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    names: HashMap<Name, SymbolId>,
    /// Symbols declared in an ancestor scope but referenced from within
    /// this scope or a descendant of it (spec's `Enclosed` set).
    pub enclosed: HashSet<SymbolId>,
    /// Set once a `with` statement or a call to `eval` is seen directly in
    /// this scope: disables the compressor's variable-renaming/removal
    /// passes for every symbol this scope (or an ancestor) can see.
    pub pinned: bool,
}

impl Scope {
    pub fn get(&self, name: Name) -> Option<SymbolId> {
        self.names.get(&name).copied()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolUsage {
    pub reads: u32,
    pub writes: u32,
}

impl SymbolUsage {
    pub fn is_unreferenced(&self) -> bool {
        self.reads == 0 && self.writes == 0
    }
}

#[derive(Debug)]
pub struct SymbolDef {
    pub name: Name,
    pub kind: SymbolKind,
    pub scope: ScopeId,
    pub usage: SymbolUsage,
}

impl SymbolDef {
    pub fn unreferenced(&self) -> bool {
        self.usage.is_unreferenced()
    }
}

/// The analyzer's output: every scope and every symbol definition it
/// resolved, addressable by the opaque handles `jsbundle_ast::Symbol`
/// occurrences carry in `thedef`.
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    defs: Vec<SymbolDef>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope { kind, parent, names: HashMap::new(), enclosed: HashSet::new(), pinned: false });
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn def(&self, id: SymbolId) -> &SymbolDef {
        &self.defs[id.0 as usize]
    }

    pub fn def_mut(&mut self, id: SymbolId) -> &mut SymbolDef {
        &mut self.defs[id.0 as usize]
    }

    pub fn defs(&self) -> &[SymbolDef] {
        &self.defs
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Binds a new name in `scope`. Returns the existing definition instead
    /// of rebinding if `name` is already declared there — callers decide
    /// whether that's a hard error (`let`/`const`/`class`) or expected
    /// (`var`/function re-declaration, duplicate params).
    pub fn declare(&mut self, scope: ScopeId, name: Name, kind: SymbolKind) -> Result<SymbolId, SymbolId> {
        if let Some(existing) = self.scopes[scope.0 as usize].get(name) {
            return Err(existing);
        }
        let id = SymbolId(self.defs.len() as u32);
        self.defs.push(SymbolDef { name, kind, scope, usage: SymbolUsage::default() });
        self.scopes[scope.0 as usize].names.insert(name, id);
        Ok(id)
    }

    /// Declares `name` in `scope`, reusing an existing binding there
    /// instead of erroring. Used for `var` hoisting (`var x; var x;` binds
    /// once) and function-declaration re-entry.
    pub fn declare_or_reuse(&mut self, scope: ScopeId, name: Name, kind: SymbolKind) -> SymbolId {
        match self.declare(scope, name, kind) {
            Ok(id) => id,
            Err(existing) => existing,
        }
    }

    /// Walks the scope chain from `scope` up to the root looking for
    /// `name`. Every scope strictly between `scope` and the one that owns
    /// the binding has the resolved id added to its `enclosed` set.
    pub fn resolve(&mut self, scope: ScopeId, name: Name) -> Option<SymbolId> {
        let mut visited = Vec::new();
        let mut cur = Some(scope);
        while let Some(id) = cur {
            if let Some(def) = self.scopes[id.0 as usize].get(name) {
                for s in visited {
                    self.scopes[s].enclosed.insert(def);
                }
                return Some(def);
            }
            visited.push(id.0 as usize);
            cur = self.scopes[id.0 as usize].parent;
        }
        None
    }

    /// The nearest ancestor scope (including `scope` itself) that is a
    /// hoist target, i.e. where `var`/function declarations land.
    pub fn nearest_hoist_target(&self, scope: ScopeId) -> ScopeId {
        let mut cur = scope;
        loop {
            if self.scopes[cur.0 as usize].kind.is_hoist_target() {
                return cur;
            }
            match self.scopes[cur.0 as usize].parent {
                Some(p) => cur = p,
                None => return cur,
            }
        }
    }

    /// Marks `scope` and every ancestor up to (and including) its nearest
    /// hoist target as pinned, per `with`/`eval`'s spec'd retention effect.
    pub fn pin_up_to_hoist_target(&mut self, scope: ScopeId) {
        let mut cur = scope;
        loop {
            self.scopes[cur.0 as usize].pinned = true;
            if self.scopes[cur.0 as usize].kind.is_hoist_target() {
                return;
            }
            match self.scopes[cur.0 as usize].parent {
                Some(p) => cur = p,
                None => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_finds_parent_binding_and_marks_enclosed() {
        let mut table = SymbolTable::new();
        let global = table.push_scope(ScopeKind::Global, None);
        let name = Name::default();
        let def = table.declare(global, name, SymbolKind::Var).unwrap();
        let inner = table.push_scope(ScopeKind::Block, Some(global));
        assert_eq!(table.resolve(inner, name), Some(def));
        assert!(table.scope(inner).enclosed.contains(&def));
    }

    #[test]
    fn declare_twice_in_same_scope_errors() {
        let mut table = SymbolTable::new();
        let global = table.push_scope(ScopeKind::Global, None);
        let name = Name::default();
        table.declare(global, name, SymbolKind::Let).unwrap();
        assert!(table.declare(global, name, SymbolKind::Let).is_err());
    }

    #[test]
    fn declare_or_reuse_is_idempotent() {
        let mut table = SymbolTable::new();
        let global = table.push_scope(ScopeKind::Global, None);
        let name = Name::default();
        let a = table.declare_or_reuse(global, name, SymbolKind::Var);
        let b = table.declare_or_reuse(global, name, SymbolKind::Var);
        assert_eq!(a, b);
    }

    #[test]
    fn nearest_hoist_target_skips_blocks() {
        let mut table = SymbolTable::new();
        let global = table.push_scope(ScopeKind::Global, None);
        let func = table.push_scope(ScopeKind::Function, Some(global));
        let block = table.push_scope(ScopeKind::Block, Some(func));
        assert_eq!(table.nearest_hoist_target(block), func);
    }
}
