//! The per-file state a module graph link carries from first read to
//! final emission.
//!
//! Grounded on `logicaffeine_compile::compile::SourceFile` (the teacher's
//! own "one file through a pipeline of states" entity) and the source
//! model's `Unparsed -> Parsed -> Analyzed -> ExportsComputed ->
//! WholeExportSynthesized? -> Rewritten -> Emitted` lifecycle: transitions
//! are monotonic and tracked here as a plain enum rather than separate
//! wrapper types per state, since every phase still needs read access to
//! everything discovered by earlier phases.

use jsbundle_ast::{Program, SymbolId};
use jsbundle_base::{Interner, Name};
use jsbundle_scope::SymbolTable;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceFileState {
    Unparsed,
    Parsed,
    Analyzed,
    ExportsComputed,
    WholeExportSynthesized,
    Rewritten,
    Emitted,
}

/// One binding this file exports, either a genuine local symbol or a
/// re-export that never creates a binding of its own.
#[derive(Debug, Clone)]
pub enum SelfExport<'a> {
    /// `exports.k = <symbol>` / `export { x as k }` — `k` resolves to a
    /// symbol defined in this file.
    Binding { exported_as: Name, symbol_id: SymbolId },
    /// `module.exports.k = 1` / `exports.k = "literal"` where the exported
    /// value is not itself a symbol reference — the initializing value is
    /// inlined wherever the export is imported instead of rewritten to a
    /// symbol reference.
    Literal { exported_as: Name, value: &'a jsbundle_ast::Expr<'a> },
    /// `export * from "./other"`.
    ReexportAll { from: String },
}

/// A `var x = require("M")` (or `import * as x from "M"`) binding site
/// discovered during discovery, carried forward so the rewrite phase knows
/// which local symbol stands for which resolved module without re-scanning.
#[derive(Debug, Clone)]
pub struct RequireBinding {
    pub local_symbol: SymbolId,
    pub resolved_module: String,
    /// `true` for `import * as x from "M"` / a cross-bundle requirer that
    /// needs the whole namespace object, as opposed to only individual
    /// `x.prop` accesses.
    pub needs_whole_export: bool,
    /// `Some(prop)` for a named/default ESM import (`import {a} from "M"`,
    /// `import a from "M"`) — the local binding stands directly for `M`'s
    /// export named `prop` (the empty `Name` sentinel for `default`), the
    /// same way a CommonJS `x.prop` access does, rather than for `M`'s
    /// whole namespace object. `None` for a plain `var x = require("M")`,
    /// where only a later `x.prop` access (tracked separately) pins down
    /// which property is meant.
    pub imported_name: Option<Name>,
}

pub struct SourceFile<'a> {
    pub name: String,
    pub program: Program<'a>,
    pub interner: Interner,
    pub table: SymbolTable,
    pub state: SourceFileState,

    pub requires: Vec<String>,
    pub lazy_requires: Vec<String>,
    pub require_bindings: Vec<RequireBinding>,
    pub self_exports: Vec<SelfExport<'a>>,
    /// The forward-declared `name -> exported value` map built out of
    /// `self_exports` once every file's discovery pass has run (so a
    /// `ReexportAll` can be flattened against the target file's own map).
    pub exports: HashMap<Name, SelfExport<'a>>,

    pub whole_export: Option<SymbolId>,
    pub needs_whole_export: bool,
    pub needs_whole_imports_from: HashSet<String>,

    pub split: Option<String>,
}

impl<'a> SourceFile<'a> {
    pub fn new(name: String, program: Program<'a>, interner: Interner, table: SymbolTable) -> Self {
        SourceFile {
            name,
            program,
            interner,
            table,
            state: SourceFileState::Parsed,
            requires: Vec::new(),
            lazy_requires: Vec::new(),
            require_bindings: Vec::new(),
            self_exports: Vec::new(),
            exports: HashMap::new(),
            whole_export: None,
            needs_whole_export: false,
            needs_whole_imports_from: HashSet::new(),
            split: None,
        }
    }
}
