//! Optional final-pass symbol shortening (`BundlerConfig::mangle`).
//!
//! Runs after [`crate::linker`]'s collision-resolution phase, over the same
//! `global_taken` namespace that phase built, so a mangled name can never
//! collide with a name collision-resolution already settled on (or with an
//! earlier file's own mangled names). Every root-scope binding gets a fresh
//! short name from [`ShortNameGen`] in declaration order; the synthesized
//! whole-export binding is skipped, same as collision resolution, since its
//! name is already the shortest stable handle another file's rewrite holds
//! a reference to.

use crate::rename;
use crate::source_file::SourceFile;
use jsbundle_ast::{AstArena, SymbolId};
use jsbundle_base::Interner;
use std::collections::HashSet;

const RESERVED: &[&str] = &[
    "in", "do", "if", "is", "as", "of", "for", "new", "try", "var", "let",
    "this", "void", "with", "case", "else", "enum", "null", "true", "false",
    "break", "catch", "class", "const", "super", "throw", "while", "yield",
    "delete", "export", "import", "public", "return", "static", "switch",
    "typeof", "default", "extends", "finally", "package", "private",
    "continue", "debugger", "function", "arguments", "interface", "protected",
    "instanceof", "implements",
];

/// Generates `a, b, ..., z, A, ..., Z, $, _, aa, ab, ...` short identifiers,
/// skipping anything already claimed and ECMAScript reserved words.
pub struct ShortNameGen {
    alphabet: Vec<char>,
    counter: u64,
}

impl ShortNameGen {
    fn new() -> Self {
        let alphabet: Vec<char> = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ$_".chars().collect();
        ShortNameGen { alphabet, counter: 0 }
    }

    fn render(&self, mut n: u64) -> String {
        let base = self.alphabet.len() as u64;
        let mut out = Vec::new();
        loop {
            out.push(self.alphabet[(n % base) as usize]);
            n /= base;
            if n == 0 {
                break;
            }
            n -= 1;
        }
        out.iter().rev().collect()
    }

    fn next(&mut self, taken: &HashSet<String>) -> String {
        loop {
            let candidate = self.render(self.counter);
            self.counter += 1;
            if !RESERVED.contains(&candidate.as_str()) && !taken.contains(&candidate) {
                return candidate;
            }
        }
    }
}

/// Shortens every root-scope user binding in `file` to a fresh, globally
/// unique identifier, threading `global_taken`/`gen` across files so the
/// whole merged bundle gets one shared short-name sequence rather than each
/// file restarting from `a`.
pub fn mangle_file<'a>(
    file: &mut SourceFile<'a>,
    shared: &mut Interner,
    global_taken: &mut HashSet<String>,
    gen: &mut ShortNameGen,
    arena: &'a AstArena<'a>,
) {
    let scope = file.program.scope;
    let candidates: Vec<SymbolId> = file
        .table
        .defs()
        .iter()
        .enumerate()
        .filter(|(i, def)| def.scope == scope && Some(SymbolId(*i as u32)) != file.whole_export)
        .map(|(i, _)| SymbolId(i as u32))
        .collect();

    for id in candidates {
        let short = gen.next(global_taken);
        global_taken.insert(short.clone());
        let new_name = shared.intern(&short);
        file.program.body = rename::rename_symbol(file.program.body, arena, id, new_name);
        file.table.def_mut(id).name = new_name;
    }
}

pub fn new_generator() -> ShortNameGen {
    ShortNameGen::new()
}
