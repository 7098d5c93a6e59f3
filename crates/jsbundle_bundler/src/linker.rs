//! The bundler's top-level driver: discovery, split assignment, export
//! flattening, cross-file re-interning, whole-export synthesis,
//! collision-free renaming, rewriting, compressing and emitting, in that
//! fixed order.
//!
//! Grounded on the teacher's `logicaffeine_compile::link` driving a module
//! graph through one fixed phase order, generalized from its single-bundle
//! CommonJS shape to many splits and mixed CommonJS/ESM input.

use crate::discovery;
use crate::global_defines::{self, DefineValue};
use crate::host::{HostContext, Printer};
use crate::mangle;
use crate::reintern;
use crate::rename;
use crate::rewrite::{BindingRef, BundlerTreeTransformer, ModuleExports};
use crate::source_file::{SelfExport, SourceFile};
use crate::split::{self, SplitInfo};
use crate::whole_export;
use jsbundle_ast::{AstArena, SourceType, Stmt, SymbolId};
use jsbundle_base::{ErrorKind, Interner, JsError, Name, Span};
use jsbundle_compress::ICompressOptions;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// The printer's own rendering knob (spec.md §6's `OutputOptions`):
/// carried on [`BundlerConfig`] purely so a host can read it back out of the
/// same config its [`Printer`] was built from — the bundler never inspects
/// it, since pretty-printing is entirely the host's concern.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OutputOptions {
    pub beautify: bool,
}

/// The identifier text for the runtime loader [`crate::rewrite`]'s rule 5
/// rewrites `import("M")` to call, and for the `.then` property its forced-
/// split trampolines chain off of.
const IMPORT_FN: &str = "__import";
const THEN_PROP: &str = "then";

/// Caller-supplied knobs for one link run: the entry points per split (per
/// [`crate::split`], keyed by split name, [`MAIN_SPLIT`] for the
/// application's own entries) and the compressor settings to run over every
/// file's rewritten body before emission.
#[derive(Debug, Clone)]
pub struct BundlerConfig {
    pub part_to_main_files: HashMap<String, Vec<String>>,
    /// `name -> constant` substituted for every free (unresolved) identifier
    /// matching `name`, before compression, so constant-guarded dead code
    /// (`if (process.env.NODE_ENV === "production")`) can fold away.
    pub global_defines: HashMap<String, DefineValue>,
    /// Shortens every root-scope binding to a short generated name after
    /// collision resolution.
    pub mangle: bool,
    pub compress: ICompressOptions,
    pub output: OutputOptions,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        BundlerConfig {
            part_to_main_files: HashMap::new(),
            global_defines: HashMap::new(),
            mangle: false,
            compress: ICompressOptions::default(),
            output: OutputOptions::default(),
        }
    }
}

/// Links the module graph reachable from `config.part_to_main_files` and
/// writes one finished bundle per split via `host.write_bundle`.
pub struct Bundler<'a, 'h> {
    arena: &'a AstArena<'a>,
    host: &'h dyn HostContext,
    printer: &'h dyn Printer,
    config: BundlerConfig,
}

impl<'a, 'h> Bundler<'a, 'h> {
    pub fn new(
        arena: &'a AstArena<'a>,
        host: &'h dyn HostContext,
        printer: &'h dyn Printer,
        config: BundlerConfig,
    ) -> Self {
        Bundler { arena, host, printer, config }
    }

    pub fn link(&self) -> Result<(), JsError> {
        let arena = self.arena;

        // Phase 1: discover every file reachable from a declared entry.
        let (mut files, discovery_order) = self.discover_all()?;
        debug!("discovery complete: {} file(s)", discovery_order.len());

        // Phase 2: assign each discovered file to a split.
        let (owner, splits) = split::assign_splits(
            &self.config.part_to_main_files,
            |name| files.get(name).map(|f| f.requires.clone()).unwrap_or_default(),
            |name| files.get(name).map(|f| f.lazy_requires.clone()).unwrap_or_default(),
        );
        debug!("split assignment complete: {} split(s)", splits.len());

        // Phase 3: move every file's tree (and its own recorded exports)
        // into one shared Interner, so a cross-file reference built later
        // prints under the same namespace no matter which file it lives in.
        let mut shared = Interner::new();
        for name in &discovery_order {
            let file = files.get_mut(name).expect("just discovered");
            let rebuilt = reintern::reintern_tree(file.program.body, arena, &file.interner, &mut shared);
            file.program.body = rebuilt;
            let mut cache = HashMap::new();
            file.self_exports = reintern::reintern_self_exports(&file.self_exports, &file.interner, &mut shared, &mut cache);
        }
        trace!("re-interned every file into a shared namespace");

        // Phase 4: flatten `export * from "M"` chains into each file's own
        // `name -> export` map, now that every file's Names agree.
        flatten_reexports(&mut files, &discovery_order);

        // Phase 5: synthesize a namespace object for every file some other
        // file needs as a whole, now that `exports` is fully flattened.
        let whole_export_names = synthesize_whole_exports(&mut files, &discovery_order, &mut shared, arena);
        debug!("export materialization complete: {} whole-export namespace(s)", whole_export_names.len());

        // Phase 6: rename any top-level user binding that collides, across
        // files, with one already installed under the same text.
        let mut global_taken: HashSet<String> = HashSet::new();
        for (_, (name, _)) in whole_export_names.iter() {
            global_taken.insert(shared.resolve(*name).to_string());
        }
        for name in &discovery_order {
            let file = files.get_mut(name).expect("just discovered");
            resolve_collisions(file, &mut shared, &mut global_taken, arena);
        }

        // Phase 6b: optionally shorten every surviving root-scope binding,
        // sharing `global_taken` so a mangled name never re-collides with
        // one collision resolution just settled on.
        if self.config.mangle {
            let mut gen = mangle::new_generator();
            for name in &discovery_order {
                let file = files.get_mut(name).expect("just discovered");
                mangle::mangle_file(file, &mut shared, &mut global_taken, &mut gen, arena);
            }
        }

        // Phase 7: rewrite every require/import site against the finished
        // merge plan, then run the compressor over the result.
        let exports_by_file: HashMap<String, HashMap<Name, SelfExport<'a>>> =
            files.iter().map(|(k, v)| (k.clone(), v.exports.clone())).collect();
        let no_forced_lazy: Vec<String> = Vec::new();
        let modules: HashMap<String, ModuleExports<'a, '_>> = files
            .keys()
            .map(|name| {
                let owning_split = owner.get(name).map(|s| s.as_str());
                let split_info = owning_split.and_then(|s| splits.get(s));
                let me = ModuleExports {
                    exports: exports_by_file.get(name).expect("snapshot covers every file"),
                    whole_export: whole_export_names.get(name).copied(),
                    split: owning_split,
                    prop: split_info.and_then(|s| s.exported_props.get(name)).map(|s| s.as_str()),
                    forced_lazy: split_info.map(|s| s.forced_lazy.as_slice()).unwrap_or(&no_forced_lazy),
                };
                (name.clone(), me)
            })
            .collect();

        let import_fn = shared.intern(IMPORT_FN);
        let then_name = shared.intern(THEN_PROP);

        for name in &discovery_order {
            let file = files.get_mut(name).expect("just discovered");
            let bindings: HashMap<SymbolId, BindingRef> = file
                .require_bindings
                .iter()
                .map(|rb| (rb.local_symbol, BindingRef { module: rb.resolved_module.clone(), imported_name: rb.imported_name }))
                .collect();
            let root_scope = file.program.scope;
            let transformer = BundlerTreeTransformer::new(
                arena,
                &bindings,
                &modules,
                import_fn,
                then_name,
                &shared,
                &mut file.table,
                root_scope,
            );
            let rewritten = transformer.rewrite(file.program.body);
            let defined = global_defines::apply_global_defines(rewritten, arena, &shared, &self.config.global_defines);
            file.program.body = jsbundle_compress::compress(defined, arena, &self.config.compress)?;
        }

        debug!("rewrite + compress complete, emitting {} split(s)", splits.len());

        // Phase 8: concatenate each split's member files in discovery
        // order and hand the result to the host/printer.
        self.emit(&files, &discovery_order, &owner, &splits)
    }

    fn discover_all(&self) -> Result<(HashMap<String, SourceFile<'a>>, Vec<String>), JsError> {
        let arena = self.arena;
        let mut files: HashMap<String, SourceFile<'a>> = HashMap::new();
        let mut discovery_order = Vec::new();
        let mut queued: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();

        for entries in self.config.part_to_main_files.values() {
            for entry in entries {
                if queued.insert(entry.clone()) {
                    queue.push_back(entry.clone());
                }
            }
        }

        while let Some(name) = queue.pop_front() {
            if files.contains_key(&name) {
                continue;
            }
            let Some(source) = self.host.read_content(&name) else {
                warn!("cannot resolve module \"{name}\"");
                return Err(JsError::fatal(ErrorKind::Linker, format!("Cannot find module \"{name}\""), Span::default()));
            };
            let from_file = name.clone();
            let file = discovery::discover(name.clone(), &source, arena, SourceType::Module, |spec| {
                self.host.resolve_require(spec, &from_file)
            })?;
            for req in file.requires.iter().chain(file.lazy_requires.iter()) {
                if queued.insert(req.clone()) {
                    queue.push_back(req.clone());
                }
            }
            discovery_order.push(name.clone());
            files.insert(name, file);
        }

        Ok((files, discovery_order))
    }

    fn emit(
        &self,
        files: &HashMap<String, SourceFile<'a>>,
        discovery_order: &[String],
        owner: &HashMap<String, String>,
        splits: &HashMap<String, SplitInfo>,
    ) -> Result<(), JsError> {
        for (split_name, info) in splits {
            let member_names: Vec<&String> = discovery_order
                .iter()
                .filter(|name| owner.get(*name).map(String::as_str) == Some(split_name.as_str()))
                .collect();

            let mut body: Vec<Stmt<'a>> = Vec::new();
            for name in &member_names {
                let file = files.get(*name).expect("owner only names discovered files");
                body.extend(file.program.body.iter().map(jsbundle_ast::transform::clone_stmt_shallow));
            }
            let merged = self.arena.alloc_stmts(body);

            let needs_import = member_names.iter().any(|n| !files[*n].lazy_requires.is_empty()) || !info.forced_lazy.is_empty();

            let mut prelude = String::new();
            if let Some(entries) = self.config.part_to_main_files.get(split_name) {
                let mut seen = HashSet::new();
                for entry in entries {
                    for dep in self.host.get_plain_js_dependencies(entry) {
                        if seen.insert(dep.clone()) {
                            if let Some(content) = self.host.read_content(&dep) {
                                prelude.push_str(&content);
                                prelude.push('\n');
                            }
                        }
                    }
                }
            }

            let header = self.host.js_headers(split_name, needs_import);
            let printed = self.printer.print(merged);
            let content = format!("{prelude}{header}{printed}");
            let bundle_name = self.host.generate_bundle_name(split_name);
            self.host.write_bundle(&bundle_name, &content);
        }
        Ok(())
    }
}

/// Flattens `export * from "M"` chains into each file's own `exports` map.
/// Bounded to `files.len() + 1` rounds: in the worst case (a chain visiting
/// every file once) that many passes are enough for the flattening to reach
/// a fixed point; a genuine re-export cycle converges once every file's map
/// stops growing; any `ReexportAll` still unresolved after the bound is left
/// in place for `rewrite.rs`'s `whole_export`-fallback to handle.
fn flatten_reexports(files: &mut HashMap<String, SourceFile<'_>>, discovery_order: &[String]) {
    for name in discovery_order {
        let file = files.get_mut(name).unwrap();
        for export in file.self_exports.clone() {
            if let SelfExport::Binding { exported_as, .. } | SelfExport::Literal { exported_as, .. } = &export {
                file.exports.entry(*exported_as).or_insert(export.clone());
            }
        }
    }

    let rounds = files.len() + 1;
    for _ in 0..rounds {
        let mut changed = false;
        let snapshot: HashMap<String, HashMap<Name, SelfExport<'_>>> =
            files.iter().map(|(k, v)| (k.clone(), v.exports.clone())).collect();
        for name in discovery_order {
            let reexports: Vec<String> = files[name]
                .self_exports
                .iter()
                .filter_map(|e| if let SelfExport::ReexportAll { from } = e { Some(from.clone()) } else { None })
                .collect();
            for from in reexports {
                let Some(target_exports) = snapshot.get(&from) else { continue };
                let target_exports = target_exports.clone();
                let file = files.get_mut(name).unwrap();
                for (k, v) in target_exports {
                    if !file.exports.contains_key(&k) {
                        file.exports.insert(k, v);
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
}

/// Determines which files some other file needs as a whole namespace
/// object (a `import * as x` binding, a CommonJS binding whose every use
/// wasn't a `.prop` access, or any `import()` target, which always yields
/// its whole namespace to the caller's `.then`) and synthesizes that object
/// for each, returning the canonical `(Name, SymbolId)` a reference to it
/// must carry, keyed by resolved file name.
fn synthesize_whole_exports<'a>(
    files: &mut HashMap<String, SourceFile<'a>>,
    discovery_order: &[String],
    shared: &mut Interner,
    arena: &'a AstArena<'a>,
) -> HashMap<String, (Name, SymbolId)> {
    let mut needed: HashSet<String> = HashSet::new();
    for file in files.values() {
        for rb in &file.require_bindings {
            if rb.needs_whole_export {
                needed.insert(rb.resolved_module.clone());
            }
        }
        for lazy in &file.lazy_requires {
            needed.insert(lazy.clone());
        }
    }

    let mut result = HashMap::new();
    for name in discovery_order {
        if !needed.contains(name) {
            continue;
        }
        let file = files.get_mut(name).unwrap();
        let binding_name = whole_export::whole_export_binding_name(name, shared);
        let exports: Vec<SelfExport<'a>> = file.exports.values().cloned().collect();
        let root_scope = file.program.scope;
        let (decl, binding_id) = whole_export::synthesize_whole_export(binding_name, &exports, root_scope, &mut file.table, arena);
        let mut new_body = Vec::with_capacity(file.program.body.len() + 1);
        new_body.push(decl);
        new_body.extend(file.program.body.iter().map(jsbundle_ast::transform::clone_stmt_shallow));
        file.program.body = arena.alloc_stmts(new_body);
        file.whole_export = Some(binding_id);
        result.insert(name.clone(), (binding_name, binding_id));
    }
    result
}

/// Renames every top-level user-declared binding in `file` whose text is
/// already claimed by an earlier-processed file, per [`crate::rename`].
/// Collision detection is string-based rather than `SymbolId`-based: two
/// files never share a `SymbolTable`, so there is no single id space to
/// compare across files in the first place. The synthesized whole-export
/// binding (if any) is skipped — its name is already derived from the full
/// file path and so cannot collide with another file's.
fn resolve_collisions<'a>(file: &mut SourceFile<'a>, shared: &mut Interner, global_taken: &mut HashSet<String>, arena: &'a AstArena<'a>) {
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
        let current_name = file.table.def(id).name;
        let text = shared.resolve(current_name).to_string();
        if global_taken.insert(text.clone()) {
            continue;
        }
        let mut suffix = 2u32;
        let unique_text = loop {
            let candidate = format!("{text}_{suffix}");
            if !global_taken.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        global_taken.insert(unique_text.clone());
        let new_name = shared.intern(&unique_text);
        file.program.body = rename::rename_symbol(file.program.body, arena, id, new_name);
        file.table.def_mut(id).name = new_name;
    }
}
