//! Parses, analyzes, compresses and bundles ECMAScript sources.
//!
//! A thin facade over the `jsbundle-*` crates: [`jsbundle_parser`] produces
//! an AST, [`jsbundle_scope`] resolves its symbols, [`jsbundle_compress`]
//! folds constants and eliminates dead code, and [`jsbundle_bundler`] links
//! a `require`/`import` module graph into one or more output bundles.
//! `compile`/`compile_with_options` drive the single-file pipeline with no
//! cross-file resolution; [`link`]/[`link_with_config`] drive the bundler.

pub use jsbundle_ast::{AstArena, Program, SourceType};
pub use jsbundle_base::{ErrorKind, Interner, JsError, Severity};
pub use jsbundle_bundler::{
    Bundler, BundlerConfig, DefineValue, HostContext, OutputOptions, Printer, SourceFile,
};
pub use jsbundle_compress::ICompressOptions;
pub use jsbundle_scope::SymbolTable;

/// Knobs for the single-file pipeline ([`compile`]/[`compile_with_options`]):
/// the source's module-vs-script grammar and the compressor settings run
/// over its body. Scope analysis always runs (its `SymbolTable` is
/// discarded here, since nothing cross-file consumes it outside the
/// bundler) so the tree compress sees is exactly what a bundled file would
/// see.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub source_type: SourceType,
    pub compress: ICompressOptions,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions { source_type: SourceType::Script, compress: ICompressOptions::default() }
    }
}

/// Parses, resolves and compresses `source` as a standalone script, handing
/// the rewritten top-level statements to `printer`. Performs no
/// `require`/`import` resolution; use [`link`] to bundle a module graph.
pub fn compile(source: &str, printer: &dyn Printer) -> Result<String, JsError> {
    compile_with_options(source, CompileOptions::default(), printer)
}

/// Same as [`compile`], but as an ES module (`source_type` defaults to
/// [`SourceType::Module`] regardless of `options.source_type`).
pub fn compile_module(source: &str, printer: &dyn Printer) -> Result<String, JsError> {
    compile_with_options(
        source,
        CompileOptions { source_type: SourceType::Module, ..CompileOptions::default() },
        printer,
    )
}

pub fn compile_with_options(
    source: &str,
    options: CompileOptions,
    printer: &dyn Printer,
) -> Result<String, JsError> {
    let arena = AstArena::new();
    let (program, interner) = jsbundle_parser::parse(source, &arena, options.source_type)?;
    let _table = jsbundle_scope::analyze(&program, &interner)?;
    let compressed = jsbundle_compress::compress(program.body, &arena, &options.compress)?;
    Ok(printer.print(compressed))
}

/// Links a module graph rooted at `entries` into one or more bundles,
/// using defaults for every [`BundlerConfig`] knob (no `global_defines`, no
/// `mangle`, the compressor's own defaults). `entries` become the main
/// split's entry files; `host.write_bundle` receives the finished text.
pub fn link(
    entries: Vec<String>,
    host: &dyn HostContext,
    printer: &dyn Printer,
) -> Result<(), JsError> {
    let mut part_to_main_files = std::collections::HashMap::new();
    part_to_main_files.insert(jsbundle_bundler::split::MAIN_SPLIT.to_string(), entries);
    link_with_config(
        BundlerConfig { part_to_main_files, ..BundlerConfig::default() },
        host,
        printer,
    )
}

/// Links a module graph using a fully caller-supplied [`BundlerConfig`]
/// (multiple splits, `global_defines`, `mangle`, compressor options).
pub fn link_with_config(
    config: BundlerConfig,
    host: &dyn HostContext,
    printer: &dyn Printer,
) -> Result<(), JsError> {
    let arena = AstArena::new();
    let bundler = Bundler::new(&arena, host, printer, config);
    bundler.link()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct NoopPrinter;

    impl Printer for NoopPrinter {
        fn print<'a>(&self, stmts: &'a [jsbundle_ast::Stmt<'a>]) -> String {
            format!("/* {} statement(s) */", stmts.len())
        }
    }

    #[test]
    fn compile_parses_and_prints_a_script() {
        let printer = NoopPrinter;
        let out = compile("var x = 1 + 2;", &printer).unwrap();
        assert_eq!(out, "/* 1 statement(s) */");
    }

    #[test]
    fn compile_surfaces_syntax_errors() {
        let printer = NoopPrinter;
        let err = compile("var = ;", &printer).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntactic);
    }

    #[test]
    fn compile_with_options_runs_the_configured_compressor() {
        let printer = NoopPrinter;
        let options = CompileOptions {
            source_type: SourceType::Script,
            compress: ICompressOptions { max_passes: 1, ..ICompressOptions::default() },
        };
        let out = compile_with_options("if (true) { var x = 1; }", options, &printer).unwrap();
        assert!(out.starts_with("/*"));
    }

    /// An in-memory host for exercising [`link`] without touching disk:
    /// `files` backs `read_content`, `written` collects every
    /// `write_bundle` call keyed by bundle name.
    struct MemoryHost {
        files: HashMap<String, String>,
        written: RefCell<HashMap<String, String>>,
    }

    impl HostContext for MemoryHost {
        fn read_content(&self, name: &str) -> Option<String> {
            self.files.get(name).cloned()
        }

        fn get_plain_js_dependencies(&self, _name: &str) -> Vec<String> {
            Vec::new()
        }

        fn resolve_require(&self, spec: &str, _from_file: &str) -> String {
            let spec = spec.strip_prefix("./").unwrap_or(spec);
            if spec.ends_with(".js") || spec.ends_with(".json") {
                spec.to_string()
            } else {
                format!("{spec}.js")
            }
        }

        fn generate_bundle_name(&self, logical_name: &str) -> String {
            format!("{logical_name}.bundle.js")
        }

        fn js_headers(&self, _split_name: &str, _needs_import: bool) -> String {
            String::new()
        }

        fn write_bundle(&self, name: &str, content: &str) {
            self.written.borrow_mut().insert(name.to_string(), content.to_string());
        }
    }

    #[test]
    fn link_bundles_a_two_file_commonjs_graph() {
        let mut files = HashMap::new();
        files.insert(
            "entry.js".to_string(),
            "var helper = require('./helper.js'); helper.greet();".to_string(),
        );
        files.insert(
            "helper.js".to_string(),
            "exports.greet = function() { return 1; };".to_string(),
        );
        let host = MemoryHost { files, written: RefCell::new(HashMap::new()) };
        let printer = NoopPrinter;

        link(vec!["entry.js".to_string()], &host, &printer).unwrap();

        let written = host.written.borrow();
        assert_eq!(written.len(), 1);
        assert!(written.contains_key("main.bundle.js"));
    }

    #[test]
    fn link_reports_an_unresolvable_entry() {
        let host = MemoryHost { files: HashMap::new(), written: RefCell::new(HashMap::new()) };
        let printer = NoopPrinter;

        let err = link(vec!["missing.js".to_string()], &host, &printer).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Linker);
    }
}
