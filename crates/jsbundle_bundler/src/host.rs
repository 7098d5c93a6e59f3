//! The linker's external collaborators: everything the bundler needs from
//! its embedder but does not itself implement.
//!
//! `Printer` is deliberately an interface only — pretty-printing the final
//! tree back to text is someone else's job. [`Bundler::emit`](crate::linker::Bundler::emit)
//! hands the rewritten top-levels to whatever `Printer` the embedder
//! supplies; this crate does not ship one.

use jsbundle_ast::Stmt;

/// Everything the linker needs from the embedding tool to resolve a module
/// graph and produce output.
pub trait HostContext {
    /// Returns the source text for `name`, or `None` if it cannot be found.
    fn read_content(&self, name: &str) -> Option<String>;

    /// Non-JS files `name` depends on verbatim (e.g. a JSON shim or a
    /// hand-written prelude) — copied into the bundle as headers rather
    /// than parsed.
    fn get_plain_js_dependencies(&self, name: &str) -> Vec<String>;

    /// Canonicalizes a `require`/`import` specifier relative to the file
    /// it appears in: resolves `.`/`..`, appends `.js` when the spec has
    /// no extension, and leaves `.json` alone.
    fn resolve_require(&self, spec: &str, from_file: &str) -> String;

    /// Maps a logical bundle name (a split's short name) to the name its
    /// output should be written under.
    fn generate_bundle_name(&self, logical_name: &str) -> String;

    /// The runtime prelude text for a split: defines `__import` when
    /// `needs_import` is set (i.e. the split or one of its consumers emits
    /// a lazy `import()` call).
    fn js_headers(&self, split_name: &str, needs_import: bool) -> String;

    /// Sink: writes a finished bundle's content under `name`.
    fn write_bundle(&self, name: &str, content: &str);
}

/// Converts a rewritten, dependency-ordered sequence of top-level
/// statements into final source text.
///
/// Left abstract by design: this crate links and rewrites the AST but
/// does not render it back to text.
pub trait Printer {
    fn print<'a>(&self, stmts: &'a [Stmt<'a>]) -> String;
}
