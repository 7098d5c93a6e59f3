//! Module graph linker: discovers a file's `require`/`import` neighbors,
//! resolves what each file exports, rewrites every reference to point at
//! the resolved binding, and emits one bundle per split.
//!
//! The entry point is [`Bundler`]; an embedder supplies a [`HostContext`]
//! (file resolution, split membership, plain-JS prelude lookup) and a
//! [`Printer`] (AST -> source text) and calls [`Bundler::link`].

pub mod descend;
pub mod discovery;
pub mod global_defines;
pub mod host;
pub mod linker;
pub mod mangle;
pub mod reintern;
pub mod rename;
pub mod rewrite;
pub mod source_file;
pub mod split;
pub mod whole_export;

pub use global_defines::DefineValue;
pub use host::{HostContext, Printer};
pub use linker::{Bundler, BundlerConfig, OutputOptions};
pub use source_file::{RequireBinding, SelfExport, SourceFile, SourceFileState};
pub use split::SplitInfo;
