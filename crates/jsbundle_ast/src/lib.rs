//! AST node types, traversal, and rewriting for the JavaScript toolchain.
//!
//! Nodes are arena-allocated (see [`arena::AstArena`]) and lifetime-
//! parameterized rather than reference-counted, following the teacher's
//! `logicaffeine_base`/`logicaffeine_compile` encoding. Scope-analysis
//! results (symbol definitions, scope tables) live in a downstream crate
//! and are referenced here only through the opaque [`ast::SymbolId`] and
//! [`ast::ScopeId`] handles, so this crate never depends on the analyzer.

pub mod arena;
pub mod ast;
pub mod token;
pub mod transform;
pub mod walker;

pub use arena::AstArena;
pub use ast::*;
pub use token::{Token, TokenTag, TokenValue};
pub use transform::{Transformer, TransformResult};
pub use walker::Walker;
