//! # jsbundle-base
//!
//! Pure structural atoms for the jsbundle ecosystem: bump allocation, string
//! interning, source-position tracking, and spanned errors.
//!
//! This crate has no knowledge of JavaScript grammar. It provides only
//! generic, reusable infrastructure that the lexer, AST, parser, scope
//! analyzer, compressor, and bundler crates build on.

pub mod arena;
pub mod intern;
pub mod span;
pub mod error;

pub use arena::Arena;
pub use intern::{Interner, Name};
pub use span::{Position, Span};
pub use error::{ErrorKind, JsError, Result, Severity, SpannedError};
