//! Error types with source location tracking.
//!
//! All errors in jsbundle carry a [`Span`] indicating where in the source
//! text the problem occurred. [`JsError`] additionally classifies the error
//! by [`ErrorKind`] (lexical/syntactic/semantic/linker/not-implemented) and
//! [`Severity`] (fatal vs recoverable), per the error-handling design.

use crate::span::Span;
use std::fmt;

/// An error annotated with its source location.
///
/// Implements [`std::error::Error`] and [`fmt::Display`]. The display format
/// is `"{message} at {start}..{end}"`.
#[derive(Debug, Clone)]
pub struct SpannedError {
    pub message: String,
    pub span: Span,
}

impl SpannedError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), span }
    }
}

impl fmt::Display for SpannedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start.index, self.span.end.index)
    }
}

impl std::error::Error for SpannedError {}

/// Alias for `std::result::Result<T, SpannedError>`.
pub type Result<T> = std::result::Result<T, SpannedError>;

/// The pipeline stage that raised an error.
///
/// See spec §7: lexical errors are unterminated/invalid tokens, syntactic
/// errors are parser grammar violations, semantic errors are scope/strict-mode
/// violations, linker errors come from the bundler's module resolution, and
/// `NotImplemented` marks compressor cases the spec explicitly declines to
/// fold (`for-in`/`for-of`/`with`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntactic,
    Semantic,
    Linker,
    NotImplemented,
}

/// Whether an error must abort the pipeline or may, in principle, be
/// recorded and parsing continued.
///
/// Per spec §4.2 and §9 Open Questions: the reference implementation wires
/// `RaiseRecoverable` identically to `Raise` (both abort). We keep the
/// distinction as data so a caller can opt into continuation later; today
/// [`JsError::into_result`] always treats both severities as fatal unless
/// the caller inspects `severity` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Recoverable,
}

/// A classified, spanned error produced anywhere in the pipeline.
#[derive(Debug, Clone)]
pub struct JsError {
    pub kind: ErrorKind,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
}

impl JsError {
    pub fn fatal(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self { kind, severity: Severity::Fatal, message: message.into(), span }
    }

    pub fn recoverable(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self { kind, severity: Severity::Recoverable, message: message.into(), span }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for JsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} error: {} at {}..{}",
            self.kind, self.message, self.span.start.index, self.span.end.index
        )
    }
}

impl std::error::Error for JsError {}

impl From<JsError> for SpannedError {
    fn from(e: JsError) -> Self {
        SpannedError::new(e.message, e.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanned_error_display() {
        let err = SpannedError::new("test error", Span::default());
        let display = format!("{}", err);
        assert!(display.contains("test error"));
    }

    #[test]
    fn js_error_fatal_vs_recoverable() {
        let fatal = JsError::fatal(ErrorKind::Syntactic, "Unexpected token", Span::default());
        let recoverable = JsError::recoverable(ErrorKind::Syntactic, "duplicate property", Span::default());
        assert!(fatal.is_fatal());
        assert!(!recoverable.is_fatal());
    }

    #[test]
    fn js_error_converts_to_spanned_error() {
        let err = JsError::fatal(ErrorKind::Linker, "Cannot find ./a.js", Span::default());
        let spanned: SpannedError = err.into();
        assert!(spanned.message.contains("Cannot find"));
    }
}
