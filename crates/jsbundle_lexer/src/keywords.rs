//! Static reserved-word tables, consulted by the lexer's `read_name` and by
//! the parser when it needs to know whether a `Name` token's text is
//! forbidden as a binding identifier in the current mode.
//!
//! Built once via `once_cell::sync::Lazy`, mirroring `logicaffeine_system`'s
//! use of `once_cell` for tables that would otherwise be recomputed on every
//! call.

use jsbundle_ast::TokenTag;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Keywords that lex as a dedicated [`TokenTag`] in every mode.
pub static ALWAYS_RESERVED: Lazy<HashMap<&'static str, TokenTag>> = Lazy::new(|| {
    use TokenTag::*;
    HashMap::from([
        ("break", Break),
        ("case", Case),
        ("catch", Catch),
        ("class", Class),
        ("const", Const),
        ("continue", Continue),
        ("debugger", Debugger),
        ("default", Default),
        ("delete", Delete),
        ("do", Do),
        ("else", Else),
        ("export", Export),
        ("extends", Extends),
        ("finally", Finally),
        ("for", For),
        ("function", Function),
        ("if", If),
        ("import", Import),
        ("in", In),
        ("instanceof", Instanceof),
        ("new", New),
        ("return", Return),
        ("super", Super),
        ("switch", Switch),
        ("this", This),
        ("throw", Throw),
        ("try", Try),
        ("typeof", Typeof),
        ("var", Var),
        ("void", Void),
        ("while", While),
        ("with", With),
        ("null", Null),
        ("true", True),
        ("false", False),
    ])
});

/// Reserved only under strict mode; elsewhere a plain identifier. These
/// still lex as [`TokenTag::Name`] (spec.md §4.2's "liberal context"
/// treatment) — the table exists for the parser's strict-mode legality
/// check, not for the lexer's own dispatch.
pub static STRICT_RESERVED: Lazy<HashMap<&'static str, ()>> = Lazy::new(|| {
    HashMap::from([
        ("implements", ()),
        ("interface", ()),
        ("let", ()),
        ("package", ()),
        ("private", ()),
        ("protected", ()),
        ("public", ()),
        ("static", ()),
        ("yield", ()),
    ])
});

/// Contextual keywords the parser re-interprets by position rather than by
/// lexer dispatch: `async`, `await`, `of`, `get`, `set`.
pub fn is_contextual_keyword(text: &str) -> bool {
    matches!(text, "async" | "await" | "of" | "get" | "set")
}

pub fn is_strict_reserved(text: &str) -> bool {
    STRICT_RESERVED.contains_key(text)
}

pub fn is_always_reserved(text: &str) -> bool {
    ALWAYS_RESERVED.contains_key(text)
}
