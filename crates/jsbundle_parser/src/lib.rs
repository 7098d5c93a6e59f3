//! Recursive-descent ECMAScript parser.
//!
//! Produces a [`jsbundle_ast::Program`] from source text, arena-allocating
//! every node through a caller-supplied [`AstArena`]. Grounded on the
//! teacher's `logicaffeine_compile` pipeline shape (a dedicated parser
//! stage feeding a typed AST) and spec.md §4.2's design: Pratt-style
//! binary precedence, arrow-function disambiguation via
//! `potential_arrow_at`, `DestructuringErrors` threading, and directive
//! prologue tracking.

mod expr;
mod function;
mod module;
mod pattern;
mod state;
mod stmt;

pub use state::{DestructuringErrors, LabelEntry, ParserState};

use jsbundle_ast::{AstArena, Program, ScopeId, SourceType};
use jsbundle_base::{ErrorKind, Interner, JsError, Name, Position};
use jsbundle_lexer::Lexer;

/// The parser's primary handle: a token cursor over the lexer plus the
/// arena that owns every node it produces.
pub struct Parser<'a, 'src> {
    lexer: Lexer<'src>,
    pub(crate) arena: &'a AstArena<'a>,
    pub(crate) interner: Interner,
    pub(crate) cur: jsbundle_ast::Token,
    /// A single token of lookahead, filled on demand by [`Parser::peek`].
    /// Needed to disambiguate a labeled statement (`ident:`) from an
    /// identifier expression without re-lexing.
    peeked: Option<jsbundle_ast::Token>,
    pub(crate) prev_end: Position,
    pub(crate) state: ParserState,
    source_type: SourceType,
    /// `true` at the top level and at the start of every function body,
    /// until a non-directive statement is seen (spec.md §4.2's
    /// `can_be_directive`).
    pub(crate) can_be_directive: bool,
}

impl<'a, 'src> Parser<'a, 'src> {
    pub fn new(source: &'src str, arena: &'a AstArena<'a>, source_type: SourceType) -> Result<Self, JsError> {
        let mut lexer = Lexer::new(source);
        let cur = lexer.next_token()?;
        Ok(Self {
            lexer,
            arena,
            interner: Interner::new(),
            cur,
            peeked: None,
            prev_end: Position::new(1, 0, 0),
            state: ParserState::new(),
            source_type,
            can_be_directive: true,
        })
    }

    pub fn into_interner(self) -> Interner {
        self.interner
    }

    pub fn parse_program(&mut self) -> Result<Program<'a>, JsError> {
        if self.source_type == SourceType::Module {
            self.state.strict = true;
        }
        let mut body = Vec::new();
        while self.cur.tag != jsbundle_ast::TokenTag::Eof {
            body.push(self.parse_statement()?);
        }
        Ok(Program { body: self.arena.alloc_stmts(body), scope: ScopeId(0), source_type: self.source_type })
    }

    pub(crate) fn intern(&mut self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub(crate) fn bump(&mut self) -> Result<(), JsError> {
        self.prev_end = self.cur.end;
        self.cur = match self.peeked.take() {
            Some(tok) => tok,
            None => self.lexer.next_token()?,
        };
        Ok(())
    }

    /// Looks at the token after `cur` without consuming it.
    pub(crate) fn peek(&mut self) -> Result<&jsbundle_ast::Token, JsError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        Ok(self.peeked.as_ref().unwrap())
    }

    pub(crate) fn can_insert_semicolon(&self) -> bool {
        self.lexer.can_insert_semicolon(&self.cur)
    }

    pub(crate) fn expect(&mut self, tag: jsbundle_ast::TokenTag) -> Result<(), JsError> {
        if self.cur.tag == tag {
            self.bump()
        } else {
            Err(self.unexpected())
        }
    }

    pub(crate) fn eat(&mut self, tag: jsbundle_ast::TokenTag) -> Result<bool, JsError> {
        if self.cur.tag == tag {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn semicolon(&mut self) -> Result<(), JsError> {
        if self.eat(jsbundle_ast::TokenTag::Semi)? {
            return Ok(());
        }
        if self.can_insert_semicolon() {
            return Ok(());
        }
        Err(self.unexpected())
    }

    pub(crate) fn unexpected(&self) -> JsError {
        JsError::fatal(
            ErrorKind::Syntactic,
            format!("Unexpected token {:?}", self.cur.tag),
            self.cur.span(),
        )
    }

    pub(crate) fn error_at(&self, kind: ErrorKind, message: impl Into<String>) -> JsError {
        JsError::fatal(kind, message.into(), self.cur.span())
    }

    /// Consumes a string-literal token, returning its cooked text. Used for
    /// directive-prologue detection (`"use strict"`).
    pub(crate) fn expect_string_text(&mut self) -> Result<String, JsError> {
        match &self.cur.value {
            jsbundle_ast::TokenValue::Str(text) => {
                let s = text.clone();
                self.bump()?;
                Ok(s)
            }
            _ => Err(self.unexpected()),
        }
    }
}

/// Parses a full program from source text using a fresh arena-backed
/// parser. Convenience entry point mirroring what `jsbundle_bundler`'s
/// discovery phase calls per file.
pub fn parse<'a>(source: &str, arena: &'a AstArena<'a>, source_type: SourceType) -> Result<(Program<'a>, Interner), JsError> {
    let mut parser = Parser::new(source, arena, source_type)?;
    let program = parser.parse_program()?;
    Ok((program, parser.into_interner()))
}
