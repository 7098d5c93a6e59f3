//! The tokenizer: turns source text into a [`Token`] stream on demand.
//!
//! Mirrors the context-stack design spec.md §4.1 describes: entering a
//! template hole, a block, or a parenthesized group changes how `/` and
//! `}` are interpreted. Rather than threading a generic "brace kind" only
//! the distinction this lexer actually needs is tracked — whether a `{`
//! opens a template-literal substitution (so the matching `}` resumes
//! quasi-text reading) or an ordinary block/object (so it closes as a
//! plain `RBrace`).

use crate::keywords::ALWAYS_RESERVED;
use jsbundle_ast::{Token, TokenTag, TokenValue};
use jsbundle_base::{ErrorKind, JsError, Position, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BraceKind {
    Block,
    TemplateHole,
}

pub struct Lexer<'a> {
    src: &'a [u8],
    text: &'a str,
    pos: usize,
    line: u32,
    line_start: usize,
    braces: Vec<BraceKind>,
    /// Set after a backtick or a template-hole-closing `}`: the next call
    /// to [`Lexer::next_token`] reads quasi text instead of a normal token.
    expecting_quasi: bool,
    /// Set when a template chunk just stopped at `${`: the next token is
    /// the `${` punctuator itself, after which normal tokenizing resumes.
    pending_hole: bool,
    /// End position of the most recently returned token, used by
    /// `can_insert_semicolon`.
    pub last_end: Position,
    /// Whether a line terminator occurred since the last returned token.
    newline_before: bool,
    /// Whether the previous token was one after which `/` starts a regex
    /// literal rather than division (spec.md §4.1's slash-context stack,
    /// collapsed to a single flag keyed on the previous token).
    regex_allowed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            src: text.as_bytes(),
            text,
            pos: 0,
            line: 1,
            line_start: 0,
            braces: Vec::new(),
            expecting_quasi: false,
            pending_hole: false,
            last_end: Position::new(1, 0, 0),
            newline_before: false,
            regex_allowed: true,
        }
    }

    fn cur_pos(&self) -> Position {
        Position::new(self.line, (self.pos - self.line_start) as u32, self.pos as u32)
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let rest = &self.text[self.pos..];
        let ch = rest.chars().next()?;
        if ch == '\n' {
            self.line += 1;
            self.pos += ch.len_utf8();
            self.line_start = self.pos;
        } else {
            self.pos += ch.len_utf8();
        }
        Some(ch)
    }

    fn err(&self, kind: ErrorKind, message: impl Into<String>, start: Position) -> JsError {
        JsError::fatal(kind, message.into(), Span::new(start, self.cur_pos()))
    }

    /// True when a line break, `}`, or EOF would justify automatic
    /// semicolon insertion before `next`.
    pub fn can_insert_semicolon(&self, next: &Token) -> bool {
        next.start.line != self.last_end.line || next.tag == TokenTag::RBrace || next.tag == TokenTag::Eof
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), JsError> {
        self.newline_before = false;
        loop {
            match self.peek_byte() {
                Some(b' ') | Some(b'\t') | Some(b'\r') => {
                    self.pos += 1;
                }
                Some(b'\n') => {
                    self.newline_before = true;
                    self.bump();
                }
                Some(b'/') if self.peek_byte_at(1) == Some(b'/') => {
                    while !matches!(self.peek_byte(), None | Some(b'\n')) {
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_byte_at(1) == Some(b'*') => {
                    let start = self.cur_pos();
                    self.pos += 2;
                    loop {
                        match self.peek_byte() {
                            None => return Err(self.err(ErrorKind::Lexical, "unterminated block comment", start)),
                            Some(b'*') if self.peek_byte_at(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(b'\n') => {
                                self.newline_before = true;
                                self.bump();
                            }
                            _ => {
                                self.pos += 1;
                            }
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    pub fn next_token(&mut self) -> Result<Token, JsError> {
        if self.pending_hole {
            self.pending_hole = false;
            let start = self.cur_pos();
            self.pos += 2; // "${"
            self.braces.push(BraceKind::TemplateHole);
            let tok = Token::new(TokenTag::DollarBraceL, TokenValue::None, start, self.cur_pos());
            self.regex_allowed = regex_allowed_after(tok.tag);
            self.last_end = tok.end;
            return Ok(tok);
        }
        if self.expecting_quasi {
            let tok = self.read_template_chunk()?;
            self.regex_allowed = regex_allowed_after(tok.tag);
            self.last_end = tok.end;
            return Ok(tok);
        }
        self.skip_whitespace_and_comments()?;
        let start = self.cur_pos();
        let tok = match self.peek_byte() {
            None => Token::new(TokenTag::Eof, TokenValue::None, start, start),
            Some(b) if is_id_start_byte(b) => self.read_name(start)?,
            Some(b'0'..=b'9') => self.read_number(start)?,
            Some(b'.') if self.peek_byte_at(1).map_or(false, |b| b.is_ascii_digit()) => self.read_number(start)?,
            Some(b'"') | Some(b'\'') => self.read_string(start)?,
            Some(b'`') => {
                self.pos += 1;
                self.braces.push(BraceKind::TemplateHole);
                self.expecting_quasi = true;
                Token::new(TokenTag::BackQuote, TokenValue::None, start, self.cur_pos())
            }
            Some(b'/') if self.regex_allowed => self.read_regex(start)?,
            Some(b'}') => {
                self.pos += 1;
                match self.braces.pop() {
                    Some(BraceKind::TemplateHole) => {
                        self.expecting_quasi = true;
                        let tok = self.read_template_chunk()?;
                        self.regex_allowed = regex_allowed_after(tok.tag);
                        self.last_end = tok.end;
                        return Ok(tok);
                    }
                    _ => Token::new(TokenTag::RBrace, TokenValue::None, start, self.cur_pos()),
                }
            }
            Some(b'{') => {
                self.pos += 1;
                self.braces.push(BraceKind::Block);
                Token::new(TokenTag::LBrace, TokenValue::None, start, self.cur_pos())
            }
            Some(_) => self.read_punctuator(start)?,
        };
        self.regex_allowed = regex_allowed_after(tok.tag);
        self.last_end = tok.end;
        Ok(tok)
    }

    fn read_name(&mut self, start: Position) -> Result<Token, JsError> {
        let begin = self.pos;
        while self.peek_byte().map_or(false, is_id_continue_byte) {
            self.pos += 1;
        }
        let text = &self.text[begin..self.pos];
        let end = self.cur_pos();
        if let Some(&tag) = ALWAYS_RESERVED.get(text) {
            return Ok(Token::new(tag, TokenValue::None, start, end));
        }
        Ok(Token::new(TokenTag::Name, TokenValue::Str(text.to_string()), start, end))
    }

    fn read_number(&mut self, start: Position) -> Result<Token, JsError> {
        let begin = self.pos;
        if self.peek_byte() == Some(b'0') {
            match self.peek_byte_at(1) {
                Some(b'x') | Some(b'X') => return self.read_radix_number(start, begin, 16),
                Some(b'o') | Some(b'O') => return self.read_radix_number(start, begin, 8),
                Some(b'b') | Some(b'B') => return self.read_radix_number(start, begin, 2),
                _ => {}
            }
        }
        while self.peek_byte().map_or(false, |b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek_byte() == Some(b'.') {
            self.pos += 1;
            while self.peek_byte().map_or(false, |b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek_byte(), Some(b'e') | Some(b'E')) {
            self.pos += 1;
            if matches!(self.peek_byte(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            if !self.peek_byte().map_or(false, |b| b.is_ascii_digit()) {
                return Err(self.err(ErrorKind::Lexical, "missing exponent digits", start));
            }
            while self.peek_byte().map_or(false, |b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let raw = &self.text[begin..self.pos];
        let value = raw.parse::<f64>().map_err(|_| self.err(ErrorKind::Lexical, format!("invalid number literal `{raw}`"), start))?;
        let end = self.cur_pos();
        Ok(Token::new(TokenTag::Num, TokenValue::Number { value, raw: raw.to_string() }, start, end))
    }

    fn read_radix_number(&mut self, start: Position, begin: usize, radix: u32) -> Result<Token, JsError> {
        self.pos += 2;
        let digits_start = self.pos;
        while self.peek_byte().map_or(false, |b| (b as char).is_digit(radix)) {
            self.pos += 1;
        }
        if self.pos == digits_start {
            return Err(self.err(ErrorKind::Lexical, "malformed radix-prefixed numeric literal", start));
        }
        let raw = &self.text[begin..self.pos];
        let value = i64::from_str_radix(&self.text[digits_start..self.pos], radix)
            .map(|v| v as f64)
            .unwrap_or(f64::INFINITY);
        let end = self.cur_pos();
        Ok(Token::new(TokenTag::Num, TokenValue::Number { value, raw: raw.to_string() }, start, end))
    }

    fn read_string(&mut self, start: Position) -> Result<Token, JsError> {
        let quote = self.peek_byte().unwrap();
        self.pos += 1;
        let mut cooked = String::new();
        loop {
            match self.peek_byte() {
                None => return Err(self.err(ErrorKind::Lexical, "unterminated string literal", start)),
                Some(b) if b == quote => {
                    self.pos += 1;
                    break;
                }
                Some(b'\n') => return Err(self.err(ErrorKind::Lexical, "unterminated string literal", start)),
                Some(b'\\') => {
                    self.pos += 1;
                    self.read_escape_into(&mut cooked)?;
                }
                _ => {
                    let ch = self.bump().unwrap();
                    cooked.push(ch);
                }
            }
        }
        let end = self.cur_pos();
        Ok(Token::new(TokenTag::Str, TokenValue::Str(cooked), start, end))
    }

    fn read_escape_into(&mut self, out: &mut String) -> Result<(), JsError> {
        match self.peek_byte() {
            Some(b'n') => {
                out.push('\n');
                self.pos += 1;
            }
            Some(b't') => {
                out.push('\t');
                self.pos += 1;
            }
            Some(b'r') => {
                out.push('\r');
                self.pos += 1;
            }
            Some(b'b') => {
                out.push('\u{8}');
                self.pos += 1;
            }
            Some(b'0') => {
                out.push('\0');
                self.pos += 1;
            }
            Some(b'\n') => {
                self.bump();
            }
            Some(b'x') => {
                self.pos += 1;
                let hex = self.take_hex_digits(2)?;
                out.push(char::from_u32(hex).unwrap_or('\u{FFFD}'));
            }
            Some(b'u') => {
                self.pos += 1;
                let code = if self.peek_byte() == Some(b'{') {
                    self.pos += 1;
                    let begin = self.pos;
                    while self.peek_byte().map_or(false, |b| (b as char).is_ascii_hexdigit()) {
                        self.pos += 1;
                    }
                    let value = u32::from_str_radix(&self.text[begin..self.pos], 16).unwrap_or(0);
                    if self.peek_byte() == Some(b'}') {
                        self.pos += 1;
                    }
                    value
                } else {
                    self.take_hex_digits(4)?
                };
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            Some(_) => {
                if let Some(ch) = self.bump() {
                    out.push(ch);
                }
            }
            None => return Err(self.err(ErrorKind::Lexical, "unterminated escape sequence", self.cur_pos())),
        }
        Ok(())
    }

    fn take_hex_digits(&mut self, count: usize) -> Result<u32, JsError> {
        let start = self.cur_pos();
        if self.pos + count > self.src.len() {
            return Err(self.err(ErrorKind::Lexical, "truncated hex escape", start));
        }
        let digits = &self.text[self.pos..self.pos + count];
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| self.err(ErrorKind::Lexical, "invalid hex escape", start))?;
        self.pos += count;
        Ok(value)
    }

    /// Reads one quasi chunk of a template literal: raw text up to the
    /// next `${` (stopping before it, leaving the braces stack pushed by
    /// the caller) or the closing backtick (popping the template context).
    fn read_template_chunk(&mut self) -> Result<Token, JsError> {
        let start = self.cur_pos();
        let mut raw = String::new();
        let mut cooked = String::new();
        let mut invalid = false;
        self.expecting_quasi = false;
        loop {
            match self.peek_byte() {
                None => return Err(self.err(ErrorKind::Lexical, "unterminated template literal", start)),
                Some(b'`') => {
                    self.pos += 1;
                    self.braces.pop();
                    let end = self.cur_pos();
                    let value = if invalid {
                        TokenValue::Template { raw, cooked: None }
                    } else {
                        TokenValue::Template { raw, cooked: Some(cooked) }
                    };
                    let tag = if invalid { TokenTag::InvalidTemplate } else { TokenTag::Template };
                    return Ok(Token::new(tag, value, start, end));
                }
                Some(b'$') if self.peek_byte_at(1) == Some(b'{') => {
                    let end = self.cur_pos();
                    let value = if invalid {
                        TokenValue::Template { raw, cooked: None }
                    } else {
                        TokenValue::Template { raw, cooked: Some(cooked) }
                    };
                    let tag = if invalid { TokenTag::InvalidTemplate } else { TokenTag::Template };
                    // Re-entering `next_token` on the following call emits
                    // `${` itself; stash nothing, just stop here.
                    self.pending_hole = true;
                    return Ok(Token::new(tag, value, start, end));
                }
                Some(b'\\') => {
                    raw.push('\\');
                    self.pos += 1;
                    if let Some(b) = self.peek_byte() {
                        raw.push(b as char);
                    }
                    if self.read_escape_into(&mut cooked).is_err() {
                        invalid = true;
                    }
                }
                _ => {
                    let ch = self.bump().unwrap();
                    raw.push(ch);
                    cooked.push(ch);
                }
            }
        }
    }

    fn read_regex(&mut self, start: Position) -> Result<Token, JsError> {
        self.pos += 1;
        let pattern_start = self.pos;
        let mut in_class = false;
        loop {
            match self.peek_byte() {
                None => return Err(self.err(ErrorKind::Lexical, "unterminated regular expression", start)),
                Some(b'\n') => return Err(self.err(ErrorKind::Lexical, "unterminated regular expression", start)),
                Some(b'\\') => {
                    self.pos += 1;
                    if self.peek_byte().is_some() {
                        self.pos += 1;
                    }
                }
                Some(b'[') => {
                    in_class = true;
                    self.pos += 1;
                }
                Some(b']') => {
                    in_class = false;
                    self.pos += 1;
                }
                Some(b'/') if !in_class => {
                    break;
                }
                _ => {
                    self.pos += 1;
                }
            }
        }
        let pattern = self.text[pattern_start..self.pos].to_string();
        self.pos += 1; // closing '/'
        let flags_start = self.pos;
        while self.peek_byte().map_or(false, is_id_continue_byte) {
            self.pos += 1;
        }
        let flags = self.text[flags_start..self.pos].to_string();
        let end = self.cur_pos();
        Ok(Token::new(TokenTag::Regexp, TokenValue::Regex { pattern, flags }, start, end))
    }

    fn read_punctuator(&mut self, start: Position) -> Result<Token, JsError> {
        macro_rules! tok {
            ($tag:expr, $len:expr) => {{
                self.pos += $len;
                Token::new($tag, TokenValue::None, start, self.cur_pos())
            }};
        }
        use TokenTag::*;
        let b0 = self.peek_byte().unwrap();
        let b1 = self.peek_byte_at(1);
        let b2 = self.peek_byte_at(2);
        let tok = match (b0, b1, b2) {
            (b'.', Some(b'.'), Some(b'.')) => tok!(Ellipsis, 3),
            (b'=', Some(b'='), Some(b'=')) => tok!(EqEqEq, 3),
            (b'!', Some(b'='), Some(b'=')) => tok!(NotEqEq, 3),
            (b'*', Some(b'*'), Some(b'=')) => tok!(StarstarEq, 3),
            (b'<', Some(b'<'), Some(b'=')) => tok!(ShlEq, 3),
            (b'>', Some(b'>'), Some(b'>')) if self.peek_byte_at(3) == Some(b'=') => tok!(UshrEq, 4),
            (b'>', Some(b'>'), Some(b'>')) => tok!(Ushr, 3),
            (b'&', Some(b'&'), Some(b'=')) => tok!(AmpAmpEq, 3),
            (b'|', Some(b'|'), Some(b'=')) => tok!(PipePipeEq, 3),
            (b'=', Some(b'='), _) => tok!(EqEq, 2),
            (b'!', Some(b'='), _) => tok!(NotEq, 2),
            (b'<', Some(b'='), _) => tok!(Le, 2),
            (b'>', Some(b'='), _) => tok!(Ge, 2),
            (b'<', Some(b'<'), _) => tok!(Shl, 2),
            (b'>', Some(b'>'), _) => tok!(Shr, 2),
            (b'&', Some(b'&'), _) => tok!(AmpAmp, 2),
            (b'|', Some(b'|'), _) => tok!(PipePipe, 2),
            (b'+', Some(b'+'), _) => tok!(PlusPlus, 2),
            (b'-', Some(b'-'), _) => tok!(MinusMinus, 2),
            (b'*', Some(b'*'), _) => tok!(Starstar, 2),
            (b'=', Some(b'>'), _) => tok!(Arrow, 2),
            (b'+', Some(b'='), _) => tok!(PlusEq, 2),
            (b'-', Some(b'='), _) => tok!(MinusEq, 2),
            (b'*', Some(b'='), _) => tok!(StarEq, 2),
            (b'/', Some(b'='), _) => tok!(SlashEq, 2),
            (b'%', Some(b'='), _) => tok!(PercentEq, 2),
            (b'&', Some(b'='), _) => tok!(AmpEq, 2),
            (b'|', Some(b'='), _) => tok!(PipeEq, 2),
            (b'^', Some(b'='), _) => tok!(CaretEq, 2),
            (b'(', _, _) => tok!(LParen, 1),
            (b')', _, _) => tok!(RParen, 1),
            (b'[', _, _) => tok!(LBracket, 1),
            (b']', _, _) => tok!(RBracket, 1),
            (b',', _, _) => tok!(Comma, 1),
            (b';', _, _) => tok!(Semi, 1),
            (b':', _, _) => tok!(Colon, 1),
            (b'.', _, _) => tok!(Dot, 1),
            (b'?', _, _) => tok!(Question, 1),
            (b'~', _, _) => tok!(Tilde, 1),
            (b'!', _, _) => tok!(Bang, 1),
            (b'+', _, _) => tok!(Plus, 1),
            (b'-', _, _) => tok!(Minus, 1),
            (b'*', _, _) => tok!(Star, 1),
            (b'/', _, _) => tok!(Slash, 1),
            (b'%', _, _) => tok!(Percent, 1),
            (b'&', _, _) => tok!(Amp, 1),
            (b'|', _, _) => tok!(Pipe, 1),
            (b'^', _, _) => tok!(Caret, 1),
            (b'<', _, _) => tok!(Lt, 1),
            (b'>', _, _) => tok!(Gt, 1),
            (b'=', _, _) => tok!(Eq, 1),
            _ => {
                return Err(self.err(ErrorKind::Lexical, format!("unexpected character `{}`", b0 as char), start));
            }
        };
        Ok(tok)
    }
}

fn is_id_start_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_id_continue_byte(b: u8) -> bool {
    is_id_start_byte(b) || b.is_ascii_digit()
}

/// Whether `/` following `tag` should be read as the start of a regex
/// literal (true) or as division (false). Approximates spec.md §4.1's
/// slash-context stack: after a value-producing token (identifier,
/// literal, `)`, `]`) division is meant; after an operator, opening
/// bracket, or most keywords, a new expression (hence a regex) is meant.
fn regex_allowed_after(tag: TokenTag) -> bool {
    !matches!(
        tag,
        TokenTag::Name
            | TokenTag::Num
            | TokenTag::Str
            | TokenTag::Regexp
            | TokenTag::Template
            | TokenTag::InvalidTemplate
            | TokenTag::RParen
            | TokenTag::RBracket
            | TokenTag::RBrace
            | TokenTag::This
            | TokenTag::Super
            | TokenTag::Null
            | TokenTag::True
            | TokenTag::False
            | TokenTag::PlusPlus
            | TokenTag::MinusMinus
    )
}
