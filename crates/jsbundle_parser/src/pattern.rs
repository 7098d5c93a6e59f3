//! Binding-pattern parsing and the `toAssignable` conversion spec.md §4.2
//! describes: an expression parsed optimistically as a value is
//! reinterpreted as a pattern once an arrow `=>` or a declarator confirms
//! binding-position context.

use crate::Parser;
use jsbundle_ast::{Expr, ObjectPatternProp, Pattern, PropKey, Symbol, SymbolKind, TokenTag};
use jsbundle_base::{ErrorKind, JsError};

impl<'a, 'src> Parser<'a, 'src> {
    /// Parses a binding target directly in a position that is always a
    /// pattern (function parameters, `var`/`let`/`const` declarators,
    /// `catch` clauses): identifiers, `{ }` / `[ ]` destructuring, with
    /// optional `= default`.
    pub fn parse_binding_target(&mut self) -> Result<Pattern<'a>, JsError> {
        let base = match self.cur.tag {
            TokenTag::LBrace => self.parse_object_pattern()?,
            TokenTag::LBracket => self.parse_array_pattern()?,
            TokenTag::Name => {
                let text = self.cur.text().map(str::to_string).ok_or_else(|| self.unexpected())?;
                self.bump()?;
                let name = self.intern(&text);
                Pattern::Ident(Symbol::new(name, SymbolKind::Funarg))
            }
            _ => return Err(self.unexpected()),
        };
        if self.eat(TokenTag::Eq)? {
            let default = self.parse_assign()?;
            return Ok(Pattern::Assign { left: self.arena.patterns.alloc(base), right: default });
        }
        Ok(base)
    }

    fn parse_object_pattern(&mut self) -> Result<Pattern<'a>, JsError> {
        self.expect(TokenTag::LBrace)?;
        let mut props = Vec::new();
        while self.cur.tag != TokenTag::RBrace {
            if self.eat(TokenTag::Ellipsis)? {
                let rest = self.parse_binding_target()?;
                props.push(ObjectPatternProp {
                    key: PropKey::Ident(self.intern("...")),
                    value: Pattern::Rest(self.arena.patterns.alloc(rest)),
                    computed: false,
                    shorthand: false,
                });
                break;
            }
            let (key, computed) = self.parse_pattern_key()?;
            let value = if self.eat(TokenTag::Colon)? {
                self.parse_binding_target()?
            } else if self.eat(TokenTag::Eq)? {
                let name = match key {
                    PropKey::Ident(n) => n,
                    _ => return Err(self.error_at(ErrorKind::Syntactic, "shorthand default requires an identifier key")),
                };
                let default = self.parse_assign()?;
                Pattern::Assign { left: self.arena.patterns.alloc(Pattern::Ident(Symbol::new(name, SymbolKind::Funarg))), right: default }
            } else {
                let name = match key {
                    PropKey::Ident(n) => n,
                    _ => return Err(self.error_at(ErrorKind::Syntactic, "shorthand pattern requires an identifier key")),
                };
                Pattern::Ident(Symbol::new(name, SymbolKind::Funarg))
            };
            props.push(ObjectPatternProp { key, value, computed, shorthand: false });
            if !self.eat(TokenTag::Comma)? {
                break;
            }
        }
        self.expect(TokenTag::RBrace)?;
        Ok(Pattern::Object(self.arena.alloc_slice_props_pattern(props)))
    }

    fn parse_array_pattern(&mut self) -> Result<Pattern<'a>, JsError> {
        self.expect(TokenTag::LBracket)?;
        let mut elements = Vec::new();
        while self.cur.tag != TokenTag::RBracket {
            if self.cur.tag == TokenTag::Comma {
                elements.push(None);
                self.bump()?;
                continue;
            }
            if self.eat(TokenTag::Ellipsis)? {
                let rest = self.parse_binding_target()?;
                elements.push(Some(Pattern::Rest(self.arena.patterns.alloc(rest))));
            } else {
                elements.push(Some(self.parse_binding_target()?));
            }
            if !self.eat(TokenTag::Comma)? {
                break;
            }
        }
        self.expect(TokenTag::RBracket)?;
        Ok(Pattern::Array(self.arena.alloc_slice_opt_patterns(elements)))
    }

    fn parse_pattern_key(&mut self) -> Result<(PropKey<'a>, bool), JsError> {
        if self.eat(TokenTag::LBracket)? {
            let expr = self.parse_assign()?;
            self.expect(TokenTag::RBracket)?;
            return Ok((PropKey::Computed(expr), true));
        }
        let text = self.cur.text().map(str::to_string).unwrap_or_default();
        self.bump()?;
        Ok((PropKey::Ident(self.intern(&text)), false))
    }
}

/// Converts an already-parsed expression into a binding pattern, following
/// an arrow parameter list or a reinterpreted assignment target
/// (`toAssignable` in spec.md §4.2).
pub(crate) fn expr_to_pattern<'a>(p: &mut Parser<'a, '_>, expr: &Expr<'a>) -> Result<Pattern<'a>, JsError> {
    match expr {
        Expr::Ident(sym) => Ok(Pattern::Ident(Symbol::new(sym.name, SymbolKind::Funarg))),
        Expr::Assign { target, value, .. } => {
            let left = expr_to_pattern(p, target)?;
            Ok(Pattern::Assign { left: p.arena.patterns.alloc(left), right: value })
        }
        Expr::Spread { arg } => {
            let inner = expr_to_pattern(p, arg)?;
            Ok(Pattern::Rest(p.arena.patterns.alloc(inner)))
        }
        Expr::Array(elements) => {
            let mut out = Vec::with_capacity(elements.len());
            for el in elements.iter() {
                out.push(match el {
                    jsbundle_ast::ArrayElement::Hole => None,
                    jsbundle_ast::ArrayElement::Item(e) | jsbundle_ast::ArrayElement::Spread(e) => Some(expr_to_pattern(p, e)?),
                });
            }
            Ok(Pattern::Array(p.arena.alloc_slice_opt_patterns(out)))
        }
        Expr::Object(props) => {
            let mut out = Vec::with_capacity(props.len());
            for prop in props.iter() {
                let value = match &prop.value {
                    jsbundle_ast::PropValue::Expr(e) => expr_to_pattern(p, e)?,
                    _ => return Err(p.error_at(ErrorKind::Syntactic, "method shorthand is not a valid binding pattern")),
                };
                out.push(ObjectPatternProp { key: prop.key, value, computed: prop.computed, shorthand: prop.shorthand });
            }
            Ok(Pattern::Object(p.arena.alloc_slice_props_pattern(out)))
        }
        _ => Err(p.error_at(ErrorKind::Syntactic, "invalid destructuring target")),
    }
}
