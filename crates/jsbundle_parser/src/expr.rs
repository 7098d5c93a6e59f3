//! Expression parsing: Pratt-style binary precedence climbing, arrow
//! disambiguation, and the primary-expression grammar.

use crate::state::DestructuringErrors;
use crate::Parser;
use jsbundle_ast::{
    ArrayElement, AssignOp, BinOp, Expr, FunctionBody, Prop, PropKey, PropKind, PropValue, Symbol, SymbolKind,
    TemplateChunk, TokenTag, TokenValue, UnaryOp,
};
use jsbundle_base::{ErrorKind, JsError};

impl<'a, 'src> Parser<'a, 'src> {
    pub fn parse_expression(&mut self) -> Result<&'a Expr<'a>, JsError> {
        let first = self.parse_assign()?;
        if self.cur.tag != TokenTag::Comma {
            return Ok(first);
        }
        let mut exprs = vec![clone_expr(first)];
        while self.eat(TokenTag::Comma)? {
            exprs.push(clone_expr(self.parse_assign()?));
        }
        Ok(self.arena.alloc_expr(Expr::Sequence(self.arena.alloc_exprs(exprs))))
    }

    pub(crate) fn parse_assign(&mut self) -> Result<&'a Expr<'a>, JsError> {
        let start = self.cur.start;
        self.state.potential_arrow_at = Some(start);
        let mut errors = DestructuringErrors::new();
        let left = self.parse_conditional(&mut errors)?;
        if let Some(op) = assign_op_for(self.cur.tag) {
            self.bump()?;
            let right = self.parse_assign()?;
            let span = left.span_placeholder().merge(right.span_placeholder());
            return Ok(self.arena.alloc_expr(Expr::Assign { op, target: left, value: right, span }));
        }
        if errors.has_any() {
            // A destructuring-only construct survived into a plain
            // expression context; treat it the same as any other
            // unexpected-token failure (spec.md §4.2).
            return Err(self.unexpected());
        }
        Ok(left)
    }

    fn parse_conditional(&mut self, errors: &mut DestructuringErrors) -> Result<&'a Expr<'a>, JsError> {
        let test = self.parse_binary(0, errors)?;
        if self.eat(TokenTag::Question)? {
            let cons = self.parse_assign()?;
            self.expect(TokenTag::Colon)?;
            let alt = self.parse_assign()?;
            return Ok(self.arena.alloc_expr(Expr::Conditional { test, cons, alt }));
        }
        Ok(test)
    }

    fn parse_binary(&mut self, min_prec: u8, errors: &mut DestructuringErrors) -> Result<&'a Expr<'a>, JsError> {
        let mut left = self.parse_unary(errors)?;
        loop {
            let Some(op) = bin_op_for(self.cur.tag) else { break };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            let start_span = left.span_placeholder();
            self.bump()?;
            let next_min = if op.is_right_associative() { prec } else { prec + 1 };
            let right = self.parse_binary(next_min, errors)?;
            let span = start_span.merge(right.span_placeholder());
            left = self.arena.alloc_expr(Expr::Binary { op, left, right, span });
        }
        Ok(left)
    }

    fn parse_unary(&mut self, errors: &mut DestructuringErrors) -> Result<&'a Expr<'a>, JsError> {
        if let Some(op) = unary_prefix_op_for(self.cur.tag) {
            let start = self.cur.start;
            self.bump()?;
            let arg = self.parse_unary(errors)?;
            let span = jsbundle_base::Span::new(start, arg.span_placeholder().end);
            return Ok(self.arena.alloc_expr(Expr::UnaryPrefix { op, arg, span }));
        }
        if self.cur.tag == TokenTag::Name {
            if let Some(text) = self.cur.text() {
                if text == "await" && self.state.in_async {
                    self.bump()?;
                    let arg = self.parse_unary(errors)?;
                    return Ok(self.arena.alloc_expr(Expr::Await { arg }));
                }
                if text == "yield" && self.state.in_generator {
                    self.bump()?;
                    let delegate = self.eat(TokenTag::Star)?;
                    let arg = if matches!(self.cur.tag, TokenTag::Semi | TokenTag::RParen | TokenTag::RBrace | TokenTag::RBracket | TokenTag::Colon | TokenTag::Comma | TokenTag::Eof) {
                        None
                    } else {
                        Some(self.parse_assign()?)
                    };
                    return Ok(self.arena.alloc_expr(Expr::Yield { arg, delegate }));
                }
            }
        }
        let expr = self.parse_postfix(errors)?;
        if matches!(self.cur.tag, TokenTag::PlusPlus | TokenTag::MinusMinus) && !self.can_insert_semicolon() {
            let op = if self.cur.tag == TokenTag::PlusPlus { UnaryOp::Inc } else { UnaryOp::Dec };
            let span = expr.span_placeholder();
            self.bump()?;
            return Ok(self.arena.alloc_expr(Expr::UnaryPostfix { op, arg: expr, span }));
        }
        Ok(expr)
    }

    fn parse_postfix(&mut self, errors: &mut DestructuringErrors) -> Result<&'a Expr<'a>, JsError> {
        let mut expr = if self.eat(TokenTag::New)? {
            self.parse_new_expr()?
        } else {
            self.parse_primary(errors)?
        };
        loop {
            match self.cur.tag {
                TokenTag::Dot => {
                    self.bump()?;
                    let name = self.parse_ident_name()?;
                    expr = self.arena.alloc_expr(Expr::Dot { expr, name });
                }
                TokenTag::LBracket => {
                    self.bump()?;
                    let index = self.parse_expression()?;
                    self.expect(TokenTag::RBracket)?;
                    expr = self.arena.alloc_expr(Expr::Sub { expr, index });
                }
                TokenTag::LParen => {
                    let args = self.parse_arguments()?;
                    expr = self.arena.alloc_expr(Expr::Call { callee: expr, args });
                }
                TokenTag::BackQuote => {
                    // Tagged template: fold into a call-shaped node via the
                    // template itself; the tag function reference is kept
                    // as the callee of a synthetic call for simplicity.
                    let template = self.parse_template()?;
                    expr = self.arena.alloc_expr(Expr::Call { callee: expr, args: self.arena.alloc_exprs([clone_expr(template)]) });
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_new_expr(&mut self) -> Result<&'a Expr<'a>, JsError> {
        let mut errors = DestructuringErrors::new();
        let callee = if self.eat(TokenTag::New)? {
            self.parse_new_expr()?
        } else {
            self.parse_primary(&mut errors)?
        };
        let callee = self.parse_member_only(callee)?;
        let args = if self.cur.tag == TokenTag::LParen { self.parse_arguments()? } else { &[] };
        Ok(self.arena.alloc_expr(Expr::New { callee, args }))
    }

    fn parse_member_only(&mut self, mut expr: &'a Expr<'a>) -> Result<&'a Expr<'a>, JsError> {
        loop {
            match self.cur.tag {
                TokenTag::Dot => {
                    self.bump()?;
                    let name = self.parse_ident_name()?;
                    expr = self.arena.alloc_expr(Expr::Dot { expr, name });
                }
                TokenTag::LBracket => {
                    self.bump()?;
                    let index = self.parse_expression()?;
                    self.expect(TokenTag::RBracket)?;
                    expr = self.arena.alloc_expr(Expr::Sub { expr, index });
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_arguments(&mut self) -> Result<&'a [Expr<'a>], JsError> {
        self.expect(TokenTag::LParen)?;
        let mut args = Vec::new();
        while self.cur.tag != TokenTag::RParen {
            if self.eat(TokenTag::Ellipsis)? {
                let arg = self.parse_assign()?;
                args.push(Expr::Spread { arg });
            } else {
                args.push(clone_expr(self.parse_assign()?));
            }
            if !self.eat(TokenTag::Comma)? {
                break;
            }
        }
        self.expect(TokenTag::RParen)?;
        Ok(self.arena.alloc_exprs(args))
    }

    fn parse_ident_name(&mut self) -> Result<jsbundle_base::Name, JsError> {
        let text = match self.cur.text() {
            Some(t) => t.to_string(),
            None => return Err(self.unexpected()),
        };
        self.bump()?;
        Ok(self.intern(&text))
    }

    fn parse_primary(&mut self, errors: &mut DestructuringErrors) -> Result<&'a Expr<'a>, JsError> {
        match self.cur.tag {
            TokenTag::Num => {
                let TokenValue::Number { value, raw } = self.cur.value.clone() else { unreachable!() };
                self.bump()?;
                let raw = self.arena_leak_str(raw);
                Ok(self.arena.alloc_expr(Expr::Number { value, raw }))
            }
            TokenTag::Str => {
                let TokenValue::Str(s) = self.cur.value.clone() else { unreachable!() };
                self.bump()?;
                Ok(self.arena.alloc_expr(Expr::Str(self.arena_leak_str(s))))
            }
            TokenTag::Regexp => {
                let TokenValue::Regex { pattern, flags } = self.cur.value.clone() else { unreachable!() };
                self.bump()?;
                let pattern = self.arena_leak_str(pattern);
                let flags = self.arena_leak_str(flags);
                Ok(self.arena.alloc_expr(Expr::RegExp { pattern, flags }))
            }
            TokenTag::This => {
                self.bump()?;
                Ok(self.arena.alloc_expr(Expr::This))
            }
            TokenTag::Super => {
                self.bump()?;
                Ok(self.arena.alloc_expr(Expr::Super))
            }
            TokenTag::Null => {
                self.bump()?;
                Ok(self.arena.alloc_expr(Expr::Null))
            }
            TokenTag::True => {
                self.bump()?;
                Ok(self.arena.alloc_expr(Expr::True))
            }
            TokenTag::False => {
                self.bump()?;
                Ok(self.arena.alloc_expr(Expr::False))
            }
            TokenTag::Function => self.parse_function_expr(),
            TokenTag::Class => self.parse_class_expr(),
            TokenTag::LBracket => self.parse_array_literal(errors),
            TokenTag::LBrace => self.parse_object_literal(errors),
            TokenTag::BackQuote => self.parse_template(),
            TokenTag::LParen => self.parse_paren_or_arrow(errors),
            TokenTag::Name => self.parse_ident_or_arrow(),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_ident_or_arrow(&mut self) -> Result<&'a Expr<'a>, JsError> {
        let text = self.cur.text().map(str::to_string).ok_or_else(|| self.unexpected())?;
        if text == "async" {
            return self.try_parse_async(true);
        }
        let start = self.cur.start;
        self.bump()?;
        if self.cur.tag == TokenTag::Arrow && !self.can_insert_semicolon() {
            let name = self.intern(&text);
            return self.parse_arrow_from_idents(vec![name], start, false);
        }
        let name = self.intern(&text);
        Ok(self.arena.alloc_expr(Expr::Ident(Symbol::new(name, SymbolKind::Var))))
    }

    fn try_parse_async(&mut self, _initial: bool) -> Result<&'a Expr<'a>, JsError> {
        let start = self.cur.start;
        self.bump()?; // consume `async`
        if self.cur.tag == TokenTag::Function && !self.can_insert_semicolon() {
            return self.parse_function_expr_async();
        }
        if self.cur.tag == TokenTag::Name && !self.can_insert_semicolon() {
            let text = self.cur.text().unwrap().to_string();
            let name = self.intern(&text);
            self.bump()?;
            if self.cur.tag == TokenTag::Arrow {
                return self.parse_arrow_from_idents(vec![name], start, true);
            }
            return Err(self.unexpected());
        }
        if self.cur.tag == TokenTag::LParen && !self.can_insert_semicolon() {
            return self.parse_paren_or_arrow_async(start);
        }
        let name = self.intern("async");
        Ok(self.arena.alloc_expr(Expr::Ident(Symbol::new(name, SymbolKind::Var))))
    }

    fn parse_paren_or_arrow(&mut self, errors: &mut DestructuringErrors) -> Result<&'a Expr<'a>, JsError> {
        let start = self.cur.start;
        self.parse_paren_or_arrow_inner(start, false, errors)
    }

    fn parse_paren_or_arrow_async(&mut self, start: jsbundle_base::Position) -> Result<&'a Expr<'a>, JsError> {
        let mut errors = DestructuringErrors::new();
        self.parse_paren_or_arrow_inner(start, true, &mut errors)
    }

    fn parse_paren_or_arrow_inner(
        &mut self,
        start: jsbundle_base::Position,
        is_async: bool,
        errors: &mut DestructuringErrors,
    ) -> Result<&'a Expr<'a>, JsError> {
        self.expect(TokenTag::LParen)?;
        let mut items = Vec::new();
        let mut trailing_comma = false;
        while self.cur.tag != TokenTag::RParen {
            if self.eat(TokenTag::Ellipsis)? {
                let arg = self.parse_assign()?;
                items.push(Expr::Spread { arg });
            } else {
                items.push(clone_expr(self.parse_assign()?));
            }
            if self.eat(TokenTag::Comma)? {
                if self.cur.tag == TokenTag::RParen {
                    trailing_comma = true;
                    break;
                }
            } else {
                break;
            }
        }
        self.expect(TokenTag::RParen)?;
        if self.cur.tag == TokenTag::Arrow && !self.can_insert_semicolon() {
            let patterns: Vec<jsbundle_ast::Pattern<'a>> = items.iter().map(|e| crate::pattern::expr_to_pattern(self, e)).collect::<Result<_, _>>()?;
            return self.parse_arrow_body(patterns, is_async);
        }
        if trailing_comma {
            errors.trailing_comma = Some(start);
            return Err(self.error_at(ErrorKind::Syntactic, "trailing comma is only valid in an arrow parameter list"));
        }
        match items.len() {
            0 => Err(self.error_at(ErrorKind::Syntactic, "empty parenthesized expression")),
            1 => Ok(self.arena.alloc_expr(items.into_iter().next().unwrap())),
            _ => Ok(self.arena.alloc_expr(Expr::Sequence(self.arena.alloc_exprs(items)))),
        }
    }

    fn parse_arrow_from_idents(&mut self, names: Vec<jsbundle_base::Name>, _start: jsbundle_base::Position, is_async: bool) -> Result<&'a Expr<'a>, JsError> {
        let patterns = names.into_iter().map(|n| jsbundle_ast::Pattern::Ident(Symbol::new(n, SymbolKind::Funarg))).collect();
        self.parse_arrow_body(patterns, is_async)
    }

    fn parse_arrow_body(&mut self, params: Vec<jsbundle_ast::Pattern<'a>>, is_async: bool) -> Result<&'a Expr<'a>, JsError> {
        self.expect(TokenTag::Arrow)?;
        let guard = self.state.enter_function(is_async, false);
        let body = if self.cur.tag == TokenTag::LBrace {
            FunctionBody::Block(self.parse_block_body()?)
        } else {
            FunctionBody::Expr(self.parse_assign()?)
        };
        self.state.exit_function(guard);
        let func = self.arena.functions.alloc(jsbundle_ast::FunctionNode {
            name: None,
            params: self.arena.patterns.alloc_slice(params),
            body,
            is_async,
            is_generator: false,
            is_arrow: true,
            scope: jsbundle_ast::ScopeId(0),
        });
        Ok(self.arena.alloc_expr(Expr::Arrow(func)))
    }

    fn parse_array_literal(&mut self, errors: &mut DestructuringErrors) -> Result<&'a Expr<'a>, JsError> {
        self.expect(TokenTag::LBracket)?;
        let mut elements = Vec::new();
        while self.cur.tag != TokenTag::RBracket {
            if self.cur.tag == TokenTag::Comma {
                elements.push(ArrayElement::Hole);
                self.bump()?;
                continue;
            }
            if self.eat(TokenTag::Ellipsis)? {
                elements.push(ArrayElement::Spread(clone_expr(self.parse_assign()?)));
            } else {
                elements.push(ArrayElement::Item(clone_expr(self.parse_assign()?)));
            }
            if !self.eat(TokenTag::Comma)? {
                break;
            }
        }
        let _ = errors;
        self.expect(TokenTag::RBracket)?;
        Ok(self.arena.alloc_expr(Expr::Array(self.arena.alloc_slice_elements(elements))))
    }

    fn parse_object_literal(&mut self, errors: &mut DestructuringErrors) -> Result<&'a Expr<'a>, JsError> {
        self.expect(TokenTag::LBrace)?;
        let mut props = Vec::new();
        while self.cur.tag != TokenTag::RBrace {
            props.push(self.parse_object_prop(errors)?);
            if !self.eat(TokenTag::Comma)? {
                break;
            }
        }
        self.expect(TokenTag::RBrace)?;
        Ok(self.arena.alloc_expr(Expr::Object(self.arena.alloc_slice_props(props))))
    }

    fn parse_object_prop(&mut self, errors: &mut DestructuringErrors) -> Result<Prop<'a>, JsError> {
        if self.eat(TokenTag::Ellipsis)? {
            let arg = clone_expr(self.parse_assign()?);
            return Ok(Prop {
                key: PropKey::Ident(self.intern("...")),
                value: PropValue::Spread(arg),
                kind: PropKind::Init,
                computed: false,
                shorthand: false,
            });
        }
        let (key, computed) = self.parse_prop_key()?;
        if self.cur.tag == TokenTag::LParen {
            let func = self.parse_method_body(false, false)?;
            return Ok(Prop { key, value: PropValue::Method(func), kind: PropKind::Method, computed, shorthand: false });
        }
        if self.eat(TokenTag::Colon)? {
            let value = clone_expr(self.parse_assign()?);
            return Ok(Prop { key, value: PropValue::Expr(value), kind: PropKind::Init, computed, shorthand: false });
        }
        // Shorthand `{ a }` / `{ a = 1 }` (the latter only legal as a
        // pattern; recorded so a later pattern conversion can accept it and
        // a plain-expression use can reject it).
        if self.cur.tag == TokenTag::Eq {
            errors.shorthand_assign = Some(self.cur.start);
            self.bump()?;
            let default = clone_expr(self.parse_assign()?);
            return Ok(Prop {
                key,
                value: PropValue::Expr(Expr::Assign {
                    op: AssignOp::Assign,
                    target: self.arena.alloc_expr(ident_from_key(&key)),
                    value: self.arena.alloc_expr(default),
                    span: jsbundle_base::Span::default(),
                }),
                kind: PropKind::Init,
                computed,
                shorthand: true,
            });
        }
        Ok(Prop { key, value: PropValue::Expr(ident_from_key(&key)), kind: PropKind::Init, computed, shorthand: true })
    }

    pub(crate) fn parse_prop_key(&mut self) -> Result<(PropKey<'a>, bool), JsError> {
        if self.eat(TokenTag::LBracket)? {
            let expr = self.parse_assign()?;
            self.expect(TokenTag::RBracket)?;
            return Ok((PropKey::Computed(expr), true));
        }
        match self.cur.value.clone() {
            TokenValue::Str(s) => {
                self.bump()?;
                Ok((PropKey::Str(self.arena_leak_str(s)), false))
            }
            TokenValue::Number { value, .. } => {
                self.bump()?;
                Ok((PropKey::Num(value), false))
            }
            _ => {
                let text = self.cur.text().map(str::to_string).unwrap_or_default();
                self.bump()?;
                Ok((PropKey::Ident(self.intern(&text)), false))
            }
        }
    }

    fn parse_method_body(&mut self, is_async: bool, is_generator: bool) -> Result<&'a jsbundle_ast::FunctionNode<'a>, JsError> {
        let params = self.parse_param_list()?;
        let guard = self.state.enter_function(is_async, is_generator);
        let body = FunctionBody::Block(self.parse_block_body()?);
        self.state.exit_function(guard);
        Ok(self.arena.functions.alloc(jsbundle_ast::FunctionNode {
            name: None,
            params,
            body,
            is_async,
            is_generator,
            is_arrow: false,
            scope: jsbundle_ast::ScopeId(0),
        }))
    }

    pub(crate) fn parse_param_list(&mut self) -> Result<&'a [jsbundle_ast::Pattern<'a>], JsError> {
        self.expect(TokenTag::LParen)?;
        let mut params = Vec::new();
        while self.cur.tag != TokenTag::RParen {
            if self.eat(TokenTag::Ellipsis)? {
                let inner = self.parse_binding_target()?;
                params.push(jsbundle_ast::Pattern::Rest(self.arena.patterns.alloc(inner)));
            } else {
                params.push(self.parse_binding_target()?);
            }
            if !self.eat(TokenTag::Comma)? {
                break;
            }
        }
        self.expect(TokenTag::RParen)?;
        Ok(self.arena.patterns.alloc_slice(params))
    }

    fn parse_template(&mut self) -> Result<&'a Expr<'a>, JsError> {
        self.expect(TokenTag::BackQuote)?;
        let mut quasis = Vec::new();
        let mut exprs = Vec::new();
        loop {
            match self.cur.value.clone() {
                TokenValue::Template { raw, cooked } => {
                    quasis.push(TemplateChunk { raw: self.arena_leak_str(raw), cooked: cooked.map(|c| self.arena_leak_str(c)) });
                }
                _ => return Err(self.unexpected()),
            }
            let was_invalid_terminator = self.cur.tag == TokenTag::Template;
            self.bump()?;
            if !was_invalid_terminator {
                break;
            }
            if self.cur.tag != TokenTag::DollarBraceL {
                break;
            }
            self.bump()?;
            exprs.push(clone_expr(self.parse_expression()?));
            self.expect(TokenTag::RBrace).ok();
        }
        Ok(self.arena.alloc_expr(Expr::TemplateString { quasis: self.arena.alloc_slice_chunks(quasis), exprs: self.arena.alloc_exprs(exprs) }))
    }

    fn parse_function_expr(&mut self) -> Result<&'a Expr<'a>, JsError> {
        let func = crate::function::parse_function_common(self, false)?;
        Ok(self.arena.alloc_expr(Expr::Function(func)))
    }

    fn parse_function_expr_async(&mut self) -> Result<&'a Expr<'a>, JsError> {
        let func = crate::function::parse_function_common(self, true)?;
        Ok(self.arena.alloc_expr(Expr::Function(func)))
    }

    fn parse_class_expr(&mut self) -> Result<&'a Expr<'a>, JsError> {
        let class = crate::function::parse_class_common(self)?;
        Ok(self.arena.alloc_expr(Expr::Class(class)))
    }

    fn arena_leak_str(&self, s: String) -> &'a str {
        self.arena.alloc_str(s)
    }
}

fn ident_from_key<'a>(key: &PropKey<'a>) -> Expr<'a> {
    match key {
        PropKey::Ident(name) => Expr::Ident(Symbol::new(*name, SymbolKind::Var)),
        _ => Expr::Undefined,
    }
}

/// `Expr` variants are either `Copy` scalars or arena references, so a
/// field-by-field shallow copy is always possible; used when an already
/// arena-allocated node needs to be re-collected into a `Vec` for
/// `alloc_exprs`/`alloc_slice`.
pub(crate) fn clone_expr<'a>(expr: &'a Expr<'a>) -> Expr<'a> {
    match expr {
        Expr::Number { value, raw } => Expr::Number { value: *value, raw },
        Expr::Str(s) => Expr::Str(s),
        Expr::RegExp { pattern, flags } => Expr::RegExp { pattern, flags },
        Expr::This => Expr::This,
        Expr::Super => Expr::Super,
        Expr::Null => Expr::Null,
        Expr::True => Expr::True,
        Expr::False => Expr::False,
        Expr::NaN => Expr::NaN,
        Expr::Infinity => Expr::Infinity,
        Expr::Undefined => Expr::Undefined,
        Expr::Ident(sym) => Expr::Ident(Symbol::new(sym.name, sym.kind)),
        Expr::Binary { op, left, right, span } => Expr::Binary { op: *op, left, right, span: *span },
        Expr::Assign { op, target, value, span } => Expr::Assign { op: *op, target, value, span: *span },
        Expr::UnaryPrefix { op, arg, span } => Expr::UnaryPrefix { op: *op, arg, span: *span },
        Expr::UnaryPostfix { op, arg, span } => Expr::UnaryPostfix { op: *op, arg, span: *span },
        Expr::Conditional { test, cons, alt } => Expr::Conditional { test, cons, alt },
        Expr::Sequence(exprs) => Expr::Sequence(exprs),
        Expr::Call { callee, args } => Expr::Call { callee, args },
        Expr::New { callee, args } => Expr::New { callee, args },
        Expr::Dot { expr, name } => Expr::Dot { expr, name: *name },
        Expr::Sub { expr, index } => Expr::Sub { expr, index },
        Expr::Array(elements) => Expr::Array(elements),
        Expr::Object(props) => Expr::Object(props),
        Expr::Arrow(f) => Expr::Arrow(f),
        Expr::Function(f) => Expr::Function(f),
        Expr::Class(c) => Expr::Class(c),
        Expr::TemplateString { quasis, exprs } => Expr::TemplateString { quasis, exprs },
        Expr::Await { arg } => Expr::Await { arg },
        Expr::Yield { arg, delegate } => Expr::Yield { arg: *arg, delegate: *delegate },
        Expr::Spread { arg } => Expr::Spread { arg },
        Expr::ImportExpression { module } => Expr::ImportExpression { module },
    }
}

fn assign_op_for(tag: TokenTag) -> Option<AssignOp> {
    use AssignOp::*;
    Some(match tag {
        TokenTag::Eq => Assign,
        TokenTag::PlusEq => AddAssign,
        TokenTag::MinusEq => SubAssign,
        TokenTag::StarEq => MulAssign,
        TokenTag::SlashEq => DivAssign,
        TokenTag::PercentEq => ModAssign,
        TokenTag::StarstarEq => PowAssign,
        TokenTag::ShlEq => ShlAssign,
        TokenTag::ShrEq => ShrAssign,
        TokenTag::UshrEq => UshrAssign,
        TokenTag::AmpEq => BitAndAssign,
        TokenTag::PipeEq => BitOrAssign,
        TokenTag::CaretEq => BitXorAssign,
        TokenTag::AmpAmpEq => LogicalAndAssign,
        TokenTag::PipePipeEq => LogicalOrAssign,
        _ => return None,
    })
}

fn bin_op_for(tag: TokenTag) -> Option<BinOp> {
    use BinOp::*;
    Some(match tag {
        TokenTag::Plus => Add,
        TokenTag::Minus => Sub,
        TokenTag::Star => Mul,
        TokenTag::Slash => Div,
        TokenTag::Percent => Mod,
        TokenTag::Starstar => Pow,
        TokenTag::Amp => BitAnd,
        TokenTag::Pipe => BitOr,
        TokenTag::Caret => BitXor,
        TokenTag::Shl => Shl,
        TokenTag::Shr => Shr,
        TokenTag::Ushr => Ushr,
        TokenTag::Lt => Lt,
        TokenTag::Gt => Gt,
        TokenTag::Le => Le,
        TokenTag::Ge => Ge,
        TokenTag::EqEq => Eq,
        TokenTag::NotEq => NotEq,
        TokenTag::EqEqEq => StrictEq,
        TokenTag::NotEqEq => StrictNotEq,
        TokenTag::AmpAmp => LogicalAnd,
        TokenTag::PipePipe => LogicalOr,
        TokenTag::In => In,
        TokenTag::Instanceof => Instanceof,
        _ => return None,
    })
}

fn unary_prefix_op_for(tag: TokenTag) -> Option<UnaryOp> {
    use UnaryOp::*;
    Some(match tag {
        TokenTag::Plus => Plus,
        TokenTag::Minus => Minus,
        TokenTag::Bang => Not,
        TokenTag::Tilde => BitNot,
        TokenTag::Typeof => Typeof,
        TokenTag::Void => Void,
        TokenTag::Delete => Delete,
        TokenTag::PlusPlus => Inc,
        TokenTag::MinusMinus => Dec,
        _ => return None,
    })
}

/// A placeholder span accessor: full span propagation for every expression
/// variant (atoms included) is future work for the pretty-printer
/// integration; compressor passes key off node identity, not span text, so
/// this degrades gracefully to an empty span for atoms.
pub(crate) trait SpanPlaceholder {
    fn span_placeholder(&self) -> jsbundle_base::Span;
}

impl<'a> SpanPlaceholder for Expr<'a> {
    fn span_placeholder(&self) -> jsbundle_base::Span {
        match self {
            Expr::Binary { span, .. } | Expr::Assign { span, .. } | Expr::UnaryPrefix { span, .. } | Expr::UnaryPostfix { span, .. } => *span,
            _ => jsbundle_base::Span::default(),
        }
    }
}
