//! Statement-level parsing: the full grammar of spec.md §3's `Stmt` type,
//! directive-prologue detection, and loop/label bookkeeping used by
//! `break`/`continue` legality checks.

use crate::Parser;
use jsbundle_ast::{CatchClause, DeclKind, ForInit, ForTarget, ScopeId, Stmt, SwitchCase, TokenTag, VarDef};
use jsbundle_base::{ErrorKind, JsError};

impl<'a, 'src> Parser<'a, 'src> {
    pub fn parse_statement(&mut self) -> Result<Stmt<'a>, JsError> {
        let was_directive_position = self.can_be_directive;
        let stmt = self.parse_statement_inner()?;
        if was_directive_position {
            if let Stmt::Simple(expr) = &stmt {
                if let jsbundle_ast::Expr::Str(text) = **expr {
                    if text == "use strict" {
                        self.state.strict = true;
                    }
                    // A leading string-literal statement keeps the directive
                    // prologue open for the next statement.
                    return Ok(stmt);
                }
            }
        }
        self.can_be_directive = false;
        Ok(stmt)
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt<'a>, JsError> {
        match self.cur.tag {
            TokenTag::LBrace => Ok(Stmt::Block(self.parse_block_body()?)),
            TokenTag::Semi => {
                self.bump()?;
                Ok(Stmt::Empty)
            }
            TokenTag::Var | TokenTag::Const => self.parse_var_statement(),
            TokenTag::Name if self.cur.text() == Some("let") => self.parse_var_statement(),
            TokenTag::Function => {
                let func = crate::function::parse_function_common(self, false)?;
                Ok(Stmt::FunctionDecl(func))
            }
            TokenTag::Class => {
                let class = crate::function::parse_class_common(self)?;
                Ok(Stmt::ClassDecl(class))
            }
            TokenTag::If => self.parse_if(),
            TokenTag::While => self.parse_while(),
            TokenTag::Do => self.parse_do_while(),
            TokenTag::For => self.parse_for(),
            TokenTag::Switch => self.parse_switch(),
            TokenTag::Try => self.parse_try(),
            TokenTag::Throw => self.parse_throw(),
            TokenTag::Return => self.parse_return(),
            TokenTag::Break => self.parse_break_continue(true),
            TokenTag::Continue => self.parse_break_continue(false),
            TokenTag::With => self.parse_with(),
            TokenTag::Debugger => {
                self.bump()?;
                self.semicolon()?;
                Ok(Stmt::Debugger)
            }
            TokenTag::Import => self.parse_import_statement(),
            TokenTag::Export => self.parse_export_statement(),
            _ => self.parse_expression_or_labeled_statement(),
        }
    }

    /// Parses `{ stmt* }`, tracking directive-prologue state across the
    /// body's own leading string-literal statements.
    pub(crate) fn parse_block_body(&mut self) -> Result<&'a [Stmt<'a>], JsError> {
        self.expect(TokenTag::LBrace)?;
        let outer_directive = self.can_be_directive;
        self.can_be_directive = true;
        let mut body = Vec::new();
        while self.cur.tag != TokenTag::RBrace {
            body.push(self.parse_statement()?);
        }
        self.expect(TokenTag::RBrace)?;
        self.can_be_directive = outer_directive;
        Ok(self.arena.alloc_stmts(body))
    }

    fn parse_var_statement(&mut self) -> Result<Stmt<'a>, JsError> {
        let kind = self.eat_decl_kind()?;
        let decls = self.parse_var_declarator_list()?;
        self.semicolon()?;
        Ok(Stmt::VarDecl { kind, decls: self.arena.alloc_var_defs(decls) })
    }

    pub(crate) fn eat_decl_kind(&mut self) -> Result<DeclKind, JsError> {
        match self.cur.tag {
            TokenTag::Var => {
                self.bump()?;
                Ok(DeclKind::Var)
            }
            TokenTag::Const => {
                self.bump()?;
                Ok(DeclKind::Const)
            }
            _ => {
                self.bump()?; // consumes the `let` Name token
                Ok(DeclKind::Let)
            }
        }
    }

    pub(crate) fn parse_var_declarator_list(&mut self) -> Result<Vec<VarDef<'a>>, JsError> {
        let mut decls = Vec::new();
        loop {
            let name = self.parse_binding_target()?;
            let init = if self.eat(TokenTag::Eq)? { Some(self.parse_assign()?) } else { None };
            decls.push(VarDef { name, init });
            if !self.eat(TokenTag::Comma)? {
                break;
            }
        }
        Ok(decls)
    }

    fn parse_if(&mut self) -> Result<Stmt<'a>, JsError> {
        self.expect(TokenTag::If)?;
        self.expect(TokenTag::LParen)?;
        let test = self.parse_expression()?;
        self.expect(TokenTag::RParen)?;
        let cons = self.arena.alloc_stmt(self.parse_statement()?);
        let alt = if self.eat(TokenTag::Else)? { Some(self.arena.alloc_stmt(self.parse_statement()?)) } else { None };
        Ok(Stmt::If { test, cons, alt })
    }

    fn parse_while(&mut self) -> Result<Stmt<'a>, JsError> {
        self.expect(TokenTag::While)?;
        self.expect(TokenTag::LParen)?;
        let test = self.parse_expression()?;
        self.expect(TokenTag::RParen)?;
        let body = self.parse_loop_body()?;
        Ok(Stmt::While { test, body })
    }

    fn parse_do_while(&mut self) -> Result<Stmt<'a>, JsError> {
        self.expect(TokenTag::Do)?;
        let body = self.parse_loop_body()?;
        self.expect(TokenTag::While)?;
        self.expect(TokenTag::LParen)?;
        let test = self.parse_expression()?;
        self.expect(TokenTag::RParen)?;
        self.eat(TokenTag::Semi)?;
        Ok(Stmt::Do { body, test })
    }

    fn parse_loop_body(&mut self) -> Result<&'a Stmt<'a>, JsError> {
        let saved_break = self.state.allow_break;
        let saved_continue = self.state.allow_continue;
        self.state.allow_break = true;
        self.state.allow_continue = true;
        let body = self.parse_statement()?;
        self.state.allow_break = saved_break;
        self.state.allow_continue = saved_continue;
        Ok(self.arena.alloc_stmt(body))
    }

    fn parse_for(&mut self) -> Result<Stmt<'a>, JsError> {
        self.expect(TokenTag::For)?;
        let is_await = self.cur.tag == TokenTag::Name && self.cur.text() == Some("await");
        if is_await {
            self.bump()?;
        }
        self.expect(TokenTag::LParen)?;

        if self.cur.tag == TokenTag::Semi {
            self.bump()?;
            return self.parse_for_rest(None);
        }

        if self.cur.tag == TokenTag::Var || self.cur.tag == TokenTag::Const || (self.cur.tag == TokenTag::Name && self.cur.text() == Some("let")) {
            let kind = self.eat_decl_kind()?;
            let pattern = self.parse_binding_target()?;
            if self.cur.tag == TokenTag::In || (self.cur.tag == TokenTag::Name && self.cur.text() == Some("of")) {
                return self.parse_for_in_of(ForTarget::VarDecl { kind, pattern }, is_await);
            }
            let init = if self.eat(TokenTag::Eq)? { Some(self.parse_assign()?) } else { None };
            let mut decls = vec![VarDef { name: pattern, init }];
            while self.eat(TokenTag::Comma)? {
                let name = self.parse_binding_target()?;
                let init = if self.eat(TokenTag::Eq)? { Some(self.parse_assign()?) } else { None };
                decls.push(VarDef { name, init });
            }
            self.expect(TokenTag::Semi)?;
            return self.parse_for_rest(Some(ForInit::VarDecl { kind, decls: self.arena.alloc_var_defs(decls) }));
        }

        let expr = self.parse_expression()?;
        if self.cur.tag == TokenTag::In || (self.cur.tag == TokenTag::Name && self.cur.text() == Some("of")) {
            let pattern = crate::pattern::expr_to_pattern(self, expr)?;
            return self.parse_for_in_of(ForTarget::Pattern(pattern), is_await);
        }
        self.expect(TokenTag::Semi)?;
        self.parse_for_rest(Some(ForInit::Expr(expr)))
    }

    fn parse_for_in_of(&mut self, target: ForTarget<'a>, is_await: bool) -> Result<Stmt<'a>, JsError> {
        let is_of = self.cur.tag == TokenTag::Name && self.cur.text() == Some("of");
        self.bump()?; // `in` or `of`
        let object = if is_of { self.parse_assign()? } else { self.parse_expression()? };
        self.expect(TokenTag::RParen)?;
        let body = self.parse_loop_body()?;
        if is_of {
            Ok(Stmt::ForOf { target, object, body, is_await })
        } else {
            Ok(Stmt::ForIn { target, object, body })
        }
    }

    fn parse_for_rest(&mut self, init: Option<ForInit<'a>>) -> Result<Stmt<'a>, JsError> {
        let test = if self.cur.tag == TokenTag::Semi { None } else { Some(self.parse_expression()?) };
        self.expect(TokenTag::Semi)?;
        let update = if self.cur.tag == TokenTag::RParen { None } else { Some(self.parse_expression()?) };
        self.expect(TokenTag::RParen)?;
        let body = self.parse_loop_body()?;
        Ok(Stmt::For { init, test, update, body })
    }

    fn parse_switch(&mut self) -> Result<Stmt<'a>, JsError> {
        self.expect(TokenTag::Switch)?;
        self.expect(TokenTag::LParen)?;
        let discriminant = self.parse_expression()?;
        self.expect(TokenTag::RParen)?;
        self.expect(TokenTag::LBrace)?;
        let saved_break = self.state.allow_break;
        self.state.allow_break = true;
        let mut cases = Vec::new();
        while self.cur.tag != TokenTag::RBrace {
            let test = if self.eat(TokenTag::Case)? {
                let e = self.parse_expression()?;
                self.expect(TokenTag::Colon)?;
                Some(e)
            } else {
                self.expect(TokenTag::Default)?;
                self.expect(TokenTag::Colon)?;
                None
            };
            let mut body = Vec::new();
            while !matches!(self.cur.tag, TokenTag::Case | TokenTag::Default | TokenTag::RBrace) {
                body.push(self.parse_statement()?);
            }
            cases.push(SwitchCase { test, body: self.arena.alloc_stmts(body) });
        }
        self.expect(TokenTag::RBrace)?;
        self.state.allow_break = saved_break;
        Ok(Stmt::Switch { discriminant, cases: self.arena.alloc_switch_cases(cases) })
    }

    fn parse_try(&mut self) -> Result<Stmt<'a>, JsError> {
        self.expect(TokenTag::Try)?;
        let block = self.parse_block_body()?;
        let handler = if self.eat(TokenTag::Catch)? {
            let param = if self.eat(TokenTag::LParen)? {
                let p = self.parse_binding_target()?;
                self.expect(TokenTag::RParen)?;
                Some(p)
            } else {
                None
            };
            let body = self.parse_block_body()?;
            Some(CatchClause { param, body, scope: ScopeId(0) })
        } else {
            None
        };
        let finalizer = if self.eat(TokenTag::Finally)? { Some(self.parse_block_body()?) } else { None };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.error_at(ErrorKind::Syntactic, "a try statement needs a catch or finally clause"));
        }
        Ok(Stmt::Try { block, handler, finalizer })
    }

    fn parse_throw(&mut self) -> Result<Stmt<'a>, JsError> {
        self.expect(TokenTag::Throw)?;
        if self.can_insert_semicolon() {
            return Err(self.error_at(ErrorKind::Syntactic, "illegal newline after `throw`"));
        }
        let arg = self.parse_expression()?;
        self.semicolon()?;
        Ok(Stmt::Throw { arg })
    }

    fn parse_return(&mut self) -> Result<Stmt<'a>, JsError> {
        self.expect(TokenTag::Return)?;
        let arg = if matches!(self.cur.tag, TokenTag::Semi | TokenTag::RBrace | TokenTag::Eof) || self.can_insert_semicolon() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.semicolon()?;
        Ok(Stmt::Return { arg })
    }

    fn parse_break_continue(&mut self, is_break: bool) -> Result<Stmt<'a>, JsError> {
        self.bump()?; // `break` or `continue`
        let label = if !self.can_insert_semicolon() && self.cur.tag == TokenTag::Name {
            let text = self.cur.text().map(str::to_string).unwrap();
            self.bump()?;
            Some(self.intern(&text))
        } else {
            None
        };
        self.semicolon()?;
        if is_break {
            if label.is_none() && !self.state.allow_break {
                return Err(self.error_at(ErrorKind::Syntactic, "illegal break outside of a loop or switch"));
            }
            Ok(Stmt::Break { label })
        } else {
            if label.is_none() && !self.state.allow_continue {
                return Err(self.error_at(ErrorKind::Syntactic, "illegal continue outside of a loop"));
            }
            Ok(Stmt::Continue { label })
        }
    }

    fn parse_with(&mut self) -> Result<Stmt<'a>, JsError> {
        self.expect(TokenTag::With)?;
        self.expect(TokenTag::LParen)?;
        let object = self.parse_expression()?;
        self.expect(TokenTag::RParen)?;
        let body = self.arena.alloc_stmt(self.parse_statement()?);
        Ok(Stmt::With { object, body })
    }

    fn parse_expression_or_labeled_statement(&mut self) -> Result<Stmt<'a>, JsError> {
        if self.cur.tag == TokenTag::Name && self.peek()?.tag == TokenTag::Colon {
            let text = self.cur.text().map(str::to_string).unwrap();
            self.bump()?; // identifier
            self.bump()?; // `:`
            let label = self.intern(&text);
            let is_loop = matches!(self.cur.tag, TokenTag::For | TokenTag::While | TokenTag::Do);
            let saved_break = self.state.allow_break;
            let saved_continue = self.state.allow_continue;
            if is_loop {
                self.state.allow_continue = true;
            }
            self.state.allow_break = true;
            let body = self.arena.alloc_stmt(self.parse_statement()?);
            self.state.allow_break = saved_break;
            self.state.allow_continue = saved_continue;
            return Ok(Stmt::Labeled { label, body });
        }
        let expr = self.parse_expression()?;
        self.semicolon()?;
        Ok(Stmt::Simple(expr))
    }
}
