//! `import`/`export` declaration parsing (spec.md §5.6's module grammar).
//!
//! `from`/`as` are contextual keywords, lexed as plain `Name` tokens like
//! `async`/`get`/`set` elsewhere in this crate — resolved here by text
//! comparison rather than a dedicated `TokenTag`.

use crate::Parser;
use jsbundle_ast::{
    DefaultExport, ExportNode, ExportedDecl, ImportNode, NameMapping, Stmt, Symbol, SymbolKind, TokenTag,
};
use jsbundle_base::{ErrorKind, JsError};

impl<'a, 'src> Parser<'a, 'src> {
    pub(crate) fn parse_import_statement(&mut self) -> Result<Stmt<'a>, JsError> {
        self.expect(TokenTag::Import)?;

        // `import "module"` — side-effect only.
        if let jsbundle_ast::TokenValue::Str(_) = &self.cur.value {
            let module_text = self.expect_string_text()?;
            let module = self.arena.alloc_str(module_text);
            self.semicolon()?;
            return Ok(Stmt::Import(self.arena.alloc_import(ImportNode::Bare { module })));
        }

        // `import * as ns from "module"`.
        if self.cur.tag == TokenTag::Star {
            self.bump()?;
            self.expect_contextual("as")?;
            let local = self.parse_import_local_binding()?;
            self.expect_contextual("from")?;
            let module_text = self.expect_string_text()?;
            let module = self.arena.alloc_str(module_text);
            self.semicolon()?;
            return Ok(Stmt::Import(self.arena.alloc_import(ImportNode::Namespace { local, module })));
        }

        // `import { a, b as c } from "module"`.
        if self.cur.tag == TokenTag::LBrace {
            let specifiers = self.parse_named_import_specifiers()?;
            self.expect_contextual("from")?;
            let module_text = self.expect_string_text()?;
            let module = self.arena.alloc_str(module_text);
            self.semicolon()?;
            return Ok(Stmt::Import(self.arena.alloc_import(ImportNode::Named {
                specifiers: self.arena.alloc_name_mappings(specifiers),
                module,
            })));
        }

        // `import def from "module"` — default import, possibly combined
        // with a namespace or named clause (`import def, * as ns from "m"`,
        // `import def, { a, b } from "m"`). `Stmt::Import` carries a single
        // `ImportNode`, so a combined default+namespace clause (the one
        // shape that can't collapse into one `Named` node) is emitted as a
        // two-statement block instead of inventing a second `Stmt` variant.
        let default_local = self.parse_import_local_binding()?;
        if self.eat(TokenTag::Comma)? {
            if self.cur.tag == TokenTag::Star {
                self.bump()?;
                self.expect_contextual("as")?;
                let ns_local = self.parse_import_local_binding()?;
                self.expect_contextual("from")?;
                let module_text = self.expect_string_text()?;
                let module = self.arena.alloc_str(module_text);
                self.semicolon()?;
                let default_import = Stmt::Import(
                    self.arena.alloc_import(ImportNode::Default { local: default_local, module }),
                );
                let ns_import =
                    Stmt::Import(self.arena.alloc_import(ImportNode::Namespace { local: ns_local, module }));
                return Ok(Stmt::Block(self.arena.alloc_stmts([default_import, ns_import])));
            }
            let mut specifiers = self.parse_named_import_specifiers()?;
            specifiers.insert(0, NameMapping { foreign_name: self.intern("default"), local: default_local });
            self.expect_contextual("from")?;
            let module_text = self.expect_string_text()?;
            let module = self.arena.alloc_str(module_text);
            self.semicolon()?;
            return Ok(Stmt::Import(self.arena.alloc_import(ImportNode::Named {
                specifiers: self.arena.alloc_name_mappings(specifiers),
                module,
            })));
        }
        self.expect_contextual("from")?;
        let module_text = self.expect_string_text()?;
        let module = self.arena.alloc_str(module_text);
        self.semicolon()?;
        Ok(Stmt::Import(self.arena.alloc_import(ImportNode::Default { local: default_local, module })))
    }

    pub(crate) fn parse_export_statement(&mut self) -> Result<Stmt<'a>, JsError> {
        self.expect(TokenTag::Export)?;

        if self.eat(TokenTag::Default)? {
            let default = match self.cur.tag {
                TokenTag::Function => DefaultExport::Function(crate::function::parse_function_common(self, false)?),
                TokenTag::Class => DefaultExport::Class(crate::function::parse_class_common(self)?),
                TokenTag::Name if self.cur.text() == Some("async") && self.peek()?.tag == TokenTag::Function => {
                    self.bump()?;
                    DefaultExport::Function(crate::function::parse_function_common(self, true)?)
                }
                _ => {
                    let expr = self.parse_assign()?;
                    self.semicolon()?;
                    DefaultExport::Expr(expr)
                }
            };
            return Ok(Stmt::Export(self.arena.alloc_export(ExportNode::Default(default))));
        }

        if self.cur.tag == TokenTag::Star {
            self.bump()?;
            if self.cur.tag == TokenTag::Name && self.cur.text() == Some("as") {
                self.bump()?;
                let local = self.parse_name()?;
                self.expect_contextual("from")?;
                let module_text = self.expect_string_text()?;
                let module = self.arena.alloc_str(module_text);
                self.semicolon()?;
                return Ok(Stmt::Export(self.arena.alloc_export(ExportNode::AllAs { local, module })));
            }
            self.expect_contextual("from")?;
            let module_text = self.expect_string_text()?;
            let module = self.arena.alloc_str(module_text);
            self.semicolon()?;
            return Ok(Stmt::Export(self.arena.alloc_export(ExportNode::All { module })));
        }

        if self.cur.tag == TokenTag::LBrace {
            let specifiers = self.parse_named_export_specifiers()?;
            if self.cur.tag == TokenTag::Name && self.cur.text() == Some("from") {
                self.bump()?;
                let module_text = self.expect_string_text()?;
                let module = self.arena.alloc_str(module_text);
                self.semicolon()?;
                return Ok(Stmt::Export(self.arena.alloc_export(ExportNode::NamedFrom {
                    specifiers: self.arena.alloc_name_mappings(specifiers),
                    module,
                })));
            }
            self.semicolon()?;
            return Ok(Stmt::Export(
                self.arena.alloc_export(ExportNode::Named { specifiers: self.arena.alloc_name_mappings(specifiers) }),
            ));
        }

        let decl = match self.cur.tag {
            TokenTag::Function => ExportedDecl::Function(crate::function::parse_function_common(self, false)?),
            TokenTag::Class => ExportedDecl::Class(crate::function::parse_class_common(self)?),
            TokenTag::Name if self.cur.text() == Some("async") && self.peek()?.tag == TokenTag::Function => {
                self.bump()?;
                ExportedDecl::Function(crate::function::parse_function_common(self, true)?)
            }
            TokenTag::Var | TokenTag::Const | TokenTag::Name if self.is_decl_keyword() => {
                let kind = self.eat_decl_kind()?;
                let decls = self.parse_var_declarator_list()?;
                self.semicolon()?;
                ExportedDecl::Var { kind, decls: self.arena.alloc_var_defs(decls) }
            }
            _ => return Err(self.error_at(ErrorKind::Syntactic, "expected a declaration after `export`")),
        };
        Ok(Stmt::Export(self.arena.alloc_export(ExportNode::Declaration(decl))))
    }

    fn is_decl_keyword(&self) -> bool {
        matches!(self.cur.tag, TokenTag::Var | TokenTag::Const) || (self.cur.tag == TokenTag::Name && self.cur.text() == Some("let"))
    }

    fn parse_import_local_binding(&mut self) -> Result<Symbol, JsError> {
        let name = self.parse_name()?;
        Ok(Symbol::new(name, SymbolKind::Import))
    }

    fn parse_named_import_specifiers(&mut self) -> Result<Vec<NameMapping>, JsError> {
        self.expect(TokenTag::LBrace)?;
        let mut out = Vec::new();
        while self.cur.tag != TokenTag::RBrace {
            let foreign_name = self.parse_name()?;
            let local = if self.cur.tag == TokenTag::Name && self.cur.text() == Some("as") {
                self.bump()?;
                self.parse_name()?
            } else {
                foreign_name
            };
            out.push(NameMapping { foreign_name, local: Symbol::new(local, SymbolKind::Import) });
            if !self.eat(TokenTag::Comma)? {
                break;
            }
        }
        self.expect(TokenTag::RBrace)?;
        Ok(out)
    }

    fn parse_named_export_specifiers(&mut self) -> Result<Vec<NameMapping>, JsError> {
        self.expect(TokenTag::LBrace)?;
        let mut out = Vec::new();
        while self.cur.tag != TokenTag::RBrace {
            let local_name = self.parse_name()?;
            let foreign_name = if self.cur.tag == TokenTag::Name && self.cur.text() == Some("as") {
                self.bump()?;
                self.parse_name()?
            } else {
                local_name
            };
            out.push(NameMapping { foreign_name, local: Symbol::new(local_name, SymbolKind::Export) });
            if !self.eat(TokenTag::Comma)? {
                break;
            }
        }
        self.expect(TokenTag::RBrace)?;
        Ok(out)
    }

    /// Consumes a `Name` token (including strict-reserved/contextual
    /// keywords, which the lexer never tags distinctly) and interns it.
    fn parse_name(&mut self) -> Result<jsbundle_base::Name, JsError> {
        if self.cur.tag != TokenTag::Name {
            return Err(self.unexpected());
        }
        let text = self.cur.text().map(str::to_string).unwrap();
        self.bump()?;
        Ok(self.intern(&text))
    }

    /// Consumes a contextual keyword (`from`, `as`) by text comparison.
    fn expect_contextual(&mut self, text: &str) -> Result<(), JsError> {
        if self.cur.tag == TokenTag::Name && self.cur.text() == Some(text) {
            self.bump()
        } else {
            Err(self.unexpected())
        }
    }
}
