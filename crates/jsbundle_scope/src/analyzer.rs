//! The scope/symbol analysis pass: walks a parsed [`Program`], builds a
//! [`SymbolTable`], and resolves every `Symbol.thedef` it finds along the
//! way.
//!
//! Two passes per lexical level, mirroring runtime hoisting order without
//! needing two full traversals of the whole program: a `hoist_*` pass finds
//! every `var`/function declaration reachable without crossing into a
//! nested function and binds it into the nearest hoist target before
//! anything in that scope is resolved, then a `declare_lexical` pass binds
//! the scope's own `let`/`const`/`class`/`import` names, and only then does
//! the real traversal resolve uses and recurse into nested scopes.

use crate::symbol_table::{ScopeKind, SymbolTable};
use jsbundle_ast::{
    ArrayElement, ClassNode, DeclKind, DefaultExport, Expr, ExportNode, ExportedDecl, ForInit, ForTarget, FunctionBody,
    FunctionNode, ImportNode, Pattern, Program, Prop, PropKey, PropValue, ScopeId, SourceType, Stmt, Symbol, SymbolKind,
};
use jsbundle_base::{ErrorKind, Interner, JsError, Span};

/// Resolves every identifier in `program` against a fresh [`SymbolTable`].
pub fn analyze(program: &Program<'_>, interner: &Interner) -> Result<SymbolTable, JsError> {
    let mut analyzer = ScopeAnalyzer { table: SymbolTable::new(), interner };
    let global_kind = if program.source_type == SourceType::Module { ScopeKind::Module } else { ScopeKind::Global };
    let global = analyzer.table.push_scope(global_kind, None);
    analyzer.hoist_block(global, program.body)?;
    analyzer.declare_lexical(global, program.body)?;
    for stmt in program.body {
        analyzer.visit_stmt(global, global, stmt)?;
    }
    Ok(analyzer.table)
}

struct ScopeAnalyzer<'i> {
    table: SymbolTable,
    interner: &'i Interner,
}

impl<'i> ScopeAnalyzer<'i> {
    fn dup_error(&self, name: jsbundle_base::Name) -> JsError {
        JsError::recoverable(
            ErrorKind::Semantic,
            format!("Identifier '{}' has already been declared", self.interner.resolve(name)),
            Span::default(),
        )
    }

    // ---- hoisting (var + function declarations) --------------------------

    fn hoist_block(&mut self, func_scope: ScopeId, stmts: &[Stmt<'_>]) -> Result<(), JsError> {
        for stmt in stmts {
            self.hoist_stmt(func_scope, stmt)?;
        }
        Ok(())
    }

    fn hoist_stmt(&mut self, func_scope: ScopeId, stmt: &Stmt<'_>) -> Result<(), JsError> {
        match stmt {
            Stmt::VarDecl { kind: DeclKind::Var, decls } => {
                for d in decls.iter() {
                    self.hoist_pattern(func_scope, &d.name);
                }
            }
            Stmt::FunctionDecl(func) => {
                if let Some(name) = &func.name {
                    let id = self.table.declare_or_reuse(func_scope, name.name, SymbolKind::Defun);
                    name.thedef.set(Some(id));
                }
            }
            Stmt::If { cons, alt, .. } => {
                self.hoist_stmt(func_scope, cons)?;
                if let Some(alt) = alt {
                    self.hoist_stmt(func_scope, alt)?;
                }
            }
            Stmt::While { body, .. } | Stmt::Do { body, .. } | Stmt::Labeled { body, .. } | Stmt::With { body, .. } => {
                self.hoist_stmt(func_scope, body)?;
            }
            Stmt::For { init, body, .. } => {
                if let Some(ForInit::VarDecl { kind: DeclKind::Var, decls }) = init {
                    for d in decls.iter() {
                        self.hoist_pattern(func_scope, &d.name);
                    }
                }
                self.hoist_stmt(func_scope, body)?;
            }
            Stmt::ForIn { target, body, .. } | Stmt::ForOf { target, body, .. } => {
                if let ForTarget::VarDecl { kind: DeclKind::Var, pattern } = target {
                    self.hoist_pattern(func_scope, pattern);
                }
                self.hoist_stmt(func_scope, body)?;
            }
            Stmt::Block(body) => self.hoist_block(func_scope, body)?,
            Stmt::Switch { cases, .. } => {
                for case in cases.iter() {
                    self.hoist_block(func_scope, case.body)?;
                }
            }
            Stmt::Try { block, handler, finalizer } => {
                self.hoist_block(func_scope, block)?;
                if let Some(h) = handler {
                    self.hoist_block(func_scope, h.body)?;
                }
                if let Some(f) = finalizer {
                    self.hoist_block(func_scope, f)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn hoist_pattern(&mut self, func_scope: ScopeId, pattern: &Pattern<'_>) {
        match pattern {
            Pattern::Ident(sym) => {
                let id = self.table.declare_or_reuse(func_scope, sym.name, SymbolKind::Var);
                sym.thedef.set(Some(id));
            }
            Pattern::Object(props) => {
                for p in props.iter() {
                    self.hoist_pattern(func_scope, &p.value);
                }
            }
            Pattern::Array(elems) => {
                for e in elems.iter().flatten() {
                    self.hoist_pattern(func_scope, e);
                }
            }
            Pattern::Assign { left, .. } => self.hoist_pattern(func_scope, left),
            Pattern::Rest(inner) => self.hoist_pattern(func_scope, inner),
        }
    }

    // ---- per-block lexical declarations (let/const/class/import) --------

    fn declare_lexical(&mut self, scope: ScopeId, stmts: &[Stmt<'_>]) -> Result<(), JsError> {
        for stmt in stmts {
            self.declare_lexical_stmt(scope, stmt)?;
        }
        Ok(())
    }

    fn declare_lexical_stmt(&mut self, scope: ScopeId, stmt: &Stmt<'_>) -> Result<(), JsError> {
        match stmt {
            Stmt::VarDecl { kind, decls } if *kind != DeclKind::Var => {
                let sym_kind = if *kind == DeclKind::Let { SymbolKind::Let } else { SymbolKind::Const };
                for d in decls.iter() {
                    self.declare_pattern(scope, &d.name, sym_kind)?;
                }
            }
            Stmt::ClassDecl(class) => {
                if let Some(name) = &class.name {
                    self.declare_named(scope, name, SymbolKind::Declaration)?;
                }
            }
            Stmt::Import(node) => self.declare_import(scope, node)?,
            Stmt::Export(export) => self.declare_lexical_export(scope, export)?,
            _ => {}
        }
        Ok(())
    }

    fn declare_lexical_export(&mut self, scope: ScopeId, export: &ExportNode<'_>) -> Result<(), JsError> {
        match export {
            ExportNode::Declaration(ExportedDecl::Var { kind, decls }) if *kind != DeclKind::Var => {
                let sym_kind = if *kind == DeclKind::Let { SymbolKind::Let } else { SymbolKind::Const };
                for d in decls.iter() {
                    self.declare_pattern(scope, &d.name, sym_kind)?;
                }
            }
            ExportNode::Declaration(ExportedDecl::Var { kind: DeclKind::Var, decls }) => {
                let target = self.table.nearest_hoist_target(scope);
                for d in decls.iter() {
                    self.hoist_pattern(target, &d.name);
                }
            }
            ExportNode::Declaration(ExportedDecl::Class(class)) => {
                if let Some(name) = &class.name {
                    self.declare_named(scope, name, SymbolKind::Declaration)?;
                }
            }
            ExportNode::Declaration(ExportedDecl::Function(func)) => {
                if let Some(name) = &func.name {
                    let target = self.table.nearest_hoist_target(scope);
                    let id = self.table.declare_or_reuse(target, name.name, SymbolKind::Defun);
                    name.thedef.set(Some(id));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn declare_import(&mut self, scope: ScopeId, node: &ImportNode<'_>) -> Result<(), JsError> {
        match node {
            ImportNode::Default { local, .. } | ImportNode::Namespace { local, .. } => {
                self.declare_named(scope, local, SymbolKind::Import)?;
            }
            ImportNode::Named { specifiers, .. } => {
                for spec in specifiers.iter() {
                    self.declare_named(scope, &spec.local, SymbolKind::Import)?;
                }
            }
            ImportNode::Bare { .. } => {}
        }
        Ok(())
    }

    fn declare_named(&mut self, scope: ScopeId, sym: &Symbol, kind: SymbolKind) -> Result<(), JsError> {
        match self.table.declare(scope, sym.name, kind) {
            Ok(id) => {
                sym.thedef.set(Some(id));
                Ok(())
            }
            Err(_) => Err(self.dup_error(sym.name)),
        }
    }

    /// Declares every identifier leaf of `pattern` with `kind`, visiting any
    /// embedded default-value/computed-key expressions as reads in `scope`.
    fn declare_pattern(&mut self, scope: ScopeId, pattern: &Pattern<'_>, kind: SymbolKind) -> Result<(), JsError> {
        match pattern {
            Pattern::Ident(sym) => self.declare_named(scope, sym, kind),
            Pattern::Object(props) => {
                for p in props.iter() {
                    if let PropKey::Computed(key) = &p.key {
                        self.visit_expr(scope, key)?;
                    }
                    self.declare_pattern(scope, &p.value, kind)?;
                }
                Ok(())
            }
            Pattern::Array(elems) => {
                for e in elems.iter().flatten() {
                    self.declare_pattern(scope, e, kind)?;
                }
                Ok(())
            }
            Pattern::Assign { left, right } => {
                self.declare_pattern(scope, left, kind)?;
                self.visit_expr(scope, right)
            }
            Pattern::Rest(inner) => self.declare_pattern(scope, inner, kind),
        }
    }

    /// Like [`Self::declare_pattern`], but for an already-hoisted (`var`)
    /// pattern: resolves embedded expressions without redeclaring leaves.
    fn visit_pattern_exprs(&mut self, scope: ScopeId, pattern: &Pattern<'_>) -> Result<(), JsError> {
        match pattern {
            Pattern::Ident(_) => Ok(()),
            Pattern::Object(props) => {
                for p in props.iter() {
                    if let PropKey::Computed(key) = &p.key {
                        self.visit_expr(scope, key)?;
                    }
                    self.visit_pattern_exprs(scope, &p.value)?;
                }
                Ok(())
            }
            Pattern::Array(elems) => {
                for e in elems.iter().flatten() {
                    self.visit_pattern_exprs(scope, e)?;
                }
                Ok(())
            }
            Pattern::Assign { left, right } => {
                self.visit_pattern_exprs(scope, left)?;
                self.visit_expr(scope, right)
            }
            Pattern::Rest(inner) => self.visit_pattern_exprs(scope, inner),
        }
    }

    /// Resolves a pattern used as an existing assignment target (no `var`/
    /// `let`/`const` keyword: `for (x of xs)`, not `for (let x of xs)`),
    /// marking every leaf as a write rather than declaring it.
    fn use_pattern_as_target(&mut self, scope: ScopeId, pattern: &Pattern<'_>) -> Result<(), JsError> {
        match pattern {
            Pattern::Ident(sym) => {
                self.resolve_use(scope, sym, true);
                Ok(())
            }
            Pattern::Object(props) => {
                for p in props.iter() {
                    if let PropKey::Computed(key) = &p.key {
                        self.visit_expr(scope, key)?;
                    }
                    self.use_pattern_as_target(scope, &p.value)?;
                }
                Ok(())
            }
            Pattern::Array(elems) => {
                for e in elems.iter().flatten() {
                    self.use_pattern_as_target(scope, e)?;
                }
                Ok(())
            }
            Pattern::Assign { left, right } => {
                self.use_pattern_as_target(scope, left)?;
                self.visit_expr(scope, right)
            }
            Pattern::Rest(inner) => self.use_pattern_as_target(scope, inner),
        }
    }

    // ---- resolution --------------------------------------------------

    fn resolve_use(&mut self, scope: ScopeId, sym: &Symbol, is_write: bool) {
        if let Some(id) = self.table.resolve(scope, sym.name) {
            sym.thedef.set(Some(id));
            let usage = &mut self.table.def_mut(id).usage;
            if is_write {
                usage.writes += 1;
            } else {
                usage.reads += 1;
            }
            if self.interner.resolve(sym.name) == "eval" {
                self.table.pin_up_to_hoist_target(scope);
            }
        }
        // Unresolved identifiers stay `None` forever: a free global
        // reference (spec invariant), not an error.
    }

    /// Pushes a plain block scope and resolves its statements. `var`s inside
    /// were already hoisted into `func_scope` by the enclosing function's
    /// `hoist_block` pass, so only lexical declarations need binding here.
    fn new_block_scope(&mut self, parent: ScopeId, func_scope: ScopeId, body: &[Stmt<'_>]) -> Result<(), JsError> {
        let bscope = self.table.push_scope(ScopeKind::Block, Some(parent));
        self.declare_lexical(bscope, body)?;
        for s in body.iter() {
            self.visit_stmt(bscope, func_scope, s)?;
        }
        Ok(())
    }

    fn visit_stmt(&mut self, scope: ScopeId, func_scope: ScopeId, stmt: &Stmt<'_>) -> Result<(), JsError> {
        match stmt {
            Stmt::If { test, cons, alt } => {
                self.visit_expr(scope, test)?;
                self.visit_stmt(scope, func_scope, cons)?;
                if let Some(alt) = alt {
                    self.visit_stmt(scope, func_scope, alt)?;
                }
                Ok(())
            }
            Stmt::While { test, body } | Stmt::Do { body, test } => {
                self.visit_expr(scope, test)?;
                self.visit_stmt(scope, func_scope, body)
            }
            Stmt::For { init, test, update, body } => {
                let loop_scope = self.table.push_scope(ScopeKind::Block, Some(scope));
                if let Some(init) = init {
                    match init {
                        ForInit::VarDecl { kind: DeclKind::Var, decls } => {
                            for d in decls.iter() {
                                self.visit_pattern_exprs(loop_scope, &d.name)?;
                                if let Some(init) = d.init {
                                    self.visit_expr(loop_scope, init)?;
                                }
                            }
                        }
                        ForInit::VarDecl { kind, decls } => {
                            let sym_kind = if *kind == DeclKind::Let { SymbolKind::Let } else { SymbolKind::Const };
                            for d in decls.iter() {
                                self.declare_pattern(loop_scope, &d.name, sym_kind)?;
                                if let Some(init) = d.init {
                                    self.visit_expr(loop_scope, init)?;
                                }
                            }
                        }
                        ForInit::Expr(e) => self.visit_expr(loop_scope, e)?,
                    }
                }
                if let Some(test) = test {
                    self.visit_expr(loop_scope, test)?;
                }
                if let Some(update) = update {
                    self.visit_expr(loop_scope, update)?;
                }
                self.visit_stmt(loop_scope, func_scope, body)
            }
            Stmt::ForIn { target, object, body } | Stmt::ForOf { target, object, body, .. } => {
                let loop_scope = self.table.push_scope(ScopeKind::Block, Some(scope));
                match target {
                    ForTarget::VarDecl { kind: DeclKind::Var, pattern } => {
                        self.visit_pattern_exprs(loop_scope, pattern)?;
                    }
                    ForTarget::VarDecl { kind, pattern } => {
                        let sym_kind = if *kind == DeclKind::Let { SymbolKind::Let } else { SymbolKind::Const };
                        self.declare_pattern(loop_scope, pattern, sym_kind)?;
                    }
                    ForTarget::Pattern(pattern) => self.use_pattern_as_target(loop_scope, pattern)?,
                }
                self.visit_expr(loop_scope, object)?;
                self.visit_stmt(loop_scope, func_scope, body)
            }
            Stmt::Switch { discriminant, cases } => {
                self.visit_expr(scope, discriminant)?;
                let sscope = self.table.push_scope(ScopeKind::Block, Some(scope));
                for case in cases.iter() {
                    self.declare_lexical(sscope, case.body)?;
                }
                for case in cases.iter() {
                    if let Some(test) = case.test {
                        self.visit_expr(sscope, test)?;
                    }
                    for s in case.body.iter() {
                        self.visit_stmt(sscope, func_scope, s)?;
                    }
                }
                Ok(())
            }
            Stmt::Try { block, handler, finalizer } => {
                self.new_block_scope(scope, func_scope, block)?;
                if let Some(h) = handler {
                    let cscope = self.table.push_scope(ScopeKind::Catch, Some(scope));
                    if let Some(param) = &h.param {
                        self.declare_pattern(cscope, param, SymbolKind::Catch)?;
                    }
                    self.declare_lexical(cscope, h.body)?;
                    for s in h.body.iter() {
                        self.visit_stmt(cscope, func_scope, s)?;
                    }
                }
                if let Some(f) = finalizer {
                    self.new_block_scope(scope, func_scope, f)?;
                }
                Ok(())
            }
            Stmt::Throw { arg } => self.visit_expr(scope, arg),
            Stmt::Return { arg } => {
                if let Some(arg) = arg {
                    self.visit_expr(scope, arg)?;
                }
                Ok(())
            }
            Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Empty | Stmt::Debugger | Stmt::Import(_) => Ok(()),
            Stmt::Labeled { body, .. } => self.visit_stmt(scope, func_scope, body),
            Stmt::Block(body) => self.new_block_scope(scope, func_scope, body),
            Stmt::Simple(expr) => self.visit_expr(scope, expr),
            Stmt::With { object, body } => {
                self.visit_expr(scope, object)?;
                self.table.pin_up_to_hoist_target(scope);
                self.visit_stmt(scope, func_scope, body)
            }
            Stmt::VarDecl { kind: DeclKind::Var, decls } => {
                for d in decls.iter() {
                    self.visit_pattern_exprs(scope, &d.name)?;
                    if let Some(init) = d.init {
                        self.visit_expr(scope, init)?;
                    }
                }
                Ok(())
            }
            Stmt::VarDecl { decls, .. } => {
                // already declared by `declare_lexical`; just evaluate inits.
                for d in decls.iter() {
                    if let Some(init) = d.init {
                        self.visit_expr(scope, init)?;
                    }
                }
                Ok(())
            }
            Stmt::FunctionDecl(func) => self.visit_function(scope, func, false),
            Stmt::ClassDecl(class) => self.visit_class(scope, class, false),
            Stmt::Export(export) => self.visit_export(scope, func_scope, export),
        }
    }

    fn visit_export(&mut self, scope: ScopeId, func_scope: ScopeId, export: &ExportNode<'_>) -> Result<(), JsError> {
        match export {
            ExportNode::Default(DefaultExport::Function(f)) => self.visit_function(scope, f, false),
            ExportNode::Default(DefaultExport::Class(c)) => self.visit_class(scope, c, false),
            ExportNode::Default(DefaultExport::Expr(e)) => self.visit_expr(scope, e),
            ExportNode::Declaration(ExportedDecl::Function(f)) => self.visit_function(scope, f, false),
            ExportNode::Declaration(ExportedDecl::Class(c)) => self.visit_class(scope, c, false),
            ExportNode::Declaration(ExportedDecl::Var { kind: DeclKind::Var, decls }) => {
                for d in decls.iter() {
                    self.visit_pattern_exprs(func_scope, &d.name)?;
                    if let Some(init) = d.init {
                        self.visit_expr(scope, init)?;
                    }
                }
                Ok(())
            }
            ExportNode::Declaration(ExportedDecl::Var { decls, .. }) => {
                for d in decls.iter() {
                    if let Some(init) = d.init {
                        self.visit_expr(scope, init)?;
                    }
                }
                Ok(())
            }
            ExportNode::Named { .. } | ExportNode::NamedFrom { .. } | ExportNode::All { .. } | ExportNode::AllAs { .. } => Ok(()),
        }
    }

    fn visit_function(&mut self, enclosing: ScopeId, func: &FunctionNode<'_>, bind_own_name: bool) -> Result<(), JsError> {
        let fscope = self.table.push_scope(ScopeKind::Function, Some(enclosing));
        if bind_own_name {
            if let Some(name) = &func.name {
                let id = self.table.declare_or_reuse(fscope, name.name, SymbolKind::Lambda);
                name.thedef.set(Some(id));
            }
        }
        for param in func.params.iter() {
            self.declare_pattern(fscope, param, SymbolKind::Funarg)?;
        }
        match &func.body {
            FunctionBody::Block(body) => {
                self.hoist_block(fscope, body)?;
                self.declare_lexical(fscope, body)?;
                for s in body.iter() {
                    self.visit_stmt(fscope, fscope, s)?;
                }
            }
            FunctionBody::Expr(e) => self.visit_expr(fscope, e)?,
        }
        Ok(())
    }

    fn visit_class(&mut self, enclosing: ScopeId, class: &ClassNode<'_>, bind_own_name: bool) -> Result<(), JsError> {
        if let Some(sup) = class.superclass {
            self.visit_expr(enclosing, sup)?;
        }
        let cscope = if bind_own_name && class.name.is_some() {
            let s = self.table.push_scope(ScopeKind::Block, Some(enclosing));
            if let Some(name) = &class.name {
                let id = self.table.declare_or_reuse(s, name.name, SymbolKind::Lambda);
                name.thedef.set(Some(id));
            }
            s
        } else {
            enclosing
        };
        for member in class.body.iter() {
            if let PropKey::Computed(key) = &member.key {
                self.visit_expr(cscope, key)?;
            }
            self.visit_function(cscope, member.value, false)?;
        }
        Ok(())
    }

    fn visit_expr(&mut self, scope: ScopeId, expr: &Expr<'_>) -> Result<(), JsError> {
        match expr {
            Expr::Number { .. }
            | Expr::Str(_)
            | Expr::RegExp { .. }
            | Expr::This
            | Expr::Super
            | Expr::Null
            | Expr::True
            | Expr::False
            | Expr::NaN
            | Expr::Infinity
            | Expr::Undefined => Ok(()),
            Expr::Ident(sym) => {
                self.resolve_use(scope, sym, false);
                Ok(())
            }
            Expr::Binary { left, right, .. } => {
                self.visit_expr(scope, left)?;
                self.visit_expr(scope, right)
            }
            Expr::Assign { target, value, .. } => {
                self.visit_expr(scope, value)?;
                self.visit_assign_target(scope, target)
            }
            Expr::UnaryPrefix { op, arg, .. } | Expr::UnaryPostfix { op, arg, .. } => {
                if matches!(op, jsbundle_ast::UnaryOp::Inc | jsbundle_ast::UnaryOp::Dec) {
                    if let Expr::Ident(sym) = arg {
                        self.resolve_use(scope, sym, true);
                        return Ok(());
                    }
                }
                self.visit_expr(scope, arg)
            }
            Expr::Conditional { test, cons, alt } => {
                self.visit_expr(scope, test)?;
                self.visit_expr(scope, cons)?;
                self.visit_expr(scope, alt)
            }
            Expr::Sequence(exprs) => {
                for e in exprs.iter() {
                    self.visit_expr(scope, e)?;
                }
                Ok(())
            }
            Expr::Call { callee, args } => {
                if let Expr::Ident(sym) = callee {
                    if self.interner.resolve(sym.name) == "eval" {
                        self.table.pin_up_to_hoist_target(scope);
                    }
                }
                self.visit_expr(scope, callee)?;
                for a in args.iter() {
                    self.visit_expr(scope, a)?;
                }
                Ok(())
            }
            Expr::New { callee, args } => {
                self.visit_expr(scope, callee)?;
                for a in args.iter() {
                    self.visit_expr(scope, a)?;
                }
                Ok(())
            }
            Expr::Dot { expr, .. } => self.visit_expr(scope, expr),
            Expr::Sub { expr, index } => {
                self.visit_expr(scope, expr)?;
                self.visit_expr(scope, index)
            }
            Expr::Array(elements) => {
                for el in elements.iter() {
                    match el {
                        ArrayElement::Item(e) | ArrayElement::Spread(e) => self.visit_expr(scope, e)?,
                        ArrayElement::Hole => {}
                    }
                }
                Ok(())
            }
            Expr::Object(props) => self.visit_props(scope, props),
            Expr::Arrow(func) => self.visit_function(scope, func, true),
            Expr::Function(func) => self.visit_function(scope, func, true),
            Expr::Class(class) => self.visit_class(scope, class, true),
            Expr::TemplateString { exprs, .. } => {
                for e in exprs.iter() {
                    self.visit_expr(scope, e)?;
                }
                Ok(())
            }
            Expr::Await { arg } | Expr::Spread { arg } => self.visit_expr(scope, arg),
            Expr::Yield { arg, .. } => {
                if let Some(arg) = arg {
                    self.visit_expr(scope, arg)?;
                }
                Ok(())
            }
            Expr::ImportExpression { module } => self.visit_expr(scope, module),
        }
    }

    fn visit_props(&mut self, scope: ScopeId, props: &[Prop<'_>]) -> Result<(), JsError> {
        for prop in props.iter() {
            if let PropKey::Computed(key) = &prop.key {
                self.visit_expr(scope, key)?;
            }
            match &prop.value {
                PropValue::Expr(e) | PropValue::Spread(e) => self.visit_expr(scope, e)?,
                PropValue::Method(f) => self.visit_function(scope, f, false)?,
            }
        }
        Ok(())
    }

    /// An expression in assignment-target position: an identifier is a
    /// write, an array/object literal recurses into destructuring targets,
    /// anything else (member access) is an ordinary read.
    fn visit_assign_target(&mut self, scope: ScopeId, expr: &Expr<'_>) -> Result<(), JsError> {
        match expr {
            Expr::Ident(sym) => {
                self.resolve_use(scope, sym, true);
                Ok(())
            }
            Expr::Array(elements) => {
                for el in elements.iter() {
                    match el {
                        ArrayElement::Item(e) | ArrayElement::Spread(e) => self.visit_assign_target(scope, e)?,
                        ArrayElement::Hole => {}
                    }
                }
                Ok(())
            }
            Expr::Object(props) => {
                for prop in props.iter() {
                    if let PropKey::Computed(key) = &prop.key {
                        self.visit_expr(scope, key)?;
                    }
                    match &prop.value {
                        PropValue::Expr(e) | PropValue::Spread(e) => self.visit_assign_target(scope, e)?,
                        PropValue::Method(_) => {}
                    }
                }
                Ok(())
            }
            Expr::Assign { target, value, .. } => {
                self.visit_expr(scope, value)?;
                self.visit_assign_target(scope, target)
            }
            other => self.visit_expr(scope, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsbundle_ast::AstArena;

    fn analyze_source(source: &str) -> (SymbolTable, Interner) {
        let arena = AstArena::new();
        let (program, interner) = jsbundle_parser::parse(source, &arena, SourceType::Script).unwrap();
        let table = analyze(&program, &interner).unwrap();
        (table, interner)
    }

    fn find_def<'t>(table: &'t SymbolTable, interner: &Interner, name: &str) -> &'t SymbolDef {
        table.defs().iter().find(|d| interner.resolve(d.name) == name).unwrap()
    }

    #[test]
    fn var_hoists_through_nested_blocks_to_function_scope() {
        let (table, interner) = analyze_source(
            "function f() { if (true) { var x = 1; } return x; }",
        );
        let f = find_def(&table, &interner, "f");
        let x = find_def(&table, &interner, "x");
        // `x` is hoisted to the function's own scope, not the `if`'s block.
        assert_eq!(table.scope(x.scope).kind, ScopeKind::Function);
        assert_ne!(f.scope, x.scope);
    }

    #[test]
    fn let_in_nested_block_does_not_collide_with_outer_var() {
        let (table, interner) = analyze_source(
            "var x = 1; { let x = 2; x; }",
        );
        let defs: Vec<_> = table.defs().iter().filter(|d| interner.resolve(d.name) == "x").collect();
        assert_eq!(defs.len(), 2, "outer var and inner let are distinct bindings");
        assert!(defs.iter().any(|d| d.kind == SymbolKind::Var));
        assert!(defs.iter().any(|d| d.kind == SymbolKind::Let));
    }

    #[test]
    fn duplicate_lexical_declaration_in_same_scope_is_a_semantic_error() {
        let arena = AstArena::new();
        let (program, interner) = jsbundle_parser::parse("let x = 1; let x = 2;", &arena, SourceType::Script).unwrap();
        let err = analyze(&program, &interner).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Semantic);
    }

    #[test]
    fn function_parameter_is_resolved_inside_the_body() {
        let (table, interner) = analyze_source("function f(a) { return a + 1; }");
        let a = find_def(&table, &interner, "a");
        assert_eq!(a.kind, SymbolKind::Funarg);
        assert_eq!(a.usage.reads, 1);
    }

    #[test]
    fn catch_parameter_is_scoped_to_the_catch_clause() {
        let (table, interner) = analyze_source("try {} catch (e) { e; } var e = 1;");
        let defs: Vec<_> = table.defs().iter().filter(|d| interner.resolve(d.name) == "e").collect();
        assert_eq!(defs.len(), 2);
        let caught = defs.iter().find(|d| d.kind == SymbolKind::Catch).unwrap();
        assert_eq!(table.scope(caught.scope).kind, ScopeKind::Catch);
    }

    #[test]
    fn assignment_target_is_recorded_as_a_write() {
        let (table, interner) = analyze_source("var x; x = 2; x;");
        let x = find_def(&table, &interner, "x");
        assert_eq!(x.usage.writes, 1);
        assert_eq!(x.usage.reads, 1);
    }

    #[test]
    fn eval_pins_the_enclosing_function_scope() {
        let (table, _interner) = analyze_source("function f() { var x = 1; eval('x'); }");
        assert!(table.scopes().iter().any(|s| s.kind == ScopeKind::Function && s.pinned));
    }

    #[test]
    fn free_identifier_is_left_unresolved() {
        let (table, interner) = analyze_source("undeclaredGlobal;");
        assert!(table.defs().is_empty());
        let _ = interner;
    }
}
