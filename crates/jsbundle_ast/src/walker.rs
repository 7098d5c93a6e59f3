//! Pre-order AST traversal.
//!
//! Grounded on the teacher's `src/visitor.rs`: a trait with default
//! no-op/descend methods plus free `walk_*` functions that drive the
//! actual recursion, so a visitor only overrides the node kinds it cares
//! about and calls `walk_*` itself to keep descending.

use crate::ast::*;

/// Implemented by anything that wants to observe an AST without
/// rewriting it. Every `visit_*` method defaults to calling the matching
/// `walk_*` free function, so overriding one still descends into
/// children unless the override chooses not to call `walk_*`.
pub trait Walker<'a> {
    fn visit_program(&mut self, program: &Program<'a>) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &Stmt<'a>) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr<'a>) {
        walk_expr(self, expr);
    }

    fn visit_pattern(&mut self, pattern: &Pattern<'a>) {
        walk_pattern(self, pattern);
    }

    fn visit_function(&mut self, func: &FunctionNode<'a>) {
        walk_function(self, func);
    }

    fn visit_class(&mut self, class: &ClassNode<'a>) {
        walk_class(self, class);
    }

    /// Called for every identifier occurrence, in both value and binding
    /// position. Does not descend further (symbols are leaves).
    fn visit_symbol(&mut self, _symbol: &Symbol) {}
}

pub fn walk_program<'a, W: Walker<'a> + ?Sized>(w: &mut W, program: &Program<'a>) {
    for stmt in program.body {
        w.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'a, W: Walker<'a> + ?Sized>(w: &mut W, stmt: &Stmt<'a>) {
    match stmt {
        Stmt::If { test, cons, alt } => {
            w.visit_expr(test);
            w.visit_stmt(cons);
            if let Some(alt) = alt {
                w.visit_stmt(alt);
            }
        }
        Stmt::While { test, body } | Stmt::Do { body, test } => {
            w.visit_expr(test);
            w.visit_stmt(body);
        }
        Stmt::For { init, test, update, body } => {
            if let Some(init) = init {
                match init {
                    ForInit::VarDecl { decls, .. } => {
                        for d in decls.iter() {
                            walk_var_def(w, d);
                        }
                    }
                    ForInit::Expr(e) => w.visit_expr(e),
                }
            }
            if let Some(test) = test {
                w.visit_expr(test);
            }
            if let Some(update) = update {
                w.visit_expr(update);
            }
            w.visit_stmt(body);
        }
        Stmt::ForIn { target, object, body } | Stmt::ForOf { target, object, body, .. } => {
            walk_for_target(w, target);
            w.visit_expr(object);
            w.visit_stmt(body);
        }
        Stmt::Switch { discriminant, cases } => {
            w.visit_expr(discriminant);
            for case in cases.iter() {
                if let Some(test) = case.test {
                    w.visit_expr(test);
                }
                for s in case.body {
                    w.visit_stmt(s);
                }
            }
        }
        Stmt::Try { block, handler, finalizer } => {
            for s in block.iter() {
                w.visit_stmt(s);
            }
            if let Some(handler) = handler {
                if let Some(param) = &handler.param {
                    w.visit_pattern(param);
                }
                for s in handler.body {
                    w.visit_stmt(s);
                }
            }
            if let Some(finalizer) = finalizer {
                for s in finalizer.iter() {
                    w.visit_stmt(s);
                }
            }
        }
        Stmt::Throw { arg } => w.visit_expr(arg),
        Stmt::Return { arg } => {
            if let Some(arg) = arg {
                w.visit_expr(arg);
            }
        }
        Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Empty | Stmt::Debugger => {}
        Stmt::Labeled { body, .. } => w.visit_stmt(body),
        Stmt::Block(body) => {
            for s in body.iter() {
                w.visit_stmt(s);
            }
        }
        Stmt::Simple(expr) => w.visit_expr(expr),
        Stmt::With { object, body } => {
            w.visit_expr(object);
            w.visit_stmt(body);
        }
        Stmt::VarDecl { decls, .. } => {
            for d in decls.iter() {
                walk_var_def(w, d);
            }
        }
        Stmt::FunctionDecl(func) => w.visit_function(func),
        Stmt::ClassDecl(class) => w.visit_class(class),
        Stmt::Import(_) => {}
        Stmt::Export(export) => walk_export(w, export),
    }
}

fn walk_var_def<'a, W: Walker<'a> + ?Sized>(w: &mut W, def: &VarDef<'a>) {
    w.visit_pattern(&def.name);
    if let Some(init) = def.init {
        w.visit_expr(init);
    }
}

fn walk_for_target<'a, W: Walker<'a> + ?Sized>(w: &mut W, target: &ForTarget<'a>) {
    match target {
        ForTarget::VarDecl { pattern, .. } | ForTarget::Pattern(pattern) => w.visit_pattern(pattern),
    }
}

fn walk_export<'a, W: Walker<'a> + ?Sized>(w: &mut W, export: &ExportNode<'a>) {
    match export {
        ExportNode::Default(DefaultExport::Function(f)) => w.visit_function(f),
        ExportNode::Default(DefaultExport::Class(c)) => w.visit_class(c),
        ExportNode::Default(DefaultExport::Expr(e)) => w.visit_expr(e),
        ExportNode::Declaration(ExportedDecl::Function(f)) => w.visit_function(f),
        ExportNode::Declaration(ExportedDecl::Class(c)) => w.visit_class(c),
        ExportNode::Declaration(ExportedDecl::Var { decls, .. }) => {
            for d in decls.iter() {
                walk_var_def(w, d);
            }
        }
        ExportNode::Named { .. } | ExportNode::NamedFrom { .. } | ExportNode::All { .. } | ExportNode::AllAs { .. } => {}
    }
}

pub fn walk_expr<'a, W: Walker<'a> + ?Sized>(w: &mut W, expr: &Expr<'a>) {
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
        | Expr::Undefined => {}
        Expr::Ident(sym) => w.visit_symbol(sym),
        Expr::Binary { left, right, .. } => {
            w.visit_expr(left);
            w.visit_expr(right);
        }
        Expr::Assign { target, value, .. } => {
            w.visit_expr(target);
            w.visit_expr(value);
        }
        Expr::UnaryPrefix { arg, .. } | Expr::UnaryPostfix { arg, .. } => w.visit_expr(arg),
        Expr::Conditional { test, cons, alt } => {
            w.visit_expr(test);
            w.visit_expr(cons);
            w.visit_expr(alt);
        }
        Expr::Sequence(exprs) => {
            for e in exprs.iter() {
                w.visit_expr(e);
            }
        }
        Expr::Call { callee, args } | Expr::New { callee, args } => {
            w.visit_expr(callee);
            for a in args.iter() {
                w.visit_expr(a);
            }
        }
        Expr::Dot { expr, .. } => w.visit_expr(expr),
        Expr::Sub { expr, index } => {
            w.visit_expr(expr);
            w.visit_expr(index);
        }
        Expr::Array(elements) => {
            for el in elements.iter() {
                match el {
                    ArrayElement::Item(e) | ArrayElement::Spread(e) => w.visit_expr(e),
                    ArrayElement::Hole => {}
                }
            }
        }
        Expr::Object(props) => {
            for prop in props.iter() {
                if let PropKey::Computed(key) = &prop.key {
                    w.visit_expr(key);
                }
                match &prop.value {
                    PropValue::Expr(e) | PropValue::Spread(e) => w.visit_expr(e),
                    PropValue::Method(f) => w.visit_function(f),
                }
            }
        }
        Expr::Arrow(func) | Expr::Function(func) => w.visit_function(func),
        Expr::Class(class) => w.visit_class(class),
        Expr::TemplateString { exprs, .. } => {
            for e in exprs.iter() {
                w.visit_expr(e);
            }
        }
        Expr::Await { arg } | Expr::Spread { arg } => w.visit_expr(arg),
        Expr::Yield { arg, .. } => {
            if let Some(arg) = arg {
                w.visit_expr(arg);
            }
        }
        Expr::ImportExpression { module } => w.visit_expr(module),
    }
}

pub fn walk_pattern<'a, W: Walker<'a> + ?Sized>(w: &mut W, pattern: &Pattern<'a>) {
    match pattern {
        Pattern::Ident(sym) => w.visit_symbol(sym),
        Pattern::Object(props) => {
            for prop in props.iter() {
                if let PropKey::Computed(key) = &prop.key {
                    w.visit_expr(key);
                }
                w.visit_pattern(&prop.value);
            }
        }
        Pattern::Array(elements) => {
            for el in elements.iter().flatten() {
                w.visit_pattern(el);
            }
        }
        Pattern::Assign { left, right } => {
            w.visit_pattern(left);
            w.visit_expr(right);
        }
        Pattern::Rest(inner) => w.visit_pattern(inner),
    }
}

pub fn walk_function<'a, W: Walker<'a> + ?Sized>(w: &mut W, func: &FunctionNode<'a>) {
    if let Some(name) = &func.name {
        w.visit_symbol(name);
    }
    for param in func.params.iter() {
        w.visit_pattern(param);
    }
    match &func.body {
        FunctionBody::Block(body) => {
            for s in body.iter() {
                w.visit_stmt(s);
            }
        }
        FunctionBody::Expr(e) => w.visit_expr(e),
    }
}

pub fn walk_class<'a, W: Walker<'a> + ?Sized>(w: &mut W, class: &ClassNode<'a>) {
    if let Some(name) = &class.name {
        w.visit_symbol(name);
    }
    if let Some(sup) = class.superclass {
        w.visit_expr(sup);
    }
    for member in class.body.iter() {
        w.visit_function(member.value);
    }
}
