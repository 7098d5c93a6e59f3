//! `function`/`function*`/class declaration and expression bodies, shared
//! by statement and expression parsing.

use crate::Parser;
use jsbundle_ast::{ClassMember, ClassNode, FunctionBody, FunctionNode, MethodKind, PropKey, ScopeId, Symbol, SymbolKind, TokenTag};
use jsbundle_base::JsError;

/// Parses a `function` (or `function*`) declaration/expression body,
/// assuming `function` itself has not yet been consumed.
pub(crate) fn parse_function_common<'a>(p: &mut Parser<'a, '_>, is_async: bool) -> Result<&'a FunctionNode<'a>, JsError> {
    p.expect(TokenTag::Function)?;
    let is_generator = p.eat(TokenTag::Star)?;
    let name = if p.cur.tag == TokenTag::Name {
        let text = p.cur.text().map(str::to_string).unwrap();
        p.bump()?;
        let n = p.intern(&text);
        Some(Symbol::new(n, SymbolKind::Defun))
    } else {
        None
    };
    let params = p.parse_param_list()?;
    let guard = p.state.enter_function(is_async, is_generator);
    let body = FunctionBody::Block(p.parse_block_body()?);
    p.state.exit_function(guard);
    Ok(p.arena.functions.alloc(FunctionNode {
        name,
        params,
        body,
        is_async,
        is_generator,
        is_arrow: false,
        scope: ScopeId(0),
    }))
}

/// Parses a `class` declaration/expression body, assuming `class` itself
/// has not yet been consumed.
pub(crate) fn parse_class_common<'a>(p: &mut Parser<'a, '_>) -> Result<&'a ClassNode<'a>, JsError> {
    p.expect(TokenTag::Class)?;
    let name = if p.cur.tag == TokenTag::Name && p.cur.text().map_or(false, |t| t != "extends") {
        let text = p.cur.text().map(str::to_string).unwrap();
        p.bump()?;
        let n = p.intern(&text);
        Some(Symbol::new(n, SymbolKind::Declaration))
    } else {
        None
    };
    let superclass = if p.eat(TokenTag::Extends)? { Some(p.parse_assign()?) } else { None };
    p.expect(TokenTag::LBrace)?;
    let mut members = Vec::new();
    while p.cur.tag != TokenTag::RBrace {
        if let Some(member) = parse_class_member(p)? {
            members.push(member);
        }
    }
    p.expect(TokenTag::RBrace)?;
    Ok(p.arena.classes.alloc(ClassNode {
        name,
        superclass,
        body: p.arena.alloc_slice_class_members(members),
        scope: ScopeId(0),
    }))
}

fn parse_class_member<'a>(p: &mut Parser<'a, '_>) -> Result<Option<ClassMember<'a>>, JsError> {
    if p.eat(TokenTag::Semi)? {
        return Ok(None);
    }
    // `static`/`async`/`get`/`set` are always treated as modifiers here,
    // never as a literal member name of the same spelling (spec.md §4.2's
    // contextual-keyword disambiguation would need one token of
    // lookahead the lexer doesn't buffer).
    let is_static = p.cur.tag == TokenTag::Name && p.cur.text() == Some("static");
    if is_static {
        p.bump()?;
    }
    let is_async = p.cur.tag == TokenTag::Name && p.cur.text() == Some("async");
    if is_async {
        p.bump()?;
    }
    let is_generator = p.eat(TokenTag::Star)?;
    let mut kind = MethodKind::Method;
    if !is_generator {
        if p.cur.tag == TokenTag::Name && p.cur.text() == Some("get") {
            p.bump()?;
            kind = MethodKind::Get;
        } else if p.cur.tag == TokenTag::Name && p.cur.text() == Some("set") {
            p.bump()?;
            kind = MethodKind::Set;
        }
    }
    let (key, _computed) = p.parse_prop_key()?;
    if let (PropKey::Ident(name), MethodKind::Method) = (key, kind) {
        if p.interner.resolve(name) == "constructor" && !is_static {
            kind = MethodKind::Constructor;
        }
    }
    let params = p.parse_param_list()?;
    let guard = p.state.enter_function(is_async, is_generator);
    let body = FunctionBody::Block(p.parse_block_body()?);
    p.state.exit_function(guard);
    let func = p.arena.functions.alloc(FunctionNode {
        name: None,
        params,
        body,
        is_async,
        is_generator,
        is_arrow: false,
        scope: ScopeId(0),
    });
    Ok(Some(ClassMember { key, kind, is_static, value: func }))
}
