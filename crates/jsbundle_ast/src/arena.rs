//! The arena bundle a parse or transform pass allocates new nodes from.
//!
//! One [`jsbundle_base::Arena`] per node kind, mirroring the teacher's
//! per-type bump allocators (`logicaffeine_base::Arena<T>`) rather than a
//! single untyped allocator: it keeps `alloc_slice` exact-size-iterator
//! allocation and lets each arena be reset independently if a future pass
//! needs to discard only e.g. folded expressions.

use crate::ast::*;
use jsbundle_base::Arena;

pub struct AstArena<'a> {
    pub stmts: Arena<Stmt<'a>>,
    pub exprs: Arena<Expr<'a>>,
    pub patterns: Arena<Pattern<'a>>,
    pub functions: Arena<FunctionNode<'a>>,
    pub classes: Arena<ClassNode<'a>>,
    pub array_elements: Arena<ArrayElement<'a>>,
    pub props: Arena<Prop<'a>>,
    pub template_chunks: Arena<TemplateChunk<'a>>,
    pub object_pattern_props: Arena<ObjectPatternProp<'a>>,
    pub opt_patterns: Arena<Option<Pattern<'a>>>,
    pub class_members: Arena<ClassMember<'a>>,
    pub var_defs: Arena<VarDef<'a>>,
    pub switch_cases: Arena<SwitchCase<'a>>,
    pub import_nodes: Arena<ImportNode<'a>>,
    pub export_nodes: Arena<ExportNode<'a>>,
    pub name_mappings: Arena<NameMapping>,
    /// Backing store for owned strings (number/string literal text,
    /// template raw/cooked chunks) so the tree can hand out `&'a str`
    /// without a separate lifetime for source text.
    pub strings: Arena<String>,
}

impl<'a> AstArena<'a> {
    pub fn new() -> Self {
        Self {
            stmts: Arena::new(),
            exprs: Arena::new(),
            patterns: Arena::new(),
            functions: Arena::new(),
            classes: Arena::new(),
            array_elements: Arena::new(),
            props: Arena::new(),
            template_chunks: Arena::new(),
            object_pattern_props: Arena::new(),
            opt_patterns: Arena::new(),
            class_members: Arena::new(),
            var_defs: Arena::new(),
            switch_cases: Arena::new(),
            import_nodes: Arena::new(),
            export_nodes: Arena::new(),
            name_mappings: Arena::new(),
            strings: Arena::new(),
        }
    }

    pub fn alloc_stmt(&'a self, stmt: Stmt<'a>) -> &'a Stmt<'a> {
        self.stmts.alloc(stmt)
    }

    pub fn alloc_expr(&'a self, expr: Expr<'a>) -> &'a Expr<'a> {
        self.exprs.alloc(expr)
    }

    pub fn alloc_pattern(&'a self, pattern: Pattern<'a>) -> &'a Pattern<'a> {
        self.patterns.alloc(pattern)
    }

    pub fn alloc_patterns<I>(&'a self, items: I) -> &'a [Pattern<'a>]
    where
        I: IntoIterator<Item = Pattern<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.patterns.alloc_slice(items)
    }

    pub fn alloc_function(&'a self, node: FunctionNode<'a>) -> &'a FunctionNode<'a> {
        self.functions.alloc(node)
    }

    pub fn alloc_class(&'a self, node: ClassNode<'a>) -> &'a ClassNode<'a> {
        self.classes.alloc(node)
    }

    pub fn alloc_stmts<I>(&'a self, items: I) -> &'a [Stmt<'a>]
    where
        I: IntoIterator<Item = Stmt<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.stmts.alloc_slice(items)
    }

    pub fn alloc_exprs<I>(&'a self, items: I) -> &'a [Expr<'a>]
    where
        I: IntoIterator<Item = Expr<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.exprs.alloc_slice(items)
    }

    pub fn alloc_slice_elements<I>(&'a self, items: I) -> &'a [ArrayElement<'a>]
    where
        I: IntoIterator<Item = ArrayElement<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.array_elements.alloc_slice(items)
    }

    pub fn alloc_slice_props<I>(&'a self, items: I) -> &'a [Prop<'a>]
    where
        I: IntoIterator<Item = Prop<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.props.alloc_slice(items)
    }

    pub fn alloc_slice_chunks<I>(&'a self, items: I) -> &'a [TemplateChunk<'a>]
    where
        I: IntoIterator<Item = TemplateChunk<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.template_chunks.alloc_slice(items)
    }

    pub fn alloc_str(&'a self, s: String) -> &'a str {
        self.strings.alloc(s).as_str()
    }

    pub fn alloc_slice_props_pattern<I>(&'a self, items: I) -> &'a [ObjectPatternProp<'a>]
    where
        I: IntoIterator<Item = ObjectPatternProp<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.object_pattern_props.alloc_slice(items)
    }

    pub fn alloc_slice_opt_patterns<I>(&'a self, items: I) -> &'a [Option<Pattern<'a>>]
    where
        I: IntoIterator<Item = Option<Pattern<'a>>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.opt_patterns.alloc_slice(items)
    }

    pub fn alloc_slice_class_members<I>(&'a self, items: I) -> &'a [ClassMember<'a>]
    where
        I: IntoIterator<Item = ClassMember<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.class_members.alloc_slice(items)
    }

    pub fn alloc_var_defs<I>(&'a self, items: I) -> &'a [VarDef<'a>]
    where
        I: IntoIterator<Item = VarDef<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.var_defs.alloc_slice(items)
    }

    pub fn alloc_switch_cases<I>(&'a self, items: I) -> &'a [SwitchCase<'a>]
    where
        I: IntoIterator<Item = SwitchCase<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        self.switch_cases.alloc_slice(items)
    }

    pub fn alloc_import(&'a self, node: ImportNode<'a>) -> &'a ImportNode<'a> {
        self.import_nodes.alloc(node)
    }

    pub fn alloc_export(&'a self, node: ExportNode<'a>) -> &'a ExportNode<'a> {
        self.export_nodes.alloc(node)
    }

    pub fn alloc_name_mappings<I>(&'a self, items: I) -> &'a [NameMapping]
    where
        I: IntoIterator<Item = NameMapping>,
        I::IntoIter: ExactSizeIterator,
    {
        self.name_mappings.alloc_slice(items)
    }
}

impl<'a> Default for AstArena<'a> {
    fn default() -> Self {
        Self::new()
    }
}
