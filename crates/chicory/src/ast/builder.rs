//! Assembles trees with unique node ids.
//!
//! Parsers and tests that need a tree without source text use this instead of
//! numbering nodes by hand. Every method takes `&self` so calls can nest.

use std::cell::Cell;

use super::*;

#[derive(Debug, Default)]
pub struct TreeBuilder {
    next_id: Cell<u32>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId(id)
    }

    pub fn ident(&self, name: &str) -> Ident {
        Ident {
            name: name.to_string(),
            id: self.node_id(),
            span: Span::default(),
        }
    }

    pub fn program(&self, statements: Vec<Stmt>) -> Program {
        Program { statements }
    }

    fn stmt(&self, kind: StmtKind) -> Stmt {
        Stmt {
            id: self.node_id(),
            span: Span::default(),
            kind,
        }
    }

    pub fn let_(&self, name: &str, value: Expr) -> Stmt {
        self.stmt(StmtKind::Assign {
            keyword: AssignKeyword::Let,
            name: self.ident(name),
            value,
        })
    }

    pub fn const_(&self, name: &str, value: Expr) -> Stmt {
        self.stmt(StmtKind::Assign {
            keyword: AssignKeyword::Const,
            name: self.ident(name),
            value,
        })
    }

    pub fn type_decl(&self, name: &str, ty: TypeExpr) -> Stmt {
        self.stmt(StmtKind::TypeDecl {
            name: self.ident(name),
            ty,
        })
    }

    pub fn import(&self, default: Option<&str>, names: &[&str], module: &str) -> Stmt {
        self.stmt(StmtKind::Import {
            default: default.map(|name| self.ident(name)),
            names: names.iter().map(|name| self.ident(name)).collect(),
            module: module.to_string(),
        })
    }

    pub fn export(&self, names: &[&str]) -> Stmt {
        self.stmt(StmtKind::Export {
            names: names.iter().map(|name| self.ident(name)).collect(),
        })
    }

    pub fn expr_stmt(&self, expr: Expr) -> Stmt {
        self.stmt(StmtKind::Expr(expr))
    }

    pub fn wrap(&self, kind: PrimaryKind) -> Expr {
        Expr {
            id: self.node_id(),
            span: Span::default(),
            primary: Primary {
                id: self.node_id(),
                span: Span::default(),
                kind,
            },
            tails: Vec::new(),
        }
    }

    fn literal(&self, kind: LiteralKind) -> Literal {
        Literal {
            id: self.node_id(),
            span: Span::default(),
            kind,
        }
    }

    pub fn lit_num(&self, value: f64) -> Literal {
        self.literal(LiteralKind::Number(value))
    }

    pub fn lit_str(&self, value: &str) -> Literal {
        self.literal(LiteralKind::String(value.to_string()))
    }

    pub fn lit_bool(&self, value: bool) -> Literal {
        self.literal(LiteralKind::Boolean(value))
    }

    pub fn num(&self, value: f64) -> Expr {
        self.wrap(PrimaryKind::Literal(self.lit_num(value)))
    }

    pub fn str_(&self, value: &str) -> Expr {
        self.wrap(PrimaryKind::Literal(self.lit_str(value)))
    }

    pub fn boolean(&self, value: bool) -> Expr {
        self.wrap(PrimaryKind::Literal(self.lit_bool(value)))
    }

    pub fn var(&self, name: &str) -> Expr {
        self.wrap(PrimaryKind::Ident(self.ident(name)))
    }

    pub fn paren(&self, inner: Expr) -> Expr {
        self.wrap(PrimaryKind::Paren(Box::new(inner)))
    }

    pub fn block(&self, statements: Vec<Stmt>, result: Option<Expr>) -> Expr {
        self.wrap(PrimaryKind::Block(Block {
            id: self.node_id(),
            span: Span::default(),
            statements,
            result: result.map(Box::new),
        }))
    }

    pub fn record(&self, entries: Vec<(&str, Expr)>) -> Expr {
        let entries = entries
            .into_iter()
            .map(|(name, value)| RecordEntry {
                name: self.ident(name),
                value,
            })
            .collect();
        self.wrap(PrimaryKind::Record(entries))
    }

    pub fn array(&self, items: Vec<Expr>) -> Expr {
        self.wrap(PrimaryKind::ArrayLike(items))
    }

    pub fn func(&self, params: &[&str], body: Expr) -> Expr {
        self.wrap(PrimaryKind::Function(FuncExpr {
            params: params.iter().map(|name| self.ident(name)).collect(),
            body: Box::new(body),
        }))
    }

    pub fn if_chain(&self, branches: Vec<(Expr, Expr)>, otherwise: Option<Expr>) -> Expr {
        let branches = branches
            .into_iter()
            .map(|(condition, body)| IfBranch {
                id: self.node_id(),
                span: Span::default(),
                condition,
                body,
            })
            .collect();
        self.wrap(PrimaryKind::If(IfChain {
            branches,
            otherwise: otherwise.map(Box::new),
        }))
    }

    pub fn match_(&self, scrutinee: Expr, arms: Vec<(Pattern, Expr)>) -> Expr {
        let arms = arms
            .into_iter()
            .map(|(pattern, body)| MatchArm {
                id: self.node_id(),
                span: Span::default(),
                pattern,
                body,
            })
            .collect();
        self.wrap(PrimaryKind::Match(MatchExpr {
            scrutinee: Box::new(scrutinee),
            arms,
        }))
    }

    fn tail(&self, mut expr: Expr, kind: TailKind) -> Expr {
        expr.tails.push(Tail {
            id: self.node_id(),
            span: Span::default(),
            kind,
        });
        expr
    }

    pub fn member(&self, expr: Expr, name: &str) -> Expr {
        self.tail(expr, TailKind::Member(self.ident(name)))
    }

    pub fn index(&self, expr: Expr, index: Expr) -> Expr {
        self.tail(expr, TailKind::Index(index))
    }

    pub fn call(&self, expr: Expr, args: Vec<Expr>) -> Expr {
        self.tail(expr, TailKind::Call(args))
    }

    pub fn op(&self, expr: Expr, op: &str, rhs: Expr) -> Expr {
        self.tail(
            expr,
            TailKind::Operation {
                op: op.to_string(),
                rhs,
            },
        )
    }

    fn pattern(&self, kind: PatternKind) -> Pattern {
        Pattern {
            id: self.node_id(),
            span: Span::default(),
            kind,
        }
    }

    pub fn pat_wildcard(&self) -> Pattern {
        self.pattern(PatternKind::Wildcard)
    }

    pub fn pat_literal(&self, literal: Literal) -> Pattern {
        self.pattern(PatternKind::Literal(literal))
    }

    pub fn pat_binding(&self, name: &str) -> Pattern {
        self.pattern(PatternKind::Binding(self.ident(name)))
    }

    pub fn pat_ctor(&self, name: &str) -> Pattern {
        self.pat_ctor_args(name, Vec::new())
    }

    pub fn pat_ctor_bind(&self, name: &str, binding: &str) -> Pattern {
        let arg = self.pat_binding(binding);
        self.pat_ctor_args(name, vec![arg])
    }

    pub fn pat_ctor_lit(&self, name: &str, literal: Literal) -> Pattern {
        let arg = self.pat_literal(literal);
        self.pat_ctor_args(name, vec![arg])
    }

    pub fn pat_ctor_args(&self, name: &str, args: Vec<Pattern>) -> Pattern {
        self.pattern(PatternKind::Constructor {
            name: self.ident(name),
            args,
        })
    }

    fn type_expr(&self, kind: TypeExprKind) -> TypeExpr {
        TypeExpr {
            id: self.node_id(),
            span: Span::default(),
            kind,
        }
    }

    pub fn ty_number(&self) -> TypeExpr {
        self.type_expr(TypeExprKind::Primitive(PrimitiveName::Number))
    }

    pub fn ty_string(&self) -> TypeExpr {
        self.type_expr(TypeExprKind::Primitive(PrimitiveName::String))
    }

    pub fn ty_boolean(&self) -> TypeExpr {
        self.type_expr(TypeExprKind::Primitive(PrimitiveName::Boolean))
    }

    pub fn ty_named(&self, name: &str) -> TypeExpr {
        self.type_expr(TypeExprKind::Named(self.ident(name)))
    }

    fn type_fields(&self, fields: Vec<(&str, TypeExpr)>) -> Vec<TypeField> {
        fields
            .into_iter()
            .map(|(name, ty)| TypeField {
                name: self.ident(name),
                ty,
            })
            .collect()
    }

    pub fn ty_record(&self, fields: Vec<(&str, TypeExpr)>) -> TypeExpr {
        self.type_expr(TypeExprKind::Record(self.type_fields(fields)))
    }

    pub fn ty_tuple(&self, items: Vec<TypeExpr>) -> TypeExpr {
        self.type_expr(TypeExprKind::Tuple(items))
    }

    pub fn ty_function(&self, params: Vec<TypeExpr>, ret: TypeExpr) -> TypeExpr {
        self.type_expr(TypeExprKind::Function {
            params,
            ret: Box::new(ret),
        })
    }

    pub fn ty_adt(&self, options: Vec<AdtOption>) -> TypeExpr {
        self.type_expr(TypeExprKind::Adt(options))
    }

    fn adt_option(&self, name: &str, payload: AdtPayload) -> AdtOption {
        AdtOption {
            id: self.node_id(),
            span: Span::default(),
            name: self.ident(name),
            payload,
        }
    }

    pub fn option(&self, name: &str) -> AdtOption {
        self.adt_option(name, AdtPayload::None)
    }

    pub fn option_primitive(&self, name: &str, primitive: PrimitiveName) -> AdtOption {
        self.adt_option(name, AdtPayload::Primitive(primitive))
    }

    pub fn option_named(&self, name: &str, type_name: &str) -> AdtOption {
        self.adt_option(name, AdtPayload::Named(self.ident(type_name)))
    }

    pub fn option_record(&self, name: &str, fields: Vec<(&str, TypeExpr)>) -> AdtOption {
        self.adt_option(name, AdtPayload::Record(self.type_fields(fields)))
    }

    pub fn element(
        &self,
        name: &str,
        attributes: Vec<Attribute>,
        children: Vec<MarkupChild>,
    ) -> Markup {
        Markup {
            id: self.node_id(),
            span: Span::default(),
            name: self.ident(name),
            attributes,
            children,
            closing: Some(self.ident(name)),
        }
    }

    pub fn self_closing(&self, name: &str, attributes: Vec<Attribute>) -> Markup {
        Markup {
            id: self.node_id(),
            span: Span::default(),
            name: self.ident(name),
            attributes,
            children: Vec::new(),
            closing: None,
        }
    }

    pub fn markup(&self, markup: Markup) -> Expr {
        self.wrap(PrimaryKind::Markup(markup))
    }

    pub fn attr_str(&self, name: &str, value: &str) -> Attribute {
        Attribute {
            name: self.ident(name),
            value: AttrValue::String(value.to_string()),
        }
    }

    pub fn attr_num(&self, name: &str, value: f64) -> Attribute {
        Attribute {
            name: self.ident(name),
            value: AttrValue::Number(value),
        }
    }

    pub fn attr_expr(&self, name: &str, value: Expr) -> Attribute {
        Attribute {
            name: self.ident(name),
            value: AttrValue::Expr(value),
        }
    }
}
