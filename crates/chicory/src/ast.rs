//! Program tree consumed by the checker.
//!
//! The tree is produced by the grammar-driven parser; the checker only reads
//! it. Every node carries a [`NodeId`] that diagnostics and symbols refer
//! back to, and the raw [`Span`] the parser recorded for it.

use serde::Serialize;

use crate::diagnostics::Span;

pub mod builder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignKeyword {
    Let,
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Assign {
        keyword: AssignKeyword,
        name: Ident,
        value: Expr,
    },
    TypeDecl {
        name: Ident,
        ty: TypeExpr,
    },
    Import {
        default: Option<Ident>,
        names: Vec<Ident>,
        module: String,
    },
    Export {
        names: Vec<Ident>,
    },
    Expr(Expr),
}

/// A primary expression followed by a left-to-right chain of postfix tails.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub primary: Primary,
    pub tails: Vec<Tail>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primary {
    pub id: NodeId,
    pub span: Span,
    pub kind: PrimaryKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryKind {
    Ident(Ident),
    Literal(Literal),
    Paren(Box<Expr>),
    Block(Block),
    Record(Vec<RecordEntry>),
    ArrayLike(Vec<Expr>),
    Function(FuncExpr),
    If(IfChain),
    Match(MatchExpr),
    Markup(Markup),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub span: Span,
    pub statements: Vec<Stmt>,
    pub result: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntry {
    pub name: Ident,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncExpr {
    pub params: Vec<Ident>,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfChain {
    pub branches: Vec<IfBranch>,
    pub otherwise: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    pub id: NodeId,
    pub span: Span,
    pub condition: Expr,
    pub body: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchExpr {
    pub scrutinee: Box<Expr>,
    pub arms: Vec<MatchArm>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub id: NodeId,
    pub span: Span,
    pub pattern: Pattern,
    pub body: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub id: NodeId,
    pub span: Span,
    pub kind: PatternKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    Wildcard,
    Literal(Literal),
    Binding(Ident),
    Constructor { name: Ident, args: Vec<Pattern> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tail {
    pub id: NodeId,
    pub span: Span,
    pub kind: TailKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TailKind {
    Member(Ident),
    Index(Expr),
    Call(Vec<Expr>),
    /// Operator text is kept verbatim; unknown operators are reported, not rejected here.
    Operation { op: String, rhs: Expr },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub id: NodeId,
    pub span: Span,
    pub kind: LiteralKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    String(String),
    Number(f64),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveName {
    Number,
    String,
    Boolean,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub id: NodeId,
    pub span: Span,
    pub kind: TypeExprKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    Primitive(PrimitiveName),
    Named(Ident),
    Record(Vec<TypeField>),
    Tuple(Vec<TypeExpr>),
    Function {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
    },
    Adt(Vec<AdtOption>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeField {
    pub name: Ident,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdtOption {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub payload: AdtPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdtPayload {
    None,
    Primitive(PrimitiveName),
    Named(Ident),
    Record(Vec<TypeField>),
}

/// A component element. `closing` is `None` for self-closing elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Markup {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub attributes: Vec<Attribute>,
    pub children: Vec<MarkupChild>,
    pub closing: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Ident,
    pub value: AttrValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    String(String),
    Number(f64),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupChild {
    Text(String),
    Expr(Expr),
    Element(Markup),
}
