use crate::ast::NodeId;
use crate::diagnostics::{Diagnostic, DiagnosticSeverity, Span};

/// Recoverable checking errors. The `Display` text is the diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeErrorKind {
    #[error("undefined variable '{0}'")]
    UndefinedIdentifier(String),
    #[error("duplicate identifier '{0}'")]
    DuplicateImport(String),
    #[error("type mismatch between {left} and {right}")]
    Mismatch { left: String, right: String },
    #[error("function parameter count mismatch ({left} vs {right})")]
    FunctionArity { left: usize, right: usize },
    #[error("tuple length mismatch ({left} vs {right})")]
    TupleLength { left: usize, right: usize },
    #[error("record field '{0}' mismatch")]
    RecordField(String),
    #[error("cannot access member '{member}' of non-record {found}")]
    NonRecordMember { member: String, found: String },
    #[error("record has no member '{0}'")]
    UnknownMember(String),
    #[error("cannot index non-tuple type {0}")]
    NonTupleIndex(String),
    #[error("undefined type '{0}'")]
    UndefinedType(String),
    #[error("ADT type must be part of a type definition")]
    AdtContext,
    #[error("constructor '{ctor}' is not part of ADT '{adt}'")]
    ForeignConstructor { ctor: String, adt: String },
    #[error("constructor '{ctor}' expects {expected} parameter(s)")]
    ConstructorArity { ctor: String, expected: usize },
    #[error("match expression must be applied to an ADT type, found {0}")]
    NonAdtMatch(String),
    #[error("undefined component '{0}'")]
    UndefinedComponent(String),
    #[error("unsupported operator '{0}'")]
    UnsupportedOperator(String),
    #[error("unsupported match pattern")]
    UnsupportedPattern,
    #[error("infinite type: T{var} occurs in {ty}")]
    InfiniteType { var: u32, ty: String },
    #[error("non-exhaustive match on '{adt}': missing {}", .missing.join(", "))]
    NonExhaustive { adt: String, missing: Vec<String> },
    #[error("'{0}' is already declared in this scope")]
    Redeclared(String),
    #[error("cannot export undefined name '{0}'")]
    UndefinedExport(String),
}

impl TypeErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            TypeErrorKind::UndefinedIdentifier(_) => "E3001",
            TypeErrorKind::DuplicateImport(_) => "E3002",
            TypeErrorKind::Mismatch { .. } => "E3003",
            TypeErrorKind::FunctionArity { .. } => "E3004",
            TypeErrorKind::TupleLength { .. } => "E3005",
            TypeErrorKind::RecordField(_) => "E3006",
            TypeErrorKind::NonRecordMember { .. } => "E3007",
            TypeErrorKind::UnknownMember(_) => "E3008",
            TypeErrorKind::NonTupleIndex(_) => "E3009",
            TypeErrorKind::UndefinedType(_) => "E3010",
            TypeErrorKind::AdtContext => "E3011",
            TypeErrorKind::ForeignConstructor { .. } => "E3012",
            TypeErrorKind::ConstructorArity { .. } => "E3013",
            TypeErrorKind::NonAdtMatch(_) => "E3014",
            TypeErrorKind::UndefinedComponent(_) => "E3015",
            TypeErrorKind::UnsupportedOperator(_) => "E3016",
            TypeErrorKind::UnsupportedPattern => "E3017",
            TypeErrorKind::InfiniteType { .. } => "E3018",
            TypeErrorKind::NonExhaustive { .. } => "E3019",
            TypeErrorKind::Redeclared(_) => "E3020",
            TypeErrorKind::UndefinedExport(_) => "E3021",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub node: NodeId,
    pub span: Span,
}

impl TypeError {
    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic {
            code: self.kind.code().to_string(),
            severity: DiagnosticSeverity::Error,
            message: self.kind.to_string(),
            node: self.node,
            span: self.span,
            labels: Vec::new(),
        }
    }
}

/// A tree shape the grammar never produces. Checking stops when one is found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed tree at node {}: {reason}", .node.0)]
pub struct MalformedTree {
    pub node: NodeId,
    pub reason: String,
}
