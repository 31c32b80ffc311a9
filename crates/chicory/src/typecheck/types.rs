use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::ast::{NodeId, PrimitiveName};
use crate::diagnostics::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeVarId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Number,
    String,
    Boolean,
    Jsx,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Number => "number",
            Primitive::String => "string",
            Primitive::Boolean => "boolean",
            Primitive::Jsx => "jsx",
        }
    }
}

impl From<PrimitiveName> for Primitive {
    fn from(name: PrimitiveName) -> Self {
        match name {
            PrimitiveName::Number => Primitive::Number,
            PrimitiveName::String => Primitive::String,
            PrimitiveName::Boolean => Primitive::Boolean,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Type {
    Primitive { name: Primitive },
    External { module: String },
    Function { params: Vec<Type>, ret: Box<Type> },
    Tuple { elements: Vec<Type> },
    Record { fields: BTreeMap<String, Type> },
    Adt { name: String },
    Variable { id: TypeVarId },
}

impl Type {
    pub fn number() -> Self {
        Type::Primitive {
            name: Primitive::Number,
        }
    }

    pub fn string() -> Self {
        Type::Primitive {
            name: Primitive::String,
        }
    }

    pub fn boolean() -> Self {
        Type::Primitive {
            name: Primitive::Boolean,
        }
    }

    pub fn jsx() -> Self {
        Type::Primitive {
            name: Primitive::Jsx,
        }
    }

    pub fn var(id: TypeVarId) -> Self {
        Type::Variable { id }
    }

    pub fn adt(name: impl Into<String>) -> Self {
        Type::Adt { name: name.into() }
    }

    pub fn external(module: impl Into<String>) -> Self {
        Type::External {
            module: module.into(),
        }
    }

    pub fn func(params: Vec<Type>, ret: Type) -> Self {
        Type::Function {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn tuple(elements: Vec<Type>) -> Self {
        Type::Tuple { elements }
    }

    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Type)>,
        K: Into<String>,
    {
        Type::Record {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn as_var(&self) -> Option<TypeVarId> {
        match self {
            Type::Variable { id } => Some(*id),
            _ => None,
        }
    }
}

/// Renders types for diagnostics. Callers resolve through the substitution
/// store first; the printer itself only formats.
pub struct TypePrinter;

impl TypePrinter {
    pub fn print(ty: &Type) -> String {
        let mut out = String::new();
        Self::write(ty, &mut out);
        out
    }

    fn write(ty: &Type, out: &mut String) {
        match ty {
            Type::Primitive { name } => out.push_str(name.name()),
            Type::External { module } => {
                out.push_str("external(");
                out.push_str(module);
                out.push(')');
            }
            Type::Variable { id } => {
                out.push('T');
                out.push_str(&id.0.to_string());
            }
            Type::Function { params, ret } => {
                out.push('(');
                for (idx, param) in params.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    Self::write(param, out);
                }
                out.push_str(") -> ");
                Self::write(ret, out);
            }
            Type::Tuple { elements } => {
                out.push('[');
                for (idx, element) in elements.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    Self::write(element, out);
                }
                out.push(']');
            }
            Type::Record { fields } => {
                if fields.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push_str("{ ");
                for (idx, (name, field)) in fields.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(name);
                    out.push_str(": ");
                    Self::write(field, out);
                }
                out.push_str(" }");
            }
            Type::Adt { name } => out.push_str(name),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TypePrinter::print(self))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructorDef {
    pub adt_name: String,
    pub name: String,
    /// Always `Function(params, Adt(adt_name))`; zero-arg constructors have no params.
    pub ty: Type,
    pub origin: NodeId,
}

impl ConstructorDef {
    pub fn new(adt_name: &str, name: &str, params: Vec<Type>, origin: NodeId) -> Self {
        Self {
            adt_name: adt_name.to_string(),
            name: name.to_string(),
            ty: Type::func(params, Type::adt(adt_name)),
            origin,
        }
    }

    pub fn params(&self) -> &[Type] {
        match &self.ty {
            Type::Function { params, .. } => params,
            _ => &[],
        }
    }
}

/// The declared shape behind a type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDef {
    Primitive(Primitive),
    Record(BTreeMap<String, Type>),
    Tuple(Vec<Type>),
    Function { params: Vec<Type>, ret: Type },
    Adt(Vec<ConstructorDef>),
    /// `type A = B`: whatever `B` lowered to when `A` was declared.
    Alias(Type),
}

impl TypeDef {
    /// The type a reference to `name` denotes.
    pub fn to_type(&self, name: &str) -> Type {
        match self {
            TypeDef::Primitive(p) => Type::Primitive { name: *p },
            TypeDef::Record(fields) => Type::Record {
                fields: fields.clone(),
            },
            TypeDef::Tuple(elements) => Type::tuple(elements.clone()),
            TypeDef::Function { params, ret } => Type::func(params.clone(), ret.clone()),
            TypeDef::Adt(_) => Type::adt(name),
            TypeDef::Alias(ty) => ty.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Variable,
    Type,
    Constructor,
    Parameter,
    Import,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolInfo {
    pub name: String,
    pub ty: Type,
    pub origin: NodeId,
    pub span: Span,
    pub kind: SymbolKind,
}
