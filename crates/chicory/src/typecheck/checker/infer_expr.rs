use std::collections::BTreeMap;

use tracing::trace;

use super::{Located, TypeChecker};
use crate::ast::{
    Block, Expr, FuncExpr, Ident, IfChain, Literal, LiteralKind, Primary, PrimaryKind,
    RecordEntry, Tail, TailKind,
};
use crate::typecheck::error::{MalformedTree, TypeErrorKind};
use crate::typecheck::types::{SymbolKind, Type};

enum OperatorClass {
    Arithmetic,
    Comparison,
    Equality,
    Logical,
}

fn classify_operator(op: &str) -> Option<OperatorClass> {
    match op {
        "+" | "-" | "*" | "/" => Some(OperatorClass::Arithmetic),
        "<" | ">" | "<=" | ">=" => Some(OperatorClass::Comparison),
        "==" | "!=" => Some(OperatorClass::Equality),
        "&&" | "||" => Some(OperatorClass::Logical),
        _ => None,
    }
}

impl TypeChecker {
    pub(super) fn infer_expr(&mut self, expr: &Expr) -> Result<Type, MalformedTree> {
        let mut current = self.infer_primary(&expr.primary)?;
        self.record_type(expr.primary.id, &current);
        for tail in &expr.tails {
            current = self.infer_tail(current, tail)?;
            self.record_type(tail.id, &current);
        }
        self.record_type(expr.id, &current);
        Ok(current)
    }

    fn infer_primary(&mut self, primary: &Primary) -> Result<Type, MalformedTree> {
        match &primary.kind {
            PrimaryKind::Ident(ident) => Ok(self.infer_ident(ident)),
            PrimaryKind::Literal(literal) => Ok(self.literal_type(literal)),
            PrimaryKind::Paren(inner) => self.infer_expr(inner),
            PrimaryKind::Block(block) => self.infer_block(block),
            PrimaryKind::Record(entries) => self.infer_record(entries),
            PrimaryKind::ArrayLike(items) => self.infer_tuple(items),
            PrimaryKind::Function(func) => self.infer_function(func),
            PrimaryKind::If(chain) => self.infer_if(primary, chain),
            PrimaryKind::Match(expr) => self.infer_match(primary, expr),
            PrimaryKind::Markup(markup) => self.infer_markup(markup),
        }
    }

    fn infer_ident(&mut self, ident: &Ident) -> Type {
        match self.lookup_value(&ident.name) {
            Some(ty) => {
                trace!(name = %ident.name, ty = %ty, "lookup");
                ty
            }
            None => {
                trace!(name = %ident.name, "lookup miss");
                self.report(
                    TypeErrorKind::UndefinedIdentifier(ident.name.clone()),
                    ident.site(),
                );
                self.fresh_var()
            }
        }
    }

    pub(super) fn literal_type(&self, literal: &Literal) -> Type {
        match literal.kind {
            LiteralKind::String(_) => Type::string(),
            LiteralKind::Number(_) => Type::number(),
            LiteralKind::Boolean(_) => Type::boolean(),
        }
    }

    fn infer_block(&mut self, block: &Block) -> Result<Type, MalformedTree> {
        self.env.push();
        for stmt in &block.statements {
            self.check_stmt(stmt)?;
        }
        let ty = match &block.result {
            Some(result) => self.infer_expr(result)?,
            None => self.fresh_var(),
        };
        self.env.pop();
        Ok(ty)
    }

    fn infer_record(&mut self, entries: &[RecordEntry]) -> Result<Type, MalformedTree> {
        let mut fields = BTreeMap::new();
        for entry in entries {
            let ty = self.infer_expr(&entry.value)?;
            fields.insert(entry.name.name.clone(), ty);
        }
        Ok(Type::Record { fields })
    }

    fn infer_tuple(&mut self, items: &[Expr]) -> Result<Type, MalformedTree> {
        let mut elements = Vec::with_capacity(items.len());
        for item in items {
            elements.push(self.infer_expr(item)?);
        }
        Ok(Type::tuple(elements))
    }

    fn infer_function(&mut self, func: &FuncExpr) -> Result<Type, MalformedTree> {
        self.env.push();
        let mut params = Vec::with_capacity(func.params.len());
        for param in &func.params {
            let ty = self.fresh_var();
            self.bind_local(param, ty.clone());
            self.push_symbol(param, ty.clone(), SymbolKind::Parameter);
            params.push(ty);
        }
        let body = self.infer_expr(&func.body)?;
        self.env.pop();
        Ok(Type::func(params, body))
    }

    fn infer_if(&mut self, primary: &Primary, chain: &IfChain) -> Result<Type, MalformedTree> {
        if chain.branches.is_empty() {
            return Err(MalformedTree {
                node: primary.id,
                reason: "if expression without branches".to_string(),
            });
        }
        let result = self.fresh_var();
        for branch in &chain.branches {
            let condition = self.infer_expr(&branch.condition)?;
            self.unify(&Type::boolean(), &condition, branch.condition.site());
            let body = self.infer_expr(&branch.body)?;
            self.unify(&result, &body, branch.body.site());
        }
        if let Some(otherwise) = &chain.otherwise {
            let body = self.infer_expr(otherwise)?;
            self.unify(&result, &body, otherwise.site());
        }
        Ok(result)
    }

    fn infer_tail(&mut self, current: Type, tail: &Tail) -> Result<Type, MalformedTree> {
        match &tail.kind {
            TailKind::Member(member) => Ok(self.infer_member(current, member, tail)),
            TailKind::Index(index) => self.infer_index(current, index, tail),
            TailKind::Call(args) => {
                let mut params = Vec::with_capacity(args.len());
                for arg in args {
                    params.push(self.infer_expr(arg)?);
                }
                let ret = self.fresh_var();
                self.unify(&current, &Type::func(params, ret.clone()), tail.site());
                Ok(ret)
            }
            TailKind::Operation { op, rhs } => self.infer_operation(current, op, rhs, tail),
        }
    }

    fn infer_member(&mut self, current: Type, member: &Ident, tail: &Tail) -> Type {
        match self.resolve(&current) {
            Type::Record { fields } => match fields.get(&member.name) {
                Some(ty) => ty.clone(),
                None => {
                    self.report(TypeErrorKind::UnknownMember(member.name.clone()), tail.site());
                    self.fresh_var()
                }
            },
            Type::External { .. } if self.config.dynamic_imports => self.fresh_var(),
            other => {
                let kind = TypeErrorKind::NonRecordMember {
                    member: member.name.clone(),
                    found: self.render(&other),
                };
                self.report(kind, tail.site());
                self.fresh_var()
            }
        }
    }

    fn infer_index(
        &mut self,
        current: Type,
        index: &Expr,
        tail: &Tail,
    ) -> Result<Type, MalformedTree> {
        let index_ty = self.infer_expr(index)?;
        self.unify(&Type::number(), &index_ty, index.site());
        // The element is not known statically, even for a literal index.
        let ty = match self.resolve(&current) {
            Type::Tuple { .. } => self.fresh_var(),
            Type::External { .. } if self.config.dynamic_imports => self.fresh_var(),
            other => {
                let found = self.render(&other);
                self.report(TypeErrorKind::NonTupleIndex(found), tail.site());
                self.fresh_var()
            }
        };
        Ok(ty)
    }

    fn infer_operation(
        &mut self,
        left: Type,
        op: &str,
        rhs: &Expr,
        tail: &Tail,
    ) -> Result<Type, MalformedTree> {
        let right = self.infer_expr(rhs)?;
        let ty = match classify_operator(op) {
            Some(OperatorClass::Arithmetic) => {
                self.unify(&Type::number(), &left, tail.site());
                self.unify(&Type::number(), &right, rhs.site());
                Type::number()
            }
            Some(OperatorClass::Comparison) => {
                self.unify(&Type::number(), &left, tail.site());
                self.unify(&Type::number(), &right, rhs.site());
                Type::boolean()
            }
            Some(OperatorClass::Equality) => {
                self.unify(&left, &right, rhs.site());
                Type::boolean()
            }
            Some(OperatorClass::Logical) => {
                self.unify(&Type::boolean(), &left, tail.site());
                self.unify(&Type::boolean(), &right, rhs.site());
                Type::boolean()
            }
            None => {
                self.report(TypeErrorKind::UnsupportedOperator(op.to_string()), tail.site());
                self.fresh_var()
            }
        };
        Ok(ty)
    }
}
