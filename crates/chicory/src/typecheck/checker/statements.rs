use std::collections::BTreeMap;

use tracing::debug;

use super::{Located, TypeChecker};
use crate::ast::{AdtOption, AdtPayload, Ident, Stmt, StmtKind, TypeExpr, TypeExprKind, TypeField};
use crate::typecheck::error::{MalformedTree, TypeErrorKind};
use crate::typecheck::types::{ConstructorDef, SymbolKind, Type, TypeDef};

impl TypeChecker {
    pub(super) fn check_stmt(&mut self, stmt: &Stmt) -> Result<(), MalformedTree> {
        match &stmt.kind {
            StmtKind::Assign { name, value, .. } => {
                debug!(name = %name.name, "assignment");
                let ty = self.infer_expr(value)?;
                if self.config.strict_redeclaration && self.env.declared_in_current(&name.name) {
                    let labels = self.earlier_binding(&name.name);
                    self.report_labeled(
                        TypeErrorKind::Redeclared(name.name.clone()),
                        name.site(),
                        labels,
                    );
                }
                self.bind_local(name, ty.clone());
                self.push_symbol(name, ty, SymbolKind::Variable);
            }
            StmtKind::TypeDecl { name, ty } => {
                debug!(name = %name.name, "type declaration");
                self.declare_type(name, ty);
            }
            StmtKind::Import {
                default,
                names,
                module,
            } => {
                debug!(module = %module, "import");
                for ident in default.iter().chain(names.iter()) {
                    self.declare_import(ident, module);
                }
            }
            StmtKind::Export { names } => {
                for ident in names {
                    if self.lookup_value(&ident.name).is_none() {
                        self.report(TypeErrorKind::UndefinedExport(ident.name.clone()), ident.site());
                    }
                }
            }
            StmtKind::Expr(expr) => {
                self.infer_expr(expr)?;
            }
        }
        Ok(())
    }

    fn declare_import(&mut self, ident: &Ident, module: &str) {
        if self.env.declared_in_current(&ident.name) {
            let labels = self.earlier_binding(&ident.name);
            self.report_labeled(
                TypeErrorKind::DuplicateImport(ident.name.clone()),
                ident.site(),
                labels,
            );
            return;
        }
        let ty = Type::external(module);
        self.bind_local(ident, ty.clone());
        self.push_symbol(ident, ty, SymbolKind::Import);
    }

    fn declare_type(&mut self, name: &Ident, ty: &TypeExpr) {
        let def = self.lower_type_def(ty, &name.name);
        self.registry.declare_type(&name.name, def.clone(), name.id);
        self.push_symbol(name, def.to_type(&name.name), SymbolKind::Type);

        let (TypeDef::Adt(ctors), TypeExprKind::Adt(options)) = (def, &ty.kind) else {
            return;
        };
        for (option, ctor) in options.iter().zip(ctors) {
            let ctor_ty = ctor.ty.clone();
            let displaced = self.registry.register_constructor(ctor);
            if self.config.strict_redeclaration {
                if let Some(previous) = displaced.filter(|prev| prev.adt_name != name.name) {
                    self.report(TypeErrorKind::Redeclared(previous.name), option.name.site());
                }
            }
            self.push_symbol(&option.name, ctor_ty, SymbolKind::Constructor);
        }
    }

    /// Shape behind a type declaration's right-hand side, the one place an
    /// ADT may appear.
    fn lower_type_def(&mut self, ty: &TypeExpr, decl_name: &str) -> TypeDef {
        match &ty.kind {
            TypeExprKind::Adt(options) => TypeDef::Adt(self.lower_adt(decl_name, options)),
            _ => self.lower_shape(ty, None),
        }
    }

    /// `self_adt` names the ADT being declared, which may refer to itself.
    fn lower_shape(&mut self, ty: &TypeExpr, self_adt: Option<&str>) -> TypeDef {
        match &ty.kind {
            TypeExprKind::Adt(_) => {
                self.report(TypeErrorKind::AdtContext, ty.site());
                TypeDef::Alias(self.fresh_var())
            }
            TypeExprKind::Primitive(p) => TypeDef::Primitive((*p).into()),
            TypeExprKind::Record(fields) => TypeDef::Record(self.lower_fields(fields, self_adt)),
            TypeExprKind::Tuple(items) => TypeDef::Tuple(
                items
                    .iter()
                    .map(|item| self.lower_type(item, self_adt))
                    .collect(),
            ),
            TypeExprKind::Function { params, ret } => TypeDef::Function {
                params: params
                    .iter()
                    .map(|param| self.lower_type(param, self_adt))
                    .collect(),
                ret: self.lower_type(ret, self_adt),
            },
            TypeExprKind::Named(ident) => TypeDef::Alias(self.lookup_type(ident, self_adt)),
        }
    }

    fn lower_type(&mut self, ty: &TypeExpr, self_adt: Option<&str>) -> Type {
        // Only ADTs use the name; nested shapes never are one.
        self.lower_shape(ty, self_adt).to_type("")
    }

    fn lower_fields(
        &mut self,
        fields: &[TypeField],
        self_adt: Option<&str>,
    ) -> BTreeMap<String, Type> {
        let mut out = BTreeMap::new();
        for field in fields {
            let ty = self.lower_type(&field.ty, self_adt);
            out.insert(field.name.name.clone(), ty);
        }
        out
    }

    fn lower_adt(&mut self, adt_name: &str, options: &[AdtOption]) -> Vec<ConstructorDef> {
        let mut ctors = Vec::with_capacity(options.len());
        for option in options {
            let params = match &option.payload {
                AdtPayload::None => Vec::new(),
                AdtPayload::Primitive(p) => vec![Type::Primitive { name: (*p).into() }],
                AdtPayload::Named(ident) => vec![self.lookup_type(ident, Some(adt_name))],
                AdtPayload::Record(fields) => vec![Type::Record {
                    fields: self.lower_fields(fields, Some(adt_name)),
                }],
            };
            ctors.push(ConstructorDef::new(
                adt_name,
                &option.name.name,
                params,
                option.name.id,
            ));
        }
        ctors
    }

    fn lookup_type(&mut self, ident: &Ident, self_adt: Option<&str>) -> Type {
        if let Some(entry) = self.registry.type_def(&ident.name) {
            return entry.def.to_type(&ident.name);
        }
        if self_adt == Some(ident.name.as_str()) {
            return Type::adt(&ident.name);
        }
        self.report(TypeErrorKind::UndefinedType(ident.name.clone()), ident.site());
        self.fresh_var()
    }
}
