use tracing::debug;

use super::{Located, TypeChecker};
use crate::ast::{MatchArm, MatchExpr, Pattern, PatternKind, Primary};
use crate::typecheck::error::{MalformedTree, TypeErrorKind};
use crate::typecheck::types::{SymbolKind, Type};

/// Does this arm fully cover the constructor it names?
fn covered_constructor(pattern: &Pattern) -> Option<&str> {
    match &pattern.kind {
        PatternKind::Constructor { name, args } => match args.as_slice() {
            [] => Some(&name.name),
            [arg] if matches!(arg.kind, PatternKind::Binding(_) | PatternKind::Wildcard) => {
                Some(&name.name)
            }
            _ => None,
        },
        _ => None,
    }
}

fn is_literal_arm(arm: &MatchArm) -> bool {
    matches!(
        arm.pattern.kind,
        PatternKind::Literal(_) | PatternKind::Wildcard
    )
}

impl TypeChecker {
    pub(super) fn infer_match(
        &mut self,
        primary: &Primary,
        expr: &MatchExpr,
    ) -> Result<Type, MalformedTree> {
        let scrutinee = self.infer_expr(&expr.scrutinee)?;
        let resolved = self.resolve(&scrutinee);

        if let Type::Adt { name } = &resolved {
            if self.registry.adt_constructors(name).is_some() {
                debug!(adt = %name, arms = expr.arms.len(), "match");
                return self.check_adt_arms(primary, name, &scrutinee, &expr.arms);
            }
        } else if !expr.arms.is_empty() && expr.arms.iter().all(is_literal_arm) {
            return self.check_literal_arms(&scrutinee, &expr.arms);
        }

        let found = self.render(&resolved);
        self.report(TypeErrorKind::NonAdtMatch(found), expr.scrutinee.site());
        Ok(self.fresh_var())
    }

    fn check_adt_arms(
        &mut self,
        primary: &Primary,
        adt: &str,
        scrutinee: &Type,
        arms: &[MatchArm],
    ) -> Result<Type, MalformedTree> {
        let result = self.fresh_var();
        for arm in arms {
            self.env.push();
            self.bind_adt_pattern(&arm.pattern, adt, scrutinee);
            let body = self.infer_expr(&arm.body)?;
            self.unify(&result, &body, arm.body.site());
            self.env.pop();
        }
        if self.config.exhaustiveness {
            self.check_exhaustive(primary, adt, arms);
        }
        Ok(self.subst.apply(&result))
    }

    fn bind_adt_pattern(&mut self, pattern: &Pattern, adt: &str, scrutinee: &Type) {
        match &pattern.kind {
            PatternKind::Wildcard => {}
            PatternKind::Literal(literal) => {
                let ty = self.literal_type(literal);
                self.unify(&ty, scrutinee, pattern.site());
            }
            PatternKind::Binding(_) => {
                self.report(TypeErrorKind::UnsupportedPattern, pattern.site())
            }
            PatternKind::Constructor { name, args } => {
                let Some(ctor) = self.registry.constructor_of(adt, &name.name) else {
                    let kind = TypeErrorKind::ForeignConstructor {
                        ctor: name.name.clone(),
                        adt: adt.to_string(),
                    };
                    self.report(kind, name.site());
                    return;
                };
                let params = ctor.params().to_vec();
                let arity_error = TypeErrorKind::ConstructorArity {
                    ctor: name.name.clone(),
                    expected: params.len(),
                };
                match (args.as_slice(), params.as_slice()) {
                    ([], []) => {}
                    ([], _) => self.report(arity_error, pattern.site()),
                    ([arg], [param]) => self.bind_payload(arg, param),
                    ([arg], _) => {
                        self.report(arity_error, pattern.site());
                        // Keep the name visible so the body does not cascade.
                        if let PatternKind::Binding(ident) = &arg.kind {
                            let ty = self.fresh_var();
                            self.bind_local(ident, ty);
                        }
                    }
                    _ => self.report(TypeErrorKind::UnsupportedPattern, pattern.site()),
                }
            }
        }
    }

    fn bind_payload(&mut self, arg: &Pattern, param: &Type) {
        match &arg.kind {
            PatternKind::Binding(ident) => {
                self.bind_local(ident, param.clone());
                self.push_symbol(ident, param.clone(), SymbolKind::Variable);
            }
            PatternKind::Literal(literal) => {
                let ty = self.literal_type(literal);
                self.unify(param, &ty, arg.site());
            }
            PatternKind::Wildcard => {}
            PatternKind::Constructor { .. } => {
                self.report(TypeErrorKind::UnsupportedPattern, arg.site())
            }
        }
    }

    fn check_exhaustive(&mut self, primary: &Primary, adt: &str, arms: &[MatchArm]) {
        if arms
            .iter()
            .any(|arm| matches!(arm.pattern.kind, PatternKind::Wildcard))
        {
            return;
        }
        let Some(ctors) = self.registry.adt_constructors(adt) else {
            return;
        };
        let missing: Vec<String> = ctors
            .iter()
            .filter(|ctor| {
                !arms
                    .iter()
                    .any(|arm| covered_constructor(&arm.pattern) == Some(ctor.name.as_str()))
            })
            .map(|ctor| ctor.name.clone())
            .collect();
        if !missing.is_empty() {
            let kind = TypeErrorKind::NonExhaustive {
                adt: adt.to_string(),
                missing,
            };
            self.report(kind, primary.site());
        }
    }

    /// Non-ADT scrutinee where every arm is a literal or a wildcard.
    fn check_literal_arms(
        &mut self,
        scrutinee: &Type,
        arms: &[MatchArm],
    ) -> Result<Type, MalformedTree> {
        let result = self.fresh_var();
        for arm in arms {
            self.env.push();
            if let PatternKind::Literal(literal) = &arm.pattern.kind {
                let ty = self.literal_type(literal);
                self.unify(&ty, scrutinee, arm.pattern.site());
            }
            let body = self.infer_expr(&arm.body)?;
            self.unify(&result, &body, arm.body.site());
            self.env.pop();
        }
        Ok(self.subst.apply(&result))
    }
}
