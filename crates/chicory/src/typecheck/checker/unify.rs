use std::collections::BTreeSet;

use tracing::debug;

use super::{Site, TypeChecker};
use crate::typecheck::error::TypeErrorKind;
use crate::typecheck::types::{Type, TypeVarId};

impl TypeChecker {
    /// Constrains `left` and `right` to be the same type.
    ///
    /// Failures are reported at `site` and never abort the run; the types are
    /// left as they were, so a single mismatch can surface again later.
    pub(super) fn unify(&mut self, left: &Type, right: &Type, site: Site) {
        let left = self.resolve(left);
        let right = self.resolve(right);
        match (&left, &right) {
            (Type::Variable { id: a }, Type::Variable { id: b }) if a == b => {}
            (Type::Variable { id }, other) | (other, Type::Variable { id }) => {
                self.bind_var(*id, other, site)
            }
            (Type::Primitive { name: a }, Type::Primitive { name: b }) if a == b => {}
            (Type::External { module: a }, Type::External { module: b }) if a == b => {}
            (Type::External { .. }, _) | (_, Type::External { .. })
                if self.config.dynamic_imports => {}
            (
                Type::Function {
                    params: params_a,
                    ret: ret_a,
                },
                Type::Function {
                    params: params_b,
                    ret: ret_b,
                },
            ) => {
                if params_a.len() != params_b.len() {
                    self.report(
                        TypeErrorKind::FunctionArity {
                            left: params_a.len(),
                            right: params_b.len(),
                        },
                        site,
                    );
                    return;
                }
                for (a, b) in params_a.iter().zip(params_b.iter()) {
                    self.unify(a, b, site);
                }
                self.unify(ret_a, ret_b, site);
            }
            (Type::Tuple { elements: items_a }, Type::Tuple { elements: items_b }) => {
                if items_a.len() != items_b.len() {
                    self.report(
                        TypeErrorKind::TupleLength {
                            left: items_a.len(),
                            right: items_b.len(),
                        },
                        site,
                    );
                    return;
                }
                for (a, b) in items_a.iter().zip(items_b.iter()) {
                    self.unify(a, b, site);
                }
            }
            (Type::Record { fields: a }, Type::Record { fields: b }) => {
                let all_fields: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
                for field in all_fields {
                    match (a.get(field), b.get(field)) {
                        (Some(ta), Some(tb)) => self.unify(ta, tb, site),
                        _ => self.report(TypeErrorKind::RecordField(field.clone()), site),
                    }
                }
            }
            (Type::Adt { name: a }, Type::Adt { name: b }) if a == b => {}
            (a, b) => {
                let kind = TypeErrorKind::Mismatch {
                    left: self.render(a),
                    right: self.render(b),
                };
                self.report(kind, site);
            }
        }
    }

    fn bind_var(&mut self, var: TypeVarId, ty: &Type, site: Site) {
        if self.subst.occurs(var, ty) {
            let kind = TypeErrorKind::InfiniteType {
                var: var.0,
                ty: self.render(ty),
            };
            self.report(kind, site);
            return;
        }
        debug!(var = var.0, ty = %ty, "bind");
        self.subst.bind(var, ty.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeId;
    use crate::config::CheckerConfig;
    use crate::diagnostics::Span;

    fn site() -> Site {
        Site {
            node: NodeId(0),
            span: Span::default(),
        }
    }

    fn checker() -> TypeChecker {
        TypeChecker::new(CheckerConfig::default())
    }

    fn codes(checker: &mut TypeChecker) -> Vec<String> {
        checker.sink.take().into_iter().map(|d| d.code).collect()
    }

    #[test]
    fn binds_variable_to_concrete_type() {
        let mut c = checker();
        let v = c.fresh_var();
        c.unify(&v, &Type::number(), site());
        assert_eq!(c.resolve(&v), Type::number());
        assert!(c.sink.is_empty());
    }

    #[test]
    fn same_variable_is_a_no_op() {
        let mut c = checker();
        let v = c.fresh_var();
        c.unify(&v, &v, site());
        assert_eq!(c.resolve(&v), v);
        assert!(c.sink.is_empty());
    }

    #[test]
    fn primitive_mismatch_names_both_sides() {
        let mut c = checker();
        c.unify(&Type::number(), &Type::string(), site());
        let diags = c.sink.take();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "E3003");
        assert_eq!(diags[0].message, "type mismatch between number and string");
    }

    #[test]
    fn function_arity_mismatch_reports_once_and_binds_nothing() {
        let mut c = checker();
        let a = c.fresh_var();
        let b = c.fresh_var();
        let one = Type::func(vec![a.clone()], b.clone());
        let two = Type::func(vec![Type::number(), Type::string()], Type::boolean());
        c.unify(&one, &two, site());
        assert_eq!(codes(&mut c), vec!["E3004"]);
        assert_eq!(c.resolve(&a), a);
        assert_eq!(c.resolve(&b), b);
    }

    #[test]
    fn tuple_length_mismatch_reports_once_and_binds_nothing() {
        let mut c = checker();
        let a = c.fresh_var();
        c.unify(
            &Type::tuple(vec![a.clone()]),
            &Type::tuple(vec![Type::number(), Type::number()]),
            site(),
        );
        assert_eq!(codes(&mut c), vec!["E3005"]);
        assert_eq!(c.resolve(&a), a);
    }

    #[test]
    fn function_parameters_and_return_unify_pairwise() {
        let mut c = checker();
        let a = c.fresh_var();
        let r = c.fresh_var();
        c.unify(
            &Type::func(vec![a.clone()], r.clone()),
            &Type::func(vec![Type::string()], Type::boolean()),
            site(),
        );
        assert!(c.sink.is_empty());
        assert_eq!(c.resolve(&a), Type::string());
        assert_eq!(c.resolve(&r), Type::boolean());
    }

    #[test]
    fn record_reports_each_one_sided_field_and_unifies_shared_ones() {
        let mut c = checker();
        let v = c.fresh_var();
        let left = Type::record([("a", v.clone()), ("only_left", Type::number())]);
        let right = Type::record([("a", Type::string()), ("only_right", Type::boolean())]);
        c.unify(&left, &right, site());
        let diags = c.sink.take();
        let messages: Vec<_> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "record field 'only_left' mismatch",
                "record field 'only_right' mismatch"
            ]
        );
        assert_eq!(c.resolve(&v), Type::string());
    }

    #[test]
    fn unification_is_symmetric() {
        let cases = vec![
            (Type::number(), Type::string()),
            (
                Type::func(vec![Type::number()], Type::number()),
                Type::func(Vec::new(), Type::number()),
            ),
            (
                Type::record([("x", Type::number())]),
                Type::record([("y", Type::number())]),
            ),
            (Type::adt("A"), Type::adt("B")),
            (Type::adt("A"), Type::adt("A")),
        ];
        for (a, b) in cases {
            let mut forward = checker();
            forward.unify(&a, &b, site());
            let mut backward = checker();
            backward.unify(&b, &a, site());
            assert_eq!(codes(&mut forward), codes(&mut backward), "{a} vs {b}");
        }

        let mut forward = checker();
        let v = forward.fresh_var();
        forward.unify(&v, &Type::tuple(vec![Type::number()]), site());
        let mut backward = checker();
        let w = backward.fresh_var();
        backward.unify(&Type::tuple(vec![Type::number()]), &w, site());
        assert_eq!(forward.resolve(&v), backward.resolve(&w));
    }

    #[test]
    fn occurs_check_refuses_cyclic_binding() {
        let mut c = checker();
        let v = c.fresh_var();
        let cyclic = Type::func(vec![v.clone()], Type::number());
        c.unify(&v, &cyclic, site());
        let diags = c.sink.take();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "E3018");
        assert_eq!(c.resolve(&v), v);
    }

    #[test]
    fn external_types_unify_only_with_same_module_by_default() {
        let mut c = checker();
        c.unify(&Type::external("react"), &Type::external("react"), site());
        assert!(c.sink.is_empty());
        c.unify(&Type::external("react"), &Type::number(), site());
        assert_eq!(codes(&mut c), vec!["E3003"]);
    }

    #[test]
    fn dynamic_imports_accept_anything() {
        let mut c = TypeChecker::new(CheckerConfig {
            dynamic_imports: true,
            ..CheckerConfig::default()
        });
        c.unify(
            &Type::external("react"),
            &Type::func(vec![Type::number()], Type::jsx()),
            site(),
        );
        assert!(c.sink.is_empty());
    }
}
