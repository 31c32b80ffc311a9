use super::types::{Type, TypeVarId};

/// Variable bindings produced by unification, indexed by variable id.
///
/// Bindings are only ever added during a run; `resolve` re-points chains at
/// their final answer so repeated lookups stay short.
#[derive(Debug, Default)]
pub struct Substitution {
    slots: Vec<Option<Type>>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.slots.clear();
    }

    pub fn fresh(&mut self) -> Type {
        let id = TypeVarId(self.slots.len() as u32);
        self.slots.push(None);
        Type::var(id)
    }

    /// Number of variables issued since the last reset.
    pub fn issued(&self) -> usize {
        self.slots.len()
    }

    pub fn lookup(&self, var: TypeVarId) -> Option<&Type> {
        self.slots.get(var.0 as usize).and_then(|slot| slot.as_ref())
    }

    pub fn bind(&mut self, var: TypeVarId, ty: Type) {
        let idx = var.0 as usize;
        if idx >= self.slots.len() {
            self.slots.resize(idx + 1, None);
        }
        debug_assert!(self.slots[idx].is_none(), "T{} bound twice", var.0);
        self.slots[idx] = Some(ty);
    }

    /// Follows `ty` through bound variables until a non-variable or an unbound
    /// variable is reached.
    pub fn resolve(&mut self, ty: &Type) -> Type {
        let Some(start) = ty.as_var() else {
            return ty.clone();
        };
        let mut visited = Vec::new();
        let mut current = start;
        let answer = loop {
            match self.lookup(current) {
                Some(Type::Variable { id }) => {
                    visited.push(current);
                    current = *id;
                }
                Some(other) => {
                    visited.push(current);
                    break other.clone();
                }
                None => break Type::var(current),
            }
        };
        // Every variable on the chain except the last hop now points straight at the answer.
        if visited.len() > 1 {
            for var in &visited[..visited.len() - 1] {
                self.slots[var.0 as usize] = Some(answer.clone());
            }
        }
        answer
    }

    /// Resolves `ty` and everything nested inside it.
    pub fn apply(&mut self, ty: &Type) -> Type {
        match self.resolve(ty) {
            Type::Function { params, ret } => Type::Function {
                params: params.iter().map(|p| self.apply(p)).collect(),
                ret: Box::new(self.apply(&ret)),
            },
            Type::Tuple { elements } => Type::Tuple {
                elements: elements.iter().map(|e| self.apply(e)).collect(),
            },
            Type::Record { fields } => Type::Record {
                fields: fields
                    .iter()
                    .map(|(name, field)| (name.clone(), self.apply(field)))
                    .collect(),
            },
            other => other,
        }
    }

    /// Does `var` occur in `ty` once bindings are followed.
    pub fn occurs(&mut self, var: TypeVarId, ty: &Type) -> bool {
        match self.resolve(ty) {
            Type::Variable { id } => id == var,
            Type::Function { params, ret } => {
                params.iter().any(|p| self.occurs(var, p)) || self.occurs(var, &ret)
            }
            Type::Tuple { elements } => elements.iter().any(|e| self.occurs(var, e)),
            Type::Record { fields } => fields.values().any(|f| self.occurs(var, f)),
            Type::Primitive { .. } | Type::External { .. } | Type::Adt { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_count_up_from_zero_after_reset() {
        let mut subst = Substitution::new();
        assert_eq!(subst.fresh(), Type::var(TypeVarId(0)));
        assert_eq!(subst.fresh(), Type::var(TypeVarId(1)));
        subst.reset();
        assert_eq!(subst.fresh(), Type::var(TypeVarId(0)));
    }

    #[test]
    fn resolve_follows_chains_and_compresses() {
        let mut subst = Substitution::new();
        let a = subst.fresh();
        let b = subst.fresh();
        let c = subst.fresh();
        subst.bind(TypeVarId(0), b.clone());
        subst.bind(TypeVarId(1), c.clone());
        subst.bind(TypeVarId(2), Type::number());
        assert_eq!(subst.resolve(&a), Type::number());
        assert_eq!(subst.lookup(TypeVarId(0)), Some(&Type::number()));
    }

    #[test]
    fn resolve_stops_at_unbound_variable() {
        let mut subst = Substitution::new();
        let a = subst.fresh();
        let b = subst.fresh();
        subst.bind(TypeVarId(0), b.clone());
        assert_eq!(subst.resolve(&a), b);
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut subst = Substitution::new();
        let a = subst.fresh();
        let b = subst.fresh();
        subst.bind(TypeVarId(0), Type::func(vec![b.clone()], Type::string()));
        let samples = vec![
            a.clone(),
            b.clone(),
            Type::number(),
            Type::tuple(vec![a.clone(), b.clone()]),
        ];
        for ty in samples {
            let once = subst.resolve(&ty);
            let twice = subst.resolve(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn apply_resolves_nested_positions() {
        let mut subst = Substitution::new();
        let a = subst.fresh();
        let b = subst.fresh();
        subst.bind(TypeVarId(1), Type::boolean());
        let ty = Type::record([("x", Type::tuple(vec![b.clone()])), ("y", a.clone())]);
        let applied = subst.apply(&ty);
        assert_eq!(
            applied,
            Type::record([("x", Type::tuple(vec![Type::boolean()])), ("y", a)])
        );
    }

    #[test]
    fn occurs_sees_through_bindings() {
        let mut subst = Substitution::new();
        let a = subst.fresh();
        let b = subst.fresh();
        subst.bind(TypeVarId(1), Type::tuple(vec![a.clone()]));
        assert!(subst.occurs(TypeVarId(0), &Type::func(vec![b], Type::number())));
        assert!(!subst.occurs(TypeVarId(0), &Type::number()));
    }
}
