use std::collections::HashMap;

use crate::ast::NodeId;

use super::types::{ConstructorDef, TypeDef};

#[derive(Debug, Clone)]
pub struct TypeDefEntry {
    pub def: TypeDef,
    pub origin: NodeId,
}

/// Declared type names and the global constructor table.
///
/// Declaring a name again replaces the earlier definition. Constructor names
/// share one namespace across every ADT.
#[derive(Debug, Default)]
pub struct Registry {
    type_defs: HashMap<String, TypeDefEntry>,
    constructors: HashMap<String, ConstructorDef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.type_defs.clear();
        self.constructors.clear();
    }

    pub fn declare_type(&mut self, name: &str, def: TypeDef, origin: NodeId) {
        self.type_defs
            .insert(name.to_string(), TypeDefEntry { def, origin });
    }

    pub fn type_def(&self, name: &str) -> Option<&TypeDefEntry> {
        self.type_defs.get(name)
    }

    /// Constructors of `adt`, in declaration order, when `adt` names an ADT.
    pub fn adt_constructors(&self, adt: &str) -> Option<&[ConstructorDef]> {
        match self.type_defs.get(adt) {
            Some(TypeDefEntry {
                def: TypeDef::Adt(ctors),
                ..
            }) => Some(ctors),
            _ => None,
        }
    }

    /// Registers `ctor`, returning the definition it displaced, if any.
    pub fn register_constructor(&mut self, ctor: ConstructorDef) -> Option<ConstructorDef> {
        self.constructors.insert(ctor.name.clone(), ctor)
    }

    pub fn constructor(&self, name: &str) -> Option<&ConstructorDef> {
        self.constructors.get(name)
    }

    /// The constructor `name` as declared by `adt`, even if another ADT has
    /// since taken the name in the global table.
    pub fn constructor_of(&self, adt: &str, name: &str) -> Option<&ConstructorDef> {
        self.adt_constructors(adt)?
            .iter()
            .find(|ctor| ctor.name == name)
    }
}
