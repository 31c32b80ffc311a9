//! Type inference over a parsed program.
//!
//! One [`TypeChecker`] walks the tree top to bottom, collecting diagnostics
//! and declared symbols as it goes. Only a malformed tree stops the walk.

use std::collections::HashMap;

use crate::ast::{NodeId, Program};
use crate::config::CheckerConfig;
use crate::diagnostics::Diagnostic;

mod checker;
pub mod env;
pub mod error;
pub mod registry;
pub mod subst;
pub mod types;

pub use checker::TypeChecker;
pub use error::{MalformedTree, TypeError, TypeErrorKind};
pub use types::{ConstructorDef, Primitive, SymbolInfo, SymbolKind, Type, TypeDef, TypeVarId};

/// Everything one run produces. Types are fully resolved; a variable that
/// nothing constrained stays a `Variable`.
#[derive(Debug, Clone, Default)]
pub struct CheckOutput {
    pub diagnostics: Vec<Diagnostic>,
    pub symbols: Vec<SymbolInfo>,
    pub node_types: HashMap<NodeId, Type>,
}

impl CheckOutput {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn type_of(&self, node: NodeId) -> Option<&Type> {
        self.node_types.get(&node)
    }

    /// The most recent declaration of `name`.
    pub fn symbol(&self, name: &str) -> Option<&SymbolInfo> {
        self.symbols.iter().rev().find(|symbol| symbol.name == name)
    }

    pub fn codes(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.code.as_str()).collect()
    }
}

pub fn check_program(program: &Program) -> Result<CheckOutput, MalformedTree> {
    check_program_with(program, &CheckerConfig::default())
}

pub fn check_program_with(
    program: &Program,
    config: &CheckerConfig,
) -> Result<CheckOutput, MalformedTree> {
    TypeChecker::new(config.clone()).check(program)
}
