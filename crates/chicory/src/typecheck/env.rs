use std::collections::HashMap;

use tracing::trace;

use crate::ast::NodeId;
use crate::diagnostics::Span;

use super::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct EnvEntry {
    pub ty: Type,
    pub origin: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<String, EnvEntry>,
}

/// Lexically scoped bindings.
///
/// Scopes live in an arena; the stack holds indices into it. A popped scope
/// keeps its allocation and is cleared when the next push reuses its slot.
#[derive(Debug)]
pub struct Environment {
    arena: Vec<Scope>,
    stack: Vec<ScopeId>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            arena: vec![Scope::default()],
            stack: vec![ScopeId(0)],
        }
    }

    /// Back to a single empty root scope.
    pub fn reset(&mut self) {
        self.stack.truncate(1);
        for scope in &mut self.arena {
            scope.bindings.clear();
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current(&self) -> ScopeId {
        self.stack[self.stack.len() - 1]
    }

    pub fn push(&mut self) -> ScopeId {
        let slot = self.stack.len();
        if slot == self.arena.len() {
            self.arena.push(Scope::default());
        } else {
            self.arena[slot].bindings.clear();
        }
        let id = ScopeId(slot);
        self.stack.push(id);
        trace!(depth = self.stack.len(), "enter scope");
        id
    }

    pub fn pop(&mut self) {
        // The root scope stays for the whole run.
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        trace!(depth = self.stack.len(), "exit scope");
    }

    /// Binds `name` in the innermost scope, replacing any binding of the same
    /// name there. Returns the replaced entry.
    pub fn insert(&mut self, name: &str, entry: EnvEntry) -> Option<EnvEntry> {
        let ScopeId(idx) = self.current();
        self.arena[idx].bindings.insert(name.to_string(), entry)
    }

    pub fn declared_in_current(&self, name: &str) -> bool {
        let ScopeId(idx) = self.current();
        self.arena[idx].bindings.contains_key(name)
    }

    /// Innermost-first lookup through the scope stack.
    pub fn lookup(&self, name: &str) -> Option<&EnvEntry> {
        self.stack
            .iter()
            .rev()
            .find_map(|ScopeId(idx)| self.arena[*idx].bindings.get(name))
    }
}
