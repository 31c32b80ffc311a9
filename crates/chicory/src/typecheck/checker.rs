use std::collections::HashMap;

use tracing::debug;

use crate::ast::{
    AdtOption, Expr, Ident, IfBranch, Literal, Markup, MatchArm, NodeId, Pattern, Primary,
    Program, Stmt, Tail, TypeExpr,
};
use crate::config::CheckerConfig;
use crate::diagnostics::{DiagnosticLabel, DiagnosticSink, Span};

use super::env::{EnvEntry, Environment};
use super::error::{MalformedTree, TypeError, TypeErrorKind};
use super::registry::Registry;
use super::subst::Substitution;
use super::types::{SymbolInfo, SymbolKind, Type, TypePrinter};
use super::CheckOutput;

mod infer_expr;
mod markup;
mod match_expr;
mod statements;
mod unify;

/// Where a diagnostic points: a node id plus the span the parser gave it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Site {
    pub node: NodeId,
    pub span: Span,
}

pub(crate) trait Located {
    fn site(&self) -> Site;
}

macro_rules! located {
    ($($ty:ty),* $(,)?) => {
        $(impl Located for $ty {
            fn site(&self) -> Site {
                Site {
                    node: self.id,
                    span: self.span,
                }
            }
        })*
    };
}

located!(
    Expr, Primary, Tail, Pattern, Ident, Literal, MatchArm, IfBranch, Markup, Stmt, TypeExpr,
    AdtOption,
);

/// One checking run over a program.
///
/// All run state (substitution, scopes, registry, diagnostics, symbols) is
/// owned here and cleared at the start of [`TypeChecker::check`], so one
/// instance can check unrelated programs back to back. Separate threads need
/// separate instances.
pub struct TypeChecker {
    config: CheckerConfig,
    subst: Substitution,
    env: Environment,
    registry: Registry,
    sink: DiagnosticSink,
    symbols: Vec<SymbolInfo>,
    node_types: HashMap<NodeId, Type>,
}

impl TypeChecker {
    pub fn new(config: CheckerConfig) -> Self {
        Self {
            config,
            subst: Substitution::new(),
            env: Environment::new(),
            registry: Registry::new(),
            sink: DiagnosticSink::default(),
            symbols: Vec::new(),
            node_types: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    fn reset(&mut self) {
        self.subst.reset();
        self.env.reset();
        self.registry.reset();
        self.sink.clear();
        self.symbols.clear();
        self.node_types.clear();
    }

    pub fn check(&mut self, program: &Program) -> Result<CheckOutput, MalformedTree> {
        self.reset();
        for stmt in &program.statements {
            self.check_stmt(stmt)?;
        }
        Ok(self.finish())
    }

    fn finish(&mut self) -> CheckOutput {
        let mut symbols = std::mem::take(&mut self.symbols);
        for symbol in &mut symbols {
            symbol.ty = self.subst.apply(&symbol.ty);
        }
        let raw_types = std::mem::take(&mut self.node_types);
        let node_types = raw_types
            .into_iter()
            .map(|(node, ty)| (node, self.subst.apply(&ty)))
            .collect();
        let diagnostics = self.sink.take();
        debug!(
            diagnostics = diagnostics.len(),
            symbols = symbols.len(),
            variables = self.subst.issued(),
            "type check finished"
        );
        CheckOutput {
            diagnostics,
            symbols,
            node_types,
        }
    }

    fn fresh_var(&mut self) -> Type {
        self.subst.fresh()
    }

    fn resolve(&mut self, ty: &Type) -> Type {
        self.subst.resolve(ty)
    }

    /// Human-readable form of `ty` with every known binding substituted.
    pub fn render(&mut self, ty: &Type) -> String {
        TypePrinter::print(&self.subst.apply(ty))
    }

    fn report(&mut self, kind: TypeErrorKind, site: Site) {
        self.report_labeled(kind, site, Vec::new());
    }

    fn report_labeled(&mut self, kind: TypeErrorKind, site: Site, labels: Vec<DiagnosticLabel>) {
        debug!(code = kind.code(), node = site.node.0, "{}", kind);
        let mut diagnostic = TypeError {
            kind,
            node: site.node,
            span: site.span,
        }
        .into_diagnostic();
        diagnostic.labels = labels;
        self.sink.push(diagnostic);
    }

    /// Points back at the visible binding of `name`, if there is one.
    fn earlier_binding(&self, name: &str) -> Vec<DiagnosticLabel> {
        self.env
            .lookup(name)
            .map(|entry| DiagnosticLabel {
                message: format!("'{name}' first declared here"),
                span: entry.span,
            })
            .into_iter()
            .collect()
    }

    fn record_type(&mut self, node: NodeId, ty: &Type) {
        self.node_types.insert(node, ty.clone());
    }

    fn push_symbol(&mut self, name: &Ident, ty: Type, kind: SymbolKind) {
        self.symbols.push(SymbolInfo {
            name: name.name.clone(),
            ty,
            origin: name.id,
            span: name.span,
            kind,
        });
    }

    fn bind_local(&mut self, name: &Ident, ty: Type) {
        self.env.insert(
            &name.name,
            EnvEntry {
                ty,
                origin: name.id,
                span: name.span,
            },
        );
    }

    /// Environment first, then the global constructor table.
    fn lookup_value(&self, name: &str) -> Option<Type> {
        if let Some(entry) = self.env.lookup(name) {
            return Some(entry.ty.clone());
        }
        self.registry.constructor(name).map(|ctor| ctor.ty.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::TreeBuilder;

    #[test]
    fn each_run_starts_from_clean_state() {
        let b = TreeBuilder::new();
        let first = b.program(vec![
            b.let_("a", b.func(&["x"], b.var("x"))),
            b.expr_stmt(b.var("missing")),
        ]);
        let second = b.program(vec![b.let_("a", b.num(1.0))]);

        let mut checker = TypeChecker::new(CheckerConfig::default());
        let out = checker.check(&first).unwrap();
        assert_eq!(out.diagnostics.len(), 1);

        let out = checker.check(&second).unwrap();
        assert!(out.diagnostics.is_empty());
        assert_eq!(out.symbols.len(), 1);
        assert_eq!(checker.subst.issued(), 0);
        assert_eq!(checker.env.depth(), 1);
    }

    #[test]
    fn declarations_do_not_leak_between_runs() {
        let b = TreeBuilder::new();
        let declares = b.program(vec![b.type_decl("T", b.ty_adt(vec![b.option("A")]))]);
        let uses = b.program(vec![b.expr_stmt(b.var("A"))]);

        let mut checker = TypeChecker::new(CheckerConfig::default());
        checker.check(&declares).unwrap();
        let out = checker.check(&uses).unwrap();
        assert_eq!(out.codes(), vec!["E3001"]);
    }
}
