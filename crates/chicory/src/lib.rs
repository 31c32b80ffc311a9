pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod typecheck;

pub use config::{read_config, CheckerConfig, ChicoryToml};
pub use diagnostics::{
    render_diagnostic, render_diagnostics, to_editor_diagnostic, Diagnostic, DiagnosticSeverity,
    EditorDiagnostic, Span,
};
pub use typecheck::{
    check_program, check_program_with, CheckOutput, MalformedTree, SymbolInfo, SymbolKind, Type,
    TypeChecker,
};

#[derive(Debug, thiserror::Error)]
pub enum ChicoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Malformed(#[from] MalformedTree),
}
