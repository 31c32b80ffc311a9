use serde::Serialize;

use crate::ast::NodeId;

/// One-based line and column, as reported by the parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        Self {
            start: Position {
                line: start.0,
                column: start.1,
            },
            end: Position {
                line: end.0,
                column: end.1,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticLabel {
    pub message: String,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub node: NodeId,
    pub span: Span,
    pub labels: Vec<DiagnosticLabel>,
}

/// Ordered, append-only collection of diagnostics for one checking run.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

/// One `error[...]` line per diagnostic, each followed by its notes.
pub fn render_diagnostics(path: &str, diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|diagnostic| render_diagnostic(path, diagnostic))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_diagnostic(path: &str, diagnostic: &Diagnostic) -> String {
    let Position { line, column } = diagnostic.span.start;
    let mut lines = vec![format!(
        "error[{}] {path}:{line}:{column} {}",
        diagnostic.code, diagnostic.message
    )];
    lines.extend(diagnostic.labels.iter().map(|label| {
        let Position { line, column } = label.span.start;
        format!("  note: {} at {path}:{line}:{column}", label.message)
    }));
    lines.join("\n")
}

/// Zero-based position in editor-protocol coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditorPosition {
    pub line: usize,
    pub character: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditorRange {
    pub start: EditorPosition,
    pub end: EditorPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorDiagnostic {
    pub severity: u8,
    pub message: String,
    pub range: EditorRange,
    pub source: String,
}

const EDITOR_SEVERITY_ERROR: u8 = 1;

fn editor_position(pos: &Position) -> EditorPosition {
    EditorPosition {
        line: pos.line.saturating_sub(1),
        character: pos.column.saturating_sub(1),
    }
}

pub fn to_editor_diagnostic(diagnostic: &Diagnostic, source: &str) -> EditorDiagnostic {
    EditorDiagnostic {
        severity: EDITOR_SEVERITY_ERROR,
        message: diagnostic.message.clone(),
        range: EditorRange {
            start: editor_position(&diagnostic.span.start),
            end: editor_position(&diagnostic.span.end),
        },
        source: source.to_string(),
    }
}
