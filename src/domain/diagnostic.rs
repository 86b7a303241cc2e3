//! Diagnostics reported while processing include directives
//!
//! Selectors and the include controller never fail a conversion. Problems are
//! reported through a [`Diagnostics`] sink handed to them at construction and
//! processing continues.

use std::cell::RefCell;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Target rejected by the safe mode or the remote read policy
    PolicyRejected,
    DepthExceeded,
    TargetNotFound,
    ReadFailure,
    /// End marker closing a configured region that is not the active one
    MismatchedEndTag,
    /// End marker for a configured region that was never opened
    UnexpectedEndTag,
    /// Local path pointed outside the base directory and was clamped into it
    OutsideJail,
    /// Configured tag that never occurs in the selected file
    UnusedTag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Document (or include target) the problem was found in
    pub path: String,
    /// 1-based line number within `path`
    pub lineno: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn error(
        kind: DiagnosticKind,
        path: impl Into<String>,
        lineno: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            path: path.into(),
            lineno,
            message: message.into(),
        }
    }

    pub fn warning(
        kind: DiagnosticKind,
        path: impl Into<String>,
        lineno: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            path: path.into(),
            lineno,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: line {}: {}", self.path, self.lineno, self.message)
    }
}

/// Sink for diagnostics
pub trait Diagnostics {
    fn report(&self, diagnostic: Diagnostic);
}

/// Keeps every reported diagnostic in memory, in report order.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    entries: RefCell<Vec<Diagnostic>>,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Diagnostics of the given kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<Diagnostic> {
        self.entries
            .borrow()
            .iter()
            .filter(|d| d.kind == kind)
            .cloned()
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.first_error().is_some()
    }

    pub fn first_error(&self) -> Option<Diagnostic> {
        self.entries
            .borrow()
            .iter()
            .find(|d| d.severity == Severity::Error)
            .cloned()
    }

    /// Report everything collected so far to `sink`, in order.
    pub fn replay(&self, sink: &dyn Diagnostics) {
        for diagnostic in self.entries.borrow().iter() {
            sink.report(diagnostic.clone());
        }
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.borrow_mut().push(diagnostic);
    }
}
