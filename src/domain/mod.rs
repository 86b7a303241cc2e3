//! Domain layer - Directives, line selection and diagnostics

pub mod context;
pub mod diagnostic;
pub mod directive;
pub mod selectors;

pub use context::IncludeContext;
pub use diagnostic::{CollectedDiagnostics, Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use directive::{Directive, DirectiveLine, SourceLocation};
pub use selectors::{LineRangeSelector, LinesSelector, SelectAll, TagRegionSelector};
