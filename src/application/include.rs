//! Include directive processing
//!
//! Takes one directive through policy, depth, resolution, loading and line
//! selection, and tells the host what to put in its place.

use crate::domain::selectors::{select_lines, selector_for};
use crate::domain::{Diagnostic, DiagnosticKind, Diagnostics, Directive, IncludeContext};
use crate::error::IncludeError;
use crate::infrastructure::{Config, ContentLoader, Location, TargetResolver};
use tracing::debug;

/// Selected content to splice in place of a directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludedContent {
    pub lines: Vec<String>,
    pub location: Location,
    pub target: String,
    /// Line number the spliced block starts at, for nested includes
    pub first_lineno: usize,
}

/// What replaces an include directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeOutcome {
    /// Not allowed to include: a passive link to the target
    Link(String),
    /// Failed to include: a visible marker
    Unresolved(String),
    /// Drop the directive line
    Skip,
    Content(IncludedContent),
}

impl IncludeOutcome {
    /// Lines replacing the directive line
    pub fn into_lines(self) -> Vec<String> {
        match self {
            IncludeOutcome::Link(line) | IncludeOutcome::Unresolved(line) => vec![line],
            IncludeOutcome::Skip => Vec::new(),
            IncludeOutcome::Content(content) => content.lines,
        }
    }
}

pub struct IncludeProcessor<'a> {
    config: &'a Config,
    loader: &'a dyn ContentLoader,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> IncludeProcessor<'a> {
    pub fn new(
        config: &'a Config,
        loader: &'a dyn ContentLoader,
        diagnostics: &'a dyn Diagnostics,
    ) -> Self {
        Self {
            config,
            loader,
            diagnostics,
        }
    }

    /// Process one directive found in `context`.
    ///
    /// Never fails: problems are reported to the diagnostics sink and turned
    /// into a link, an unresolved marker, or a skipped line.
    pub fn process(&self, directive: &Directive, context: &IncludeContext) -> IncludeOutcome {
        let target = directive.target.as_str();
        let resolver = TargetResolver::new(self.config, self.diagnostics);

        if !resolver.is_allowed(target) {
            self.error(
                directive,
                DiagnosticKind::PolicyRejected,
                format!("include not allowed, replaced with link: {}", target),
            );
            return IncludeOutcome::Link(format!("link:{}[]", target));
        }

        // includes_enabled() guarantees max_include_depth >= 1
        let max_depth = usize::try_from(self.config.max_include_depth).unwrap_or(usize::MAX);
        if context.depth >= max_depth {
            self.error(
                directive,
                DiagnosticKind::DepthExceeded,
                format!("maximum include depth of {} exceeded", max_depth),
            );
            return self.unresolved(directive, context);
        }

        let Some(location) = resolver.resolve(target, context, &directive.location) else {
            if directive.is_optional() {
                debug!(include_target = target, "optional include target not found, skipping");
                return IncludeOutcome::Skip;
            }
            self.error(
                directive,
                DiagnosticKind::TargetNotFound,
                format!("include target not found: {}", target),
            );
            return self.unresolved(directive, context);
        };

        let lines = match self.loader.read_lines(&location) {
            Ok(lines) => lines,
            Err(err) => {
                let message = match err {
                    IncludeError::Read { location, source } => {
                        format!("failed to read include file: {}: {:#}", location, source)
                    }
                    other => format!("failed to read include file: {}: {}", location, other),
                };
                self.error(directive, DiagnosticKind::ReadFailure, message);
                return self.unresolved(directive, context);
            }
        };

        let mut selector = selector_for(directive, self.diagnostics);
        let selected = select_lines(selector.as_mut(), &lines);
        if selected.is_empty() {
            debug!(include_target = target, "no lines selected");
            return IncludeOutcome::Skip;
        }

        IncludeOutcome::Content(IncludedContent {
            lines: selected,
            location,
            target: target.to_string(),
            first_lineno: selector.first_included_lineno().unwrap_or(1),
        })
    }

    fn error(&self, directive: &Directive, kind: DiagnosticKind, message: String) {
        self.diagnostics.report(Diagnostic::error(
            kind,
            directive.location.path.as_str(),
            directive.location.lineno,
            message,
        ));
    }

    fn unresolved(&self, directive: &Directive, context: &IncludeContext) -> IncludeOutcome {
        IncludeOutcome::Unresolved(format!(
            "Unresolved directive in {} - {}",
            context.path,
            directive.to_source()
        ))
    }
}
