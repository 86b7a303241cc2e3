//! Select lines of a single file without expanding includes

use crate::domain::selectors::tags::parse_tags;
use crate::domain::selectors::{select_lines, LineRangeSelector, LinesSelector, SelectAll};
use crate::domain::{Diagnostic, DiagnosticKind, Diagnostics, TagRegionSelector};
use crate::error::{IncludeError, Result};
use crate::infrastructure::{ContentLoader, Location};
use std::collections::HashMap;
use std::path::Path;

/// How to pick lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Lines(String),
    Tag(String),
    Tags(String),
    All,
}

/// Lines picked from a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedLines {
    pub lines: Vec<String>,
    pub first_lineno: Option<usize>,
}

pub struct SelectLinesService<'a> {
    loader: &'a dyn ContentLoader,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> SelectLinesService<'a> {
    pub fn new(loader: &'a dyn ContentLoader, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            loader,
            diagnostics,
        }
    }

    /// Apply `selection` to the file at `path`.
    ///
    /// Tags that never occur in the file are reported as warnings, located at
    /// the last line.
    pub fn execute(&self, path: &Path, selection: &Selection) -> Result<SelectedLines> {
        if !path.is_file() {
            return Err(IncludeError::DocumentNotFound(path.to_path_buf()));
        }
        let lines = self
            .loader
            .read_lines(&Location::File(path.to_path_buf()))?;
        let target = path.display().to_string();

        let selected = match selection {
            Selection::Lines(def) => run(&mut LineRangeSelector::new(def), &lines),
            Selection::All => run(&mut SelectAll, &lines),
            Selection::Tag(def) => self.select_tags(&target, parse_tags(def, true), &lines),
            Selection::Tags(def) => self.select_tags(&target, parse_tags(def, false), &lines),
        };

        Ok(selected)
    }

    fn select_tags(
        &self,
        target: &str,
        flags: HashMap<String, bool>,
        lines: &[String],
    ) -> SelectedLines {
        let mut selector = TagRegionSelector::new(target, flags, self.diagnostics);
        let selected = run(&mut selector, lines);
        for tag in selector.unused_tags() {
            self.diagnostics.report(Diagnostic::warning(
                DiagnosticKind::UnusedTag,
                target,
                lines.len(),
                format!("tag '{}' not found in {}", tag, target),
            ));
        }
        selected
    }
}

fn run<S: LinesSelector>(selector: &mut S, lines: &[String]) -> SelectedLines {
    let lines = select_lines(selector, lines);
    SelectedLines {
        lines,
        first_lineno: selector.first_included_lineno(),
    }
}
