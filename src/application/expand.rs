//! Document expansion use case
//!
//! Scans a document line by line, hands every include directive to the
//! [`IncludeProcessor`] and splices the outcome in its place. Included content
//! is scanned the same way, one level deeper, so nested includes resolve
//! against the directory of the file that contains them.

use crate::application::include::{IncludeOutcome, IncludeProcessor};
use crate::domain::{Diagnostics, Directive, DirectiveLine, IncludeContext, SourceLocation};
use crate::error::{IncludeError, Result};
use crate::infrastructure::loader::split_lines;
use crate::infrastructure::resolver::normalize;
use crate::infrastructure::{Config, ContentLoader};
use std::fs;
use std::path::Path;
use tracing::debug;

pub struct DocumentExpander<'a> {
    config: Config,
    loader: &'a dyn ContentLoader,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> DocumentExpander<'a> {
    pub fn new(
        config: Config,
        loader: &'a dyn ContentLoader,
        diagnostics: &'a dyn Diagnostics,
    ) -> Self {
        Self {
            config,
            loader,
            diagnostics,
        }
    }

    /// Expand the document at `path`.
    ///
    /// Without a configured `base_dir`, the directory of the document is used
    /// as the jail for local includes. A relative `base_dir` is resolved
    /// against the current directory.
    ///
    /// # Errors
    ///
    /// Fails only when the document itself cannot be read. Problems with
    /// include directives end up in the diagnostics sink.
    pub fn expand_file(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(IncludeError::DocumentNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;

        let cwd = std::env::current_dir()?;
        let absolute = normalize(&cwd.join(path));
        let dir = absolute.parent().unwrap_or(Path::new("/")).to_path_buf();

        // a relative base_dir is taken from the working directory
        let mut config = self.config.clone();
        config.base_dir = Some(match config.base_dir.take() {
            Some(base_dir) => normalize(&cwd.join(base_dir)),
            None => dir.clone(),
        });

        let context = IncludeContext::root(path.display().to_string(), dir);
        Ok(self.expand_with(&config, &content, &context))
    }

    /// Expand `text` as if it were the document described by `context`.
    pub fn expand_str(&self, text: &str, context: &IncludeContext) -> String {
        self.expand_with(&self.config, text, context)
    }

    fn expand_with(&self, config: &Config, text: &str, context: &IncludeContext) -> String {
        let processor = IncludeProcessor::new(config, self.loader, self.diagnostics);
        let mut output = Vec::new();
        expand_lines(&processor, &split_lines(text), context, 1, &mut output);
        output.join("\n")
    }
}

fn expand_lines(
    processor: &IncludeProcessor<'_>,
    lines: &[String],
    context: &IncludeContext,
    first_lineno: usize,
    output: &mut Vec<String>,
) {
    for (idx, line) in lines.iter().enumerate() {
        let location = SourceLocation::new(context.path.as_str(), first_lineno + idx);

        let directive = match Directive::match_line(line, location) {
            None => {
                output.push(line.clone());
                continue;
            }
            Some(DirectiveLine::Escaped(unescaped)) => {
                output.push(unescaped);
                continue;
            }
            Some(DirectiveLine::Include(directive)) => directive,
        };

        match processor.process(&directive, context) {
            IncludeOutcome::Content(content) => {
                debug!(
                    location = %content.location,
                    lines = content.lines.len(),
                    depth = context.depth + 1,
                    "splicing include"
                );
                // remote content resolves against the including document
                let dir = content.location.dir().unwrap_or(context.dir.as_path());
                let nested = context.nested(content.location.to_string(), dir);
                expand_lines(processor, &content.lines, &nested, content.first_lineno, output);
            }
            other => output.extend(other.into_lines()),
        }
    }
}
