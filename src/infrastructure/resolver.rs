//! Include target resolution
//!
//! Decides whether a target may be included and turns it into a concrete
//! [`Location`]: a URI, or a local file resolved against the directory of the
//! include currently being read.

use crate::domain::{Diagnostic, DiagnosticKind, Diagnostics, IncludeContext, SourceLocation};
use crate::infrastructure::Config;
use regex::Regex;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

fn uri_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\p{Alphabetic}[\p{Alphabetic}\p{Nd}.+-]+:/{0,2}").unwrap())
}

/// Whether `target` looks like a URI (`http://...`, `file:///...`).
///
/// The scheme needs at least two characters so `C:\doc.adoc` stays a path.
pub fn is_uri(target: &str) -> bool {
    target.contains(':') && uri_regex().is_match(target)
}

/// A resolved include target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Uri(String),
}

impl Location {
    /// Directory that includes found in this location resolve against
    pub fn dir(&self) -> Option<&Path> {
        match self {
            Location::File(path) => path.parent(),
            Location::Uri(_) => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Uri(uri) => f.write_str(uri),
        }
    }
}

pub struct TargetResolver<'a> {
    config: &'a Config,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> TargetResolver<'a> {
    pub fn new(config: &'a Config, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            config,
            diagnostics,
        }
    }

    /// Policy check: safe mode, depth limit and remote reads
    pub fn is_allowed(&self, target: &str) -> bool {
        if !self.config.includes_enabled() {
            return false;
        }
        !is_uri(target) || self.config.allow_uri_read
    }

    /// Resolve `target`; `None` when no regular file exists there.
    ///
    /// URIs are returned as-is, their existence is checked on read.
    pub fn resolve(
        &self,
        target: &str,
        context: &IncludeContext,
        source: &SourceLocation,
    ) -> Option<Location> {
        if is_uri(target) {
            return Some(Location::Uri(target.to_string()));
        }

        let joined = context.dir.join(target);
        let path = match self.config.jail() {
            Some(jail) => {
                let (path, escaped) = confine(&normalize(jail), &joined);
                if escaped {
                    self.diagnostics.report(Diagnostic::warning(
                        DiagnosticKind::OutsideJail,
                        source.path.as_str(),
                        source.lineno,
                        format!(
                            "include file path is outside of jail; recovering automatically: {}",
                            target
                        ),
                    ));
                }
                path
            }
            None => normalize(&joined),
        };

        path.is_file().then_some(Location::File(path))
    }
}

/// Lexically resolve `.` and `..` without touching the file system.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Rebuild `path` below `jail`, dropping any `..` that would leave it.
///
/// Returns the confined path and whether `path` tried to escape.
fn confine(jail: &Path, path: &Path) -> (PathBuf, bool) {
    let (rest, mut escaped): (Vec<Component>, bool) = match path.strip_prefix(jail) {
        Ok(rest) => (rest.components().collect(), false),
        Err(_) => (
            path.components()
                .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
                .collect(),
            true,
        ),
    };

    let mut out = jail.to_path_buf();
    let mut depth = 0usize;
    for component in rest {
        match component {
            Component::Normal(segment) => {
                out.push(segment);
                depth += 1;
            }
            Component::ParentDir if depth > 0 => {
                out.pop();
                depth -= 1;
            }
            Component::ParentDir => escaped = true,
            _ => {}
        }
    }

    (out, escaped)
}
