//! Host state visible to a single include directive

use std::path::{Path, PathBuf};

/// Where the directive being processed lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeContext {
    /// Path of the active document or include, as shown in messages
    pub path: String,
    /// Directory that relative targets resolve against
    pub dir: PathBuf,
    /// Includes currently open around this directive, 0 in the root document
    pub depth: usize,
}

impl IncludeContext {
    /// Context of a root document
    pub fn root(path: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dir: dir.into(),
            depth: 0,
        }
    }

    /// Context for the content of an include found in this one
    pub fn nested(&self, path: impl Into<String>, dir: &Path) -> Self {
        Self {
            path: path.into(),
            dir: dir.to_path_buf(),
            depth: self.depth + 1,
        }
    }
}
