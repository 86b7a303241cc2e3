//! Error types for include-ext

use crate::domain::{Diagnostic, DiagnosticKind};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for include-ext
#[derive(Debug, Error)]
pub enum IncludeError {
    /// An include that could not be resolved, raised in strict mode
    #[error("Unresolved include: {0}")]
    Unresolved(Diagnostic),

    #[error("Failed to read include file: {location}: {source:#}")]
    Read {
        location: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid include directive: {0}")]
    InvalidDirective(String),

    #[error("Document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl IncludeError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            IncludeError::DocumentNotFound(_) => 2,
            IncludeError::Unresolved(diagnostic) => match diagnostic.kind {
                DiagnosticKind::TargetNotFound => 3,
                DiagnosticKind::DepthExceeded => 4,
                DiagnosticKind::ReadFailure => 5,
                DiagnosticKind::PolicyRejected => 6,
                _ => 1,
            },
            IncludeError::Read { .. } => 5,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            IncludeError::DocumentNotFound(path) => {
                format!(
                    "Document not found: {}\n\n\
                    Suggestions:\n\
                    • Check the path of the document to expand\n\
                    • Paths are resolved relative to the current directory",
                    path.display()
                )
            }
            IncludeError::Unresolved(diagnostic) => match diagnostic.kind {
                DiagnosticKind::TargetNotFound => format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Include targets are resolved relative to the including file\n\
                    • Mark the include as optional: [opts=optional]",
                    self
                ),
                DiagnosticKind::PolicyRejected => format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Lower the safe mode (e.g., --safe-mode safe)\n\
                    • Set --allow-uri-read to include remote targets",
                    self
                ),
                DiagnosticKind::DepthExceeded => format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check for a file that includes itself\n\
                    • Raise the limit with --max-include-depth",
                    self
                ),
                _ => self.to_string(),
            },
            IncludeError::Config(msg) => {
                if msg.contains("Invalid safe mode") {
                    format!(
                        "{}\n\n\
                        Valid safe modes: unsafe, safe, server, secure\n\
                        Example: include-ext expand doc.adoc --safe-mode safe",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using IncludeError
pub type Result<T> = std::result::Result<T, IncludeError>;
