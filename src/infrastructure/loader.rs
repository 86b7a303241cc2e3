//! Content loading for resolved include targets

use crate::error::{IncludeError, Result};
use crate::infrastructure::resolver::Location;
use anyhow::{anyhow, Context};
use reqwest::blocking::Client;
use std::fs;

/// Reads the content of a [`Location`] as lines.
///
/// Implementations do no caching and no retries.
pub trait ContentLoader {
    fn read_lines(&self, location: &Location) -> Result<Vec<String>>;
}

/// Reads files from disk and URIs over HTTP(S).
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLoader;

impl DefaultLoader {
    pub fn new() -> Self {
        DefaultLoader
    }

    fn read_to_string(&self, location: &Location) -> anyhow::Result<String> {
        match location {
            Location::File(path) => {
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
            }
            Location::Uri(uri) => fetch(uri),
        }
    }
}

impl ContentLoader for DefaultLoader {
    fn read_lines(&self, location: &Location) -> Result<Vec<String>> {
        self.read_to_string(location)
            .map(|content| split_lines(&content))
            .map_err(|source| IncludeError::Read {
                location: location.to_string(),
                source,
            })
    }
}

fn fetch(uri: &str) -> anyhow::Result<String> {
    let client = Client::builder()
        .user_agent(concat!("include-ext/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")?;

    let response = client
        .get(uri)
        .send()
        .with_context(|| format!("GET {}", uri))?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("GET {} returned {}", uri, status));
    }

    response
        .text()
        .with_context(|| format!("reading response body of {}", uri))
}

/// Split content into lines, dropping a leading BOM and trailing whitespace.
pub fn split_lines(content: &str) -> Vec<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\r\nb  \n\nc\n"), vec!["a", "b", "", "c"]);
        assert_eq!(split_lines("\u{feff}first\nsecond"), vec!["first", "second"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_read_file_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.adoc");
        fs::write(&path, "one\ntwo\n").unwrap();

        let lines = DefaultLoader::new()
            .read_lines(&Location::File(path))
            .unwrap();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let location = Location::File(PathBuf::from("/definitely/not/here.adoc"));
        let err = DefaultLoader::new().read_lines(&location).unwrap_err();

        match err {
            IncludeError::Read { location, source } => {
                assert_eq!(location, "/definitely/not/here.adoc");
                assert!(format!("{:#}", source).contains("reading /definitely/not/here.adoc"));
            }
            other => panic!("Expected Read error, got {:?}", other),
        }
    }

    #[test]
    fn test_unreachable_uri_is_read_error() {
        let location = Location::Uri("http://127.0.0.1:1/a.adoc".to_string());
        let err = DefaultLoader::new().read_lines(&location).unwrap_err();
        assert!(matches!(err, IncludeError::Read { .. }));
        assert_eq!(err.exit_code(), 5);
    }
}
