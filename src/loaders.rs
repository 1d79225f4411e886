//! Resource loading utilities
//!
//! This module reads schema documents (and values to validate) from files or
//! in-memory text. Remote documents are never fetched.

use crate::error::{Error, Result};
use crate::limits::Limits;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a JSON document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Local file
    Path(PathBuf),
    /// Remote location
    Url(String),
    /// In-memory text
    Text(String),
}

impl Source {
    /// Classify a command-line style reference as a URL or a path
    pub fn from_reference(reference: &str) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            Source::Url(reference.to_string())
        } else {
            Source::Path(PathBuf::from(reference))
        }
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

/// Resource loader for schema documents
#[derive(Debug, Clone)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
    /// Whether remote references are accepted at all
    allow_remote: bool,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
            allow_remote: false,
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set whether remote references are accepted
    pub fn with_allow_remote(mut self, allow: bool) -> Self {
        self.allow_remote = allow;
        self
    }

    /// Load a resource as a string
    pub fn load(&self, source: &Source) -> Result<String> {
        match source {
            Source::Path(path) => {
                let size = fs::metadata(path)
                    .map_err(|e| {
                        Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
                    })?
                    .len();
                self.limits
                    .check_document_size(usize::try_from(size).unwrap_or(usize::MAX))?;

                fs::read_to_string(path).map_err(|e| {
                    Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
                })
            }
            Source::Url(url) => {
                if !self.allow_remote {
                    return Err(Error::Resource(format!(
                        "Remote resources are not allowed: {}",
                        url
                    )));
                }
                Err(Error::Resource(format!(
                    "Remote schema resolution is not supported: {}",
                    url
                )))
            }
            Source::Text(text) => {
                self.limits.check_document_size(text.len())?;
                Ok(text.clone())
            }
        }
    }

    /// Load and parse a JSON document
    pub fn load_document(&self, source: &Source) -> Result<Value> {
        let text = self.load(source)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Load and parse a JSON document from a file
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Value> {
        self.load_document(&Source::from(path.as_ref()))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"type": "string"}}"#).unwrap();

        let loader = Loader::new();
        let document = loader.load_path(file.path()).unwrap();

        assert_eq!(document, json!({"type": "string"}));
    }

    #[test]
    fn test_load_from_text() {
        let source = Source::Text(r#"{"type": "null"}"#.to_string());
        let loader = Loader::new();

        assert_eq!(loader.load(&source).unwrap(), r#"{"type": "null"}"#);
        assert_eq!(loader.load_document(&source).unwrap(), json!({"type": "null"}));
    }

    #[test]
    fn test_missing_file() {
        let result = Loader::new().load_path("/nonexistent/schema.json");
        assert!(matches!(result, Err(Error::Resource(_))));
    }

    #[test]
    fn test_invalid_json() {
        let source = Source::Text("{not json".to_string());
        assert!(matches!(Loader::new().load_document(&source), Err(Error::Json(_))));
    }

    #[test]
    fn test_remote_rejected() {
        let source = Source::from_reference("https://example.com/schema.json");
        assert!(matches!(source, Source::Url(_)));
        assert!(Loader::new().load(&source).is_err());
        assert!(Loader::new().with_allow_remote(true).load(&source).is_err());
    }

    #[test]
    fn test_size_limit() {
        let mut file = NamedTempFile::new().unwrap();
        let large_content = "x".repeat(2 * 1024 * 1024); // 2 MB
        write!(file, "{}", large_content).unwrap();

        let loader = Loader::new().with_limits(Limits::strict());
        let result = loader.load(&Source::from(file.path()));

        assert!(matches!(result, Err(Error::LimitExceeded(_))));
    }
}
