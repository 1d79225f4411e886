//! Error types for schemacast
//!
//! This module defines the errors returned by schema construction and by the
//! `parse` convenience entry point. Ordinary validation never returns an
//! error: it yields a [`ValidationResult`](crate::validators::ValidationResult).

use crate::validators::exceptions::Failure;
use std::fmt;
use thiserror::Error;

/// Result type alias using schemacast Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for schemacast operations
#[derive(Error, Debug)]
pub enum Error {
    /// A value was rejected by `parse`
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Malformed schema document
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Unknown or unrecognized schema type
    #[error("type error: {0}")]
    Type(String),

    /// Invalid construction parameter (bounds, patterns, lists)
    #[error("value error: {0}")]
    Value(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON syntax error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// A value failed validation inside `parse`
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Error message
    pub message: String,
    /// Structured failure produced by the validator
    pub failure: Failure,
}

impl ValidationError {
    /// Wrap a structured failure
    pub fn new(failure: Failure) -> Self {
        Self {
            message: format!("value failed '{}' constraint", failure.kind),
            failure,
        }
    }

    /// Override the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// JSON Pointer of the rejected value
    pub fn path(&self) -> &str {
        &self.failure.path
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if !self.failure.message.is_empty() {
            write!(f, "\n\nReason: {}", self.failure.message)?;
        }

        write!(f, "\n\nPath: {}", display_path(&self.failure.path))?;

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        Error::Validation(ValidationError::new(failure))
    }
}

/// Schema document building error
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Error message
    pub message: String,
    /// JSON Pointer of the offending node inside the schema document
    pub location: Option<String>,
    /// Keyword that caused the error
    pub keyword: Option<String>,
}

impl SchemaError {
    /// Create a new schema error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            keyword: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the keyword
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref keyword) = self.keyword {
            write!(f, "\n\nKeyword: {}", keyword)?;
        }

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", display_path(loc))?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaError {}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}
