//! Limits and constraints for schema processing
//!
//! Validation recursion depth is bounded by schema nesting depth, so these
//! limits protect the builder (and therefore every later `validate` call)
//! against pathologically deep or large schema documents.

use crate::error::{Error, Result};

/// Global limits configuration
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum nesting depth of schema documents
    pub max_schema_depth: usize,

    /// Maximum number of validator nodes built from one document
    pub max_schema_nodes: usize,

    /// Maximum schema document size in bytes
    pub max_document_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_schema_depth: 128,
            max_schema_nodes: 100000,
            max_document_size: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_schema_depth: 32,
            max_schema_nodes: 10000,
            max_document_size: 1024 * 1024, // 1 MB
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_schema_depth: 1024,
            max_schema_nodes: 10000000,
            max_document_size: 512 * 1024 * 1024, // 512 MB
        }
    }

    /// Check if schema depth is within limits
    pub fn check_schema_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_schema_depth {
            Err(Error::LimitExceeded(format!(
                "Schema depth {} exceeds maximum {}",
                depth, self.max_schema_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if number of schema nodes is within limits
    pub fn check_schema_nodes(&self, count: usize) -> Result<()> {
        if count > self.max_schema_nodes {
            Err(Error::LimitExceeded(format!(
                "Schema node count {} exceeds maximum {}",
                count, self.max_schema_nodes
            )))
        } else {
            Ok(())
        }
    }

    /// Check if document size is within limits
    pub fn check_document_size(&self, size: usize) -> Result<()> {
        if size > self.max_document_size {
            Err(Error::LimitExceeded(format!(
                "Document size {} bytes exceeds maximum {} bytes",
                size, self.max_document_size
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_schema_depth, 128);
        assert!(limits.check_schema_depth(64).is_ok());
        assert!(limits.check_schema_depth(129).is_err());
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.max_schema_depth < Limits::default().max_schema_depth);
        assert!(limits.check_schema_depth(33).is_err());
    }

    #[test]
    fn test_permissive_limits() {
        let limits = Limits::permissive();
        assert!(limits.max_schema_depth > Limits::default().max_schema_depth);
        assert!(limits.check_schema_depth(500).is_ok());
    }

    #[test]
    fn test_check_document_size() {
        let limits = Limits::default();
        assert!(limits.check_document_size(1024).is_ok());
        assert!(limits.check_document_size(32 * 1024 * 1024).is_err());
    }

    #[test]
    fn test_check_schema_nodes() {
        let limits = Limits::strict();
        assert!(limits.check_schema_nodes(100).is_ok());
        assert!(matches!(
            limits.check_schema_nodes(20000),
            Err(Error::LimitExceeded(_))
        ));
    }
}
