//! Instance locations
//!
//! A failure reports where in the validated value it happened as an
//! RFC 6901 JSON Pointer (`""` is the root, `/tags/0` the first tag).

use std::fmt;

/// One step into a value: a mapping key or a sequence index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Key of a keyed mapping
    Key(String),
    /// Index of a sequence
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", escape(key)),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Location of a value inside the validated input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstancePath {
    segments: Vec<PathSegment>,
}

impl InstancePath {
    /// The root of the validated value
    pub fn root() -> Self {
        Self::default()
    }

    /// Location of a property of the value at `self`
    pub fn key(&self, key: &str) -> Self {
        self.push(PathSegment::Key(key.to_string()))
    }

    /// Location of an item of the sequence at `self`
    pub fn index(&self, index: usize) -> Self {
        self.push(PathSegment::Index(index))
    }

    fn push(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Path segments from the root
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Nesting depth (0 for the root)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is the root location
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render as a JSON Pointer
    pub fn to_pointer(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Escape a key for use as a JSON Pointer reference token
pub fn escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_pointer() {
        let root = InstancePath::root();
        assert!(root.is_root());
        assert_eq!(root.to_pointer(), "");
    }

    #[test]
    fn test_nested_pointer() {
        let path = InstancePath::root().key("tags").index(2);
        assert_eq!(path.to_pointer(), "/tags/2");
        assert_eq!(path.depth(), 2);
        assert_eq!(path.segments()[1], PathSegment::Index(2));
    }

    #[test]
    fn test_escaped_pointer_resolves() {
        let value = json!({"a/b": {"m~n": 7}});
        let path = InstancePath::root().key("a/b").key("m~n");
        assert_eq!(path.to_pointer(), "/a~1b/m~0n");
        assert_eq!(value.pointer(&path.to_pointer()), Some(&json!(7)));
    }
}
