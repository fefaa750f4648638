//! Dotted path expressions.
//!
//! A path is a non-empty sequence of non-empty segments. Each segment is a
//! map key or, when the container it is applied to is a sequence, a decimal
//! index. Paths typed by users are parsed from `a.b.c` text; paths built by
//! the crate itself are assembled from typed segments so names containing
//! the delimiter stay a single segment.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StoreError};

/// Separator between segments in textual paths.
pub const DELIMITER: char = '.';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpr {
    segments: Vec<String>,
}

impl PathExpr {
    /// Parse `a.b.c` into its segments.
    pub fn parse(text: &str) -> Result<Self> {
        let segments: Vec<String> = text.split(DELIMITER).map(str::to_owned).collect();
        if text.is_empty() || segments.iter().any(String::is_empty) {
            return Err(StoreError::MalformedPath(text.to_string()));
        }
        Ok(Self { segments })
    }

    /// Build a path from already-split segments. Segments may contain the
    /// delimiter; they are never re-split.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(StoreError::MalformedPath(segments.join(".")));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Final segment (the key or index the path points at).
    pub fn last(&self) -> &str {
        // Non-empty by construction.
        &self.segments[self.segments.len() - 1]
    }

    /// All segments except the last.
    pub fn parent_segments(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// New path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self> {
        let segment = segment.into();
        if segment.is_empty() {
            return Err(StoreError::MalformedPath(format!("{self}.")));
        }
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Self { segments })
    }

    /// Textual form of the first `n` segments, for error messages.
    pub(crate) fn prefix_display(&self, n: usize) -> String {
        self.segments[..n.min(self.segments.len())].join(".")
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for PathExpr {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_dots() {
        let path = PathExpr::parse("http.routers.api").unwrap();
        assert_eq!(path.segments(), &["http", "routers", "api"]);
        assert_eq!(path.last(), "api");
        assert_eq!(path.parent_segments(), &["http", "routers"]);
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for bad in ["", ".", "a.", ".a", "a..b"] {
            assert!(
                matches!(PathExpr::parse(bad), Err(StoreError::MalformedPath(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_segments_keeps_delimiter_inside_segment() {
        let path = PathExpr::from_segments(["http", "routers", "v1.api"]).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), "v1.api");
        assert_ne!(path, PathExpr::parse("http.routers.v1.api").unwrap());
    }

    #[test]
    fn test_from_segments_rejects_empty() {
        assert!(PathExpr::from_segments(Vec::<String>::new()).is_err());
        assert!(PathExpr::from_segments(["http", ""]).is_err());
    }

    #[test]
    fn test_child_and_display() {
        let path = PathExpr::parse("http.services").unwrap().child("api-svc").unwrap();
        assert_eq!(path.to_string(), "http.services.api-svc");
        assert!(path.child("").is_err());
    }
}
