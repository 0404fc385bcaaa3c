//! Field paths inside banner documents
//!
//! Provides [`FieldPath`] for addressing nested fields such as
//! `branding.footerLink.floatingStyle`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Dotted path to a field in a banner document
///
/// # Examples
/// - `["compliance"]` → `compliance`
/// - `["branding", "footerLink", "style"]` → `branding.footerLink.style`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Document root
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path with a single top-level key
    #[inline]
    #[must_use]
    pub fn single(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Parent path (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Whether this path is a prefix of (or equal to) another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// RFC 6901 JSON pointer for use with [`serde_json::Value::pointer`]
    #[must_use]
    pub fn to_pointer(&self) -> String {
        self.0.iter().fold(String::new(), |mut acc, seg| {
            acc.push('/');
            acc.push_str(&seg.replace('~', "~0").replace('/', "~1"));
            acc
        })
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let segments = s
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment)
                } else if seg.contains(|c: char| !c.is_alphanumeric() && c != '_' && c != '-') {
                    Err(PathError::InvalidSegment(seg.to_string()))
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

impl From<&[&str]> for FieldPath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

/// Errors related to field paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Invalid segment characters
    #[error("invalid segment: {0}")]
    InvalidSegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_and_parent() {
        let path = FieldPath::single("branding").child("footerLink");
        assert_eq!(path.segments(), &["branding", "footerLink"]);
        assert_eq!(path.parent(), Some(FieldPath::single("branding")));
        assert!(FieldPath::root().parent().is_none());
        assert_eq!(path.last(), Some("footerLink"));
    }

    #[test]
    fn display_and_parse() {
        let path: FieldPath = "branding.footerLink.floatingStyle".parse().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_string(), "branding.footerLink.floatingStyle");
    }

    #[test]
    fn parse_errors() {
        assert!(matches!("a..b".parse::<FieldPath>(), Err(PathError::EmptySegment)));
        assert!(matches!(
            "a.b/c".parse::<FieldPath>(),
            Err(PathError::InvalidSegment(_))
        ));
        assert!("".parse::<FieldPath>().unwrap().is_empty());
    }

    #[test]
    fn prefix() {
        let a: FieldPath = "scripts".parse().unwrap();
        let b: FieldPath = "scripts.functionality".parse().unwrap();
        assert!(a.is_prefix_of(&b));
        assert!(a.is_prefix_of(&a));
        assert!(!b.is_prefix_of(&a));
    }

    #[test]
    fn pointer_escapes() {
        let path = FieldPath::from(&["advanced", "a/b", "c~d"][..]);
        assert_eq!(path.to_pointer(), "/advanced/a~1b/c~0d");
        assert_eq!(FieldPath::root().to_pointer(), "");
    }
}
