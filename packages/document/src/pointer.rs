//! # Path Addressing
//!
//! Converts between [`NodePath`] segment lists and escaped pointer strings
//! (`/info/title`, `/paths/~1pets~1{id}`).
//!
//! Escaping follows RFC 6901: `~` is written as `~0` and `/` as `~1`.
//! Decoding scans each segment left to right so that `~01` yields `~1`
//! and never `/`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a node inside a document, as an ordered list of segments.
///
/// Sequence indices are stored in their decimal string form. The empty
/// path addresses the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Path extended by one segment
    pub fn child(&self, segment: impl ToString) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }

    pub fn push(&mut self, segment: impl ToString) {
        self.segments.push(segment.to_string());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Parent path, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when `self` equals `other` or lies underneath it
    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.segments.len() >= other.segments.len()
            && self.segments[..other.segments.len()] == other.segments[..]
    }

    pub fn to_pointer(&self) -> String {
        path_to_pointer(self)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&path_to_pointer(self))
    }
}

impl From<Vec<String>> for NodePath {
    fn from(segments: Vec<String>) -> Self {
        Self { segments }
    }
}

impl From<Vec<&str>> for NodePath {
    fn from(segments: Vec<&str>) -> Self {
        segments.into_iter().collect()
    }
}

impl From<&[&str]> for NodePath {
    fn from(segments: &[&str]) -> Self {
        segments.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for NodePath {
    fn from(segments: [&str; N]) -> Self {
        segments.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for NodePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Render a path as an escaped pointer string
pub fn path_to_pointer(path: &NodePath) -> String {
    let mut pointer = String::new();
    for segment in &path.segments {
        pointer.push('/');
        for ch in segment.chars() {
            match ch {
                '~' => pointer.push_str("~0"),
                '/' => pointer.push_str("~1"),
                _ => pointer.push(ch),
            }
        }
    }
    pointer
}

/// Parse an escaped pointer string back into a path
///
/// Total: unknown escapes are kept as written and a missing leading `/`
/// is tolerated.
pub fn pointer_to_path(pointer: &str) -> NodePath {
    if pointer.is_empty() {
        return NodePath::root();
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    body.split('/').map(unescape_segment).collect()
}

fn unescape_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '~' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some('0') => {
                chars.next();
                out.push('~');
            }
            Some('1') => {
                chars.next();
                out.push('/');
            }
            _ => out.push('~'),
        }
    }
    out
}
