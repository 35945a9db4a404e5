//! Diagnostic paths for locating failures in nested values.
//!
//! This module provides [`Path`] and [`PathSegment`]. A path is accumulated
//! while the matcher descends into a value and is only ever used to describe
//! where a failure happened; it plays no part in matching itself.

use std::fmt::{self, Display};

use crate::value::Value;

/// A segment of a diagnostic path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A mapping key (e.g. `name`, `42`)
    Key(Value),
    /// A rule that re-targets the value (`keys`, `values`, `keys_sorted`)
    Rule(&'static str),
    /// A positional element (`#3`)
    Index(usize),
    /// A union branch (`variant#1`)
    Variant(usize),
    /// The i-th key of a mapping (`key#0`)
    KeyAt(usize),
    /// The i-th value of a mapping (`value#0`)
    ValueAt(usize),
    /// The result of an accessor call (`method#size`)
    Method(String),
    /// A custom assertion (`assertion#0`)
    Assertion(usize),
    /// A tree selection expression (`./item`)
    Select(String),
}

impl PathSegment {
    /// Creates a new key segment.
    pub fn key(key: impl Into<Value>) -> Self {
        PathSegment::Key(key.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(Value::Str(s)) | PathSegment::Key(Value::Symbol(s)) => {
                write!(f, "{}", s)
            }
            PathSegment::Key(other) => write!(f, "{}", other),
            PathSegment::Rule(name) => write!(f, "{}", name),
            PathSegment::Index(i) => write!(f, "#{}", i),
            PathSegment::Variant(i) => write!(f, "variant#{}", i),
            PathSegment::KeyAt(i) => write!(f, "key#{}", i),
            PathSegment::ValueAt(i) => write!(f, "value#{}", i),
            PathSegment::Method(name) => write!(f, "method#{}", name),
            PathSegment::Assertion(i) => write!(f, "assertion#{}", i),
            PathSegment::Select(expr) => write!(f, "{}", expr),
        }
    }
}

/// A location inside a nested value.
///
/// `Path` is immutable: every `push_*` method returns a new path and leaves
/// the original untouched, so sibling branches can share a common prefix.
///
/// # Example
///
/// ```rust
/// use conform::Path;
///
/// let path = Path::root()
///     .push_key("users")
///     .push_index(0)
///     .push_variant(1);
///
/// assert_eq!(path.to_string(), "[users, #0, variant#1]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path with the given segment appended.
    pub fn push(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Returns a new path with a key segment appended.
    pub fn push_key(&self, key: impl Into<Value>) -> Self {
        self.push(PathSegment::Key(key.into()))
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        self.push(PathSegment::Index(index))
    }

    /// Returns a new path with a union branch segment appended.
    pub fn push_variant(&self, index: usize) -> Self {
        self.push(PathSegment::Variant(index))
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the parent path, or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", segment)?;
        }
        write!(f, "]")
    }
}
