//! Structured paths addressing positions in the cleaned model tree.
//!
//! A path is a sequence of segments, each a field name with an optional list
//! index. Paths are built segment-by-segment rather than by splitting strings,
//! so field names containing `.` or `[` cannot be misread.

use std::fmt;

/// One step of a [`Path`]: a field name, plus a list index if the step
/// addresses an element of a repeated field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    /// The document-facing field name
    pub name: String,

    /// The list index, if this segment addresses a list element
    pub index: Option<usize>,
}
impl PathSegment {
    /// Creates a segment with no index.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    /// Creates a segment addressing the element at `index`.
    #[must_use]
    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }
}
impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(index) = self.index {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

/// Address of a position in the nested model tree, such as `sub.items[0].id`.
///
/// An empty path addresses the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}
impl Path {
    /// Creates an empty path, addressing the document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a single-segment path for a top-level field.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::new(name)],
        }
    }

    /// Returns a new path with `name` appended as an unindexed segment.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::new(name));
        Self { segments }
    }

    /// Returns a new path with `name[index]` appended.
    #[must_use]
    pub fn child_indexed(&self, name: impl Into<String>, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::indexed(name, index));
        Self { segments }
    }

    /// True if the path has no segments.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The number of segments in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True if the path has no segments. Alias of [`Path::is_root`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segments making up the path.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Sets the index of the segment at `position`.
    pub(crate) fn set_index(&mut self, position: usize, index: usize) {
        if let Some(segment) = self.segments.get_mut(position) {
            segment.index = Some(index);
        }
    }

    /// True if this path begins with every segment of `prefix`, except that the
    /// final prefix segment matches by name alone when `prefix` carries no
    /// index there.
    ///
    /// Used when a field is rewritten from a single mapping into a one-element
    /// list: every buffered attribute path under it must gain the new index.
    #[must_use]
    pub fn starts_with_unindexed(&self, prefix: &Path) -> bool {
        if prefix.is_root() || self.segments.len() < prefix.segments.len() {
            return false;
        }

        let Some((last, front)) = prefix.segments.split_last() else {
            return false;
        };
        if self.segments[..front.len()] != *front {
            return false;
        }

        let candidate = &self.segments[front.len()];
        candidate.name == last.name && candidate.index.is_none()
    }
}
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
impl FromIterator<PathSegment> for Path {
    fn from_iter<T: IntoIterator<Item = PathSegment>>(iter: T) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}
