// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::PathSegment;
use std::fmt;

/// Describes a series of steps across a tree or DAG of Ipld,
/// where each segment in the path is a map key or list index.
/// Path is used in describing progress in a traversal; and can
/// also be used as an instruction for traversing from one Ipld node to another.
///
/// Leading and trailing `/` characters are removed and runs of `/` collapse
/// to a single separator, so parsing a path and printing it back yields the
/// canonical form.
///
/// # Examples
///
/// ```
/// # use cask_ipld::Path;
/// let mut path: Path = "some/path/1".into();
///
/// // Can append segments to the path
/// path.push(2.into());
/// assert_eq!(path.to_string(), "some/path/1/2");
///
/// // Or combine paths
/// path.extend(&"other/path".into());
/// assert_eq!(path.to_string(), "some/path/1/2/other/path");
/// ```
#[derive(Debug, PartialEq, Default, Clone)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Extend `Path` with another `Path` by cloning and appending `PathSegment`s to `segments`.
    pub fn extend(&mut self, other: &Path) {
        self.segments.extend_from_slice(&other.segments)
    }

    /// Returns slice of `PathSegment`s of the `Path`.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Pushes a `PathSegment` to the end of the `Path`.
    pub fn push(&mut self, seg: PathSegment) {
        self.segments.push(seg)
    }

    /// Pops a `PathSegment` from the end of the path.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        let segments: Vec<PathSegment> = s
            .split('/')
            .filter(|s| !s.is_empty())
            .map(PathSegment::from)
            .collect();
        Self { segments }
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.segments.is_empty() {
            return Ok(());
        }

        write!(f, "{}", self.segments[0])?;
        for v in &self.segments[1..] {
            write!(f, "/{v}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PathSegment::*;

    #[test]
    fn path_with_extra_delimiters() {
        let path: Path = "/12/some///1/5.5/".into();
        assert_eq!(
            path.segments,
            vec![
                Int(12),
                String("some".to_owned()),
                Int(1),
                String("5.5".to_owned())
            ]
        );
        assert_eq!(path.to_string(), "12/some/1/5.5")
    }

    #[test]
    fn empty_path() {
        let path: Path = "".into();
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn canonical_round_trip() {
        let path: Path = "a//b/c/".into();
        let reparsed: Path = path.to_string().as_str().into();
        assert_eq!(path, reparsed);
    }
}
