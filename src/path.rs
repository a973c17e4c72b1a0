// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Split record keys into namespace segments.
// Author: Lukas Bower

use crate::tree::TreeError;

/// Default separator between namespace segments.
pub const DEFAULT_SEPARATOR: char = '.';

/// A key split into an ordered, non-empty list of segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath<'a> {
    segments: Vec<&'a str>,
    separator: char,
}

impl<'a> KeyPath<'a> {
    /// Split `key` on `separator`.
    ///
    /// An empty key is rejected. Empty segments inside a non-empty key
    /// (`a..b`, `a.`) are kept as ordinary names.
    pub fn parse(key: &'a str, separator: char) -> Result<Self, TreeError> {
        if key.is_empty() {
            return Err(TreeError::EmptyKey);
        }
        Ok(Self {
            segments: key.split(separator).collect(),
            separator,
        })
    }

    /// All segments, leaf included.
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Segments that name intermediate objects.
    pub fn namespaces(&self) -> &[&'a str] {
        &self.segments[..self.segments.len() - 1]
    }

    /// Name written at the final level.
    pub fn leaf(&self) -> &'a str {
        self.segments[self.segments.len() - 1]
    }

    /// Rejoin the first `depth` segments, for diagnostics.
    pub fn prefix(&self, depth: usize) -> String {
        let mut sep = [0u8; 4];
        let sep = self.separator.encode_utf8(&mut sep);
        self.segments[..depth.min(self.segments.len())].join(sep)
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_key_splits_into_namespaces_and_leaf() {
        let path = KeyPath::parse("a.b.c", DEFAULT_SEPARATOR).expect("parse");
        assert_eq!(path.namespaces(), &["a", "b"]);
        assert_eq!(path.leaf(), "c");
        assert_eq!(path.depth(), 3);
        assert_eq!(path.prefix(2), "a.b");
    }

    #[test]
    fn single_segment_has_no_namespaces() {
        let path = KeyPath::parse("f", DEFAULT_SEPARATOR).expect("parse");
        assert!(path.namespaces().is_empty());
        assert_eq!(path.leaf(), "f");
    }

    #[test]
    fn empty_key_is_rejected() {
        assert_eq!(
            KeyPath::parse("", DEFAULT_SEPARATOR),
            Err(TreeError::EmptyKey)
        );
    }

    #[test]
    fn empty_inner_segments_are_names() {
        let path = KeyPath::parse("a..b.", DEFAULT_SEPARATOR).expect("parse");
        assert_eq!(path.segments(), &["a", "", "b", ""]);
        assert_eq!(path.leaf(), "");
    }

    #[test]
    fn custom_separator() {
        let path = KeyPath::parse("net/tcp/port", '/').expect("parse");
        assert_eq!(path.namespaces(), &["net", "tcp"]);
        assert_eq!(path.prefix(1), "net");
        assert_eq!(path.prefix(9), "net/tcp/port");
    }
}
