// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Nested namespace tree built from dotted record keys.
// Author: Lukas Bower

//! The tree is an explicit value: callers own it and hand it to
//! [`Tree::insert`] by `&mut`, one record at a time, in input order.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::path::KeyPath;

/// Children of an object node, in first-insertion order.
pub type Object = IndexMap<String, Node>;

/// A tree node: either a nested object or a text leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Nested mapping.
    Object(Object),
    /// Trimmed value text.
    Leaf(String),
}

impl Node {
    /// Borrow the leaf text, if this is a leaf.
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Object(_) => None,
        }
    }

    /// Borrow the children, if this is an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(children) => Some(children),
            Self::Leaf(_) => None,
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Object(children) => children.values().map(Node::leaf_count).sum(),
        }
    }
}

/// Handling of a namespace segment that currently holds a leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Abort with [`TreeError::StructureConflict`].
    #[default]
    Fail,
    /// Replace the leaf with an empty object and keep descending.
    Replace,
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "fail",
            Self::Replace => "replace",
        })
    }
}

/// Unrecognised conflict policy name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown conflict policy '{0}' (expected 'fail' or 'replace')")]
pub struct ParsePolicyError(String);

impl FromStr for ConflictPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "replace" => Ok(Self::Replace),
            _ => Err(ParsePolicyError(s.to_owned())),
        }
    }
}

/// Errors raised while inserting a key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The key field was empty.
    #[error("key field is empty")]
    EmptyKey,
    /// A namespace segment already holds a leaf value.
    #[error("namespace '{prefix}' already holds a value")]
    StructureConflict {
        /// Key prefix that resolved to a leaf.
        prefix: String,
    },
}

/// Root of the namespace tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tree {
    root: Object,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level entries.
    pub fn root(&self) -> &Object {
        &self.root
    }

    /// True when nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of leaf values reachable from the root.
    pub fn leaf_count(&self) -> usize {
        self.root.values().map(Node::leaf_count).sum()
    }

    /// Follow `segments` from the root.
    pub fn get(&self, segments: &[&str]) -> Option<&Node> {
        let (first, rest) = segments.split_first()?;
        let mut node = self.root.get(*first)?;
        for segment in rest {
            node = node.as_object()?.get(*segment)?;
        }
        Some(node)
    }

    /// Write `value` at `path`, creating intermediate objects as needed.
    ///
    /// The final segment is always overwritten, whether it held a leaf or a
    /// subtree; the displaced node is returned. A leaf met on the way down is
    /// resolved by `policy`.
    pub fn insert(
        &mut self,
        path: &KeyPath<'_>,
        value: String,
        policy: ConflictPolicy,
    ) -> Result<Option<Node>, TreeError> {
        let mut current = &mut self.root;
        for (depth, segment) in path.namespaces().iter().enumerate() {
            let slot = current
                .entry((*segment).to_owned())
                .or_insert_with(|| Node::Object(Object::new()));
            current = match descend(slot, policy) {
                Some(children) => children,
                None => {
                    return Err(TreeError::StructureConflict {
                        prefix: path.prefix(depth + 1),
                    })
                }
            };
        }
        Ok(current.insert(path.leaf().to_owned(), Node::Leaf(value)))
    }
}

fn descend(slot: &mut Node, policy: ConflictPolicy) -> Option<&mut Object> {
    if let Node::Leaf(previous) = slot {
        if policy == ConflictPolicy::Fail {
            return None;
        }
        debug!("replacing leaf '{previous}' with a namespace");
        *slot = Node::Object(Object::new());
    }
    match slot {
        Node::Object(children) => Some(children),
        Node::Leaf(_) => None,
    }
}
