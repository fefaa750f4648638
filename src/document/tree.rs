//! Path-addressed operations over a document.
//!
//! # Semantics
//! - `get`/`delete` never create structure; a missing or `null` intermediate
//!   is reported as `PathNotFound`, a scalar intermediate as `TypeMismatch`.
//! - `set` creates missing intermediates as maps (never sequences) and
//!   overwrites whatever sits at the final segment.
//! - `delete` of an absent final entry is a no-op.
//! - Sequence containers are addressed by decimal index segments.

use serde::Serialize;

use crate::document::node::{Node, ShapeError};
use crate::document::path::PathExpr;
use crate::error::{Result, StoreError};

/// A configuration document. The root is always a map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    root: Node,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document.
    pub fn new() -> Self {
        Self {
            root: Node::empty_map(),
        }
    }

    /// Wrap a decoded root node; the root must be a map.
    pub fn from_root(root: Node) -> std::result::Result<Self, ShapeError> {
        match root {
            Node::Map(_) => Ok(Self { root }),
            other => Err(ShapeError::RootNotMap(other.kind_name())),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn get(&self, path: &PathExpr) -> Result<&Node> {
        let mut current = &self.root;
        for (depth, segment) in path.segments().iter().enumerate() {
            current = child(current, segment, path, depth)?;
        }
        Ok(current)
    }

    pub fn exists(&self, path: &PathExpr) -> bool {
        self.get(path).is_ok()
    }

    /// Assign `value` at `path`, returning the value it replaced.
    pub fn set(&mut self, path: &PathExpr, value: Node) -> Result<Option<Node>> {
        let mut current = &mut self.root;
        for (depth, segment) in path.parent_segments().iter().enumerate() {
            current = child_or_create(current, segment, path, depth)?;
        }
        assign(current, path, value)
    }

    /// Remove the entry at `path`, returning it if it was present.
    pub fn delete(&mut self, path: &PathExpr) -> Result<Option<Node>> {
        let mut current = &mut self.root;
        for (depth, segment) in path.parent_segments().iter().enumerate() {
            current = child_mut(current, segment, path, depth)?;
        }

        let depth = path.len() - 1;
        let kind = current.kind_name();
        match current {
            Node::Map(map) => Ok(map.shift_remove(path.last())),
            Node::Seq(items) => {
                let index = seq_index(path.last(), path, depth)?;
                Ok((index < items.len()).then(|| items.remove(index)))
            }
            node if node.is_null() => Ok(None),
            Node::Scalar(_) => Err(type_mismatch(path, depth, kind)),
        }
    }

    /// Direct entries of the container at `path`, in stored order.
    /// Sequence entries are keyed by their index.
    pub fn list_children(&self, path: &PathExpr) -> Result<Vec<(String, &Node)>> {
        let node = self.get(path)?;
        match node {
            Node::Map(map) => Ok(map.iter().map(|(k, v)| (k.clone(), v)).collect()),
            Node::Seq(items) => Ok(items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect()),
            node if node.is_null() => Ok(Vec::new()),
            Node::Scalar(_) => Err(type_mismatch(path, path.len(), node.kind_name())),
        }
    }
}

fn type_mismatch(path: &PathExpr, depth: usize, found: &'static str) -> StoreError {
    StoreError::TypeMismatch {
        path: path.prefix_display(depth),
        found,
    }
}

fn not_found(path: &PathExpr, depth: usize) -> StoreError {
    StoreError::PathNotFound(path.prefix_display(depth + 1))
}

fn seq_index(segment: &str, path: &PathExpr, depth: usize) -> Result<usize> {
    segment
        .parse::<usize>()
        .map_err(|_| type_mismatch(path, depth, "sequence"))
}

fn child<'a>(node: &'a Node, segment: &str, path: &PathExpr, depth: usize) -> Result<&'a Node> {
    match node {
        Node::Map(map) => map.get(segment).ok_or_else(|| not_found(path, depth)),
        Node::Seq(items) => {
            let index = seq_index(segment, path, depth)?;
            items.get(index).ok_or_else(|| not_found(path, depth))
        }
        node if node.is_null() => Err(not_found(path, depth)),
        Node::Scalar(_) => Err(type_mismatch(path, depth, node.kind_name())),
    }
}

fn child_mut<'a>(
    node: &'a mut Node,
    segment: &str,
    path: &PathExpr,
    depth: usize,
) -> Result<&'a mut Node> {
    let kind = node.kind_name();
    match node {
        Node::Map(map) => map.get_mut(segment).ok_or_else(|| not_found(path, depth)),
        Node::Seq(items) => {
            let index = seq_index(segment, path, depth)?;
            items.get_mut(index).ok_or_else(|| not_found(path, depth))
        }
        node if node.is_null() => Err(not_found(path, depth)),
        Node::Scalar(_) => Err(type_mismatch(path, depth, kind)),
    }
}

fn child_or_create<'a>(
    node: &'a mut Node,
    segment: &str,
    path: &PathExpr,
    depth: usize,
) -> Result<&'a mut Node> {
    if node.is_null() {
        *node = Node::empty_map();
    }
    let kind = node.kind_name();
    match node {
        Node::Map(map) => Ok(map
            .entry(segment.to_string())
            .or_insert_with(Node::empty_map)),
        Node::Seq(items) => {
            let index = seq_index(segment, path, depth)?;
            items.get_mut(index).ok_or_else(|| not_found(path, depth))
        }
        Node::Scalar(_) => Err(type_mismatch(path, depth, kind)),
    }
}

fn assign(container: &mut Node, path: &PathExpr, value: Node) -> Result<Option<Node>> {
    if container.is_null() {
        *container = Node::empty_map();
    }
    let depth = path.len() - 1;
    let kind = container.kind_name();
    match container {
        Node::Map(map) => Ok(map.insert(path.last().to_string(), value)),
        Node::Seq(items) => {
            let index = seq_index(path.last(), path, depth)?;
            if index < items.len() {
                Ok(Some(std::mem::replace(&mut items[index], value)))
            } else if index == items.len() {
                items.push(value);
                Ok(None)
            } else {
                Err(not_found(path, depth))
            }
        }
        Node::Scalar(_) => Err(type_mismatch(path, depth, kind)),
    }
}
