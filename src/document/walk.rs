//! Depth-indexed traversal for inspection output.
//!
//! Maps are visited key by key (the key at depth `d`, its value below it at
//! `d + 1`), sequences item by item at `d + 1`, scalars as leaves at `d`.
//! Map order is the stored order; callers use it for display only.

use std::fmt::Write;

use crate::document::node::{Node, Scalar};

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq)]
pub enum WalkEvent<'a> {
    Key(&'a str),
    Leaf(&'a Scalar),
}

/// Visit `node` starting at `depth`.
pub fn walk<'a, F>(node: &'a Node, depth: usize, visit: &mut F)
where
    F: FnMut(usize, WalkEvent<'a>),
{
    match node {
        Node::Map(map) => {
            for (key, value) in map {
                visit(depth, WalkEvent::Key(key));
                walk(value, depth + 1, visit);
            }
        }
        Node::Seq(items) => {
            for item in items {
                walk(item, depth + 1, visit);
            }
        }
        Node::Scalar(scalar) => visit(depth, WalkEvent::Leaf(scalar)),
    }
}

/// Render `node` as an indented outline, one event per line.
pub fn render_outline(node: &Node) -> String {
    let mut out = String::new();
    walk(node, 0, &mut |depth, event| {
        let indent = INDENT.repeat(depth);
        let _ = match event {
            WalkEvent::Key(key) => writeln!(out, "{indent}{key}:"),
            WalkEvent::Leaf(scalar) => writeln!(out, "{indent}{}", display_scalar(scalar)),
        };
    });
    out
}

fn display_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Null => "null".to_string(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::String(s) => s.clone(),
    }
}
