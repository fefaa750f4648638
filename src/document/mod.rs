//! Hierarchical configuration document.
//!
//! # Data Flow
//! ```text
//! YAML artifact / JSON request body
//!     → node.rs (decoded once into tagged Node values)
//!     → tree.rs (Document: get/set/delete/list by PathExpr)
//!     → walk.rs (depth-indexed outline for inspection)
//! ```
//!
//! # Design Decisions
//! - Maps keep insertion order so a load/save cycle does not reshuffle
//!   the artifact
//! - Paths are typed segment lists; only user input goes through `parse`

pub mod node;
pub mod path;
pub mod tree;
pub mod walk;

pub use node::{Map, Node, Scalar, ShapeError};
pub use path::PathExpr;
pub use tree::Document;
