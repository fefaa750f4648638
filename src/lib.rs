//! Path-addressable configuration store for a reverse-proxy control plane.
//!
//! Routing rules live in one nested YAML document that an external proxy
//! watches. This crate loads that document, mutates it by dotted path or by
//! whole route (router + middleware + service), and writes it back
//! atomically after every change.

// Core
pub mod document;
pub mod error;
pub mod persistence;
pub mod routes;
pub mod store;

// Service
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use document::{Document, Node, PathExpr};
pub use error::{Result, StoreError};
pub use routes::Route;
pub use store::{ConfigStore, ReloadPolicy};
