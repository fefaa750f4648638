//! Store error taxonomy.
//!
//! Every store operation reports one of these kinds synchronously to its
//! caller. None of them is retried internally; the transport layer maps
//! them to protocol status codes (see `http::response`).

use thiserror::Error;

use crate::persistence::PersistenceError;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Path text was empty or contained an empty segment.
    #[error("malformed path `{0}`")]
    MalformedPath(String),

    #[error("path not found: {0}")]
    PathNotFound(String),

    /// Traversal tried to descend into a node that cannot hold the segment.
    #[error("type mismatch at `{path}`: cannot descend into {found}")]
    TypeMismatch { path: String, found: &'static str },

    #[error("route `{0}` already exists")]
    DuplicateRoute(String),

    #[error("route `{0}` does not exist")]
    RouteNotFound(String),

    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(#[from] PersistenceError),
}

impl StoreError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::MalformedPath(_) => "malformed_path",
            StoreError::PathNotFound(_) => "path_not_found",
            StoreError::TypeMismatch { .. } => "type_mismatch",
            StoreError::DuplicateRoute(_) => "duplicate_route",
            StoreError::RouteNotFound(_) => "route_not_found",
            StoreError::PersistenceUnavailable(e) if e.is_save() => "not_persisted",
            StoreError::PersistenceUnavailable(_) => "persistence_unavailable",
        }
    }

    /// True for failures caused by the input rather than by storage.
    pub fn is_validation(&self) -> bool {
        !matches!(self, StoreError::PersistenceUnavailable(_))
    }
}
