//! Durable storage for the document.
//!
//! # Data Flow
//! ```text
//! startup / per-operation reload:
//!     artifact → DocumentStorage::load → Document
//!
//! after every successful mutation:
//!     Document → DocumentStorage::save → temp file → rename over artifact
//! ```
//!
//! # Design Decisions
//! - The store only needs "read whole document" and "write whole document"
//! - Saves never truncate the artifact in place; readers see the old or
//!   the new document, nothing in between
//! - Errors carry their stage so callers can tell a failed save apart from
//!   a failed load

pub mod memory;
pub mod yaml_file;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::document::{Document, ShapeError};

pub use memory::MemoryStorage;
pub use yaml_file::YamlFileStorage;

/// Read/write primitives over the backing artifact.
pub trait DocumentStorage: Send + Sync {
    fn load(&self) -> Result<Document, PersistenceError>;

    fn save(&self, document: &Document) -> Result<(), PersistenceError>;

    /// Where the document lives, for log output.
    fn location(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Save,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::Save => "save",
        }
    }
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid document in {}: {source}", path.display())]
    Shape { path: PathBuf, source: ShapeError },

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl PersistenceError {
    pub fn stage(&self) -> Stage {
        match self {
            PersistenceError::Read { .. }
            | PersistenceError::Parse { .. }
            | PersistenceError::Shape { .. } => Stage::Load,
            PersistenceError::Serialize(_) | PersistenceError::Write { .. } => Stage::Save,
        }
    }

    pub fn is_save(&self) -> bool {
        self.stage() == Stage::Save
    }
}
