//! YAML file storage with atomic replacement.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::document::{Document, Node};
use crate::persistence::{DocumentStorage, PersistenceError};

/// The document stored as a single YAML file, e.g. `config/config.yaml`.
#[derive(Debug, Clone)]
pub struct YamlFileStorage {
    path: PathBuf,
}

impl YamlFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling temp file, unique per save so concurrent writers never share one.
    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()))
    }

    fn write_temp(&self, temp: &Path, contents: &str) -> std::io::Result<()> {
        let mut file = File::create(temp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(temp, &self.path)
    }
}

impl DocumentStorage for YamlFileStorage {
    fn load(&self) -> Result<Document, PersistenceError> {
        let content = fs::read_to_string(&self.path).map_err(|source| PersistenceError::Read {
            path: self.path.clone(),
            source,
        })?;
        let value: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|source| PersistenceError::Parse {
                path: self.path.clone(),
                source,
            })?;
        let shape_err = |source| PersistenceError::Shape {
            path: self.path.clone(),
            source,
        };
        let root = Node::try_from(value).map_err(shape_err)?;
        Document::from_root(root).map_err(shape_err)
    }

    fn save(&self, document: &Document) -> Result<(), PersistenceError> {
        let contents = serde_yaml::to_string(document).map_err(PersistenceError::Serialize)?;
        let temp = self.temp_path();

        if let Err(source) = self.write_temp(&temp, &contents) {
            let _ = fs::remove_file(&temp);
            return Err(PersistenceError::Write {
                path: self.path.clone(),
                source,
            });
        }

        tracing::debug!(path = %self.path.display(), bytes = contents.len(), "Document written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
