//! In-process storage, for embedding the store without a file and for
//! exercising load/save failure paths.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::document::Document;
use crate::persistence::{DocumentStorage, PersistenceError};

const LOCATION: &str = "memory";

#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: Mutex<Document>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new(document: Document) -> Self {
        Self {
            document: Mutex::new(document),
            ..Self::default()
        }
    }

    /// Make subsequent loads fail until reset.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent saves fail until reset.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The last successfully saved document.
    pub fn stored(&self) -> Document {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the stored document, as an external editor would.
    pub fn replace(&self, document: Document) {
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = document;
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl DocumentStorage for MemoryStorage {
    fn load(&self) -> Result<Document, PersistenceError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Read {
                path: PathBuf::from(LOCATION),
                source: io::Error::other("load failure injected"),
            });
        }
        Ok(self.stored())
    }

    fn save(&self, document: &Document) -> Result<(), PersistenceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Write {
                path: PathBuf::from(LOCATION),
                source: io::Error::other("save failure injected"),
            });
        }
        self.replace(document.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        LOCATION.to_string()
    }
}
