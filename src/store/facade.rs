//! The store facade: one authoritative document behind one lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::document::{Document, Node, PathExpr};
use crate::error::Result;
use crate::observability::metrics;
use crate::persistence::DocumentStorage;
use crate::routes::manager;
use crate::routes::route::ROOT_KEY;
use crate::routes::{Route, RouteStatus};

/// When the in-memory document is refreshed from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadPolicy {
    /// Re-read the artifact at the start of every operation, so external
    /// edits are always seen.
    #[default]
    PerOperation,
    /// Keep the loaded document; refresh only through `reload`.
    Cached,
}

/// Serialized access to the document and its storage.
///
/// Every operation holds the lock for exactly one load, mutate, save cycle.
/// Mutations run on a working copy that replaces the authoritative document
/// only after it was saved, so a failed save leaves memory and artifact in
/// agreement.
pub struct ConfigStore {
    storage: Arc<dyn DocumentStorage>,
    policy: ReloadPolicy,
    document: Mutex<Document>,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("storage", &self.storage.location())
            .field("policy", &self.policy)
            .finish()
    }
}

impl ConfigStore {
    /// Load the base document. Failure here means the service cannot start.
    pub fn open(storage: Arc<dyn DocumentStorage>, policy: ReloadPolicy) -> Result<Self> {
        let store = Self {
            document: Mutex::new(Document::new()),
            storage,
            policy,
        };
        let document = store.load()?;
        let routes = manager::route_names(&document).map(|n| n.len()).unwrap_or(0);
        metrics::set_route_count(routes);
        tracing::info!(
            location = %store.storage.location(),
            policy = ?policy,
            routes,
            "Document loaded"
        );
        *store.lock() = document;
        Ok(store)
    }

    pub fn policy(&self) -> ReloadPolicy {
        self.policy
    }

    pub fn get(&self, path: &str) -> Result<Node> {
        let path = PathExpr::parse(path)?;
        self.read("get", |doc| doc.get(&path).cloned())
    }

    pub fn exists(&self, path: &str) -> Result<bool> {
        let path = PathExpr::parse(path)?;
        self.read("exists", |doc| Ok(doc.exists(&path)))
    }

    pub fn list(&self, path: &str) -> Result<Vec<(String, Node)>> {
        let path = PathExpr::parse(path)?;
        self.read("list", |doc| {
            Ok(doc
                .list_children(&path)?
                .into_iter()
                .map(|(key, node)| (key, node.clone()))
                .collect())
        })
    }

    /// Assign `value` at `path`, creating intermediate maps.
    pub fn set(&self, path: &str, value: Node) -> Result<Option<Node>> {
        let path = PathExpr::parse(path)?;
        let previous = self.write("set", |doc| doc.set(&path, value))?;
        tracing::info!(path = %path, "Value set");
        Ok(previous)
    }

    /// Remove the entry at `path`; absent entries are not an error.
    pub fn delete(&self, path: &str) -> Result<Option<Node>> {
        let path = PathExpr::parse(path)?;
        let removed = self.write("delete", |doc| doc.delete(&path))?;
        tracing::info!(path = %path, removed = removed.is_some(), "Value deleted");
        Ok(removed)
    }

    pub fn create_route(&self, route: &Route) -> Result<()> {
        self.write("create_route", |doc| manager::create_route(doc, route))?;
        tracing::info!(route = %route.name, host = %route.host, "Route created");
        Ok(())
    }

    pub fn delete_route(&self, name: &str) -> Result<()> {
        self.write("delete_route", |doc| manager::delete_route(doc, name))?;
        tracing::info!(route = %name, "Route deleted");
        Ok(())
    }

    /// Overwrite an existing user-agent binding. Returns the previous value.
    pub fn set_user_agent(&self, path: &str, user_agent: &str) -> Result<Node> {
        let path = PathExpr::parse(path)?;
        let previous = self.write("set_user_agent", |doc| {
            manager::set_user_agent(doc, &path, user_agent)
        })?;
        tracing::info!(path = %path, user_agent = %user_agent, "User agent updated");
        Ok(previous)
    }

    pub fn list_routes(&self) -> Result<Vec<RouteStatus>> {
        self.read("list_routes", manager::list_routes)
    }

    pub fn get_route(&self, name: &str) -> Result<Route> {
        self.read("get_route", |doc| manager::get_route(doc, name))
    }

    /// The whole `http` subtree.
    pub fn dump_all(&self) -> Result<Node> {
        let path = PathExpr::from_segments([ROOT_KEY])?;
        self.read("dump_all", |doc| doc.get(&path).cloned())
    }

    /// Replace the in-memory document with the stored one.
    pub fn reload(&self) -> Result<()> {
        let mut current = self.lock();
        *current = self.load()?;
        tracing::info!(location = %self.storage.location(), "Document reloaded");
        Ok(())
    }

    /// Copy of the in-memory document, without consulting storage.
    pub fn snapshot(&self) -> Document {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        // The document is only ever replaced whole, never left half-written.
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<Document> {
        self.storage.load().map_err(|e| {
            metrics::record_persist_failure(e.stage());
            tracing::error!(location = %self.storage.location(), error = %e, "Failed to load document");
            e.into()
        })
    }

    fn refresh(&self, current: &mut Document) -> Result<()> {
        if self.policy == ReloadPolicy::PerOperation {
            tracing::debug!(location = %self.storage.location(), "Reloading document");
            *current = self.load()?;
        }
        Ok(())
    }

    fn read<R>(&self, op: &'static str, f: impl FnOnce(&Document) -> Result<R>) -> Result<R> {
        let started = Instant::now();
        let mut current = self.lock();
        let result = self.refresh(&mut current).and_then(|()| f(&current));
        metrics::record_operation(op, &result, started);
        result
    }

    fn write<R>(&self, op: &'static str, f: impl FnOnce(&mut Document) -> Result<R>) -> Result<R> {
        let started = Instant::now();
        let mut current = self.lock();
        let result = self.commit(&mut current, f);
        metrics::record_operation(op, &result, started);
        result
    }

    fn commit<R>(
        &self,
        current: &mut Document,
        f: impl FnOnce(&mut Document) -> Result<R>,
    ) -> Result<R> {
        self.refresh(current)?;
        let mut working = current.clone();
        let value = f(&mut working)?;

        if let Err(e) = self.storage.save(&working) {
            metrics::record_persist_failure(e.stage());
            tracing::error!(
                location = %self.storage.location(),
                error = %e,
                "Failed to save document, change discarded"
            );
            return Err(e.into());
        }

        metrics::set_route_count(manager::route_names(&working).map(|n| n.len()).unwrap_or(0));
        *current = working;
        Ok(value)
    }
}
