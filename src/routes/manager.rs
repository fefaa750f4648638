//! Route lifecycle over a document.
//!
//! # Invariants
//! - A route's router, middleware and service entries are written or
//!   removed together; a failed call leaves the document untouched
//! - Delete cleans up whatever part of a triple is left, so earlier
//!   partial writes heal themselves
//! - User-agent updates only touch paths that already exist

use serde::Serialize;

use crate::document::{Document, Node, PathExpr};
use crate::error::{Result, StoreError};
use crate::routes::route::{
    middleware_subtree, parse_host_rule, router_subtree, service_subtree, Route, RouteKeys,
    REDIRECT_PLUGIN, ROOT_KEY, ROUTERS_KEY,
};

/// Consistency report for one router entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteStatus {
    pub name: String,
    pub has_middleware: bool,
    pub has_service: bool,
    /// All three entries exist and the router references the others.
    pub complete: bool,
}

pub fn create_route(doc: &mut Document, route: &Route) -> Result<()> {
    let keys = RouteKeys::for_name(&route.name);
    let router_path = keys.router_path()?;
    if doc.exists(&router_path) {
        return Err(StoreError::DuplicateRoute(route.name.clone()));
    }

    let mut staged = doc.clone();
    staged.set(&keys.service_path()?, service_subtree(route))?;
    staged.set(&router_path, router_subtree(route, &keys))?;
    staged.set(&keys.middleware_path()?, middleware_subtree(route))?;
    *doc = staged;
    Ok(())
}

pub fn delete_route(doc: &mut Document, name: &str) -> Result<()> {
    let keys = RouteKeys::for_name(name);
    if !doc.exists(&keys.router_path()?) {
        return Err(StoreError::RouteNotFound(name.to_string()));
    }

    // A middleware or service that is missing, or whose container is not a
    // map, is already gone as far as this route is concerned.
    let mut staged = doc.clone();
    for path in keys.paths()? {
        match staged.delete(&path) {
            Ok(_)
            | Err(StoreError::PathNotFound(_))
            | Err(StoreError::TypeMismatch { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    *doc = staged;
    Ok(())
}

/// Replace the value at an existing `path`. Returns the previous value.
pub fn set_user_agent(doc: &mut Document, path: &PathExpr, user_agent: &str) -> Result<Node> {
    if !doc.exists(path) {
        return Err(StoreError::PathNotFound(path.to_string()));
    }
    let previous = doc.set(path, user_agent.into())?;
    Ok(previous.unwrap_or_else(Node::null))
}

fn routers_path() -> Result<PathExpr> {
    PathExpr::from_segments([ROOT_KEY, ROUTERS_KEY])
}

/// Names of all router entries, in stored order.
pub fn route_names(doc: &Document) -> Result<Vec<String>> {
    let routers = routers_path()?;
    if !doc.exists(&routers) {
        return Ok(Vec::new());
    }
    Ok(doc
        .list_children(&routers)?
        .into_iter()
        .map(|(name, _)| name)
        .collect())
}

pub fn list_routes(doc: &Document) -> Result<Vec<RouteStatus>> {
    route_names(doc)?
        .into_iter()
        .map(|name| route_status(doc, name))
        .collect()
}

fn route_status(doc: &Document, name: String) -> Result<RouteStatus> {
    let keys = RouteKeys::for_name(&name);
    let has_middleware = doc.exists(&keys.middleware_path()?);
    let has_service = doc.exists(&keys.service_path()?);

    let router = keys.router_path()?;
    let service_ref = read_str(doc, &router.child("service")?);
    let middleware_ref = doc
        .get(&router.child("middlewares")?)
        .ok()
        .and_then(|node| match node {
            Node::Seq(items) => items.first().and_then(Node::as_str).map(str::to_string),
            other => other.as_str().map(str::to_string),
        })
        .unwrap_or_default();

    let complete = has_middleware
        && has_service
        && service_ref == keys.service
        && middleware_ref == keys.middleware;

    Ok(RouteStatus {
        name,
        has_middleware,
        has_service,
        complete,
    })
}

/// Rebuild a route from its stored entries. Missing fields come back empty.
pub fn get_route(doc: &Document, name: &str) -> Result<Route> {
    let keys = RouteKeys::for_name(name);
    let router = keys.router_path()?;
    if !doc.exists(&router) {
        return Err(StoreError::RouteNotFound(name.to_string()));
    }

    let rule = read_str(doc, &router.child("rule")?);
    let host = parse_host_rule(&rule).unwrap_or_default().to_string();

    let service = keys.service_path()?;
    let address = read_str(
        doc,
        &service.child("loadbalancer")?.child("servers")?.child("0")?.child("url")?,
    );

    let plugin = keys.middleware_path()?.child("plugin")?.child(REDIRECT_PLUGIN)?;
    let redirect_url = read_str(doc, &plugin.child("url")?);
    let user_agent = read_str(doc, &plugin.child("useragent")?);

    Ok(Route {
        name: name.to_string(),
        address,
        host,
        user_agent,
        redirect_url,
    })
}

fn read_str(doc: &Document, path: &PathExpr) -> String {
    doc.get(path)
        .ok()
        .and_then(Node::as_str)
        .unwrap_or_default()
        .to_string()
}
