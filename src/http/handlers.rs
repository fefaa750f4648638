//! Admin API handlers.
//!
//! Each handler decodes its payload, runs one store operation on the
//! blocking pool and encodes the result. Store errors become responses
//! through `ApiError`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::document::Node;
use crate::http::response::{ApiError, ResponseMsg};
use crate::http::server::AppState;
use crate::routes::{Route, RouteStatus};
use crate::store::{ConfigStore, ReloadPolicy};

#[derive(Debug, Deserialize)]
pub struct DeleteRouteRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UserAgentRequest {
    pub path: String,
    #[serde(rename = "useragent")]
    pub user_agent: String,
}

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct SetValueRequest {
    pub path: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ValueResponse {
    pub path: String,
    pub value: Node,
}

#[derive(Debug, Serialize)]
pub struct ChildEntry {
    pub key: String,
    pub value: Node,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub policy: ReloadPolicy,
    pub routes: usize,
}

/// Run a store call on the blocking pool.
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&ConfigStore) -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store: Arc<ConfigStore> = state.store.clone();
    let result = tokio::task::spawn_blocking(move || f(&store)).await?;
    Ok(result?)
}

fn validate_route(route: &Route) -> Result<(), ApiError> {
    if route.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    for (field, value) in [("address", &route.address), ("redirect_url", &route.redirect_url)] {
        url::Url::parse(value)
            .map_err(|e| ApiError::BadRequest(format!("{field} `{value}` is not a URL: {e}")))?;
    }
    Ok(())
}

pub async fn add_route(
    State(state): State<AppState>,
    Json(route): Json<Route>,
) -> Result<Json<ResponseMsg>, ApiError> {
    validate_route(&route)?;
    let name = route.name.clone();
    with_store(&state, move |store| store.create_route(&route)).await?;
    Ok(ResponseMsg::new(format!("Added new route: {name}")))
}

pub async fn delete_route(
    State(state): State<AppState>,
    Json(request): Json<DeleteRouteRequest>,
) -> Result<Json<ResponseMsg>, ApiError> {
    let name = request.name;
    let target = name.clone();
    with_store(&state, move |store| store.delete_route(&target)).await?;
    Ok(ResponseMsg::new(format!("{name} route data deleted")))
}

pub async fn set_user_agent(
    State(state): State<AppState>,
    Json(request): Json<UserAgentRequest>,
) -> Result<Json<ResponseMsg>, ApiError> {
    let UserAgentRequest { path, user_agent } = request;
    let value = user_agent.clone();
    let previous = with_store(&state, move |store| store.set_user_agent(&path, &value)).await?;
    let previous = previous.as_str().unwrap_or_default().to_string();
    Ok(ResponseMsg::new(format!(
        "changed UserAgent from {previous} to {user_agent}"
    )))
}

pub async fn settings(State(state): State<AppState>) -> Result<Json<Node>, ApiError> {
    with_store(&state, |store| store.dump_all()).await.map(Json)
}

pub async fn list_routes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RouteStatus>>, ApiError> {
    with_store(&state, |store| store.list_routes()).await.map(Json)
}

pub async fn get_route(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Route>, ApiError> {
    with_store(&state, move |store| store.get_route(&name))
        .await
        .map(Json)
}

pub async fn get_value(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<ValueResponse>, ApiError> {
    let path = query.path.clone();
    let value = with_store(&state, move |store| store.get(&path)).await?;
    Ok(Json(ValueResponse {
        path: query.path,
        value,
    }))
}

pub async fn set_value(
    State(state): State<AppState>,
    Json(request): Json<SetValueRequest>,
) -> Result<Json<ResponseMsg>, ApiError> {
    let path = request.path.clone();
    let value = Node::from(request.value);
    with_store(&state, move |store| store.set(&path, value)).await?;
    Ok(ResponseMsg::new(format!("set {}", request.path)))
}

pub async fn delete_value(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<ResponseMsg>, ApiError> {
    let path = query.path.clone();
    let removed = with_store(&state, move |store| store.delete(&path)).await?;
    let message = if removed.is_some() {
        format!("deleted {}", query.path)
    } else {
        format!("{} was already absent", query.path)
    };
    Ok(ResponseMsg::new(message))
}

pub async fn list_children(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<Vec<ChildEntry>>, ApiError> {
    let entries = with_store(&state, move |store| store.list(&query.path)).await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|(key, value)| ChildEntry { key, value })
            .collect(),
    ))
}

pub async fn get_status(State(state): State<AppState>) -> Result<Json<SystemStatus>, ApiError> {
    let (policy, routes) = with_store(&state, |store| {
        Ok((store.policy(), store.list_routes()?.len()))
    })
    .await?;
    Ok(Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        policy,
        routes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(address: &str) -> Route {
        Route {
            name: "api".into(),
            address: address.into(),
            host: "api.example.com".into(),
            user_agent: "bot".into(),
            redirect_url: "http://blocked.example.com".into(),
        }
    }

    #[test]
    fn test_validate_route() {
        assert!(validate_route(&route("http://10.0.0.5:8080")).is_ok());
        assert!(matches!(
            validate_route(&route("10.0.0.5")),
            Err(ApiError::BadRequest(msg)) if msg.contains("address")
        ));

        let mut unnamed = route("http://10.0.0.5:8080");
        unnamed.name = " ".into();
        assert!(validate_route(&unnamed).is_err());
    }
}
