//! Failure injection tests: storage that refuses to load or save.

use std::sync::Arc;

use reqwest::StatusCode;
use route_keeper::persistence::{DocumentStorage, MemoryStorage, YamlFileStorage};
use route_keeper::store::{ConfigStore, ReloadPolicy};
use route_keeper::{Document, PathExpr, StoreError};
use serde_json::Value;

mod common;

fn seeded_memory() -> Arc<MemoryStorage> {
    let dir = common::test_dir("memory_seed");
    let document = YamlFileStorage::new(common::seed_document(&dir))
        .load()
        .unwrap();
    Arc::new(MemoryStorage::new(document))
}

#[tokio::test]
async fn test_failed_save_is_reported_and_rolled_back() {
    let storage = seeded_memory();
    let server = common::start_server_with(storage.clone(), ReloadPolicy::Cached).await;
    let client = common::client();

    storage.fail_saves(true);
    let res = client
        .post(server.url("/addroute"))
        .json(&common::route_payload("api"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_persisted");

    // Neither memory nor the artifact kept the route.
    assert!(!server.store.exists("http.routers.api").unwrap());
    assert!(!storage
        .stored()
        .exists(&PathExpr::parse("http.routers.api").unwrap()));

    // Once storage recovers the same request goes through.
    storage.fail_saves(false);
    let res = client
        .post(server.url("/addroute"))
        .json(&common::route_payload("api"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(storage
        .stored()
        .exists(&PathExpr::parse("http.services.api-svc").unwrap()));
}

#[tokio::test]
async fn test_failed_reload_blocks_operations() {
    let storage = seeded_memory();
    let server = common::start_server_with(storage.clone(), ReloadPolicy::PerOperation).await;
    let client = common::client();

    storage.fail_loads(true);
    let res = client.get(server.url("/settings")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "persistence_unavailable");

    let saves = storage.save_count();
    let res = client
        .post(server.url("/addroute"))
        .json(&common::route_payload("api"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(storage.save_count(), saves);

    storage.fail_loads(false);
    let res = client.get(server.url("/settings")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[test]
fn test_open_fails_on_unreadable_artifact() {
    let dir = common::test_dir("missing");
    let storage = Arc::new(YamlFileStorage::new(dir.join("absent.yaml")));
    let err = ConfigStore::open(storage, ReloadPolicy::PerOperation).unwrap_err();
    assert!(matches!(err, StoreError::PersistenceUnavailable(_)));

    let bad = dir.join("bad.yaml");
    std::fs::write(&bad, "http: [unclosed").unwrap();
    let err = ConfigStore::open(Arc::new(YamlFileStorage::new(&bad)), ReloadPolicy::Cached)
        .unwrap_err();
    assert_eq!(err.kind(), "persistence_unavailable");
}

#[test]
fn test_external_edit_visible_per_operation() {
    let storage = Arc::new(MemoryStorage::new(Document::new()));
    let store = ConfigStore::open(storage.clone(), ReloadPolicy::PerOperation).unwrap();
    assert!(!store.exists("http").unwrap());

    let mut edited = Document::new();
    edited
        .set(&PathExpr::parse("http.routers.manual.rule").unwrap(), "Host(`m`)".into())
        .unwrap();
    storage.replace(edited);

    assert_eq!(
        store.get("http.routers.manual.rule").unwrap().as_str(),
        Some("Host(`m`)")
    );
}
