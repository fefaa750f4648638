//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use route_keeper::config::ServiceConfig;
use route_keeper::http::AdminServer;
use route_keeper::lifecycle::Shutdown;
use route_keeper::persistence::{DocumentStorage, YamlFileStorage};
use route_keeper::store::{ConfigStore, ReloadPolicy};
use tokio::net::TcpListener;

/// A document like the ones the proxy ships with: one hand-written route
/// and an unrelated middleware.
pub const SEED_DOCUMENT: &str = r#"http:
  routers:
    console:
      entrypoints:
        - web
      middlewares:
        - secured
      rule: Host(`console.local`)
      service: console-svc
  middlewares:
    secured:
      basicauth:
        users:
          - admin:$apr1$xyz
  services:
    console-svc:
      loadbalancer:
        servers:
          - url: http://10.0.0.1:9000
"#;

/// Fresh, unique directory under the system temp dir.
pub fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("route_keeper_it")
        .join(format!("{name}_{}_{}", std::process::id(), unique()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn unique() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}

/// Write the seed document into `dir` and return its path.
pub fn seed_document(dir: &Path) -> PathBuf {
    let path = dir.join("config.yaml");
    fs::write(&path, SEED_DOCUMENT).unwrap();
    path
}

/// A running admin server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<ConfigStore>,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, endpoint: &str) -> String {
        format!("http://{}{}", self.addr, endpoint)
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_server(document: &Path, policy: ReloadPolicy) -> TestServer {
    start_server_with(Arc::new(YamlFileStorage::new(document)), policy).await
}

pub async fn start_server_with(
    storage: Arc<dyn DocumentStorage>,
    policy: ReloadPolicy,
) -> TestServer {
    let store = Arc::new(ConfigStore::open(storage, policy).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = AdminServer::new(&ServiceConfig::default(), store.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        store,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

pub fn route_payload(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "address": "http://10.0.0.5:8080",
        "host": format!("{name}.example.com"),
        "useragent": "bot",
        "redirect_url": "http://blocked.example.com",
    })
}
