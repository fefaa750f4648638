//! Route entity and its on-document layout.
//!
//! A route named `api` is stored as three sibling entries:
//!
//! ```text
//! http:
//!   routers:
//!     api:              { entrypoints, middlewares: [api-redirect], rule, service: api-svc }
//!   middlewares:
//!     api-redirect:     { plugin: { uaredirect: { url, useragent } } }
//!   services:
//!     api-svc:          { loadbalancer: { servers: [ { url } ] } }
//! ```

use serde::{Deserialize, Serialize};

use crate::document::{Node, PathExpr};
use crate::error::Result;

pub const ROOT_KEY: &str = "http";
pub const ROUTERS_KEY: &str = "routers";
pub const MIDDLEWARES_KEY: &str = "middlewares";
pub const SERVICES_KEY: &str = "services";

pub const MIDDLEWARE_SUFFIX: &str = "-redirect";
pub const SERVICE_SUFFIX: &str = "-svc";

/// Entry point every created router listens on.
pub const DEFAULT_ENTRYPOINT: &str = "web";

/// Name of the user-agent redirect plugin in middleware configs.
pub const REDIRECT_PLUGIN: &str = "uaredirect";

/// A logical route: host match, upstream, and user-agent redirect policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    /// Upstream target URL.
    pub address: String,
    /// Value embedded verbatim in the `Host(...)` rule.
    pub host: String,
    #[serde(rename = "useragent", alias = "userAgent")]
    pub user_agent: String,
    #[serde(rename = "redirect_url", alias = "redirectURL")]
    pub redirect_url: String,
}

/// Keys of the three entries that make up one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteKeys {
    pub router: String,
    pub middleware: String,
    pub service: String,
}

impl RouteKeys {
    pub fn for_name(name: &str) -> Self {
        Self {
            router: name.to_string(),
            middleware: format!("{name}{MIDDLEWARE_SUFFIX}"),
            service: format!("{name}{SERVICE_SUFFIX}"),
        }
    }

    pub fn router_path(&self) -> Result<PathExpr> {
        PathExpr::from_segments([ROOT_KEY, ROUTERS_KEY, self.router.as_str()])
    }

    pub fn middleware_path(&self) -> Result<PathExpr> {
        PathExpr::from_segments([ROOT_KEY, MIDDLEWARES_KEY, self.middleware.as_str()])
    }

    pub fn service_path(&self) -> Result<PathExpr> {
        PathExpr::from_segments([ROOT_KEY, SERVICES_KEY, self.service.as_str()])
    }

    /// Router, middleware and service paths, in that order.
    pub fn paths(&self) -> Result<[PathExpr; 3]> {
        Ok([
            self.router_path()?,
            self.middleware_path()?,
            self.service_path()?,
        ])
    }
}

/// `Host(`<host>`)` match rule. The host is not escaped.
pub fn host_rule(host: &str) -> String {
    format!("Host(`{host}`)")
}

/// Inverse of [`host_rule`] for rules of exactly that form.
pub fn parse_host_rule(rule: &str) -> Option<&str> {
    rule.strip_prefix("Host(`")?.strip_suffix("`)")
}

pub(crate) fn router_subtree(route: &Route, keys: &RouteKeys) -> Node {
    Node::map_of([
        ("entrypoints", Node::Seq(vec![DEFAULT_ENTRYPOINT.into()])),
        ("middlewares", Node::Seq(vec![keys.middleware.as_str().into()])),
        ("rule", host_rule(&route.host).into()),
        ("service", keys.service.as_str().into()),
    ])
}

pub(crate) fn middleware_subtree(route: &Route) -> Node {
    let plugin = Node::map_of([
        ("url", Node::from(route.redirect_url.as_str())),
        ("useragent", Node::from(route.user_agent.as_str())),
    ]);
    Node::map_of([("plugin", Node::map_of([(REDIRECT_PLUGIN, plugin)]))])
}

pub(crate) fn service_subtree(route: &Route) -> Node {
    let server = Node::map_of([("url", Node::from(route.address.as_str()))]);
    Node::map_of([(
        "loadbalancer",
        Node::map_of([("servers", Node::Seq(vec![server]))]),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_derive_from_name() {
        let keys = RouteKeys::for_name("api");
        assert_eq!(keys.middleware, "api-redirect");
        assert_eq!(keys.service, "api-svc");
        assert_eq!(keys.router_path().unwrap().to_string(), "http.routers.api");
        assert_eq!(
            keys.middleware_path().unwrap().to_string(),
            "http.middlewares.api-redirect"
        );
    }

    #[test]
    fn test_dotted_name_stays_one_segment() {
        let keys = RouteKeys::for_name("v1.api");
        assert_eq!(keys.service_path().unwrap().segments().len(), 3);
    }

    #[test]
    fn test_empty_name_is_malformed() {
        assert!(RouteKeys::for_name("").router_path().is_err());
    }

    #[test]
    fn test_host_rule_round_trip() {
        assert_eq!(host_rule("api.example.com"), "Host(`api.example.com`)");
        assert_eq!(parse_host_rule("Host(`api.example.com`)"), Some("api.example.com"));
        assert_eq!(parse_host_rule("PathPrefix(`/x`)"), None);
    }

    #[test]
    fn test_route_payload_field_names() {
        let route: Route = serde_json::from_str(
            r#"{"name":"api","address":"http://10.0.0.5:8080","host":"api.example.com","useragent":"bot","redirect_url":"http://blocked.example.com"}"#,
        )
        .unwrap();
        assert_eq!(route.user_agent, "bot");
        assert_eq!(route.redirect_url, "http://blocked.example.com");
    }
}
