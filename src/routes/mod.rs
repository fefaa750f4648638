//! Route entities.
//!
//! # Data Flow
//! ```text
//! Route { name, address, host, useragent, redirect_url }
//!     → route.rs (RouteKeys: name → router / name-redirect / name-svc)
//!     → manager.rs (create / delete / inspect the triple on a Document)
//! ```

pub mod manager;
pub mod route;

pub use manager::RouteStatus;
pub use route::{Route, RouteKeys};
