//! HTTP transport for the store.
//!
//! # Data Flow
//! ```text
//! admin request
//!     → server.rs (Axum router, request id, tracing, timeout)
//!     → handlers.rs (decode payload, call ConfigStore on the blocking pool)
//!     → response.rs (StoreError → status + JSON error body)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, ResponseMsg};
pub use server::{AdminServer, AppState};
