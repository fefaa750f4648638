//! Store facade.
//!
//! # Data Flow
//! ```text
//! transport request
//!     → ConfigStore (take the lock)
//!     → reload from DocumentStorage (per-operation policy)
//!     → document / routes operation on a working copy
//!     → DocumentStorage::save
//!     → swap working copy in, release the lock, return
//! ```
//!
//! # Design Decisions
//! - One mutex for the whole store: concurrent requests are totally
//!   ordered, no lost updates
//! - No retries and no background work inside the store
//! - Calls are synchronous; async callers run them on the blocking pool

pub mod facade;

pub use facade::{ConfigStore, ReloadPolicy};
