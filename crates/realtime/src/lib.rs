//! Realtime store client for Fleet Console.
//!
//! The console never owns device data; it reads and writes a shared
//! hierarchical keyed store that device agents sync against. This crate
//! contains:
//! - Store path handling and the conventional console layout (`paths`)
//! - The `RealtimeStore` trait: reads, writes, and push-based subscriptions
//! - `MemoryStore`, an embedded implementation for development and tests
//! - `RestStore`, a client for a hosted Firebase-style REST backend
//!
//! Subscriptions deliver the full value of the watched path: once
//! immediately on attach, then again after every overlapping write.
//! Dropping the [`Subscription`] handle detaches the listener.

pub mod error;
pub mod memory;
pub mod path;
pub mod rest;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use path::{paths, StorePath};
pub use rest::RestStore;
pub use store::{DetachGuard, RealtimeStore, Subscription};
