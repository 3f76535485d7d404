//! The store client trait and subscription handles.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::path::StorePath;

/// Client interface to the shared realtime store.
///
/// All reads return the full JSON value at the requested path; a missing
/// node reads as `Value::Null`, mirroring the backend's semantics. Writes
/// are fire-and-forget from the console's perspective; retry and
/// reconnection policy live below this boundary.
#[async_trait]
pub trait RealtimeStore: Send + Sync {
    /// Reads the value at `path` (`Null` if absent).
    async fn get(&self, path: &StorePath) -> Result<Value>;

    /// Replaces the value at `path`. Writing `Null` removes the node.
    async fn set(&self, path: &StorePath, value: Value) -> Result<()>;

    /// Appends `value` under `path` with a generated, chronologically
    /// sortable child key, returning the key.
    async fn push(&self, path: &StorePath, value: Value) -> Result<String>;

    /// Removes the node at `path` (no-op if absent).
    async fn remove(&self, path: &StorePath) -> Result<()>;

    /// Reads only the last `limit` children (by key order) of the node at
    /// `path`.
    async fn get_tail(&self, path: &StorePath, limit: usize) -> Result<Value>;

    /// Attaches a listener at `path`. The current value is delivered
    /// immediately, then again after every write that overlaps the path.
    async fn subscribe(&self, path: &StorePath) -> Result<Subscription>;

    /// Like [`subscribe`](Self::subscribe), but delivers only the last
    /// `limit` children (by key order) of the watched node.
    async fn subscribe_tail(&self, path: &StorePath, limit: usize) -> Result<Subscription>;
}

/// An attached listener. Dropping the handle detaches it; no further
/// snapshots are delivered after that.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<Value>,
    _guard: DetachGuard,
}

impl Subscription {
    pub fn new(receiver: mpsc::UnboundedReceiver<Value>, guard: DetachGuard) -> Self {
        Self {
            receiver,
            _guard: guard,
        }
    }

    /// Waits for the next snapshot. Returns `None` once the store side has
    /// closed the stream.
    pub async fn recv(&mut self) -> Option<Value> {
        self.receiver.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv) for drain loops.
    pub fn try_recv(&mut self) -> Option<Value> {
        self.receiver.try_recv().ok()
    }
}

/// Runs its detach action exactly once, on drop.
pub struct DetachGuard {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl DetachGuard {
    pub fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }
}

impl Drop for DetachGuard {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}
