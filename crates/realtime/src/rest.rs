//! REST client for a hosted Firebase-style realtime backend.
//!
//! The hosted backend exposes every node at `{base}/{path}.json` with PUT
//! (replace), POST (push, returns `{"name": key}`), DELETE, and GET. Its
//! streaming protocol is not part of the documented surface we consume, so
//! subscriptions are emulated by polling: an initial fetch on attach, then
//! a fetch per interval with delivery only when the value changed. The
//! diff-driven console layer is agnostic to how snapshots arrive.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::path::StorePath;
use crate::store::{DetachGuard, RealtimeStore, Subscription};

/// Default interval between subscription polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// REST-backed realtime store client.
#[derive(Clone)]
pub struct RestStore {
    base_url: String,
    client: reqwest::Client,
    poll_interval: Duration,
}

impl RestStore {
    pub fn new(base_url: &str, poll_interval: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            poll_interval,
        }
    }

    /// REST endpoint for a node: `{base}/{path}.json`.
    fn endpoint(&self, path: &StorePath) -> String {
        format!("{}/{}.json", self.base_url, path)
    }

    /// Endpoint for a bounded-tail read, ordered by key.
    fn tail_endpoint(&self, path: &StorePath, limit: usize) -> String {
        format!(
            "{}?orderBy=%22%24key%22&limitToLast={}",
            self.endpoint(path),
            limit
        )
    }

    async fn fetch(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }

    /// Spawns the polling loop backing a subscription.
    fn poll(&self, url: String) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let store = self.clone();
        let task_token = token.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(store.poll_interval);
            let mut last: Option<Value> = None;
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => {}
                }
                match store.fetch(&url).await {
                    Ok(value) => {
                        if last.as_ref() != Some(&value) {
                            if tx.send(value.clone()).is_err() {
                                break;
                            }
                            last = Some(value);
                        }
                    }
                    // Transient failures are the backend's problem to heal;
                    // the listener just waits for the next poll.
                    Err(err) => debug!(url = %url, error = %err, "poll failed"),
                }
            }
        });

        Subscription::new(rx, DetachGuard::new(move || token.cancel()))
    }
}

#[async_trait]
impl RealtimeStore for RestStore {
    async fn get(&self, path: &StorePath) -> Result<Value> {
        self.fetch(&self.endpoint(path)).await
    }

    async fn set(&self, path: &StorePath, value: Value) -> Result<()> {
        self.client
            .put(self.endpoint(path))
            .json(&value)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn push(&self, path: &StorePath, value: Value) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(&value)
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        body.get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::Malformed("push response missing name".into()))
    }

    async fn remove(&self, path: &StorePath) -> Result<()> {
        let response = self.client.delete(self.endpoint(path)).send().await?;
        if let Err(err) = response.error_for_status() {
            warn!(path = %path, error = %err, "remove failed");
            return Err(err.into());
        }
        Ok(())
    }

    async fn get_tail(&self, path: &StorePath, limit: usize) -> Result<Value> {
        self.fetch(&self.tail_endpoint(path, limit)).await
    }

    async fn subscribe(&self, path: &StorePath) -> Result<Subscription> {
        Ok(self.poll(self.endpoint(path)))
    }

    async fn subscribe_tail(&self, path: &StorePath, limit: usize) -> Result<Subscription> {
        Ok(self.poll(self.tail_endpoint(path, limit)))
    }
}
