//! Embedded in-memory store.
//!
//! Backs development setups and the test suite with the same contract the
//! hosted backend provides: a JSON tree, push keys that sort
//! chronologically, and listeners that fire once on attach and after every
//! overlapping write. State lives only as long as the process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::path::StorePath;
use crate::store::{DetachGuard, RealtimeStore, Subscription};

/// In-memory realtime store.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<Value>,
    watchers: Mutex<HashMap<u64, Watcher>>,
    next_watcher_id: AtomicU64,
    push_seq: AtomicU64,
}

struct Watcher {
    path: StorePath,
    tail_limit: Option<usize>,
    tx: mpsc::UnboundedSender<Value>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(Value::Null),
                watchers: Mutex::new(HashMap::new()),
                next_watcher_id: AtomicU64::new(1),
                push_seq: AtomicU64::new(0),
            }),
        }
    }

    /// Generates a push key that sorts after every previously generated key.
    fn next_push_key(&self) -> String {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let seq = self.inner.push_seq.fetch_add(1, Ordering::SeqCst);
        format!("{:012x}{:06x}", millis, seq)
    }

    fn write(&self, path: &StorePath, value: Value) {
        {
            let mut state = self.inner.state.lock().unwrap();
            set_at(&mut state, path.segments(), value);
        }
        self.notify(path);
    }

    /// Delivers fresh snapshots to every watcher whose path overlaps the
    /// changed path (ancestors see the change inside their subtree,
    /// descendants see their node replaced).
    fn notify(&self, changed: &StorePath) {
        let mut watchers = self.inner.watchers.lock().unwrap();
        let state = self.inner.state.lock().unwrap();
        let mut dead = Vec::new();
        for (id, watcher) in watchers.iter() {
            if !(watcher.path.contains(changed) || changed.contains(&watcher.path)) {
                continue;
            }
            let snapshot = snapshot_at(&state, &watcher.path, watcher.tail_limit);
            if watcher.tx.send(snapshot).is_err() {
                dead.push(*id);
            }
        }
        for id in dead {
            watchers.remove(&id);
        }
    }

    fn attach(&self, path: &StorePath, tail_limit: Option<usize>) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();

        // Initial delivery happens before the watcher becomes visible to
        // writers, so the first snapshot always precedes any update.
        let initial = {
            let state = self.inner.state.lock().unwrap();
            snapshot_at(&state, path, tail_limit)
        };
        let _ = tx.send(initial);

        let id = self.inner.next_watcher_id.fetch_add(1, Ordering::SeqCst);
        self.inner.watchers.lock().unwrap().insert(
            id,
            Watcher {
                path: path.clone(),
                tail_limit,
                tx,
            },
        );

        let inner = Arc::clone(&self.inner);
        let guard = DetachGuard::new(move || {
            inner.watchers.lock().unwrap().remove(&id);
        });
        Subscription::new(rx, guard)
    }
}

#[async_trait]
impl RealtimeStore for MemoryStore {
    async fn get(&self, path: &StorePath) -> Result<Value> {
        let state = self.inner.state.lock().unwrap();
        Ok(value_at(&state, path.segments()).cloned().unwrap_or(Value::Null))
    }

    async fn set(&self, path: &StorePath, value: Value) -> Result<()> {
        self.write(path, value);
        Ok(())
    }

    async fn push(&self, path: &StorePath, value: Value) -> Result<String> {
        let key = self.next_push_key();
        let child = path.clone().child(&key)?;
        self.write(&child, value);
        Ok(key)
    }

    async fn remove(&self, path: &StorePath) -> Result<()> {
        self.write(path, Value::Null);
        Ok(())
    }

    async fn get_tail(&self, path: &StorePath, limit: usize) -> Result<Value> {
        let state = self.inner.state.lock().unwrap();
        Ok(snapshot_at(&state, path, Some(limit)))
    }

    async fn subscribe(&self, path: &StorePath) -> Result<Subscription> {
        Ok(self.attach(path, None))
    }

    async fn subscribe_tail(&self, path: &StorePath, limit: usize) -> Result<Subscription> {
        Ok(self.attach(path, Some(limit)))
    }
}

fn value_at<'v>(root: &'v Value, segments: &[String]) -> Option<&'v Value> {
    let mut node = root;
    for segment in segments {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}

/// Writes `value` at the given path, creating intermediate objects.
/// Writing `Null` removes the node instead.
fn set_at(root: &mut Value, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return;
    };

    let removing = value.is_null();
    let mut node = root;
    for segment in parents {
        if removing {
            // Removal must not materialize missing parents.
            match node.as_object_mut().and_then(|map| map.get_mut(segment)) {
                Some(child) => node = child,
                None => return,
            }
            continue;
        }
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let map = node.as_object_mut().expect("object ensured above");
        node = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if removing {
        if let Some(map) = node.as_object_mut() {
            map.remove(last);
        }
    } else {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node.as_object_mut()
            .expect("object ensured above")
            .insert(last.clone(), value);
    }
}

/// Clones the value at `path`, keeping only the last `limit` children (by
/// key order) when a tail limit applies.
fn snapshot_at(root: &Value, path: &StorePath, tail_limit: Option<usize>) -> Value {
    let value = value_at(root, path.segments()).cloned().unwrap_or(Value::Null);
    match (tail_limit, value) {
        (Some(limit), Value::Object(map)) if map.len() > limit => {
            let skip = map.len() - limit;
            Value::Object(map.into_iter().skip(skip).collect())
        }
        (_, value) => value,
    }
}
