//! Per-session store watchers.
//!
//! Each session runs two subscription loops:
//!
//! - the device watch feeds normalized snapshots to a [`ConnectivityDiff`]
//!   owned by that loop alone, raises the connections badge on connects,
//!   and appends a notification record to the owning account's log on
//!   disconnects;
//! - the notification watch follows the tail of the session account's own
//!   log and raises the notifications badge.
//!
//! Subscriptions are attached before the session becomes visible, so the
//! baseline snapshot is the store state at login and later writes are
//! always diffed as changes. The loops hold only a weak reference to the
//! session and stop when it is torn down.
//!
//! Several sessions may observe the same disconnect and each writes its own
//! record; duplicate notifications are accepted rather than coordinating
//! deduplication across observers. Watcher failures never propagate: a
//! session without live badges still serves every page.

use std::sync::{Arc, Weak};

use chrono::Utc;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::warn;

use domain::models::notification::{format_event, ConnectivityEvent};
use domain::services::diff::ConnectivityDiff;
use domain::services::snapshot::{normalize_account, normalize_owner};
use realtime::{paths, RealtimeStore, StorePath, Subscription};

use crate::middleware::metrics::record_notification_written;
use crate::services::session::SessionHandle;

/// Attaches both subscriptions for a fresh session and spawns their loops.
pub async fn attach_session_watchers(
    store: Arc<dyn RealtimeStore>,
    handle: &Arc<SessionHandle>,
) -> Vec<JoinHandle<()>> {
    let mut tasks = Vec::new();

    match attach(&store, device_watch_path(handle)).await {
        Some(subscription) => {
            tasks.push(tokio::spawn(device_watch(
                Arc::clone(&store),
                Arc::downgrade(handle),
                handle.is_owner,
                handle.account_id.clone(),
                subscription,
            )));
        }
        None => warn!(account_id = %handle.account_id, "device watch not attached"),
    }

    let log_path = paths::notifications(&handle.account_id).ok();
    match attach_tail(&store, log_path, 1).await {
        Some(subscription) => {
            tasks.push(tokio::spawn(notification_watch(
                Arc::downgrade(handle),
                subscription,
            )));
        }
        None => warn!(account_id = %handle.account_id, "notification watch not attached"),
    }

    tasks
}

/// Path the session's device watch subscribes to: the accounts root for
/// the owner (two-tier payload), the account's own `devices` node
/// otherwise.
fn device_watch_path(handle: &SessionHandle) -> Option<StorePath> {
    if handle.is_owner {
        Some(paths::accounts_root())
    } else {
        paths::devices(&handle.account_id).ok()
    }
}

async fn attach(store: &Arc<dyn RealtimeStore>, path: Option<StorePath>) -> Option<Subscription> {
    let path = path?;
    match store.subscribe(&path).await {
        Ok(subscription) => Some(subscription),
        Err(err) => {
            warn!(path = %path, error = %err, "subscription failed");
            None
        }
    }
}

async fn attach_tail(
    store: &Arc<dyn RealtimeStore>,
    path: Option<StorePath>,
    limit: usize,
) -> Option<Subscription> {
    let path = path?;
    match store.subscribe_tail(&path, limit).await {
        Ok(subscription) => Some(subscription),
        Err(err) => {
            warn!(path = %path, error = %err, "tail subscription failed");
            None
        }
    }
}

async fn device_watch(
    store: Arc<dyn RealtimeStore>,
    session: Weak<SessionHandle>,
    is_owner: bool,
    account_id: String,
    mut subscription: Subscription,
) {
    // Diff state lives in this loop; it is never shared across sessions.
    let mut diff = ConnectivityDiff::new();

    while let Some(snapshot) = subscription.recv().await {
        let Some(handle) = session.upgrade() else {
            break; // session torn down
        };

        let current = if is_owner {
            normalize_owner(&snapshot)
        } else {
            normalize_account(&snapshot)
        };

        let outcome = diff.observe(current, &account_id, Utc::now());

        if outcome.new_connection {
            handle.raise_connection_signal();
        }

        for event in outcome.disconnects {
            let record = format_event(&event.device_id, ConnectivityEvent::Disconnected, event.at);
            let log = match paths::notifications(&event.owner_id) {
                Ok(log) => log,
                Err(err) => {
                    warn!(owner_id = %event.owner_id, error = %err, "bad notification path");
                    continue;
                }
            };
            match store.push(&log, Value::String(record)).await {
                Ok(_) => record_notification_written(),
                Err(err) => {
                    warn!(owner_id = %event.owner_id, device_id = %event.device_id, error = %err,
                        "failed to write disconnect notification");
                }
            }
        }
    }
}

async fn notification_watch(session: Weak<SessionHandle>, mut subscription: Subscription) {
    while let Some(snapshot) = subscription.recv().await {
        let Some(handle) = session.upgrade() else {
            break;
        };
        // An empty log is not a signal.
        if snapshot.is_null() {
            continue;
        }
        handle.raise_notification_signal();
    }
}
