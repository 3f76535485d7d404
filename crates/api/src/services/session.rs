//! Operator session registry.
//!
//! Session tokens are stateless, but each live session owns console state
//! that is not: the indicator flags, the active page, and the store
//! subscriptions feeding the connectivity diff. `SessionRegistry` keys that
//! state by the token's session id. State is created on first sight of a
//! token (which also covers re-attach after a restart, with indicators
//! re-initialized to false) and torn down on logout.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::info;

use domain::models::page::Page;
use domain::services::indicators::Indicators;
use realtime::RealtimeStore;
use shared::session::SessionClaims;

use crate::services::watcher;

/// Console state owned by one live session.
pub struct SessionHandle {
    pub session_id: String,
    pub account_id: String,
    pub email: String,
    pub is_owner: bool,
    state: Mutex<ConsoleState>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

#[derive(Default)]
struct ConsoleState {
    indicators: Indicators,
    active_page: Option<Page>,
}

impl SessionHandle {
    fn new(claims: &SessionClaims, is_owner: bool) -> Arc<Self> {
        Arc::new(Self {
            session_id: claims.jti.clone(),
            account_id: claims.sub.clone(),
            email: claims.email.clone(),
            is_owner,
            state: Mutex::new(ConsoleState::default()),
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn indicators(&self) -> Indicators {
        self.state.lock().unwrap().indicators
    }

    pub fn active_page(&self) -> Option<Page> {
        self.state.lock().unwrap().active_page
    }

    /// Marks a page active and clears its badge.
    pub fn open_page(&self, page: Page) -> Indicators {
        let mut state = self.state.lock().unwrap();
        state.active_page = Some(page);
        state.indicators.clear_for(page);
        state.indicators
    }

    /// Raises the connections badge, unless the operator is looking at the
    /// connections page right now.
    pub fn raise_connection_signal(&self) {
        let mut state = self.state.lock().unwrap();
        if state.active_page != Some(Page::Connections) {
            state.indicators.connections = true;
        }
    }

    /// Raises the notifications badge, unless the notifications page is
    /// the active one.
    pub fn raise_notification_signal(&self) {
        let mut state = self.state.lock().unwrap();
        if state.active_page != Some(Page::Notifications) {
            state.indicators.notifications = true;
        }
    }

    fn set_tasks(&self, tasks: Vec<JoinHandle<()>>) {
        *self.tasks.lock().unwrap() = tasks;
    }

    /// Stops the session's watcher tasks; their subscriptions detach when
    /// the tasks drop them.
    pub fn shutdown(&self) {
        for task in self.tasks.lock().unwrap().drain(..) {
            task.abort();
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Registry of live sessions, keyed by session id.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session's console state, creating it (and attaching its
    /// watchers) when this is the first request carrying the token.
    ///
    /// Subscriptions are attached before the handle is published, so the
    /// watchers' baseline is the store state as of this call.
    pub async fn attach(
        &self,
        store: &Arc<dyn RealtimeStore>,
        claims: &SessionClaims,
        is_owner: bool,
    ) -> Arc<SessionHandle> {
        if let Some(handle) = self.sessions.lock().unwrap().get(&claims.jti) {
            return handle.clone();
        }

        let handle = SessionHandle::new(claims, is_owner);
        let tasks = watcher::attach_session_watchers(Arc::clone(store), &handle).await;
        handle.set_tasks(tasks);

        let mut sessions = self.sessions.lock().unwrap();
        // A concurrent request may have attached the same session while we
        // were subscribing; keep the first one and drop ours.
        if let Some(existing) = sessions.get(&claims.jti) {
            handle.shutdown();
            return existing.clone();
        }
        sessions.insert(claims.jti.clone(), handle.clone());
        info!(account_id = %claims.sub, session_id = %claims.jti, "session attached");
        handle
    }

    /// Tears down a session's console state.
    pub fn detach(&self, session_id: &str) {
        if let Some(handle) = self.sessions.lock().unwrap().remove(session_id) {
            handle.shutdown();
            info!(account_id = %handle.account_id, session_id = %session_id, "session detached");
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
