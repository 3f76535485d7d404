//! Last-opened-page persistence.
//!
//! Purely a convenience: the console restores each operator to the page
//! they last had open. Storage is a small JSON file and strictly
//! best-effort: a missing, unreadable, or unwritable file degrades to the
//! default page without surfacing an error anywhere.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use tracing::debug;

use domain::models::page::Page;

/// Per-account last-opened-page store.
pub struct PreferenceStore {
    path: Option<PathBuf>,
    cache: Mutex<HashMap<String, Page>>,
}

impl PreferenceStore {
    /// Opens the store at `path`; an empty path disables persistence and
    /// keeps preferences in memory for the process lifetime.
    pub fn open(path: &str) -> Self {
        if path.is_empty() {
            return Self {
                path: None,
                cache: Mutex::new(HashMap::new()),
            };
        }

        let path = PathBuf::from(path);
        let cache = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(entries) => entries
                    .into_iter()
                    .filter_map(|(account, page)| Page::from_str(&page).ok().map(|p| (account, p)))
                    .collect(),
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "ignoring corrupt preferences");
                    HashMap::new()
                }
            },
            Err(err) => {
                debug!(path = %path.display(), error = %err, "no stored preferences");
                HashMap::new()
            }
        };

        Self {
            path: Some(path),
            cache: Mutex::new(cache),
        }
    }

    /// The page this account last had open, if any.
    pub fn last_page(&self, account_id: &str) -> Option<Page> {
        self.cache.lock().unwrap().get(account_id).copied()
    }

    /// Remembers the page the account just opened. Write failures are
    /// swallowed; the in-memory value still wins for this process.
    pub fn remember(&self, account_id: &str, page: Page) {
        let serialized = {
            let mut cache = self.cache.lock().unwrap();
            cache.insert(account_id.to_string(), page);
            cache
                .iter()
                .map(|(account, page)| (account.clone(), page.as_str().to_string()))
                .collect::<HashMap<_, _>>()
        };

        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(&serialized) {
            Ok(json) => {
                if let Err(err) = std::fs::write(path, json) {
                    debug!(path = %path.display(), error = %err, "failed to persist preferences");
                }
            }
            Err(err) => debug!(error = %err, "failed to serialize preferences"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("fleet-console-prefs-{}-{}.json", name, std::process::id()))
            .display()
            .to_string()
    }

    #[test]
    fn test_remember_and_restore() {
        let path = temp_path("roundtrip");
        let store = PreferenceStore::open(&path);
        assert_eq!(store.last_page("acct1"), None);

        store.remember("acct1", Page::Notifications);
        assert_eq!(store.last_page("acct1"), Some(Page::Notifications));

        // A fresh store reads the persisted file.
        let reopened = PreferenceStore::open(&path);
        assert_eq!(reopened.last_page("acct1"), Some(Page::Notifications));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_degrades_to_defaults() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{not json").unwrap();

        let store = PreferenceStore::open(&path);
        assert_eq!(store.last_page("acct1"), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unknown_pages_in_file_are_dropped() {
        let path = temp_path("unknown-page");
        std::fs::write(&path, r#"{"acct1": "warp-drive", "acct2": "profile"}"#).unwrap();

        let store = PreferenceStore::open(&path);
        assert_eq!(store.last_page("acct1"), None);
        assert_eq!(store.last_page("acct2"), Some(Page::Profile));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_disabled_persistence_still_caches() {
        let store = PreferenceStore::open("");
        store.remember("acct1", Page::Clients);
        assert_eq!(store.last_page("acct1"), Some(Page::Clients));
    }

    #[test]
    fn test_unwritable_path_is_silent() {
        let store = PreferenceStore::open("/dev/null/impossible/prefs.json");
        store.remember("acct1", Page::Clients);
        assert_eq!(store.last_page("acct1"), Some(Page::Clients));
    }
}
