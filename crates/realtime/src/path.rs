//! Store path handling.
//!
//! Paths address nodes in the hierarchical store as `/`-separated segments.
//! Segments must be non-empty and must not contain the separator; account
//! ids and device keys are required to respect this (a key containing `/`
//! would be indistinguishable from a deeper path).

use std::fmt;

use crate::error::{Result, StoreError};

/// An absolute path into the hierarchical store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// The store root.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parses a `/`-separated path. Leading/trailing separators are allowed.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut path = Self::root();
        for segment in raw.split('/').filter(|s| !s.is_empty()) {
            path = path.child(segment)?;
        }
        Ok(path)
    }

    /// Extends the path by one segment.
    pub fn child(mut self, segment: &str) -> Result<Self> {
        if segment.is_empty() || segment.contains('/') {
            return Err(StoreError::InvalidPath(format!(
                "invalid segment {:?}",
                segment
            )));
        }
        self.segments.push(segment.to_string());
        Ok(self)
    }

    /// The path's segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True if `self` is `other` or an ancestor of `other`.
    pub fn contains(&self, other: &StorePath) -> bool {
        other.segments.len() >= self.segments.len()
            && self.segments.iter().zip(&other.segments).all(|(a, b)| a == b)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Conventional store layout used by the console and device agents.
pub mod paths {
    use super::StorePath;
    use crate::error::Result;

    /// `users`: all accounts, watched by the owner session.
    pub fn accounts_root() -> StorePath {
        StorePath::parse("users").expect("static path")
    }

    /// `users/{account}`.
    pub fn account(account_id: &str) -> Result<StorePath> {
        accounts_root().child(account_id)
    }

    /// `users/{account}/devices`.
    pub fn devices(account_id: &str) -> Result<StorePath> {
        account(account_id)?.child("devices")
    }

    /// `users/{account}/devices/{device}`.
    pub fn device(account_id: &str, device_key: &str) -> Result<StorePath> {
        devices(account_id)?.child(device_key)
    }

    /// `users/{account}/notifications`.
    pub fn notifications(account_id: &str) -> Result<StorePath> {
        account(account_id)?.child("notifications")
    }

    /// `users/{account}/devices/{device}/{node}` for device sub-collections
    /// (`sms`, `contacts`, `call_logs`, `files`, `commands`, `upload_requests`,
    /// `uploaded_files`).
    pub fn device_node(account_id: &str, device_key: &str, node: &str) -> Result<StorePath> {
        device(account_id, device_key)?.child(node)
    }

    /// `users/{account}/devices/{device}/sms/{address}/{message}`.
    pub fn sms_message(
        account_id: &str,
        device_key: &str,
        address: &str,
        message_id: &str,
    ) -> Result<StorePath> {
        device_node(account_id, device_key, "sms")?
            .child(address)?
            .child(message_id)
    }

    /// `users/{account}/devices/{device}/upload_requests/{name}`.
    pub fn upload_request(account_id: &str, device_key: &str, name: &str) -> Result<StorePath> {
        device_node(account_id, device_key, "upload_requests")?.child(name)
    }

    /// `users/{account}/devices/{device}/uploaded_files/{id}`.
    pub fn uploaded_file(account_id: &str, device_key: &str, id: &str) -> Result<StorePath> {
        device_node(account_id, device_key, "uploaded_files")?.child(id)
    }
}
