//! Virtual file tree model.
//!
//! Agents mirror a device's file system as a recursive store node. A node
//! is exactly one of: directory (`isDirectory` with a `children` mapping),
//! remote content (`contentUri`, fetchable on request), already downloaded
//! (`downloadUrl`), or opaque (none of the marker fields). When several
//! markers appear, `downloadUrl` wins over `contentUri`, which wins over
//! the directory flag. Key names use the store escaping (`_` for `.`).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use shared::format::display_key;

/// One node of the mirrored file tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FileNode {
    Directory { children: BTreeMap<String, FileNode> },
    Remote { content_uri: String },
    Downloaded { download_url: String },
    Opaque,
}

impl FileNode {
    /// Parses a single node.
    pub fn parse(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::Opaque;
        };

        if let Some(url) = map.get("downloadUrl").and_then(Value::as_str) {
            return Self::Downloaded {
                download_url: url.to_string(),
            };
        }
        if let Some(uri) = map.get("contentUri").and_then(Value::as_str) {
            return Self::Remote {
                content_uri: uri.to_string(),
            };
        }
        if map.get("isDirectory").and_then(Value::as_bool) == Some(true) {
            return Self::Directory {
                children: parse_children(map.get("children").unwrap_or(&Value::Null)),
            };
        }
        Self::Opaque
    }

    pub fn content_uri(&self) -> Option<&str> {
        match self {
            Self::Remote { content_uri } => Some(content_uri),
            _ => None,
        }
    }
}

/// Parses a `children` mapping (also the shape of the tree root).
pub fn parse_children(value: &Value) -> BTreeMap<String, FileNode> {
    value
        .as_object()
        .map(|entries| {
            entries
                .iter()
                .map(|(name, node)| (name.clone(), FileNode::parse(node)))
                .collect()
        })
        .unwrap_or_default()
}

/// Walks a path of key segments down directory children.
pub fn resolve<'t>(
    root: &'t BTreeMap<String, FileNode>,
    segments: &[String],
) -> Option<&'t FileNode> {
    let (first, rest) = segments.split_first()?;
    let node = root.get(first)?;
    if rest.is_empty() {
        return Some(node);
    }
    match node {
        FileNode::Directory { children } => resolve(children, rest),
        _ => None,
    }
}

/// Serializable tree view for the console's file manager.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileNodeView {
    pub name: String,
    pub display_name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNodeView>>,
}

impl FileNodeView {
    pub fn from_node(name: &str, node: &FileNode) -> Self {
        let mut view = Self {
            name: name.to_string(),
            display_name: display_key(name),
            kind: "file",
            download_url: None,
            content_uri: None,
            children: None,
        };
        match node {
            FileNode::Directory { children } => {
                view.kind = "directory";
                view.children = Some(
                    children
                        .iter()
                        .map(|(name, child)| Self::from_node(name, child))
                        .collect(),
                );
            }
            FileNode::Remote { content_uri } => {
                view.kind = "remote";
                view.content_uri = Some(content_uri.clone());
            }
            FileNode::Downloaded { download_url } => {
                view.kind = "downloaded";
                view.download_url = Some(download_url.clone());
            }
            FileNode::Opaque => {}
        }
        view
    }
}

/// Store path (as a string) of a file's record inside the device's `files`
/// node; directory levels interleave `children`.
pub fn upload_file_db_path(
    account_id: &str,
    device_key: &str,
    segments: &[String],
    name: &str,
) -> String {
    let mut path = format!("users/{}/devices/{}/files", account_id, device_key);
    for segment in segments {
        path.push('/');
        path.push_str(segment);
        path.push_str("/children");
    }
    path.push('/');
    path.push_str(name);
    path
}

/// Destination path for the agent-side transfer, with display-unescaped
/// file name.
pub fn upload_file_path(device_key: &str, segments: &[String], name: &str) -> String {
    let mut parts = vec!["files".to_string(), device_key.to_string()];
    parts.extend(segments.iter().cloned());
    parts.push(display_key(name));
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classification_precedence() {
        let node = FileNode::parse(&json!({
            "downloadUrl": "https://cdn.example/x",
            "contentUri": "content://media/1",
            "isDirectory": true,
        }));
        assert!(matches!(node, FileNode::Downloaded { .. }));

        let node = FileNode::parse(&json!({
            "contentUri": "content://media/1",
            "isDirectory": true,
        }));
        assert!(matches!(node, FileNode::Remote { .. }));

        let node = FileNode::parse(&json!({"isDirectory": true}));
        assert!(matches!(node, FileNode::Directory { .. }));

        let node = FileNode::parse(&json!({"size": 1024}));
        assert_eq!(node, FileNode::Opaque);
    }

    #[test]
    fn test_parse_nested_tree_and_resolve() {
        let tree = parse_children(&json!({
            "DCIM": {
                "isDirectory": true,
                "children": {
                    "IMG_0001_jpg": {"contentUri": "content://media/1"}
                }
            },
            "notes_txt": {}
        }));

        let segments = vec!["DCIM".to_string(), "IMG_0001_jpg".to_string()];
        let node = resolve(&tree, &segments).unwrap();
        assert_eq!(node.content_uri(), Some("content://media/1"));

        // A non-directory in the middle of the path resolves to nothing.
        let bad = vec!["notes_txt".to_string(), "x".to_string()];
        assert!(resolve(&tree, &bad).is_none());
    }

    #[test]
    fn test_view_unescapes_names() {
        let tree = parse_children(&json!({
            "IMG_0001_jpg": {"contentUri": "content://media/1"}
        }));
        let view = FileNodeView::from_node("IMG_0001_jpg", tree.get("IMG_0001_jpg").unwrap());
        assert_eq!(view.display_name, "IMG.0001.jpg");
        assert_eq!(view.kind, "remote");
    }

    #[test]
    fn test_upload_file_db_path_interleaves_children() {
        let segments = vec!["DCIM".to_string(), "Camera".to_string()];
        assert_eq!(
            upload_file_db_path("acct1", "pixel", &segments, "IMG_0001_jpg"),
            "users/acct1/devices/pixel/files/DCIM/children/Camera/children/IMG_0001_jpg"
        );
        assert_eq!(
            upload_file_db_path("acct1", "pixel", &[], "notes_txt"),
            "users/acct1/devices/pixel/files/notes_txt"
        );
    }

    #[test]
    fn test_upload_file_path_uses_display_name() {
        let segments = vec!["DCIM".to_string()];
        assert_eq!(
            upload_file_path("pixel", &segments, "IMG_0001_jpg"),
            "files/pixel/DCIM/IMG.0001.jpg"
        );
    }
}
