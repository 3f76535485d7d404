//! Device command records.
//!
//! Commands are write-only from the console's perspective: they are pushed
//! to a device's `commands` queue (or set under `upload_requests`) and the
//! enrolled agent is solely responsible for consuming them. Results, when
//! any, surface through dedicated sub-collections (`uploaded_files`).

use serde::{Deserialize, Serialize};

/// A command pushed to a device's `commands` queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DeviceCommand {
    /// Ask the device to send an SMS.
    #[serde(rename = "sendsms")]
    SendSms { recipient: String, message: String },
}

impl DeviceCommand {
    /// Builds a send-SMS command, trimming both fields the way the agent
    /// expects them.
    pub fn send_sms(recipient: &str, message: &str) -> Self {
        Self::SendSms {
            recipient: recipient.trim().to_string(),
            message: message.trim().to_string(),
        }
    }
}

/// Request set at `upload_requests/{name}` asking the agent to upload one
/// file from the mirrored tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub content_uri: String,
    /// Agent-side destination path.
    pub file_path: String,
    /// Store path of the file's tree record, for the agent to update once
    /// the transfer finishes.
    pub file_db_path: String,
}

/// Request pushed to `upload_requests` asking the agent to make a file
/// available for operator download.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub content_uri: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_sms_wire_shape() {
        let command = DeviceCommand::send_sms(" +421900123456 ", " hello ");
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({
                "type": "sendsms",
                "recipient": "+421900123456",
                "message": "hello",
            })
        );
    }

    #[test]
    fn test_upload_request_wire_shape() {
        let request = UploadRequest {
            content_uri: "content://media/1".into(),
            file_path: "files/pixel/DCIM/IMG.0001.jpg".into(),
            file_db_path: "users/a/devices/pixel/files/DCIM/children/IMG_0001_jpg".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contentUri"], "content://media/1");
        assert_eq!(value["filePath"], "files/pixel/DCIM/IMG.0001.jpg");
        assert!(value["fileDbPath"].as_str().unwrap().contains("/children/"));
    }

    #[test]
    fn test_download_request_wire_shape() {
        let request = DownloadRequest {
            content_uri: "content://media/1".into(),
            name: "IMG.0001.jpg".into(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"contentUri": "content://media/1", "name": "IMG.0001.jpg"})
        );
    }
}
