//! Connectivity notification records.
//!
//! The notification log stores opaque formatted strings of the shape
//! `"{device} {connected|disconnected} at {timestamp}"`, appended
//! newest-last. The read path parses them back for tabular display and
//! keeps anything unrecognized as raw text rather than dropping it.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Timestamp format used inside notification records. Must not contain the
/// literal `" at "` separator.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Connect/disconnect transition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityEvent {
    Connected,
    Disconnected,
}

impl ConnectivityEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

impl std::fmt::Display for ConnectivityEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Formats a notification record for appending to an account's log.
pub fn format_event(device_id: &str, event: ConnectivityEvent, at: DateTime<Utc>) -> String {
    format!("{} {} at {}", device_id, event, at.format(TIMESTAMP_FORMAT))
}

/// A notification record parsed for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Device the event belongs to, when the record matched the known shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<ConnectivityEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Original record text, always present.
    pub raw: String,
}

impl NotificationRecord {
    /// Parses a stored record. The timestamp is whatever follows the last
    /// `" at "`; the remainder must end in one of the known event words.
    pub fn parse(raw: &str) -> Self {
        let fallback = Self {
            device: None,
            event: None,
            timestamp: None,
            raw: raw.to_string(),
        };

        let Some((head, timestamp)) = raw.rsplit_once(" at ") else {
            return fallback;
        };

        let (device, event) = if let Some(device) = head.strip_suffix(" disconnected") {
            (device, ConnectivityEvent::Disconnected)
        } else if let Some(device) = head.strip_suffix(" connected") {
            (device, ConnectivityEvent::Connected)
        } else {
            return fallback;
        };

        Self {
            device: Some(device.trim().to_string()),
            event: Some(event),
            timestamp: Some(timestamp.to_string()),
            raw: raw.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_and_parse_round_trip() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let raw = format_event("pixel-7", ConnectivityEvent::Disconnected, at);
        assert_eq!(raw, "pixel-7 disconnected at 2026-03-14 09:26:53");

        let parsed = NotificationRecord::parse(&raw);
        assert_eq!(parsed.device.as_deref(), Some("pixel-7"));
        assert_eq!(parsed.event, Some(ConnectivityEvent::Disconnected));
        assert_eq!(parsed.timestamp.as_deref(), Some("2026-03-14 09:26:53"));
    }

    #[test]
    fn test_parse_connected_record() {
        let parsed = NotificationRecord::parse("pixel-7 connected at 2026-03-14 09:26:53");
        assert_eq!(parsed.event, Some(ConnectivityEvent::Connected));
        assert_eq!(parsed.device.as_deref(), Some("pixel-7"));
    }

    #[test]
    fn test_parse_splits_on_last_at_separator() {
        // A device id containing " at " must not confuse the timestamp split.
        let parsed = NotificationRecord::parse("kiosk at gate disconnected at 2026-03-14 09:26:53");
        assert_eq!(parsed.device.as_deref(), Some("kiosk at gate"));
        assert_eq!(parsed.timestamp.as_deref(), Some("2026-03-14 09:26:53"));
    }

    #[test]
    fn test_parse_keeps_unknown_records_raw() {
        let parsed = NotificationRecord::parse("maintenance window tonight");
        assert_eq!(parsed.device, None);
        assert_eq!(parsed.event, None);
        assert_eq!(parsed.raw, "maintenance window tonight");

        let parsed = NotificationRecord::parse("pixel-7 rebooted at 2026-03-14 09:26:53");
        assert_eq!(parsed.event, None);
        assert_eq!(parsed.raw, "pixel-7 rebooted at 2026-03-14 09:26:53");
    }
}
