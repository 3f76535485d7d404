//! Device domain model.
//!
//! Device records are written by the enrolled agents, not by the console,
//! and arrive as loose JSON: fields come and go between agent versions and
//! several carry alternative names. Parsing is therefore defensive: every
//! field is optional, numbers may arrive as strings, and an unusable value
//! reads as absent.

use serde::Serialize;
use serde_json::{Map, Value};

use shared::format::{display_location, format_megabytes};

/// Connection status as reported by the agent. Anything but `CONNECTED`
/// counts as offline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Other(String),
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connected => "CONNECTED",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for ConnectionStatus {
    fn from(raw: &str) -> Self {
        if raw == "CONNECTED" {
            Self::Connected
        } else {
            Self::Other(raw.to_string())
        }
    }
}

/// Transfer counters in raw bytes. Absent or non-numeric values read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    pub sent: u64,
    pub received: u64,
}

/// Battery level, which agents report either as a percentage number or as
/// a preformatted string.
#[derive(Debug, Clone, PartialEq)]
pub enum BatteryLevel {
    Percent(i64),
    Text(String),
}

impl std::fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{}%", p),
            Self::Text(t) => write!(f, "{}", t),
        }
    }
}

/// One device's state as found in the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceRecord {
    pub status: Option<ConnectionStatus>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub manufacturer: Option<String>,
    pub android_version: Option<String>,
    pub last_seen: Option<String>,
    pub last_seen_readable: Option<String>,
    pub battery: Option<BatteryLevel>,
    pub carrier: Option<String>,
    pub network_operator: Option<String>,
    pub sim_operator: Option<String>,
    pub network_type: Option<String>,
    pub connection_type: Option<String>,
    pub ip_address: Option<String>,
    pub ip: Option<String>,
    pub local_ip: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub uptime: Option<String>,
    pub uptime_readable: Option<String>,
    pub stats: TransferStats,
}

impl DeviceRecord {
    /// Parses a device node. Returns `None` for null/non-object values, so
    /// absent devices contribute no entry to a normalized snapshot.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let stats = map
            .get("stats")
            .and_then(Value::as_object)
            .map(|s| TransferStats {
                sent: counter_field(s, "sent"),
                received: counter_field(s, "received"),
            })
            .unwrap_or_default();

        Some(Self {
            status: map
                .get("status")
                .and_then(Value::as_str)
                .map(ConnectionStatus::from),
            model: string_field(map, "model"),
            brand: string_field(map, "brand"),
            manufacturer: string_field(map, "manufacturer"),
            android_version: string_field(map, "androidVersion"),
            last_seen: string_field(map, "lastSeen"),
            last_seen_readable: string_field(map, "lastSeenReadable"),
            battery: battery_field(map),
            carrier: string_field(map, "carrier"),
            network_operator: string_field(map, "networkOperator"),
            sim_operator: string_field(map, "simOperator"),
            network_type: string_field(map, "networkType"),
            connection_type: string_field(map, "connectionType"),
            ip_address: string_field(map, "ipAddress"),
            ip: string_field(map, "ip"),
            local_ip: string_field(map, "localIp"),
            location: string_field(map, "location"),
            country: string_field(map, "country"),
            region: string_field(map, "region"),
            city: string_field(map, "city"),
            uptime: string_field(map, "uptime"),
            uptime_readable: string_field(map, "uptimeReadable"),
            stats,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.status == Some(ConnectionStatus::Connected)
    }

    /// Status label for display, `UNKNOWN` when the agent sent none.
    pub fn status_label(&self) -> &str {
        self.status.as_ref().map_or("UNKNOWN", |s| s.as_str())
    }

    pub fn vendor(&self) -> Option<&str> {
        self.brand.as_deref().or(self.manufacturer.as_deref())
    }

    pub fn carrier_label(&self) -> Option<&str> {
        self.carrier
            .as_deref()
            .or(self.network_operator.as_deref())
            .or(self.sim_operator.as_deref())
    }

    pub fn network_label(&self) -> Option<&str> {
        self.network_type.as_deref().or(self.connection_type.as_deref())
    }

    pub fn ip_label(&self) -> Option<&str> {
        self.ip_address
            .as_deref()
            .or(self.ip.as_deref())
            .or(self.local_ip.as_deref())
    }

    pub fn location_label(&self) -> Option<&str> {
        self.location
            .as_deref()
            .or(self.country.as_deref())
            .or(self.region.as_deref())
            .or(self.city.as_deref())
    }

    pub fn uptime_label(&self) -> Option<&str> {
        self.uptime_readable.as_deref().or(self.uptime.as_deref())
    }

    pub fn last_seen_label(&self) -> Option<&str> {
        self.last_seen_readable.as_deref().or(self.last_seen.as_deref())
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn battery_field(map: &Map<String, Value>) -> Option<BatteryLevel> {
    let raw = map
        .get("batteryLevel")
        .filter(|v| !v.is_null())
        .or_else(|| map.get("battery"))?;
    match raw {
        Value::Number(n) => n.as_i64().map(BatteryLevel::Percent),
        Value::String(s) if !s.is_empty() => Some(BatteryLevel::Text(s.clone())),
        _ => None,
    }
}

/// Coerces a counter to a non-negative integer; numeric strings count,
/// anything else reads as 0.
fn counter_field(map: &Map<String, Value>, key: &str) -> u64 {
    match map.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
            .unwrap_or(0),
        _ => 0,
    }
}

/// Splits a composite `account/device` key on its last separator. A key
/// without a separator belongs to `fallback_owner`.
pub fn split_device_key(key: &str, fallback_owner: &str) -> (String, String) {
    match key.rsplit_once('/') {
        Some((owner, device)) => (owner.to_string(), device.to_string()),
        None => (fallback_owner.to_string(), key.to_string()),
    }
}

/// Rendered device card for the console's clients view.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCard {
    pub owner_id: String,
    pub device_key: String,
    pub display_name: String,
    pub vendor: String,
    pub status: String,
    pub online: bool,
    pub last_seen: String,
    pub android_version: String,
    pub battery: String,
    pub carrier: String,
    pub sent_mb: String,
    pub received_mb: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Set when the agent sent no model, so the key stays visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl DeviceCard {
    pub fn from_record(owner_id: &str, device_key: &str, record: &DeviceRecord) -> Self {
        let na = || "N/A".to_string();
        Self {
            owner_id: owner_id.to_string(),
            device_key: device_key.to_string(),
            display_name: record.model.clone().unwrap_or_else(|| device_key.to_string()),
            vendor: record.vendor().map_or_else(|| "Unknown vendor".to_string(), str::to_string),
            status: record.status_label().to_string(),
            online: record.is_connected(),
            last_seen: record.last_seen_label().map_or_else(na, str::to_string),
            android_version: record.android_version.clone().unwrap_or_else(na),
            battery: record.battery.as_ref().map_or_else(na, ToString::to_string),
            carrier: record.carrier_label().map_or_else(na, str::to_string),
            sent_mb: format_megabytes(record.stats.sent),
            received_mb: format_megabytes(record.stats.received),
            network_type: record.network_label().map(str::to_string),
            uptime: record.uptime_label().map(str::to_string),
            ip_address: record.ip_label().map(str::to_string),
            location: record.location_label().map(|l| display_location(l)),
            device_id: record.model.is_none().then(|| device_key.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(DeviceRecord::from_value(&Value::Null).is_none());
        assert!(DeviceRecord::from_value(&json!("CONNECTED")).is_none());
        assert!(DeviceRecord::from_value(&json!(42)).is_none());
    }

    #[test]
    fn test_from_value_defaults_everything() {
        let record = DeviceRecord::from_value(&json!({})).unwrap();
        assert_eq!(record.status, None);
        assert!(!record.is_connected());
        assert_eq!(record.status_label(), "UNKNOWN");
        assert_eq!(record.stats, TransferStats::default());
    }

    #[test]
    fn test_status_parsing() {
        let record = DeviceRecord::from_value(&json!({"status": "CONNECTED"})).unwrap();
        assert!(record.is_connected());

        let record = DeviceRecord::from_value(&json!({"status": "IDLE"})).unwrap();
        assert!(!record.is_connected());
        assert_eq!(record.status_label(), "IDLE");
    }

    #[test]
    fn test_counter_coercion() {
        let record = DeviceRecord::from_value(&json!({
            "stats": {"sent": 1024, "received": "2048"}
        }))
        .unwrap();
        assert_eq!(record.stats.sent, 1024);
        assert_eq!(record.stats.received, 2048);

        let record = DeviceRecord::from_value(&json!({
            "stats": {"sent": "garbage", "received": -5}
        }))
        .unwrap();
        assert_eq!(record.stats.sent, 0);
        assert_eq!(record.stats.received, 0);
    }

    #[test]
    fn test_display_precedence_chains() {
        let record = DeviceRecord::from_value(&json!({
            "manufacturer": "Acme",
            "networkOperator": "CarrierB",
            "simOperator": "CarrierC",
            "ip": "10.0.0.2",
            "localIp": "192.168.0.2",
            "country": "Slovakia",
        }))
        .unwrap();
        assert_eq!(record.vendor(), Some("Acme"));
        assert_eq!(record.carrier_label(), Some("CarrierB"));
        assert_eq!(record.ip_label(), Some("10.0.0.2"));
        assert_eq!(record.location_label(), Some("Slovakia"));
    }

    #[test]
    fn test_battery_number_and_text() {
        let record = DeviceRecord::from_value(&json!({"batteryLevel": 87})).unwrap();
        assert_eq!(record.battery.unwrap().to_string(), "87%");

        let record = DeviceRecord::from_value(&json!({"battery": "charging"})).unwrap();
        assert_eq!(record.battery.unwrap().to_string(), "charging");
    }

    #[test]
    fn test_split_device_key() {
        assert_eq!(
            split_device_key("acct1/deviceX", "me"),
            ("acct1".to_string(), "deviceX".to_string())
        );
        assert_eq!(
            split_device_key("deviceX", "me"),
            ("me".to_string(), "deviceX".to_string())
        );
    }

    #[test]
    fn test_device_card_defaults() {
        let record = DeviceRecord::from_value(&json!({})).unwrap();
        let card = DeviceCard::from_record("acct1", "pixel-7", &record);
        assert_eq!(card.display_name, "pixel-7");
        assert_eq!(card.vendor, "Unknown vendor");
        assert_eq!(card.status, "UNKNOWN");
        assert_eq!(card.battery, "N/A");
        assert_eq!(card.sent_mb, "0.00");
        assert_eq!(card.device_id.as_deref(), Some("pixel-7"));
    }

    #[test]
    fn test_device_card_location_unescaped() {
        let record = DeviceRecord::from_value(&json!({
            "model": "Pixel 7",
            "location": "New_York"
        }))
        .unwrap();
        let card = DeviceCard::from_record("acct1", "pixel-7", &record);
        assert_eq!(card.location.as_deref(), Some("New York"));
        assert_eq!(card.device_id, None);
    }
}
