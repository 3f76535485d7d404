//! Snapshot normalization.
//!
//! Subscription payloads arrive in one of two shapes: the owner session
//! watches the accounts root (two tiers, account -> devices), everyone
//! else watches their own `devices` node (one tier). Both flatten into an
//! ordered map of composite/plain key to device record, which every
//! downstream consumer (diff engine, statistics, listings) works from.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::device::DeviceRecord;

/// Flattens the accounts-root payload into `account/device` keyed records.
/// Accounts without a `devices` mapping contribute nothing.
pub fn normalize_owner(payload: &Value) -> BTreeMap<String, DeviceRecord> {
    let mut flat = BTreeMap::new();
    let Some(accounts) = payload.as_object() else {
        return flat;
    };
    for (account_id, account) in accounts {
        let Some(devices) = account.get("devices").and_then(Value::as_object) else {
            continue;
        };
        for (device_key, device) in devices {
            if let Some(record) = DeviceRecord::from_value(device) {
                flat.insert(format!("{}/{}", account_id, device_key), record);
            }
        }
    }
    flat
}

/// Normalizes a single account's `devices` payload; keys stay verbatim.
pub fn normalize_account(payload: &Value) -> BTreeMap<String, DeviceRecord> {
    let mut flat = BTreeMap::new();
    let Some(devices) = payload.as_object() else {
        return flat;
    };
    for (device_key, device) in devices {
        if let Some(record) = DeviceRecord::from_value(device) {
            flat.insert(device_key.clone(), record);
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_payload_is_empty() {
        assert!(normalize_owner(&Value::Null).is_empty());
        assert!(normalize_account(&Value::Null).is_empty());
        assert!(normalize_owner(&json!("bogus")).is_empty());
    }

    #[test]
    fn test_owner_flattening() {
        let payload = json!({
            "acct1": {
                "devices": {
                    "pixel": {"status": "CONNECTED"},
                    "tab": {"status": "IDLE"},
                }
            },
            "acct2": {
                "devices": {"mi-9": {"status": "CONNECTED"}}
            },
            "acct3": {"notifications": {"n1": "x"}},
        });

        let flat = normalize_owner(&payload);
        let keys: Vec<_> = flat.keys().cloned().collect();
        assert_eq!(keys, vec!["acct1/pixel", "acct1/tab", "acct2/mi-9"]);
        assert!(flat["acct1/pixel"].is_connected());
        assert!(!flat["acct1/tab"].is_connected());
    }

    #[test]
    fn test_null_devices_contribute_nothing() {
        let payload = json!({
            "acct1": {
                "devices": {
                    "pixel": null,
                    "tab": {"status": "IDLE"},
                }
            },
        });
        let flat = normalize_owner(&payload);
        assert_eq!(flat.len(), 1);
        assert!(flat.contains_key("acct1/tab"));
    }

    #[test]
    fn test_account_keys_verbatim() {
        let payload = json!({
            "pixel": {"status": "CONNECTED"},
            "with/slash-free-keys-only": null,
        });
        let flat = normalize_account(&payload);
        assert_eq!(flat.len(), 1);
        assert!(flat.contains_key("pixel"));
    }
}
