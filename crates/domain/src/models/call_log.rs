//! Call log model.
//!
//! Mirrored call history records are encoded as
//! `"number | type | duration | date"`.

use serde::Serialize;
use serde_json::Value;

/// One call history entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallLogEntry {
    pub number: String,
    pub call_type: String,
    pub duration: String,
    pub date: String,
}

impl CallLogEntry {
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(" | ");
        let mut next = || parts.next().filter(|p| !p.is_empty()).unwrap_or("N/A").to_string();
        Self {
            number: next(),
            call_type: next(),
            duration: next(),
            date: next(),
        }
    }
}

/// Parses the raw `call_logs` node; malformed entries are skipped.
pub fn call_logs_from_value(value: &Value) -> Vec<CallLogEntry> {
    value
        .as_object()
        .map(|entries| {
            entries
                .values()
                .filter_map(Value::as_str)
                .map(CallLogEntry::parse)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let entry = CallLogEntry::parse("+421900123456 | OUTGOING | 00:02:31 | 2026-03-14");
        assert_eq!(entry.number, "+421900123456");
        assert_eq!(entry.call_type, "OUTGOING");
        assert_eq!(entry.duration, "00:02:31");
        assert_eq!(entry.date, "2026-03-14");
    }

    #[test]
    fn test_parse_short_record_pads_fields() {
        let entry = CallLogEntry::parse("+421900123456 | MISSED");
        assert_eq!(entry.duration, "N/A");
        assert_eq!(entry.date, "N/A");
    }
}
