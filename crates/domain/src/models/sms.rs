//! SMS conversation model.
//!
//! Agents mirror a device's SMS store as `sms/{address}/{messageId}` with
//! each message encoded as `"timestamp | body"`. Addresses use the store's
//! key escaping (`_` for `.`). Threads are presented named-senders-first
//! (alphabetic addresses are typically service senders), then by most
//! recent activity; messages inside a thread run oldest-first.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use shared::format::display_key;

/// One mirrored SMS message.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SmsMessage {
    pub id: String,
    pub timestamp: String,
    pub body: String,
}

impl SmsMessage {
    /// Parses a `"timestamp | body"` record; the body may itself contain
    /// the separator.
    pub fn parse(id: &str, raw: &str) -> Self {
        let mut parts = raw.split(" | ");
        let timestamp = parts.next().filter(|p| !p.is_empty()).unwrap_or("N/A");
        let body = parts.collect::<Vec<_>>().join(" | ");
        Self {
            id: id.to_string(),
            timestamp: timestamp.to_string(),
            body: if body.is_empty() { "N/A".to_string() } else { body },
        }
    }
}

/// One conversation thread, keyed by sender address.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Address as stored (escaped), used for delete paths.
    pub address: String,
    /// Address for display (unescaped).
    pub display_address: String,
    pub messages: Vec<SmsMessage>,
}

/// Builds display-ordered conversations from the raw `sms` node.
pub fn conversations_from_value(value: &Value) -> Vec<Conversation> {
    let Some(threads) = value.as_object() else {
        return Vec::new();
    };

    let mut conversations: Vec<(Option<DateTime<Utc>>, Conversation)> = threads
        .iter()
        .filter_map(|(address, messages)| {
            let messages = messages.as_object()?;
            let mut parsed: Vec<SmsMessage> = messages
                .iter()
                .filter_map(|(id, raw)| raw.as_str().map(|r| SmsMessage::parse(id, r)))
                .collect();
            if parsed.is_empty() {
                return None;
            }
            parsed.sort_by_key(|m| parse_loose_timestamp(&m.timestamp));
            let latest = parsed
                .iter()
                .filter_map(|m| parse_loose_timestamp(&m.timestamp))
                .max();
            Some((
                latest,
                Conversation {
                    address: address.clone(),
                    display_address: display_key(address),
                    messages: parsed,
                },
            ))
        })
        .collect();

    conversations.sort_by(|(a_latest, a), (b_latest, b)| {
        let a_named = starts_alphabetic(&a.address);
        let b_named = starts_alphabetic(&b.address);
        b_named
            .cmp(&a_named)
            .then_with(|| b_latest.cmp(a_latest))
            .then_with(|| a.address.cmp(&b.address))
    });

    conversations.into_iter().map(|(_, c)| c).collect()
}

fn starts_alphabetic(address: &str) -> bool {
    address.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Best-effort timestamp parsing across the formats agents are known to
/// send. Unparseable timestamps sort as oldest.
pub fn parse_loose_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y, %I:%M:%S %p",
        "%d/%m/%Y, %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    // Epoch milliseconds as a final fallback.
    raw.parse::<i64>()
        .ok()
        .and_then(|millis| DateTime::from_timestamp_millis(millis))
}
