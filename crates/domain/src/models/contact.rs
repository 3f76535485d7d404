//! Contact list model.
//!
//! Agents mirror the device address book as push-keyed `"name | number"`
//! records.

use serde::Serialize;
use serde_json::Value;

/// One address-book entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub number: String,
}

impl Contact {
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(" | ");
        Self {
            name: parts.next().filter(|p| !p.is_empty()).unwrap_or("N/A").to_string(),
            number: parts.next().filter(|p| !p.is_empty()).unwrap_or("N/A").to_string(),
        }
    }
}

/// Parses the raw `contacts` node; malformed entries are skipped.
pub fn contacts_from_value(value: &Value) -> Vec<Contact> {
    value
        .as_object()
        .map(|entries| {
            entries
                .values()
                .filter_map(Value::as_str)
                .map(Contact::parse)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_contact_record() {
        let contact = Contact::parse("Alice Smith | +421900123456");
        assert_eq!(contact.name, "Alice Smith");
        assert_eq!(contact.number, "+421900123456");
    }

    #[test]
    fn test_parse_partial_record() {
        let contact = Contact::parse("Bob");
        assert_eq!(contact.name, "Bob");
        assert_eq!(contact.number, "N/A");
    }

    #[test]
    fn test_contacts_from_malformed_node() {
        assert!(contacts_from_value(&Value::Null).is_empty());
        let contacts = contacts_from_value(&json!({"c1": "Alice | 123", "c2": 42}));
        assert_eq!(contacts.len(), 1);
    }
}
