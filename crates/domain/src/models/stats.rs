//! Fleet statistics model.

use serde::Serialize;

use shared::format::format_megabytes;

/// Aggregate counters shown on the clients and connections pages.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FleetStats {
    pub total: u64,
    pub online: u64,
    pub sent_bytes: u64,
    pub received_bytes: u64,
    pub sent_mb: String,
    pub received_mb: String,
}

impl FleetStats {
    pub fn new(total: u64, online: u64, sent_bytes: u64, received_bytes: u64) -> Self {
        Self {
            total,
            online,
            sent_bytes,
            received_bytes,
            sent_mb: format_megabytes(sent_bytes),
            received_mb: format_megabytes(received_bytes),
        }
    }
}

impl Default for FleetStats {
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_counters() {
        let stats = FleetStats::new(3, 1, 2_097_152, 0);
        assert_eq!(stats.sent_mb, "2.00");
        assert_eq!(stats.received_mb, "0.00");
    }
}
