//! Fleet statistics reduction.

use std::collections::BTreeMap;

use crate::models::device::DeviceRecord;
use crate::models::stats::FleetStats;

/// Reduces a normalized snapshot to aggregate counters. Stateless: always
/// recomputed from scratch, so it cannot drift from the snapshot it was
/// derived from.
pub fn fleet_stats(devices: &BTreeMap<String, DeviceRecord>) -> FleetStats {
    let total = devices.len() as u64;
    let mut online = 0u64;
    let mut sent = 0u64;
    let mut received = 0u64;

    for record in devices.values() {
        if record.is_connected() {
            online += 1;
        }
        sent = sent.saturating_add(record.stats.sent);
        received = received.saturating_add(record.stats.received);
    }

    FleetStats::new(total, online, sent, received)
}
