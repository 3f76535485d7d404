//! Connectivity diff engine.
//!
//! Compares consecutive normalized snapshots of one subscription and
//! reports connect/disconnect transitions. The struct is pure state plus a
//! pure transition function; the subscription adapter owning it performs
//! the side effects (notification writes, indicator signals). One instance
//! exists per attached subscription and is never shared.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::models::device::{split_device_key, DeviceRecord};

/// A detected CONNECTED -> unconnected transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectEvent {
    /// Account owning the device, derived from the composite key (or the
    /// subscribing account when the key carries no owner).
    pub owner_id: String,
    pub device_id: String,
    /// Wall-clock time of detection.
    pub at: DateTime<Utc>,
}

/// Transitions detected by one observation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOutcome {
    /// At least one device newly reached CONNECTED. Collapsed to a flag:
    /// repeated connects before the operator acknowledges are one signal.
    pub new_connection: bool,
    /// Disconnects to append to the owning accounts' notification logs.
    pub disconnects: Vec<DisconnectEvent>,
}

impl DiffOutcome {
    pub fn is_empty(&self) -> bool {
        !self.new_connection && self.disconnects.is_empty()
    }
}

/// Per-subscription diff state.
#[derive(Debug, Default)]
pub struct ConnectivityDiff {
    previous: BTreeMap<String, DeviceRecord>,
    initialized: bool,
}

impl ConnectivityDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next normalized snapshot and returns the transitions
    /// since the previous one.
    ///
    /// The first observation only primes the baseline: devices that were
    /// already connected when the listener attached must not flood the
    /// operator with synthetic events.
    pub fn observe(
        &mut self,
        current: BTreeMap<String, DeviceRecord>,
        fallback_owner: &str,
        at: DateTime<Utc>,
    ) -> DiffOutcome {
        if !self.initialized {
            self.previous = current;
            self.initialized = true;
            return DiffOutcome::default();
        }

        let mut outcome = DiffOutcome::default();
        let keys: BTreeSet<&String> = self.previous.keys().chain(current.keys()).collect();
        for key in keys {
            let was_connected = self.previous.get(key).is_some_and(DeviceRecord::is_connected);
            let is_connected = current.get(key).is_some_and(DeviceRecord::is_connected);

            if !was_connected && is_connected {
                outcome.new_connection = true;
            } else if was_connected && !is_connected {
                let (owner_id, device_id) = split_device_key(key, fallback_owner);
                outcome.disconnects.push(DisconnectEvent {
                    owner_id,
                    device_id,
                    at,
                });
            }
        }

        self.previous = current;
        outcome
    }
}
