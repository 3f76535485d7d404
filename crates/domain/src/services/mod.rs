//! Console services: snapshot normalization, connectivity diffing,
//! indicator state, and fleet statistics.

pub mod diff;
pub mod indicators;
pub mod snapshot;
pub mod stats;

pub use diff::{ConnectivityDiff, DiffOutcome, DisconnectEvent};
pub use indicators::Indicators;
