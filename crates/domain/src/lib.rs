//! Domain layer for Fleet Console.
//!
//! This crate contains:
//! - Console domain models (devices, notifications, SMS, files, commands)
//! - The snapshot normalizer, connectivity diff engine, indicator state,
//!   and fleet statistics reduction

pub mod models;
pub mod services;
