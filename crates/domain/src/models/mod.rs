//! Domain models for Fleet Console.

pub mod call_log;
pub mod command;
pub mod contact;
pub mod device;
pub mod file_tree;
pub mod notification;
pub mod page;
pub mod sms;
pub mod stats;

pub use device::{DeviceCard, DeviceRecord};
pub use file_tree::FileNode;
pub use notification::NotificationRecord;
pub use page::Page;
pub use stats::FleetStats;
