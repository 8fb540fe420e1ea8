//! tagstats collector library entry.
//!
//! This crate wires configuration, the live settings gate, the event bus, and
//! the tag registry into a collector. It is consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod bus;
pub mod config;
pub mod ingest;
pub mod obs;
pub mod registry;
pub mod settings;

pub use bus::{EventBus, EventHandler, StatsEvent, SubscriptionId};
pub use registry::StatsRegistry;
pub use settings::StatsSettings;
