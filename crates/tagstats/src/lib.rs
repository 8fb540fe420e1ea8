//! Top-level facade crate for tagstats.
//!
//! Re-exports the core data structures and the collector so users can depend on a single crate.

pub mod core {
    pub use tagstats_core::*;
}

pub mod collector {
    pub use tagstats_collector::*;
}
