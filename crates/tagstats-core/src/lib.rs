//! tagstats core: bounded ring storage, per-tag data, report records, and errors.
//!
//! This crate holds the in-memory structures shared by the collector and any
//! reporting front end. It performs no I/O and carries no runtime dependencies,
//! so every operation is a short synchronous call safe to make from any thread.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Recording never fails for any datum; configuration mistakes surface as
//! `StatsError` when a tag is created.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod bounded;
pub mod clock;
pub mod data;
pub mod error;
pub mod format;
pub mod report;

pub use bounded::BoundedMap;
pub use clock::{Clock, ManualClock, SystemClock};
pub use data::{rate_per_minute, Data, Datum, Entry, Stamp};
/// Shared result type.
pub use error::{Result, StatsError};
pub use report::{is_detail_forbidden, sort_records, Detail, ForbiddenDetail, Record};
