//! Report rendering for operators.
//!
//! Records are rendered as a plain table, JSON, or Prometheus text exposition.

pub mod exposition;

pub use exposition::{render, render_json, render_prometheus, render_text};
