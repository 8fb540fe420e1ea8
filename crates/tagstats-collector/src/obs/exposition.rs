//! Renderers for sorted report records.

use std::fmt::Write;

use tagstats_core::error::{Result, StatsError};
use tagstats_core::Record;

use crate::config::ReportFormat;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Render in the configured format.
pub fn render(format: ReportFormat, records: &[Record], restart_time_ms: i64) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(records)),
        ReportFormat::Json => render_json(records),
        ReportFormat::Prometheus => Ok(render_prometheus(records, restart_time_ms)),
    }
}

/// Aligned table: tag, events/minute, lifetime count.
pub fn render_text(records: &[Record]) -> String {
    let width = records
        .iter()
        .map(|r| r.tag.chars().count())
        .max()
        .unwrap_or(0)
        .max("TAG".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  {:>12}  {:>10}", "TAG", "PER_MINUTE", "COUNT");
    for r in records {
        let _ = writeln!(out, "{:<width$}  {:>12.2}  {:>10}", r.tag, r.rate, r.count);
    }
    out
}

pub fn render_json(records: &[Record]) -> Result<String> {
    serde_json::to_string(records).map_err(|e| StatsError::Internal(format!("render json failed: {e}")))
}

/// Render in Prometheus text exposition format.
pub fn render_prometheus(records: &[Record], restart_time_ms: i64) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# TYPE tagstats_events_total counter");
    for r in records {
        let _ = writeln!(out, "tagstats_events_total{{tag=\"{}\"}} {}", escape_label(&r.tag), r.count);
    }

    let _ = writeln!(out, "# TYPE tagstats_rate_per_minute gauge");
    for r in records {
        let _ = writeln!(out, "tagstats_rate_per_minute{{tag=\"{}\"}} {}", escape_label(&r.tag), r.rate);
    }

    let _ = writeln!(out, "# TYPE tagstats_restart_time_ms gauge\ntagstats_restart_time_ms {}", restart_time_ms);
    out
}
