//! Report records and detail redaction.

use serde::Serialize;

use crate::data::Entry;

/// Tags whose per-event values are never shown in detail views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenDetail {
    SentPrivateMessage,
}

impl ForbiddenDetail {
    pub const ALL: [ForbiddenDetail; 1] = [ForbiddenDetail::SentPrivateMessage];

    pub fn as_str(self) -> &'static str {
        match self {
            ForbiddenDetail::SentPrivateMessage => "Sent private message",
        }
    }
}

/// Exact, case-sensitive match against the deny-list.
pub fn is_detail_forbidden(tag: &str) -> bool {
    ForbiddenDetail::ALL.iter().any(|f| f.as_str() == tag)
}

/// Summary of one tag, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub tag: String,
    /// Events per minute over the retained window.
    pub rate: f64,
    /// Lifetime event count.
    pub count: u64,
    pub detail_forbidden: bool,
}

impl Record {
    pub fn new(tag: impl Into<String>, rate: f64, count: u64) -> Self {
        let tag = tag.into();
        let detail_forbidden = is_detail_forbidden(&tag);
        Self {
            tag,
            rate,
            count,
            detail_forbidden,
        }
    }

    /// Records are ordered by tag alone; rate and count never break ties.
    pub fn sort_key(&self) -> &str {
        &self.tag
    }
}

/// Stable lexicographic sort by [`Record::sort_key`].
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
}

/// Drill-down view of one tag. `values` is `None` when detail is forbidden;
/// the aggregate record is always present.
#[derive(Debug, Clone, Serialize)]
pub struct Detail {
    pub record: Record,
    pub values: Option<Vec<Entry>>,
}

impl Detail {
    pub fn new(record: Record, values: Vec<Entry>) -> Self {
        let values = if record.detail_forbidden { None } else { Some(values) };
        Self { record, values }
    }
}
