use serde::Deserialize;
use tagstats_core::error::{Result, StatsError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    pub version: u32,

    #[serde(default)]
    pub stats: StatsSection,

    #[serde(default)]
    pub report: ReportSection,
}

impl CollectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(StatsError::UnsupportedVersion);
        }

        self.stats.validate()?;
        self.report.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsSection {
    /// Activation gate. Re-read on every event.
    #[serde(default = "default_active")]
    pub active: bool,

    /// Ring capacity for each tag, read when the tag is created.
    #[serde(default = "default_ring_size")]
    pub ring_size: usize,
}

impl Default for StatsSection {
    fn default() -> Self {
        Self {
            active: default_active(),
            ring_size: default_ring_size(),
        }
    }
}

impl StatsSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=1_000_000).contains(&self.ring_size) {
            return Err(StatsError::BadConfig(
                "stats.ring_size must be between 1 and 1000000".into(),
            ));
        }
        Ok(())
    }
}

fn default_active() -> bool {
    true
}
fn default_ring_size() -> usize {
    100
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default)]
    pub format: ReportFormat,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            format: ReportFormat::default(),
        }
    }
}

impl ReportSection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=3_600_000).contains(&self.interval_ms) {
            return Err(StatsError::BadConfig(
                "report.interval_ms must be between 1000 and 3600000".into(),
            ));
        }
        Ok(())
    }
}

fn default_interval_ms() -> u64 {
    10000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Prometheus,
}
