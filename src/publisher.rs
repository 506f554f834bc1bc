//! Metrics publisher seam
//!
//! Production deployments push snapshot values to a remote tag store; the
//! transport lives outside this crate, so the boundary is a trait taking
//! flat name/value pairs. The in-repo implementation emits them through
//! `tracing`, which is enough for log-scraping collectors and for `--once`
//! spot checks.

use std::fmt;

/// One published value, numeric or textual
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricValue {
    Count(u64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(v) => write!(f, "{v}"),
            MetricValue::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Destination for the values of one completed inspection cycle
pub trait MetricsPublisher {
    fn publish(&self, values: &[(String, MetricValue)]) -> anyhow::Result<()>;
}

/// Publisher that emits every value as a structured log event
pub struct LogPublisher;

impl MetricsPublisher for LogPublisher {
    fn publish(&self, values: &[(String, MetricValue)]) -> anyhow::Result<()> {
        for (name, value) in values {
            tracing::info!(metric = %name, value = %value, "spool metric");
        }
        Ok(())
    }
}
