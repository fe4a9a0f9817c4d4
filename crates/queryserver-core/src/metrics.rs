//! Request-level metrics settings read from configuration.

use crate::config::{keys, Configuration};

/// Property carrying the metrics reporting interval, in milliseconds.
pub const PQS_REPORTING_INTERVAL: &str = "pqs_reporting_interval";
/// Property carrying the metrics sink file name.
pub const PQS_FILENAME: &str = "pqs_filename";
/// Property carrying the metrics sink type.
pub const PQS_SINKTYPE: &str = "pqs_sinktype";

pub const DEFAULT_REPORT_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_SINK_FILENAME: &str = "pqs-metrics.json";
pub const DEFAULT_SINK_TYPE: &str = "file";

/// Source of the metrics reporting settings.
pub trait MetricsSystem: Send + Sync {
    fn reporting_interval(&self, conf: &Configuration) -> u64;

    fn sink_file_name(&self, conf: &Configuration) -> String;

    fn sink_type(&self, conf: &Configuration) -> String;
}

/// Reads metrics settings from the `phoenix.query.server.metrics.*` keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigMetricsSystem;

impl MetricsSystem for ConfigMetricsSystem {
    fn reporting_interval(&self, conf: &Configuration) -> u64 {
        conf.get_u64(keys::METRICS_REPORT_INTERVAL_MS, DEFAULT_REPORT_INTERVAL_MS)
    }

    fn sink_file_name(&self, conf: &Configuration) -> String {
        conf.get_or(keys::METRICS_SINK_FILENAME, DEFAULT_SINK_FILENAME)
            .to_string()
    }

    fn sink_type(&self, conf: &Configuration) -> String {
        conf.get_or(keys::METRICS_SINK_TYPE, DEFAULT_SINK_TYPE)
            .trim()
            .to_ascii_lowercase()
    }
}
