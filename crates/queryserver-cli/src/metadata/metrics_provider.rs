//! Metadata provider that records request-level metrics.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use queryserver_core::{
    Meta, MetaVariant, PropertyBag, PQS_FILENAME, PQS_REPORTING_INTERVAL, PQS_SINKTYPE,
};
use serde::Serialize;
use tracing::info;

use super::{ProviderError, SqlxMeta};

/// Where request metrics are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    /// Append one JSON record per line to a file.
    File(PathBuf),
    /// Emit records through `tracing`.
    Log,
}

/// Metrics settings carried in the provider's property bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSettings {
    /// How often buffered file records are flushed.
    pub reporting_interval: Duration,
    pub sink: SinkKind,
}

impl MetricsSettings {
    /// Reads the `pqs_*` properties the factory adds when metrics are on.
    pub fn from_properties(properties: &PropertyBag) -> Result<Self, ProviderError> {
        let interval = required(properties, PQS_REPORTING_INTERVAL)?;
        let interval_ms: u64 = interval
            .trim()
            .parse()
            .map_err(|_| ProviderError::InvalidProperty {
                key: PQS_REPORTING_INTERVAL,
                value: interval.to_string(),
            })?;

        let sink = match required(properties, PQS_SINKTYPE)? {
            "file" => SinkKind::File(PathBuf::from(required(properties, PQS_FILENAME)?)),
            "log" => SinkKind::Log,
            other => return Err(ProviderError::UnsupportedSink(other.to_string())),
        };

        Ok(Self {
            reporting_interval: Duration::from_millis(interval_ms),
            sink,
        })
    }
}

fn required<'a>(
    properties: &'a PropertyBag,
    key: &'static str,
) -> Result<&'a str, ProviderError> {
    properties
        .get(key)
        .ok_or(ProviderError::MissingProperty(key))
}

#[derive(Debug, Serialize)]
struct RequestRecord<'a> {
    request: &'a str,
    elapsed_ms: u64,
    timestamp_ms: u64,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Buffered file sink, flushed once per reporting interval and on drop.
#[derive(Debug)]
struct FileSink {
    writer: BufWriter<File>,
    last_flush: Instant,
}

#[derive(Debug)]
enum Sink {
    File(Mutex<FileSink>),
    Log,
}

impl Sink {
    fn open(kind: &SinkKind) -> Result<Self, ProviderError> {
        match kind {
            SinkKind::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| ProviderError::Sink {
                        path: path.clone(),
                        source,
                    })?;
                Ok(Sink::File(Mutex::new(FileSink {
                    writer: BufWriter::new(file),
                    last_flush: Instant::now(),
                })))
            }
            SinkKind::Log => Ok(Sink::Log),
        }
    }
}

/// Request name recorded for the connection check made at construction.
const CONNECT_REQUEST: &str = "connect";

/// Plain provider plus a request metrics sink.
#[derive(Debug)]
pub struct MetricsMeta {
    inner: SqlxMeta,
    settings: MetricsSettings,
    sink: Sink,
}

impl MetricsMeta {
    /// Connects the underlying provider, then opens the metrics sink and
    /// records the connection check.
    ///
    /// Nothing is written to disk unless the connection succeeds.
    pub fn connect(url: &str, properties: PropertyBag) -> Result<Self, ProviderError> {
        let settings = MetricsSettings::from_properties(&properties)?;

        let started = Instant::now();
        let inner = SqlxMeta::connect(url, properties)?;
        inner.validate()?;
        let elapsed = started.elapsed();

        let sink = Sink::open(&settings.sink)?;
        let meta = Self {
            inner,
            settings,
            sink,
        };
        meta.record(CONNECT_REQUEST, elapsed)?;
        Ok(meta)
    }

    fn record(&self, request: &str, elapsed: Duration) -> Result<(), ProviderError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let record = RequestRecord {
            request,
            elapsed_ms: millis(elapsed),
            timestamp_ms: millis(timestamp),
        };

        match &self.sink {
            Sink::File(sink) => {
                let line = serde_json::to_string(&record)?;
                let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
                writeln!(sink.writer, "{line}")?;
                if sink.last_flush.elapsed() >= self.settings.reporting_interval {
                    sink.writer.flush()?;
                    sink.last_flush = Instant::now();
                }
            }
            Sink::Log => {
                info!(
                    target: "queryserver::metrics",
                    request = record.request,
                    elapsed_ms = record.elapsed_ms,
                    "request completed"
                );
            }
        }
        Ok(())
    }
}

impl Meta for MetricsMeta {
    fn variant(&self) -> MetaVariant {
        MetaVariant::Instrumented
    }

    fn url(&self) -> &str {
        self.inner.url()
    }

    fn properties(&self) -> &PropertyBag {
        self.inner.properties()
    }
}
