//! Runtime configuration for the query server.
//!
//! A [`Configuration`] is a flat map of dotted keys to string values. Site
//! files are TOML; nested tables flatten into dotted keys so that
//!
//! ```toml
//! [phoenix.query.server]
//! metrics = false
//! ```
//!
//! and `"phoenix.query.server.metrics" = false` are the same entry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
#[cfg(feature = "tracing")]
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Well-known configuration keys.
pub mod keys {
    /// Enables request-level metrics and the instrumented provider.
    pub const QUERY_SERVER_METRICS: &str = "phoenix.query.server.metrics";
    /// Interval, in milliseconds, at which request metrics are reported.
    pub const METRICS_REPORT_INTERVAL_MS: &str = "phoenix.query.server.metrics.report.interval.ms";
    /// File the metrics file sink writes to.
    pub const METRICS_SINK_FILENAME: &str = "phoenix.query.server.metrics.file.sink.filename";
    /// Metrics sink type (`file` or `log`).
    pub const METRICS_SINK_TYPE: &str = "phoenix.query.server.metrics.type.of.sink";
    /// Tells the engine to collect request-level metrics.
    pub const COLLECT_REQUEST_LEVEL_METRICS: &str = "phoenix.query.request.metrics.enabled";
    /// Connection URL used when no URL argument is given.
    pub const CONNECTION_URL: &str = "queryserver.connection.url";
    /// Name of the registered meta factory the host should instantiate.
    pub const META_FACTORY: &str = "phoenix.queryserver.metafactory";
}

/// Name of the site file read by [`Configuration::create`].
pub const SITE_FILE_NAME: &str = "queryserver-site.toml";

/// Environment variable naming the directory that holds the site file.
pub const CONF_DIR_ENV: &str = "QUERYSERVER_CONF_DIR";

/// Flat key/value configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    entries: BTreeMap<String, String>,
}

impl Configuration {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the platform default configuration.
    ///
    /// Reads [`SITE_FILE_NAME`] from `$QUERYSERVER_CONF_DIR` when the variable
    /// is set, otherwise from the current directory. A missing site file gives
    /// an empty configuration.
    pub fn create() -> Result<Self, ConfigError> {
        let dir = std::env::var_os(CONF_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let path = dir.join(SITE_FILE_NAME);

        if !path.is_file() {
            #[cfg(feature = "tracing")]
            debug!(path = %path.display(), "no site file found, using empty configuration");
            return Ok(Self::new());
        }

        Self::from_toml_file(&path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table: toml::Table = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_table(table)?;

        #[cfg(feature = "tracing")]
        debug!(path = %path.display(), entries = config.len(), "loaded site file");

        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            source,
        })?;
        Self::from_table(table)
    }

    fn from_table(table: toml::Table) -> Result<Self, ConfigError> {
        let mut config = Self::new();
        flatten_into(&mut config.entries, None, table)?;
        Ok(config)
    }

    /// Sets a key to a string value, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Sets a key to a boolean value.
    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, value.to_string());
    }

    /// Applies `KEY=VALUE` overrides on top of the current entries.
    ///
    /// Every override is validated before any is applied, so a malformed
    /// entry leaves the configuration untouched.
    pub fn merge_overrides<I, S>(&mut self, overrides: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = overrides
            .into_iter()
            .map(|raw| parse_override(raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        for (key, value) in parsed {
            self.entries.insert(key, value);
        }
        Ok(())
    }

    /// Returns the raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the value for `key`, or `default` when unset.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Reads a boolean. Accepts `true`/`false` in any case; anything else
    /// falls back to `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        let Some(raw) = self.get(key) else {
            return default;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                #[cfg(feature = "tracing")]
                warn!(key, default, "ignoring non-boolean configuration value");
                default
            }
        }
    }

    /// Reads an unsigned integer, falling back to `default` when unset or
    /// unparseable.
    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        let Some(raw) = self.get(key) else {
            return default;
        };
        match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                #[cfg(feature = "tracing")]
                warn!(key, default, "ignoring non-numeric configuration value");
                default
            }
        }
    }

    /// Returns every entry whose key contains a match for `pattern`.
    pub fn vals_by_regex(&self, pattern: &Regex) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter(|(key, _)| pattern.is_match(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Configuration
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn parse_override(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidOverride(raw.to_string())),
    }
}

fn flatten_into(
    entries: &mut BTreeMap<String, String>,
    prefix: Option<&str>,
    table: toml::Table,
) -> Result<(), ConfigError> {
    for (name, value) in table {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name,
        };

        let flat = match value {
            toml::Value::Table(nested) => {
                flatten_into(entries, Some(&key), nested)?;
                continue;
            }
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(dt) => dt.to_string(),
            toml::Value::Array(_) => {
                return Err(ConfigError::UnsupportedValue { key, kind: "array" });
            }
        };
        entries.insert(key, flat);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_nested_tables_flatten_to_dotted_keys() {
        let config = Configuration::from_toml_str(
            r#"
            "avatica.user" = "scott"

            [phoenix.query.server]
            metrics = false
            "metrics.report.interval.ms" = 2500
            "#,
        )
        .unwrap();

        assert_eq!(config.get("avatica.user"), Some("scott"));
        assert_eq!(config.get("phoenix.query.server.metrics"), Some("false"));
        assert_eq!(
            config.get("phoenix.query.server.metrics.report.interval.ms"),
            Some("2500")
        );
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn test_arrays_are_rejected() {
        let err = Configuration::from_toml_str("hosts = [\"a\", \"b\"]").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedValue { ref key, kind: "array" } if key == "hosts"
        ));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Configuration::from_toml_str("this is = = not toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_get_bool_is_lenient() {
        let config: Configuration = [("a", "TRUE"), ("b", " false "), ("c", "yes")]
            .into_iter()
            .collect();

        assert!(config.get_bool("a", false));
        assert!(!config.get_bool("b", true));
        assert!(config.get_bool("c", true));
        assert!(!config.get_bool("c", false));
        assert!(config.get_bool("missing", true));
    }

    #[test]
    fn test_get_u64_falls_back_on_garbage() {
        let config: Configuration = [("n", " 42 "), ("bad", "forty")].into_iter().collect();

        assert_eq!(config.get_u64("n", 7), 42);
        assert_eq!(config.get_u64("bad", 7), 7);
        assert_eq!(config.get_u64("missing", 7), 7);
    }

    #[test]
    fn test_merge_overrides_replaces_values() {
        let mut config: Configuration = [("phoenix.query.server.metrics", "true")]
            .into_iter()
            .collect();

        config
            .merge_overrides(["phoenix.query.server.metrics=false", "avatica.k=a=b"])
            .unwrap();

        assert_eq!(config.get("phoenix.query.server.metrics"), Some("false"));
        assert_eq!(config.get("avatica.k"), Some("a=b"));
    }

    #[test]
    fn test_merge_overrides_is_all_or_nothing() {
        let mut config = Configuration::new();
        let err = config
            .merge_overrides(["good=1", "=missing-key"])
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidOverride(ref raw) if raw == "=missing-key"));
        assert!(config.is_empty());
    }

    #[test]
    fn test_vals_by_regex_uses_find_semantics() {
        let config: Configuration = [
            ("avatica.user", "u"),
            ("x.avatica.password", "p"),
            ("hbase.zookeeper.quorum", "zk"),
        ]
        .into_iter()
        .collect();

        let matched = config.vals_by_regex(&Regex::new("avatica.*").unwrap());
        assert_eq!(matched.len(), 2);
        assert!(matched.contains_key("avatica.user"));
        assert!(matched.contains_key("x.avatica.password"));
    }

    #[test]
    fn test_from_toml_file_reports_path_on_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[broken").unwrap();

        let err = Configuration::from_toml_file(file.path()).unwrap_err();
        let msg = err.to_string();
        assert!(
            msg.contains(&file.path().display().to_string()),
            "expected path in error message, got: {msg}"
        );
    }

    #[test]
    fn test_from_toml_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Configuration::from_toml_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
