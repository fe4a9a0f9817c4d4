//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Factory used when neither `--factory` nor the configuration names one.
pub const DEFAULT_FACTORY: &str = "connection";

/// Query Server - metadata provider bootstrap
#[derive(Parser, Debug)]
#[command(name = "queryserver")]
#[command(
    about = "Resolve configuration and create the query server's metadata provider",
    long_about = None
)]
#[command(version)]
pub struct Args {
    /// Connection URL (derived from configuration when omitted)
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Site configuration file (defaults to $QUERYSERVER_CONF_DIR/queryserver-site.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Configuration override in KEY=VALUE format (can be repeated)
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub defines: Vec<String>,

    /// Registered meta factory to instantiate
    #[arg(long, value_name = "NAME")]
    pub factory: Option<String>,

    /// Report format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Compact JSON output (no pretty-printing)
    #[arg(long)]
    pub compact: bool,

    /// Log level filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    /// Suppress log output on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

/// Report format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::parse_from(["queryserver"]);
        assert!(args.urls.is_empty());
        assert!(args.config.is_none());
        assert!(args.defines.is_empty());
        assert!(args.factory.is_none());
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.log_level, "info");
        assert!(!args.quiet);
    }

    #[test]
    fn test_parse_full_args() {
        let args = Args::parse_from([
            "queryserver",
            "-c",
            "site.toml",
            "-D",
            "phoenix.query.server.metrics=false",
            "-Davatica.user=scott",
            "--factory",
            "connection",
            "-f",
            "json",
            "--compact",
            "--log-level",
            "debug",
            "--quiet",
            "jdbc:sqlite::memory:",
        ]);
        assert_eq!(args.config.unwrap().to_str().unwrap(), "site.toml");
        assert_eq!(
            args.defines,
            vec!["phoenix.query.server.metrics=false", "avatica.user=scott"]
        );
        assert_eq!(args.factory.as_deref(), Some("connection"));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.compact);
        assert_eq!(args.log_level, "debug");
        assert!(args.quiet);
        assert_eq!(args.urls, vec!["jdbc:sqlite::memory:"]);
    }

    #[test]
    fn test_multiple_urls_parse() {
        // Rejected later by the factory, which reports every value.
        let args = Args::parse_from(["queryserver", "jdbc:a", "jdbc:b"]);
        assert_eq!(args.urls.len(), 2);
    }
}
