//! Query Server bootstrap - creates the metadata provider

use queryserver_cli::bootstrap;
use queryserver_cli::cli::{self, OutputFormat};
use queryserver_cli::logging;
use queryserver_cli::output::{format_json, format_text, MetaReport};

use anyhow::Result;
use clap::Parser;
use queryserver_core::{ConfigError, FactoryError};
use std::io::{self, Write};
use std::process::ExitCode;

/// The metadata provider could not be created.
const EXIT_FAILURE: u8 = 1;
/// Configuration error (bad site file, malformed override, bad arguments).
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    logging::init_logging(&args.log_level, args.quiet);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("queryserver: error: {e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn run(args: cli::Args) -> Result<()> {
    let conf = bootstrap::load_configuration(args.config.as_deref(), &args.defines)?;
    let name = bootstrap::factory_name(args.factory.as_deref(), &conf).to_string();

    let registry = bootstrap::default_registry();
    let meta = bootstrap::create_meta(&registry, &name, conf, &args.urls)?;

    let report = MetaReport::new(&name, meta.as_ref());
    let rendered = match args.format {
        OutputFormat::Json => format_json(&report, args.compact),
        OutputFormat::Text => format_text(&report, true),
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ConfigError>().is_some() {
        return EXIT_CONFIG_ERROR;
    }
    match err.downcast_ref::<FactoryError>() {
        Some(FactoryError::Connection(_)) => EXIT_FAILURE,
        Some(_) => EXIT_CONFIG_ERROR,
        None => EXIT_FAILURE,
    }
}
