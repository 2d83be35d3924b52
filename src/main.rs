#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # gradebook
//!
//! Record, edit, delete, list and export student grades from a terminal.
//!
//! Run `gradebook`, then type `help` at the prompt. Commands can also be piped
//! in, one per line.

use std::{
    fs::OpenOptions,
    io::{self, IsTerminal},
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{Context, Result};
use bpaf::*;
use dotenvy::dotenv;
use gradebook::{RecordStore, config::Config, shell::Shell};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Command line options; anything given here overrides the environment.
#[derive(Debug, Clone)]
struct Options {
    /// Default destination for `export`
    export_path: Option<PathBuf>,
    /// File to append the log to
    log_file:    Option<PathBuf>,
    /// Do not write a log file at all
    no_log_file: bool,
    /// Log at debug level
    verbose:     bool,
}

/// Parse the command line arguments and return the `Options`
fn options() -> Options {
    let export_path = long("export-path")
        .short('o')
        .help("Where `export` writes when no path is given")
        .argument::<PathBuf>("PATH")
        .optional();

    let log_file = long("log-file")
        .help("File to append the log to")
        .argument::<PathBuf>("PATH")
        .optional();

    let no_log_file = long("no-log-file")
        .help("Only log to stderr")
        .switch();

    let verbose = short('v')
        .long("verbose")
        .help("Log debug messages too")
        .switch();

    construct!(Options {
        export_path,
        log_file,
        no_log_file,
        verbose
    })
    .to_options()
    .descr("Student grade book")
    .run()
}

/// Applies command line overrides on top of the environment config.
fn merge(config: Config, opts: Options) -> Config {
    let mut config = config;
    if let Some(path) = opts.export_path {
        config = config.with_export_path(path);
    }
    if opts.no_log_file {
        config = config.with_log_file(None);
    } else if let Some(path) = opts.log_file {
        config = config.with_log_file(Some(path));
    }
    if opts.verbose {
        config = config.with_log_level(Level::DEBUG);
    }
    config
}

/// Sets up logging to stderr and, if configured, to a log file.
fn init_logging(config: &Config) -> Result<()> {
    let stderr = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let file = match config.log_file() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Could not open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    let filter_layer = LevelFilter::from_level(config.log_level());
    tracing_subscriber::registry()
        .with(stderr)
        .with(file)
        .with(filter_layer)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();

    let opts = options();
    let config = merge(Config::from_env()?, opts);
    init_logging(&config)?;

    tracing::info!("Application started.");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let interactive = stdin.is_terminal();
    let color = stdout.is_terminal();

    let mut shell = Shell::new(RecordStore::new(), stdout.lock())
        .with_export_path(config.export_path().clone())
        .with_color(color)
        .with_prompt(interactive);

    if interactive {
        shell.execute("help")?;
    }
    shell.run(stdin.lock())
}
