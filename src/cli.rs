//! Command-line interface module for dirsort.
//!
//! This module handles the CLI surface:
//! - Argument parsing
//! - Logging configuration from flags
//! - Orchestration of config loading, index building and the scan

use crate::config::CategoryMap;
use crate::file_category::ExtensionIndex;
use crate::file_organizer::{FileOrganizer, LOG_FILE_NAME, OrganizeReport, ProtectedNames};
use crate::logging::{LogConfig, Logger};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, debug, error, info};

/// Organize files in a target directory based on their extensions.
#[derive(Debug, Clone, Parser)]
#[command(name = "dirsort", version, about)]
pub struct Cli {
    /// The directory to scan and organize.
    pub target_directory: PathBuf,

    /// Path to the JSON file type configuration
    /// [default: ./file_types.json, then ~/.config/dirsort/file_types.json].
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Simulate the organization process without actually moving any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable logging to a file.
    #[arg(long, conflicts_with = "log_file")]
    pub no_log_file: bool,

    /// Where to write the log file.
    #[arg(long, value_name = "FILE", default_value = LOG_FILE_NAME)]
    pub log_file: PathBuf,
}

impl Cli {
    /// Logging settings requested on the command line.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: if self.verbose { Level::DEBUG } else { Level::INFO },
            console: true,
            log_file: (!self.no_log_file).then(|| self.log_file.clone()),
        }
    }
}

/// Runs one organization pass as described by `cli`, logging through `logger`.
///
/// Loads the category configuration, builds the extension index and the
/// protected names, then organizes the target directory. Fatal errors are
/// logged before being returned.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use dirsort::cli::{Cli, run};
/// use dirsort::logging::Logger;
///
/// let cli = Cli::parse_from(["dirsort", "/path/to/downloads", "--dry-run"]);
/// let logger = Logger::new(&cli.log_config());
/// match run(&cli, &logger) {
///     Ok(report) => println!("{} files would move", report.moved),
///     Err(e) => eprintln!("Error: {:#}", e),
/// }
/// ```
pub fn run(cli: &Cli, logger: &Logger) -> Result<OrganizeReport> {
    logger.scope(|| {
        info!("dirsort started");
        debug!("Arguments: {:?}", cli);

        let result = organize(cli, logger);
        if let Err(e) = &result {
            error!("{:#}", e);
        }
        result
    })
}

fn organize(cli: &Cli, logger: &Logger) -> Result<OrganizeReport> {
    let (categories, config_path) =
        CategoryMap::load(cli.config.as_deref()).context("Failed to load file types")?;

    let index = ExtensionIndex::build(&categories);
    debug!(
        "Indexed {} extensions across {} categories",
        index.len(),
        categories.len()
    );

    let target = cli
        .target_directory
        .canonicalize()
        .unwrap_or_else(|_| cli.target_directory.clone());

    let mut protected = ProtectedNames::new(&categories).with_file_in(&target, &config_path);
    if let Some(log_file) = logger.log_file() {
        protected = protected.with_file_in(&target, log_file);
    }

    let report = FileOrganizer::new(&index, &protected, cli.dry_run).organize(&target)?;

    if !report.dry_run
        && report.moved > 0
        && let Some(log_file) = logger.log_file()
    {
        info!("Log file saved to: {}", log_file.display());
    }

    Ok(report)
}
