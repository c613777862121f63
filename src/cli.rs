//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{SalaryPolicy, SortKey};
use clap::Parser;
use std::path::PathBuf;

/// Salarytab - job-salary tables by year
///
/// Loads a job-salary CSV dataset, aggregates it by year (number of jobs,
/// average salary in USD) and renders the summary and the raw records as
/// sortable tables.
///
/// Examples:
///   salarytab
///   salarytab --data ds_salaries.csv --output report.html
///   salarytab --data https://example.com/salaries.csv --format markdown --stdout
///   salarytab --sort averageSalary --sort averageSalary
///   salarytab --interactive
///   salarytab --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset location: a CSV file path or an http(s) URL
    ///
    /// Defaults to the dataset bundled with the binary.
    #[arg(short, long, value_name = "PATH|URL", env = "SALARYTAB_DATA")]
    pub data: Option<String>,

    /// Output file path for the report
    ///
    /// Defaults to the config file setting or salary_report.<format>
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the report to stdout instead of a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Output format (html, markdown, json)
    #[arg(long, default_value = "html", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Click an aggregate column header (repeatable, applied in order)
    ///
    /// Values: year, totalJobs, averageSalary. Clicking the active column
    /// while ascending switches to descending.
    #[arg(short, long = "sort", value_name = "KEY")]
    pub sort: Vec<SortKey>,

    /// Start an interactive session to sort the aggregate table
    #[arg(short, long)]
    pub interactive: bool,

    /// Treatment of non-numeric salary_in_usd values
    #[arg(long, value_name = "POLICY")]
    pub salary_policy: Option<SalaryPolicy>,

    /// HTTP timeout in seconds for remote datasets
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salarytab.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .salarytab.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// HTML page (default)
    #[default]
    Html,
    /// Markdown document
    Markdown,
    /// JSON document
    Json,
}

impl OutputFormat {
    /// File extension for reports in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref data) = self.data {
            let looks_remote = data.starts_with("http://") || data.starts_with("https://");
            if !looks_remote && !std::path::Path::new(data).is_file() {
                return Err(format!("Dataset file does not exist: {}", data));
            }
        }

        if self.interactive && self.stdout {
            return Err("Cannot use --stdout with --interactive".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
