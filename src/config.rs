//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.salarytab.toml` files.

use crate::cli::OutputFormat;
use crate::models::SalaryPolicy;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".salarytab.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path; `salary_report.<format>` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Dataset loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// CSV file path or URL; the bundled dataset is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Treatment of non-numeric salary_in_usd values.
    #[serde(default)]
    pub salary_policy: SalaryPolicy,

    /// HTTP timeout for remote datasets, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Field delimiter of the CSV document.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: None,
            salary_policy: SalaryPolicy::default(),
            timeout_seconds: default_timeout(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_delimiter() -> char {
    ','
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Render the raw record table below the summary.
    #[serde(default = "default_true")]
    pub include_raw_table: bool,

    /// Render the source/record-count header.
    #[serde(default = "default_true")]
    pub include_metadata: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_raw_table: true,
            include_metadata: true,
        }
    }
}

fn default_title() -> String {
    "Job Salaries".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.salarytab.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.dataset.source = Some(data.clone());
        }
        if let Some(policy) = args.salary_policy {
            self.dataset.salary_policy = policy;
        }
        if let Some(timeout) = args.timeout {
            self.dataset.timeout_seconds = timeout;
        }
        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Reject settings that would make every run fail.
    ///
    /// Call after [`Config::merge_with_args`], so file and CLI values are
    /// checked alike.
    pub fn validate(&self) -> Result<()> {
        if self.dataset.timeout_seconds == 0 {
            bail!("[dataset] timeout_seconds must be at least 1");
        }

        let delimiter = self.dataset.delimiter;
        if !delimiter.is_ascii() || matches!(delimiter, '"' | '\n' | '\r') {
            bail!(
                "[dataset] delimiter must be a single ASCII character other than a quote or line break, got {:?}",
                delimiter
            );
        }

        Ok(())
    }

    /// The CSV delimiter as a byte. Only meaningful after [`Config::validate`].
    pub fn delimiter_byte(&self) -> u8 {
        self.dataset.delimiter as u8
    }

    /// Where the report is written when `--stdout` is not given.
    pub fn output_path(&self, format: OutputFormat) -> String {
        match self.general.output {
            Some(ref output) => output.clone(),
            None => format!("salary_report.{}", format.extension()),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
