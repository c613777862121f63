//! Salarytab - job-salary tables by year
//!
//! A CLI tool that loads a job-salary CSV dataset, aggregates it by year
//! and renders the summary and the raw records as sortable tables.
//!
//! Exit codes:
//!   0 - Success (including an empty dataset)
//!   1 - Error (unreadable dataset, malformed CSV, bad config, etc.)

mod analysis;
mod cli;
mod config;
mod dataset;
mod models;
mod report;
mod session;
mod view;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE};
use dataset::{DataSource, LoadOptions, RecordParser};
use report::{RenderOptions, Report};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use view::{TableDisplay, ViewEvent, ViewState};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let mut args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging so its verbose flag can take effect
    let loaded = load_config(&args);
    if let Ok(ref config) = loaded {
        if config.general.verbose && !args.quiet {
            args.verbose = true;
        }
    }

    init_logging(&args);

    info!("Salarytab v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    match run(args, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .salarytab.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the dataset, salary policy and report options.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the dataset, apply header clicks and write the report.
async fn run(args: Args, mut config: Config) -> Result<()> {
    let start_time = Instant::now();
    config.merge_with_args(&args);
    config.validate()?;

    // Step 1: Load the dataset (the only asynchronous step)
    let source = DataSource::from_option(config.dataset.source.as_deref());
    let load_options = LoadOptions {
        timeout: Duration::from_secs(config.dataset.timeout_seconds),
        show_progress: !args.quiet && !args.stdout,
    };

    let text = dataset::load_text(&source, &load_options)
        .await
        .with_context(|| format!("Failed to load dataset from {}", source))?;

    // Step 2: Parse and aggregate
    let records = RecordParser::new()
        .with_delimiter(config.delimiter_byte())
        .parse(&text)
        .with_context(|| format!("Failed to parse dataset from {}", source))?;
    info!(
        "Parsed {} records (salary policy: {})",
        records.len(),
        config.dataset.salary_policy
    );

    let mut state = ViewState::new(config.dataset.salary_policy)
        .apply(ViewEvent::Loaded(records))
        .context("Failed to aggregate dataset")?;

    if state.records_display() == TableDisplay::Empty {
        warn!("Dataset {} contains no records; both tables will be empty", source);
    }

    // Step 3: Header clicks from the command line, then the interactive session
    state = state.click_all(&args.sort)?;

    if args.interactive {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        state = session::run_session(state, stdin, tokio::io::stdout()).await?;
    }

    // Step 4: Render and write
    let report = Report::from_state(&state, &config.report.title, &source.to_string());
    let options = RenderOptions {
        include_raw_table: config.report.include_raw_table,
        include_metadata: config.report.include_metadata,
    };
    let output = report::render(&report, args.format, options)?;

    if args.stdout {
        print!("{}", output);
        return Ok(());
    }

    let output_path = config.output_path(args.format);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path))?;

    if !args.quiet {
        eprintln!("\n📊 Summary:");
        eprintln!("   Records: {}", report.metadata.record_count);
        eprintln!("   Jobs counted: {}", analysis::total_jobs(&report.aggregates));
        eprintln!("   Years: {}", report.metadata.year_count);
        eprintln!("   Sorted by: {}", report.metadata.sort);
        eprintln!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
        eprintln!("\n✅ Report saved to: {}", output_path);
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring unreadable {}: {:#}", CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}
