#![warn(missing_docs)]
//! Loadwave CLI Library
//!
//! This crate provides the CLI infrastructure for load-test binaries. Use
//! `loadwave::run()` (or `loadwave_cli::run()`) in your main function to get
//! the full loadwave CLI experience with your workload:
//!
//! ```ignore
//! use loadwave::workload;
//!
//! fn main() -> anyhow::Result<()> {
//!     loadwave::run(workload(|| {
//!         call_my_service()?;
//!         Ok(())
//!     }))
//! }
//! ```
//!
//! Configuration comes from `loadwave.toml` (discovered by walking up from
//! the current directory) with CLI flags taking precedence.

mod config;
mod format;

pub use config::{LoadwaveConfig, ReportSection, RunSection, UploadSection};
pub use format::format_human_output;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use loadwave_core::{LoadTest, RunConfig, Workload};
use loadwave_report::{
    build_report, generate_html_report, generate_json_report, HtmlReportSink, HttpUploader,
    OutputFormat,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Loadwave CLI arguments
#[derive(Parser, Debug)]
#[command(name = "loadwave")]
#[command(author, version, about = "Loadwave - concurrent load-testing harness")]
pub struct Cli {
    /// Optional subcommand (Run, Config); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Number of workload invocations
    #[arg(long, short = 'n')]
    pub jobs: Option<u64>,

    /// Number of concurrent workers
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Export a checkpoint report while the run is in progress
    #[arg(long)]
    pub output: bool,

    /// Base name of the report artifact, without extension
    #[arg(long)]
    pub file_name: Option<String>,

    /// Report headline
    #[arg(long)]
    pub header: Option<String>,

    /// Free-form description shown under the headline
    #[arg(long)]
    pub description: Option<String>,

    /// Remote storage bucket for checkpoint artifacts
    #[arg(long)]
    pub upload_bucket: Option<String>,

    /// Region of the remote storage bucket
    #[arg(long)]
    pub upload_region: Option<String>,

    /// Final output format: human, json, html
    #[arg(long)]
    pub format: Option<String>,

    /// Directory for report artifacts
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the load test (default)
    Run,
    /// Print the default loadwave.toml
    Config,
}

/// Run the Loadwave CLI with the given workload.
/// This is the main entry point for load-test binaries.
pub fn run(workload: Workload) -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli, workload)
}

/// Run the Loadwave CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli, workload: Workload) -> anyhow::Result<()> {
    if matches!(cli.command, Some(Commands::Config)) {
        print!("{}", LoadwaveConfig::default_toml());
        return Ok(());
    }

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("loadwave_core=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("loadwave_core=info")
            .init();
    }

    // Discover loadwave.toml configuration (CLI flags override)
    let file_config = LoadwaveConfig::discover().unwrap_or_default();
    let run_config = resolve_run_config(&cli, &file_config);

    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&file_config.report.format)
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let directory = cli
        .directory
        .clone()
        .unwrap_or_else(|| PathBuf::from(&file_config.report.directory));

    let mut test = LoadTest::new(run_config.clone())?
        .with_report_sink(Arc::new(HtmlReportSink::new(directory.clone())));

    if let (Some(bucket), Some(region)) = (&run_config.upload_bucket, &run_config.upload_region) {
        test = test.with_uploader(Arc::new(HttpUploader::new(bucket, region)?));
    }

    let progress_bar = (!cli.quiet).then(|| {
        let pb = ProgressBar::new(run_config.total_jobs);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("Load test");
        pb
    });
    if let Some(pb) = &progress_bar {
        let pb = pb.clone();
        test = test.with_progress(Arc::new(move || pb.inc(1)));
    }

    println!(
        "Running load test (jobs: {}, workers: {})",
        run_config.total_jobs, run_config.pool_size
    );
    test.run(workload)?;
    if let Some(pb) = &progress_bar {
        pb.finish_with_message("Complete");
    }

    let report = build_report(
        &test.store().snapshot(),
        &run_config.header,
        &run_config.description,
    );
    match format {
        OutputFormat::Human => println!("{}", format_human_output(&report)),
        OutputFormat::Json => {
            std::fs::create_dir_all(&directory)?;
            let path = directory.join(format!("{}.json", run_config.file_name));
            std::fs::write(&path, generate_json_report(&report)?)?;
            println!("Report written to {}", path.display());
        }
        OutputFormat::Html => {
            std::fs::create_dir_all(&directory)?;
            let path = directory.join(format!("{}.html", run_config.file_name));
            std::fs::write(&path, generate_html_report(&report))?;
            println!("Report written to {}", path.display());
        }
    }

    Ok(())
}

/// Merge CLI flags over file configuration over built-in defaults.
fn resolve_run_config(cli: &Cli, file: &LoadwaveConfig) -> RunConfig {
    RunConfig {
        total_jobs: cli.jobs.unwrap_or(file.run.jobs),
        pool_size: cli.workers.unwrap_or(file.run.workers),
        output: cli.output || file.report.output,
        file_name: cli
            .file_name
            .clone()
            .unwrap_or_else(|| file.report.file_name.clone()),
        header: cli
            .header
            .clone()
            .unwrap_or_else(|| file.report.header.clone()),
        description: cli
            .description
            .clone()
            .unwrap_or_else(|| file.report.description.clone()),
        upload_bucket: cli.upload_bucket.clone().or_else(|| file.upload.bucket.clone()),
        upload_region: cli.upload_region.clone().or_else(|| file.upload.region.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("loadwave").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_flags_override_file_config() {
        let cli = parse(&["--jobs", "50", "--workers", "5", "--output"]);
        let mut file = LoadwaveConfig::default();
        file.run.jobs = 200;
        file.run.workers = 20;

        let config = resolve_run_config(&cli, &file);
        assert_eq!(config.total_jobs, 50);
        assert_eq!(config.pool_size, 5);
        assert!(config.output);
    }

    #[test]
    fn test_file_config_fills_unset_flags() {
        let cli = parse(&[]);
        let mut file = LoadwaveConfig::default();
        file.run.jobs = 200;
        file.report.header = "api".to_string();
        file.upload.bucket = Some("results".to_string());
        file.upload.region = Some("us-east-1".to_string());

        let config = resolve_run_config(&cli, &file);
        assert_eq!(config.total_jobs, 200);
        assert_eq!(config.pool_size, 100);
        assert_eq!(config.header, "api");
        assert_eq!(config.upload_bucket.as_deref(), Some("results"));
    }

    #[test]
    fn test_defaults_without_flags_or_file() {
        let cli = parse(&[]);
        let config = resolve_run_config(&cli, &LoadwaveConfig::default());
        assert_eq!(config.total_jobs, 1000);
        assert_eq!(config.pool_size, 100);
        assert!(!config.output);
        assert_eq!(config.file_name, "load_test");
    }

    #[test]
    fn test_config_subcommand_parses() {
        let cli = parse(&["config"]);
        assert!(matches!(cli.command, Some(Commands::Config)));
    }
}
