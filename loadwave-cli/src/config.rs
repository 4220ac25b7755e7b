//! Configuration loading from loadwave.toml
//!
//! Loadwave configuration can be specified in a `loadwave.toml` file in the
//! project root. The configuration is automatically discovered by walking up
//! from the current directory; CLI flags override file values.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Loadwave configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoadwaveConfig {
    /// Run configuration
    #[serde(default)]
    pub run: RunSection,
    /// Report configuration
    #[serde(default)]
    pub report: ReportSection,
    /// Upload configuration
    #[serde(default)]
    pub upload: UploadSection,
}

/// `[run]` section: how much load to generate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSection {
    /// Number of workload invocations
    #[serde(default = "default_jobs")]
    pub jobs: u64,
    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            workers: default_workers(),
        }
    }
}

/// `[report]` section: checkpoint and final report output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    /// Export a checkpoint report while the run is in progress
    #[serde(default)]
    pub output: bool,
    /// Base name of the report artifact, without extension
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Report headline
    #[serde(default)]
    pub header: String,
    /// Free-form description shown under the headline
    #[serde(default)]
    pub description: String,
    /// Directory for report artifacts
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Final output format: human, json, html
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            output: false,
            file_name: default_file_name(),
            header: String::new(),
            description: String::new(),
            directory: default_directory(),
            format: default_format(),
        }
    }
}

/// `[upload]` section: remote storage for checkpoint artifacts
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UploadSection {
    /// Remote storage bucket
    #[serde(default)]
    pub bucket: Option<String>,
    /// Region of the remote storage bucket
    #[serde(default)]
    pub region: Option<String>,
}

fn default_jobs() -> u64 {
    1000
}
fn default_workers() -> usize {
    100
}
fn default_file_name() -> String {
    "load_test".to_string()
}
fn default_directory() -> String {
    "target/loadwave".to_string()
}
fn default_format() -> String {
    "human".to_string()
}

impl LoadwaveConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("loadwave.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Loadwave Configuration

[run]
# Number of workload invocations
jobs = 1000
# Number of concurrent workers
workers = 100

[report]
# Export a checkpoint report while the run is in progress
output = false
# Base name of the report artifact, without extension
file_name = "load_test"
# Report headline
header = ""
# Free-form description shown under the headline
description = ""
# Directory for report artifacts
directory = "target/loadwave"
# Final output format: human, json, html
format = "human"

[upload]
# Remote storage bucket for checkpoint artifacts (uncomment to enable)
# bucket = "my-results-bucket"
# Region of the remote storage bucket
# region = "eu-west-1"
"#
        .to_string()
    }
}
