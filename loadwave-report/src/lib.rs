#![warn(missing_docs)]
//! Loadwave Report - Reporting and Upload
//!
//! Turns a result snapshot into shareable artifacts:
//! - JSON (machine-readable)
//! - HTML (single-file report with inline SVG charts)
//!
//! Also provides the [`HtmlReportSink`] and [`HttpUploader`] implementations
//! of the core checkpoint seams.

mod html;
mod json;
mod report;
mod sink;
mod upload;

pub use html::generate_html_report;
pub use json::generate_json_report;
pub use report::{build_report, BucketRow, Report, ReportMeta};
pub use sink::HtmlReportSink;
pub use upload::{HttpUploader, UploadError};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single-file HTML report
    Html,
    /// JSON with full per-second rows
    Json,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("html".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
