//! File-Writing Report Sink
//!
//! Implements the core [`ReportSink`] seam: renders a snapshot to HTML and
//! writes it under a configured directory, returning the artifact path for
//! the uploader.

use crate::html::generate_html_report;
use crate::report::build_report;
use loadwave_core::{Buckets, CheckpointError, ReportOptions, ReportSink};
use std::path::PathBuf;

/// Renders checkpoint snapshots to `<directory>/<file_name>.html`.
///
/// The directory is created on first render. Each checkpoint overwrites the
/// previous artifact, so the file always holds the freshest snapshot.
#[derive(Debug, Clone)]
pub struct HtmlReportSink {
    directory: PathBuf,
}

impl HtmlReportSink {
    /// Create a sink writing into the given directory.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl ReportSink for HtmlReportSink {
    fn render(
        &self,
        snapshot: &Buckets,
        options: &ReportOptions,
    ) -> Result<PathBuf, CheckpointError> {
        let report = build_report(snapshot, &options.header, &options.description);
        let html = generate_html_report(&report);

        std::fs::create_dir_all(&self.directory)?;
        let file_name = if options.file_name.is_empty() {
            "load_test"
        } else {
            options.file_name.as_str()
        };
        let path = self.directory.join(format!("{file_name}.html"));
        std::fs::write(&path, html)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadwave_core::Outcome;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn options(file_name: &str) -> ReportOptions {
        ReportOptions {
            file_name: file_name.to_string(),
            header: "api".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_writes_artifact_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = HtmlReportSink::new(dir.path().join("reports"));

        let mut snapshot: Buckets = BTreeMap::new();
        snapshot.insert(0, vec![Outcome::success(Duration::from_millis(3))]);

        let path = sink.render(&snapshot, &options("checkout")).unwrap();
        assert_eq!(path, dir.path().join("reports").join("checkout.html"));

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<h1>api</h1>"));
    }

    #[test]
    fn test_empty_file_name_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let sink = HtmlReportSink::new(dir.path());

        let path = sink.render(&BTreeMap::new(), &options("")).unwrap();
        assert!(path.ends_with("load_test.html"));
    }

    #[test]
    fn test_rerender_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let sink = HtmlReportSink::new(dir.path());

        let mut snapshot: Buckets = BTreeMap::new();
        snapshot.insert(0, vec![Outcome::success(Duration::from_millis(3))]);
        sink.render(&snapshot, &options("run")).unwrap();

        snapshot.insert(1, vec![Outcome::failure(Duration::from_millis(9), "x")]);
        let path = sink.render(&snapshot, &options("run")).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        // The second render reflects the grown snapshot: an error bar appears
        assert!(html.contains("#c55"));
    }
}
