//! Output Formatting
//!
//! Human-readable output formatting for load-test reports.

use loadwave_report::Report;

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Loadwave Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    if !report.meta.header.is_empty() {
        output.push_str(&format!("{}\n", report.meta.header));
    }
    if !report.meta.description.is_empty() {
        output.push_str(&format!("{}\n", report.meta.description));
    }

    let summary = &report.summary;
    output.push_str(&format!(
        "  requests: {}  ✓ {}  ✗ {}\n",
        summary.total(),
        summary.success,
        summary.errors
    ));
    output.push_str(&format!(
        "  timing: min {:.2} ms  avg {:.2} ms  max {:.2} ms\n",
        summary.min_ms, summary.avg_ms, summary.max_ms
    ));

    if !report.rows.is_empty() {
        output.push('\n');
        output.push_str(&format!(
            "  {:>8}  {:>9}  {:>7}  {:>10}\n",
            "second", "success", "errors", "avg (ms)"
        ));
        output.push_str(&format!("  {}\n", "-".repeat(40)));
        for row in &report.rows {
            output.push_str(&format!(
                "  {:>8}  {:>9}  {:>7}  {:>10.2}\n",
                row.second, row.success, row.errors, row.avg_ms
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadwave_core::Outcome;
    use loadwave_report::build_report;
    use std::collections::BTreeMap;
    use std::time::Duration;

    #[test]
    fn test_summary_lines_present() {
        let mut buckets = BTreeMap::new();
        buckets.insert(
            0,
            vec![
                Outcome::success(Duration::from_millis(10)),
                Outcome::failure(Duration::from_millis(20), "err"),
            ],
        );
        let report = build_report(&buckets, "api", "");
        let text = format_human_output(&report);

        assert!(text.contains("Loadwave Results"));
        assert!(text.contains("requests: 2  ✓ 1  ✗ 1"));
        assert!(text.contains("avg 15.00 ms"));
    }

    #[test]
    fn test_empty_report_has_no_table() {
        let report = build_report(&BTreeMap::new(), "", "");
        let text = format_human_output(&report);
        assert!(text.contains("requests: 0"));
        assert!(!text.contains("second"));
    }
}
