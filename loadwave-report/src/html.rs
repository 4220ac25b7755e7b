//! HTML Output
//!
//! Renders a single-file HTML report: headline, summary table, per-second
//! throughput and latency charts (inline SVG, no external assets), and the
//! full per-second table. Pure function of the [`Report`], so rendering the
//! same report twice produces identical markup.

use crate::report::Report;

const CHART_WIDTH: f64 = 760.0;
const CHART_HEIGHT: f64 = 220.0;
const CHART_PAD: f64 = 30.0;

/// Generate a self-contained HTML report.
pub fn generate_html_report(report: &Report) -> String {
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape(&report.meta.header)));
    out.push_str("<style>\n");
    out.push_str(
        "body{font-family:sans-serif;margin:2em auto;max-width:820px;color:#222}\n\
         table{border-collapse:collapse;margin:1em 0}\n\
         th,td{border:1px solid #ccc;padding:4px 10px;text-align:right}\n\
         th{background:#f4f4f4}\n\
         .meta{color:#666}\n",
    );
    out.push_str("</style>\n</head>\n<body>\n");

    out.push_str(&format!("<h1>{}</h1>\n", escape(&report.meta.header)));
    if !report.meta.description.is_empty() {
        out.push_str(&format!("<p>{}</p>\n", escape(&report.meta.description)));
    }
    out.push_str(&format!(
        "<p class=\"meta\">Generated {}</p>\n",
        report.meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    out.push_str("<h2>Summary</h2>\n");
    out.push_str("<table>\n<tr><th>Total</th><th>Success</th><th>Errors</th>");
    out.push_str("<th>Min (ms)</th><th>Avg (ms)</th><th>Max (ms)</th></tr>\n");
    out.push_str(&format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>\n",
        report.summary.total(),
        report.summary.success,
        report.summary.errors,
        report.summary.min_ms,
        report.summary.avg_ms,
        report.summary.max_ms,
    ));
    out.push_str("</table>\n");

    if report.rows.is_empty() {
        out.push_str("<p>No results recorded.</p>\n");
    } else {
        out.push_str("<h2>Requests per second</h2>\n");
        out.push_str(&throughput_chart(report));
        out.push_str("<h2>Mean latency per second</h2>\n");
        out.push_str(&latency_chart(report));

        out.push_str("<h2>Per-second results</h2>\n");
        out.push_str("<table>\n<tr><th>Second</th><th>Success</th><th>Errors</th>");
        out.push_str("<th>Min (ms)</th><th>Avg (ms)</th><th>Max (ms)</th></tr>\n");
        for row in &report.rows {
            out.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>\n",
                row.second, row.success, row.errors, row.min_ms, row.avg_ms, row.max_ms,
            ));
        }
        out.push_str("</table>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Stacked bars: successes below, errors on top.
fn throughput_chart(report: &Report) -> String {
    let max_total = report.rows.iter().map(|r| r.total()).max().unwrap_or(1);
    let span = chart_span(report);
    let slot = (CHART_WIDTH - 2.0 * CHART_PAD) / span as f64;
    let bar = (slot * 0.8).max(1.0);

    let mut svg = svg_open();
    for row in &report.rows {
        let x = CHART_PAD + (row.second - first_second(report)) as f64 * slot + (slot - bar) / 2.0;
        let success_h = scale_count(row.success, max_total);
        let error_h = scale_count(row.errors, max_total);
        let base = CHART_HEIGHT - CHART_PAD;
        if row.success > 0 {
            svg.push_str(&format!(
                "<rect x=\"{x:.1}\" y=\"{:.1}\" width=\"{bar:.1}\" height=\"{success_h:.1}\" fill=\"#4a8\"/>",
                base - success_h
            ));
        }
        if row.errors > 0 {
            svg.push_str(&format!(
                "<rect x=\"{x:.1}\" y=\"{:.1}\" width=\"{bar:.1}\" height=\"{error_h:.1}\" fill=\"#c55\"/>",
                base - success_h - error_h
            ));
        }
    }
    svg.push_str(&axes(&format!("{max_total} req/s")));
    svg.push_str("</svg>\n");
    svg
}

/// Polyline of mean latency per bucket.
fn latency_chart(report: &Report) -> String {
    let max_ms = report
        .rows
        .iter()
        .map(|r| r.avg_ms)
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE);
    let span = chart_span(report);
    let slot = (CHART_WIDTH - 2.0 * CHART_PAD) / span as f64;

    let points: Vec<String> = report
        .rows
        .iter()
        .map(|row| {
            let x = CHART_PAD + (row.second - first_second(report)) as f64 * slot + slot / 2.0;
            let y = CHART_HEIGHT - CHART_PAD
                - (row.avg_ms / max_ms) * (CHART_HEIGHT - 2.0 * CHART_PAD);
            format!("{x:.1},{y:.1}")
        })
        .collect();

    let mut svg = svg_open();
    svg.push_str(&format!(
        "<polyline points=\"{}\" fill=\"none\" stroke=\"#47a\" stroke-width=\"2\"/>",
        points.join(" ")
    ));
    svg.push_str(&axes(&format!("{max_ms:.1} ms")));
    svg.push_str("</svg>\n");
    svg
}

fn svg_open() -> String {
    format!(
        "<svg width=\"{CHART_WIDTH}\" height=\"{CHART_HEIGHT}\" \
         xmlns=\"http://www.w3.org/2000/svg\">"
    )
}

fn axes(y_label: &str) -> String {
    let base = CHART_HEIGHT - CHART_PAD;
    format!(
        "<line x1=\"{CHART_PAD}\" y1=\"{base}\" x2=\"{}\" y2=\"{base}\" stroke=\"#999\"/>\
         <line x1=\"{CHART_PAD}\" y1=\"{CHART_PAD}\" x2=\"{CHART_PAD}\" y2=\"{base}\" stroke=\"#999\"/>\
         <text x=\"{CHART_PAD}\" y=\"{}\" font-size=\"11\" fill=\"#666\">{}</text>",
        CHART_WIDTH - CHART_PAD,
        CHART_PAD - 8.0,
        escape(y_label),
    )
}

fn first_second(report: &Report) -> u64 {
    report.rows.first().map(|r| r.second).unwrap_or(0)
}

/// Number of one-second slots the x axis spans.
fn chart_span(report: &Report) -> u64 {
    let first = first_second(report);
    let last = report.rows.last().map(|r| r.second).unwrap_or(0);
    (last - first) + 1
}

fn scale_count(count: u64, max: u64) -> f64 {
    (count as f64 / max as f64) * (CHART_HEIGHT - 2.0 * CHART_PAD)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
