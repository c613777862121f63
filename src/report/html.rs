//! HTML page generation.
//!
//! Produces a self-contained page with the aggregate table and the raw
//! record table. Aggregate headers carry `data-sort-key` so a page script
//! or a re-run with `--sort` can act on them; the active column gets
//! `aria-sort`.

use crate::models::{AggregateRow, Record, SortKey, SortState, RECORD_LABELS};
use crate::report::{RenderOptions, Report, ReportMetadata};
use crate::view::TableDisplay;

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2rem; }
table { border-collapse: collapse; margin-bottom: 2rem; }
th, td { border: 1px solid #ccc; padding: 0.3rem 0.6rem; }
.main-table th { cursor: pointer; background: #f0f0f0; }
.main-table td { text-align: right; }
.metadata { color: #555; }
";

/// Generate a complete HTML page.
pub fn generate_html_report(report: &Report, options: RenderOptions) -> String {
    let mut page = String::new();

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    page.push_str(&format!(
        "<title>{}</title>\n",
        escape(&report.metadata.title)
    ));
    page.push_str(&format!("<style>\n{}</style>\n", STYLE));
    page.push_str("</head>\n<body>\n<div class=\"App\">\n");

    if options.include_metadata {
        page.push_str(&metadata_block(&report.metadata));
    }

    if TableDisplay::of(&report.aggregates) == TableDisplay::Populated {
        page.push_str(&aggregate_table(&report.aggregates, report.metadata.sort));
    }

    if options.include_raw_table && TableDisplay::of(&report.records) == TableDisplay::Populated {
        page.push_str(&records_table(&report.records));
    }

    page.push_str("</div>\n</body>\n</html>\n");
    page
}

fn metadata_block(metadata: &ReportMetadata) -> String {
    format!(
        "<h1>{}</h1>\n<p class=\"metadata\">Source: {} &middot; {} records &middot; {} years &middot; generated {}</p>\n",
        escape(&metadata.title),
        escape(&metadata.source),
        metadata.record_count,
        metadata.year_count,
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

fn aggregate_table(rows: &[AggregateRow], sort: SortState) -> String {
    let mut html = String::new();

    html.push_str("<div class=\"aggregated-data-table\">\n<h2>Main Table</h2>\n");
    html.push_str("<table class=\"main-table\">\n<thead>\n<tr>\n");

    for key in SortKey::ALL {
        if key == sort.key {
            html.push_str(&format!(
                "<th data-sort-key=\"{}\" aria-sort=\"{}\">{} {}</th>\n",
                key.field_name(),
                sort.direction.aria(),
                escape(key.label()),
                sort.direction.arrow()
            ));
        } else {
            html.push_str(&format!(
                "<th data-sort-key=\"{}\">{}</th>\n",
                key.field_name(),
                escape(key.label())
            ));
        }
    }

    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(row.year.as_str()),
            row.total_jobs,
            row.average_salary_text()
        ));
    }

    html.push_str("</tbody>\n</table>\n</div>\n");
    html
}

fn records_table(records: &[Record]) -> String {
    let mut html = String::new();

    html.push_str("<div class=\"full-data-table\">\n<h2>Full CSV Data</h2>\n");
    html.push_str("<table class=\"table\">\n<thead>\n<tr>\n");

    for label in RECORD_LABELS {
        html.push_str(&format!("<th>{}</th>\n", label));
    }

    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for record in records {
        html.push_str("<tr>");
        for cell in record.cells() {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</div>\n");
    html
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
