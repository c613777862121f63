//! Markdown and JSON report generation.

use crate::cli::OutputFormat;
use crate::models::{AggregateRow, Record, SortKey, SortState, RECORD_LABELS};
use crate::report::html::generate_html_report;
use crate::report::{RenderOptions, Report, ReportMetadata};
use crate::view::TableDisplay;
use anyhow::Result;

/// Render a report in the requested format.
pub fn render(report: &Report, format: OutputFormat, options: RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(generate_html_report(report, options)),
        OutputFormat::Markdown => Ok(generate_markdown_report(report, options)),
        OutputFormat::Json => generate_json_report(report),
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: RenderOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.metadata.title));

    if options.include_metadata {
        output.push_str(&generate_metadata_section(&report.metadata));
    }

    if TableDisplay::of(&report.aggregates) == TableDisplay::Populated {
        output.push_str("## Main Table\n\n");
        output.push_str(&aggregate_table_markdown(
            &report.aggregates,
            report.metadata.sort,
        ));
        output.push('\n');
    }

    if options.include_raw_table && TableDisplay::of(&report.records) == TableDisplay::Populated {
        output.push_str("## Full CSV Data\n\n");
        output.push_str(&records_table_markdown(&report.records));
        output.push('\n');
    }

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.record_count));
    section.push_str(&format!("- **Years:** {}\n", metadata.year_count));
    section.push_str(&format!("- **Sorted by:** {}\n\n", metadata.sort));

    section
}

/// The aggregate table as Markdown, with an arrow on the active column.
pub fn aggregate_table_markdown(rows: &[AggregateRow], sort: SortState) -> String {
    let mut table = String::new();

    let headers: Vec<String> = SortKey::ALL
        .iter()
        .map(|key| {
            if *key == sort.key {
                format!("{} {}", key.label(), sort.direction.arrow())
            } else {
                key.label().to_string()
            }
        })
        .collect();

    table.push_str(&format!("| {} |\n", headers.join(" | ")));
    table.push_str("|:---|---:|---:|\n");

    for row in rows {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(row.year.as_str()),
            row.total_jobs,
            row.average_salary_text()
        ));
    }

    table
}

fn records_table_markdown(records: &[Record]) -> String {
    let mut table = String::new();

    table.push_str(&format!("| {} |\n", RECORD_LABELS.join(" | ")));
    table.push_str(&format!("|{}\n", ":---|".repeat(RECORD_LABELS.len())));

    for record in records {
        let cells: Vec<String> = record.cells().iter().map(|c| escape_cell(c)).collect();
        table.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    table
}

/// Make a value safe inside a single Markdown table row.
fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SalaryPolicy, SortDirection};
    use crate::view::{ViewEvent, ViewState};

    fn record(year: &str, title: &str, salary: &str) -> Record {
        Record {
            work_year: year.to_string(),
            job_title: title.to_string(),
            salary_in_usd: salary.to_string(),
            ..Record::default()
        }
    }

    fn create_test_report() -> Report {
        let state = ViewState::new(SalaryPolicy::Reject)
            .apply(ViewEvent::Loaded(vec![
                record("2020", "Data Scientist", "100000"),
                record("2020", "Analyst | BI", "120000"),
                record("2021", "ML Engineer", "150000"),
            ]))
            .unwrap();

        Report::from_state(&state, "Job Salaries", "test.csv")
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, RenderOptions::default());

        assert!(markdown.contains("# Job Salaries"));
        assert!(markdown.contains("- **Source:** test.csv"));
        assert!(markdown.contains("## Main Table"));
        assert!(markdown.contains("| 2020 | 2 | 110000.00 |"));
        assert!(markdown.contains("| 2021 | 1 | 150000.00 |"));
        assert!(markdown.contains("## Full CSV Data"));
        assert!(markdown.contains("Analyst \\| BI"));
    }

    #[test]
    fn test_multiline_cell_stays_in_row() {
        let state = ViewState::new(SalaryPolicy::Reject)
            .apply(ViewEvent::Loaded(vec![record(
                "2020",
                "Data Scientist\r\nLead\nML",
                "100000",
            )]))
            .unwrap();
        let report = Report::from_state(&state, "Job Salaries", "test.csv");

        let markdown = generate_markdown_report(&report, RenderOptions::default());
        assert!(markdown.contains("| Data Scientist<br>Lead<br>ML |"));
        assert_eq!(escape_cell("a\rb"), "a<br>b");
    }

    #[test]
    fn test_markdown_options() {
        let report = create_test_report();
        let markdown = generate_markdown_report(
            &report,
            RenderOptions {
                include_raw_table: false,
                include_metadata: false,
            },
        );

        assert!(markdown.contains("## Main Table"));
        assert!(!markdown.contains("## Full CSV Data"));
        assert!(!markdown.contains("**Source:**"));
    }

    #[test]
    fn test_aggregate_table_arrow() {
        let report = create_test_report();
        let sort = SortState {
            key: SortKey::TotalJobs,
            direction: SortDirection::Descending,
        };

        let table = aggregate_table_markdown(&report.aggregates, sort);
        assert!(table.starts_with("| Year | Number of Jobs ▼ | Average Salary (USD) |"));
    }

    #[test]
    fn test_empty_report_renders_no_tables() {
        let state = ViewState::new(SalaryPolicy::Reject)
            .apply(ViewEvent::Loaded(Vec::new()))
            .unwrap();
        let report = Report::from_state(&state, "Job Salaries", "empty.csv");

        let markdown = generate_markdown_report(&report, RenderOptions::default());
        assert!(!markdown.contains("## Main Table"));
        assert!(!markdown.contains("## Full CSV Data"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"totalJobs\": 2"));
        assert!(json.contains("\"averageSalary\": 110000.0"));
        assert!(json.contains("\"salary_in_usd\": \"150000\""));
    }

    #[test]
    fn test_render_dispatch() {
        let report = create_test_report();
        let options = RenderOptions::default();

        assert!(render(&report, OutputFormat::Html, options)
            .unwrap()
            .starts_with("<!DOCTYPE html>"));
        assert!(render(&report, OutputFormat::Markdown, options)
            .unwrap()
            .starts_with("# Job Salaries"));
        assert!(render(&report, OutputFormat::Json, options)
            .unwrap()
            .starts_with('{'));
    }
}
