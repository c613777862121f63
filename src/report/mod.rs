//! Report assembly and rendering.
//!
//! A [`Report`] is a snapshot of the view state plus metadata; the
//! generators turn it into HTML, Markdown or JSON.

pub mod generator;
pub mod html;

pub use generator::{generate_json_report, generate_markdown_report, render};
pub use html::generate_html_report;

use crate::models::{AggregateRow, Record, SortState};
use crate::view::ViewState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the rendered report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report title.
    pub title: String,
    /// Where the dataset was loaded from.
    pub source: String,
    /// When the report was rendered.
    pub generated_at: DateTime<Utc>,
    /// Number of raw records.
    pub record_count: usize,
    /// Number of distinct years.
    pub year_count: usize,
    /// Active sort of the aggregate table.
    pub sort: SortState,
}

/// Rendering switches taken from the `[report]` config section.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub include_raw_table: bool,
    pub include_metadata: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_raw_table: true,
            include_metadata: true,
        }
    }
}

/// The complete salary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Aggregate rows in display order.
    pub aggregates: Vec<AggregateRow>,
    /// Raw records in parse order.
    pub records: Vec<Record>,
}

impl Report {
    /// Snapshot a view state.
    pub fn from_state(state: &ViewState, title: &str, source: &str) -> Self {
        Self {
            metadata: ReportMetadata {
                title: title.to_string(),
                source: source.to_string(),
                generated_at: Utc::now(),
                record_count: state.records.len(),
                year_count: state.rows.len(),
                sort: state.sort,
            },
            aggregates: state.rows.clone(),
            records: state.records.clone(),
        }
    }
}
