//! Errors raised while loading and reducing a dataset.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch dataset from {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("dataset at {0} is not valid UTF-8")]
    Encoding(String),

    #[error("failed to read CSV header row: {0}")]
    Header(#[source] csv::Error),

    #[error("dataset is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("malformed CSV at line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("record {index} (year {year}) has a non-numeric salary_in_usd: '{value}'")]
    InvalidSalary {
        index: usize,
        year: String,
        value: String,
    },
}
