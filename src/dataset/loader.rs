//! Dataset loading.
//!
//! Resolves a dataset source (bundled, local file, or HTTP URL), reads it
//! to completion and decodes it as UTF-8. This is the only asynchronous
//! step of a session.

use crate::dataset::error::DatasetError;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// The dataset shipped inside the binary.
pub const BUNDLED_DATASET: &str = include_str!("../../data/salaries.csv");

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// The bundled sample dataset.
    Bundled,
    /// A CSV file on disk.
    File(PathBuf),
    /// A CSV document served over HTTP(S).
    Url(String),
}

impl DataSource {
    /// Interpret a user-supplied location.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }

    /// Resolve an optional location, falling back to the bundled dataset.
    pub fn from_option(location: Option<&str>) -> Self {
        match location {
            Some(loc) if !loc.trim().is_empty() => Self::parse(loc),
            _ => DataSource::Bundled,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Bundled => write!(f, "bundled dataset"),
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Options for loading a dataset.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Whether to show a spinner while loading.
    pub show_progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            show_progress: true,
        }
    }
}

/// Read the whole dataset as text.
pub async fn load_text(source: &DataSource, options: &LoadOptions) -> Result<String, DatasetError> {
    info!("Loading dataset from {}", source);

    let spinner = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Loading {}", source));
        Some(pb)
    } else {
        None
    };

    let result = match source {
        DataSource::Bundled => Ok(BUNDLED_DATASET.to_string()),
        DataSource::File(path) => read_file(path).await,
        DataSource::Url(url) => fetch_url(url, options.timeout).await,
    };

    if let Some(pb) = spinner {
        match &result {
            Ok(text) => pb.finish_with_message(format!("Loaded {} bytes", text.len())),
            Err(_) => pb.abandon_with_message("Load failed"),
        }
    }

    result
}

async fn read_file(path: &Path) -> Result<String, DatasetError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    decode(bytes, &path.display().to_string())
}

async fn fetch_url(url: &str, timeout: Duration) -> Result<String, DatasetError> {
    let http_err = |source: reqwest::Error| DatasetError::Http {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(http_err)?;

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(http_err)?;

    let bytes = response.bytes().await.map_err(http_err)?;
    debug!("Fetched {} bytes from {}", bytes.len(), url);

    decode(bytes.to_vec(), url)
}

/// Decode raw bytes as UTF-8, dropping a leading byte-order mark.
fn decode(bytes: Vec<u8>, origin: &str) -> Result<String, DatasetError> {
    let text = String::from_utf8(bytes).map_err(|_| DatasetError::Encoding(origin.to_string()))?;

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn quiet() -> LoadOptions {
        LoadOptions {
            show_progress: false,
            ..LoadOptions::default()
        }
    }

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.com/data.csv"),
            DataSource::Url("https://example.com/data.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("data/salaries.csv"),
            DataSource::File(PathBuf::from("data/salaries.csv"))
        );
        assert_eq!(DataSource::from_option(None), DataSource::Bundled);
        assert_eq!(DataSource::from_option(Some("  ")), DataSource::Bundled);
    }

    #[test]
    fn test_load_bundled() {
        let text = tokio_test::block_on(load_text(&DataSource::Bundled, &quiet())).unwrap();
        assert!(text.starts_with("work_year,"));
    }

    #[test]
    fn test_load_file_strips_bom() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("\u{feff}work_year\n2020\n".as_bytes()).unwrap();

        let source = DataSource::File(file.path().to_path_buf());
        let text = tokio_test::block_on(load_text(&source, &quiet())).unwrap();
        assert_eq!(text, "work_year\n2020\n");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::File(dir.path().join("missing.csv"));

        let err = tokio_test::block_on(load_text(&source, &quiet())).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x77, 0xff, 0xfe, 0x0a]).unwrap();

        let source = DataSource::File(file.path().to_path_buf());
        let err = tokio_test::block_on(load_text(&source, &quiet())).unwrap_err();
        assert!(matches!(err, DatasetError::Encoding(_)));
    }
}
