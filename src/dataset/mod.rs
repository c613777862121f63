//! Dataset loading and CSV parsing.

pub mod error;
pub mod loader;
pub mod parser;

pub use error::DatasetError;
pub use loader::{load_text, DataSource, LoadOptions};
pub use parser::RecordParser;
