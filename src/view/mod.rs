//! View state for the two tables.

pub mod state;

pub use state::{TableDisplay, ViewEvent, ViewState};
