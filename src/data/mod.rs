//! Borrower data acquisition.
//!
//! - `source`: URL or file the CSV is read from
//! - `store`: once-per-session loading, column cleanup and row validation
//! - `sample`: seeded synthetic borrowers for offline use

pub mod sample;
pub mod source;
pub mod store;

pub use sample::generate_borrowers;
pub use source::{DEFAULT_DATA_URL, DataSource};
pub use store::{Dataset, DatasetStore, LoadSummary, RowError, parse_dataset};
