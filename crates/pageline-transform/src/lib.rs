//! Pageline Transform - flatten raw records into a tabular export
//!
//! Reads the JSONL raw sink written by extraction, projects every record
//! onto a fixed flat schema (reaching one level into nested count objects),
//! cleans the free-text description, and writes CSV or Parquet.

pub mod error;
pub mod export;
pub mod flatten;
pub mod preview;
pub mod schema;
pub mod transformer;

// Re-exports
pub use error::TransformError;
pub use export::{ExportFormat, export};
pub use flatten::{FlatRecord, FlatTable, RawRecord, clean_description, nested_count, read_raw_sink};
pub use transformer::{Config, Transformer};
