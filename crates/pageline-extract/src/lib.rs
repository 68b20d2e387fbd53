//! Pageline Extract - paginated API extraction
//!
//! Fetches every page of an offset-paginated JSON API, retrying failed
//! requests with exponential backoff, and streams the records into a
//! line-delimited JSON file.
//!
//! # Example
//!
//! ```ignore
//! use pageline_core::Stage;
//! use pageline_extract::{Config, Extractor};
//!
//! let mut extractor = Extractor::new(Config::default());
//! let output = extractor.run()?;
//! println!("{} rows at {}", output.rows, output.path.display());
//! ```

pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod paginator;

// Re-exports
pub use config::{Config, Credentials};
pub use extractor::Extractor;
pub use fetcher::{Fetcher, HttpFetcher, Page, results_from};
pub use paginator::{ExtractError, ExtractStats, Paginator};
