//! Pageline Core - Common infrastructure for paginated extract/transform pipelines
//!
//! This crate provides the reusable pieces: blocking HTTP over a shared
//! client, retry with exponential backoff, raw and tabular sinks, logging,
//! progress, and the two-stage pipeline driver.

pub mod accumulator;
pub mod error;
pub mod http;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod retry;
pub mod sink;

// Re-exports for convenience
pub use accumulator::{Accumulator, DEFAULT_BATCH_SIZE, write_rows};
pub use error::TransportError;
pub use http::{get_json, http_client};
pub use logging::{ProgressLogger, init_logging};
pub use pipeline::{Pipeline, RunSummary, Stage, StageOutput};
pub use progress::{ProgressContext, fmt_num};
pub use retry::{RetryExhausted, RetryPolicy, retry_with_sleep};
pub use sink::{CsvSink, JsonlSink, ParquetSink};
