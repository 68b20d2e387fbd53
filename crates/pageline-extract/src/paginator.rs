//! Offset pagination with per-request retry, streaming into a JSONL sink.
//!
//! Processing flow per offset:
//! 1. fetch the page, retrying transport errors with exponential backoff
//! 2. empty page → done
//! 3. otherwise append + flush the rows, advance offset by `page_size`

use std::time::Duration;

use indicatif::ProgressBar;
use pageline_core::{JsonlSink, RetryPolicy, TransportError, fmt_num, retry_with_sleep};

use crate::fetcher::Fetcher;

/// Error that ends an extraction run
#[derive(Debug)]
pub enum ExtractError {
    /// Every attempt at `offset` failed
    Fetch {
        offset: usize,
        attempts: u32,
        source: TransportError,
    },
    /// Writing the raw sink failed (not retried)
    Io(std::io::Error),
    /// Offsets would never advance
    ZeroPageSize,
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch {
                offset, attempts, ..
            } => {
                write!(f, "fetch at offset {offset} failed after {attempts} attempts")
            }
            Self::Io(_) => f.write_str("cannot append to raw sink"),
            Self::ZeroPageSize => f.write_str("page size must be at least 1"),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            Self::ZeroPageSize => None,
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Totals for a completed pagination run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Non-empty pages written
    pub pages: usize,
    pub rows: usize,
}

/// Drives a [`Fetcher`] from offset 0 until it returns an empty page.
pub struct Paginator<'a, F> {
    fetcher: &'a F,
    page_size: usize,
    policy: RetryPolicy,
}

impl<'a, F: Fetcher> Paginator<'a, F> {
    pub fn new(fetcher: &'a F, page_size: usize, policy: RetryPolicy) -> Self {
        Self {
            fetcher,
            page_size,
            policy,
        }
    }

    /// Fetch every page into `sink`, sleeping with `std::thread::sleep` between retries
    pub fn run(&self, sink: &mut JsonlSink, pb: &ProgressBar) -> Result<ExtractStats, ExtractError> {
        self.run_with_sleep(sink, pb, std::thread::sleep)
    }

    /// Same as [`run`](Self::run) with an injectable sleep.
    pub fn run_with_sleep(
        &self,
        sink: &mut JsonlSink,
        pb: &ProgressBar,
        mut sleep: impl FnMut(Duration),
    ) -> Result<ExtractStats, ExtractError> {
        if self.page_size == 0 {
            return Err(ExtractError::ZeroPageSize);
        }
        let mut stats = ExtractStats::default();
        let mut offset = 0usize;

        loop {
            pb.set_message(format!("{} rows, offset {offset}", fmt_num(stats.rows)));
            let label = format!("offset {offset}");
            let rows = retry_with_sleep(&label, &self.policy, pb, &mut sleep, || {
                self.fetcher.fetch_page(offset)
            })
            .map_err(|e| ExtractError::Fetch {
                offset,
                attempts: e.attempts,
                source: e.last_error,
            })?;

            if rows.is_empty() {
                break;
            }

            sink.append_page(&rows)?;
            stats.pages += 1;
            stats.rows += rows.len();
            log::info!("Fetched {} rows at offset {offset}", rows.len());

            offset += self.page_size;
        }

        Ok(stats)
    }
}
