//! Extraction stage: paginate the API into the raw JSONL sink

use anyhow::Context;
use indicatif::ProgressBar;
use pageline_core::{JsonlSink, Stage, StageOutput, fmt_num};

use crate::config::Config;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::paginator::Paginator;

/// Extraction stage over any [`Fetcher`] (HTTP by default)
pub struct Extractor<F = HttpFetcher> {
    config: Config,
    fetcher: F,
    pb: ProgressBar,
}

impl Extractor<HttpFetcher> {
    pub fn new(config: Config) -> Self {
        let fetcher = HttpFetcher::new(&config);
        Self::with_fetcher(config, fetcher)
    }
}

impl<F: Fetcher> Extractor<F> {
    pub fn with_fetcher(config: Config, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            pb: ProgressBar::hidden(),
        }
    }

    /// Attach a progress line (see `ProgressContext::stage_line`)
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.pb = pb;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

impl<F: Fetcher> Stage for Extractor<F> {
    fn run(&mut self) -> anyhow::Result<StageOutput> {
        let raw_path = &self.config.raw_path;
        log::info!(
            "Extracting {} (page size {}, max retries {})",
            self.config.endpoint(),
            self.config.page_size,
            self.config.retry.max_retries
        );

        let mut sink = JsonlSink::create(raw_path)
            .with_context(|| format!("Cannot create raw sink {}", raw_path.display()))?;

        let stats = Paginator::new(&self.fetcher, self.config.page_size, self.config.retry)
            .run(&mut sink, &self.pb);
        self.pb.finish_and_clear();
        let stats = stats.context("Extraction aborted")?;

        let rows = sink
            .finish()
            .with_context(|| format!("Cannot close raw sink {}", raw_path.display()))?;

        if rows == 0 {
            log::warn!("Extraction finished but no data was retrieved.");
        } else {
            log::info!(
                "Extraction finished: {} records saved over {} pages.",
                fmt_num(rows),
                stats.pages
            );
        }

        Ok(StageOutput::new(raw_path.clone(), rows))
    }
}
