//! Two-stage pipeline: extraction then transformation.
//!
//! Each stage reports where it wrote its output and how many rows it holds.
//! The pipeline never propagates stage errors: a failed or empty extraction,
//! or a failed transformation, is logged and turned into `None`.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::progress::fmt_num;

/// Output location and row count of one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub path: PathBuf,
    pub rows: usize,
}

impl StageOutput {
    pub fn new(path: impl Into<PathBuf>, rows: usize) -> Self {
        Self {
            path: path.into(),
            rows,
        }
    }

    /// Zero rows; the pipeline stops before transforming nothing
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

impl fmt::Display for StageOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows at {}", fmt_num(self.rows), self.path.display())
    }
}

/// One step of the pipeline
pub trait Stage {
    fn run(&mut self) -> anyhow::Result<StageOutput>;
}

/// Result of a fully successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub raw: StageOutput,
    pub transformed: StageOutput,
    pub extract_elapsed: Duration,
    pub transform_elapsed: Duration,
    pub total_elapsed: Duration,
}

/// Sequential extract → transform driver
pub struct Pipeline<E, T> {
    extractor: E,
    transformer: T,
}

impl<E: Stage, T: Stage> Pipeline<E, T> {
    pub fn new(extractor: E, transformer: T) -> Self {
        Self {
            extractor,
            transformer,
        }
    }

    /// Run both stages, short-circuiting on failure or empty extraction
    pub fn run(&mut self) -> Option<RunSummary> {
        log::info!("Pipeline started.");
        let pipeline_start = Instant::now();

        let start = Instant::now();
        let raw = match self.extractor.run() {
            Ok(output) => output,
            Err(e) => {
                log::error!("Extraction failed: {e:#}");
                return None;
            }
        };
        let extract_elapsed = start.elapsed();
        log::info!(
            "Extraction step completed in {:.2}s, {raw}",
            extract_elapsed.as_secs_f64()
        );

        if raw.is_empty() {
            log::warn!("Pipeline aborted: no data extracted.");
            return None;
        }

        let start = Instant::now();
        let transformed = match self.transformer.run() {
            Ok(output) => output,
            Err(e) => {
                log::error!("Transformation failed: {e:#}");
                return None;
            }
        };
        let transform_elapsed = start.elapsed();
        log::info!(
            "Transformation step completed in {:.2}s, {transformed}",
            transform_elapsed.as_secs_f64()
        );

        let total_elapsed = pipeline_start.elapsed();
        log::info!(
            "Pipeline finished successfully in {:.2}s.",
            total_elapsed.as_secs_f64()
        );

        Some(RunSummary {
            raw,
            transformed,
            extract_elapsed,
            transform_elapsed,
            total_elapsed,
        })
    }

    /// Give the stages back (e.g. to inspect them after a run)
    pub fn into_stages(self) -> (E, T) {
        (self.extractor, self.transformer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockStage {
        output: StageOutput,
        fail: bool,
        calls: usize,
    }

    impl MockStage {
        fn ok(path: &str, rows: usize) -> Self {
            Self {
                output: StageOutput::new(path, rows),
                fail: false,
                calls: 0,
            }
        }

        fn failing(path: &str) -> Self {
            Self {
                fail: true,
                ..Self::ok(path, 5)
            }
        }
    }

    impl Stage for MockStage {
        fn run(&mut self) -> anyhow::Result<StageOutput> {
            self.calls += 1;
            if self.fail {
                anyhow::bail!("stage failed");
            }
            Ok(self.output.clone())
        }
    }

    #[test]
    fn success_returns_both_outputs() {
        let mut pipeline = Pipeline::new(
            MockStage::ok("raw.jsonl", 5),
            MockStage::ok("out.csv", 5),
        );
        let summary = pipeline.run().unwrap();
        assert_eq!(summary.raw, StageOutput::new("raw.jsonl", 5));
        assert_eq!(summary.transformed, StageOutput::new("out.csv", 5));
        assert!(summary.total_elapsed >= summary.extract_elapsed);
    }

    #[test]
    fn zero_rows_skips_transformation() {
        let mut pipeline = Pipeline::new(
            MockStage::ok("raw.jsonl", 0),
            MockStage::ok("out.csv", 0),
        );
        assert!(pipeline.run().is_none());
        let (extractor, transformer) = pipeline.into_stages();
        assert_eq!(extractor.calls, 1);
        assert_eq!(transformer.calls, 0);
    }

    #[test]
    fn extraction_failure_skips_transformation() {
        let mut pipeline = Pipeline::new(
            MockStage::failing("raw.jsonl"),
            MockStage::ok("out.csv", 5),
        );
        assert!(pipeline.run().is_none());
        assert_eq!(pipeline.into_stages().1.calls, 0);
    }

    #[test]
    fn transformation_failure_yields_none() {
        let mut pipeline = Pipeline::new(
            MockStage::ok("raw.jsonl", 5),
            MockStage::failing("out.csv"),
        );
        assert!(pipeline.run().is_none());
        assert_eq!(pipeline.into_stages().1.calls, 1);
    }

    #[test]
    fn mismatched_counts_are_reported_as_is() {
        let mut pipeline = Pipeline::new(
            MockStage::ok("raw.jsonl", 10),
            MockStage::ok("out.csv", 8),
        );
        let summary = pipeline.run().unwrap();
        assert_eq!(summary.raw.rows, 10);
        assert_eq!(summary.transformed.rows, 8);
    }

    #[test]
    fn stage_output_display() {
        let out = StageOutput::new("data/raw.jsonl", 1_500);
        assert_eq!(out.to_string(), "1,500 rows at data/raw.jsonl");
    }
}
