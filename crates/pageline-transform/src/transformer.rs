//! Transformation stage: raw JSONL sink → flat table → CSV/Parquet

use std::path::PathBuf;

use anyhow::Context;
use pageline_core::{Stage, StageOutput, fmt_num};

use crate::export::{ExportFormat, export};
use crate::flatten::{FlatTable, read_raw_sink};
use crate::preview::{PREVIEW_COL_WIDTH, PREVIEW_ROWS, format_preview};

/// Runtime configuration for the transformation stage
#[derive(Debug, Clone)]
pub struct Config {
    /// JSONL raw sink written by extraction
    pub raw_path: PathBuf,
    /// Directory receiving `<transformed_file>.<format>`
    pub data_dir: PathBuf,
    /// Output file name without extension
    pub transformed_file: String,
    /// Format tag: `csv` or `parquet`
    pub format: String,
    /// Zstd compression level for parquet output
    pub zstd_level: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("data/characters_raw.jsonl"),
            data_dir: PathBuf::from("data"),
            transformed_file: "characters".to_string(),
            format: "csv".to_string(),
            zstd_level: 3,
        }
    }
}

impl Config {
    /// `<data_dir>/<transformed_file>.<format>`, whether or not the tag is supported
    pub fn output_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", self.transformed_file, self.format))
    }
}

/// Transformation stage
#[derive(Debug)]
pub struct Transformer {
    config: Config,
}

impl Transformer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read and flatten the raw sink
    pub fn flatten(&self) -> anyhow::Result<FlatTable> {
        let raw_path = &self.config.raw_path;
        let records = read_raw_sink(raw_path)
            .with_context(|| format!("Cannot read raw sink {}", raw_path.display()))?;
        Ok(FlatTable::from_raw(&records))
    }
}

impl Stage for Transformer {
    fn run(&mut self) -> anyhow::Result<StageOutput> {
        log::info!("Starting transformation...");
        let output_path = self.config.output_path();

        let table = self.flatten()?;
        if table.is_empty() {
            log::warn!("Transformation aborted: empty dataset.");
            return Ok(StageOutput::new(output_path, 0));
        }

        log::info!(
            "Sample output:\n{}",
            format_preview(&table, PREVIEW_ROWS, PREVIEW_COL_WIDTH)
        );
        let (rows, cols) = table.shape();
        log::info!("Table shape: ({}, {cols})", fmt_num(rows));

        let format: ExportFormat = self.config.format.parse()?;
        std::fs::create_dir_all(&self.config.data_dir).with_context(|| {
            format!("Cannot create output directory {}", self.config.data_dir.display())
        })?;
        let written = export(table, format, &output_path, self.config.zstd_level)
            .with_context(|| format!("Cannot write {}", output_path.display()))?;

        log::info!("Transformed data saved to {}", output_path.display());
        Ok(StageOutput::new(output_path, written))
    }
}
