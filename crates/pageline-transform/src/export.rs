//! Flat table export: CSV or Parquet

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use arrow::array::RecordBatch;
use pageline_core::{CsvSink, ParquetSink, write_rows};

use crate::error::TransformError;
use crate::flatten::{FlatAccumulator, FlatTable};
use crate::schema;

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Parquet,
}

impl ExportFormat {
    pub const ALL: [Self; 2] = [Self::Csv, Self::Parquet];

    /// Format tag, also used as file extension
    pub fn name(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }

    /// `<dir>/<base_name>.<ext>`
    pub fn output_path(self, dir: &Path, base_name: &str) -> PathBuf {
        dir.join(format!("{base_name}.{}", self.name()))
    }
}

impl FromStr for ExportFormat {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| TransformError::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Open writer for one of the export formats
enum TableSink {
    Csv(CsvSink),
    Parquet(ParquetSink),
}

impl TableSink {
    fn create(format: ExportFormat, path: &Path, zstd_level: i32) -> std::io::Result<Self> {
        Ok(match format {
            ExportFormat::Csv => Self::Csv(CsvSink::create(path)?),
            ExportFormat::Parquet => {
                Self::Parquet(ParquetSink::create(path, schema::flat(), zstd_level)?)
            }
        })
    }

    fn write_batch(&mut self, batch: &RecordBatch) -> std::io::Result<()> {
        match self {
            Self::Csv(sink) => sink.write_batch(batch),
            Self::Parquet(sink) => sink.write_batch(batch),
        }
    }

    fn finalize(self) -> std::io::Result<usize> {
        match self {
            Self::Csv(sink) => sink.finalize(),
            Self::Parquet(sink) => sink.finalize(),
        }
    }
}

/// Write `table` to `path` in `format`, preserving row order.
///
/// Returns the number of rows written.
pub fn export(
    table: FlatTable,
    format: ExportFormat,
    path: &Path,
    zstd_level: i32,
) -> Result<usize, TransformError> {
    let mut sink = TableSink::create(format, path, zstd_level)?;
    let mut acc = FlatAccumulator::default();
    write_rows(table.records, &mut acc, |batch| sink.write_batch(batch))?;
    Ok(sink.finalize()?)
}
