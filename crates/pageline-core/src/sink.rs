//! Output sinks: line-delimited JSON raw sink, Parquet and CSV table writers

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::RecordBatch;
use arrow::csv::WriterBuilder;
use arrow::datatypes::Schema;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;

/// Append-only JSONL writer for raw records.
///
/// Truncates the file on creation and holds the handle until [`finish`].
///
/// [`finish`]: JsonlSink::finish
pub struct JsonlSink {
    writer: BufWriter<File>,
    path: PathBuf,
    row_count: usize,
}

impl std::fmt::Debug for JsonlSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlSink")
            .field("path", &self.path)
            .field("row_count", &self.row_count)
            .finish_non_exhaustive()
    }
}

impl JsonlSink {
    /// Create (or truncate) the sink file, creating parent directories
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            row_count: 0,
        })
    }

    /// Append one page of records and flush, one JSON document per line
    pub fn append_page(&mut self, rows: &[serde_json::Value]) -> io::Result<()> {
        for row in rows {
            serde_json::to_writer(&mut self.writer, row)?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        self.row_count += rows.len();
        Ok(())
    }

    /// Flush and close, returning the number of rows written
    pub fn finish(mut self) -> io::Result<usize> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(self.row_count)
    }
}

/// `<file>.tmp` next to the final path, with any stale copy removed
fn tmp_path_for(final_path: &Path) -> io::Result<PathBuf> {
    let mut name = final_path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"))?
        .to_os_string();
    name.push(".tmp");
    let tmp_path = final_path.with_file_name(name);

    // Clean up stale tmp file
    if tmp_path.exists() {
        fs::remove_file(&tmp_path)?;
    }
    Ok(tmp_path)
}

/// Buffered parquet writer with atomic tmp→rename
pub struct ParquetSink {
    writer: ArrowWriter<File>,
    tmp_path: PathBuf,
    final_path: PathBuf,
    row_count: usize,
}

impl std::fmt::Debug for ParquetSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParquetSink")
            .field("final_path", &self.final_path)
            .field("row_count", &self.row_count)
            .finish_non_exhaustive()
    }
}

impl ParquetSink {
    /// Create a new sink writing to a temporary file
    pub fn create(final_path: &Path, schema: &Arc<Schema>, zstd_level: i32) -> io::Result<Self> {
        let level = ZstdLevel::try_new(zstd_level)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let tmp_path = tmp_path_for(final_path)?;
        let file = File::create(&tmp_path)?;
        let props = WriterProperties::builder()
            .set_compression(Compression::ZSTD(level))
            .build();

        let writer =
            ArrowWriter::try_new(file, Arc::clone(schema), Some(props)).map_err(io::Error::other)?;

        Ok(Self {
            writer,
            tmp_path,
            final_path: final_path.to_path_buf(),
            row_count: 0,
        })
    }

    /// Write a record batch
    pub fn write_batch(&mut self, batch: &RecordBatch) -> io::Result<()> {
        self.row_count += batch.num_rows();
        self.writer.write(batch).map_err(io::Error::other)
    }

    /// Finalize: flush footer and atomically rename tmp → final
    pub fn finalize(self) -> io::Result<usize> {
        let row_count = self.row_count;
        self.writer.close().map_err(io::Error::other)?;
        fs::rename(&self.tmp_path, &self.final_path)?;
        Ok(row_count)
    }
}

/// CSV writer (header row, no index column) with atomic tmp→rename
pub struct CsvSink {
    writer: arrow::csv::Writer<File>,
    tmp_path: PathBuf,
    final_path: PathBuf,
    row_count: usize,
}

impl std::fmt::Debug for CsvSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink")
            .field("final_path", &self.final_path)
            .field("row_count", &self.row_count)
            .finish_non_exhaustive()
    }
}

impl CsvSink {
    /// Create a new sink writing to a temporary file
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let tmp_path = tmp_path_for(final_path)?;
        let file = File::create(&tmp_path)?;
        let writer = WriterBuilder::new().with_header(true).build(file);
        Ok(Self {
            writer,
            tmp_path,
            final_path: final_path.to_path_buf(),
            row_count: 0,
        })
    }

    /// Write a record batch; the header is emitted with the first batch
    pub fn write_batch(&mut self, batch: &RecordBatch) -> io::Result<()> {
        self.row_count += batch.num_rows();
        self.writer.write(batch).map_err(io::Error::other)
    }

    /// Finalize: sync and atomically rename tmp → final
    pub fn finalize(self) -> io::Result<usize> {
        let row_count = self.row_count;
        let file = self.writer.into_inner();
        file.sync_all()?;
        drop(file);
        fs::rename(&self.tmp_path, &self.final_path)?;
        Ok(row_count)
    }
}
