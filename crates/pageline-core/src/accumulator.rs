//! Batch accumulator trait and generic row writer

use arrow::array::RecordBatch;
use arrow::error::ArrowError;

/// Default batch size for flushing accumulated rows into a `RecordBatch`.
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Accumulator trait for batch processing of rows into Arrow `RecordBatch`.
pub trait Accumulator {
    type Row;

    /// Push a row into the accumulator
    fn push(&mut self, row: Self::Row);

    /// Number of rows currently buffered
    fn len(&self) -> usize;

    /// Check if buffer is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if buffer is full and should be flushed
    fn is_full(&self) -> bool {
        self.len() >= DEFAULT_BATCH_SIZE
    }

    /// Take buffered rows as a RecordBatch, resetting internal state
    fn take_batch(&mut self) -> Result<RecordBatch, ArrowError>;
}

/// Push rows through an accumulator, flushing full batches to `write_batch`.
///
/// Row order is preserved across batches. Returns the number of rows written.
pub fn write_rows<A: Accumulator>(
    rows: impl IntoIterator<Item = A::Row>,
    acc: &mut A,
    mut write_batch: impl FnMut(&RecordBatch) -> std::io::Result<()>,
) -> std::io::Result<usize> {
    let mut rows_written = 0usize;
    for row in rows {
        acc.push(row);
        rows_written += 1;
        if acc.is_full() {
            write_batch(&acc.take_batch().map_err(std::io::Error::other)?)?;
        }
    }
    if !acc.is_empty() {
        write_batch(&acc.take_batch().map_err(std::io::Error::other)?)?;
    }
    Ok(rows_written)
}
