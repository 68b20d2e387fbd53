//! Raw JSONL → flat records → Arrow record batches

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Builder, RecordBatch, StringBuilder};
use arrow::error::ArrowError;
use pageline_core::Accumulator;
use serde_json::{Map, Value};

use crate::error::TransformError;
use crate::schema::{self, COUNT_FIELDS, COUNT_KEY};

/// Raw record as stored in the sink
pub type RawRecord = Map<String, Value>;

/// Collapse every whitespace run into one space and trim both ends
pub fn clean_description(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Integer `available` of the sub-object `key`, if it is a mapping that has one
pub fn nested_count(record: &RawRecord, key: &str) -> Option<i64> {
    record
        .get(key)?
        .as_object()?
        .get(COUNT_KEY)?
        .as_i64()
}

/// String view of a scalar field; null/missing → None
fn text_field(record: &RawRecord, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// One flattened row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecord {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: String,
    /// One entry per [`COUNT_FIELDS`] column, same order
    pub counts: [Option<i64>; 4],
}

impl FlatRecord {
    pub fn from_raw(record: &RawRecord) -> Self {
        let description = text_field(record, "description").unwrap_or_default();
        Self {
            id: record.get("id").and_then(Value::as_i64),
            name: text_field(record, "name"),
            description: clean_description(&description),
            counts: COUNT_FIELDS.map(|key| nested_count(record, key)),
        }
    }
}

/// In-memory flattened table, rows in sink order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatTable {
    pub records: Vec<FlatRecord>,
}

impl FlatTable {
    pub fn from_raw(records: &[RawRecord]) -> Self {
        Self {
            records: records.iter().map(FlatRecord::from_raw).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), schema::flat().fields().len())
    }
}

/// Read every record of a JSONL raw sink.
///
/// Blank lines are skipped; any other line must be a JSON object.
pub fn read_raw_sink(path: &Path) -> Result<Vec<RawRecord>, TransformError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let parse_error = |message: String| TransformError::Parse {
            line: idx + 1,
            message,
        };
        match serde_json::from_str::<Value>(&line) {
            Ok(Value::Object(record)) => records.push(record),
            Ok(other) => {
                return Err(parse_error(format!(
                    "expected a JSON object, got {}",
                    kind_of(&other)
                )));
            }
            Err(e) => return Err(parse_error(e.to_string())),
        }
    }
    Ok(records)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Builds [`schema::flat`] batches from [`FlatRecord`]s
pub struct FlatAccumulator {
    id: Int64Builder,
    name: StringBuilder,
    description: StringBuilder,
    counts: [Int64Builder; 4],
    len: usize,
}

impl Default for FlatAccumulator {
    fn default() -> Self {
        Self {
            id: Int64Builder::new(),
            name: StringBuilder::new(),
            description: StringBuilder::new(),
            counts: std::array::from_fn(|_| Int64Builder::new()),
            len: 0,
        }
    }
}

impl Accumulator for FlatAccumulator {
    type Row = FlatRecord;

    fn push(&mut self, row: FlatRecord) {
        self.id.append_option(row.id);
        self.name.append_option(row.name);
        self.description.append_value(row.description);
        for (builder, count) in self.counts.iter_mut().zip(row.counts) {
            builder.append_option(count);
        }
        self.len += 1;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn take_batch(&mut self) -> Result<RecordBatch, ArrowError> {
        self.len = 0;
        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(self.id.finish()),
            Arc::new(self.name.finish()),
            Arc::new(self.description.finish()),
        ];
        columns.extend(
            self.counts
                .iter_mut()
                .map(|b| Arc::new(b.finish()) as ArrayRef),
        );
        RecordBatch::try_new(Arc::clone(schema::flat()), columns)
    }
}
