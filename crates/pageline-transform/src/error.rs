//! Transformation error type

/// Error from flattening the raw sink or exporting the table
#[derive(Debug)]
pub enum TransformError {
    /// A raw sink line is not a JSON object (1-based line number)
    Parse { line: usize, message: String },
    /// Output format tag not in {csv, parquet}
    UnsupportedFormat(String),
    /// Reading the sink or writing the output failed (encoder errors included)
    Io(std::io::Error),
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse { line, message } => {
                write!(f, "No valid JSON data to transform (line {line}): {message}")
            }
            Self::UnsupportedFormat(tag) => write!(f, "Unsupported format: {tag}"),
            Self::Io(_) => f.write_str("I/O error"),
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse { .. } | Self::UnsupportedFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for TransformError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
