//! Transport error type for paginated HTTP fetches

/// Error from a single page request.
///
/// Covers everything that can go wrong between sending the GET and holding a
/// decoded JSON document: connection failures, timeouts, non-2xx statuses and
/// bodies that are not JSON at all. A well-formed JSON body with an unexpected
/// shape is *not* an error (it is read as an empty page).
#[derive(Debug)]
pub enum TransportError {
    /// HTTP error with optional status code
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Response body could not be decoded as JSON
    Decode(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Decode(message) => write!(f, "invalid JSON body: {message}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl TransportError {
    /// Create HTTP error from reqwest error.
    ///
    /// The URL is stripped: the query string carries the API key and signature.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        let e = e.without_url();
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }

    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            Self::Decode(_) => None,
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
