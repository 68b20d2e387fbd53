//! Single-page fetch against the paginated resource

use std::time::Duration;

use pageline_core::{TransportError, get_json};
use serde_json::Value;

use crate::config::{Config, Credentials};

/// One response's worth of raw records; empty means end of pagination
pub type Page = Vec<Value>;

/// Source of pages addressed by record offset
pub trait Fetcher {
    fn fetch_page(&self, offset: usize) -> Result<Page, TransportError>;
}

/// Pull the record list out of `data.results`.
///
/// Any other shape is treated as an empty page.
pub fn results_from(payload: Value) -> Page {
    let Value::Object(mut root) = payload else {
        log::debug!("response root is not an object, treating as empty page");
        return Vec::new();
    };
    match root.remove("data") {
        Some(Value::Object(mut data)) => match data.remove("results") {
            Some(Value::Array(rows)) => rows,
            _ => {
                log::debug!("response has no data.results list, treating as empty page");
                Vec::new()
            }
        },
        _ => {
            log::debug!("response has no data object, treating as empty page");
            Vec::new()
        }
    }
}

/// HTTP GET fetcher: `endpoint?ts&apikey&hash&limit&offset`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    endpoint: String,
    credentials: Credentials,
    page_size: usize,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: config.endpoint(),
            credentials: config.credentials.clone(),
            page_size: config.page_size,
            timeout: config.timeout,
        }
    }

    /// Query parameters for the page at `offset`
    fn query(&self, offset: usize) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("ts", self.credentials.ts.clone()),
            ("apikey", self.credentials.public_key.clone()),
        ];
        if let Some(hash) = self.credentials.signature() {
            params.push(("hash", hash));
        }
        params.push(("limit", self.page_size.to_string()));
        params.push(("offset", offset.to_string()));
        params
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_page(&self, offset: usize) -> Result<Page, TransportError> {
        let payload = get_json(&self.endpoint, &self.query(offset), self.timeout)?;
        Ok(results_from(payload))
    }
}
