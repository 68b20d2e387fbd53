//! Extraction configuration

use std::path::PathBuf;
use std::time::Duration;

use md5::{Digest, Md5};
use pageline_core::RetryPolicy;

/// Request signing parameters sent with every page request.
///
/// The signature is `hash` when given, otherwise
/// `md5(ts + private_key + public_key)` when a private key is available.
#[derive(Clone, Default)]
pub struct Credentials {
    pub ts: String,
    pub public_key: String,
    pub private_key: Option<String>,
    pub hash: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("ts", &self.ts)
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key.as_ref().map(|_| "***"))
            .field("hash", &self.hash.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Credentials {
    /// Request signature, if one can be produced
    pub fn signature(&self) -> Option<String> {
        if let Some(hash) = &self.hash {
            return Some(hash.clone());
        }
        let private_key = self.private_key.as_deref()?;
        let digest = Md5::new()
            .chain_update(self.ts.as_bytes())
            .chain_update(private_key.as_bytes())
            .chain_update(self.public_key.as_bytes())
            .finalize();
        Some(format!("{digest:x}"))
    }
}

/// Runtime configuration for the extraction stage
#[derive(Debug, Clone)]
pub struct Config {
    /// Scheme + host, e.g. `https://gateway.marvel.com`
    pub base_url: String,
    /// Resource path appended to `base_url`
    pub api_path: String,
    /// Records per request (`limit`); also the offset stride
    pub page_size: usize,
    pub retry: RetryPolicy,
    /// Per-request timeout
    pub timeout: Duration,
    pub credentials: Credentials,
    /// Where the JSONL raw sink is written
    pub raw_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://gateway.marvel.com".to_string(),
            api_path: "/v1/public/characters".to_string(),
            page_size: 100,
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(10),
            credentials: Credentials::default(),
            raw_path: PathBuf::from("data/characters_raw.jsonl"),
        }
    }
}

impl Config {
    /// Full resource URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.base_url.starts_with("https://"));
    }

    #[test]
    fn endpoint_joins_with_single_slash() {
        let mut config = Config::default();
        assert_eq!(
            config.endpoint(),
            "https://gateway.marvel.com/v1/public/characters"
        );
        config.base_url = "http://127.0.0.1:8080/".to_string();
        config.api_path = "items".to_string();
        assert_eq!(config.endpoint(), "http://127.0.0.1:8080/items");
    }

    #[test]
    fn explicit_hash_wins() {
        let creds = Credentials {
            ts: "1".into(),
            public_key: "pub".into(),
            private_key: Some("priv".into()),
            hash: Some("abc".into()),
        };
        assert_eq!(creds.signature().as_deref(), Some("abc"));
    }

    #[test]
    fn signature_is_md5_of_ts_private_public() {
        // md5("abc"), RFC 1321 test vector
        let creds = Credentials {
            ts: "a".into(),
            public_key: "c".into(),
            private_key: Some("b".into()),
            hash: None,
        };
        assert_eq!(
            creds.signature().as_deref(),
            Some("900150983cd24fb0d6963f7d28e17f72")
        );
    }

    #[test]
    fn no_signature_without_keys() {
        assert_eq!(Credentials::default().signature(), None);
    }

    #[test]
    fn debug_masks_secrets() {
        let creds = Credentials {
            private_key: Some("topsecret".into()),
            ..Default::default()
        };
        assert!(!format!("{creds:?}").contains("topsecret"));
    }
}
