//! Blocking HTTP GET over a shared async client.
//!
//! Uses async reqwest internally, driven by a shared tokio runtime via
//! `block_on`, so callers see a plain synchronous interface.

use std::sync::LazyLock;
use std::time::Duration;

use crate::error::TransportError;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<Result<reqwest::Client, String>> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(2)
        .build()
        .map_err(|e| e.to_string())
});

/// Shared tokio runtime for HTTP operations.
static SHARED_RUNTIME: LazyLock<Result<tokio::runtime::Runtime, String>> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .map_err(|e| e.to_string())
});

fn init_error(what: &str, message: &str) -> TransportError {
    TransportError::Http {
        status: None,
        message: format!("{what} unavailable: {message}"),
    }
}

/// Get shared HTTP client.
pub fn http_client() -> Result<&'static reqwest::Client, TransportError> {
    SHARED_CLIENT
        .as_ref()
        .map_err(|e| init_error("HTTP client", e))
}

/// GET `url` with `query`, bounded by `timeout`, and decode the body as JSON.
///
/// Non-2xx statuses are errors; the body is only read on success.
pub fn get_json(
    url: &str,
    query: &[(&str, String)],
    timeout: Duration,
) -> Result<serde_json::Value, TransportError> {
    let client = http_client()?;
    let runtime = SHARED_RUNTIME
        .as_ref()
        .map_err(|e| init_error("HTTP runtime", e))?;

    let body = runtime
        .handle()
        .block_on(async {
            client
                .get(url)
                .query(query)
                .timeout(timeout)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        })
        .map_err(TransportError::from_reqwest)?;

    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn spawn_one_shot_http(status: &'static str, payload: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request_buf = [0u8; 2048];
            let _ = stream.read(&mut request_buf);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
                payload.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            let _ = stream.flush();
        });
        format!("http://{addr}/v1/items")
    }

    #[test]
    fn get_json_decodes_body() {
        let url = spawn_one_shot_http("200 OK", r#"{"data":{"results":[1,2]}}"#);
        let value = get_json(&url, &[("offset", "0".to_string())], Duration::from_secs(5))
            .unwrap();
        assert_eq!(value["data"]["results"][1], 2);
    }

    #[test]
    fn get_json_non_2xx_is_http_error() {
        let url = spawn_one_shot_http("503 Service Unavailable", "{}");
        let err = get_json(&url, &[], Duration::from_secs(5)).unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn get_json_invalid_body_is_decode_error() {
        let url = spawn_one_shot_http("200 OK", "<html>oops</html>");
        let err = get_json(&url, &[], Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[test]
    fn get_json_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = get_json(
            &format!("http://127.0.0.1:{port}/"),
            &[],
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert_eq!(err.status(), None);
    }
}
