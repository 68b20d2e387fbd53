//! Extraction against a local HTTP server speaking the paginated API.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use pageline_core::{RetryPolicy, Stage};
use pageline_extract::{Config, Credentials, Extractor};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Request targets seen by the server, in arrival order
type Seen = Arc<Mutex<Vec<String>>>;

fn read_request_target(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    head.split_whitespace().nth(1).unwrap_or_default().to_string()
}

fn query_param(target: &str, key: &str) -> Option<String> {
    let query = target.split_once('?')?.1;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| v.to_string())
    })
}

fn respond(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).unwrap();
    let _ = stream.flush();
}

/// Serve `total` character records, failing the first `fail_first` requests with 500.
fn spawn_api(total: usize, fail_first: usize) -> (String, Seen) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: Seen = Arc::default();
    let seen_by_server = Arc::clone(&seen);

    thread::spawn(move || {
        for (i, stream) in listener.incoming().enumerate() {
            let Ok(mut stream) = stream else { continue };
            let target = read_request_target(&mut stream);
            seen_by_server.lock().unwrap().push(target.clone());

            if i < fail_first {
                respond(&mut stream, "500 Internal Server Error", "{}");
                continue;
            }
            let offset: usize = query_param(&target, "offset")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            let limit: usize = query_param(&target, "limit")
                .and_then(|v| v.parse().ok())
                .unwrap_or(20);
            let results: Vec<Value> = (offset..total.min(offset + limit))
                .map(|i| {
                    json!({
                        "id": 1_000 + i,
                        "name": format!("Character {i}"),
                        "description": "",
                        "comics": {"available": i, "items": []},
                    })
                })
                .collect();
            let body = json!({"code": 200, "data": {"offset": offset, "results": results}});
            respond(&mut stream, "200 OK", &body.to_string());
        }
    });

    (format!("http://{addr}"), seen)
}

fn config(base_url: String, dir: &TempDir) -> Config {
    Config {
        base_url,
        api_path: "/v1/public/characters".to_string(),
        page_size: 2,
        retry: RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
        },
        timeout: Duration::from_secs(5),
        credentials: Credentials {
            ts: "1".into(),
            public_key: "pub".into(),
            private_key: None,
            hash: Some("sig".into()),
        },
        raw_path: dir.path().join("raw.jsonl"),
    }
}

#[test]
fn paginates_until_empty_page() {
    let dir = TempDir::new().unwrap();
    let (base_url, seen) = spawn_api(5, 0);

    let output = Extractor::new(config(base_url, &dir)).run().unwrap();
    assert_eq!(output.rows, 5);

    let seen = seen.lock().unwrap();
    let offsets: Vec<String> = seen
        .iter()
        .map(|t| query_param(t, "offset").unwrap())
        .collect();
    assert_eq!(offsets, vec!["0", "2", "4", "6"]);
    assert!(seen[0].starts_with("/v1/public/characters?"));
    assert_eq!(query_param(&seen[0], "apikey").as_deref(), Some("pub"));
    assert_eq!(query_param(&seen[0], "hash").as_deref(), Some("sig"));
    assert_eq!(query_param(&seen[0], "limit").as_deref(), Some("2"));

    let content = std::fs::read_to_string(&output.path).unwrap();
    let names: Vec<String> = content
        .lines()
        .map(|l| serde_json::from_str::<Value>(l).unwrap()["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "Character 0",
            "Character 1",
            "Character 2",
            "Character 3",
            "Character 4"
        ]
    );
}

#[test]
fn recovers_from_server_errors() {
    let dir = TempDir::new().unwrap();
    let (base_url, seen) = spawn_api(3, 2);

    let output = Extractor::new(config(base_url, &dir)).run().unwrap();
    assert_eq!(output.rows, 3);
    // 2 failures + 3 successful pages (2, 1, 0 rows)
    assert_eq!(seen.lock().unwrap().len(), 5);
}

#[test]
fn gives_up_after_max_retries() {
    let dir = TempDir::new().unwrap();
    let (base_url, seen) = spawn_api(3, usize::MAX);

    let err = Extractor::new(config(base_url, &dir)).run().unwrap_err();
    assert!(format!("{err:#}").contains("HTTP 500"));
    assert_eq!(seen.lock().unwrap().len(), 4);
}
