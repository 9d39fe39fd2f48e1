//! Shared test helpers for integration tests.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use siteval_core::config::AppConfig;
use siteval_worker::{Collaborators, WorkerRunner};

/// How long `/slow/` paths take to answer
pub const SLOW_RESPONSE: Duration = Duration::from_millis(400);

/// A local site answering `200` under `/ok/` and `/slow/`, and `500`
/// everywhere else. `/slow/` answers after a short pause.
pub struct FakeSite {
    /// Base URL, without trailing slash
    pub base: String,
    /// Request paths in arrival order
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeSite {
    /// Start the site on an ephemeral port
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = [0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();

                if path.starts_with("/slow/") {
                    tokio::time::sleep(SLOW_RESPONSE).await;
                }
                let (status, body) = if path.starts_with("/ok/") || path.starts_with("/slow/") {
                    ("200 OK", "<html><body>ok</body></html>")
                } else {
                    ("500 Internal Server Error", "")
                };
                seen.lock().unwrap().push(path);

                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { base, requests }
    }

    /// Absolute URL for `path`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Paths requested so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// A worker assembled from configuration over a temporary data directory
pub struct TestWorker {
    /// Keeps the data directory alive
    pub dir: TempDir,
    /// Loaded configuration
    pub config: AppConfig,
    /// The assembled worker
    pub runner: WorkerRunner,
}

impl TestWorker {
    /// Build a worker with a file option store and `content` as manifest
    pub async fn new(content: Value) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("content.json");
        std::fs::write(&manifest, serde_json::to_vec(&content).unwrap()).unwrap();

        let config_path = dir.path().join("siteval.toml");
        std::fs::write(&config_path, config_toml(dir.path(), &manifest)).unwrap();

        let config = AppConfig::load(config_path.to_str().unwrap(), None).unwrap();
        let deps = Collaborators::from_config(&config).await.unwrap();
        let runner = WorkerRunner::build(config.worker.clone(), deps).await.unwrap();

        Self {
            dir,
            config,
            runner,
        }
    }

    /// Path of the persisted option document
    pub fn options_path(&self) -> &str {
        &self.config.store.path
    }
}

fn config_toml(dir: &Path, manifest: &Path) -> String {
    format!(
        r#"
[worker]
batch_limit = 5
single_event_delay_seconds = 60

[store]
provider = "file"
path = "{}"

[content]
manifest = "{}"
supported_types = ["post", "page"]

[validation]
timeout_seconds = 5
"#,
        dir.join("options.json").display(),
        manifest.display()
    )
}

/// Manifest entry for a content item
pub fn content_item(id: u64, content_type: &str, permalink: &str) -> Value {
    json!({ "id": id, "type": content_type, "permalink": permalink })
}
