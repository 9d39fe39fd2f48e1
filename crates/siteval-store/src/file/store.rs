//! JSON-file option store.
//!
//! All options live in one JSON object on disk. Every read goes to the file
//! so separate processes (server and CLI) observe each other's writes.
//! Writes go to a sibling temp file which is then renamed over the
//! document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use siteval_core::error::{AppError, ErrorKind};
use siteval_core::result::AppResult;
use siteval_core::traits::option_store::OptionStore;

/// Option store persisted as a single JSON document.
#[derive(Debug, Clone)]
pub struct FileOptionStore {
    /// Path of the JSON document.
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Arc<Mutex<()>>,
}

impl FileOptionStore {
    /// Create a store at `path`, creating parent directories as needed.
    pub async fn new(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create option store directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document. A missing file is an empty document.
    async fn read_document(&self) -> AppResult<Map<String, Value>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read option store: {}", self.path.display()),
                    e,
                ));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(map) => Ok(map),
            _ => {
                warn!(path = %self.path.display(), "Option store is not a JSON object, treating as empty");
                Ok(Map::new())
            }
        }
    }

    async fn write_document(&self, document: &Map<String, Value>) -> AppResult<()> {
        let json = serde_json::to_vec_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, &json).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write option store: {}", tmp.display()),
                e,
            )
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace option store: {}", self.path.display()),
                e,
            )
        })?;

        debug!(path = %self.path.display(), bytes = json.len(), "Option store written");
        Ok(())
    }
}

#[async_trait]
impl OptionStore for FileOptionStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let mut document = self.read_document().await?;
        Ok(document.remove(key))
    }

    async fn put(&self, key: &str, value: Value) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        document.insert(key.to_string(), value);
        self.write_document(&document).await
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        if document.remove(key).is_none() {
            return Ok(false);
        }
        self.write_document(&document).await?;
        Ok(true)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.read_document().await.is_ok())
    }
}
