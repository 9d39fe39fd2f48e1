//! Content store backed by a JSON manifest.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::fs;
use tracing::{info, warn};

use siteval_core::error::{AppError, ErrorKind};
use siteval_core::result::AppResult;
use siteval_core::traits::content::ContentStore;
use siteval_core::types::{ContentId, ContentItem};

use crate::memory::MemoryContentStore;

/// Modification time and size identifying one version of the manifest.
type Stamp = Option<(SystemTime, u64)>;

#[derive(Debug)]
struct Snapshot {
    stamp: Stamp,
    items: MemoryContentStore,
}

/// Content store populated from a JSON array of [`ContentItem`]s.
///
/// Lookups reload the manifest whenever it changed on disk, so content
/// saved after startup is visible to a running worker. A missing manifest
/// is an empty store.
#[derive(Debug, Clone)]
pub struct FileContentStore {
    path: PathBuf,
    snapshot: Arc<RwLock<Snapshot>>,
}

impl FileContentStore {
    /// Load the manifest at `path`.
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let stamp = stamp(&path).await?;
        let items = read_manifest(&path, stamp).await?;
        info!(path = %path.display(), count = items.len(), "Loaded content manifest");

        Ok(Self {
            path,
            snapshot: Arc::new(RwLock::new(Snapshot { stamp, items })),
        })
    }

    /// Number of loaded items.
    pub fn len(&self) -> usize {
        self.current().len()
    }

    /// Whether the manifest is empty.
    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    fn current(&self) -> MemoryContentStore {
        let snapshot = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
        snapshot.items.clone()
    }

    /// Reload the manifest if it changed since the last read.
    async fn refresh(&self) -> AppResult<MemoryContentStore> {
        let stamp = stamp(&self.path).await?;
        {
            let snapshot = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
            if snapshot.stamp == stamp {
                return Ok(snapshot.items.clone());
            }
        }

        let items = read_manifest(&self.path, stamp).await?;
        info!(path = %self.path.display(), count = items.len(), "Reloaded content manifest");

        let mut snapshot = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *snapshot = Snapshot {
            stamp,
            items: items.clone(),
        };
        Ok(items)
    }
}

async fn stamp(path: &Path) -> AppResult<Stamp> {
    match fs::metadata(path).await {
        Ok(meta) => Ok(Some((meta.modified()?, meta.len()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to stat content manifest: {}", path.display()),
            e,
        )),
    }
}

async fn read_manifest(path: &Path, stamp: Stamp) -> AppResult<MemoryContentStore> {
    if stamp.is_none() {
        warn!(path = %path.display(), "Content manifest not found, using an empty catalog");
        return Ok(MemoryContentStore::new());
    }

    let bytes = fs::read(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to read content manifest: {}", path.display()),
            e,
        )
    })?;

    let items: Vec<ContentItem> = serde_json::from_slice(&bytes)?;
    Ok(MemoryContentStore::from_items(items))
}

#[async_trait]
impl ContentStore for FileContentStore {
    async fn find(&self, id: ContentId) -> AppResult<Option<ContentItem>> {
        self.refresh().await?.find(id).await
    }
}
