//! In-memory content store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use siteval_core::result::AppResult;
use siteval_core::traits::content::ContentStore;
use siteval_core::types::{ContentId, ContentItem};

/// Content store holding items in memory. Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    items: Arc<DashMap<ContentId, ContentItem>>,
}

impl MemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a list of items. Later duplicates win.
    pub fn from_items(items: impl IntoIterator<Item = ContentItem>) -> Self {
        let store = Self::new();
        for item in items {
            store.insert(item);
        }
        store
    }

    /// Insert or replace an item.
    pub fn insert(&self, item: ContentItem) {
        self.items.insert(item.id, item);
    }

    /// Remove an item. Returns the removed item if present.
    pub fn remove(&self, id: ContentId) -> Option<ContentItem> {
        self.items.remove(&id).map(|(_, item)| item)
    }

    /// Number of known items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn find(&self, id: ContentId) -> AppResult<Option<ContentItem>> {
        Ok(self.items.get(&id).map(|entry| entry.value().clone()))
    }
}
