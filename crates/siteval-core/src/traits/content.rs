//! Content store and eligibility traits.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{ContentId, ContentItem};

/// Read access to content items.
#[async_trait]
pub trait ContentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Look up a content item by id.
    async fn find(&self, id: ContentId) -> AppResult<Option<ContentItem>>;

    /// Whether the item exists.
    async fn exists(&self, id: ContentId) -> AppResult<bool> {
        Ok(self.find(id).await?.is_some())
    }

    /// Public permalink of the item.
    async fn permalink(&self, id: ContentId) -> AppResult<Option<String>> {
        Ok(self.find(id).await?.map(|item| item.permalink))
    }

    /// Content type of the item.
    async fn content_type(&self, id: ContentId) -> AppResult<Option<String>> {
        Ok(self.find(id).await?.map(|item| item.content_type))
    }

    /// Whether the item is a revision. Unknown ids are not revisions.
    async fn is_revision(&self, id: ContentId) -> AppResult<bool> {
        Ok(self
            .find(id)
            .await?
            .map(|item| item.is_revision())
            .unwrap_or(false))
    }
}

/// Decides whether a content item may be validated at all.
pub trait ContentSupport: Send + Sync + std::fmt::Debug + 'static {
    /// Whether `item` is eligible for validation.
    fn is_supported(&self, item: &ContentItem) -> bool;
}
