//! Content items as seen by the validation worker.

use serde::{Deserialize, Serialize};

use super::id::ContentId;

/// A published (or draft) content item known to the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Content identifier.
    pub id: ContentId,
    /// Content type slug, e.g. `"post"` or `"page"`.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Public permalink of the item.
    pub permalink: String,
    /// Set when this item is a revision of another item.
    #[serde(default)]
    pub revision_of: Option<ContentId>,
}

impl ContentItem {
    /// Create a non-revision content item.
    pub fn new(id: ContentId, content_type: impl Into<String>, permalink: impl Into<String>) -> Self {
        Self {
            id,
            content_type: content_type.into(),
            permalink: permalink.into(),
            revision_of: None,
        }
    }

    /// Mark this item as a revision of `parent`.
    pub fn revision_of(mut self, parent: ContentId) -> Self {
        self.revision_of = Some(parent);
        self
    }

    /// Whether this item is a revision.
    pub fn is_revision(&self) -> bool {
        self.revision_of.is_some()
    }
}
