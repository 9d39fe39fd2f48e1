//! Validation queue entries and validation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// A well-formed entry of the URL validation queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// URL to validate.
    pub url: String,
    /// Content type the URL belongs to.
    #[serde(rename = "type")]
    pub content_type: String,
}

impl QueueEntry {
    /// Create a queue entry.
    pub fn new(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    /// Parse a raw stored entry.
    ///
    /// Returns `None` unless both `url` and `type` are non-empty strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        let url = non_empty_str(value.get("url")?)?;
        let content_type = non_empty_str(value.get("type")?)?;
        Some(Self::new(url, content_type))
    }

    /// Opaque hash identifying this entry in the queue.
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.content_type.as_bytes());
        hasher.update(b":");
        hasher.update(self.url.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Encode as a stored queue value.
    pub fn to_value(&self) -> Value {
        serde_json::json!({ "url": self.url, "type": self.content_type })
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Result of a single URL validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// The validated URL.
    pub url: String,
    /// Content type passed along with the URL.
    pub content_type: String,
    /// HTTP status returned by the URL.
    pub status_code: u16,
    /// Size of the fetched document.
    pub body_bytes: u64,
    /// When the validation ran.
    pub validated_at: DateTime<Utc>,
    /// Whether the result was requested with the cache bypassed.
    pub forced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_well_formed_entry() {
        let entry = QueueEntry::from_value(&json!({"url": "http://x/1", "type": "post"}));
        assert_eq!(entry, Some(QueueEntry::new("http://x/1", "post")));
    }

    #[test]
    fn test_parse_rejects_missing_or_empty_fields() {
        assert!(QueueEntry::from_value(&json!({"url": "http://x/2"})).is_none());
        assert!(QueueEntry::from_value(&json!({"type": "post"})).is_none());
        assert!(QueueEntry::from_value(&json!({"url": "", "type": "post"})).is_none());
        assert!(QueueEntry::from_value(&json!({"url": 3, "type": "post"})).is_none());
        assert!(QueueEntry::from_value(&json!("http://x/3")).is_none());
    }

    #[test]
    fn test_hash_is_stable_and_type_sensitive() {
        let a = QueueEntry::new("http://x/1", "post");
        let b = QueueEntry::new("http://x/1", "page");
        assert_eq!(a.hash(), a.clone().hash());
        assert_ne!(a.hash(), b.hash());
        assert_eq!(a.hash().len(), 64);
    }
}
