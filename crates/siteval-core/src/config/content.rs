//! Content source configuration.

use serde::{Deserialize, Serialize};

/// Content catalog and validation eligibility settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// JSON manifest listing the known content items.
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Content types eligible for background validation.
    #[serde(default = "default_supported_types")]
    pub supported_types: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            supported_types: default_supported_types(),
        }
    }
}

fn default_manifest() -> String {
    "data/content.json".to_string()
}

fn default_supported_types() -> Vec<String> {
    vec!["post".to_string(), "page".to_string()]
}
