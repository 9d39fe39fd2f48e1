//! Configured implementations of the dev tools and eligibility predicates.

use std::collections::HashSet;

use siteval_core::config::{AccessConfig, ContentConfig};
use siteval_core::traits::access::UserAccess;
use siteval_core::traits::content::ContentSupport;
use siteval_core::types::{ContentItem, UserId};

/// Dev tools access granted to a fixed set of users.
#[derive(Debug, Clone, Default)]
pub struct DevToolsUserAccess {
    enabled: HashSet<UserId>,
}

impl DevToolsUserAccess {
    /// Grant dev tools to `users`.
    pub fn new(users: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            enabled: users.into_iter().collect(),
        }
    }

    /// Build from configuration.
    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(config.dev_tools_users.iter().copied())
    }
}

impl UserAccess for DevToolsUserAccess {
    fn is_user_enabled(&self, user: Option<&UserId>) -> bool {
        user.is_some_and(|user| self.enabled.contains(user))
    }
}

/// Content is eligible when its type is in a configured list.
#[derive(Debug, Clone, Default)]
pub struct SupportedContentTypes {
    types: HashSet<String>,
}

impl SupportedContentTypes {
    /// Support exactly `types`.
    pub fn new<S: Into<String>>(types: impl IntoIterator<Item = S>) -> Self {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from configuration.
    pub fn from_config(config: &ContentConfig) -> Self {
        Self::new(config.supported_types.iter().cloned())
    }
}

impl ContentSupport for SupportedContentTypes {
    fn is_supported(&self, item: &ContentItem) -> bool {
        self.types.contains(&item.content_type)
    }
}
