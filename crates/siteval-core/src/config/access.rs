//! Dev tools access configuration.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Users who get live in-editor validation and are therefore exempt from
/// background scheduling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Users with dev tools enabled.
    #[serde(default)]
    pub dev_tools_users: Vec<UserId>,
}
