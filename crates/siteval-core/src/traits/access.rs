//! Dev tools user access.

use crate::types::UserId;

/// Tells whether a user has dev tools (live validation) enabled.
pub trait UserAccess: Send + Sync + std::fmt::Debug + 'static {
    /// `user` is `None` for anonymous or system actors.
    fn is_user_enabled(&self, user: Option<&UserId>) -> bool;
}
