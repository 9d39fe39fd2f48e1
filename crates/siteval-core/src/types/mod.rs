//! Shared domain types.

pub mod content;
pub mod id;
pub mod interval;
pub mod validation;

pub use content::ContentItem;
pub use id::{ContentId, UserId};
pub use interval::Interval;
pub use validation::{QueueEntry, ValidationResult};
