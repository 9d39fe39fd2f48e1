//! Built-in background tasks.

pub mod save_post;
pub mod url_validation;

pub use save_post::SavePostValidationEvent;
pub use url_validation::UrlValidationCron;
