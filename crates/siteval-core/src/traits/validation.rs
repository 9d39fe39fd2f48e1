//! URL validation provider trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::ValidationResult;

/// Validates a single URL.
///
/// `Ok(None)` means the provider produced an empty result; `Err` is an
/// error signal. Callers treat both as a failed validation.
#[async_trait]
pub trait ValidationProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Validate `url` of the given content type. When `force` is set, any
    /// cached result is bypassed.
    async fn get_url_validation(
        &self,
        url: &str,
        content_type: &str,
        force: bool,
    ) -> AppResult<Option<ValidationResult>>;
}
