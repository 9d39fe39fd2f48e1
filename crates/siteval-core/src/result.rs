//! Convenience result type alias for SiteVal.

use crate::error::AppError;

/// A specialized `Result` type for SiteVal operations.
pub type AppResult<T> = Result<T, AppError>;
