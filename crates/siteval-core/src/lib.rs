//! # siteval-core
//!
//! Core crate for SiteVal. Contains the collaborator traits the background
//! tasks depend on, configuration schemas, typed identifiers, queue and
//! validation types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other SiteVal crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
