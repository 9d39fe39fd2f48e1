//! # siteval-store
//!
//! Option store and content store implementations for SiteVal:
//!
//! - **memory**: in-process stores backed by [dashmap](https://crates.io/crates/dashmap)
//! - **file**: JSON documents on disk, written atomically
//!
//! The option store backend is selected at runtime based on configuration.

pub mod file;
pub mod keys;
pub mod memory;
pub mod provider;

pub use file::{FileContentStore, FileOptionStore};
pub use memory::{MemoryContentStore, MemoryOptionStore};
pub use provider::OptionStoreManager;
