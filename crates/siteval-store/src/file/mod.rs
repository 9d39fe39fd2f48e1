//! Stores backed by JSON documents on the local filesystem.

pub mod content;
pub mod store;

pub use content::FileContentStore;
pub use store::FileOptionStore;
