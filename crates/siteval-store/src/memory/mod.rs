//! In-memory stores.

pub mod content;
pub mod store;

pub use content::MemoryContentStore;
pub use store::MemoryOptionStore;
