//! Collaborator traits defined in `siteval-core` and implemented by other
//! crates.

pub mod access;
pub mod content;
pub mod option_store;
pub mod validation;

pub use access::UserAccess;
pub use content::{ContentStore, ContentSupport};
pub use option_store::OptionStore;
pub use validation::ValidationProvider;
