//! Storage backends for the per-user financial document

pub mod error;
pub mod json;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use json::{validate_user, JsonFileStore};
pub use memory::MemoryStore;
