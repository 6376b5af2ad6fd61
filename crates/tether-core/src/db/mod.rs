//! Documents, the store contract, the relation registry, the reference
//! in-memory store, and the cascade executor.

mod cascade;
mod document;
mod memory;
mod registry;
pub mod store;

// re-exports
pub use cascade::{CascadeExecutor, CascadeReport, PurgeReport, PurgeSkip};
pub use document::{Document, Patch, PatchOp};
pub use memory::{MemoryStore, MemoryTxn};
pub use registry::{RegistryError, RegistryIssue, RelationRegistry};
pub use store::{DocumentStore, IndexQuery, TombstoneQuery, TombstoneScan, Visibility};
