//! Static schema description: collections, their indexes, and the
//! parent/child relations the cascade executor walks.

pub mod collection;
pub mod index;
pub mod relation;
pub mod schema;

pub use collection::CollectionModel;
pub use index::IndexModel;
pub use relation::{DeletePolicy, RelationModel};
pub use schema::SchemaModel;
