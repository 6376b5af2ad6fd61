//! Core runtime for Tether: the relation registry, the store contract, and
//! the cascade executor that keeps children consistent when a parent is
//! deleted, soft-deleted, or restored.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod obs;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No stores or error types are re-exported here.
///

pub mod prelude {
    pub use crate::{
        config::{CascadeConfig, SoftDeleteFields},
        db::{CascadeExecutor, CascadeReport, Patch, RelationRegistry},
        model::{CollectionModel, DeletePolicy, IndexModel, RelationModel, SchemaModel},
        types::{DocId, Timestamp},
        value::Value,
    };
}
