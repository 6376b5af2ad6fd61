//! Store contract consumed by the cascade executor.
//!
//! The host supplies the implementation, scoped to its own transaction. All
//! three primitives must participate in that transaction: the executor
//! issues writes as it walks and relies on the host to discard every one of
//! them if the call returns `Err`.

use crate::{
    db::document::{Document, Patch},
    error::InternalError,
    types::{DocId, Timestamp},
    value::Value,
};

///
/// Visibility
///
/// Which children an index lookup may return.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Visibility<'a> {
    /// Every matching document, flagged or not.
    Any,
    /// Only documents whose `flag_field` is not `true`.
    Live { flag_field: &'a str },
}

impl Visibility<'_> {
    /// Whether `doc` passes this visibility filter.
    #[must_use]
    pub fn admits(&self, doc: &Document) -> bool {
        match self {
            Self::Any => true,
            Self::Live { flag_field } => !doc.is_flagged(flag_field),
        }
    }
}

///
/// IndexQuery
///
/// Indexed equality lookup: `collection.index` where `field == value`,
/// returning at most `limit` documents in store-defined order.
///

#[derive(Clone, Debug)]
pub struct IndexQuery<'a> {
    pub collection: &'a str,
    pub index: &'a str,
    pub field: &'a str,
    pub value: Value,
    pub visibility: Visibility<'a>,
    pub limit: usize,
}

///
/// DocumentStore
///

pub trait DocumentStore {
    /// Run one bounded indexed equality lookup.
    fn query_index(&self, query: &IndexQuery<'_>) -> Result<Vec<Document>, InternalError>;

    /// Hard-delete one document.
    fn delete(&mut self, collection: &str, id: DocId) -> Result<(), InternalError>;

    /// Apply a partial update to one document.
    fn patch(&mut self, collection: &str, id: DocId, patch: &Patch) -> Result<(), InternalError>;
}

///
/// TombstoneQuery
///
/// Scan for documents flagged deleted strictly before `cutoff`, in
/// ascending id order, starting after `after` when it is set.
///

#[derive(Clone, Debug)]
pub struct TombstoneQuery<'a> {
    pub collection: &'a str,
    pub flag_field: &'a str,
    pub at_field: &'a str,
    pub cutoff: Timestamp,
    pub after: Option<DocId>,
    pub limit: usize,
}

///
/// TombstoneScan
///
/// Optional store extension used by the expired soft-delete purge.
/// A purge rolls back one document's cascade without discarding the rest
/// of the transaction, so implementors must support savepoints.
///

pub trait TombstoneScan: DocumentStore {
    type Savepoint;

    fn scan_deleted(&self, query: &TombstoneQuery<'_>) -> Result<Vec<Document>, InternalError>;

    /// Mark the current write position.
    fn savepoint(&self) -> Self::Savepoint;

    /// Undo every write made since `savepoint` was taken.
    fn rollback_to(&mut self, savepoint: Self::Savepoint) -> Result<(), InternalError>;
}
