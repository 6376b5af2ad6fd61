//! Cascade executor: keeps children consistent when a parent is deleted,
//! soft-deleted, or restored.
//!
//! Contract:
//! - The executor never touches the document named in the call; the caller
//!   deletes, flags, or restores it after the executor returns `Ok`.
//! - Relations are processed in registry order. Within a relation, children
//!   are processed in fetch order, and each child's own descendants are
//!   handled before the child itself.
//! - Writes are issued straight to the supplied store. The store MUST be
//!   all-or-nothing: on `Err` the caller discards the transaction, since
//!   earlier relations of the same call may already have been applied.

mod delete;
mod fetch;
mod purge;
mod restore;
mod soft_delete;
mod trail;

use crate::{
    config::CascadeConfig,
    db::{registry::RelationRegistry, store::DocumentStore},
    error::InternalError,
    obs::sink::{CascadeOp, Span},
    types::{DocId, Timestamp},
};
use serde::{Deserialize, Serialize};
use trail::Trail;

pub use purge::{PurgeReport, PurgeSkip};

///
/// CascadeReport
///
/// Child documents touched by one call. The named parent is never counted.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CascadeReport {
    pub deleted: u64,
    pub nulled: u64,
    pub flagged: u64,
    pub restored: u64,

    /// Deepest relation level reached below the root (root = 0).
    pub max_depth: usize,
}

impl CascadeReport {
    #[must_use]
    pub const fn rows_touched(&self) -> u64 {
        self.deleted + self.nulled + self.flagged + self.restored
    }

    /// Fold another report into this one.
    pub const fn absorb(&mut self, other: &Self) {
        self.deleted += other.deleted;
        self.nulled += other.nulled;
        self.flagged += other.flagged;
        self.restored += other.restored;
        if other.max_depth > self.max_depth {
            self.max_depth = other.max_depth;
        }
    }
}

///
/// Walk
///
/// Per-call traversal state: the root-to-node path and the running report.
///

struct Walk<'a> {
    trail: Trail<'a>,
    report: CascadeReport,
}

impl<'a> Walk<'a> {
    fn new(collection: &'a str, id: DocId, max_depth: usize) -> Self {
        Self {
            trail: Trail::new(collection, id, max_depth),
            report: CascadeReport::default(),
        }
    }

    // Step into a child, tracking the deepest level reached.
    fn enter(&mut self, collection: &'a str, id: DocId) -> Result<(), InternalError> {
        self.trail.enter(collection, id)?;
        self.report.max_depth = self.report.max_depth.max(self.trail.depth());

        Ok(())
    }

    fn leave(&mut self) {
        self.trail.leave();
    }
}

///
/// CascadeExecutor
///
/// Drives the three cascade entry points from a relation registry.
/// Stateless between calls; share one executor across transactions freely.
///

#[derive(Clone, Debug)]
pub struct CascadeExecutor<'r> {
    registry: &'r RelationRegistry,
    config: CascadeConfig,
}

impl<'r> CascadeExecutor<'r> {
    /// Executor with the default configuration.
    #[must_use]
    pub fn new(registry: &'r RelationRegistry) -> Self {
        Self {
            registry,
            config: CascadeConfig::default(),
        }
    }

    /// Executor with a caller-supplied configuration.
    pub fn with_config(
        registry: &'r RelationRegistry,
        config: CascadeConfig,
    ) -> Result<Self, InternalError> {
        config.validate()?;

        Ok(Self { registry, config })
    }

    #[must_use]
    pub const fn config(&self) -> &CascadeConfig {
        &self.config
    }

    #[must_use]
    pub const fn registry(&self) -> &'r RelationRegistry {
        self.registry
    }

    /// Remove or detach every dependent of `collection/id` ahead of its
    /// hard delete.
    ///
    /// `txn` must be all-or-nothing: on `Err` the caller must discard it.
    /// Fails with a conflict if any restrict relation still has children,
    /// and with an overflow error if any relation has more children than
    /// `batch_limit`.
    pub fn cascade_delete<S>(
        &self,
        txn: &mut S,
        collection: &str,
        id: DocId,
    ) -> Result<CascadeReport, InternalError>
    where
        S: DocumentStore + ?Sized,
    {
        let mut span = Span::new(CascadeOp::Delete, collection);
        let mut walk = Walk::new(collection, id, self.config.max_depth);

        self.delete_children(txn, &mut walk, collection, id)?;

        span.finish(walk.report.rows_touched());
        Ok(walk.report)
    }

    /// Flag every live cascade descendant of `collection/id` as deleted by
    /// `actor` at `at`.
    ///
    /// `txn` must be all-or-nothing: on `Err` the caller must discard it.
    pub fn cascade_soft_delete<S>(
        &self,
        txn: &mut S,
        collection: &str,
        id: DocId,
        actor: DocId,
        at: Timestamp,
    ) -> Result<CascadeReport, InternalError>
    where
        S: DocumentStore + ?Sized,
    {
        let mut span = Span::new(CascadeOp::SoftDelete, collection);
        let mut walk = Walk::new(collection, id, self.config.max_depth);
        let mark = self.config.soft_delete.mark(actor, at);

        self.soft_delete_children(txn, &mut walk, collection, id, &mark)?;

        span.finish(walk.report.rows_touched());
        Ok(walk.report)
    }

    /// Clear the soft-delete fields on every cascade descendant of
    /// `collection/id`.
    ///
    /// `txn` must be all-or-nothing: on `Err` the caller must discard it.
    pub fn cascade_restore<S>(
        &self,
        txn: &mut S,
        collection: &str,
        id: DocId,
    ) -> Result<CascadeReport, InternalError>
    where
        S: DocumentStore + ?Sized,
    {
        let mut span = Span::new(CascadeOp::Restore, collection);
        let mut walk = Walk::new(collection, id, self.config.max_depth);
        let clear = self.config.soft_delete.clear();

        self.restore_children(txn, &mut walk, collection, id, &clear)?;

        span.finish(walk.report.rows_touched());
        Ok(walk.report)
    }
}
