use crate::{
    db::{
        cascade::{CascadeExecutor, CascadeReport},
        store::{TombstoneQuery, TombstoneScan},
    },
    error::InternalError,
    obs::sink::{CascadeOp, Span},
    types::{DocId, Timestamp},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// PurgeReport
///
/// Outcome of one expired soft-delete purge.
/// `deleted` counts the expired documents themselves; `cascaded` counts
/// the dependents removed or detached on their behalf.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PurgeReport {
    pub deleted: u64,
    pub deleted_by_collection: BTreeMap<String, u64>,
    pub cascaded: CascadeReport,
    pub skipped: Vec<PurgeSkip>,
}

///
/// PurgeSkip
///
/// An expired document left in place because its cascade was refused.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PurgeSkip {
    pub collection: String,
    pub id: DocId,
    pub reason: String,
}

impl CascadeExecutor<'_> {
    /// Hard-delete documents soft-deleted more than `purge_retention_ms`
    /// before `now`, cascading each one first.
    ///
    /// At most `batch_limit` expired documents are deleted per collection;
    /// call again to drain a larger backlog. Collections are purged in the
    /// order given.
    ///
    /// A document whose cascade hits a restrict conflict or an overflow is
    /// rolled back to a savepoint, recorded in `skipped`, and passed over so
    /// the rest of the batch still drains. Any other error aborts the run;
    /// the caller must then discard `txn`.
    pub fn purge_expired<S>(
        &self,
        txn: &mut S,
        collections: &[&str],
        now: Timestamp,
    ) -> Result<PurgeReport, InternalError>
    where
        S: TombstoneScan + ?Sized,
    {
        let mut span = Span::new(CascadeOp::Purge, "*");
        let cutoff = now.saturating_sub_millis(self.config.purge_retention_ms);
        let mut report = PurgeReport::default();

        for &collection in collections {
            self.purge_collection(txn, collection, cutoff, &mut report)?;
        }

        span.finish(report.deleted + report.cascaded.rows_touched());
        Ok(report)
    }

    // Page through one collection's tombstones until a batch is deleted or
    // the scan runs dry. Skipped documents do not count toward the batch.
    fn purge_collection<S>(
        &self,
        txn: &mut S,
        collection: &str,
        cutoff: Timestamp,
        report: &mut PurgeReport,
    ) -> Result<(), InternalError>
    where
        S: TombstoneScan + ?Sized,
    {
        let fields = &self.config.soft_delete;
        let limit = self.config.batch_limit;
        let mut purged = 0;
        let mut after = None;

        while purged < limit {
            let page = txn.scan_deleted(&TombstoneQuery {
                collection,
                flag_field: &fields.flag,
                at_field: &fields.at,
                cutoff,
                after,
                limit,
            })?;
            let exhausted = page.len() < limit;

            for doc in page {
                if purged == limit {
                    break;
                }
                after = Some(doc.id);

                let savepoint = txn.savepoint();
                match self.purge_one(txn, collection, doc.id) {
                    Ok(Some(cascaded)) => {
                        report.cascaded.absorb(&cascaded);
                        report.deleted += 1;
                        *report
                            .deleted_by_collection
                            .entry(collection.to_string())
                            .or_default() += 1;
                        purged += 1;
                    }
                    Ok(None) => {}
                    Err(err) if err.is_conflict() || err.is_overflow() => {
                        txn.rollback_to(savepoint)?;
                        report.skipped.push(PurgeSkip {
                            collection: collection.to_string(),
                            id: doc.id,
                            reason: err.message,
                        });
                    }
                    Err(err) => return Err(err),
                }
            }

            if exhausted {
                break;
            }
        }

        Ok(())
    }

    // Cascade then delete one tombstone. `None` when an earlier purge in
    // this run already removed it.
    fn purge_one<S>(
        &self,
        txn: &mut S,
        collection: &str,
        id: DocId,
    ) -> Result<Option<CascadeReport>, InternalError>
    where
        S: TombstoneScan + ?Sized,
    {
        let cascaded = self.cascade_delete(txn, collection, id)?;

        match txn.delete(collection, id) {
            Ok(()) => Ok(Some(cascaded)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}
