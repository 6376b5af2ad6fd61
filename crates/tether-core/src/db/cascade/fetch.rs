use crate::{
    db::{
        cascade::CascadeExecutor,
        document::Document,
        store::{DocumentStore, IndexQuery, Visibility},
    },
    error::InternalError,
    model::RelationModel,
    obs::sink::{MetricsEvent, record},
    types::DocId,
    value::Value,
};

///
/// Batch
///
/// Children of one parent under one relation, capped at the batch limit.
/// `overflowed` is set when the store held more than the limit.
///

pub(super) struct Batch {
    pub(super) children: Vec<Document>,
    pub(super) overflowed: bool,
}

impl CascadeExecutor<'_> {
    // Fetch up to `batch_limit` children, probing one past the limit so
    // overflow is detected rather than silently truncated.
    pub(super) fn fetch_children<S>(
        &self,
        txn: &S,
        relation: &RelationModel,
        parent_id: DocId,
        visibility: Visibility<'_>,
    ) -> Result<Batch, InternalError>
    where
        S: DocumentStore + ?Sized,
    {
        let limit = self.config.batch_limit;
        let query = IndexQuery {
            collection: relation.child,
            index: relation.index,
            field: relation.foreign_key,
            value: Value::Id(parent_id),
            visibility,
            limit: limit.saturating_add(1),
        };

        let mut children = txn.query_index(&query)?;
        record(MetricsEvent::ChildrenFetched {
            collection: relation.child,
            rows: children.len() as u64,
        });

        let overflowed = children.len() > limit;
        children.truncate(limit);

        Ok(Batch {
            children,
            overflowed,
        })
    }

    // Fetch children a policy will mutate; any overflow aborts the call
    // before the first write for this relation.
    pub(super) fn fetch_complete<S>(
        &self,
        txn: &S,
        relation: &RelationModel,
        parent_id: DocId,
        visibility: Visibility<'_>,
    ) -> Result<Vec<Document>, InternalError>
    where
        S: DocumentStore + ?Sized,
    {
        let batch = self.fetch_children(txn, relation, parent_id, visibility)?;
        if batch.overflowed {
            record(MetricsEvent::OverflowBlocked {
                collection: relation.child,
            });

            return Err(InternalError::overflow(
                relation.parent,
                parent_id,
                relation.child,
                self.config.batch_limit,
            ));
        }

        Ok(batch.children)
    }
}
