use crate::{
    db::{
        cascade::{CascadeExecutor, Walk},
        document::Patch,
        store::{DocumentStore, Visibility},
    },
    error::InternalError,
    model::{DeletePolicy, RelationModel},
    obs::sink::{MetricsEvent, MutationKind, record},
    types::DocId,
};

impl CascadeExecutor<'_> {
    // Apply every relation where `collection` is the parent, in registry order.
    pub(super) fn delete_children<S>(
        &self,
        txn: &mut S,
        walk: &mut Walk<'_>,
        collection: &str,
        id: DocId,
    ) -> Result<(), InternalError>
    where
        S: DocumentStore + ?Sized,
    {
        for relation in self.registry.relations_for_parent(collection) {
            match relation.on_delete {
                DeletePolicy::Cascade => self.delete_cascade(txn, walk, relation, id)?,
                DeletePolicy::SetNull => self.delete_set_null(txn, walk, relation, id)?,
                DeletePolicy::Restrict => self.check_restrict(txn, relation, id)?,
            }
        }

        Ok(())
    }

    // Post-order: a child's own dependents are handled before the child goes.
    fn delete_cascade<S>(
        &self,
        txn: &mut S,
        walk: &mut Walk<'_>,
        relation: &RelationModel,
        parent_id: DocId,
    ) -> Result<(), InternalError>
    where
        S: DocumentStore + ?Sized,
    {
        let children = self.fetch_complete(txn, relation, parent_id, Visibility::Any)?;

        for child in &children {
            walk.enter(relation.child, child.id)?;
            self.delete_children(txn, walk, relation.child, child.id)?;
            walk.leave();

            txn.delete(relation.child, child.id)?;
            walk.report.deleted += 1;
        }

        record_mutation(relation, MutationKind::Deleted, children.len());

        Ok(())
    }

    // Detach children by unsetting the foreign key; they are not traversed.
    fn delete_set_null<S>(
        &self,
        txn: &mut S,
        walk: &mut Walk<'_>,
        relation: &RelationModel,
        parent_id: DocId,
    ) -> Result<(), InternalError>
    where
        S: DocumentStore + ?Sized,
    {
        let children = self.fetch_complete(txn, relation, parent_id, Visibility::Any)?;
        let detach = Patch::new().unset(relation.foreign_key);

        for child in &children {
            txn.patch(relation.child, child.id, &detach)?;
            walk.report.nulled += 1;
        }

        record_mutation(relation, MutationKind::Nulled, children.len());

        Ok(())
    }

    // Any existing child blocks the delete. The count is exact up to the
    // batch limit and a lower bound past it.
    fn check_restrict<S>(
        &self,
        txn: &S,
        relation: &RelationModel,
        parent_id: DocId,
    ) -> Result<(), InternalError>
    where
        S: DocumentStore + ?Sized,
    {
        let batch = self.fetch_children(txn, relation, parent_id, Visibility::Any)?;
        if batch.children.is_empty() {
            return Ok(());
        }

        record(MetricsEvent::RestrictBlocked {
            collection: relation.child,
        });

        Err(InternalError::restricted(
            relation.parent,
            parent_id,
            relation.child,
            batch.children.len(),
            batch.overflowed,
        ))
    }
}

pub(super) fn record_mutation(relation: &RelationModel, kind: MutationKind, rows: usize) {
    if rows == 0 {
        return;
    }

    record(MetricsEvent::RowsMutated {
        collection: relation.child,
        kind,
        rows: rows as u64,
    });
}
