use crate::{
    db::{
        cascade::{CascadeExecutor, Walk, delete::record_mutation},
        document::{Document, Patch},
        store::{DocumentStore, Visibility},
    },
    error::InternalError,
    obs::sink::MutationKind,
    types::DocId,
};

impl CascadeExecutor<'_> {
    // Clear the soft-delete fields on every cascade descendant, flagged or
    // not. Children that carry none of the fields are walked but not written.
    pub(super) fn restore_children<S>(
        &self,
        txn: &mut S,
        walk: &mut Walk<'_>,
        collection: &str,
        id: DocId,
        clear: &Patch,
    ) -> Result<(), InternalError>
    where
        S: DocumentStore + ?Sized,
    {
        for relation in self
            .registry
            .relations_for_parent(collection)
            .filter(|relation| relation.on_delete.propagates_soft_delete())
        {
            let children = self.fetch_complete(txn, relation, id, Visibility::Any)?;
            let mut restored = 0;

            for child in &children {
                walk.enter(relation.child, child.id)?;
                self.restore_children(txn, walk, relation.child, child.id, clear)?;
                walk.leave();

                if self.carries_soft_delete_fields(child) {
                    txn.patch(relation.child, child.id, clear)?;
                    walk.report.restored += 1;
                    restored += 1;
                }
            }

            record_mutation(relation, MutationKind::Restored, restored);
        }

        Ok(())
    }

    fn carries_soft_delete_fields(&self, doc: &Document) -> bool {
        let fields = &self.config.soft_delete;

        doc.has(&fields.flag) || doc.has(&fields.at) || doc.has(&fields.by)
    }
}
