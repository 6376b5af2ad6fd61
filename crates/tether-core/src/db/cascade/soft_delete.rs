use crate::{
    db::{
        cascade::{CascadeExecutor, Walk, delete::record_mutation},
        document::Patch,
        store::{DocumentStore, Visibility},
    },
    error::InternalError,
    obs::sink::MutationKind,
    types::DocId,
};

impl CascadeExecutor<'_> {
    // Flag live cascade descendants. Children already flagged are skipped
    // along with their subtrees; set_null and restrict relations are ignored.
    // The batch limit counts flagged children too, matching restore.
    pub(super) fn soft_delete_children<S>(
        &self,
        txn: &mut S,
        walk: &mut Walk<'_>,
        collection: &str,
        id: DocId,
        mark: &Patch,
    ) -> Result<(), InternalError>
    where
        S: DocumentStore + ?Sized,
    {
        let live = Visibility::Live {
            flag_field: &self.config.soft_delete.flag,
        };

        for relation in self
            .registry
            .relations_for_parent(collection)
            .filter(|relation| relation.on_delete.propagates_soft_delete())
        {
            let children = self.fetch_complete(txn, relation, id, Visibility::Any)?;
            let mut flagged = 0;

            for child in children.iter().filter(|child| live.admits(child)) {
                walk.enter(relation.child, child.id)?;
                self.soft_delete_children(txn, walk, relation.child, child.id, mark)?;
                walk.leave();

                txn.patch(relation.child, child.id, mark)?;
                walk.report.flagged += 1;
                flagged += 1;
            }

            record_mutation(relation, MutationKind::Flagged, flagged);
        }

        Ok(())
    }
}
