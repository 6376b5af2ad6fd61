//! Reference in-memory document store.
//!
//! Collections, fields, and indexes come from a `SchemaModel`; lookups on
//! an undeclared index, or on an index that does not lead with the queried
//! field, fail the way a misconfigured production index would. Writes made
//! through a `MemoryTxn` are journaled and undone if the transaction is not
//! committed.

mod txn;
#[cfg(test)]
mod tests;

use crate::{
    config::SoftDeleteFields,
    db::{
        document::{Document, Patch, PatchOp},
        store::{DocumentStore, IndexQuery, TombstoneQuery},
    },
    error::InternalError,
    model::{CollectionModel, SchemaModel},
    types::DocId,
    value::Value,
};
use std::{collections::BTreeMap, ops::Bound};

pub use txn::MemoryTxn;

///
/// MemoryStore
///

#[derive(Clone, Debug)]
pub struct MemoryStore {
    schema: SchemaModel,
    soft_delete: SoftDeleteFields,
    collections: BTreeMap<&'static str, BTreeMap<DocId, Document>>,
    next_id: u128,
}

impl MemoryStore {
    #[must_use]
    pub fn new(schema: SchemaModel) -> Self {
        Self::with_soft_delete_fields(schema, SoftDeleteFields::default())
    }

    #[must_use]
    pub fn with_soft_delete_fields(schema: SchemaModel, soft_delete: SoftDeleteFields) -> Self {
        let collections = schema
            .collections
            .iter()
            .map(|collection| (collection.name, BTreeMap::new()))
            .collect();

        Self {
            schema,
            soft_delete,
            collections,
            next_id: 1,
        }
    }

    /// Insert a new document and return its id.
    pub fn insert<'f>(
        &mut self,
        collection: &str,
        fields: impl IntoIterator<Item = (&'f str, Value)>,
    ) -> Result<DocId, InternalError> {
        let model = self.model(collection)?;
        let id = DocId::from_u128(self.next_id);
        let mut doc = Document::new(id);
        for (field, value) in fields {
            self.check_field(model, field)?;
            doc.fields.insert(field.to_string(), value);
        }

        self.next_id += 1;
        self.rows_mut(collection)?.insert(id, doc);

        Ok(id)
    }

    #[must_use]
    pub fn get(&self, collection: &str, id: DocId) -> Option<&Document> {
        self.collections.get(collection)?.get(&id)
    }

    /// Number of documents currently in `collection`.
    #[must_use]
    pub fn count(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, BTreeMap::len)
    }

    /// Documents in `collection`, in id order.
    pub fn documents<'a>(
        &'a self,
        collection: &str,
    ) -> impl Iterator<Item = &'a Document> + use<'a> {
        self.collections
            .get(collection)
            .into_iter()
            .flat_map(BTreeMap::values)
    }

    /// Open a journaled transaction.
    pub const fn begin(&mut self) -> MemoryTxn<'_> {
        MemoryTxn::new(self)
    }

    /// Run `f` inside a transaction: commit on `Ok`, undo every write on `Err`.
    pub fn transact<T>(
        &mut self,
        f: impl FnOnce(&mut MemoryTxn<'_>) -> Result<T, InternalError>,
    ) -> Result<T, InternalError> {
        let mut txn = self.begin();
        let out = f(&mut txn)?;
        txn.commit();

        Ok(out)
    }

    fn model(&self, collection: &str) -> Result<&'static CollectionModel, InternalError> {
        self.schema
            .collection(collection)
            .ok_or_else(|| InternalError::unsupported_collection(collection))
    }

    // Soft-delete fields are settable only on collections that opt in.
    fn check_field(&self, model: &CollectionModel, field: &str) -> Result<(), InternalError> {
        let soft_delete_field = [&self.soft_delete.flag, &self.soft_delete.at, &self.soft_delete.by]
            .into_iter()
            .any(|name| name == field);

        if model.has_field(field) || (model.soft_delete && soft_delete_field) {
            Ok(())
        } else {
            Err(InternalError::store_unsupported(format!(
                "field '{field}' is not settable on collection '{}'",
                model.name
            )))
        }
    }

    fn rows_mut(
        &mut self,
        collection: &str,
    ) -> Result<&mut BTreeMap<DocId, Document>, InternalError> {
        self.collections
            .get_mut(collection)
            .ok_or_else(|| InternalError::unsupported_collection(collection))
    }

    // Run one indexed equality lookup against the declared index.
    fn run_index_query(&self, query: &IndexQuery<'_>) -> Result<Vec<Document>, InternalError> {
        let model = self.model(query.collection)?;
        let index = model.index(query.index).ok_or_else(|| {
            InternalError::store_unsupported(format!(
                "index not found: collection={} index={}",
                query.collection, query.index
            ))
        })?;
        if !index.leads_with(query.field) {
            return Err(InternalError::store_unsupported(format!(
                "index cannot serve equality on field: collection={} index={index} field={}",
                query.collection, query.field
            )));
        }

        let rows = self
            .collections
            .get(query.collection)
            .ok_or_else(|| InternalError::unsupported_collection(query.collection))?;

        Ok(rows
            .values()
            .filter(|doc| doc.get(query.field) == Some(&query.value))
            .filter(|doc| query.visibility.admits(doc))
            .take(query.limit)
            .cloned()
            .collect())
    }

    fn run_tombstone_scan(
        &self,
        query: &TombstoneQuery<'_>,
    ) -> Result<Vec<Document>, InternalError> {
        let rows = self
            .collections
            .get(query.collection)
            .ok_or_else(|| InternalError::unsupported_collection(query.collection))?;

        let start = query.after.map_or(Bound::Unbounded, Bound::Excluded);

        Ok(rows
            .range((start, Bound::Unbounded))
            .map(|(_, doc)| doc)
            .filter(|doc| doc.is_flagged(query.flag_field))
            .filter(|doc| {
                doc.get(query.at_field)
                    .and_then(Value::as_timestamp)
                    .is_some_and(|at| at < query.cutoff)
            })
            .take(query.limit)
            .cloned()
            .collect())
    }

    // Remove one document, returning it for the undo journal.
    fn remove_row(&mut self, collection: &str, id: DocId) -> Result<Document, InternalError> {
        self.rows_mut(collection)?
            .remove(&id)
            .ok_or_else(|| InternalError::store_not_found(collection, id))
    }

    // Patch one document in place, returning its prior state.
    fn patch_row(
        &mut self,
        collection: &str,
        id: DocId,
        patch: &Patch,
    ) -> Result<Document, InternalError> {
        let model = self.model(collection)?;
        for op in patch.ops() {
            let (PatchOp::Set(field, _) | PatchOp::Unset(field)) = op;
            self.check_field(model, field)?;
        }

        let doc = self
            .rows_mut(collection)?
            .get_mut(&id)
            .ok_or_else(|| InternalError::store_not_found(collection, id))?;
        let prior = doc.clone();
        doc.apply(patch);

        Ok(prior)
    }

    // Put a journaled prior state back (or drop a journaled insert).
    fn restore_row(&mut self, collection: &str, id: DocId, prior: Option<Document>) {
        let Some(rows) = self.collections.get_mut(collection) else {
            return;
        };
        match prior {
            Some(doc) => {
                rows.insert(id, doc);
            }
            None => {
                rows.remove(&id);
            }
        }
    }
}

impl DocumentStore for MemoryStore {
    fn query_index(&self, query: &IndexQuery<'_>) -> Result<Vec<Document>, InternalError> {
        self.run_index_query(query)
    }

    fn delete(&mut self, collection: &str, id: DocId) -> Result<(), InternalError> {
        self.remove_row(collection, id).map(|_| ())
    }

    fn patch(&mut self, collection: &str, id: DocId, patch: &Patch) -> Result<(), InternalError> {
        self.patch_row(collection, id, patch).map(|_| ())
    }
}
