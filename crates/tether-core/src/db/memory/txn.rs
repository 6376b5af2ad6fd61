use crate::{
    db::{
        document::{Document, Patch},
        memory::MemoryStore,
        store::{DocumentStore, IndexQuery, TombstoneQuery, TombstoneScan},
    },
    error::InternalError,
    types::DocId,
    value::Value,
};

///
/// UndoEntry
///
/// Prior state of one document touched inside a transaction.
/// `prior == None` marks a document the transaction inserted.
///

struct UndoEntry {
    collection: String,
    id: DocId,
    prior: Option<Document>,
}

///
/// MemoryTxn
///
/// Journaled transaction over a `MemoryStore`.
///
/// Writes apply immediately so later reads in the same transaction see
/// them. Dropping the transaction without `commit` undoes every write in
/// reverse order.
///

pub struct MemoryTxn<'s> {
    store: &'s mut MemoryStore,
    journal: Vec<UndoEntry>,
    finished: bool,
}

impl<'s> MemoryTxn<'s> {
    pub(super) const fn new(store: &'s mut MemoryStore) -> Self {
        Self {
            store,
            journal: Vec::new(),
            finished: false,
        }
    }

    /// Insert a new document inside the transaction.
    pub fn insert<'f>(
        &mut self,
        collection: &str,
        fields: impl IntoIterator<Item = (&'f str, Value)>,
    ) -> Result<DocId, InternalError> {
        let id = self.store.insert(collection, fields)?;
        self.journal.push(UndoEntry {
            collection: collection.to_string(),
            id,
            prior: None,
        });

        Ok(id)
    }

    #[must_use]
    pub fn get(&self, collection: &str, id: DocId) -> Option<&Document> {
        self.store.get(collection, id)
    }

    /// Number of writes journaled so far.
    #[must_use]
    pub const fn pending_writes(&self) -> usize {
        self.journal.len()
    }

    /// Keep every write made so far.
    pub fn commit(mut self) {
        self.finished = true;
        self.journal.clear();
    }

    /// Undo every write made so far.
    pub fn rollback(mut self) {
        self.undo_all();
    }

    fn undo_all(&mut self) {
        if self.finished {
            return;
        }

        self.undo_to(0);
        self.finished = true;
    }

    // Pop the journal back to `len` entries, in reverse write order.
    fn undo_to(&mut self, len: usize) {
        while self.journal.len() > len {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            self.store.restore_row(&entry.collection, entry.id, entry.prior);
        }
    }
}

impl DocumentStore for MemoryTxn<'_> {
    fn query_index(&self, query: &IndexQuery<'_>) -> Result<Vec<Document>, InternalError> {
        self.store.run_index_query(query)
    }

    fn delete(&mut self, collection: &str, id: DocId) -> Result<(), InternalError> {
        let prior = self.store.remove_row(collection, id)?;
        self.journal.push(UndoEntry {
            collection: collection.to_string(),
            id,
            prior: Some(prior),
        });

        Ok(())
    }

    fn patch(&mut self, collection: &str, id: DocId, patch: &Patch) -> Result<(), InternalError> {
        let prior = self.store.patch_row(collection, id, patch)?;
        self.journal.push(UndoEntry {
            collection: collection.to_string(),
            id,
            prior: Some(prior),
        });

        Ok(())
    }
}

impl TombstoneScan for MemoryTxn<'_> {
    /// Journal length at the time the savepoint was taken.
    type Savepoint = usize;

    fn scan_deleted(&self, query: &TombstoneQuery<'_>) -> Result<Vec<Document>, InternalError> {
        self.store.run_tombstone_scan(query)
    }

    fn savepoint(&self) -> usize {
        self.journal.len()
    }

    fn rollback_to(&mut self, savepoint: usize) -> Result<(), InternalError> {
        if savepoint > self.journal.len() {
            return Err(InternalError::store_internal(format!(
                "savepoint {savepoint} is past the journal end ({})",
                self.journal.len()
            )));
        }
        self.undo_to(savepoint);

        Ok(())
    }
}

impl Drop for MemoryTxn<'_> {
    fn drop(&mut self) {
        self.undo_all();
    }
}
