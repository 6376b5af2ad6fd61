use crate::{error::InternalError, types::DocId};

///
/// Trail
///
/// Root-to-node path of the current traversal.
/// A document seen twice on one path means the data forms a cycle.
///

pub(super) struct Trail<'a> {
    path: Vec<(&'a str, DocId)>,
    max_depth: usize,
}

impl<'a> Trail<'a> {
    pub(super) fn new(collection: &'a str, id: DocId, max_depth: usize) -> Self {
        Self {
            path: vec![(collection, id)],
            max_depth,
        }
    }

    /// Depth of the current node (root = 0).
    pub(super) const fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub(super) fn enter(&mut self, collection: &'a str, id: DocId) -> Result<(), InternalError> {
        if self
            .path
            .iter()
            .any(|(seen_collection, seen_id)| *seen_collection == collection && *seen_id == id)
        {
            let mut path: Vec<_> = self
                .path
                .iter()
                .map(|(collection, id)| ((*collection).to_string(), *id))
                .collect();
            path.push((collection.to_string(), id));

            return Err(InternalError::cycle(path));
        }

        if self.path.len() > self.max_depth {
            return Err(InternalError::depth_exceeded(self.max_depth, collection, id));
        }

        self.path.push((collection, id));

        Ok(())
    }

    pub(super) fn leave(&mut self) {
        // the root is never popped
        if self.path.len() > 1 {
            self.path.pop();
        }
    }
}
