//! Relationship registry: the caller-supplied, read-only set of relations
//! the cascade executor is driven by.

mod validate;
#[cfg(test)]
mod tests;

use crate::model::{RelationModel, SchemaModel};
use std::collections::BTreeMap;

pub use validate::{RegistryError, RegistryIssue};

///
/// RelationRegistry
///
/// Ordered relation list, pre-grouped by parent collection.
/// Registry order is the order relations are processed within one call.
///

#[derive(Clone, Debug, Default)]
pub struct RelationRegistry {
    relations: Vec<RelationModel>,
    by_parent: BTreeMap<&'static str, Vec<usize>>,
}

impl RelationRegistry {
    /// Build a registry without checking it against a schema.
    ///
    /// A relation naming a missing index or field surfaces as a store error
    /// the first time the executor walks it.
    #[must_use]
    pub fn new(relations: impl IntoIterator<Item = RelationModel>) -> Self {
        let relations: Vec<_> = relations.into_iter().collect();
        let mut by_parent: BTreeMap<&'static str, Vec<usize>> = BTreeMap::new();

        for (slot, relation) in relations.iter().enumerate() {
            by_parent.entry(relation.parent).or_default().push(slot);
        }

        Self {
            relations,
            by_parent,
        }
    }

    /// Build a registry, rejecting every relation that does not line up with
    /// `schema`. All issues are reported together.
    pub fn validated(
        schema: &SchemaModel,
        relations: impl IntoIterator<Item = RelationModel>,
    ) -> Result<Self, RegistryError> {
        let registry = Self::new(relations);
        validate::validate_registry(schema, &registry.relations)?;

        Ok(registry)
    }

    /// Relations where `collection` is the parent, in registry order.
    pub fn relations_for_parent<'a>(
        &'a self,
        collection: &str,
    ) -> impl Iterator<Item = &'a RelationModel> + use<'a> {
        self.by_parent
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|slot| &self.relations[*slot])
    }

    #[must_use]
    pub fn relations(&self) -> &[RelationModel] {
        &self.relations
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.relations.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
