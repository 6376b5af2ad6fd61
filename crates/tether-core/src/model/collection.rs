use crate::model::index::IndexModel;

///
/// CollectionModel
///
/// Static description of one collection: its declared fields, its secondary
/// indexes, and whether it carries the soft-delete fields.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CollectionModel {
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub indexes: &'static [IndexModel],

    /// Whether the soft-delete flag/timestamp/actor fields may be set on
    /// documents of this collection.
    pub soft_delete: bool,
}

impl CollectionModel {
    #[must_use]
    pub const fn new(
        name: &'static str,
        fields: &'static [&'static str],
        indexes: &'static [IndexModel],
    ) -> Self {
        Self {
            name,
            fields,
            indexes,
            soft_delete: false,
        }
    }

    /// Mark this collection as a soft-delete participant.
    #[must_use]
    pub const fn with_soft_delete(mut self) -> Self {
        self.soft_delete = true;
        self
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }

    #[must_use]
    pub fn index(&self, name: &str) -> Option<&IndexModel> {
        self.indexes.iter().find(|index| index.name == name)
    }
}
