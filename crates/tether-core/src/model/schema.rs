use crate::model::collection::CollectionModel;

///
/// SchemaModel
///
/// Ordered set of collection models a registry is validated against and a
/// store is built from.
///

#[derive(Clone, Copy, Debug)]
pub struct SchemaModel {
    pub collections: &'static [CollectionModel],
}

impl SchemaModel {
    #[must_use]
    pub const fn new(collections: &'static [CollectionModel]) -> Self {
        Self { collections }
    }

    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&'static CollectionModel> {
        self.collections.iter().find(|collection| collection.name == name)
    }
}
