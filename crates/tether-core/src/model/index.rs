use std::fmt::{self, Display};

///
/// IndexModel
/// Runtime-only descriptor for a secondary index declared on a collection.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexModel {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

impl IndexModel {
    #[must_use]
    pub const fn new(name: &'static str, fields: &'static [&'static str]) -> Self {
        Self { name, fields }
    }

    /// First indexed field, if the index declares any.
    #[must_use]
    pub fn leading_field(&self) -> Option<&'static str> {
        self.fields.first().copied()
    }

    /// Whether an equality lookup on `field` can be served by this index.
    #[must_use]
    pub fn leads_with(&self, field: &str) -> bool {
        self.leading_field() == Some(field)
    }
}

impl Display for IndexModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.fields.join(", "))
    }
}
