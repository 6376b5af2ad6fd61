use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// DeletePolicy
///
/// Behaviour applied to children when their parent is removed.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Remove (or flag, or restore) every child along with the parent.
    Cascade,
    /// Keep children alive and clear their foreign key.
    SetNull,
    /// Refuse the delete while any child exists.
    Restrict,
}

impl DeletePolicy {
    /// Only cascade relations participate in soft delete and restore.
    #[must_use]
    pub const fn propagates_soft_delete(self) -> bool {
        matches!(self, Self::Cascade)
    }
}

impl Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Cascade => "cascade",
            Self::SetNull => "set_null",
            Self::Restrict => "restrict",
        };
        write!(f, "{label}")
    }
}

///
/// RelationModel
///
/// One parent/child foreign-key relation.
///
/// `index` must name an index on `child` whose leading field is
/// `foreign_key`; `RelationRegistry::validated` enforces this against a
/// schema, `RelationRegistry::new` leaves it to the store.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RelationModel {
    pub parent: &'static str,
    pub child: &'static str,
    pub foreign_key: &'static str,
    pub index: &'static str,
    pub on_delete: DeletePolicy,
}

impl RelationModel {
    #[must_use]
    pub const fn new(
        parent: &'static str,
        child: &'static str,
        foreign_key: &'static str,
        index: &'static str,
        on_delete: DeletePolicy,
    ) -> Self {
        Self {
            parent,
            child,
            foreign_key,
            index,
            on_delete,
        }
    }

    #[must_use]
    pub const fn cascade(
        parent: &'static str,
        child: &'static str,
        foreign_key: &'static str,
        index: &'static str,
    ) -> Self {
        Self::new(parent, child, foreign_key, index, DeletePolicy::Cascade)
    }

    #[must_use]
    pub const fn set_null(
        parent: &'static str,
        child: &'static str,
        foreign_key: &'static str,
        index: &'static str,
    ) -> Self {
        Self::new(parent, child, foreign_key, index, DeletePolicy::SetNull)
    }

    #[must_use]
    pub const fn restrict(
        parent: &'static str,
        child: &'static str,
        foreign_key: &'static str,
        index: &'static str,
    ) -> Self {
        Self::new(parent, child, foreign_key, index, DeletePolicy::Restrict)
    }
}

impl Display for RelationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -[{}]-> {}.{} via {}",
            self.parent, self.on_delete, self.child, self.foreign_key, self.index
        )
    }
}
