use crate::types::{DocId, Timestamp};
use derive_more::From;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Value
///
/// Closed set of field values a document may carry.
/// An unset field is absent from the document; there is no null variant.
///

#[derive(Clone, Debug, Deserialize, Eq, From, Hash, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Id(DocId),
    Int(i64),
    Text(String),
    Timestamp(Timestamp),
    Uint(u64),
}

impl Value {
    #[must_use]
    pub const fn as_id(&self) -> Option<DocId> {
        match self {
            Self::Id(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Id(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Timestamp(v) => write!(f, "{v}ms"),
            Self::Uint(v) => write!(f, "{v}"),
        }
    }
}
