use derive_more::Display;
use serde::{Deserialize, Serialize, Serializer, de::Deserializer};
use thiserror::Error as ThisError;
use ulid::Ulid as WrappedUlid;

///
/// DocIdError
///

#[derive(Debug, ThisError)]
pub enum DocIdError {
    #[error("invalid document id string")]
    InvalidString,
}

///
/// DocId
///
/// Opaque, store-assigned document identity.
/// Ordered so that ids minted in sequence sort in mint order.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct DocId(WrappedUlid);

impl DocId {
    #[must_use]
    pub const fn nil() -> Self {
        Self(WrappedUlid::nil())
    }

    #[must_use]
    pub const fn from_parts(timestamp_ms: u64, random: u128) -> Self {
        Self(WrappedUlid::from_parts(timestamp_ms, random))
    }

    /// from_u128
    #[must_use]
    pub const fn from_u128(n: u128) -> Self {
        Self(WrappedUlid::from_bytes(n.to_be_bytes()))
    }

    #[must_use]
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.0.to_bytes())
    }

    /// parse
    pub fn parse(encoded: &str) -> Result<Self, DocIdError> {
        let this = WrappedUlid::from_string(encoded).map_err(|_| DocIdError::InvalidString)?;

        Ok(Self(this))
    }
}

impl Default for DocId {
    fn default() -> Self {
        Self::nil()
    }
}

impl From<WrappedUlid> for DocId {
    fn from(ulid: WrappedUlid) -> Self {
        Self(ulid)
    }
}

// The ulid crate's serde impls are gated behind its `serde` feature.
// With default-features disabled (to avoid pulling in `rand`), we implement
// Serialize/Deserialize here explicitly.
impl Serialize for DocId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buffer = [0; ::ulid::ULID_LEN];
        let text = self.0.array_to_str(&mut buffer);
        text.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DocId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let deserialized_str = String::deserialize(deserializer)?;
        match WrappedUlid::from_string(&deserialized_str) {
            Ok(u) => Ok(Self(u)),
            Err(_) => Err(serde::de::Error::custom("invalid document id string")),
        }
    }
}

///
/// TESTS
///
