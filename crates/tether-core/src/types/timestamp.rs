use derive_more::{Add, Display, FromStr, Sub};
use serde::{Deserialize, Serialize};

///
/// Timestamp
/// (in milliseconds since the unix epoch)
///

#[derive(
    Add,
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    FromStr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Sub,
)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Construct from milliseconds.
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Step back by `ms`, clamping at the epoch.
    #[must_use]
    pub const fn saturating_sub_millis(self, ms: u64) -> Self {
        Self(self.0.saturating_sub(ms))
    }
}
