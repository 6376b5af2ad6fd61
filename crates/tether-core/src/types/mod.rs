mod id;
mod timestamp;

pub use id::{DocId, DocIdError};
pub use timestamp::Timestamp;
