use crate::types::DocId;
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Every failure surfaced by the store contract, the registry lookup, or the
/// cascade executor is carried by this one type.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without structured detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    // Construct an executor-origin error carrying cascade detail.
    fn cascade(class: ErrorClass, err: CascadeError) -> Self {
        Self {
            class,
            origin: ErrorOrigin::Executor,
            message: err.to_string(),
            detail: Some(ErrorDetail::Cascade(err)),
        }
    }

    /// Construct the restrict-policy conflict raised when children still exist.
    pub(crate) fn restricted(
        parent_collection: &str,
        parent_id: DocId,
        child_collection: &str,
        child_count: usize,
        lower_bound: bool,
    ) -> Self {
        Self::cascade(
            ErrorClass::Conflict,
            CascadeError::Restricted {
                parent_collection: parent_collection.to_string(),
                parent_id,
                child_collection: child_collection.to_string(),
                child_count,
                lower_bound,
            },
        )
    }

    /// Construct the batch-bound overflow error.
    pub(crate) fn overflow(
        parent_collection: &str,
        parent_id: DocId,
        child_collection: &str,
        limit: usize,
    ) -> Self {
        Self::cascade(
            ErrorClass::Unsupported,
            CascadeError::Overflow {
                parent_collection: parent_collection.to_string(),
                parent_id,
                child_collection: child_collection.to_string(),
                limit,
            },
        )
    }

    /// Construct the traversal cycle error.
    pub(crate) fn cycle(path: Vec<(String, DocId)>) -> Self {
        Self::cascade(ErrorClass::InvariantViolation, CascadeError::Cycle { path })
    }

    /// Construct the traversal depth error.
    pub(crate) fn depth_exceeded(max_depth: usize, collection: &str, id: DocId) -> Self {
        Self::cascade(
            ErrorClass::InvariantViolation,
            CascadeError::DepthExceeded {
                max_depth,
                collection: collection.to_string(),
                id,
            },
        )
    }

    /// Construct a store-origin unsupported error.
    pub fn store_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Store, message.into())
    }

    /// Construct a store-origin internal error.
    pub fn store_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Store, message.into())
    }

    /// Construct a standardized missing-document error.
    pub fn store_not_found(collection: &str, id: DocId) -> Self {
        Self {
            class: ErrorClass::NotFound,
            origin: ErrorOrigin::Store,
            message: format!("document not found: collection={collection} id={id}"),
            detail: Some(ErrorDetail::Store(StoreError::NotFound {
                collection: collection.to_string(),
                id,
            })),
        }
    }

    /// Construct a standardized unknown-collection error.
    pub fn unsupported_collection(collection: &str) -> Self {
        Self::store_unsupported(format!("unsupported collection: '{collection}'"))
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Store(StoreError::NotFound { .. }))
        )
    }

    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self.class, ErrorClass::Conflict)
    }

    #[must_use]
    pub const fn is_overflow(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Cascade(CascadeError::Overflow { .. }))
        )
    }

    /// Borrow the cascade detail, if this error was raised by the executor.
    #[must_use]
    pub const fn cascade_detail(&self) -> Option<&CascadeError> {
        match &self.detail {
            Some(ErrorDetail::Cascade(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Cascade(CascadeError),

    #[error("{0}")]
    Store(StoreError),
}

///
/// CascadeError
///
/// Executor-specific structured error detail.
/// Never returned directly; always wrapped in [`ErrorDetail::Cascade`].
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum CascadeError {
    #[error(
        "cannot delete {parent_collection} {parent_id}: {}{child_count} {child_collection} record(s) still reference it",
        bound_prefix(.lower_bound)
    )]
    Restricted {
        parent_collection: String,
        parent_id: DocId,
        child_collection: String,
        child_count: usize,
        lower_bound: bool,
    },

    #[error(
        "cannot cascade: {parent_collection} {parent_id} has too many {child_collection} records (limit={limit})"
    )]
    Overflow {
        parent_collection: String,
        parent_id: DocId,
        child_collection: String,
        limit: usize,
    },

    #[error("relationship cycle detected: {}", render_path(.path))]
    Cycle { path: Vec<(String, DocId)> },

    #[error("cascade depth exceeded: max_depth={max_depth} at {collection} {id}")]
    DepthExceeded {
        max_depth: usize,
        collection: String,
        id: DocId,
    },
}

// Prefix for counts that were truncated by the batch bound.
const fn bound_prefix(lower_bound: &bool) -> &'static str {
    if *lower_bound { "at least " } else { "" }
}

// Render a traversal path as `a:ID -> b:ID`.
fn render_path(path: &[(String, DocId)]) -> String {
    path.iter()
        .map(|(collection, id)| format!("{collection}:{id}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}

///
/// StoreError
///
/// Store-specific structured error detail.
/// Never returned directly; always wrapped in [`ErrorDetail::Store`].
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("document not found: {collection} {id}")]
    NotFound { collection: String, id: DocId },
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Conflict,
    Internal,
    InvariantViolation,
    NotFound,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Conflict => "conflict",
            Self::Internal => "internal",
            Self::InvariantViolation => "invariant_violation",
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Executor,
    Registry,
    Store,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Executor => "executor",
            Self::Registry => "registry",
            Self::Store => "store",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
