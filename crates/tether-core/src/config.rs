//! Executor configuration.
//!
//! The facade crate loads this from TOML; core only owns the shape, the
//! defaults, and the range checks.

use crate::{
    db::Patch,
    error::{ErrorClass, ErrorOrigin, InternalError},
    types::{DocId, Timestamp},
    value::Value,
};
use serde::{Deserialize, Serialize};

/// Maximum number of children fetched per relation in one traversal call.
pub const DEFAULT_BATCH_LIMIT: usize = 100;

/// Maximum relation depth walked below the root document.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Soft-deleted documents older than this are eligible for purge (30 days).
pub const DEFAULT_PURGE_RETENTION_MS: u64 = 30 * 24 * 60 * 60 * 1_000;

///
/// CascadeConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CascadeConfig {
    pub batch_limit: usize,
    pub max_depth: usize,
    pub soft_delete: SoftDeleteFields,
    pub purge_retention_ms: u64,
}

impl CascadeConfig {
    /// Reject configurations the executor cannot run with.
    pub fn validate(&self) -> Result<(), InternalError> {
        if self.batch_limit == 0 {
            return Err(config_error("batch_limit must be at least 1"));
        }
        if self.max_depth == 0 {
            return Err(config_error("max_depth must be at least 1"));
        }

        self.soft_delete.validate()
    }

    #[must_use]
    pub const fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit;
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            batch_limit: DEFAULT_BATCH_LIMIT,
            max_depth: DEFAULT_MAX_DEPTH,
            soft_delete: SoftDeleteFields::default(),
            purge_retention_ms: DEFAULT_PURGE_RETENTION_MS,
        }
    }
}

///
/// SoftDeleteFields
///
/// Names of the three well-known soft-delete fields, plus the patches that
/// set and clear them. Callers use the same patches on the parent that the
/// executor applies to children.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoftDeleteFields {
    pub flag: String,
    pub at: String,
    pub by: String,
}

impl SoftDeleteFields {
    /// Patch that flags a document as deleted by `actor` at `at`.
    #[must_use]
    pub fn mark(&self, actor: DocId, at: Timestamp) -> Patch {
        Patch::new()
            .set(&self.flag, Value::Bool(true))
            .set(&self.at, Value::Timestamp(at))
            .set(&self.by, Value::Id(actor))
    }

    /// Patch that unsets all three fields.
    #[must_use]
    pub fn clear(&self) -> Patch {
        Patch::new()
            .unset(&self.flag)
            .unset(&self.at)
            .unset(&self.by)
    }

    fn validate(&self) -> Result<(), InternalError> {
        let names = [&self.flag, &self.at, &self.by];
        if names.iter().any(|name| name.is_empty()) {
            return Err(config_error("soft_delete field names must not be empty"));
        }
        if self.flag == self.at || self.flag == self.by || self.at == self.by {
            return Err(config_error(format!(
                "soft_delete field names must be distinct: flag={} at={} by={}",
                self.flag, self.at, self.by
            )));
        }

        Ok(())
    }
}

impl Default for SoftDeleteFields {
    fn default() -> Self {
        Self {
            flag: "isDeleted".to_string(),
            at: "deletedAt".to_string(),
            by: "deletedBy".to_string(),
        }
    }
}

fn config_error(message: impl Into<String>) -> InternalError {
    InternalError::new(ErrorClass::Unsupported, ErrorOrigin::Config, message)
}

///
/// TESTS
///
