//! TOML configuration loading.
//!
//! Executor settings live under a `[cascade]` table so they can share a
//! file with the host's own configuration:
//!
//! ```toml
//! [cascade]
//! batch_limit = 100
//! max_depth = 32
//! purge_retention_ms = 2592000000
//!
//! [cascade.soft_delete]
//! flag = "isDeleted"
//! at = "deletedAt"
//! by = "deletedBy"
//! ```
//!
//! Missing keys take their defaults; unknown keys inside `[cascade]` are
//! rejected.

use crate::core::{config::CascadeConfig, error::InternalError};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid cascade config: {0}")]
    Invalid(#[from] InternalError),
}

// Top-level document shape; other tables belong to the host.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    cascade: CascadeConfig,
}

/// Parse and validate the `[cascade]` table of a TOML document.
pub fn load_config_str(source: &str) -> Result<CascadeConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(source)?;
    file.cascade.validate()?;

    Ok(file.cascade)
}

/// Read, parse, and validate a TOML config file.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<CascadeConfig, ConfigError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    load_config_str(&source)
}

///
/// TESTS
///
