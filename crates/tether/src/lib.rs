//! ## Crate layout
//! - `core`: registry, store contract, reference store, cascade executor,
//!   errors, and observability.
//! - `config`: loads the executor configuration from TOML.
//!
//! Typical use inside one host transaction:
//!
//! ```ignore
//! let executor = CascadeExecutor::with_config(&registry, load_config_file("tether.toml")?)?;
//! executor.cascade_delete(&mut txn, "issues", issue_id)?;
//! txn.delete("issues", issue_id)?;
//! ```

pub use tether_core as core;

pub mod config;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::{ConfigError, load_config_file, load_config_str};
pub use crate::core::error::{ErrorClass, ErrorOrigin, InternalError as Error};

///
/// Prelude
/// domain vocabulary plus the store traits, so callers can drive the executor
///

pub mod prelude {
    pub use crate::core::{
        db::{DocumentStore as _, TombstoneScan as _},
        prelude::*,
    };
}
