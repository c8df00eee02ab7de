//! Populate configuration structs from environment variables.
//!
//! Each field carries `#[field(env = "...", default = "...", required)]`.
//! Loading reads the variable, falls back to the default when it is unset
//! or empty, and coerces the value to the field's type (`String`, signed
//! integers, `bool`).
//!
//! ```rust
//! use envconf::EnvConfig;
//!
//! #[derive(Debug, Default, EnvConfig)]
//! struct Config {
//!     #[field(env = "DOC_LIB_HOST", default = "localhost")]
//!     host: String,
//!     #[field(env = "DOC_LIB_PORT", default = "8080")]
//!     port: i32,
//!     #[field(env = "DOC_LIB_DEBUG", default = "false")]
//!     debug: bool,
//! }
//!
//! let config = Config::from_env().unwrap();
//! assert_eq!(config.host, "localhost");
//! assert_eq!(config.port, 8080);
//! assert!(!config.debug);
//! ```

pub mod docs;
pub mod error;
pub mod field;
pub mod handler;
pub mod loader;
pub mod parse;
pub mod source;

use std::path::Path;

pub use error::{ConfigError, LoadErrors, format_config_errors};
pub use field::{FieldDescriptor, FieldKind};
pub use handler::{
    ErrorHandler, GlobalHandler, SharedHandler, default_error_handler, reset_error_handler,
    set_error_handler,
};
pub use loader::{Loader, RequiredPolicy, load_config};
pub use parse::parse_bool;
pub use source::{ProcessEnv, Source};

pub use envconf_macros::EnvConfig;

/// A record whose fields can be populated from the environment.
///
/// Implemented by `#[derive(EnvConfig)]`; writing it by hand is possible but
/// rarely needed.
pub trait EnvConfig {
    /// Metadata of every named field, in declaration order
    fn fields() -> &'static [FieldDescriptor];

    /// Write each resolved value into `self`, asking `loader` field by field
    fn apply(&mut self, loader: &mut Loader<'_>);

    /// Populate from the process environment, collecting errors
    fn load_env(&mut self) -> Result<(), LoadErrors> {
        Loader::new().load(self)
    }

    /// Build from `Default` and populate from the process environment
    fn from_env() -> Result<Self, LoadErrors>
    where
        Self: Default + Sized,
    {
        let mut config = Self::default();
        config.load_env()?;
        Ok(config)
    }

    /// Write a markdown table of the variables this record reads
    fn write_docs(path: impl AsRef<Path>) -> std::io::Result<()>
    where
        Self: Sized,
    {
        docs::write_docs(Self::fields(), path)
    }
}
