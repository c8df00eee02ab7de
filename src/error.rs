use colored::Colorize;
use std::{fmt, num::ParseIntError, ops::Deref};
use thiserror::Error;

/// Errors that can occur while populating a configuration record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A field marked required has no default value configured
    #[error("required field {field} [{env}] has no default value")]
    MissingRequiredDefault { field: String, env: String },

    /// The resolved value could not be parsed as an integer
    #[error("failed to parse {field} [{env}] as int: {source}")]
    IntegerParse {
        field: String,
        env: String,
        value: String,
        source: ParseIntError,
    },

    /// The resolved value could not be parsed as a boolean
    #[error("failed to parse {field} [{env}] as bool: invalid syntax for {value:?}")]
    BooleanParse {
        field: String,
        env: String,
        value: String,
    },
}

impl ConfigError {
    /// Name of the struct field the error belongs to
    pub fn field(&self) -> &str {
        match self {
            ConfigError::MissingRequiredDefault { field, .. }
            | ConfigError::IntegerParse { field, .. }
            | ConfigError::BooleanParse { field, .. } => field,
        }
    }

    /// Environment variable the field reads from (may be empty)
    pub fn env(&self) -> &str {
        match self {
            ConfigError::MissingRequiredDefault { env, .. }
            | ConfigError::IntegerParse { env, .. }
            | ConfigError::BooleanParse { env, .. } => env,
        }
    }
}

/// Helper to format multiple configuration errors into a single report
pub fn format_config_errors(errors: &[ConfigError]) -> String {
    let error_summary = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Configuration failed with {} error(s):\n{}",
        errors.len().to_string().yellow().bold(),
        error_summary
    )
}

/// Every error reported during one load pass, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadErrors(Vec<ConfigError>);

impl LoadErrors {
    pub fn into_inner(self) -> Vec<ConfigError> {
        self.0
    }
}

impl From<Vec<ConfigError>> for LoadErrors {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self(errors)
    }
}

impl Deref for LoadErrors {
    type Target = [ConfigError];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for LoadErrors {
    type Item = ConfigError;
    type IntoIter = std::vec::IntoIter<ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a LoadErrors {
    type Item = &'a ConfigError;
    type IntoIter = std::slice::Iter<'a, ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for LoadErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_config_errors(&self.0))
    }
}

impl std::error::Error for LoadErrors {}
