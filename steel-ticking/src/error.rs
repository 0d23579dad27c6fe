//! Error types for the ambient parts of the ticking crate.
//!
//! Scheduler operations themselves never fail loudly; they report a rejected
//! add or remove through their `bool` return value.

use std::io;

use thiserror::Error;

/// An error produced while parsing an [`Identifier`](crate::Identifier).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The string had more than one `:` separator.
    #[error("invalid identifier: {0}")]
    Malformed(String),
    /// The namespace contained a character outside `[a-z0-9_.-]`.
    #[error("invalid namespace: {0}")]
    Namespace(String),
    /// The path contained a character outside `[a-z0-9_./-]`.
    #[error("invalid path: {0}")]
    Path(String),
}

/// An error produced while loading or interpreting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to access config file: {0}")]
    Io(#[from] io::Error),
    /// The configuration file is not valid JSON5 for the expected shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json5::Error),
    /// An interval override names an invalid block entity type.
    #[error("invalid block entity type in interval overrides: {0}")]
    Identifier(#[from] IdentifierError),
    /// A value is outside its allowed range.
    #[error("invalid config value: {0}")]
    Invalid(&'static str),
}
