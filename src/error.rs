//! Error types for dirmatch.
//!
//! All errors in dirmatch are strongly typed using thiserror.
//! A missing match is never an error: it is reported as data on the
//! [`Resolution`](crate::resolver::Resolution). Errors are reserved for
//! input that cannot be parsed and for a directory that could not be asked.

use thiserror::Error;

use crate::directory::DirectoryError;

/// Errors raised while splitting a raw name into its components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Fewer than two usable tokens remain after normalization, so first
    /// and last name cannot both be determined.
    #[error("cannot determine first and last name from {input:?}")]
    InsufficientTokens {
        /// The raw input as supplied by the caller.
        input: String,
    },
}

impl ParseError {
    /// Returns the offending raw input.
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::InsufficientTokens { input } => input,
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    Invalid {
        field: String,
        reason: String,
    },
}

/// Top-level error type for a resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The directory collaborator failed; carried through unchanged.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Batch execution failed: {reason}")]
    Batch {
        reason: String,
    },
}

impl ResolveError {
    /// Creates a batch execution error.
    #[must_use]
    pub fn batch(reason: impl Into<String>) -> Self {
        Self::Batch {
            reason: reason.into(),
        }
    }

    /// Returns true if the input name could not be parsed.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Returns true if the directory could not be queried.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Returns true if repeating the same call may succeed.
    ///
    /// The resolver never retries on its own; this is a hint for callers
    /// that own a retry policy.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Parse(_) => false,
            Self::Directory(e) => matches!(e, DirectoryError::Unavailable(_)),
            Self::Batch { .. } => false,
        }
    }
}

/// Result type alias for resolution calls.
pub type ResolveResult<T> = Result<T, ResolveError>;
