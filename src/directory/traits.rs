//! Abstract directory interface.
//!
//! A backend answers one question: which user records match a surname
//! pattern and a given-name pattern. Patterns are either exact values or
//! prefixes (`value*`). Case sensitivity and the concrete wildcard syntax
//! are properties of the backend.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while querying a directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The directory could not be reached (transport or authentication).
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    /// The directory was reached but rejected or failed the query.
    #[error("Directory query failed: {0}")]
    Query(String),

    /// An account with this identifier is already present.
    #[error("Duplicate account: {0}")]
    DuplicateAccount(String),

    /// Directory data could not be decoded.
    #[error("Invalid directory data: {0}")]
    InvalidData(String),
}

/// Match rule for a single attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "match", content = "value", rename_all = "snake_case")]
pub enum NamePattern {
    /// Attribute equals the value.
    Exact(String),
    /// Attribute starts with the value (`value*`).
    Prefix(String),
}

impl NamePattern {
    /// Creates an exact-match pattern.
    #[must_use]
    pub fn exact(value: impl Into<String>) -> Self {
        Self::Exact(value.into())
    }

    /// Creates a prefix pattern.
    #[must_use]
    pub fn prefix(value: impl Into<String>) -> Self {
        Self::Prefix(value.into())
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => f.write_str(v),
            Self::Prefix(v) => write!(f, "{v}*"),
        }
    }
}

/// A user query: both attributes must match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserFilter {
    /// Pattern for the surname (`sn`) attribute.
    pub surname: NamePattern,
    /// Pattern for the given name (`givenName`) attribute.
    pub given_name: NamePattern,
}

impl UserFilter {
    /// Creates a filter from the two attribute patterns.
    #[must_use]
    pub const fn new(surname: NamePattern, given_name: NamePattern) -> Self {
        Self {
            surname,
            given_name,
        }
    }
}

/// Renders the filter in LDAP search syntax, e.g. `(&(sn=Smith)(givenName=J*))`.
impl fmt::Display for UserFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(&(sn={})(givenName={}))", self.surname, self.given_name)
    }
}

/// A user account as returned by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRecord {
    /// Account identifier (e.g. `sAMAccountName`).
    #[serde(alias = "samAccountName", alias = "sAMAccountName")]
    pub account_name: String,
    /// Given name (`givenName`).
    pub given_name: String,
    /// Initials (`initials`), if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
    /// Surname (`sn`).
    pub surname: String,
    /// Description (`description`), if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Mail address (`mail`), if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
}

impl DirectoryRecord {
    /// Creates a record with the required attributes.
    #[must_use]
    pub fn new(
        account_name: impl Into<String>,
        given_name: impl Into<String>,
        surname: impl Into<String>,
    ) -> Self {
        Self {
            account_name: account_name.into(),
            given_name: given_name.into(),
            initials: None,
            surname: surname.into(),
            description: None,
            mail: None,
        }
    }

    /// Sets the initials attribute.
    #[must_use]
    pub fn with_initials(mut self, initials: impl Into<String>) -> Self {
        self.initials = Some(initials.into());
        self
    }

    /// Sets the description attribute.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the mail attribute.
    #[must_use]
    pub fn with_mail(mut self, mail: impl Into<String>) -> Self {
        self.mail = Some(mail.into());
        self
    }
}

/// A directory that can be searched for user records.
///
/// Implementations own their connection, timeouts and retry behavior.
/// Failures must be returned as errors, never as an empty result, so that
/// "no match" stays distinguishable from "could not ask".
pub trait DirectoryClient: Send + Sync {
    /// Returns every record matching `filter`.
    fn find_users(&self, filter: &UserFilter) -> Result<Vec<DirectoryRecord>, DirectoryError>;
}

impl<T: DirectoryClient + ?Sized> DirectoryClient for &T {
    fn find_users(&self, filter: &UserFilter) -> Result<Vec<DirectoryRecord>, DirectoryError> {
        (**self).find_users(filter)
    }
}

impl<T: DirectoryClient + ?Sized> DirectoryClient for Arc<T> {
    fn find_users(&self, filter: &UserFilter) -> Result<Vec<DirectoryRecord>, DirectoryError> {
        (**self).find_users(filter)
    }
}
