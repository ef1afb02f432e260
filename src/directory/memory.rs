//! In-memory directory backend.
//!
//! Thread-safe reference implementation of [`DirectoryClient`], used by the
//! CLI (loaded from a JSON fixture), by tests, and for embedded usage.

use std::path::Path;
use std::sync::RwLock;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::directory::traits::{
    DirectoryClient, DirectoryError, DirectoryRecord, NamePattern, UserFilter,
};

fn lock_err(context: &'static str) -> DirectoryError {
    DirectoryError::Unavailable(format!("poisoned lock: {context}"))
}

fn compile_pattern(pattern: &NamePattern, case_sensitive: bool) -> Result<Regex, DirectoryError> {
    let source = match pattern {
        NamePattern::Exact(v) => format!("^{}$", regex::escape(v)),
        NamePattern::Prefix(v) => format!("^{}", regex::escape(v)),
    };
    RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| DirectoryError::Query(format!("invalid pattern {pattern}: {e}")))
}

/// Thread-safe in-memory directory.
///
/// Matching is case-insensitive by default, like most enterprise
/// directories. Results are returned sorted by account name.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    records: RwLock<Vec<DirectoryRecord>>,
    case_sensitive: bool,
}

impl InMemoryDirectory {
    /// Create a new empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch attribute matching to case-sensitive comparison.
    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Build a directory from a set of records.
    ///
    /// # Errors
    /// - `DuplicateAccount`: if two records share an account name
    pub fn from_records(
        records: impl IntoIterator<Item = DirectoryRecord>,
    ) -> Result<Self, DirectoryError> {
        let directory = Self::new();
        for record in records {
            directory.insert(record)?;
        }
        Ok(directory)
    }

    /// Parse a JSON array of records.
    pub fn from_json_str(json: &str) -> Result<Self, DirectoryError> {
        let records: Vec<DirectoryRecord> =
            serde_json::from_str(json).map_err(|e| DirectoryError::InvalidData(e.to_string()))?;
        Self::from_records(records)
    }

    /// Load a JSON array of records from a file.
    ///
    /// # Errors
    /// - `Unavailable`: the file cannot be read
    /// - `InvalidData`: the file is not a JSON array of records
    /// - `DuplicateAccount`: two records share an account name
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| DirectoryError::Unavailable(format!("{}: {e}", path.display())))?;
        let directory = Self::from_json_str(&json)?;
        let records = directory.len()?;
        debug!(path = %path.display(), records, "loaded directory fixture");
        Ok(directory)
    }

    /// Add a record. Returns error if the account name already exists.
    pub fn insert(&self, record: DirectoryRecord) -> Result<(), DirectoryError> {
        let mut records = self.records.write().map_err(|_| lock_err("directory.insert"))?;
        if records
            .iter()
            .any(|r| r.account_name.eq_ignore_ascii_case(&record.account_name))
        {
            return Err(DirectoryError::DuplicateAccount(record.account_name));
        }
        records.push(record);
        Ok(())
    }

    /// Number of records held.
    pub fn len(&self) -> Result<usize, DirectoryError> {
        let records = self.records.read().map_err(|_| lock_err("directory.len"))?;
        Ok(records.len())
    }

    /// Returns true if the directory holds no records.
    pub fn is_empty(&self) -> Result<bool, DirectoryError> {
        Ok(self.len()? == 0)
    }
}

impl DirectoryClient for InMemoryDirectory {
    fn find_users(&self, filter: &UserFilter) -> Result<Vec<DirectoryRecord>, DirectoryError> {
        let surname = compile_pattern(&filter.surname, self.case_sensitive)?;
        let given_name = compile_pattern(&filter.given_name, self.case_sensitive)?;

        let records = self.records.read().map_err(|_| lock_err("directory.find_users"))?;
        let mut matches: Vec<DirectoryRecord> = records
            .iter()
            .filter(|r| surname.is_match(&r.surname) && given_name.is_match(&r.given_name))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.account_name.cmp(&b.account_name));
        Ok(matches)
    }
}
