//! Directory access for dirmatch.
//!
//! The resolver only ever talks to a [`DirectoryClient`]. Real backends
//! (LDAP, Active Directory, an HR database) live outside this crate; an
//! in-memory directory is provided for tests, fixtures and embedded use.

mod memory;
mod traits;

pub use memory::InMemoryDirectory;
pub use traits::{DirectoryClient, DirectoryError, DirectoryRecord, NamePattern, UserFilter};
