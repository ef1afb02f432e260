//! # dirmatch - Tiered Directory Identity Resolution
//!
//! dirmatch turns a free-text personal name such as `"Smith, John E."` or
//! `"John Smith"` into the directory accounts it most likely refers to, and
//! reports how confident each candidate is.
//!
//! ## Core Concepts
//!
//! - **ParsedName**: A raw name split into first, middle and last fields plus initials
//! - **DirectoryClient**: The external user directory, queried by surname and given name
//! - **MatchTier**: How a candidate was found (`Exact`, `LastName`, `FirstName`, `None`)
//! - **Resolution**: Candidates from the first tier that matched, with count and provenance
//!
//! ## Usage
//!
//! ```rust
//! use dirmatch::{DirectoryRecord, IdentityResolver, InMemoryDirectory, MatchTier};
//!
//! let directory = InMemoryDirectory::from_records([
//!     DirectoryRecord::new("jsmith", "John", "Smith").with_mail("jsmith@example.com"),
//!     DirectoryRecord::new("jasmith", "Jane", "Smith"),
//! ])?;
//!
//! // No account is named "Jo Smith": the cascade falls back to first-initial matching.
//! let resolution = IdentityResolver::new().resolve("Smith, Jo", &directory, None)?;
//! assert_eq!(resolution.tier, MatchTier::LastName);
//! assert_eq!(resolution.match_count, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Name parsing
pub mod casing;
pub mod error;
pub mod name;
pub mod tier;

// Directory access and resolution
pub mod batch;
pub mod config;
pub mod directory;
pub mod resolver;

// Re-export primary types at crate root for convenience
pub use casing::{CaseStrategy, CasingPolicy, UnicodeCasing};
pub use error::{ConfigError, ParseError, ResolveError, ResolveResult};
pub use name::{parse_name, NameInput, NameParser, ParsedName};
pub use tier::{MatchTier, TierFilter};

pub use batch::{BatchItem, BatchResolver};
pub use config::ResolverConfig;
pub use directory::{
	DirectoryClient, DirectoryError, DirectoryRecord, InMemoryDirectory, NamePattern, UserFilter,
};
pub use resolver::{
	resolve_identity, tier_query, IdentityResolver, MatchResult, Resolution, ResolutionOutcome,
	NO_MATCH_NOTE,
};
