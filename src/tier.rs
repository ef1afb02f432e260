//! Match tiers: how confident a directory hit is.
//!
//! Tiers are ordered by descending confidence. The resolver tries the
//! searchable tiers in [`MatchTier::CASCADE`] order and stops at the first
//! one that yields any candidate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Confidence level at which a candidate was found.
///
/// `Ord` follows confidence: `Exact > LastName > FirstName > None`.
///
/// # Examples
///
/// ```
/// use dirmatch::MatchTier;
///
/// assert!(MatchTier::Exact > MatchTier::LastName);
/// assert!(MatchTier::FirstName > MatchTier::None);
/// assert_eq!("last_name".parse::<MatchTier>().unwrap(), MatchTier::LastName);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// No candidate at any tier.
    None,
    /// Exact given name, surname matched by its initial only.
    FirstName,
    /// Exact surname, given name matched by its initial only.
    LastName,
    /// Exact surname and exact given name.
    Exact,
}

impl MatchTier {
    /// Searchable tiers in the order the cascade tries them.
    pub const CASCADE: [Self; 3] = [Self::Exact, Self::LastName, Self::FirstName];

    /// Returns the tier name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::LastName => "last_name",
            Self::FirstName => "first_name",
            Self::None => "none",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a tier name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown match tier: {0} (expected exact, last_name, first_name or none)")]
pub struct UnknownMatchTier(pub String);

impl FromStr for MatchTier {
    type Err = UnknownMatchTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "exact" => Ok(Self::Exact),
            "last_name" | "lastname" => Ok(Self::LastName),
            "first_name" | "firstname" => Ok(Self::FirstName),
            "none" => Ok(Self::None),
            other => Err(UnknownMatchTier(other.to_string())),
        }
    }
}

/// Restricts which results of a resolution are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tier", rename_all = "snake_case")]
pub enum TierFilter {
    /// Only results at exactly this tier.
    Only(MatchTier),
    /// Results at this tier or a more confident one.
    AtLeast(MatchTier),
    /// Results at this tier or a less confident one.
    AtMost(MatchTier),
}

impl TierFilter {
    /// Returns true if a result at `tier` passes the filter.
    #[must_use]
    pub fn accepts(&self, tier: MatchTier) -> bool {
        match *self {
            Self::Only(t) => tier == t,
            Self::AtLeast(t) => tier >= t,
            Self::AtMost(t) => tier <= t,
        }
    }
}

impl From<MatchTier> for TierFilter {
    fn from(tier: MatchTier) -> Self {
        Self::Only(tier)
    }
}
