//! Case normalization for parsed name fields.
//!
//! The parser never touches letter case directly. It hands each field to a
//! [`CaseStrategy`], so culture-specific rules can be swapped in without
//! changing how names are split into tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the name fields of a [`ParsedName`](crate::name::ParsedName) are cased.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasingPolicy {
    /// Every field upper-cased.
    Upper,
    /// Every field lower-cased.
    Lower,
    /// Every field title-cased as a single word.
    #[serde(alias = "proper")]
    Title,
    /// Fields are left exactly as entered.
    #[default]
    None,
}

impl CasingPolicy {
    /// Returns the policy name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Title => "title",
            Self::None => "none",
        }
    }
}

impl fmt::Display for CasingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a casing policy name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown casing policy: {0} (expected upper, lower, title, proper or none)")]
pub struct UnknownCasingPolicy(pub String);

impl FromStr for CasingPolicy {
    type Err = UnknownCasingPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "title" | "proper" => Ok(Self::Title),
            "none" | "" => Ok(Self::None),
            other => Err(UnknownCasingPolicy(other.to_string())),
        }
    }
}

/// Locale rules for changing the case of a single name field.
///
/// Implementations must treat `word` as one word: internal punctuation such
/// as apostrophes or hyphens never starts a new title-cased segment.
pub trait CaseStrategy: Send + Sync {
    /// Upper-cases the whole word.
    fn upper(&self, word: &str) -> String;

    /// Lower-cases the whole word.
    fn lower(&self, word: &str) -> String;

    /// First character upper, remainder lower.
    fn title(&self, word: &str) -> String {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => {
                let mut out = self.upper(&*first.encode_utf8(&mut [0; 4]));
                out.push_str(&self.lower(chars.as_str()));
                out
            }
            None => String::new(),
        }
    }

    /// Applies `policy` to `word`.
    fn apply(&self, policy: CasingPolicy, word: &str) -> String {
        match policy {
            CasingPolicy::Upper => self.upper(word),
            CasingPolicy::Lower => self.lower(word),
            CasingPolicy::Title => self.title(word),
            CasingPolicy::None => word.to_string(),
        }
    }
}

/// Unicode default case mappings, independent of any locale.
///
/// Mappings may change the length of a string ("ß" upper-cases to "SS").
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeCasing;

impl CaseStrategy for UnicodeCasing {
    fn upper(&self, word: &str) -> String {
        word.to_uppercase()
    }

    fn lower(&self, word: &str) -> String {
        word.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("upper".parse::<CasingPolicy>().unwrap(), CasingPolicy::Upper);
        assert_eq!("LOWER".parse::<CasingPolicy>().unwrap(), CasingPolicy::Lower);
        assert_eq!("Proper".parse::<CasingPolicy>().unwrap(), CasingPolicy::Title);
        assert_eq!("title".parse::<CasingPolicy>().unwrap(), CasingPolicy::Title);
        assert_eq!("none".parse::<CasingPolicy>().unwrap(), CasingPolicy::None);
        assert!("camel".parse::<CasingPolicy>().is_err());
    }

    #[test]
    fn test_policy_serde_alias() {
        let policy: CasingPolicy = serde_json::from_str("\"proper\"").unwrap();
        assert_eq!(policy, CasingPolicy::Title);
        assert_eq!(serde_json::to_string(&CasingPolicy::Title).unwrap(), "\"title\"");
    }

    #[test]
    fn test_title_treats_field_as_one_word() {
        let casing = UnicodeCasing;
        assert_eq!(casing.title("o'BRIEN"), "O'brien");
        assert_eq!(casing.title("smith-jones"), "Smith-jones");
        assert_eq!(casing.title("mcDonald"), "Mcdonald");
        assert_eq!(casing.title(""), "");
    }

    #[test]
    fn test_apply_policies() {
        let casing = UnicodeCasing;
        assert_eq!(casing.apply(CasingPolicy::Upper, "Smith"), "SMITH");
        assert_eq!(casing.apply(CasingPolicy::Lower, "Smith"), "smith");
        assert_eq!(casing.apply(CasingPolicy::Title, "sMITH"), "Smith");
        assert_eq!(casing.apply(CasingPolicy::None, "sMiTh"), "sMiTh");
    }

    #[test]
    fn test_unicode_mappings() {
        let casing = UnicodeCasing;
        assert_eq!(casing.upper("straße"), "STRASSE");
        assert_eq!(casing.title("émile"), "Émile");
    }

    struct Shouting;

    impl CaseStrategy for Shouting {
        fn upper(&self, word: &str) -> String {
            format!("{}!", word.to_uppercase())
        }

        fn lower(&self, word: &str) -> String {
            word.to_lowercase()
        }
    }

    #[test]
    fn test_custom_strategy_drives_title() {
        assert_eq!(Shouting.title("ann"), "A!nn");
    }
}
