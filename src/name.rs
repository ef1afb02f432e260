//! Name-component parsing.
//!
//! Human-entered names arrive in two shapes:
//!
//! - comma form: `"Smith, John E."` or `"Smith,John"`
//! - space form: `"John Smith"` or `"John E. Smith"`
//!
//! Both are normalized into a [`ParsedName`] with first, middle and last
//! fields plus their initials. Only the first three space-separated tokens
//! are considered; compound surnames in space form are not supported.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::casing::{CaseStrategy, CasingPolicy, UnicodeCasing};
use crate::error::ParseError;

/// A raw name split into structured components.
///
/// # Examples
///
/// ```
/// use dirmatch::{parse_name, CasingPolicy};
///
/// let name = parse_name("Smith, John E.", CasingPolicy::None).unwrap();
/// assert_eq!(name.first_name(), "John");
/// assert_eq!(name.middle_name(), "E");
/// assert_eq!(name.last_name(), "Smith");
/// assert_eq!(name.middle_initial(), "e");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NameParts")]
pub struct ParsedName {
    first_name: String,
    middle_name: String,
    last_name: String,
    first_initial: String,
    middle_initial: String,
    last_initial: String,
}

impl ParsedName {
    /// Builds a name from already separated fields, deriving initials with
    /// Unicode casing. Surrounding whitespace is trimmed; no casing is applied.
    ///
    /// Returns `ParseError` when the first or last name is blank.
    pub fn from_parts(
        first: impl Into<String>,
        middle: impl Into<String>,
        last: impl Into<String>,
    ) -> Result<Self, ParseError> {
        let (first, middle, last) = (first.into(), middle.into(), last.into());
        let (first, middle, last) = (first.trim(), middle.trim(), last.trim());
        if first.is_empty() || last.is_empty() {
            return Err(ParseError::InsufficientTokens {
                input: [first, middle, last]
                    .iter()
                    .filter(|s| !s.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" "),
            });
        }
        Ok(Self::with_initials(
            &UnicodeCasing,
            first.to_string(),
            middle.to_string(),
            last.to_string(),
        ))
    }

    fn with_initials(
        casing: &dyn CaseStrategy,
        first_name: String,
        middle_name: String,
        last_name: String,
    ) -> Self {
        let first_initial = initial(&first_name, |c| casing.upper(c));
        let middle_initial = initial(&middle_name, |c| casing.lower(c));
        let last_initial = initial(&last_name, |c| casing.upper(c));
        Self {
            first_name,
            middle_name,
            last_name,
            first_initial,
            middle_initial,
            last_initial,
        }
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Middle name or initial; empty when none was supplied.
    #[must_use]
    pub fn middle_name(&self) -> &str {
        &self.middle_name
    }

    /// Surname.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Upper-cased first character of the given name.
    #[must_use]
    pub fn first_initial(&self) -> &str {
        &self.first_initial
    }

    /// Lower-cased first character of the middle name, or empty.
    #[must_use]
    pub fn middle_initial(&self) -> &str {
        &self.middle_initial
    }

    /// Upper-cased first character of the surname.
    #[must_use]
    pub fn last_initial(&self) -> &str {
        &self.last_initial
    }

    /// Returns true if a middle name is present.
    #[must_use]
    pub fn has_middle(&self) -> bool {
        !self.middle_name.is_empty()
    }

    /// Canonical `"First Middle Last"` rendering (middle omitted when empty).
    ///
    /// Parsing this string again with [`CasingPolicy::None`] yields an equal
    /// `ParsedName`, provided no field contains whitespace.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.has_middle() {
            format!("{} {} {}", self.first_name, self.middle_name, self.last_name)
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Serialized form accepted for a [`ParsedName`]. Initials present in the
/// input are ignored and derived again from the fields.
#[derive(Deserialize)]
struct NameParts {
    first_name: String,
    #[serde(default)]
    middle_name: String,
    last_name: String,
}

impl TryFrom<NameParts> for ParsedName {
    type Error = ParseError;

    fn try_from(parts: NameParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts.first_name, parts.middle_name, parts.last_name)
    }
}

impl fmt::Display for ParsedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

fn initial(field: &str, case: impl Fn(&str) -> String) -> String {
    field
        .chars()
        .next()
        .map(|c| case(&*c.encode_utf8(&mut [0; 4])))
        .unwrap_or_default()
}

fn strip_period(token: &str) -> &str {
    token.strip_suffix('.').unwrap_or(token)
}

/// Splits raw names into [`ParsedName`] records.
///
/// The parser is stateless apart from its casing configuration and can be
/// shared freely between threads.
#[derive(Clone)]
pub struct NameParser {
    casing: CasingPolicy,
    strategy: Arc<dyn CaseStrategy>,
}

impl fmt::Debug for NameParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameParser")
            .field("casing", &self.casing)
            .finish_non_exhaustive()
    }
}

impl Default for NameParser {
    fn default() -> Self {
        Self::new(CasingPolicy::None)
    }
}

impl NameParser {
    /// Creates a parser applying `casing` with Unicode case mappings.
    #[must_use]
    pub fn new(casing: CasingPolicy) -> Self {
        Self {
            casing,
            strategy: Arc::new(UnicodeCasing),
        }
    }

    /// Replaces the case-mapping rules (e.g. with a locale-specific strategy).
    #[must_use]
    pub fn with_strategy(mut self, strategy: Arc<dyn CaseStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// The casing policy this parser applies.
    #[must_use]
    pub const fn casing(&self) -> CasingPolicy {
        self.casing
    }

    /// Parses `raw` into its components.
    ///
    /// Returns `ParseError::InsufficientTokens` when, after trimming and
    /// collapsing whitespace, a first and a last name cannot both be found.
    pub fn parse(&self, raw: &str) -> Result<ParsedName, ParseError> {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let insufficient = || ParseError::InsufficientTokens {
            input: raw.to_string(),
        };

        let (first, middle, last) = if let Some((last, rest)) = normalized.split_once(',') {
            let mut tokens = rest.split_whitespace();
            let first = tokens.next().map(strip_period).unwrap_or_default();
            let middle = tokens.next().map(strip_period).unwrap_or_default();
            (first, middle, last.trim())
        } else {
            let tokens: Vec<&str> = normalized
                .split(' ')
                .filter(|t| !strip_period(t).is_empty())
                .collect();
            match tokens.as_slice() {
                [first, last] => (strip_period(first), "", *last),
                [first, middle, last, ..] => (strip_period(first), strip_period(middle), *last),
                _ => return Err(insufficient()),
            }
        };

        if first.is_empty() || strip_period(last).is_empty() {
            return Err(insufficient());
        }

        let strategy = self.strategy.as_ref();
        Ok(ParsedName::with_initials(
            strategy,
            strategy.apply(self.casing, first),
            strategy.apply(self.casing, middle),
            strategy.apply(self.casing, last),
        ))
    }
}

/// Parses `raw` with the given casing policy and Unicode case mappings.
///
/// # Examples
///
/// ```
/// use dirmatch::{parse_name, CasingPolicy};
///
/// let name = parse_name("john smith", CasingPolicy::Title).unwrap();
/// assert_eq!(name.display_name(), "John Smith");
/// assert!(parse_name("Cher", CasingPolicy::None).is_err());
/// ```
pub fn parse_name(raw: &str, casing: CasingPolicy) -> Result<ParsedName, ParseError> {
    NameParser::new(casing).parse(raw)
}

/// What a caller hands to the resolver: either free text or a name that
/// was already split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameInput {
    /// Unparsed text, parsed at the resolver entry point.
    Raw(String),
    /// Pre-parsed name, used as-is.
    Parsed(ParsedName),
}

impl NameInput {
    /// Resolves this input into a single `ParsedName`.
    pub fn into_parsed(self, parser: &NameParser) -> Result<ParsedName, ParseError> {
        match self {
            Self::Raw(raw) => parser.parse(&raw),
            Self::Parsed(name) => Ok(name),
        }
    }
}

impl fmt::Display for NameInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(raw) => f.write_str(raw),
            Self::Parsed(name) => write!(f, "{name}"),
        }
    }
}

impl From<&str> for NameInput {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for NameInput {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<ParsedName> for NameInput {
    fn from(name: ParsedName) -> Self {
        Self::Parsed(name)
    }
}
