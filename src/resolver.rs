//! Tiered identity resolution.
//!
//! Given a parsed name, the resolver queries the directory with
//! progressively looser filters:
//!
//! 1. `Exact`: surname and given name both exact
//! 2. `LastName`: surname exact, given name by first initial
//! 3. `FirstName`: given name exact, surname by last initial
//!
//! The cascade stops at the first tier returning any record. Several records
//! at that tier are an ambiguity reported through `match_count`; the
//! resolver never falls through to a looser tier to break the tie.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::config::ResolverConfig;
use crate::directory::{DirectoryClient, DirectoryRecord, NamePattern, UserFilter};
use crate::error::ResolveResult;
use crate::name::{NameInput, NameParser, ParsedName};
use crate::tier::{MatchTier, TierFilter};

/// Diagnostic attached to a resolution that found nothing at any tier.
pub const NO_MATCH_NOTE: &str = "no match found";

/// A directory record found by the cascade, tagged with how it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Account identifier of the record.
    pub account_name: String,
    /// Given name as stored in the directory.
    pub given_name: String,
    /// Initials attribute, when the directory has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
    /// Surname as stored in the directory.
    pub surname: String,
    /// Free-text description attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Mail address attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    /// Tier at which the record was found.
    pub match_tier: MatchTier,
    /// Number of records found at that tier. Equal on every result of one call.
    pub match_count: usize,
}

impl MatchResult {
    fn from_record(record: DirectoryRecord, match_tier: MatchTier, match_count: usize) -> Self {
        Self {
            account_name: record.account_name,
            given_name: record.given_name,
            initials: record.initials,
            surname: record.surname,
            description: record.description,
            mail: record.mail,
            match_tier,
            match_count,
        }
    }
}

/// Cardinality of a resolution, before any tier filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// No tier produced a candidate.
    NoMatch,
    /// Exactly one candidate at the stopping tier.
    Unique,
    /// Several candidates at the stopping tier; the caller must adjudicate.
    Ambiguous,
}

/// Everything one resolve call produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Correlates this resolution with its log lines.
    pub request_id: Uuid,
    /// When the cascade finished.
    pub resolved_at: DateTime<Utc>,
    /// The name that was searched.
    pub name: ParsedName,
    /// Tier where the cascade stopped; `None` when nothing matched.
    pub tier: MatchTier,
    /// Candidates found at `tier`, before filtering.
    pub match_count: usize,
    /// Directory queries issued (one per tier tried).
    pub queries: usize,
    /// Results that passed the tier filter.
    pub results: Vec<MatchResult>,
    /// Set to [`NO_MATCH_NOTE`] when no tier matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Resolution {
    /// Classifies the resolution as no match, unique or ambiguous.
    #[must_use]
    pub const fn outcome(&self) -> ResolutionOutcome {
        match self.match_count {
            0 => ResolutionOutcome::NoMatch,
            1 => ResolutionOutcome::Unique,
            _ => ResolutionOutcome::Ambiguous,
        }
    }

    /// Returns true if any tier produced a candidate.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.match_count > 0
    }

    /// Consumes the resolution, returning only the filtered results.
    #[must_use]
    pub fn into_results(self) -> Vec<MatchResult> {
        self.results
    }
}

/// Filter issued to the directory for one tier of the cascade.
///
/// Returns `None` for [`MatchTier::None`], which is never queried.
#[must_use]
pub fn tier_query(name: &ParsedName, tier: MatchTier) -> Option<UserFilter> {
    let (surname, given_name) = match tier {
        MatchTier::Exact => (
            NamePattern::exact(name.last_name()),
            NamePattern::exact(name.first_name()),
        ),
        MatchTier::LastName => (
            NamePattern::exact(name.last_name()),
            NamePattern::prefix(name.first_initial()),
        ),
        MatchTier::FirstName => (
            NamePattern::prefix(name.last_initial()),
            NamePattern::exact(name.first_name()),
        ),
        MatchTier::None => return None,
    };
    Some(UserFilter::new(surname, given_name))
}

/// Runs the tier cascade against a directory.
///
/// The resolver keeps no state between calls; one instance can serve any
/// number of threads.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    parser: NameParser,
}

impl IdentityResolver {
    /// Creates a resolver that parses raw names without changing case.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver that parses raw names with `parser`.
    #[must_use]
    pub const fn with_parser(parser: NameParser) -> Self {
        Self { parser }
    }

    /// Creates a resolver from loaded configuration.
    #[must_use]
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::with_parser(NameParser::new(config.casing))
    }

    /// Resolves `input` against `directory`.
    ///
    /// Raw strings are parsed first; a parse failure aborts before any query.
    /// A directory failure aborts the cascade and is returned unchanged
    /// inside `ResolveError::Directory`. Finding nothing is not an error.
    pub fn resolve<D>(
        &self,
        input: impl Into<NameInput>,
        directory: &D,
        filter: Option<TierFilter>,
    ) -> ResolveResult<Resolution>
    where
        D: DirectoryClient + ?Sized,
    {
        let name = input.into().into_parsed(&self.parser)?;
        let request_id = Uuid::new_v4();
        let span = info_span!("resolve", %request_id, name = %name);
        let _guard = span.enter();

        let mut queries = 0;
        let mut stopped = None;
        for tier in MatchTier::CASCADE {
            let Some(query) = tier_query(&name, tier) else {
                continue;
            };
            queries += 1;
            let records = directory.find_users(&query)?;
            debug!(%tier, filter = %query, found = records.len(), "tier queried");
            if !records.is_empty() {
                stopped = Some((tier, records));
                break;
            }
        }

        let (tier, match_count, results, note) = match stopped {
            Some((tier, records)) => {
                let count = records.len();
                info!(%tier, count, "cascade stopped");
                let results = records
                    .into_iter()
                    .map(|record| MatchResult::from_record(record, tier, count))
                    .filter(|result| filter.map_or(true, |f| f.accepts(result.match_tier)))
                    .collect();
                (tier, count, results, None)
            }
            None => {
                info!("{}", NO_MATCH_NOTE);
                (MatchTier::None, 0, Vec::new(), Some(NO_MATCH_NOTE.to_string()))
            }
        };

        Ok(Resolution {
            request_id,
            resolved_at: Utc::now(),
            name,
            tier,
            match_count,
            queries,
            results,
            note,
        })
    }
}

/// Resolves `input` with default parsing and returns the matching records.
///
/// When `tier_filter` is set, only results at exactly that tier are kept.
///
/// # Examples
///
/// ```
/// use dirmatch::{resolve_identity, DirectoryRecord, InMemoryDirectory, MatchTier};
///
/// let directory = InMemoryDirectory::from_records([
///     DirectoryRecord::new("jsmith", "John", "Smith"),
/// ])
/// .unwrap();
///
/// let results = resolve_identity("Smith, John", &directory, None).unwrap();
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].match_tier, MatchTier::Exact);
/// ```
pub fn resolve_identity<D>(
    input: impl Into<NameInput>,
    directory: &D,
    tier_filter: Option<MatchTier>,
) -> ResolveResult<Vec<MatchResult>>
where
    D: DirectoryClient + ?Sized,
{
    IdentityResolver::new()
        .resolve(input, directory, tier_filter.map(TierFilter::from))
        .map(Resolution::into_results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casing::CasingPolicy;
    use crate::directory::InMemoryDirectory;
    use crate::error::ResolveError;

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::from_records([
            DirectoryRecord::new("jsmith", "John", "Smith")
                .with_initials("E")
                .with_mail("jsmith@example.com")
                .with_description("Accounts payable"),
            DirectoryRecord::new("jasmith", "Jane", "Smith"),
            DirectoryRecord::new("jsmythe", "Jack", "Smythe"),
            DirectoryRecord::new("mjones", "Mary", "Jones"),
            DirectoryRecord::new("mjohnson", "Mary", "Johnson"),
        ])
        .unwrap()
    }

    fn parsed(raw: &str) -> ParsedName {
        crate::name::parse_name(raw, CasingPolicy::None).unwrap()
    }

    #[test]
    fn test_tier_queries() {
        let name = parsed("Smith, John");
        assert_eq!(
            tier_query(&name, MatchTier::Exact).unwrap().to_string(),
            "(&(sn=Smith)(givenName=John))"
        );
        assert_eq!(
            tier_query(&name, MatchTier::LastName).unwrap().to_string(),
            "(&(sn=Smith)(givenName=J*))"
        );
        assert_eq!(
            tier_query(&name, MatchTier::FirstName).unwrap().to_string(),
            "(&(sn=S*)(givenName=John))"
        );
        assert!(tier_query(&name, MatchTier::None).is_none());
    }

    #[test]
    fn test_exact_match_passes_fields_through() {
        let resolution = IdentityResolver::new()
            .resolve("John Smith", &directory(), None)
            .unwrap();
        assert_eq!(resolution.tier, MatchTier::Exact);
        assert_eq!(resolution.queries, 1);
        assert_eq!(resolution.outcome(), ResolutionOutcome::Unique);
        assert!(resolution.note.is_none());

        let result = &resolution.results[0];
        assert_eq!(result.account_name, "jsmith");
        assert_eq!(result.initials.as_deref(), Some("E"));
        assert_eq!(result.mail.as_deref(), Some("jsmith@example.com"));
        assert_eq!(result.description.as_deref(), Some("Accounts payable"));
        assert_eq!(result.match_count, 1);
    }

    #[test]
    fn test_last_name_tier_reports_ambiguity() {
        let resolution = IdentityResolver::new()
            .resolve("Smith, Jo", &directory(), None)
            .unwrap();
        assert_eq!(resolution.tier, MatchTier::LastName);
        assert_eq!(resolution.queries, 2);
        assert_eq!(resolution.match_count, 2);
        assert_eq!(resolution.outcome(), ResolutionOutcome::Ambiguous);
        assert!(resolution
            .results
            .iter()
            .all(|r| r.match_tier == MatchTier::LastName && r.match_count == 2));
    }

    #[test]
    fn test_first_name_tier() {
        let resolution = IdentityResolver::new()
            .resolve("Mary Jameson", &directory(), None)
            .unwrap();
        assert_eq!(resolution.tier, MatchTier::FirstName);
        assert_eq!(resolution.queries, 3);
        let accounts: Vec<_> = resolution.results.iter().map(|r| r.account_name.as_str()).collect();
        assert_eq!(accounts, vec!["mjohnson", "mjones"]);
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let resolution = IdentityResolver::new()
            .resolve("Zed Quux", &directory(), None)
            .unwrap();
        assert_eq!(resolution.tier, MatchTier::None);
        assert_eq!(resolution.outcome(), ResolutionOutcome::NoMatch);
        assert!(!resolution.is_match());
        assert!(resolution.results.is_empty());
        assert_eq!(resolution.note.as_deref(), Some(NO_MATCH_NOTE));
        assert_eq!(resolution.queries, 3);
    }

    #[test]
    fn test_filter_keeps_match_count() {
        let resolution = IdentityResolver::new()
            .resolve("Smith, Jo", &directory(), Some(MatchTier::Exact.into()))
            .unwrap();
        assert_eq!(resolution.tier, MatchTier::LastName);
        assert_eq!(resolution.match_count, 2);
        assert!(resolution.results.is_empty());

        let resolution = IdentityResolver::new()
            .resolve("Smith, Jo", &directory(), Some(TierFilter::AtLeast(MatchTier::LastName)))
            .unwrap();
        assert_eq!(resolution.results.len(), 2);
    }

    #[test]
    fn test_parse_failure_before_any_query() {
        let err = IdentityResolver::new()
            .resolve("Smith", &directory(), None)
            .unwrap_err();
        assert!(matches!(err, ResolveError::Parse(_)));
    }

    #[test]
    fn test_configured_casing_applies_to_raw_input() {
        let directory = InMemoryDirectory::new().case_sensitive(true);
        directory
            .insert(DirectoryRecord::new("jsmith", "John", "Smith"))
            .unwrap();

        let plain = IdentityResolver::new()
            .resolve("john smith", &directory, None)
            .unwrap();
        assert!(!plain.is_match());

        let config = ResolverConfig {
            casing: CasingPolicy::Title,
            ..ResolverConfig::default()
        };
        let titled = IdentityResolver::from_config(&config)
            .resolve("john smith", &directory, None)
            .unwrap();
        assert_eq!(titled.tier, MatchTier::Exact);
    }

    #[test]
    fn test_resolve_identity_helper() {
        let results =
            resolve_identity("Smith, Jo", &directory(), Some(MatchTier::LastName)).unwrap();
        assert_eq!(results.len(), 2);

        let parsed = ParsedName::from_parts("Jack", "", "Smythe").unwrap();
        let results = resolve_identity(parsed, &directory(), None).unwrap();
        assert_eq!(results[0].account_name, "jsmythe");
    }

    #[test]
    fn test_deserialized_name_searches_with_derived_initials() {
        let directory = InMemoryDirectory::from_records([
            DirectoryRecord::new("jsmith", "John", "Smith"),
            DirectoryRecord::new("bsmith", "Bob", "Smith"),
            DirectoryRecord::new("zsmith", "Zed", "Smith"),
        ])
        .unwrap();

        let json = r#"{"first_name":"Jo","last_name":"Smith","first_initial":"Z"}"#;
        let input: NameInput = serde_json::from_str(json).unwrap();
        let resolution = IdentityResolver::new().resolve(input, &directory, None).unwrap();
        assert_eq!(resolution.tier, MatchTier::LastName);
        assert_eq!(resolution.match_count, 1);
        assert_eq!(resolution.results[0].account_name, "jsmith");

        let blank = r#"{"first_name":"","last_name":"Smith","first_initial":""}"#;
        assert!(serde_json::from_str::<NameInput>(blank).is_err());
    }

    #[test]
    fn test_resolution_serializes() {
        let resolution = IdentityResolver::new()
            .resolve("John Smith", &directory(), None)
            .unwrap();
        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["tier"], "exact");
        assert_eq!(json["results"][0]["matchTier"], "exact");
        assert_eq!(json["results"][0]["accountName"], "jsmith");
        assert!(json.get("note").is_none());
    }
}
