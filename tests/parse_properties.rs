use std::sync::Arc;

use dirmatch::{parse_name, CaseStrategy, CasingPolicy, NameParser, ParseError};

#[test]
fn comma_form_with_and_without_space() {
    let pairs = [
        ("Smith", "John"),
        ("Lovelace", "Ada"),
        ("O'Brien", "Siobhan"),
        ("Nakamura", "Yuki"),
    ];
    for (last, first) in pairs {
        for raw in [format!("{last}, {first}"), format!("{last},{first}")] {
            let name = parse_name(&raw, CasingPolicy::None).unwrap();
            assert_eq!(name.last_name(), last, "input {raw:?}");
            assert_eq!(name.first_name(), first, "input {raw:?}");
            assert_eq!(name.middle_name(), "", "input {raw:?}");
        }
    }
}

#[test]
fn comma_form_with_middle_initial() {
    let name = parse_name("Smith, John E.", CasingPolicy::None).unwrap();
    assert_eq!(
        (
            name.first_name(),
            name.last_name(),
            name.middle_name(),
            name.first_initial(),
            name.middle_initial(),
            name.last_initial()
        ),
        ("John", "Smith", "E", "J", "e", "S")
    );
}

#[test]
fn space_form_two_tokens() {
    let name = parse_name("John Smith", CasingPolicy::None).unwrap();
    assert_eq!(
        (
            name.first_name(),
            name.last_name(),
            name.middle_name(),
            name.first_initial(),
            name.middle_initial(),
            name.last_initial()
        ),
        ("John", "Smith", "", "J", "", "S")
    );
}

#[test]
fn space_form_title_cased() {
    let name = parse_name("john e. SMITH", CasingPolicy::Title).unwrap();
    assert_eq!(name.first_name(), "John");
    assert_eq!(name.middle_name(), "E");
    assert_eq!(name.last_name(), "Smith");
    assert_eq!(name.first_initial(), "J");
    assert_eq!(name.middle_initial(), "e");
    assert_eq!(name.last_initial(), "S");
}

#[test]
fn canonical_rendering_is_a_fixed_point() {
    for raw in [
        "John Smith",
        "John E. Smith",
        "Smith, John E.",
        "  Grace   Brewster  Hopper ",
        "Hopper,Grace",
    ] {
        for casing in [
            CasingPolicy::None,
            CasingPolicy::Upper,
            CasingPolicy::Lower,
            CasingPolicy::Title,
        ] {
            let once = parse_name(raw, casing).unwrap();
            let twice = parse_name(&once.display_name(), CasingPolicy::None).unwrap();
            assert_eq!(once, twice, "input {raw:?} casing {casing}");
        }
    }
}

#[test]
fn initials_present_iff_fields_present() {
    for raw in ["Ann Lee", "Lee, Ann B", "Ann B. Lee", "a b c d e"] {
        let name = parse_name(raw, CasingPolicy::None).unwrap();
        assert_eq!(name.first_initial().is_empty(), name.first_name().is_empty());
        assert_eq!(name.last_initial().is_empty(), name.last_name().is_empty());
        assert_eq!(name.middle_initial().is_empty(), name.middle_name().is_empty());
        assert!(!name.first_name().is_empty());
        assert!(!name.last_name().is_empty());
    }
}

#[test]
fn parse_error_identifies_input() {
    let err = parse_name("  Prince  ", CasingPolicy::Title).unwrap_err();
    assert_eq!(
        err,
        ParseError::InsufficientTokens {
            input: "  Prince  ".to_string()
        }
    );
    assert!(err.to_string().contains("Prince"));
}

/// Turkish dotted/dotless i rules, as an example of swapping locale casing.
struct TurkishCasing;

impl CaseStrategy for TurkishCasing {
    fn upper(&self, word: &str) -> String {
        word.chars()
            .map(|c| match c {
                'i' => "İ".to_string(),
                'ı' => "I".to_string(),
                other => other.to_uppercase().collect(),
            })
            .collect()
    }

    fn lower(&self, word: &str) -> String {
        word.chars()
            .map(|c| match c {
                'I' => "ı".to_string(),
                'İ' => "i".to_string(),
                other => other.to_lowercase().collect(),
            })
            .collect()
    }
}

#[test]
fn locale_strategy_swaps_without_changing_tokenization() {
    let parser = NameParser::new(CasingPolicy::Upper).with_strategy(Arc::new(TurkishCasing));
    let name = parser.parse("Yılmaz, İlkin").unwrap();
    assert_eq!(name.last_name(), "YILMAZ");
    assert_eq!(name.first_name(), "İLKİN");
    assert_eq!(name.first_initial(), "İ");

    let title = NameParser::new(CasingPolicy::Title).with_strategy(Arc::new(TurkishCasing));
    let name = title.parse("ilkin YILMAZ").unwrap();
    assert_eq!(name.first_name(), "İlkin");
    assert_eq!(name.last_name(), "Yılmaz");
}
