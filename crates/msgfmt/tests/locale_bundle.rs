//! Tests for locale parsing, best-match selection and bundle formatting.

use std::collections::BTreeMap;

use msgfmt::{
    ConfigError, Locale, Message, MessageNode, MessageSupport, ParameterConfig, ParameterNode,
    SupportConfig,
};

fn locale(tag: &str) -> Locale {
    Locale::parse(tag).unwrap()
}

fn entries(tags: &[&str]) -> BTreeMap<Locale, String> {
    tags.iter().map(|tag| (locale(tag), (*tag).to_string())).collect()
}

fn select(requested: &str, map: &BTreeMap<Locale, String>) -> String {
    Locale::select(&locale(requested), map).unwrap().1.clone()
}

// =========================================================================
// Parsing
// =========================================================================

#[test]
fn parses_language_and_region() {
    let en_us = locale("en-US");
    assert_eq!(en_us.language(), "en");
    assert_eq!(en_us.region(), Some("US"));
    assert_eq!(locale("de_ch").to_string(), "de-CH");
    assert_eq!(locale("FR").to_string(), "fr");
}

#[test]
fn root_aliases() {
    for tag in ["", "und", "root", "  "] {
        assert!(locale(tag).is_root(), "{tag:?}");
    }
    assert_eq!(Locale::root().to_string(), "und");
}

#[test]
fn invalid_tags_are_rejected() {
    let err = Locale::parse("!!").unwrap_err();
    assert_eq!(err, ConfigError::InvalidLocale { tag: "!!".to_string() });
    insta::assert_snapshot!(err.to_string(), @"invalid locale tag '!!'");
}

#[test]
fn root_orders_first() {
    let map = entries(&["fr", "und", "de-AT"]);
    assert!(map.keys().next().unwrap().is_root());
}

#[test]
fn serde_uses_the_tag_string() {
    let json = serde_json::to_string(&locale("en-US")).unwrap();
    assert_eq!(json, "\"en-US\"");

    let parsed: Locale = serde_json::from_str("\"pt_BR\"").unwrap();
    assert_eq!(parsed, locale("pt-BR"));

    assert!(serde_json::from_str::<Locale>("\"!!\"").is_err());
}

/// Every shape of tag `Locale::parse` accepts.
const TAG_FORMS: &[&str] = &[
    "", " ", "und", "UND", "root", "en", "EN", "en-US", "EN_us", "de_ch", "und-US", "und_419",
    "sr-Latn-RS", "zh-Hant", "es-419",
];

#[test]
fn display_reparses_to_the_same_locale() {
    for tag in TAG_FORMS {
        let parsed = locale(tag);
        let shown = parsed.to_string();
        assert_eq!(Locale::parse(&shown).unwrap(), parsed, "{tag:?} shown as {shown:?}");

        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(serde_json::from_str::<Locale>(&json).unwrap(), parsed, "{tag:?}");
    }
}

#[test]
fn region_without_language_is_kept() {
    let us = locale("und-US");
    assert!(!us.is_root());
    assert_eq!(us.language(), "");
    assert_eq!(us.region(), Some("US"));
    assert_eq!(us.to_string(), "und-US");
    assert_eq!(locale("und_419").to_string(), "und-419");
}

#[test]
fn non_canonical_tags_are_normalized() {
    assert_eq!(locale("EN_us").to_string(), "en-US");
    assert_eq!(locale("de_ch"), locale("de-CH"));
    assert_eq!(locale("sr-Latn-RS").to_string(), "sr-RS");
}

#[test]
fn language_only_validates_and_normalizes() {
    assert_eq!(Locale::language_only("EN").unwrap(), locale("en"));
    assert_eq!(Locale::language_only("EN").unwrap().to_string(), "en");
    assert!(Locale::language_only("").unwrap().is_root());
    assert!(Locale::language_only("x y").is_err());

    let err = Locale::language_only("en-US").unwrap_err();
    assert_eq!(err, ConfigError::InvalidLocale { tag: "en-US".to_string() });
}

// =========================================================================
// Selection
// =========================================================================

#[test]
fn select_prefers_exact_then_language_then_root() {
    let map = entries(&["und", "en", "en-US"]);
    assert_eq!(select("en-GB", &map), "en");
    assert_eq!(select("en-US", &map), "en-US");
    assert_eq!(select("fr", &map), "und");
    assert_eq!(select("und", &map), "und");
}

#[test]
fn select_falls_back_to_any_region_of_the_language() {
    let map = entries(&["und", "de-AT"]);
    assert_eq!(select("de-CH", &map), "de-AT");
    assert_eq!(select("de", &map), "de-AT");
}

#[test]
fn select_without_root_takes_the_first_entry() {
    let map = entries(&["it", "es"]);
    assert_eq!(select("fr", &map), "es");
    assert!(Locale::select(&locale("fr"), &BTreeMap::<Locale, ()>::new()).is_none());
}

// =========================================================================
// Bundles
// =========================================================================

fn greeting_bundle() -> Message {
    let name = || {
        MessageNode::parameter(ParameterNode::new("name", None, ParameterConfig::new()).unwrap())
    };
    let mut locales = BTreeMap::new();
    locales.insert(
        Locale::root(),
        MessageNode::compound(vec![MessageNode::text("Hello "), name()]).unwrap(),
    );
    locales.insert(
        locale("de"),
        MessageNode::compound(vec![MessageNode::text("Hallo "), name()]).unwrap(),
    );
    locales.insert(
        locale("de-CH"),
        MessageNode::compound(vec![MessageNode::text("Grüezi "), name()]).unwrap(),
    );
    Message::bundle(Some("greeting".to_string()), locales).unwrap()
}

#[test]
fn bundle_requires_a_locale() {
    let err = Message::bundle(Some("empty".to_string()), BTreeMap::new()).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"message bundle empty must contain at least one locale");
}

#[test]
fn bundle_lists_its_locales() {
    let bundle = greeting_bundle();
    let tags: Vec<String> = bundle.locales().iter().map(ToString::to_string).collect();
    assert_eq!(tags, vec!["und", "de", "de-CH"]);
}

#[test]
fn bundle_formats_for_the_requested_locale() {
    let mut support = MessageSupport::new();
    support.add_message(greeting_bundle()).unwrap();

    let format = |tag: &str| {
        support
            .code("greeting")
            .unwrap()
            .with("name", "Ada")
            .locale(locale(tag))
            .format()
            .unwrap()
    };
    assert_eq!(format("de-CH"), "Grüezi Ada");
    assert_eq!(format("de-DE"), "Hallo Ada");
    assert_eq!(format("en"), "Hello Ada");
}

#[test]
fn configured_locale_is_the_default() {
    let config = SupportConfig::builder().locale(locale("de")).build();
    let mut support = MessageSupport::with_config(config).unwrap();
    support.add_message(greeting_bundle()).unwrap();

    let text = support.code("greeting").unwrap().with("name", "Ada").format().unwrap();
    assert_eq!(text, "Hallo Ada");
}
