//! Tests for formatter registration, chain resolution and the built-in
//! formatters.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use msgfmt::{
    ClipFormatter, ConfigValue, CustomValue, FormatError, FormattableType, Formatted,
    FormatterContext, FormatterRegistry, Locale, ParameterConfig, ParameterFormatter, Text, Value,
    ValueType,
};

fn names(registry: &FormatterRegistry, format: Option<&str>, value_type: &ValueType) -> Vec<String> {
    registry
        .resolve(format, value_type)
        .formatters()
        .iter()
        .map(|formatter| formatter.name().unwrap_or("<typed>").to_string())
        .collect()
}

fn options(entries: &[(&str, ConfigValue)]) -> ParameterConfig {
    let options: BTreeMap<String, ConfigValue> = entries
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect();
    ParameterConfig::with_parts(options, Vec::new(), None).unwrap()
}

fn produce(
    registry: &FormatterRegistry,
    format: Option<&str>,
    config: &ParameterConfig,
    value: &Value,
) -> Text {
    let locale = Locale::root();
    let defaults = ParameterConfig::new();
    let ctx = FormatterContext::new(registry, &locale, config, &defaults, format);
    registry
        .resolve(format, &value.value_type())
        .produce(&ctx, Some(value))
        .unwrap()
}

/// A named formatter that upper-cases strings and declines everything else.
#[derive(Debug)]
struct Shout;

impl ParameterFormatter for Shout {
    fn name(&self) -> Option<&str> {
        Some("shout")
    }

    fn formattable_types(&self) -> Vec<FormattableType> {
        vec![FormattableType::with_order(ValueType::STRING, 50)]
    }

    fn format(
        &self,
        _ctx: &FormatterContext<'_>,
        value: Option<&Value>,
    ) -> Result<Formatted, FormatError> {
        Ok(match value.and_then(Value::as_str) {
            Some(s) => Formatted::Produced(Text::plain(s.to_uppercase())),
            None => Formatted::Declined,
        })
    }
}

#[derive(Debug)]
struct Money(i64);

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl CustomValue for Money {
    fn value_type(&self) -> ValueType {
        ValueType::new("money")
    }
}

// =========================================================================
// Type chains
// =========================================================================

#[test]
fn root_only_registry_resolves_to_the_root_formatter() {
    let registry = FormatterRegistry::new();
    let chain = registry.resolve(None, &ValueType::I64);
    assert_eq!(chain.len(), 1);
    assert!(chain.ends_with_default());
}

#[test]
fn primitive_integer_resolves_through_its_boxed_type() {
    let registry = FormatterRegistry::with_default_formatters();
    let chain = registry.resolve(None, &ValueType::I64);
    assert_eq!(chain.len(), 2);
    assert!(chain.ends_with_default());
    assert!(Arc::ptr_eq(
        chain.formatters().last().unwrap(),
        registry.default_formatter()
    ));
}

#[test]
fn string_chain_holds_the_root_formatter_once() {
    let registry = FormatterRegistry::with_default_formatters();
    let chain = registry.resolve(None, &ValueType::STRING);
    assert_eq!(chain.len(), 1);
    assert!(chain.ends_with_default());
}

#[test]
fn every_chain_ends_with_the_root_formatter() {
    let registry = FormatterRegistry::with_default_formatters();
    for value_type in [
        ValueType::OBJECT,
        ValueType::BOOL,
        ValueType::CHAR,
        ValueType::STRING,
        ValueType::INTEGER,
        ValueType::FLOAT,
        ValueType::F64,
        ValueType::LIST,
        ValueType::new("unheard-of"),
    ] {
        let chain = registry.resolve(None, &value_type);
        assert!(chain.ends_with_default(), "{value_type}");
    }
}

#[test]
fn custom_type_follows_its_declared_parent() {
    let mut registry = FormatterRegistry::with_default_formatters();
    registry
        .hierarchy_mut()
        .declare_type(ValueType::new("money"), ValueType::NUMBER, &[]);

    let chain = registry.resolve(None, &ValueType::new("money"));
    assert_eq!(chain.len(), 2);

    // The number formatter declines non-numeric values; the root prints them.
    let money = Value::Custom(Arc::new(Money(12)));
    let text = produce(&registry, None, &ParameterConfig::new(), &money);
    assert_eq!(text.text(), "$12");
}

#[test]
fn lower_order_runs_first() {
    let mut registry = FormatterRegistry::with_default_formatters();
    registry.register(Arc::new(Shout)).unwrap();

    assert_eq!(names(&registry, None, &ValueType::STRING), vec!["shout", "<typed>"]);
    let text = produce(&registry, None, &ParameterConfig::new(), &Value::from("hey"));
    assert_eq!(text.text(), "HEY");
}

#[test]
fn set_type_order_reorders_the_chain() {
    let mut registry = FormatterRegistry::with_default_formatters();
    registry.register(Arc::new(Shout)).unwrap();
    assert!(registry.set_type_order(&ValueType::STRING, 200));

    // `text` still maps to the root formatter, which now comes first.
    assert_eq!(names(&registry, None, &ValueType::STRING), vec!["<typed>", "shout"]);
    assert!(!registry.set_type_order(&ValueType::new("nothing"), 1));
}

// =========================================================================
// Named resolution
// =========================================================================

#[test]
fn named_formatter_yields_a_single_chain() {
    let registry = FormatterRegistry::with_default_formatters();
    let chain = registry.resolve(Some("clip"), &ValueType::STRING);
    assert_eq!(chain.len(), 1);
    assert!(!chain.ends_with_default());
}

#[test]
fn unknown_name_falls_back_to_the_type_chain() {
    let registry = FormatterRegistry::with_default_formatters();
    let named = registry.resolve(Some("nope"), &ValueType::I64);
    let typed = registry.resolve(None, &ValueType::I64);
    assert!(named.same_formatters(&typed));
}

#[test]
fn named_formatter_that_rejects_the_type_falls_back() {
    let registry = FormatterRegistry::with_default_formatters();
    let chain = registry.resolve(Some("bool"), &ValueType::LIST);
    assert_eq!(chain.len(), 2);
    assert!(chain.ends_with_default());
}

#[test]
fn empty_formatter_name_is_rejected() {
    #[derive(Debug)]
    struct Nameless;
    impl ParameterFormatter for Nameless {
        fn name(&self) -> Option<&str> {
            Some("")
        }
        fn formattable_types(&self) -> Vec<FormattableType> {
            vec![FormattableType::new(ValueType::BOOL)]
        }
        fn format(
            &self,
            _ctx: &FormatterContext<'_>,
            _value: Option<&Value>,
        ) -> Result<Formatted, FormatError> {
            Ok(Formatted::Declined)
        }
    }

    let mut registry = FormatterRegistry::new();
    let generation = registry.generation();
    let err = registry.register(Arc::new(Nameless)).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"formatter name must not be empty");
    assert!(registry.register_named(Arc::new(Nameless)).is_err());

    // A rejected formatter leaves no type mapping behind.
    assert_eq!(registry.generation(), generation);
    assert!(registry.formatter_for_type(&ValueType::BOOL).is_none());
}

#[test]
fn default_catalog_registers_names_and_types() {
    let registry = FormatterRegistry::with_default_formatters();
    for name in ["bool", "clip"] {
        let formatter = registry.named(name).unwrap();
        assert_eq!(formatter.name(), Some(name));
    }
    for value_type in [ValueType::INTEGER, ValueType::FLOAT, ValueType::BOOL, ValueType::LIST] {
        assert!(registry.formatter_for_type(&value_type).is_some(), "{value_type}");
    }
}

// =========================================================================
// Caching
// =========================================================================

#[test]
fn resolved_chains_are_cached() {
    let registry = FormatterRegistry::with_default_formatters();
    let first = registry.resolve(None, &ValueType::BOOL);
    let second = registry.resolve(None, &ValueType::BOOL);
    assert!(first.same_formatters(&second));
    assert_eq!(registry.cached_types(), vec![ValueType::BOOL]);
}

#[test]
fn registration_invalidates_cached_chains() {
    let mut registry = FormatterRegistry::with_default_formatters();
    assert_eq!(registry.resolve(None, &ValueType::STRING).len(), 1);
    let generation = registry.generation();

    registry.register(Arc::new(Shout)).unwrap();
    assert!(registry.generation() > generation);
    assert!(registry.cached_types().is_empty());
    assert_eq!(registry.resolve(None, &ValueType::STRING).len(), 2);
}

#[test]
fn cache_capacity_is_validated() {
    let err = FormatterRegistry::with_cache_capacity(1).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"cache capacity must be at least 2, got 1");

    let registry = FormatterRegistry::with_cache_capacity(2).unwrap();
    registry.resolve(None, &ValueType::BOOL);
    registry.resolve(None, &ValueType::STRING);
    registry.resolve(None, &ValueType::LIST);
    assert_eq!(registry.cached_types().len(), 2);
}

#[test]
fn chains_have_independent_cursors() {
    let registry = FormatterRegistry::with_default_formatters();
    let mut first = registry.resolve(None, &ValueType::I64);
    assert!(first.next().is_some());
    assert_eq!(first.remaining(), 1);

    let second = registry.resolve(None, &ValueType::I64);
    assert_eq!(second.remaining(), 2);
}

// =========================================================================
// Built-in formatters
// =========================================================================

#[test]
fn number_formatter_honors_fraction_digits() {
    let registry = FormatterRegistry::with_default_formatters();
    let config = options(&[("number-fraction-digits", ConfigValue::Number(2))]);
    assert_eq!(produce(&registry, None, &config, &Value::from(1.23456)).text(), "1.23");
    assert_eq!(
        produce(&registry, None, &ParameterConfig::new(), &Value::from(2.5)).text(),
        "2.5"
    );
    assert_eq!(
        produce(&registry, None, &ParameterConfig::new(), &Value::from(-42)).text(),
        "-42"
    );
}

#[test]
fn bool_formatter_normalizes_truthy_values() {
    let registry = FormatterRegistry::with_default_formatters();
    let config = ParameterConfig::new();
    assert_eq!(produce(&registry, Some("bool"), &config, &Value::from(0)).text(), "false");
    assert_eq!(produce(&registry, Some("bool"), &config, &Value::from(7)).text(), "true");
    assert_eq!(produce(&registry, Some("bool"), &config, &Value::from("TRUE")).text(), "true");
    assert_eq!(produce(&registry, None, &config, &Value::from(false)).text(), "false");
}

#[test]
fn list_formatter_joins_elements() {
    let registry = FormatterRegistry::with_default_formatters();
    let list = Value::from(vec![Value::from(1), Value::from("two"), Value::from(3.5)]);
    assert_eq!(
        produce(&registry, None, &ParameterConfig::new(), &list).text(),
        "1, two, 3.5"
    );

    let config = options(&[
        ("list-sep", ConfigValue::from(" / ")),
        ("list-sep-last", ConfigValue::from(" and ")),
    ]);
    assert_eq!(produce(&registry, None, &config, &list).text(), "1 / two and 3.5");
}

#[test]
fn list_formatter_skips_empty_elements() {
    let registry = FormatterRegistry::with_default_formatters();
    let list = Value::from(vec![Value::from("a"), Value::from(""), Value::from("b")]);
    assert_eq!(produce(&registry, None, &ParameterConfig::new(), &list).text(), "a, b");
}

#[test]
fn clip_formatter_shortens_long_text() {
    let registry = FormatterRegistry::with_default_formatters();
    let config = options(&[("clip-size", ConfigValue::Number(8))]);

    let long = Value::from("abcd efgh ijkl");
    assert_eq!(produce(&registry, Some("clip"), &config, &long).text(), "abcd...");

    let short = Value::from("abcdefgh");
    assert_eq!(produce(&registry, Some("clip"), &config, &short).text(), "abcdefgh");
}

#[test]
fn clip_size_has_a_lower_bound() {
    let registry = FormatterRegistry::with_default_formatters();
    let config = options(&[("clip-size", ConfigValue::Number(3))]);
    let value = Value::from("0123456789");
    assert_eq!(produce(&registry, Some("clip"), &config, &value).text(), "01234...");
}

#[test]
fn clip_counts_graphemes() {
    let mut registry = FormatterRegistry::new();
    registry.register(Arc::new(ClipFormatter)).unwrap();
    let config = options(&[("clip-size", ConfigValue::Number(8))]);

    // Eight graphemes, each more than one code point.
    let accented = Value::from("e\u{301}e\u{301}e\u{301}e\u{301}e\u{301}e\u{301}e\u{301}e\u{301}");
    let text = produce(&registry, Some("clip"), &config, &accented);
    assert_eq!(text.text(), accented.as_str().unwrap());
}

#[test]
fn root_formatter_renders_absent_values_as_empty() {
    let registry = FormatterRegistry::new();
    let locale = Locale::root();
    let config = ParameterConfig::new();
    let ctx = FormatterContext::new(&registry, &locale, &config, &config, None);
    let text = registry
        .resolve(None, &ValueType::OBJECT)
        .produce(&ctx, None)
        .unwrap();
    assert!(text.is_empty());
}

#[test]
fn exhausted_named_chain_is_an_error() {
    let mut registry = FormatterRegistry::new();
    registry.register(Arc::new(Shout)).unwrap();
    let locale = Locale::root();
    let config = ParameterConfig::new();
    let ctx = FormatterContext::new(&registry, &locale, &config, &config, Some("shout"));

    let err = registry
        .resolve(Some("shout"), &ValueType::I64)
        .produce(&ctx, Some(&Value::from(1)))
        .unwrap_err();
    assert!(matches!(err, FormatError::ChainExhausted { .. }));
    insta::assert_snapshot!(err.to_string(), @"no formatter produced text for type 'i64' (format 'shout')");
}
