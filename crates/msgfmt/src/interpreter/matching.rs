//! Choice selection: ranking a value against configured keys.

use crate::formatter::{ConfigKeyComparator, FormatterChain};
use crate::message::{CompareType, ConfigKey, ConfigValue, KeyTypes, MatchResult, ParameterConfig};
use crate::types::Value;

/// Pick the configured value whose key best matches `value`.
///
/// Only entries whose key type is in `allowed` take part. Entries are
/// visited in the configuration's fixed order; a later entry replaces the
/// current best only with a strictly higher rank, and an exact match ends
/// the search.
///
/// Without a match the default entry is returned when `include_default` is
/// set and the configuration has at least one key of an allowed type.
///
/// # Example
///
/// ```
/// use msgfmt::{
///     CompareType, ConfigKey, ConfigValue, FormatterRegistry, KeyType, KeyTypes,
///     ParameterConfig, Value, best_match,
/// };
///
/// let config = ParameterConfig::from_entries([
///     (Some(ConfigKey::bool(CompareType::Eq, true).unwrap()), ConfigValue::from("Y")),
///     (Some(ConfigKey::bool(CompareType::Eq, false).unwrap()), ConfigValue::from("N")),
///     (None, ConfigValue::from("?")),
/// ])
/// .unwrap();
///
/// let registry = FormatterRegistry::with_default_formatters();
/// let value = Value::from("maybe");
/// let chain = registry.resolve(None, &value.value_type());
///
/// let bools = KeyTypes::from(KeyType::Bool);
/// let strings = KeyTypes::from(KeyType::String);
/// assert_eq!(best_match(&chain, &config, Some(&value), bools, true), Some(&ConfigValue::from("?")));
/// assert_eq!(best_match(&chain, &config, Some(&value), strings, true), None);
/// ```
pub fn best_match<'c>(
    chain: &FormatterChain,
    config: &'c ParameterConfig,
    value: Option<&Value>,
    allowed: KeyTypes,
    include_default: bool,
) -> Option<&'c ConfigValue> {
    let mut best: Option<(MatchResult, &ConfigValue)> = None;

    let candidates = config
        .choices()
        .iter()
        .filter(|(key, _)| allowed.contains(key.key_type()));
    for (key, candidate) in candidates {
        let rank = match_key(chain, key, value);
        if rank > best.map_or(MatchResult::Mismatch, |(best_rank, _)| best_rank) {
            best = Some((rank, candidate));
            if rank == MatchResult::Exact {
                break;
            }
        }
    }

    match best {
        Some((_, candidate)) => Some(candidate),
        None if include_default && config.key_types().intersects(allowed) => {
            config.default_value()
        }
        None => None,
    }
}

/// Rank `value` against a single key.
///
/// Null keys and empty keys on absent values are judged here; every other
/// comparison is delegated to the comparators of `chain`, taking the
/// highest rank any of them reports. Typed keys never match an absent
/// value.
pub fn match_key(chain: &FormatterChain, key: &ConfigKey, value: Option<&Value>) -> MatchResult {
    match (key, value) {
        (ConfigKey::Null(CompareType::Eq), None) | (ConfigKey::Null(CompareType::Ne), Some(_)) => {
            MatchResult::TypelessExact
        }
        (ConfigKey::Empty(CompareType::Eq), None) => MatchResult::TypelessLenient,
        (ConfigKey::Null(_) | ConfigKey::Name(_), _) | (_, None) => MatchResult::Mismatch,
        (key, Some(value)) => chain
            .comparators()
            .map(|comparator| compare_with(comparator, key, value))
            .max()
            .unwrap_or(MatchResult::Mismatch),
    }
}

fn compare_with(comparator: &dyn ConfigKeyComparator, key: &ConfigKey, value: &Value) -> MatchResult {
    match key {
        ConfigKey::Empty(compare) => comparator.compare_to_empty_key(*compare, value),
        ConfigKey::Bool { compare, value: key } => {
            comparator.compare_to_bool_key(*compare, *key, value)
        }
        ConfigKey::Number { compare, value: key } => {
            comparator.compare_to_number_key(*compare, *key, value)
        }
        ConfigKey::String { compare, value: key } => {
            comparator.compare_to_string_key(*compare, key, value)
        }
        ConfigKey::Null(_) | ConfigKey::Name(_) => MatchResult::Mismatch,
    }
}
