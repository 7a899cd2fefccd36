use std::cmp::Ordering;

use crate::formatter::{
    ConfigKeyComparator, FormattableType, Formatted, FormatterContext, ParameterFormatter,
    ROOT_ORDER, parse_number, rank_truth,
};
use crate::interpreter::FormatError;
use crate::message::{CompareType, MatchResult};
use crate::types::{Text, Value, ValueType, is_trimmed_empty};

/// The root formatter: renders any value through its `Display` text.
///
/// Mapped to [`ValueType::OBJECT`] at [`ROOT_ORDER`] and to the textual
/// types at the default order. An absent value renders as empty text. It
/// never declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringFormatter;

impl ParameterFormatter for StringFormatter {
    fn formattable_types(&self) -> Vec<FormattableType> {
        vec![
            FormattableType::with_order(ValueType::OBJECT, ROOT_ORDER),
            FormattableType::new(ValueType::STRING),
            FormattableType::new(ValueType::TEXT),
            FormattableType::new(ValueType::CHAR),
        ]
    }

    fn format(
        &self,
        _ctx: &FormatterContext<'_>,
        value: Option<&Value>,
    ) -> Result<Formatted, FormatError> {
        let text = value.map_or_else(Text::empty, |value| Text::plain(value.to_string()));
        Ok(Formatted::Produced(text))
    }

    fn comparator(&self) -> Option<&dyn ConfigKeyComparator> {
        Some(self)
    }
}

impl ConfigKeyComparator for StringFormatter {
    fn compare_to_empty_key(&self, compare: CompareType, value: &Value) -> MatchResult {
        compare_empty_text(compare, &value.to_string())
    }

    fn compare_to_bool_key(&self, compare: CompareType, key: bool, value: &Value) -> MatchResult {
        let text = value.to_string();
        let truth = match text.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            other => parse_number(other).map(|number| !number.is_zero()),
        };
        truth.map_or(MatchResult::Mismatch, |truth| {
            rank_truth(compare, key, truth, MatchResult::Lenient)
        })
    }

    fn compare_to_number_key(&self, compare: CompareType, key: i64, value: &Value) -> MatchResult {
        match parse_number(&value.to_string()).and_then(|number| number.cmp_key(key)) {
            Some(ordering) if compare.matches(ordering) => MatchResult::Lenient,
            _ => MatchResult::Mismatch,
        }
    }

    fn compare_to_string_key(&self, compare: CompareType, key: &str, value: &Value) -> MatchResult {
        compare_text(compare, key, &value.to_string(), value.is_text())
    }
}

/// Rank `text` against an `empty` key.
///
/// Zero-length text is exactly empty; text of spaces only is leniently
/// empty.
pub(crate) fn compare_empty_text(compare: CompareType, text: &str) -> MatchResult {
    let empty = text.is_empty();
    let lenient = is_trimmed_empty(text);
    match compare {
        CompareType::Eq if empty => MatchResult::TypelessExact,
        CompareType::Eq if lenient => MatchResult::TypelessLenient,
        CompareType::Eq => MatchResult::Mismatch,
        _ if empty => MatchResult::Mismatch,
        _ if lenient => MatchResult::TypelessLenient,
        _ => MatchResult::TypelessExact,
    }
}

/// Rank `text` against a string key.
///
/// Equal text ranks exact (lenient when the value was not textual to
/// begin with); a case-insensitive match ranks lenient. Other comparisons
/// use the natural string order.
pub(crate) fn compare_text(compare: CompareType, key: &str, text: &str, textual: bool) -> MatchResult {
    let exact = if textual {
        MatchResult::Exact
    } else {
        MatchResult::Lenient
    };
    let same_ignoring_case = || text.to_lowercase() == key.to_lowercase();

    let (rank, ordering) = match compare {
        CompareType::Eq if text == key => (exact, Ordering::Equal),
        CompareType::Eq if same_ignoring_case() => (MatchResult::Lenient, Ordering::Equal),
        CompareType::Eq => (exact, Ordering::Greater),
        CompareType::Ne if !same_ignoring_case() => (MatchResult::Lenient, Ordering::Greater),
        _ => (exact, text.cmp(key)),
    };

    if compare.matches(ordering) {
        rank
    } else {
        MatchResult::Mismatch
    }
}
