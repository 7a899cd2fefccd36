use crate::formatter::{
    ConfigKeyComparator, FormattableType, Formatted, FormatterContext, ParameterFormatter,
};
use crate::interpreter::FormatError;
use crate::message::{CompareType, MatchResult};
use crate::types::{Text, Value, ValueType};

const DEFAULT_SEPARATOR: &str = ", ";

/// Formats lists by formatting each element through its own chain.
///
/// Options:
/// - `list-sep`: separator between elements (default `", "`)
/// - `list-sep-last`: separator before the last element (default `list-sep`)
///
/// Elements that format to empty text are left out. A list is empty when
/// it has no elements; number keys compare the element count.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFormatter;

impl ParameterFormatter for ListFormatter {
    fn formattable_types(&self) -> Vec<FormattableType> {
        vec![
            FormattableType::new(ValueType::LIST),
            FormattableType::new(ValueType::ITERABLE),
        ]
    }

    fn format(
        &self,
        ctx: &FormatterContext<'_>,
        value: Option<&Value>,
    ) -> Result<Formatted, FormatError> {
        let Some(items) = value.and_then(Value::as_list) else {
            return Ok(Formatted::Declined);
        };

        let separator = ctx.config_str("list-sep").unwrap_or(DEFAULT_SEPARATOR);
        let last_separator = ctx.config_str("list-sep-last").unwrap_or(separator);

        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            let text = ctx.format_value(Some(item))?;
            if !text.is_empty() {
                parts.push(text.into_string());
            }
        }

        let mut joined = String::new();
        let count = parts.len();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                joined.push_str(if i + 1 == count {
                    last_separator
                } else {
                    separator
                });
            }
            joined.push_str(&part);
        }
        Ok(Formatted::Produced(Text::plain(joined)))
    }

    fn comparator(&self) -> Option<&dyn ConfigKeyComparator> {
        Some(self)
    }
}

impl ConfigKeyComparator for ListFormatter {
    fn compare_to_empty_key(&self, compare: CompareType, value: &Value) -> MatchResult {
        let Some(items) = value.as_list() else {
            return MatchResult::Mismatch;
        };
        let empty = items.is_empty();
        match compare {
            CompareType::Eq if empty => MatchResult::TypelessExact,
            CompareType::Ne if !empty => MatchResult::TypelessExact,
            _ => MatchResult::Mismatch,
        }
    }

    fn compare_to_number_key(&self, compare: CompareType, key: i64, value: &Value) -> MatchResult {
        let Some(items) = value.as_list() else {
            return MatchResult::Mismatch;
        };
        let size = i64::try_from(items.len()).unwrap_or(i64::MAX);
        if compare.matches(size.cmp(&key)) {
            MatchResult::Exact
        } else {
            MatchResult::Mismatch
        }
    }
}
