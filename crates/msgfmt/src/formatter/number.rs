use crate::formatter::string::compare_text;
use crate::formatter::{
    ConfigKeyComparator, FormattableType, Formatted, FormatterContext, ParameterFormatter,
    rank_truth,
};
use crate::interpreter::FormatError;
use crate::message::{CompareType, MatchResult};
use crate::types::{Text, Value, ValueType};

/// Formats integers and floats.
///
/// Registered for `integer`, `float` and `number`. Values of host types
/// that descend from `number` but are not numeric [`Value`]s are declined,
/// passing them on to the next formatter in the chain.
///
/// The `number-fraction-digits` option fixes the number of fraction digits
/// printed for floats.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberFormatter;

impl ParameterFormatter for NumberFormatter {
    fn formattable_types(&self) -> Vec<FormattableType> {
        vec![
            FormattableType::new(ValueType::INTEGER),
            FormattableType::new(ValueType::FLOAT),
            FormattableType::new(ValueType::NUMBER),
        ]
    }

    fn format(
        &self,
        ctx: &FormatterContext<'_>,
        value: Option<&Value>,
    ) -> Result<Formatted, FormatError> {
        let text = match value {
            Some(Value::Integer(n)) => n.to_string(),
            Some(Value::Float(f)) => match ctx
                .config_number("number-fraction-digits")
                .and_then(|digits| usize::try_from(digits).ok())
            {
                Some(digits) => format!("{f:.digits$}"),
                None => f.to_string(),
            },
            _ => return Ok(Formatted::Declined),
        };
        Ok(Formatted::Produced(Text::plain(text)))
    }

    fn comparator(&self) -> Option<&dyn ConfigKeyComparator> {
        Some(self)
    }
}

impl ConfigKeyComparator for NumberFormatter {
    fn compare_to_bool_key(&self, compare: CompareType, key: bool, value: &Value) -> MatchResult {
        match value {
            Value::Integer(n) => rank_truth(compare, key, *n != 0, MatchResult::Lenient),
            Value::Float(f) => rank_truth(compare, key, *f != 0.0, MatchResult::Lenient),
            _ => MatchResult::Mismatch,
        }
    }

    fn compare_to_number_key(&self, compare: CompareType, key: i64, value: &Value) -> MatchResult {
        let ordering = match value {
            Value::Integer(n) => Some(n.cmp(&key)),
            Value::Float(f) => f.partial_cmp(&(key as f64)),
            _ => None,
        };
        match ordering {
            Some(ordering) if compare.matches(ordering) => MatchResult::Exact,
            _ => MatchResult::Mismatch,
        }
    }

    fn compare_to_string_key(&self, compare: CompareType, key: &str, value: &Value) -> MatchResult {
        match value {
            Value::Integer(_) | Value::Float(_) => {
                compare_text(compare, key, &value.to_string(), false)
            }
            _ => MatchResult::Mismatch,
        }
    }
}
