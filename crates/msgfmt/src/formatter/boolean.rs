use crate::formatter::string::compare_text;
use crate::formatter::{
    ConfigKeyComparator, FormattableType, Formatted, FormatterContext, ParameterFormatter,
    parse_number, rank_truth,
};
use crate::interpreter::FormatError;
use crate::message::{CompareType, MatchResult};
use crate::types::{Text, TypeHierarchy, Value, ValueType};

/// Formats booleans as `true`/`false`.
///
/// Also available by name as `bool`, in which case numbers (non-zero is
/// true) and the strings `true`/`false` in any case are converted first.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolFormatter;

impl BoolFormatter {
    fn truth(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Integer(n) => Some(*n != 0),
            Value::Float(f) => Some(*f != 0.0),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            Value::String(s) => parse_number(s).map(|number| !number.is_zero()),
            _ => None,
        }
    }
}

impl ParameterFormatter for BoolFormatter {
    fn name(&self) -> Option<&str> {
        Some("bool")
    }

    fn formattable_types(&self) -> Vec<FormattableType> {
        vec![FormattableType::new(ValueType::BOOL)]
    }

    fn can_format(&self, value_type: &ValueType, hierarchy: &TypeHierarchy) -> bool {
        let value_type = hierarchy.boxed(value_type).unwrap_or(value_type);
        [ValueType::BOOL, ValueType::NUMBER, ValueType::STRING]
            .iter()
            .any(|accepted| hierarchy.is_a(value_type, accepted))
    }

    fn format(
        &self,
        _ctx: &FormatterContext<'_>,
        value: Option<&Value>,
    ) -> Result<Formatted, FormatError> {
        let Some(value) = value else {
            return Ok(Formatted::Produced(Text::empty()));
        };
        Ok(match Self::truth(value) {
            Some(truth) => Formatted::Produced(Text::plain(truth.to_string())),
            None => Formatted::Declined,
        })
    }

    fn comparator(&self) -> Option<&dyn ConfigKeyComparator> {
        Some(self)
    }
}

impl ConfigKeyComparator for BoolFormatter {
    fn compare_to_bool_key(&self, compare: CompareType, key: bool, value: &Value) -> MatchResult {
        match value {
            Value::Bool(b) => rank_truth(compare, key, *b, MatchResult::Exact),
            Value::String(s) if s == "true" || s == "false" => {
                rank_truth(compare, key, s == "true", MatchResult::Lenient)
            }
            other => Self::truth(other).map_or(MatchResult::Mismatch, |truth| {
                rank_truth(compare, key, truth, MatchResult::Lenient)
            }),
        }
    }

    fn compare_to_string_key(&self, compare: CompareType, key: &str, value: &Value) -> MatchResult {
        match value {
            Value::Bool(b) => compare_text(compare, key, &b.to_string(), false),
            _ => MatchResult::Mismatch,
        }
    }
}
