//! Formatter contracts, resolution and the built-in formatter catalog.
//!
//! A [`ParameterFormatter`] turns a runtime value into [`Text`]. Formatters
//! are registered with a [`FormatterRegistry`] under the value types they
//! claim and, optionally, under a name. Resolving a value type yields a
//! [`FormatterChain`] that is tried in order until one formatter produces
//! text.

mod boolean;
mod chain;
mod clip;
mod list;
mod number;
mod registry;
mod string;

use std::cmp::Ordering;

use crate::interpreter::FormatError;
use crate::message::{CompareType, MatchResult};
use crate::types::{Text, TypeHierarchy, Value, ValueType};

pub use boolean::BoolFormatter;
pub use chain::{FormatterChain, FormatterContext};
pub use clip::ClipFormatter;
pub use list::ListFormatter;
pub use number::NumberFormatter;
pub use registry::{DEFAULT_CACHE_CAPACITY, FormatterRegistry};
pub use string::StringFormatter;

/// Order given to a type mapping that does not specify one.
pub const DEFAULT_ORDER: u8 = 100;

/// Order of the root mapping. Larger orders are tried later.
pub const ROOT_ORDER: u8 = 127;

/// The outcome of a single formatter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted {
    /// The formatter produced text.
    Produced(Text),
    /// The formatter does not handle this value; try the next one.
    Declined,
}

/// A value type claimed by a formatter, with the order in which the
/// formatter is tried relative to others in the same chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattableType {
    pub value_type: ValueType,
    pub order: u8,
}

impl FormattableType {
    /// Claim `value_type` at [`DEFAULT_ORDER`].
    pub fn new(value_type: ValueType) -> Self {
        Self::with_order(value_type, DEFAULT_ORDER)
    }

    pub fn with_order(value_type: ValueType, order: u8) -> Self {
        FormattableType { value_type, order }
    }
}

/// Behavior that formats values of one or more types.
pub trait ParameterFormatter: Send + Sync {
    /// The name under which this formatter can be selected explicitly.
    fn name(&self) -> Option<&str> {
        None
    }

    /// The value types this formatter is registered for.
    fn formattable_types(&self) -> Vec<FormattableType> {
        Vec::new()
    }

    /// Whether an explicitly named use of this formatter accepts values
    /// of `value_type`. Resolution falls back to the type chain otherwise.
    fn can_format(&self, _value_type: &ValueType, _hierarchy: &TypeHierarchy) -> bool {
        true
    }

    /// Format `value`, or decline so the next formatter in the chain runs.
    ///
    /// `None` is an absent parameter.
    fn format(
        &self,
        ctx: &FormatterContext<'_>,
        value: Option<&Value>,
    ) -> Result<Formatted, FormatError>;

    /// The key comparator of this formatter, if it judges choice keys.
    fn comparator(&self) -> Option<&dyn ConfigKeyComparator> {
        None
    }
}

/// Judges how a value ranks against typed choice keys.
///
/// Every method defaults to [`MatchResult::Mismatch`]; a formatter only
/// implements the comparisons meaningful for its types.
pub trait ConfigKeyComparator: Send + Sync {
    /// Rank `value` against an `empty` key with comparison `compare`.
    fn compare_to_empty_key(&self, _compare: CompareType, _value: &Value) -> MatchResult {
        MatchResult::Mismatch
    }

    fn compare_to_bool_key(&self, _compare: CompareType, _key: bool, _value: &Value) -> MatchResult {
        MatchResult::Mismatch
    }

    fn compare_to_number_key(
        &self,
        _compare: CompareType,
        _key: i64,
        _value: &Value,
    ) -> MatchResult {
        MatchResult::Mismatch
    }

    fn compare_to_string_key(
        &self,
        _compare: CompareType,
        _key: &str,
        _value: &Value,
    ) -> MatchResult {
        MatchResult::Mismatch
    }
}

/// Rank a boolean key against a truth value derived from the value.
fn rank_truth(compare: CompareType, key: bool, truth: bool, rank: MatchResult) -> MatchResult {
    if compare.matches(truth.cmp(&key)) {
        rank
    } else {
        MatchResult::Mismatch
    }
}

/// Parse text as a number, preferring integers.
fn parse_number(text: &str) -> Option<ParsedNumber> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(ParsedNumber::Integer(n));
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(ParsedNumber::Float)
}

#[derive(Debug, Clone, Copy)]
enum ParsedNumber {
    Integer(i64),
    Float(f64),
}

impl ParsedNumber {
    /// Compare against an integer key; `None` when not comparable.
    fn cmp_key(self, key: i64) -> Option<Ordering> {
        match self {
            ParsedNumber::Integer(n) => Some(n.cmp(&key)),
            ParsedNumber::Float(f) => f.partial_cmp(&(key as f64)),
        }
    }

    fn is_zero(self) -> bool {
        match self {
            ParsedNumber::Integer(n) => n == 0,
            ParsedNumber::Float(f) => f == 0.0,
        }
    }
}
