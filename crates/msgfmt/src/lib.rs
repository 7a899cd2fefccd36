//! A runtime message-formatting engine.
//!
//! Compiled messages are trees of text, parameter and template nodes.
//! Formatting a message walks the tree, resolves a chain of formatters for
//! each parameter value by its type (or an explicit format name), lets the
//! parameter's configured choices override the output, and joins the parts
//! with a deterministic spacing rule. Message sets can be written to and
//! read from a compact binary pack.

pub mod cache;
pub mod formatter;
pub mod interpreter;
pub mod message;
pub mod pack;
pub mod support;
pub mod types;

pub use formatter::{
    BoolFormatter, ClipFormatter, ConfigKeyComparator, FormattableType, Formatted,
    FormatterChain, FormatterContext, FormatterRegistry, ListFormatter, NumberFormatter,
    ParameterFormatter, StringFormatter,
};
pub use interpreter::{
    EvalContext, FormatError, MessageAccessor, NoParameters, NoTemplates, ParameterLookup,
    TemplateStore, best_match, evaluate, evaluate_message, format_message, match_key,
};
pub use message::{
    CompareType, ConfigError, ConfigKey, ConfigValue, KeyType, KeyTypes, MatchResult, Message,
    MessageBody, MessageNode, ParameterConfig, ParameterNode, TemplateNode,
};
pub use pack::{PackError, Packable};
pub use support::{
    MessageConfigurer, MessageSupport, SupportConfig, SupportError, compute_suggestions,
};
pub use types::{CustomValue, Locale, Text, TypeHierarchy, Value, ValueType};

/// Creates a `BTreeMap<String, Value>` of parameters from name/value pairs.
///
/// Values are converted via `Into<Value>`, so integers, floats, booleans,
/// strings and lists can be passed directly.
///
/// # Example
///
/// ```
/// use msgfmt::{Value, params};
///
/// let p = params! { "count" => 3, "name" => "Ada" };
/// assert_eq!(p.len(), 2);
/// assert_eq!(p["count"].as_integer(), Some(3));
/// assert_eq!(p["name"].as_str(), Some("Ada"));
/// ```
#[macro_export]
macro_rules! params {
    { $($key:expr => $value:expr),* $(,)? } => {
        [$(
            (
                ::std::string::ToString::to_string(&$key),
                ::std::convert::Into::<$crate::Value>::into($value),
            )
        ),*]
        .into_iter()
        .collect::<::std::collections::BTreeMap<::std::string::String, $crate::Value>>()
    };
}
