//! Parameter configuration: named options and value-driven choices.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::BitOr;

use crate::message::{ConfigError, Message};

/// The comparison a choice key applies to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompareType {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
}

impl CompareType {
    /// All comparison types, in wire order.
    pub const ALL: [CompareType; 6] = [
        CompareType::Lt,
        CompareType::Le,
        CompareType::Eq,
        CompareType::Ne,
        CompareType::Gt,
        CompareType::Ge,
    ];

    /// Whether `ordering` (value compared to key) satisfies this comparison.
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            CompareType::Lt => ordering.is_lt(),
            CompareType::Le => ordering.is_le(),
            CompareType::Eq => ordering.is_eq(),
            CompareType::Ne => ordering.is_ne(),
            CompareType::Gt => ordering.is_gt(),
            CompareType::Ge => ordering.is_ge(),
        }
    }

    /// The operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareType::Lt => "<",
            CompareType::Le => "<=",
            CompareType::Eq => "=",
            CompareType::Ne => "<>",
            CompareType::Gt => ">",
            CompareType::Ge => ">=",
        }
    }

    /// The symbol as written in front of a key; empty for equality.
    pub fn as_prefix(self) -> &'static str {
        if self == CompareType::Eq {
            ""
        } else {
            self.symbol()
        }
    }
}

impl fmt::Display for CompareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The kind of a [`ConfigKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyType {
    Null,
    Empty,
    Bool,
    Number,
    String,
    Name,
}

impl KeyType {
    fn bit(self) -> u8 {
        match self {
            KeyType::Null => 1,
            KeyType::Empty => 1 << 1,
            KeyType::Bool => 1 << 2,
            KeyType::Number => 1 << 3,
            KeyType::String => 1 << 4,
            KeyType::Name => 1 << 5,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyType::Null => "null",
            KeyType::Empty => "empty",
            KeyType::Bool => "bool",
            KeyType::Number => "number",
            KeyType::String => "string",
            KeyType::Name => "name",
        })
    }
}

/// A set of [`KeyType`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyTypes(u8);

impl KeyTypes {
    pub const NONE: KeyTypes = KeyTypes(0);
    /// Keys consulted before a formatter runs.
    pub const NULL_EMPTY: KeyTypes = KeyTypes(1 | 1 << 1);
    /// Keys consulted after a formatter produced its text.
    pub const TYPED: KeyTypes = KeyTypes(1 << 2 | 1 << 3 | 1 << 4);

    /// The set containing exactly `types`.
    pub fn of(types: &[KeyType]) -> Self {
        types
            .iter()
            .fold(Self::NONE, |set, key_type| set | *key_type)
    }

    pub fn contains(self, key_type: KeyType) -> bool {
        self.0 & key_type.bit() != 0
    }

    pub fn insert(&mut self, key_type: KeyType) {
        self.0 |= key_type.bit();
    }

    /// Whether the two sets share a member.
    pub fn intersects(self, other: KeyTypes) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for KeyTypes {
    type Output = KeyTypes;

    fn bitor(self, rhs: KeyTypes) -> KeyTypes {
        KeyTypes(self.0 | rhs.0)
    }
}

impl BitOr<KeyType> for KeyTypes {
    type Output = KeyTypes;

    fn bitor(self, rhs: KeyType) -> KeyTypes {
        KeyTypes(self.0 | rhs.bit())
    }
}

impl From<KeyType> for KeyTypes {
    fn from(key_type: KeyType) -> Self {
        KeyTypes(key_type.bit())
    }
}

/// The ranked outcome of comparing a value against a [`ConfigKey`].
///
/// Variants are declared in ascending rank, so the derived ordering is the
/// ranking used by choice selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchResult {
    Mismatch,
    /// Matched while ignoring the value's type, loosely (trimmed emptiness).
    TypelessLenient,
    /// A loose equivalence, such as a case-insensitive string match.
    Lenient,
    /// Matched while ignoring the value's type, strictly (null checks).
    TypelessExact,
    Exact,
}

impl MatchResult {
    pub fn is_mismatch(self) -> bool {
        self == MatchResult::Mismatch
    }
}

/// A typed, comparison-qualified key of a parameter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Matches on the absence (`=`) or presence (`<>`) of a value.
    Null(CompareType),
    /// Matches on the emptiness of a value, as judged by its formatter.
    Empty(CompareType),
    /// Matches booleans and truthy values; `=` and `<>` only.
    Bool { compare: CompareType, value: bool },
    /// Compares numerically with signed 64-bit semantics.
    Number { compare: CompareType, value: i64 },
    /// Compares text.
    String { compare: CompareType, value: String },
    /// Names a configuration option; never used for choice matching.
    Name(String),
}

impl ConfigKey {
    /// A null key. Only `=` and `<>` are accepted.
    pub fn null(compare: CompareType) -> Result<Self, ConfigError> {
        Self::checked(ConfigKey::Null(compare))
    }

    /// An empty key. Only `=` and `<>` are accepted.
    pub fn empty(compare: CompareType) -> Result<Self, ConfigError> {
        Self::checked(ConfigKey::Empty(compare))
    }

    /// A boolean key. Only `=` and `<>` are accepted.
    pub fn bool(compare: CompareType, value: bool) -> Result<Self, ConfigError> {
        Self::checked(ConfigKey::Bool { compare, value })
    }

    pub fn number(compare: CompareType, value: i64) -> Self {
        ConfigKey::Number { compare, value }
    }

    pub fn string(compare: CompareType, value: impl Into<String>) -> Self {
        ConfigKey::String {
            compare,
            value: value.into(),
        }
    }

    pub fn name(name: impl Into<String>) -> Result<Self, ConfigError> {
        Self::checked(ConfigKey::Name(name.into()))
    }

    fn checked(key: ConfigKey) -> Result<Self, ConfigError> {
        key.validate()?;
        Ok(key)
    }

    /// Check the comparison restrictions of this key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            ConfigKey::Null(compare) | ConfigKey::Empty(compare) | ConfigKey::Bool { compare, .. }
                if !matches!(compare, CompareType::Eq | CompareType::Ne) =>
            {
                Err(ConfigError::InvalidCompareType {
                    key_type: self.key_type(),
                    compare: *compare,
                })
            }
            ConfigKey::Name(name) if name.is_empty() => Err(ConfigError::EmptyOptionName),
            _ => Ok(()),
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            ConfigKey::Null(_) => KeyType::Null,
            ConfigKey::Empty(_) => KeyType::Empty,
            ConfigKey::Bool { .. } => KeyType::Bool,
            ConfigKey::Number { .. } => KeyType::Number,
            ConfigKey::String { .. } => KeyType::String,
            ConfigKey::Name(_) => KeyType::Name,
        }
    }

    /// The comparison of this key; names compare for equality.
    pub fn compare_type(&self) -> CompareType {
        match self {
            ConfigKey::Null(compare)
            | ConfigKey::Empty(compare)
            | ConfigKey::Bool { compare, .. }
            | ConfigKey::Number { compare, .. }
            | ConfigKey::String { compare, .. } => *compare,
            ConfigKey::Name(_) => CompareType::Eq,
        }
    }

    /// Position of this key in the evaluation order of choices.
    fn sort_rank(&self) -> u8 {
        match self {
            ConfigKey::Null(CompareType::Eq) => 0,
            ConfigKey::Empty(CompareType::Eq) => 1,
            ConfigKey::Bool { .. } => 2,
            ConfigKey::Number { .. } => 3,
            ConfigKey::String { .. } => 4,
            ConfigKey::Empty(_) => 5,
            ConfigKey::Null(_) => 6,
            ConfigKey::Name(_) => 7,
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.compare_type().as_prefix();
        match self {
            ConfigKey::Null(_) => write!(f, "{prefix}null"),
            ConfigKey::Empty(_) => write!(f, "{prefix}empty"),
            ConfigKey::Bool { value, .. } => write!(f, "{prefix}{value}"),
            ConfigKey::Number { value, .. } => write!(f, "{prefix}{value}"),
            ConfigKey::String { value, .. } => write!(f, "{prefix}'{value}'"),
            ConfigKey::Name(name) => f.write_str(name),
        }
    }
}

/// A value stored in a parameter configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Number(i64),
    String(String),
    Message(Message),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            ConfigValue::Message(message) => Some(message),
            _ => None,
        }
    }

    /// Collect names of templates referenced by a message value.
    pub(crate) fn collect_template_names(&self, names: &mut BTreeSet<String>) {
        if let ConfigValue::Message(message) = self {
            message.collect_template_names(names);
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Number(n)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<Message> for ConfigValue {
    fn from(message: Message) -> Self {
        ConfigValue::Message(message)
    }
}

/// The configuration attached to a parameter node.
///
/// Named options (such as `list-sep`) are kept in a sorted map. Choice
/// entries are sorted once at construction: `=null`, `=empty`, boolean,
/// number and string keys, then `<>empty` and `<>null`, each group in
/// declaration order. Matching walks entries in this order, so ties between
/// equally ranked entries are always won by the earlier one.
///
/// # Example
///
/// ```
/// use msgfmt::{CompareType, ConfigKey, ConfigValue, KeyType, ParameterConfig};
///
/// let config = ParameterConfig::from_entries([
///     (Some(ConfigKey::string(CompareType::Eq, "x")), ConfigValue::from("ex")),
///     (Some(ConfigKey::null(CompareType::Eq).unwrap()), ConfigValue::from("none")),
///     (None, ConfigValue::from("other")),
/// ])
/// .unwrap();
///
/// assert_eq!(config.choices()[0].0, ConfigKey::Null(CompareType::Eq));
/// assert!(config.key_types().contains(KeyType::String));
/// assert_eq!(config.default_value(), Some(&ConfigValue::from("other")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterConfig {
    options: BTreeMap<String, ConfigValue>,
    choices: Vec<(ConfigKey, ConfigValue)>,
    default: Option<ConfigValue>,
    key_types: KeyTypes,
}

impl ParameterConfig {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from its three parts.
    ///
    /// `Name` keys among `choices` are treated as options.
    pub fn with_parts(
        options: BTreeMap<String, ConfigValue>,
        choices: Vec<(ConfigKey, ConfigValue)>,
        default: Option<ConfigValue>,
    ) -> Result<Self, ConfigError> {
        let mut config = ParameterConfig {
            options: BTreeMap::new(),
            choices: Vec::with_capacity(choices.len()),
            default,
            key_types: KeyTypes::NONE,
        };

        for (name, value) in options {
            config.insert_option(name, value)?;
        }
        for (key, value) in choices {
            key.validate()?;
            match key {
                ConfigKey::Name(name) => config.insert_option(name, value)?,
                key => {
                    config.key_types.insert(key.key_type());
                    config.choices.push((key, value));
                }
            }
        }

        // Stable: equal ranks keep declaration order.
        config.choices.sort_by_key(|(key, _)| key.sort_rank());
        Ok(config)
    }

    /// Build a configuration from key/value entries; the `None` key
    /// designates the default value.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (Option<ConfigKey>, ConfigValue)>,
    ) -> Result<Self, ConfigError> {
        let mut choices = Vec::new();
        let mut default = None;
        for (key, value) in entries {
            match key {
                Some(key) => choices.push((key, value)),
                None => default = Some(value),
            }
        }
        Self::with_parts(BTreeMap::new(), choices, default)
    }

    fn insert_option(&mut self, name: String, value: ConfigValue) -> Result<(), ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyOptionName);
        }
        self.key_types.insert(KeyType::Name);
        self.options.insert(name, value);
        Ok(())
    }

    /// Named options.
    pub fn options(&self) -> &BTreeMap<String, ConfigValue> {
        &self.options
    }

    /// Look up a named option.
    pub fn option(&self, name: &str) -> Option<&ConfigValue> {
        self.options.get(name)
    }

    /// Choice entries in evaluation order.
    pub fn choices(&self) -> &[(ConfigKey, ConfigValue)] {
        &self.choices
    }

    /// The unkeyed default entry.
    pub fn default_value(&self) -> Option<&ConfigValue> {
        self.default.as_ref()
    }

    /// The key types present among choices and options.
    pub fn key_types(&self) -> KeyTypes {
        self.key_types
    }

    /// Whether there are no options, choices or default.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.choices.is_empty() && self.default.is_none()
    }

    pub(crate) fn collect_template_names(&self, names: &mut BTreeSet<String>) {
        for value in self.options.values() {
            value.collect_template_names(names);
        }
        for (_, value) in &self.choices {
            value.collect_template_names(names);
        }
        if let Some(value) = &self.default {
            value.collect_template_names(names);
        }
    }
}
