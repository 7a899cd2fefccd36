use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::formatter::{ConfigKeyComparator, Formatted, FormatterRegistry, ParameterFormatter};
use crate::interpreter::FormatError;
use crate::message::{ConfigValue, ParameterConfig};
use crate::types::{Locale, Text, TypeHierarchy, Value, ValueType};

/// An ordered list of candidate formatters with its own cursor.
///
/// Chains handed out by [`FormatterRegistry::resolve`] share the formatter
/// list with the resolution cache but each carries an independent cursor,
/// so consuming one chain never affects another.
#[derive(Clone)]
pub struct FormatterChain {
    formatters: Arc<[Arc<dyn ParameterFormatter>]>,
    ends_with_default: bool,
    cursor: usize,
}

impl FormatterChain {
    pub(crate) fn new(formatters: Arc<[Arc<dyn ParameterFormatter>]>, ends_with_default: bool) -> Self {
        FormatterChain {
            formatters,
            ends_with_default,
            cursor: 0,
        }
    }

    /// All formatters of the chain, regardless of the cursor.
    pub fn formatters(&self) -> &[Arc<dyn ParameterFormatter>] {
        &self.formatters
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Whether the last formatter is the registry's root formatter.
    pub fn ends_with_default(&self) -> bool {
        self.ends_with_default
    }

    /// Number of formatters not yet tried.
    pub fn remaining(&self) -> usize {
        self.formatters.len().saturating_sub(self.cursor)
    }

    /// Whether two chains list the same formatters in the same order.
    pub fn same_formatters(&self, other: &FormatterChain) -> bool {
        self.formatters.len() == other.formatters.len()
            && self
                .formatters
                .iter()
                .zip(other.formatters.iter())
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }

    /// The comparators consulted for choice keys.
    ///
    /// The root formatter is skipped when it is not the only member, so a
    /// generic text comparison never outranks a type-specific one.
    pub fn comparators(&self) -> impl Iterator<Item = &dyn ConfigKeyComparator> {
        let skip_last = self.ends_with_default && self.formatters.len() > 1;
        let take = if skip_last {
            self.formatters.len() - 1
        } else {
            self.formatters.len()
        };
        self.formatters
            .iter()
            .take(take)
            .filter_map(|formatter| formatter.comparator())
    }

    /// Run the remaining formatters until one produces text.
    ///
    /// Exhausting the chain is a configuration error: the root formatter
    /// never declines.
    pub fn produce(
        &mut self,
        ctx: &FormatterContext<'_>,
        value: Option<&Value>,
    ) -> Result<Text, FormatError> {
        while let Some(formatter) = self.next() {
            match formatter.format(ctx, value)? {
                Formatted::Produced(text) => return Ok(text),
                Formatted::Declined => {
                    trace!(remaining = self.remaining(), "formatter declined value");
                }
            }
        }

        Err(FormatError::ChainExhausted {
            value_type: value.map_or(ValueType::OBJECT, Value::value_type),
            format: ctx.format_name().map(ToString::to_string),
        })
    }
}

impl Iterator for FormatterChain {
    type Item = Arc<dyn ParameterFormatter>;

    fn next(&mut self) -> Option<Self::Item> {
        let formatter = self.formatters.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(formatter)
    }
}

impl fmt::Debug for FormatterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .formatters
            .iter()
            .map(|formatter| formatter.name().unwrap_or("<typed>"))
            .collect();
        f.debug_struct("FormatterChain")
            .field("formatters", &names)
            .field("ends_with_default", &self.ends_with_default)
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// What a formatter can see while formatting one value.
#[derive(Clone, Copy)]
pub struct FormatterContext<'a> {
    registry: &'a FormatterRegistry,
    locale: &'a Locale,
    config: &'a ParameterConfig,
    defaults: &'a ParameterConfig,
    format: Option<&'a str>,
}

impl<'a> FormatterContext<'a> {
    /// Create a context.
    ///
    /// `config` is the parameter's own configuration; `defaults` supplies
    /// options the parameter does not set.
    pub fn new(
        registry: &'a FormatterRegistry,
        locale: &'a Locale,
        config: &'a ParameterConfig,
        defaults: &'a ParameterConfig,
        format: Option<&'a str>,
    ) -> Self {
        FormatterContext {
            registry,
            locale,
            config,
            defaults,
            format,
        }
    }

    pub fn locale(&self) -> &Locale {
        self.locale
    }

    /// The explicit format name of the parameter, if any.
    pub fn format_name(&self) -> Option<&str> {
        self.format
    }

    pub fn config(&self) -> &ParameterConfig {
        self.config
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        self.registry.hierarchy()
    }

    /// Look up a named option, falling back to the default parameter
    /// configuration.
    pub fn config_value(&self, name: &str) -> Option<&ConfigValue> {
        self.config
            .option(name)
            .or_else(|| self.defaults.option(name))
    }

    pub fn config_str(&self, name: &str) -> Option<&str> {
        self.config_value(name).and_then(ConfigValue::as_str)
    }

    pub fn config_number(&self, name: &str) -> Option<i64> {
        self.config_value(name).and_then(ConfigValue::as_number)
    }

    pub fn config_bool(&self, name: &str) -> Option<bool> {
        self.config_value(name).and_then(ConfigValue::as_bool)
    }

    /// Format a nested value through its type chain, with this context's
    /// options and no explicit format name.
    pub fn format_value(&self, value: Option<&Value>) -> Result<Text, FormatError> {
        let value_type = value.map_or(ValueType::OBJECT, Value::value_type);
        let nested = FormatterContext {
            format: None,
            ..*self
        };
        self.registry.resolve(None, &value_type).produce(&nested, value)
    }
}
