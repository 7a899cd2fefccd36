use std::collections::BTreeMap;

use crate::message::Message;
use crate::support::{MessageSupport, SupportError};
use crate::types::{Locale, Value};

/// Collects parameters and a locale for one message, then formats it.
///
/// Obtained from [`MessageSupport::code`] or [`MessageSupport::message`].
pub struct MessageConfigurer<'s> {
    support: &'s MessageSupport,
    message: &'s Message,
    parameters: BTreeMap<String, Value>,
    locale: Locale,
}

impl<'s> MessageConfigurer<'s> {
    pub(crate) fn new(support: &'s MessageSupport, message: &'s Message) -> Self {
        MessageConfigurer {
            support,
            message,
            parameters: BTreeMap::new(),
            locale: support.config().locale().clone(),
        }
    }

    /// Set a parameter, replacing an earlier value of the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Remove a parameter so it formats as absent.
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        self.parameters.remove(name);
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Remove all parameters.
    #[must_use]
    pub fn clear(mut self) -> Self {
        self.parameters.clear();
        self
    }

    pub fn message(&self) -> &Message {
        self.message
    }

    pub fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.parameters
    }

    pub fn format(&self) -> Result<String, SupportError> {
        self.support
            .format(self.message, &self.parameters, &self.locale)
    }
}
