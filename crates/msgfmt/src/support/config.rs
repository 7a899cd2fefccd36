use bon::Builder;

use crate::formatter::DEFAULT_CACHE_CAPACITY;
use crate::interpreter::DEFAULT_MAX_DEPTH;
use crate::types::Locale;

/// Settings of a [`MessageSupport`](crate::MessageSupport).
///
/// # Example
///
/// ```
/// use msgfmt::{Locale, SupportConfig};
///
/// let config = SupportConfig::builder()
///     .locale(Locale::parse("de-CH").unwrap())
///     .cache_capacity(32)
///     .build();
///
/// assert_eq!(config.cache_capacity(), 32);
/// assert_eq!(config.max_template_depth(), 64);
/// assert!(config.default_formatters());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct SupportConfig {
    /// Resolved formatter chains kept in the cache; at least 2.
    #[builder(default = DEFAULT_CACHE_CAPACITY)]
    cache_capacity: usize,

    /// Locale used when a message is formatted without one.
    #[builder(default = Locale::root())]
    locale: Locale,

    /// Deepest allowed nesting of template references.
    #[builder(default = DEFAULT_MAX_DEPTH)]
    max_template_depth: usize,

    /// Register the built-in formatter catalog.
    #[builder(default = true)]
    default_formatters: bool,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SupportConfig {
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn max_template_depth(&self) -> usize {
        self.max_template_depth
    }

    pub fn default_formatters(&self) -> bool {
        self.default_formatters
    }
}
