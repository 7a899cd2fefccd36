//! Errors raised while building the message model.

use thiserror::Error;

use crate::cache::CacheError;
use crate::message::{CompareType, KeyType};

/// A fatal configuration error.
///
/// These are raised when a message, parameter configuration or registry
/// is built with values that can never be formatted correctly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A message code was empty.
    #[error("message code must not be empty")]
    EmptyCode,

    /// A parameter node was created without a name.
    #[error("parameter name must not be empty")]
    EmptyParameterName,

    /// A named configuration option had an empty name.
    #[error("parameter option name must not be empty")]
    EmptyOptionName,

    /// A template reference or registration had an empty name.
    #[error("template name must not be empty")]
    EmptyTemplateName,

    /// A named formatter reported an empty name.
    #[error("formatter name must not be empty")]
    EmptyFormatterName,

    /// A compound node was created without children.
    #[error("compound message must contain at least one part")]
    EmptyCompound,

    /// A locale bundle was created without any locale.
    #[error("message bundle {} must contain at least one locale", code.as_deref().unwrap_or("<anonymous>"))]
    EmptyBundle { code: Option<String> },

    /// A key type was combined with a comparison it does not support.
    #[error("{key_type} keys do not support the '{compare}' comparison")]
    InvalidCompareType {
        key_type: KeyType,
        compare: CompareType,
    },

    /// A locale tag could not be parsed.
    #[error("invalid locale tag '{tag}'")]
    InvalidLocale { tag: String },

    /// The formatter resolution cache was misconfigured.
    #[error(transparent)]
    Cache(#[from] CacheError),
}
