//! Errors raised while formatting a message.

use thiserror::Error;

use crate::types::ValueType;

/// An error that occurred while evaluating a message tree.
///
/// Failures inside a parameter or template are wrapped with the name of
/// the enclosing node, so the message of an error raised deep in a
/// template reads from the outermost node inwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Formatting a parameter failed.
    #[error("failed to format parameter '{name}': {source}")]
    Parameter {
        name: String,
        #[source]
        source: Box<FormatError>,
    },

    /// Formatting a referenced template failed.
    #[error("failed to format template '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: Box<FormatError>,
    },

    /// Every formatter of a chain declined the value.
    #[error("no formatter produced text for type '{value_type}'{}", format.as_ref().map(|name| format!(" (format '{name}')")).unwrap_or_default())]
    ChainExhausted {
        value_type: ValueType,
        format: Option<String>,
    },

    /// A locale bundle without locales was evaluated.
    #[error("message bundle {} has no locales", code.as_deref().unwrap_or("<anonymous>"))]
    EmptyBundle { code: Option<String> },

    /// A template refers back to itself.
    #[error("cyclic template reference: {}", chain.join(" -> "))]
    CyclicTemplate { chain: Vec<String> },

    /// Templates were nested deeper than allowed.
    #[error("template nesting exceeds the maximum depth of {max_depth}")]
    MaxDepthExceeded { max_depth: usize },

    /// A formatter reported a failure of its own.
    #[error("formatter '{formatter}' failed: {message}")]
    Failed { formatter: String, message: String },
}

impl FormatError {
    /// The innermost error, skipping parameter and template wrappers.
    pub fn root_cause(&self) -> &FormatError {
        match self {
            FormatError::Parameter { source, .. } | FormatError::Template { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}
