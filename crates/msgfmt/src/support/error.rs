use thiserror::Error;

use crate::interpreter::FormatError;
use crate::message::ConfigError;
use crate::pack::PackError;

/// An error raised by [`MessageSupport`](crate::MessageSupport).
#[derive(Debug, Error)]
pub enum SupportError {
    /// A different message is already registered under this code.
    #[error("a different message with code '{code}' is already registered")]
    DuplicateMessage { code: String },

    /// A different template is already registered under this name.
    #[error("a different template named '{name}' is already registered")]
    DuplicateTemplate { name: String },

    /// No message is registered under this code.
    #[error("unknown message code '{code}'{}", did_you_mean(suggestions))]
    UnknownCode {
        code: String,
        suggestions: Vec<String>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Pack(#[from] PackError),
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = suggestions.iter().map(|s| format!("'{s}'")).collect();
    format!("; did you mean {}?", quoted.join(", "))
}
