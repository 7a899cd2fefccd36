use std::io;

use thiserror::Error;

use crate::message::ConfigError;

/// An error raised while writing or reading a message pack.
///
/// Any decoding error aborts the whole stream; nothing read from a failed
/// stream is registered.
#[derive(Debug, Error)]
pub enum PackError {
    /// The underlying stream failed.
    #[error("pack I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The stream ended in the middle of an item.
    #[error("unexpected end of pack data")]
    Truncated,

    /// The stream does not start with the pack header.
    #[error("not a message pack (missing '%{{msg}}' header)")]
    BadHeader,

    #[error("unsupported pack version {version}")]
    UnsupportedVersion { version: u8 },

    /// An item tag is not known for its position.
    #[error("unknown {kind} tag {tag:#04x}")]
    UnknownTag { kind: &'static str, tag: u8 },

    #[error("pack string is not valid UTF-8")]
    InvalidUtf8,

    /// A variable-length integer did not end within 10 bytes.
    #[error("variable-length integer is too long")]
    VarintOverflow,

    /// A count does not fit the field it is written to.
    #[error("too many {what} to pack: {count}")]
    TooMany { what: &'static str, count: usize },

    /// Nodes are nested deeper than the reader accepts.
    #[error("pack nesting exceeds {max} levels")]
    NestingTooDeep { max: usize },

    /// A decoded item violates a message model invariant.
    #[error("invalid pack content: {0}")]
    Invalid(#[from] ConfigError),
}
