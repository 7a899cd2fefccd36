//! The binary message pack format.
//!
//! A pack starts with the header `%{msg}` and a version byte, followed by
//! a 16-bit big-endian message count, the messages, a 16-bit big-endian
//! template count and the templates as `(name, message)` pairs.
//!
//! Every item is a one-byte tag followed by its payload. Counts and string
//! lengths inside items are unsigned LEB128 varints, signed numbers are
//! zig-zag varints, strings are UTF-8, optional values carry a presence
//! byte and the two space flags of a node share one byte.
//!
//! # Example
//!
//! ```
//! use msgfmt::pack::{PackContents, read_pack, write_pack};
//! use msgfmt::{Message, MessageNode};
//!
//! let hello = Message::with_code("hello", MessageNode::text("Hello")).unwrap();
//!
//! let mut bytes = Vec::new();
//! write_pack(&mut bytes, &[&hello], &[]).unwrap();
//!
//! let PackContents { messages, templates } = read_pack(bytes.as_slice()).unwrap();
//! assert_eq!(messages, vec![hello]);
//! assert!(templates.is_empty());
//! ```

mod codec;
mod error;
mod reader;
mod writer;

use std::io::{Read, Write};

use tracing::debug;

use crate::message::Message;

pub use error::PackError;
pub use reader::PackReader;
pub use writer::PackWriter;

/// Leading bytes of every pack.
pub const HEADER: &[u8; 6] = b"%{msg}";

/// The pack format version written and accepted.
pub const FORMAT_VERSION: u8 = 1;

/// Deepest item nesting a reader accepts.
pub const MAX_NESTING: usize = 128;

/// A value with an exact binary encoding.
///
/// `unpack` is the inverse of `pack`: reading back what was written yields
/// a structurally equal value.
pub trait Packable: Sized {
    fn pack<W: Write>(&self, writer: &mut PackWriter<W>) -> Result<(), PackError>;

    fn unpack<R: Read>(reader: &mut PackReader<R>) -> Result<Self, PackError>;
}

/// Everything read from one pack stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackContents {
    pub messages: Vec<Message>,
    pub templates: Vec<(String, Message)>,
}

/// Write a complete pack.
pub fn write_pack<W: Write>(
    writer: W,
    messages: &[&Message],
    templates: &[(&str, &Message)],
) -> Result<(), PackError> {
    let mut writer = PackWriter::new(writer);
    writer.write_header()?;

    writer.write_count("messages", messages.len())?;
    for message in messages {
        writer.write(*message)?;
    }

    writer.write_count("templates", templates.len())?;
    for (name, template) in templates {
        writer.write_str(name)?;
        writer.write(*template)?;
    }

    debug!(
        messages = messages.len(),
        templates = templates.len(),
        "wrote message pack"
    );
    writer.flush()
}

/// Read a complete pack. Fails without partial results on any error.
pub fn read_pack<R: Read>(reader: R) -> Result<PackContents, PackError> {
    let mut reader = PackReader::new(reader);
    reader.read_header()?;

    let mut contents = PackContents::default();
    for _ in 0..reader.read_count()? {
        contents.messages.push(reader.read()?);
    }
    for _ in 0..reader.read_count()? {
        let name = reader.read_string()?;
        contents.templates.push((name, reader.read()?));
    }

    debug!(
        messages = contents.messages.len(),
        templates = contents.templates.len(),
        "read message pack"
    );
    Ok(contents)
}
