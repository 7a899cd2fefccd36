use std::io::Write;

use crate::pack::{FORMAT_VERSION, HEADER, PackError, Packable};

/// Writes the primitives of the pack format to a byte sink.
pub struct PackWriter<W: Write> {
    inner: W,
}

impl<W: Write> PackWriter<W> {
    pub fn new(inner: W) -> Self {
        PackWriter { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Write the pack header and format version.
    pub fn write_header(&mut self) -> Result<(), PackError> {
        self.inner.write_all(HEADER)?;
        self.write_u8(FORMAT_VERSION)
    }

    pub fn write_u8(&mut self, byte: u8) -> Result<(), PackError> {
        self.inner.write_all(&[byte])?;
        Ok(())
    }

    /// A big-endian 16-bit count, failing when `count` does not fit.
    pub fn write_count(&mut self, what: &'static str, count: usize) -> Result<(), PackError> {
        let count = u16::try_from(count).map_err(|_| PackError::TooMany { what, count })?;
        self.inner.write_all(&count.to_be_bytes())?;
        Ok(())
    }

    /// An unsigned LEB128 varint.
    pub fn write_varint(&mut self, mut value: u64) -> Result<(), PackError> {
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            self.write_u8(byte)?;
            if value == 0 {
                return Ok(());
            }
        }
    }

    /// A zig-zag encoded signed varint.
    pub fn write_signed(&mut self, value: i64) -> Result<(), PackError> {
        self.write_varint(((value << 1) ^ (value >> 63)) as u64)
    }

    pub fn write_len(&mut self, len: usize) -> Result<(), PackError> {
        self.write_varint(len as u64)
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), PackError> {
        self.write_u8(u8::from(value))
    }

    /// Varint byte length followed by UTF-8.
    pub fn write_str(&mut self, value: &str) -> Result<(), PackError> {
        self.write_len(value.len())?;
        self.inner.write_all(value.as_bytes())?;
        Ok(())
    }

    /// A presence byte, then the string if present.
    pub fn write_option_str(&mut self, value: Option<&str>) -> Result<(), PackError> {
        match value {
            Some(value) => {
                self.write_bool(true)?;
                self.write_str(value)
            }
            None => self.write_bool(false),
        }
    }

    /// Both space flags in one byte.
    pub fn write_spaces(&mut self, space_before: bool, space_after: bool) -> Result<(), PackError> {
        self.write_u8(u8::from(space_before) | u8::from(space_after) << 1)
    }

    pub fn write<T: Packable>(&mut self, value: &T) -> Result<(), PackError> {
        value.pack(self)
    }

    pub fn flush(&mut self) -> Result<(), PackError> {
        self.inner.flush()?;
        Ok(())
    }
}
