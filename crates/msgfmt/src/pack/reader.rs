use std::io::{ErrorKind, Read};

use crate::pack::{FORMAT_VERSION, HEADER, MAX_NESTING, PackError, Packable};

const MAX_VARINT_BYTES: usize = 10;

/// Reads the primitives of the pack format from a byte source.
///
/// The reader tracks the nesting depth of the items it decodes and rejects
/// input nested deeper than [`MAX_NESTING`] levels.
pub struct PackReader<R: Read> {
    inner: R,
    depth: usize,
}

impl<R: Read> PackReader<R> {
    pub fn new(inner: R) -> Self {
        PackReader { inner, depth: 0 }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read and check the pack header and format version.
    pub fn read_header(&mut self) -> Result<(), PackError> {
        let mut header = *HEADER;
        self.read_exact(&mut header).map_err(|err| match err {
            PackError::Truncated => PackError::BadHeader,
            other => other,
        })?;
        if &header != HEADER {
            return Err(PackError::BadHeader);
        }
        match self.read_u8()? {
            FORMAT_VERSION => Ok(()),
            version => Err(PackError::UnsupportedVersion { version }),
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), PackError> {
        self.inner.read_exact(buf).map_err(|err| match err.kind() {
            ErrorKind::UnexpectedEof => PackError::Truncated,
            _ => PackError::Io(err),
        })
    }

    pub fn read_u8(&mut self) -> Result<u8, PackError> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    /// A big-endian 16-bit count.
    pub fn read_count(&mut self) -> Result<usize, PackError> {
        let mut bytes = [0u8; 2];
        self.read_exact(&mut bytes)?;
        Ok(usize::from(u16::from_be_bytes(bytes)))
    }

    pub fn read_varint(&mut self) -> Result<u64, PackError> {
        let mut result = 0u64;
        for index in 0..MAX_VARINT_BYTES {
            let byte = self.read_u8()?;
            let shift = 7 * index;
            let data = u64::from(byte & 0x7F);
            if index == MAX_VARINT_BYTES - 1 && data > 1 {
                return Err(PackError::VarintOverflow);
            }
            result |= data << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(PackError::VarintOverflow)
    }

    pub fn read_signed(&mut self) -> Result<i64, PackError> {
        let unsigned = self.read_varint()?;
        Ok(((unsigned >> 1) as i64) ^ -((unsigned & 1) as i64))
    }

    pub fn read_len(&mut self) -> Result<usize, PackError> {
        let len = self.read_varint()?;
        usize::try_from(len).map_err(|_| PackError::Truncated)
    }

    pub fn read_bool(&mut self) -> Result<bool, PackError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            tag => Err(PackError::UnknownTag { kind: "bool", tag }),
        }
    }

    pub fn read_string(&mut self) -> Result<String, PackError> {
        let len = self.read_len()?;
        // Bounded by the bytes actually present.
        let mut bytes = Vec::new();
        (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut bytes)?;
        if bytes.len() != len {
            return Err(PackError::Truncated);
        }
        String::from_utf8(bytes).map_err(|_| PackError::InvalidUtf8)
    }

    pub fn read_option_string(&mut self) -> Result<Option<String>, PackError> {
        if self.read_bool()? {
            self.read_string().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Both space flags from one byte.
    pub fn read_spaces(&mut self) -> Result<(bool, bool), PackError> {
        match self.read_u8()? {
            flags @ 0..=3 => Ok((flags & 1 != 0, flags & 2 != 0)),
            tag => Err(PackError::UnknownTag { kind: "space flags", tag }),
        }
    }

    pub fn read<T: Packable>(&mut self) -> Result<T, PackError> {
        T::unpack(self)
    }

    /// Run `f` one nesting level deeper.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, PackError>,
    ) -> Result<T, PackError> {
        if self.depth >= MAX_NESTING {
            return Err(PackError::NestingTooDeep { max: MAX_NESTING });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
