//! Forward-only binary reader for little-endian streams.
//!
//! This module provides [`StreamReader`], a wrapper around any [`Read`] that
//! decodes primitives, strings and bulk arrays while hashing every byte it
//! consumes.

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use zerocopy::FromBytes;

use crate::{ContentHash, Error, Result};

/// Pass-through reader that hashes and counts consumed bytes.
struct HashingRead<R> {
    inner: R,
    hasher: blake3::Hasher,
    consumed: u64,
}

impl<R: Read> Read for HashingRead<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.consumed += n as u64;
        Ok(n)
    }
}

/// A sequential little-endian reader over a byte stream.
///
/// Reads never seek. Counts for arrays and string tables are always supplied
/// by the caller; nothing in the stream is self-describing at this level.
///
/// # Example
///
/// ```
/// use nifheim_common::StreamReader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x02, 0x00, 0x00, 0x00, b'h', b'i'];
/// let mut reader = StreamReader::new(&data[..]);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// assert_eq!(reader.read_sized_string().unwrap(), "hi");
/// assert_eq!(reader.position(), 10);
/// ```
pub struct StreamReader<R> {
    inner: HashingRead<R>,
}

impl<R: Read> StreamReader<R> {
    /// Wrap a byte source.
    pub fn new(inner: R) -> Self {
        Self {
            inner: HashingRead {
                inner,
                hasher: blake3::Hasher::new(),
                consumed: 0,
            },
        }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.inner.consumed
    }

    /// Run a read, translating a short read into [`Error::TruncatedStream`].
    fn with<T>(
        &mut self,
        needed: usize,
        read: impl FnOnce(&mut HashingRead<R>) -> io::Result<T>,
    ) -> Result<T> {
        let position = self.inner.consumed;
        read(&mut self.inner).map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => Error::TruncatedStream { position, needed },
            _ => Error::Io(err),
        })
    }

    /// Read exactly `count` bytes.
    ///
    /// The buffer grows with the data actually present, so a corrupt count
    /// fails with a truncation error instead of a huge allocation.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let position = self.inner.consumed;
        let mut bytes = Vec::new();
        (&mut self.inner)
            .take(count as u64)
            .read_to_end(&mut bytes)?;
        if bytes.len() < count {
            return Err(Error::TruncatedStream {
                position,
                needed: count,
            });
        }
        Ok(bytes)
    }

    /// Consume and discard `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        let position = self.inner.consumed;
        let copied = io::copy(&mut (&mut self.inner).take(count as u64), &mut io::sink())?;
        if copied < count as u64 {
            return Err(Error::TruncatedStream {
                position,
                needed: count,
            });
        }
        Ok(())
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.with(1, |r| r.read_u8())
    }

    /// Read a signed byte.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.with(1, |r| r.read_i8())
    }

    /// Read a one-byte boolean (non-zero = true).
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_u8().map(|b| b != 0)
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.with(2, |r| r.read_u16::<LittleEndian>())
    }

    /// Read a little-endian i16.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        self.with(2, |r| r.read_i16::<LittleEndian>())
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.with(4, |r| r.read_u32::<LittleEndian>())
    }

    /// Read a little-endian i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.with(4, |r| r.read_i32::<LittleEndian>())
    }

    /// Read a little-endian u64.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        self.with(8, |r| r.read_u64::<LittleEndian>())
    }

    /// Read a little-endian f32.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.with(4, |r| r.read_f32::<LittleEndian>())
    }

    /// Read a plain-old-data value.
    ///
    /// The bytes are interpreted in host order, which matches the file on
    /// little-endian targets.
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(&bytes).map_err(|_| Error::TruncatedStream {
            position: self.inner.consumed - size as u64,
            needed: size,
        })
    }

    /// Read `count` plain-old-data values stored back to back.
    pub fn read_array<T: FromBytes>(&mut self, count: usize) -> Result<Vec<T>> {
        let element_size = std::mem::size_of::<T>();
        let total = count
            .checked_mul(element_size)
            .ok_or(Error::ArrayTooLarge {
                count,
                element_size,
            })?;
        let bytes = self.read_bytes(total)?;
        if element_size == 0 {
            return Ok(Vec::new());
        }

        let mut result = Vec::with_capacity(count);
        for chunk in bytes.chunks_exact(element_size) {
            // chunks_exact guarantees the length, so this cannot fail
            if let Ok(item) = T::read_from_bytes(chunk) {
                result.push(item);
            }
        }
        Ok(result)
    }

    /// Read a string prefixed with a u32 byte length.
    ///
    /// Bytes that are not valid UTF-8 (legacy code pages) are replaced.
    pub fn read_sized_string(&mut self) -> Result<String> {
        let length = self.read_u32()? as usize;
        let bytes = self.read_bytes(length)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read `count` u32-length-prefixed strings.
    pub fn read_sized_strings(&mut self, count: usize) -> Result<Vec<String>> {
        let mut strings = Vec::new();
        for _ in 0..count {
            strings.push(self.read_sized_string()?);
        }
        Ok(strings)
    }

    /// Read a string prefixed with a u8 length, cut at the first NUL.
    pub fn read_export_string(&mut self) -> Result<String> {
        let length = self.read_u8()? as usize;
        let bytes = self.read_bytes(length)?;
        let end = memchr::memchr(0, &bytes).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Read a newline-terminated line of at most `limit` bytes.
    ///
    /// The newline is consumed but not returned. Reading stops early at the
    /// limit, leaving the rest of the line in the stream.
    pub fn read_line(&mut self, limit: usize) -> Result<String> {
        let mut line = Vec::new();
        while line.len() < limit {
            let byte = self.read_u8()?;
            if byte == b'\n' {
                break;
            }
            line.push(byte);
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    /// Consume the rest of the stream and return the hash of everything read.
    pub fn finish(mut self) -> Result<ContentHash> {
        io::copy(&mut self.inner, &mut io::sink())?;
        Ok(ContentHash::from(self.inner.hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xFF, 0xFF, // i16: -1
            0x00, 0x00, 0x80, 0x3F, // f32: 1.0
            0x02, // bool
        ];
        let mut reader = StreamReader::new(&data[..]);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_i16().unwrap(), -1);
        assert_eq!(reader.read_f32().unwrap(), 1.0);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.position(), 11);
    }

    #[test]
    fn test_truncated_read_reports_position() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = StreamReader::new(&data[..]);

        assert_eq!(reader.read_u16().unwrap(), 0x0201);
        match reader.read_u32() {
            Err(Error::TruncatedStream { position, needed }) => {
                assert_eq!(position, 2);
                assert_eq!(needed, 4);
            }
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_count_fails_without_allocating() {
        let data = [0xFF, 0xFF, 0xFF, 0x7F, b'a'];
        let mut reader = StreamReader::new(&data[..]);

        let err = reader.read_sized_string().unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_read_array_of_vectors() {
        let mut data = Vec::new();
        for v in [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let mut reader = StreamReader::new(&data[..]);

        let vectors: Vec<Vector3> = reader.read_array(2).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1], Vector3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_export_string_stops_at_nul() {
        let data = [4, b'a', b'b', 0, 0];
        let mut reader = StreamReader::new(&data[..]);

        assert_eq!(reader.read_export_string().unwrap(), "ab");
        assert_eq!(reader.position(), 5);
    }

    #[test]
    fn test_read_line() {
        let data = b"Gamebryo File Format, Version 20.0.0.5\nrest";
        let mut reader = StreamReader::new(&data[..]);

        assert_eq!(
            reader.read_line(128).unwrap(),
            "Gamebryo File Format, Version 20.0.0.5"
        );
        assert_eq!(reader.read_u8().unwrap(), b'r');
    }

    #[test]
    fn test_finish_hashes_whole_input() {
        let data = b"\x01\x00\x00\x00trailing bytes";
        let mut reader = StreamReader::new(&data[..]);
        reader.read_u32().unwrap();

        let hash = reader.finish().unwrap();
        assert_eq!(hash, ContentHash::of(data));
    }

    #[test]
    fn test_skip() {
        let data = [0, 0, 0, 7];
        let mut reader = StreamReader::new(&data[..]);

        reader.skip(3).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert!(reader.skip(1).unwrap_err().is_truncated());
    }
}
