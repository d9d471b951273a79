//! Byte fixtures for unit tests.

use std::io::Read;

use nifheim_common::StreamReader;

use crate::version::Capabilities;
use crate::{NifStream, NifVersion};

/// A stream over `source` with no vendor versions and an empty string pool.
pub fn stream<'a>(source: &'a mut &[u8], version: NifVersion) -> NifStream<'a> {
    stream_with(source, version, 0, 0, Vec::new())
}

/// A stream with explicit vendor versions and string pool.
pub fn stream_with<'a>(
    source: &'a mut &[u8],
    version: NifVersion,
    user_version: u32,
    beth_version: u32,
    strings: Vec<String>,
) -> NifStream<'a> {
    let has_string_table = Capabilities::from_version(version).has_string_table;
    NifStream::new(
        StreamReader::new(source as &mut dyn Read),
        version,
        user_version,
        beth_version,
        strings,
        has_string_table,
    )
}

/// Little-endian byte builder.
#[derive(Debug, Default)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    pub fn i8(self, value: i8) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u16(self, value: u16) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn i16(self, value: i16) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u32(self, value: u32) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn i32(self, value: i32) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u64(self, value: u64) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn f32(self, value: f32) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn bytes(mut self, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(data);
        self
    }

    /// A u32 length followed by the string bytes.
    pub fn sized_string(self, value: &str) -> Self {
        self.u32(value.len() as u32).bytes(value.as_bytes())
    }

    /// A u8 length, the string bytes and a trailing NUL.
    pub fn export_string(self, value: &str) -> Self {
        self.u8(value.len() as u8 + 1).bytes(value.as_bytes()).u8(0)
    }

    /// The banner line, newline included.
    pub fn line(self, value: &str) -> Self {
        self.bytes(value.as_bytes()).u8(b'\n')
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}
