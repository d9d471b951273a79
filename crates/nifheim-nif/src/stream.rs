//! Record-level reading on top of [`StreamReader`].
//!
//! [`NifStream`] knows the file's version numbers and string pool, so record
//! bodies can ask for "a string" or "a boolean" and get the layout that the
//! file's era uses.

use std::io::Read;

use nifheim_common::StreamReader;
use zerocopy::FromBytes;

use crate::link::{LinkTarget, RecordLink};
use crate::{DecodeResult, ErrorKind, NifVersion};

/// Index into the string pool meaning "no string".
pub const NO_STRING: u32 = u32::MAX;

/// The reader handed to every record's `read`.
pub struct NifStream<'a> {
    reader: StreamReader<&'a mut dyn Read>,
    version: NifVersion,
    user_version: u32,
    beth_version: u32,
    strings: Vec<String>,
    has_string_table: bool,
    record_index: usize,
    record_name: String,
}

impl<'a> NifStream<'a> {
    pub(crate) fn new(
        reader: StreamReader<&'a mut dyn Read>,
        version: NifVersion,
        user_version: u32,
        beth_version: u32,
        strings: Vec<String>,
        has_string_table: bool,
    ) -> Self {
        Self {
            reader,
            version,
            user_version,
            beth_version,
            strings,
            has_string_table,
            record_index: 0,
            record_name: String::new(),
        }
    }

    /// Give back the underlying reader and the string pool.
    pub(crate) fn into_parts(self) -> (StreamReader<&'a mut dyn Read>, Vec<String>) {
        (self.reader, self.strings)
    }

    /// Mark which record subsequent reads belong to, for error context.
    pub(crate) fn begin_record(&mut self, index: usize, name: &str) {
        self.record_index = index;
        self.record_name.clear();
        self.record_name.push_str(name);
    }

    /// The file's packed version.
    #[inline]
    pub fn version(&self) -> NifVersion {
        self.version
    }

    /// The vendor user-version (0 when absent).
    #[inline]
    pub fn user_version(&self) -> u32 {
        self.user_version
    }

    /// The Bethesda stream version (0 when absent).
    #[inline]
    pub fn beth_version(&self) -> u32 {
        self.beth_version
    }

    /// True when the file version is at least the given one.
    #[inline]
    pub fn since(&self, major: u8, minor: u8, patch: u8, revision: u8) -> bool {
        self.version >= NifVersion::new(major, minor, patch, revision)
    }

    /// True when the file version is at most the given one.
    #[inline]
    pub fn until(&self, major: u8, minor: u8, patch: u8, revision: u8) -> bool {
        self.version <= NifVersion::new(major, minor, patch, revision)
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    /// Build an error describing a malformed field in the current record.
    pub fn invalid(&self, reason: impl Into<String>) -> ErrorKind {
        ErrorKind::InvalidRecord {
            index: self.record_index,
            name: self.record_name.clone(),
            reason: reason.into(),
        }
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.reader.read_u8()?)
    }

    pub fn read_i8(&mut self) -> DecodeResult<i8> {
        Ok(self.reader.read_i8()?)
    }

    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        Ok(self.reader.read_u16()?)
    }

    pub fn read_i16(&mut self) -> DecodeResult<i16> {
        Ok(self.reader.read_i16()?)
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        Ok(self.reader.read_u32()?)
    }

    pub fn read_i32(&mut self) -> DecodeResult<i32> {
        Ok(self.reader.read_i32()?)
    }

    pub fn read_u64(&mut self) -> DecodeResult<u64> {
        Ok(self.reader.read_u64()?)
    }

    pub fn read_f32(&mut self) -> DecodeResult<f32> {
        Ok(self.reader.read_f32()?)
    }

    /// Read a one-byte boolean regardless of version.
    pub fn read_byte_bool(&mut self) -> DecodeResult<bool> {
        Ok(self.reader.read_bool()?)
    }

    /// Read a boolean in the file's native width.
    ///
    /// Files older than 4.1.0.0 store booleans as 32-bit integers.
    pub fn read_bool(&mut self) -> DecodeResult<bool> {
        if self.version < NifVersion::new(4, 1, 0, 0) {
            Ok(self.read_i32()? != 0)
        } else {
            self.read_byte_bool()
        }
    }

    /// Read a plain-old-data value such as a vector or matrix.
    pub fn read<T: FromBytes>(&mut self) -> DecodeResult<T> {
        Ok(self.reader.read_struct()?)
    }

    /// Read `count` plain-old-data values.
    pub fn read_array<T: FromBytes>(&mut self, count: usize) -> DecodeResult<Vec<T>> {
        Ok(self.reader.read_array(count)?)
    }

    /// Read raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> DecodeResult<Vec<u8>> {
        Ok(self.reader.read_bytes(count)?)
    }

    /// Skip bytes that carry nothing of interest.
    pub fn skip(&mut self, count: usize) -> DecodeResult<()> {
        Ok(self.reader.skip(count)?)
    }

    /// Read a u32-length-prefixed string, ignoring the string pool.
    pub fn read_sized_string(&mut self) -> DecodeResult<String> {
        Ok(self.reader.read_sized_string()?)
    }

    /// Read a string: a pool index on 20.1.0.1+, inline before that.
    pub fn read_string(&mut self) -> DecodeResult<String> {
        if !self.has_string_table {
            return self.read_sized_string();
        }
        let index = self.read_u32()?;
        self.pool_string(index).map(str::to_owned)
    }

    /// Look up a pool string by index.
    pub fn pool_string(&self, index: u32) -> DecodeResult<&str> {
        if index == NO_STRING {
            return Ok("");
        }
        self.strings
            .get(index as usize)
            .map(String::as_str)
            .ok_or(ErrorKind::StringIndexOutOfRange {
                index,
                count: self.strings.len(),
            })
    }

    /// Read `count` strings.
    pub fn read_strings(&mut self, count: usize) -> DecodeResult<Vec<String>> {
        let mut strings = Vec::new();
        for _ in 0..count {
            strings.push(self.read_string()?);
        }
        Ok(strings)
    }

    /// Read a link to another record.
    pub fn read_link<T: LinkTarget>(&mut self) -> DecodeResult<RecordLink<T>> {
        Ok(RecordLink::new(self.read_i32()?))
    }

    /// Read a u32 count followed by that many links.
    pub fn read_link_list<T: LinkTarget>(&mut self) -> DecodeResult<Vec<RecordLink<T>>> {
        let count = self.read_u32()? as usize;
        self.read_links(count)
    }

    /// Read `count` links.
    pub fn read_links<T: LinkTarget>(&mut self, count: usize) -> DecodeResult<Vec<RecordLink<T>>> {
        let indices: Vec<i32> = self.read_array(count)?;
        Ok(indices.into_iter().map(RecordLink::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream<'a>(
        source: &'a mut &[u8],
        version: NifVersion,
        strings: Vec<String>,
    ) -> NifStream<'a> {
        let has_string_table = !strings.is_empty();
        NifStream::new(
            StreamReader::new(source as &mut dyn Read),
            version,
            0,
            0,
            strings,
            has_string_table,
        )
    }

    #[test]
    fn test_bool_width_follows_version() {
        let data = [1u8, 0, 0, 0, 1];
        let mut source = &data[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND, Vec::new());
        assert!(nif.read_bool().unwrap());
        assert_eq!(nif.position(), 4);

        let mut source = &data[..];
        let mut nif = stream(&mut source, NifVersion::OBLIVION, Vec::new());
        assert!(nif.read_bool().unwrap());
        assert_eq!(nif.position(), 1);
    }

    #[test]
    fn test_string_pool_lookup() {
        let data = [1u8, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 9, 0, 0, 0];
        let mut source = &data[..];
        let strings = vec!["foo".to_string(), "bar".to_string()];
        let mut nif = stream(&mut source, NifVersion::BETHESDA, strings);

        assert_eq!(nif.read_string().unwrap(), "bar");
        assert_eq!(nif.read_string().unwrap(), "");
        assert!(matches!(
            nif.read_string(),
            Err(ErrorKind::StringIndexOutOfRange { index: 9, count: 2 })
        ));
    }

    #[test]
    fn test_inline_strings_before_pool_era() {
        let data = [3u8, 0, 0, 0, b'a', b'b', b'c'];
        let mut source = &data[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND, Vec::new());
        assert_eq!(nif.read_string().unwrap(), "abc");
    }

    #[test]
    fn test_link_list() {
        let data = [2u8, 0, 0, 0, 5, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut source = &data[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND, Vec::new());
        let links: Vec<RecordLink<crate::link::AnyRecord>> = nif.read_link_list().unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].index(), 5);
        assert!(links[1].is_empty());
    }

    #[test]
    fn test_invalid_carries_record_context() {
        let data: [u8; 0] = [];
        let mut source = &data[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND, Vec::new());
        nif.begin_record(4, "NiNode");
        match nif.invalid("bad") {
            ErrorKind::InvalidRecord { index, name, reason } => {
                assert_eq!(index, 4);
                assert_eq!(name, "NiNode");
                assert_eq!(reason, "bad");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
