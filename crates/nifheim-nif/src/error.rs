//! Error and warning types for NIF decoding.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::NifVersion;

/// A fatal decode failure, tagged with the file it occurred in.
#[derive(Debug, Error)]
#[error("{kind} (file: {})", .path.display())]
pub struct Error {
    path: PathBuf,
    kind: ErrorKind,
}

impl Error {
    pub(crate) fn new(path: impl Into<PathBuf>, kind: ErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// The source path given to the decoder.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Take the failure description, dropping the path.
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }
}

/// The reasons a decode can fail.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The banner line is not a known NIF banner.
    #[error("invalid NIF header: {banner:?}")]
    InvalidHeader { banner: String },

    /// The version is not in the supported set and permissive loading is off.
    #[error("unsupported NIF version: {0}")]
    UnsupportedVersion(NifVersion),

    /// The endianness byte marks a big-endian file.
    #[error("big endian NIF files are unsupported")]
    UnsupportedEndianness,

    /// The type table stores name hashes (20.3.1.2).
    #[error("hashed record types are unsupported")]
    HashedRecordTypesUnsupported,

    /// A record's type name is empty.
    #[error("record type is blank (index {index})")]
    BlankRecordType { index: usize },

    /// A record's type name is not registered.
    #[error("unknown record type {name:?} (index {index})")]
    UnknownRecordType { name: String, index: usize },

    /// A record's entry in the type table points past the table.
    #[error("record type index {type_index} out of range for record {index} (table size: {count})")]
    InvalidRecordTypeIndex {
        index: usize,
        type_index: u16,
        count: usize,
    },

    /// A record refers to a string pool entry that does not exist.
    #[error("string index {index} out of range (string table size: {count})")]
    StringIndexOutOfRange { index: u32, count: usize },

    /// A link points past the end of the record list.
    #[error("record {from} links to record {index}, but there are only {count} records")]
    InvalidLink { from: usize, index: i32, count: usize },

    /// A record's contents are inconsistent.
    #[error("invalid {name} record (index {index}): {reason}")]
    InvalidRecord {
        index: usize,
        name: String,
        reason: String,
    },

    /// Stream-level failure, including truncation.
    #[error("{0}")]
    Stream(#[from] nifheim_common::Error),

    /// The file could not be opened or mapped.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ErrorKind {
    /// Check whether the stream ended early.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Stream(err) if err.is_truncated())
    }
}

/// Result type for public NIF operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type used while decoding, before the path is attached.
pub type DecodeResult<T> = std::result::Result<T, ErrorKind>;

/// A non-fatal problem noticed while decoding.
///
/// Warnings are logged as they happen and kept on the decoded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The file's version is unsupported but permissive loading is on.
    UnsupportedVersion(NifVersion),
    /// A record separator held a non-zero value.
    NonZeroSeparator {
        index: usize,
        name: String,
        value: i32,
    },
    /// A root entry does not point at a record; it was stored as empty.
    RootOutOfRange { root: usize, index: i32 },
    /// A link points at a record of the wrong category; typed access yields nothing.
    LinkTypeMismatch {
        from: usize,
        index: usize,
        expected: &'static str,
        found: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported NIF version {}, proceed with caution", version)
            }
            Self::NonZeroSeparator { index, name, value } => write!(
                f,
                "record of type {} (index {}) is preceded by a non-zero separator {}",
                name, index, value
            ),
            Self::RootOutOfRange { root, index } => {
                write!(f, "root {} does not point to a record: index {}", root + 1, index)
            }
            Self::LinkTypeMismatch {
                from,
                index,
                expected,
                found,
            } => write!(
                f,
                "record {} expects {} at index {}, found {}",
                from, expected, index, found
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_path() {
        let err = Error::new(
            "meshes/test.nif",
            ErrorKind::UnknownRecordType {
                name: "NiFoo".into(),
                index: 3,
            },
        );
        let text = err.to_string();
        assert!(text.contains("NiFoo"));
        assert!(text.contains("index 3"));
        assert!(text.contains("meshes/test.nif"));
    }

    #[test]
    fn test_truncation_is_detected_through_wrapping() {
        let kind = ErrorKind::from(nifheim_common::Error::TruncatedStream {
            position: 10,
            needed: 4,
        });
        assert!(kind.is_truncated());
        assert!(!ErrorKind::UnsupportedEndianness.is_truncated());
    }

    #[test]
    fn test_root_warning_is_one_based() {
        let warning = Warning::RootOutOfRange { root: 0, index: 7 };
        assert_eq!(warning.to_string(), "root 1 does not point to a record: index 7");
    }
}
