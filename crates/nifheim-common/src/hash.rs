//! Content hashing of source bytes.
//!
//! Every byte pulled through a [`StreamReader`](crate::StreamReader) is fed to a
//! BLAKE3 hasher. The resulting digest identifies the raw file contents and is
//! meant to be used as a cache key by consumers.

use std::fmt;

/// A 32-byte BLAKE3 digest of a complete input stream.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContentHash {
    bytes: [u8; 32],
}

impl ContentHash {
    /// Size of the digest in bytes.
    pub const LEN: usize = 32;

    /// Create a hash from raw digest bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Hash a complete byte slice in one go.
    pub fn of(data: &[u8]) -> Self {
        Self::from(blake3::hash(data))
    }

    /// Get the raw digest bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl From<blake3::Hash> for ContentHash {
    fn from(hash: blake3::Hash) -> Self {
        Self {
            bytes: *hash.as_bytes(),
        }
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.bytes {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ContentHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_lowercase_hex() {
        let hash = ContentHash::from_bytes([0xAB; 32]);
        let text = hash.to_string();
        assert_eq!(text.len(), 64);
        assert!(text.chars().all(|c| c == 'a' || c == 'b'));
    }

    #[test]
    fn test_of_matches_blake3() {
        let hash = ContentHash::of(b"hello");
        assert_eq!(hash.as_bytes(), blake3::hash(b"hello").as_bytes());
    }

    #[test]
    fn test_different_inputs_differ() {
        assert_ne!(ContentHash::of(b"a"), ContentHash::of(b"b"));
    }
}
