//! Packed format versions and the capability flags derived from them.

use std::fmt;
use std::str::FromStr;

/// A `major.minor.patch.revision` version packed into one comparable integer.
///
/// Each component occupies one byte, most significant first, so ordinary
/// integer comparison orders versions correctly.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NifVersion(pub u32);

impl NifVersion {
    /// NetImmerse 4.0.0.0, an older but practically identical Morrowind-era revision.
    pub const NETIMMERSE_4_0_0_0: Self = Self::new(4, 0, 0, 0);
    /// Morrowind.
    pub const MORROWIND: Self = Self::new(4, 0, 0, 2);
    /// Early Oblivion files.
    pub const OBLIVION_OLD: Self = Self::new(10, 0, 1, 2);
    /// Oblivion.
    pub const OBLIVION: Self = Self::new(20, 0, 0, 5);
    /// Fallout 3 and later Bethesda titles.
    pub const BETHESDA: Self = Self::new(20, 2, 0, 7);

    /// Versions that load without the permissive toggle.
    pub const SUPPORTED: [Self; 2] = [Self::NETIMMERSE_4_0_0_0, Self::MORROWIND];

    /// Pack four components into a version.
    #[inline]
    pub const fn new(major: u8, minor: u8, patch: u8, revision: u8) -> Self {
        Self(
            (major as u32) << 24 | (minor as u32) << 16 | (patch as u32) << 8 | revision as u32,
        )
    }

    /// Get the packed integer.
    #[inline]
    pub const fn packed(self) -> u32 {
        self.0
    }

    /// Split into `[major, minor, patch, revision]`.
    #[inline]
    pub const fn components(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Check if this version is in the supported set.
    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }
}

impl fmt::Display for NifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch, revision] = self.components();
        write!(f, "{}.{}.{}.{}", major, minor, patch, revision)
    }
}

impl fmt::Debug for NifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NifVersion({})", self)
    }
}

/// Error returned when parsing a dotted version string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version string: {0:?}")]
pub struct ParseVersionError(String);

impl FromStr for NifVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = [0u8; 4];
        let mut count = 0;
        for part in s.split('.') {
            if count == 4 {
                return Err(ParseVersionError(s.to_string()));
            }
            parts[count] = part
                .trim()
                .parse()
                .map_err(|_| ParseVersionError(s.to_string()))?;
            count += 1;
        }
        if count != 4 {
            return Err(ParseVersionError(s.to_string()));
        }
        Ok(Self::new(parts[0], parts[1], parts[2], parts[3]))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NifVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Bethesda stream versions found in the vendor sub-header.
pub mod beth {
    /// Fallout 3 / New Vegas.
    pub const FO3: u32 = 34;
    /// Skyrim.
    pub const SKY: u32 = 83;
    /// Skyrim Special Edition.
    pub const SSE: u32 = 100;
    /// Fallout 4.
    pub const FO4: u32 = 130;
    /// Fallout 76.
    pub const F76: u32 = 155;
    /// Starfield.
    pub const STF: u32 = 172;
}

/// Optional header sections and layout variants, derived from the version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// An explicit endianness byte follows the version.
    pub has_endianness: bool,
    /// A vendor user-version field follows.
    pub has_user_version: bool,
    /// Record type names live in one table instead of before each record.
    pub has_type_table: bool,
    /// The type table holds hashes instead of names.
    pub has_type_hashes: bool,
    /// Each record's byte size is listed in the header.
    pub has_record_sizes: bool,
    /// Strings are stored once in a global pool and referenced by index.
    pub has_string_table: bool,
    /// A groups section follows the string table.
    pub has_groups: bool,
    /// Each record is preceded by a 4-byte separator.
    pub has_record_separators: bool,
}

impl Capabilities {
    /// Derive the flags for a version.
    pub fn from_version(version: NifVersion) -> Self {
        Self {
            has_endianness: version >= NifVersion::new(20, 0, 0, 4),
            has_user_version: version >= NifVersion::new(10, 0, 1, 8),
            has_type_table: version >= NifVersion::new(5, 0, 0, 1),
            has_type_hashes: version == NifVersion::new(20, 3, 1, 2),
            has_record_sizes: version >= NifVersion::new(20, 2, 0, 5),
            has_string_table: version >= NifVersion::new(20, 1, 0, 1),
            has_groups: version >= NifVersion::new(5, 0, 0, 6),
            has_record_separators: version >= NifVersion::new(10, 0, 0, 0)
                && version < NifVersion::new(10, 2, 0, 0),
        }
    }

    /// Check whether the Bethesda stream sub-header is present.
    pub fn has_beth_header(version: NifVersion, user_version: u32) -> bool {
        if version == NifVersion::OBLIVION_OLD {
            return true;
        }
        user_version >= 3
            && version >= NifVersion::new(10, 1, 0, 0)
            && (version <= NifVersion::OBLIVION || version == NifVersion::BETHESDA)
            && (user_version <= 11 || version >= NifVersion::OBLIVION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_display() {
        let version = NifVersion::new(20, 2, 0, 7);
        assert_eq!(version.packed(), 0x14020007);
        assert_eq!(version.to_string(), "20.2.0.7");
        assert_eq!(NifVersion::MORROWIND.packed(), 0x04000002);
    }

    #[test]
    fn test_parse_roundtrip() {
        let version: NifVersion = "10.0.1.2".parse().unwrap();
        assert_eq!(version, NifVersion::OBLIVION_OLD);
        assert!("10.0.1".parse::<NifVersion>().is_err());
        assert!("10.0.1.2.3".parse::<NifVersion>().is_err());
        assert!("10.0.x.2".parse::<NifVersion>().is_err());
        assert!("256.0.0.0".parse::<NifVersion>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(NifVersion::MORROWIND < NifVersion::OBLIVION_OLD);
        assert!(NifVersion::OBLIVION < NifVersion::BETHESDA);
    }

    #[test]
    fn test_morrowind_has_no_optional_sections() {
        let caps = Capabilities::from_version(NifVersion::MORROWIND);
        assert_eq!(caps, Capabilities::default());
        assert!(NifVersion::MORROWIND.is_supported());
        assert!(!NifVersion::OBLIVION.is_supported());
    }

    #[test]
    fn test_string_table_threshold() {
        let below = Capabilities::from_version(NifVersion::new(20, 1, 0, 0));
        let at = Capabilities::from_version(NifVersion::new(20, 1, 0, 1));
        assert!(!below.has_string_table);
        assert!(at.has_string_table);
    }

    #[test]
    fn test_record_separator_window() {
        assert!(!Capabilities::from_version(NifVersion::new(5, 0, 0, 6)).has_record_separators);
        assert!(Capabilities::from_version(NifVersion::new(10, 0, 0, 0)).has_record_separators);
        assert!(Capabilities::from_version(NifVersion::OBLIVION_OLD).has_record_separators);
        assert!(!Capabilities::from_version(NifVersion::new(10, 2, 0, 0)).has_record_separators);
    }

    #[test]
    fn test_type_hashes_only_for_one_version() {
        assert!(Capabilities::from_version(NifVersion::new(20, 3, 1, 2)).has_type_hashes);
        assert!(!Capabilities::from_version(NifVersion::new(20, 3, 1, 3)).has_type_hashes);
    }

    #[test]
    fn test_beth_header_conditions() {
        assert!(Capabilities::has_beth_header(NifVersion::OBLIVION_OLD, 0));
        assert!(Capabilities::has_beth_header(NifVersion::OBLIVION, 11));
        assert!(Capabilities::has_beth_header(NifVersion::BETHESDA, 12));
        assert!(Capabilities::has_beth_header(NifVersion::new(10, 1, 0, 106), 10));
        assert!(!Capabilities::has_beth_header(NifVersion::new(10, 1, 0, 106), 12));
        assert!(!Capabilities::has_beth_header(NifVersion::OBLIVION, 2));
        assert!(!Capabilities::has_beth_header(NifVersion::new(20, 2, 0, 8), 12));
        assert!(!Capabilities::has_beth_header(NifVersion::MORROWIND, 11));
    }
}
