//! The file header: banner, versions and the tables that precede the records.

use std::io::Read;
use std::path::Path;

use nifheim_common::StreamReader;
use tracing::warn;

use crate::error::Warning;
use crate::settings::LoadOptions;
use crate::version::Capabilities;
use crate::{DecodeResult, ErrorKind, NifVersion};

/// Banners a file may start with.
pub const BANNERS: [&str; 2] = ["NetImmerse File Format", "Gamebryo File Format"];

/// Upper bound on the banner line length.
const MAX_BANNER_LENGTH: usize = 128;

/// Everything read before the first record.
#[derive(Debug, Clone, Default)]
pub struct Header {
    pub banner: String,
    pub version: NifVersion,
    pub user_version: u32,
    pub beth_version: u32,
    pub record_count: usize,
    /// Type names, when the file has a type table.
    pub type_names: Vec<String>,
    /// Index into `type_names` for each record.
    pub type_indices: Vec<u16>,
    pub strings: Vec<String>,
    pub capabilities: Capabilities,
}

impl Header {
    /// Read the header, checking banner, version and endianness.
    ///
    /// An unsupported version is fatal unless `options` allow it, in which
    /// case a warning is added to `warnings`.
    pub(crate) fn read(
        reader: &mut StreamReader<&mut dyn Read>,
        path: &Path,
        options: &LoadOptions,
        warnings: &mut Vec<Warning>,
    ) -> DecodeResult<Self> {
        let banner = reader.read_line(MAX_BANNER_LENGTH)?;
        if !BANNERS.iter().any(|known| banner.starts_with(known)) {
            return Err(ErrorKind::InvalidHeader { banner });
        }

        let version = NifVersion(reader.read_u32()?);
        let capabilities = Capabilities::from_version(version);
        if capabilities.has_endianness && reader.read_u8()? == 0 {
            return Err(ErrorKind::UnsupportedEndianness);
        }
        if !version.is_supported() {
            if !options.load_unsupported {
                return Err(ErrorKind::UnsupportedVersion(version));
            }
            let warning = Warning::UnsupportedVersion(version);
            warn!("{} ({})", warning, path.display());
            warnings.push(warning);
        }

        let mut header = Self {
            banner,
            version,
            capabilities,
            ..Self::default()
        };
        if capabilities.has_user_version {
            header.user_version = reader.read_u32()?;
        }
        header.record_count = reader.read_u32()? as usize;

        if Capabilities::has_beth_header(version, header.user_version) {
            header.beth_version = reader.read_u32()?;
            // Author.
            reader.read_export_string()?;
            if header.beth_version >= 131 {
                reader.skip(4)?;
            } else {
                // Process script.
                reader.read_export_string()?;
            }
            // Export script.
            reader.read_export_string()?;
            if header.beth_version >= 103 {
                // Max file path.
                reader.read_export_string()?;
            }
        }

        if capabilities.has_type_table {
            if capabilities.has_type_hashes {
                return Err(ErrorKind::HashedRecordTypesUnsupported);
            }
            let count = reader.read_u16()? as usize;
            header.type_names = reader.read_sized_strings(count)?;
            header.type_indices = reader.read_array(header.record_count)?;
        }

        if capabilities.has_record_sizes {
            reader.skip(header.record_count.saturating_mul(4))?;
        }

        if capabilities.has_string_table {
            let count = reader.read_u32()? as usize;
            let _max_length = reader.read_u32()?;
            header.strings = reader.read_sized_strings(count)?;
        }

        if capabilities.has_groups {
            let count = reader.read_u32()? as usize;
            reader.skip(count.saturating_mul(4))?;
        }

        Ok(header)
    }

    /// The type name of record `index` from the type table.
    pub(crate) fn type_name(&self, index: usize) -> DecodeResult<&str> {
        let type_index = self.type_indices.get(index).copied().unwrap_or(u16::MAX);
        self.type_names
            .get(usize::from(type_index))
            .map(String::as_str)
            .ok_or(ErrorKind::InvalidRecordTypeIndex {
                index,
                type_index,
                count: self.type_names.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ByteWriter;
    use crate::version::beth;

    fn read(bytes: &[u8], options: LoadOptions) -> (DecodeResult<Header>, Vec<Warning>) {
        let mut source = bytes;
        let mut reader = StreamReader::new(&mut source as &mut dyn Read);
        let mut warnings = Vec::new();
        let header = Header::read(&mut reader, Path::new("test.nif"), &options, &mut warnings);
        (header, warnings)
    }

    #[test]
    fn test_morrowind_header() {
        let bytes = ByteWriter::new()
            .line("NetImmerse File Format, Version 4.0.0.2")
            .u32(NifVersion::MORROWIND.packed())
            .u32(3)
            .finish();
        let (header, warnings) = read(&bytes, LoadOptions::default());
        let header = header.unwrap();
        assert_eq!(header.version, NifVersion::MORROWIND);
        assert_eq!(header.record_count, 3);
        assert!(header.type_names.is_empty());
        assert!(header.strings.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_bad_banner() {
        let bytes = ByteWriter::new().line("Not a NIF file").finish();
        let (header, _) = read(&bytes, LoadOptions::permissive());
        assert!(matches!(header, Err(ErrorKind::InvalidHeader { banner }) if banner == "Not a NIF file"));
    }

    #[test]
    fn test_unsupported_version_needs_permission() {
        let bytes = ByteWriter::new()
            .line("Gamebryo File Format, Version 10.0.1.0")
            .u32(NifVersion::new(10, 0, 1, 0).packed())
            .u32(0)
            .u16(0)
            .u32(0)
            .finish();
        let (header, _) = read(&bytes, LoadOptions::default());
        assert!(matches!(header, Err(ErrorKind::UnsupportedVersion(v)) if v == NifVersion::new(10, 0, 1, 0)));

        let (header, warnings) = read(&bytes, LoadOptions::permissive());
        assert!(header.is_ok());
        assert_eq!(warnings, vec![Warning::UnsupportedVersion(NifVersion::new(10, 0, 1, 0))]);
    }

    #[test]
    fn test_big_endian_is_always_rejected() {
        let bytes = ByteWriter::new()
            .line("Gamebryo File Format, Version 20.2.0.7")
            .u32(NifVersion::BETHESDA.packed())
            .u8(0)
            .finish();
        for options in [LoadOptions::default(), LoadOptions::permissive()] {
            let (header, _) = read(&bytes, options);
            assert!(matches!(header, Err(ErrorKind::UnsupportedEndianness)));
        }
    }

    #[test]
    fn test_hashed_type_table_is_rejected() {
        let bytes = ByteWriter::new()
            .line("Gamebryo File Format, Version 20.3.1.2")
            .u32(NifVersion::new(20, 3, 1, 2).packed())
            .u8(1)
            .u32(0)
            .u32(0)
            .finish();
        let (header, _) = read(&bytes, LoadOptions::permissive());
        assert!(matches!(header, Err(ErrorKind::HashedRecordTypesUnsupported)));
    }

    #[test]
    fn test_skyrim_header_tables() {
        let bytes = ByteWriter::new()
            .line("Gamebryo File Format, Version 20.2.0.7")
            .u32(NifVersion::BETHESDA.packed())
            .u8(1)
            .u32(12)
            .u32(2)
            .u32(beth::SKY)
            .export_string("author")
            .export_string("process")
            .export_string("export")
            // Type table.
            .u16(2)
            .sized_string("BSFadeNode")
            .sized_string("NiTriShape")
            .u16(0)
            .u16(1)
            // Record sizes.
            .u32(40)
            .u32(60)
            // String table.
            .u32(2)
            .u32(5)
            .sized_string("Scene")
            .sized_string("Mesh")
            // Groups.
            .u32(0)
            .finish();
        let (header, warnings) = read(&bytes, LoadOptions::permissive());
        let header = header.unwrap();
        assert_eq!(header.user_version, 12);
        assert_eq!(header.beth_version, beth::SKY);
        assert_eq!(header.type_name(0).unwrap(), "BSFadeNode");
        assert_eq!(header.type_name(1).unwrap(), "NiTriShape");
        assert_eq!(header.strings, vec!["Scene".to_string(), "Mesh".to_string()]);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_string_table_is_version_gated() {
        let header_bytes = |version: NifVersion| {
            ByteWriter::new()
                .line("Gamebryo File Format, Version 20.1.0.x")
                .u32(version.packed())
                .u8(1)
                .u32(0)
                .u32(0)
                .u16(0)
                .u32(0)
                .finish()
        };

        let before = NifVersion::new(20, 1, 0, 0);
        let (header, _) = read(&header_bytes(before), LoadOptions::permissive());
        assert!(header.unwrap().strings.is_empty());

        let after = NifVersion::new(20, 1, 0, 1);
        let (header, _) = read(&header_bytes(after), LoadOptions::permissive());
        assert!(header.unwrap_err().is_truncated());
    }

    #[test]
    fn test_type_index_out_of_range() {
        let header = Header {
            type_names: vec!["NiNode".into()],
            type_indices: vec![0, 3],
            ..Header::default()
        };
        assert!(header.type_name(0).is_ok());
        assert!(matches!(
            header.type_name(1),
            Err(ErrorKind::InvalidRecordTypeIndex {
                index: 1,
                type_index: 3,
                count: 1
            })
        ));
    }
}
