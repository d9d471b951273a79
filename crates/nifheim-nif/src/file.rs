//! Whole-file decoding: header, record loop, roots and post-processing.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use nifheim_common::{ContentHash, StreamReader};
use tracing::{debug, warn};

use crate::error::Warning;
use crate::header::Header;
use crate::link::{LinkTarget, RecordLink};
use crate::record::{Record, RecordCast};
use crate::registry::Registry;
use crate::resolve::resolve;
use crate::settings::LoadOptions;
use crate::stream::NO_STRING;
use crate::{DecodeResult, Error, ErrorKind, NifStream, NifVersion, Result};

/// Upper bound on records reserved up front, whatever the header claims.
const MAX_PREALLOCATED_RECORDS: usize = 1 << 16;

/// A decoded NIF file.
///
/// Records keep their file order and indices for the life of the value.
/// Nothing here is mutated after decoding, so a `NifFile` can be shared
/// freely between threads.
#[derive(Debug, Clone)]
pub struct NifFile {
    path: PathBuf,
    version: NifVersion,
    user_version: u32,
    beth_version: u32,
    records: Vec<Record>,
    roots: Vec<Option<usize>>,
    strings: Vec<String>,
    hash: ContentHash,
    parents: Vec<Vec<usize>>,
    bones: Vec<bool>,
    uses_skinning: bool,
    warnings: Vec<Warning>,
}

impl NifFile {
    /// Open and decode a file using the process-wide load toggles.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &LoadOptions::from_globals())
    }

    /// Open and decode a file with explicit options.
    pub fn open_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| Error::new(path, err.into()))?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|err| Error::new(path, err.into()))?;
        Self::parse_with(&mmap, path, options)
    }

    /// Decode a file already in memory.
    pub fn parse<P: AsRef<Path>>(data: &[u8], path: P) -> Result<Self> {
        Self::parse_with(data, path, &LoadOptions::from_globals())
    }

    /// Decode a file already in memory with explicit options.
    pub fn parse_with<P: AsRef<Path>>(data: &[u8], path: P, options: &LoadOptions) -> Result<Self> {
        let mut source = data;
        Self::read_from_with(&mut source, path, options)
    }

    /// Decode from any byte source. `path` is only used in diagnostics.
    pub fn read_from<R: Read, P: AsRef<Path>>(reader: R, path: P) -> Result<Self> {
        Self::read_from_with(reader, path, &LoadOptions::from_globals())
    }

    /// Decode from any byte source with explicit options.
    pub fn read_from_with<R: Read, P: AsRef<Path>>(
        mut reader: R,
        path: P,
        options: &LoadOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        Self::decode(&mut reader, path, options).map_err(|kind| Error::new(path, kind))
    }

    fn decode(source: &mut dyn Read, path: &Path, options: &LoadOptions) -> DecodeResult<Self> {
        let mut warnings = Vec::new();
        let mut reader = StreamReader::new(source);
        let mut header = Header::read(&mut reader, path, options, &mut warnings)?;
        let capabilities = header.capabilities;
        let trace_records = options.debug_log && !header.version.is_supported();

        let mut nif = NifStream::new(
            reader,
            header.version,
            header.user_version,
            header.beth_version,
            std::mem::take(&mut header.strings),
            capabilities.has_string_table,
        );

        let mut records = Vec::with_capacity(header.record_count.min(MAX_PREALLOCATED_RECORDS));
        for index in 0..header.record_count {
            let name = if capabilities.has_type_table {
                header.type_name(index)?.to_string()
            } else {
                nif.read_sized_string()?
            };
            if name.is_empty() {
                return Err(ErrorKind::BlankRecordType { index });
            }

            if capabilities.has_record_separators && !name.starts_with("bhk") {
                let value = nif.read_i32()?;
                if value != 0 {
                    let warning = Warning::NonZeroSeparator {
                        index,
                        name: name.clone(),
                        value,
                    };
                    warn!("{} ({})", warning, path.display());
                    warnings.push(warning);
                }
            }

            let Some((kind, mut data)) = Registry::global().create(&name) else {
                return Err(ErrorKind::UnknownRecordType { name, index });
            };
            if trace_records {
                debug!("reading record of type {}, index {} ({})", name, index, path.display());
            }
            nif.begin_record(index, &name);
            data.read(&mut nif)?;
            records.push(Record::new(kind, index, name, data));
        }

        let root_count = nif.read_u32()? as usize;
        let mut roots = Vec::with_capacity(root_count.min(MAX_PREALLOCATED_RECORDS));
        for root in 0..root_count {
            let index = nif.read_i32()?;
            let target = usize::try_from(index).ok().filter(|&i| i < records.len());
            if target.is_none() {
                let warning = Warning::RootOutOfRange { root, index };
                warn!("{} ({})", warning, path.display());
                warnings.push(warning);
            }
            roots.push(target);
        }

        let (reader, strings) = nif.into_parts();
        let hash = reader.finish()?;

        let resolution = resolve(&records)?;
        warnings.extend(resolution.warnings);
        for &index in &resolution.cleared_geometry_data {
            if let Some(geometry) = records.get_mut(index).and_then(|r| r.data_mut().geometry_mut()) {
                geometry.data = RecordLink::EMPTY;
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            version: header.version,
            user_version: header.user_version,
            beth_version: header.beth_version,
            records,
            roots,
            strings,
            hash,
            parents: resolution.parents,
            bones: resolution.bones,
            uses_skinning: resolution.uses_skinning,
            warnings,
        })
    }

    /// The source path given to the decoder.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn version(&self) -> NifVersion {
        self.version
    }

    #[inline]
    pub fn user_version(&self) -> u32 {
        self.user_version
    }

    #[inline]
    pub fn beth_version(&self) -> u32 {
        self.beth_version
    }

    /// All records in file order.
    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The record at `index`.
    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Root entries; `None` marks a root that pointed outside the record list.
    #[inline]
    pub fn roots(&self) -> &[Option<usize>] {
        &self.roots
    }

    /// The records the valid root entries point at.
    pub fn root_records(&self) -> impl Iterator<Item = &Record> {
        self.roots.iter().flatten().filter_map(|&index| self.records.get(index))
    }

    /// The string pool.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Look up a pool string. The reserved "no string" index gives `""`.
    pub fn get_string(&self, index: u32) -> Option<&str> {
        if index == NO_STRING {
            return Some("");
        }
        self.strings.get(index as usize).map(String::as_str)
    }

    /// BLAKE3 hash of the raw file bytes.
    #[inline]
    pub fn hash(&self) -> ContentHash {
        self.hash
    }

    /// Check whether any geometry in the file is skinned.
    #[inline]
    pub fn uses_skinning(&self) -> bool {
        self.uses_skinning
    }

    /// Nodes that list record `index` as a child.
    pub fn parents(&self, index: usize) -> &[usize] {
        self.parents.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    /// Check whether record `index` is used as a skeleton bone.
    pub fn is_bone(&self, index: usize) -> bool {
        self.bones.get(index).copied().unwrap_or(false)
    }

    /// Warnings gathered while decoding, in the order they were raised.
    pub fn diagnostics(&self) -> &[Warning] {
        &self.warnings
    }

    /// Follow a link to the record it points at.
    ///
    /// Empty, dangling and mistyped links give `None`.
    pub fn link<T: LinkTarget>(&self, link: &RecordLink<T>) -> Option<&Record> {
        link.get()
            .and_then(|index| self.records.get(index))
            .filter(|record| T::accepts(record.data()))
    }

    /// Follow a link to a concrete record struct.
    pub fn resolve<T: RecordCast + LinkTarget>(&self, link: &RecordLink<T>) -> Option<&T> {
        self.link(link).and_then(Record::get::<T>)
    }

    /// A serializable overview of the file.
    pub fn summary(&self) -> FileSummary {
        let mut types = BTreeMap::new();
        for record in &self.records {
            *types.entry(record.type_name().to_string()).or_insert(0) += 1;
        }
        FileSummary {
            path: self.path.clone(),
            version: self.version,
            user_version: self.user_version,
            beth_version: self.beth_version,
            records: self.records.len(),
            roots: self.roots.iter().flatten().count(),
            strings: self.strings.len(),
            uses_skinning: self.uses_skinning,
            hash: self.hash,
            warnings: self.warnings.iter().map(ToString::to_string).collect(),
            types,
        }
    }
}

/// Overview of a decoded file, for listings and JSON output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileSummary {
    pub path: PathBuf,
    pub version: NifVersion,
    pub user_version: u32,
    pub beth_version: u32,
    pub records: usize,
    /// Valid root entries.
    pub roots: usize,
    pub strings: usize,
    pub uses_skinning: bool,
    pub hash: ContentHash,
    pub warnings: Vec<String>,
    /// Record count per type name.
    pub types: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::records::{NiGeometry, NiNode, NiTriShapeData};
    use crate::test_support::ByteWriter;
    use crate::version::beth;

    const IDENTITY: [f32; 13] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0];

    fn transform(mut writer: ByteWriter) -> ByteWriter {
        for value in IDENTITY {
            writer = writer.f32(value);
        }
        writer
    }

    /// An inline-typed NiNode as written by Morrowind.
    fn morrowind_node(writer: ByteWriter, name: &str, children: &[i32]) -> ByteWriter {
        let writer = writer
            .sized_string("NiNode")
            .sized_string(name)
            .i32(-1)
            .i32(-1)
            .u16(0);
        let mut writer = transform(writer)
            .f32(0.0)
            .f32(0.0)
            .f32(0.0)
            .u32(0)
            .i32(0)
            .u32(children.len() as u32);
        for &child in children {
            writer = writer.i32(child);
        }
        writer.u32(0)
    }

    fn morrowind_header(count: u32) -> ByteWriter {
        ByteWriter::new()
            .line("NetImmerse File Format, Version 4.0.0.2")
            .u32(NifVersion::MORROWIND.packed())
            .u32(count)
    }

    fn roots(mut writer: ByteWriter, roots: &[i32]) -> Vec<u8> {
        writer = writer.u32(roots.len() as u32);
        for &root in roots {
            writer = writer.i32(root);
        }
        writer.finish()
    }

    fn morrowind_scene() -> Vec<u8> {
        let writer = morrowind_header(3);
        let writer = morrowind_node(writer, "Scene Root", &[1]);
        let writer = morrowind_node(writer, "Child", &[-1]);
        let writer = morrowind_node(writer, "Detached", &[]);
        roots(writer, &[0, 3, 2])
    }

    /// A Morrowind NiTriShape whose data link points at `data`.
    fn morrowind_shape(writer: ByteWriter, data: i32) -> ByteWriter {
        let writer = writer
            .sized_string("NiTriShape")
            .sized_string("Shape")
            .i32(-1)
            .i32(-1)
            .u16(0);
        transform(writer)
            .f32(0.0)
            .f32(0.0)
            .f32(0.0)
            .u32(0)
            .i32(0)
            .i32(data)
            .i32(-1)
    }

    /// The part of an empty vertex data record shared by all data types.
    fn empty_geometry_data(writer: ByteWriter, type_name: &str) -> ByteWriter {
        writer
            .sized_string(type_name)
            .u16(0)
            .i32(0)
            .i32(0)
            .f32(0.0)
            .f32(0.0)
            .f32(0.0)
            .f32(0.0)
            .i32(0)
            .u16(0)
            .i32(0)
    }

    /// A node owning one shape, followed by one record of each triangle
    /// data type. The shape links to record `data`.
    fn mixed_scene(data: i32) -> ByteWriter {
        let writer = morrowind_node(morrowind_header(4), "Scene Root", &[1]);
        let writer = morrowind_shape(writer, data);
        let writer = empty_geometry_data(writer, "NiTriShapeData")
            .u16(0)
            .u32(0)
            .u16(0);
        empty_geometry_data(writer, "NiTriStripsData").u16(0).u16(0)
    }

    fn parse(bytes: &[u8]) -> Result<NifFile> {
        NifFile::parse_with(bytes, "test.nif", &LoadOptions::default())
    }

    #[test]
    fn test_morrowind_scene() {
        let bytes = morrowind_scene();
        let file = parse(&bytes).unwrap();
        assert_eq!(file.version(), NifVersion::MORROWIND);
        assert_eq!(file.records().len(), 3);
        assert_eq!(file.record(0).unwrap().object_name(), Some("Scene Root"));
        assert_eq!(file.record(2).unwrap().type_name(), "NiNode");
        assert_eq!(file.parents(1), &[0]);
        assert!(file.parents(0).is_empty());
        assert!(file.strings().is_empty());
        assert_eq!(file.hash(), ContentHash::of(&bytes));
    }

    #[test]
    fn test_out_of_range_root_becomes_empty() {
        let file = parse(&morrowind_scene()).unwrap();
        assert_eq!(file.roots(), &[Some(0), None, Some(2)]);
        assert_eq!(file.root_records().count(), 2);
        assert_eq!(
            file.diagnostics(),
            &[Warning::RootOutOfRange { root: 1, index: 3 }]
        );
        assert_eq!(file.summary().roots, 2);
    }

    #[test]
    fn test_links_resolve_to_records() {
        let file = parse(&morrowind_scene()).unwrap();
        let root = file.record(0).unwrap().get::<NiNode>().unwrap();
        let child = file.link(&root.children[0]).unwrap();
        assert_eq!(child.object_name(), Some("Child"));
        assert_eq!(child.index(), 1);

        let node = file.resolve(&RecordLink::<NiNode>::new(1)).unwrap();
        assert_eq!(node.base.base.name, "Child");
        assert!(file.resolve(&RecordLink::<NiNode>::new(9)).is_none());
        assert!(file.resolve(&RecordLink::<NiNode>::EMPTY).is_none());
        assert!(file.link(&RecordLink::<NiTriShapeData>::new(0)).is_none());
    }

    #[test]
    fn test_record_index_matches_file_position() {
        let bytes = roots(mixed_scene(2), &[0]);
        let file = parse(&bytes).unwrap();
        let names: Vec<_> = file.records().iter().map(Record::type_name).collect();
        assert_eq!(names, ["NiNode", "NiTriShape", "NiTriShapeData", "NiTriStripsData"]);
        for (position, record) in file.records().iter().enumerate() {
            assert_eq!(record.index(), position);
            assert!(std::ptr::eq(file.record(position).unwrap(), record));
        }
        assert_eq!(file.parents(1), &[0]);
        assert!(file.diagnostics().is_empty());
    }

    #[test]
    fn test_mismatched_geometry_data_is_dropped() {
        let bytes = roots(mixed_scene(3), &[0]);
        let file = parse(&bytes).unwrap();
        assert_eq!(
            file.diagnostics(),
            &[Warning::LinkTypeMismatch {
                from: 1,
                index: 3,
                expected: "NiTriShapeData",
                found: "NiTriStripsData".into(),
            }]
        );
        let shape = file.record(1).unwrap().get::<NiGeometry>().unwrap();
        assert!(shape.data.is_empty());
        assert!(file.link(&shape.data).is_none());
        assert_eq!(file.record(3).unwrap().type_name(), "NiTriStripsData");
    }

    #[test]
    fn test_unknown_record_type() {
        let writer = morrowind_header(1).sized_string("NotARealRecordType");
        let err = parse(&roots(writer, &[])).unwrap_err();
        assert_eq!(err.path(), Path::new("test.nif"));
        assert!(matches!(
            err.kind(),
            ErrorKind::UnknownRecordType { name, index: 0 } if name == "NotARealRecordType"
        ));
    }

    #[test]
    fn test_blank_record_type() {
        let writer = morrowind_header(1).sized_string("");
        let err = parse(&roots(writer, &[])).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::BlankRecordType { index: 0 }));
    }

    #[test]
    fn test_truncated_file() {
        let bytes = morrowind_scene();
        let err = parse(&bytes[..bytes.len() - 30]).unwrap_err();
        assert!(err.kind().is_truncated());
    }

    #[test]
    fn test_big_endian_file() {
        let bytes = ByteWriter::new()
            .line("Gamebryo File Format, Version 20.2.0.7")
            .u32(NifVersion::BETHESDA.packed())
            .u8(0)
            .finish();
        let err = NifFile::parse_with(&bytes, "big.nif", &LoadOptions::permissive()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnsupportedEndianness));
    }

    #[test]
    fn test_string_pool() {
        let bytes = ByteWriter::new()
            .line("Gamebryo File Format, Version 20.2.0.7")
            .u32(NifVersion::BETHESDA.packed())
            .u8(1)
            .u32(12)
            .u32(0)
            .u32(beth::SKY)
            .export_string("")
            .export_string("")
            .export_string("")
            .u16(0)
            .u32(2)
            .u32(3)
            .sized_string("foo")
            .sized_string("bar")
            .u32(0)
            .u32(0)
            .finish();
        let file = NifFile::parse_with(&bytes, "pool.nif", &LoadOptions::permissive()).unwrap();
        assert_eq!(file.beth_version(), beth::SKY);
        assert_eq!(file.user_version(), 12);
        assert_eq!(file.get_string(0), Some("foo"));
        assert_eq!(file.get_string(1), Some("bar"));
        assert_eq!(file.get_string(2), None);
        assert_eq!(file.get_string(u32::MAX), Some(""));
        assert_eq!(
            file.diagnostics(),
            &[Warning::UnsupportedVersion(NifVersion::BETHESDA)]
        );
    }

    #[test]
    fn test_non_zero_separator_warns() {
        let writer = ByteWriter::new()
            .line("Gamebryo File Format, Version 10.0.1.0")
            .u32(NifVersion::new(10, 0, 1, 0).packed())
            .u32(1)
            .u16(1)
            .sized_string("NiNode")
            .u16(0)
            .u32(0)
            // Separator, then the node body.
            .i32(7)
            .sized_string("Root")
            .u32(0)
            .i32(-1)
            .u16(0);
        let writer = transform(writer).u32(0).i32(-1).u32(0).u32(0);
        let bytes = roots(writer, &[0]);

        let file = NifFile::parse_with(&bytes, "sep.nif", &LoadOptions::permissive()).unwrap();
        assert_eq!(file.records().len(), 1);
        assert_eq!(file.roots(), &[Some(0)]);
        assert_eq!(
            file.diagnostics(),
            &[
                Warning::UnsupportedVersion(NifVersion::new(10, 0, 1, 0)),
                Warning::NonZeroSeparator {
                    index: 0,
                    name: "NiNode".into(),
                    value: 7,
                },
            ]
        );
    }

    #[test]
    fn test_open_from_disk() {
        let bytes = morrowind_scene();
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&bytes).unwrap();
        tmp.flush().unwrap();

        let file = NifFile::open_with(tmp.path(), &LoadOptions::default()).unwrap();
        assert_eq!(file.path(), tmp.path());
        assert_eq!(file.records().len(), 3);
        assert_eq!(file.hash(), ContentHash::of(&bytes));

        let summary = file.summary();
        assert_eq!(summary.types.get("NiNode"), Some(&3));
        assert_eq!(summary.warnings.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = NifFile::open_with("/nonexistent/file.nif", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Io(_)));
    }

    #[test]
    fn test_file_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NifFile>();
    }
}
