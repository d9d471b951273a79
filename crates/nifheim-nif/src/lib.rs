//! NetImmerse/Gamebryo NIF scene graph reader.
//!
//! A NIF file is a header followed by a flat list of typed records that
//! refer to each other by index. This crate decodes the whole list in one
//! pass, resolves the links between records and hands back an immutable
//! [`NifFile`].
//!
//! # Quick Start
//!
//! ```no_run
//! use nifheim_nif::{NifFile, NiNode};
//!
//! let file = NifFile::open("meshes/base_anim.nif")?;
//! println!("{} records, version {}", file.records().len(), file.version());
//!
//! for root in file.root_records() {
//!     if let Some(node) = root.get::<NiNode>() {
//!         println!("{}: {} children", root.type_name(), node.children.len());
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - **Header** ([`Header`]): banner, versions, type table and string pool
//! - **Registry** ([`Registry`]): type name to record kind and constructor
//! - **Records** ([`Record`], [`RecordData`]): one decoded record, tagged with its kind
//! - **Links** ([`RecordLink`]): typed indices, checked once every record exists
//! - **File** ([`NifFile`]): the decoded graph, roots and diagnostics
//!
//! # Unsupported versions
//!
//! Only Morrowind-era files load by default. Everything else is rejected
//! unless [`settings::set_load_unsupported_files`] is switched on, in which
//! case the file is decoded best-effort and a warning is kept.

mod error;
mod file;
mod header;
mod record;
mod registry;
mod resolve;
mod stream;
mod version;

pub mod link;
pub mod records;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use error::{DecodeResult, Error, ErrorKind, Result, Warning};
pub use file::{FileSummary, NifFile};
pub use header::{Header, BANNERS};
pub use link::{LinkTarget, RecordLink};
pub use record::{ReadRecord, Record, RecordCast, RecordData, RecordKind};
pub use records::*;
pub use registry::{Factory, Registry};
pub use resolve::{resolve, PostContext, PostEffect, Resolution};
pub use settings::LoadOptions;
pub use stream::{NifStream, NO_STRING};
pub use version::{beth, Capabilities, NifVersion, ParseVersionError};
