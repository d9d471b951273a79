//! Nifheim - NetImmerse/Gamebryo scene graph reading library.
//!
//! This crate bundles the Nifheim crates behind one dependency.
//!
//! # Crates
//!
//! - [`nifheim_common`] - Stream reading, content hashing and math types
//! - [`nifheim_nif`] - NIF header, record catalog and link resolution
//!
//! # Example
//!
//! ```no_run
//! use nifheim::prelude::*;
//!
//! // Accept files outside the Morrowind era
//! settings::set_load_unsupported_files(true);
//!
//! let file = NifFile::open("meshes/r/xbase_anim.nif")?;
//! for root in file.root_records() {
//!     println!("{} {:?}", root.type_name(), root.object_name());
//! }
//! for warning in file.diagnostics() {
//!     println!("warning: {}", warning);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use nifheim_common as common;
pub use nifheim_nif as nif;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use nifheim_common::{math, ContentHash, StreamReader};
    pub use nifheim_nif::{
        settings, Error, ErrorKind, FileSummary, LoadOptions, NifFile, NifVersion, Record, RecordData,
        RecordKind, RecordLink, Registry, Warning,
    };
}

// Re-export commonly used types at the crate root
pub use nifheim_nif::NifFile;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
