//! Common utilities for Nifheim.
//!
//! This crate provides foundational types and utilities used across all Nifheim crates:
//!
//! - [`StreamReader`] - Forward-only little-endian reading from any [`std::io::Read`]
//! - [`ContentHash`] - BLAKE3 digest of the raw bytes a reader consumed
//! - [`math`] - Plain-old-data vector, matrix and color types read in bulk

mod error;
mod hash;
mod reader;

pub mod math;

pub use error::{Error, Result};
pub use hash::ContentHash;
pub use reader::StreamReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
