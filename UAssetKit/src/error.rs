//! Error types for `UAssetKit`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `UAssetKit` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The companion `.uexp` path could not be derived from the asset path.
    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),

    // ==================== Package Summary Errors ====================
    /// The file is not a package asset (magic mismatch).
    #[error("invalid package magic: expected 0x9E2A83C1, found {0:#010X}")]
    InvalidMagic(u32),

    /// A read ran past the end of the buffer.
    #[error("out of bounds: {len} bytes at offset {offset} exceed buffer of {size} bytes")]
    OutOfBounds {
        /// Absolute offset of the read.
        offset: usize,
        /// Number of bytes requested.
        len: usize,
        /// Size of the buffer.
        size: usize,
    },

    /// A stored count is negative.
    #[error("invalid {field} count: {value}")]
    InvalidCount {
        /// Name of the count field.
        field: &'static str,
        /// The value found in the file.
        value: i64,
    },

    /// Compressed packages store their tables in chunks and are not editable.
    #[error("compressed packages are not supported ({chunks} chunks)")]
    CompressedPackage {
        /// Number of compressed chunks in the summary.
        chunks: i32,
    },

    // ==================== Table Errors ====================
    /// A table offset points outside the editable region of the header file.
    #[error("{table} table offset {offset} outside header file of {size} bytes")]
    TableOutOfRange {
        /// Which table.
        table: &'static str,
        /// Offset stored in the summary.
        offset: i64,
        /// Size of the header file.
        size: usize,
    },

    /// The name and import tables overlap.
    #[error("name table ({names_end}) overlaps import table ({imports_start})")]
    TableOverlap {
        /// Byte position just after the name table.
        names_end: usize,
        /// Start of the import table.
        imports_start: usize,
    },

    /// A name index does not resolve within the name table.
    #[error("unresolved name index: {0}")]
    UnresolvedNameIndex(i64),

    // ==================== Parsing Errors ====================
    /// Patch plan could not be parsed.
    #[error("patch plan parse error: {0}")]
    PlanParse(#[from] toml::de::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for `UAssetKit` operations.
pub type Result<T> = std::result::Result<T, Error>;
