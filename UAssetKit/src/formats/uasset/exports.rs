//! Export table (read-only)
//!
//! The real export record is variable length and depends on the file version
//! and flags. This scan assumes a fixed stride and reads only the leading
//! fields, which is enough to resolve object names for diagnostics. Exports
//! cannot be added or resized.

use serde::Serialize;

use super::codec;
use crate::error::Result;

/// Assumed distance between consecutive export records.
pub const EXPORT_SCAN_STRIDE: usize = 104;

/// Leading fields of an export record (the first 40 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    pub class_index: i32,
    pub super_index: i32,
    pub template_index: i32,
    pub outer_index: i32,
    pub object_name: i32,
    pub object_flags: u32,
    pub serial_size: i64,
    pub serial_offset: i64,
    /// Where the record starts in the header file.
    pub position: usize,
}

impl ExportEntry {
    fn parse(data: &[u8], offset: usize) -> Result<Self> {
        codec::bytes_at(data, offset, EXPORT_SCAN_STRIDE)?;
        Ok(Self {
            class_index: codec::read_i32(data, offset)?,
            super_index: codec::read_i32(data, offset + 4)?,
            template_index: codec::read_i32(data, offset + 8)?,
            outer_index: codec::read_i32(data, offset + 12)?,
            object_name: codec::read_i32(data, offset + 16)?,
            object_flags: codec::read_u32(data, offset + 20)?,
            serial_size: codec::read_i64(data, offset + 24)?,
            serial_offset: codec::read_i64(data, offset + 32)?,
            position: offset,
        })
    }
}

/// Scan up to `count` records at `offset`.
///
/// Stops at the first record that would run past the end of `data`; records
/// already read are kept and no partial record is returned.
pub(crate) fn scan_exports(data: &[u8], offset: i64, count: usize) -> Vec<ExportEntry> {
    let Ok(start) = usize::try_from(offset) else {
        tracing::warn!("Export offset {} is negative, skipping export scan", offset);
        return Vec::new();
    };

    let mut exports = Vec::with_capacity(count.min(data.len() / EXPORT_SCAN_STRIDE));
    for i in 0..count {
        match ExportEntry::parse(data, start + i * EXPORT_SCAN_STRIDE) {
            Ok(entry) => exports.push(entry),
            Err(e) => {
                tracing::warn!("Export scan stopped after {} of {} entries: {}", i, count, e);
                break;
            }
        }
    }
    exports
}
