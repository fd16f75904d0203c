//! Import table
//!
//! Fixed 28-byte records referencing objects defined in other packages.
//! Imports are addressed elsewhere by negative 1-based index.

use std::borrow::Cow;

use byteorder::{LittleEndian, WriteBytesExt};
use serde::Serialize;

use super::codec;
use crate::error::Result;

/// Size of one import record.
pub const IMPORT_ENTRY_SIZE: usize = 28;

/// One import record. Name fields are indices into the name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportEntry {
    pub class_package: i64,
    pub class_name: i64,
    /// 0 for a top-level object, otherwise a negative import index.
    pub outer_index: i32,
    pub object_name: i32,
    /// Trailing instance number of the object name; 0 for new entries.
    pub object_name_number: i32,
}

impl ImportEntry {
    fn parse(data: &[u8], offset: usize) -> Result<Self> {
        codec::bytes_at(data, offset, IMPORT_ENTRY_SIZE)?;
        Ok(Self {
            class_package: codec::read_i64(data, offset)?,
            class_name: codec::read_i64(data, offset + 8)?,
            outer_index: codec::read_i32(data, offset + 16)?,
            object_name: codec::read_i32(data, offset + 20)?,
            object_name_number: codec::read_i32(data, offset + 24)?,
        })
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        out.write_i64::<LittleEndian>(self.class_package)?;
        out.write_i64::<LittleEndian>(self.class_name)?;
        out.write_i32::<LittleEndian>(self.outer_index)?;
        out.write_i32::<LittleEndian>(self.object_name)?;
        out.write_i32::<LittleEndian>(self.object_name_number)?;
        Ok(())
    }
}

/// An import with its names resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedImport<'a> {
    /// Negative index used to reference this import.
    pub index: i32,
    pub class_package: Cow<'a, str>,
    pub class_name: Cow<'a, str>,
    pub object_name: Cow<'a, str>,
    pub outer_index: i32,
}

/// Convert a 0-based table position to the negative reference index.
#[must_use]
pub fn import_reference(position: usize) -> i32 {
    -(position as i32) - 1
}

/// Convert a negative reference index back to a 0-based table position.
#[must_use]
pub fn import_position(reference: i32) -> Option<usize> {
    if reference < 0 {
        usize::try_from(-(i64::from(reference)) - 1).ok()
    } else {
        None
    }
}

pub(crate) fn parse_imports(data: &[u8], offset: usize, count: usize) -> Result<Vec<ImportEntry>> {
    let imports = (0..count)
        .map(|i| ImportEntry::parse(data, offset + i * IMPORT_ENTRY_SIZE))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!("Parsed {} imports at offset {}", imports.len(), offset);
    Ok(imports)
}
