//! Package summary parsing
//!
//! The summary is parsed field by field from offset 0. Its raw bytes are kept
//! and copied through verbatim; the count and offset fields the editor needs
//! are remembered together with their byte position so they can be patched in
//! place when the asset is written back.

use indexmap::IndexMap;

use super::PACKAGE_FILE_TAG;
use super::codec::{self, Reader};
use crate::error::{Error, Result};

/// First UE4 file version that stores the gatherable text table in the summary.
pub const VER_UE4_SERIALIZE_TEXT_IN_PACKAGES: i32 = 459;

/// Summary fields that count table entries or locate data in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeaderField {
    TotalHeaderSize,
    NameCount,
    NameOffset,
    GatherableTextDataCount,
    GatherableTextDataOffset,
    ExportCount,
    ExportOffset,
    ImportCount,
    ImportOffset,
    DependsOffset,
    SoftPackageReferencesCount,
    SoftPackageReferencesOffset,
    SearchableNamesOffset,
    ThumbnailTableOffset,
    AssetRegistryDataOffset,
    BulkDataStartOffset,
    WorldTileInfoDataOffset,
    PreloadDependencyCount,
    PreloadDependencyOffset,
}

impl HeaderField {
    /// Human-readable field name, as shown by `uassetkit info`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TotalHeaderSize => "TotalHeaderSize",
            Self::NameCount => "NameCount",
            Self::NameOffset => "NameOffset",
            Self::GatherableTextDataCount => "GatherableTextDataCount",
            Self::GatherableTextDataOffset => "GatherableTextDataOffset",
            Self::ExportCount => "ExportCount",
            Self::ExportOffset => "ExportOffset",
            Self::ImportCount => "ImportCount",
            Self::ImportOffset => "ImportOffset",
            Self::DependsOffset => "DependsOffset",
            Self::SoftPackageReferencesCount => "SoftPackageReferencesCount",
            Self::SoftPackageReferencesOffset => "SoftPackageReferencesOffset",
            Self::SearchableNamesOffset => "SearchableNamesOffset",
            Self::ThumbnailTableOffset => "ThumbnailTableOffset",
            Self::AssetRegistryDataOffset => "AssetRegistryDataOffset",
            Self::BulkDataStartOffset => "BulkDataStartOffset",
            Self::WorldTileInfoDataOffset => "WorldTileInfoDataOffset",
            Self::PreloadDependencyCount => "PreloadDependencyCount",
            Self::PreloadDependencyOffset => "PreloadDependencyOffset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Width {
    I32,
    I64,
}

#[derive(Debug, Clone, Copy)]
struct FieldSlot {
    position: usize,
    width: Width,
    value: i64,
}

/// Parsed package summary.
#[derive(Debug, Clone)]
pub struct PackageHeader {
    raw: Vec<u8>,
    pub legacy_file_version: i32,
    pub file_version_ue4: i32,
    pub file_version_licensee: i32,
    pub folder_name: String,
    pub package_flags: u32,
    fields: IndexMap<HeaderField, FieldSlot>,
}

impl PackageHeader {
    /// Parse the summary at the start of `data`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidMagic`] if the tag does not match and
    /// [`Error::OutOfBounds`] if the summary is truncated.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let magic = codec::read_u32(data, 0)?;
        if magic != PACKAGE_FILE_TAG {
            return Err(Error::InvalidMagic(magic));
        }

        let mut reader = Reader::new(data);
        reader.skip(4)?;
        let mut fields = IndexMap::new();

        let legacy_file_version = reader.i32()?;
        if legacy_file_version != -4 {
            // Legacy UE3 version
            reader.i32()?;
        }
        let file_version_ue4 = reader.i32()?;
        let file_version_licensee = reader.i32()?;

        if legacy_file_version <= -2 {
            let custom_versions = reader.count("custom version")?;
            for _ in 0..custom_versions {
                match legacy_file_version {
                    -2 => reader.skip(8)?,
                    -5..=-3 => {
                        reader.skip(20)?;
                        reader.fstring()?;
                    }
                    _ => reader.skip(20)?,
                }
            }
        }

        read_field(&mut reader, &mut fields, HeaderField::TotalHeaderSize, Width::I32)?;
        let folder_name = reader.fstring()?.value;
        let package_flags = reader.u32()?;

        read_count(&mut reader, &mut fields, HeaderField::NameCount, "name")?;
        read_field(&mut reader, &mut fields, HeaderField::NameOffset, Width::I32)?;
        if file_version_ue4 >= VER_UE4_SERIALIZE_TEXT_IN_PACKAGES {
            read_count(&mut reader, &mut fields, HeaderField::GatherableTextDataCount, "gatherable text")?;
            read_field(&mut reader, &mut fields, HeaderField::GatherableTextDataOffset, Width::I32)?;
        }
        read_count(&mut reader, &mut fields, HeaderField::ExportCount, "export")?;
        read_field(&mut reader, &mut fields, HeaderField::ExportOffset, Width::I32)?;
        read_count(&mut reader, &mut fields, HeaderField::ImportCount, "import")?;
        read_field(&mut reader, &mut fields, HeaderField::ImportOffset, Width::I32)?;
        read_field(&mut reader, &mut fields, HeaderField::DependsOffset, Width::I32)?;
        read_count(&mut reader, &mut fields, HeaderField::SoftPackageReferencesCount, "soft package reference")?;
        read_field(&mut reader, &mut fields, HeaderField::SoftPackageReferencesOffset, Width::I32)?;
        read_field(&mut reader, &mut fields, HeaderField::SearchableNamesOffset, Width::I32)?;
        read_field(&mut reader, &mut fields, HeaderField::ThumbnailTableOffset, Width::I32)?;

        // Package GUID
        reader.skip(16)?;

        let generations = reader.count("generation")?;
        for _ in 0..generations {
            // Export count, name count
            reader.skip(8)?;
        }

        // Saved-by and compatible engine versions
        for _ in 0..2 {
            reader.u16()?;
            reader.u16()?;
            reader.u16()?;
            reader.u32()?;
            reader.fstring()?;
        }

        // Compression flags
        reader.u32()?;
        let chunks = reader.i32()?;
        if chunks != 0 {
            return Err(Error::CompressedPackage { chunks });
        }
        // Package source
        reader.u32()?;

        let additional_packages = reader.count("additional package")?;
        for _ in 0..additional_packages {
            reader.fstring()?;
        }

        read_field(&mut reader, &mut fields, HeaderField::AssetRegistryDataOffset, Width::I32)?;
        read_field(&mut reader, &mut fields, HeaderField::BulkDataStartOffset, Width::I64)?;
        read_field(&mut reader, &mut fields, HeaderField::WorldTileInfoDataOffset, Width::I32)?;

        let chunk_ids = reader.count("chunk id")?;
        reader.skip(chunk_ids.saturating_mul(4))?;

        read_count(&mut reader, &mut fields, HeaderField::PreloadDependencyCount, "preload dependency")?;
        read_field(&mut reader, &mut fields, HeaderField::PreloadDependencyOffset, Width::I32)?;

        let size = reader.position();
        tracing::debug!("Parsed package summary: {} bytes, UE4 version {}", size, file_version_ue4);

        Ok(Self {
            raw: data[..size].to_vec(),
            legacy_file_version,
            file_version_ue4,
            file_version_licensee,
            folder_name,
            package_flags,
            fields,
        })
    }

    /// Size of the summary in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.raw.len()
    }

    /// Current value of a field, or `None` if this summary version lacks it.
    #[must_use]
    pub fn get(&self, field: HeaderField) -> Option<i64> {
        self.fields.get(&field).map(|slot| slot.value)
    }

    /// Byte position of a field within the summary.
    #[must_use]
    pub fn position(&self, field: HeaderField) -> Option<usize> {
        self.fields.get(&field).map(|slot| slot.position)
    }

    /// Field value as a non-negative size; absent or negative fields read as 0.
    #[must_use]
    pub fn get_usize(&self, field: HeaderField) -> usize {
        self.get(field)
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(0)
    }

    /// All present fields in file order.
    pub fn fields(&self) -> impl Iterator<Item = (HeaderField, i64)> + '_ {
        self.fields.iter().map(|(field, slot)| (*field, slot.value))
    }

    /// Update a field. Fields absent from this summary version are ignored.
    pub(crate) fn set(&mut self, field: HeaderField, value: i64) {
        if let Some(slot) = self.fields.get_mut(&field) {
            slot.value = value;
        }
    }

    /// Serialize the summary: raw bytes with every field patched in.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] only if a recorded position is invalid.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = self.raw.clone();
        for slot in self.fields.values() {
            match slot.width {
                Width::I32 => codec::write_i32(&mut out, slot.position, slot.value as i32)?,
                Width::I64 => codec::write_i64(&mut out, slot.position, slot.value)?,
            }
        }
        Ok(out)
    }
}

fn read_field(
    reader: &mut Reader<'_>,
    fields: &mut IndexMap<HeaderField, FieldSlot>,
    field: HeaderField,
    width: Width,
) -> Result<()> {
    let position = reader.position();
    let value = match width {
        Width::I32 => i64::from(reader.i32()?),
        Width::I64 => reader.i64()?,
    };
    fields.insert(field, FieldSlot { position, width, value });
    Ok(())
}

fn read_count(
    reader: &mut Reader<'_>,
    fields: &mut IndexMap<HeaderField, FieldSlot>,
    field: HeaderField,
    label: &'static str,
) -> Result<()> {
    let position = reader.position();
    let value = reader.count(label)?;
    fields.insert(
        field,
        FieldSlot {
            position,
            width: Width::I32,
            value: value as i64,
        },
    );
    Ok(())
}
