//! In-memory package asset

use std::borrow::Cow;

use serde::Serialize;

use super::exports::{ExportEntry, scan_exports};
use super::header::{HeaderField, PackageHeader};
use super::imports::{
    IMPORT_ENTRY_SIZE, ImportEntry, ResolvedImport, import_position, import_reference, parse_imports,
};
use super::names::{NameEntry, NameTable};
use super::relocation::{Relocation, relocate};
use crate::error::{Error, Result};

/// Region of the header file following the summary.
#[derive(Debug, Clone)]
enum Segment {
    /// Copied through untouched.
    Raw(Vec<u8>),
    Names,
    Imports,
}

/// Diagnostic overview of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSummary {
    pub name_count: usize,
    pub import_count: usize,
    pub export_count: usize,
    pub first_names: Vec<String>,
}

/// A loaded package asset: summary, tables and the untouched remainder.
///
/// Names and imports can only be appended. Each append splices bytes into the
/// header file and shifts every summary offset behind it before returning, so
/// the value is always consistent and can be serialized at any point.
#[derive(Debug, Clone)]
pub struct UAsset {
    header: PackageHeader,
    names: NameTable,
    imports: Vec<ImportEntry>,
    exports: Vec<ExportEntry>,
    layout: Vec<Segment>,
    payload: Option<Vec<u8>>,
    mutations: Vec<Relocation>,
}

impl UAsset {
    /// Parse a header file, keeping an optional companion payload (`.uexp`).
    ///
    /// # Errors
    /// - [`Error::InvalidMagic`] if `header` is not a package asset
    /// - [`Error::OutOfBounds`] if the summary, name table or import table is truncated
    /// - [`Error::TableOutOfRange`] / [`Error::TableOverlap`] for inconsistent table offsets
    pub fn load(header: Vec<u8>, payload: Option<Vec<u8>>) -> Result<Self> {
        let data = header;
        let summary = PackageHeader::parse(&data)?;
        let summary_end = summary.size();

        let name_offset = table_offset("name", &summary, HeaderField::NameOffset, data.len())?;
        let names = NameTable::parse(&data, name_offset, summary.get_usize(HeaderField::NameCount))?;
        let names_end = name_offset + names.byte_len();

        let import_offset = table_offset("import", &summary, HeaderField::ImportOffset, data.len())?;
        if import_offset < names_end {
            return Err(Error::TableOverlap {
                names_end,
                imports_start: import_offset,
            });
        }
        let imports = parse_imports(&data, import_offset, summary.get_usize(HeaderField::ImportCount))?;
        let imports_end = import_offset + imports.len() * IMPORT_ENTRY_SIZE;

        let exports = scan_exports(
            &data,
            summary.get(HeaderField::ExportOffset).unwrap_or_default(),
            summary.get_usize(HeaderField::ExportCount),
        );

        let layout = vec![
            Segment::Raw(data[summary_end..name_offset].to_vec()),
            Segment::Names,
            Segment::Raw(data[names_end..import_offset].to_vec()),
            Segment::Imports,
            Segment::Raw(data[imports_end..].to_vec()),
        ];

        tracing::debug!(
            "Loaded package: {} names, {} imports, {} exports",
            names.len(),
            imports.len(),
            exports.len()
        );

        Ok(Self {
            header: summary,
            names,
            imports,
            exports,
            layout,
            payload,
            mutations: Vec::new(),
        })
    }

    /// Serialize the header file. Unmodified assets reproduce their input exactly.
    ///
    /// # Errors
    /// Returns an error only if an in-memory write fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = self.header.to_bytes()?;
        for segment in &self.layout {
            match segment {
                Segment::Raw(bytes) => out.extend_from_slice(bytes),
                Segment::Names => self.names.write_to(&mut out),
                Segment::Imports => {
                    for import in &self.imports {
                        import.write_to(&mut out)?;
                    }
                }
            }
        }
        Ok(out)
    }

    // ==================== Names ====================

    /// Exact, case-sensitive lookup.
    #[must_use]
    pub fn find_name(&self, text: &str) -> Option<usize> {
        self.names.find(text)
    }

    /// Return the index of `text`, appending it to the name table if missing.
    ///
    /// Adding a name that already exists changes nothing.
    pub fn add_name(&mut self, text: &str) -> Result<usize> {
        if let Some(index) = self.names.find(text) {
            return Ok(index);
        }

        let entry = NameEntry::new(text)?;
        let event = Relocation {
            at: self.name_table_end(),
            len: entry.encoded_len(),
        };
        let index = self.names.push(entry);
        self.header.set(HeaderField::NameCount, self.names.len() as i64);
        self.record(event, HeaderField::NameOffset);

        tracing::debug!("Added name [{}] {}", index, text);
        Ok(index)
    }

    /// Strict name resolution.
    ///
    /// # Errors
    /// Returns [`Error::UnresolvedNameIndex`] if `index` is outside the table.
    pub fn name(&self, index: i64) -> Result<&str> {
        self.names
            .get(index)
            .map(NameEntry::text)
            .ok_or(Error::UnresolvedNameIndex(index))
    }

    /// Display resolution; out-of-range indices become `idx_<n>`.
    #[must_use]
    pub fn resolve_name(&self, index: i64) -> Cow<'_, str> {
        self.names.resolve(index)
    }

    #[must_use]
    pub fn names(&self) -> &[NameEntry] {
        self.names.entries()
    }

    // ==================== Imports ====================

    /// Append an import and return its negative reference index.
    ///
    /// The three names are added first. Each of those insertions may move the
    /// import table, so the insertion point is read only afterwards.
    pub fn add_import(
        &mut self,
        class_package: &str,
        class_name: &str,
        object_name: &str,
        outer_index: i32,
    ) -> Result<i32> {
        let class_package = self.add_name(class_package)?;
        let class_name = self.add_name(class_name)?;
        let object_name = self.add_name(object_name)?;

        let entry = ImportEntry {
            class_package: class_package as i64,
            class_name: class_name as i64,
            outer_index,
            object_name: object_name as i32,
            object_name_number: 0,
        };
        let event = Relocation {
            at: self.import_table_end(),
            len: IMPORT_ENTRY_SIZE,
        };
        self.imports.push(entry);
        self.header.set(HeaderField::ImportCount, self.imports.len() as i64);
        self.record(event, HeaderField::ImportOffset);

        let reference = import_reference(self.imports.len() - 1);
        tracing::debug!(
            "Added import [{}] {}",
            reference,
            self.resolve_name(entry.object_name.into())
        );
        Ok(reference)
    }

    /// Find an existing import by its resolved names.
    #[must_use]
    pub fn find_import(&self, class_package: &str, class_name: &str, object_name: &str) -> Option<i32> {
        self.imports
            .iter()
            .position(|import| {
                self.resolve_name(import.class_package) == class_package
                    && self.resolve_name(import.class_name) == class_name
                    && self.resolve_name(import.object_name.into()) == object_name
            })
            .map(import_reference)
    }

    /// Look up an import by negative reference index.
    #[must_use]
    pub fn import(&self, reference: i32) -> Option<&ImportEntry> {
        import_position(reference).and_then(|i| self.imports.get(i))
    }

    #[must_use]
    pub fn imports(&self) -> &[ImportEntry] {
        &self.imports
    }

    /// Imports with names resolved for display.
    #[must_use]
    pub fn resolved_imports(&self) -> Vec<ResolvedImport<'_>> {
        self.imports
            .iter()
            .enumerate()
            .map(|(i, import)| ResolvedImport {
                index: import_reference(i),
                class_package: self.resolve_name(import.class_package),
                class_name: self.resolve_name(import.class_name),
                object_name: self.resolve_name(import.object_name.into()),
                outer_index: import.outer_index,
            })
            .collect()
    }

    // ==================== Exports ====================

    /// Exports found by the best-effort scan.
    #[must_use]
    pub fn exports(&self) -> &[ExportEntry] {
        &self.exports
    }

    /// Object name of export `index` (0-based), for diagnostics.
    #[must_use]
    pub fn export_name(&self, index: usize) -> Option<Cow<'_, str>> {
        self.exports
            .get(index)
            .map(|export| self.resolve_name(export.object_name.into()))
    }

    /// Number of scanned exports whose serial offset lies behind an insertion.
    ///
    /// Export records are not relocated, so a non-zero value means the
    /// payload offsets stored in them no longer line up.
    #[must_use]
    pub fn stale_export_offsets(&self) -> usize {
        let Some(first) = self.mutations.iter().map(|m| m.at as i64).min() else {
            return 0;
        };
        self.exports
            .iter()
            .filter(|export| export.serial_offset >= first)
            .count()
    }

    // ==================== Accessors ====================

    #[must_use]
    pub fn header(&self) -> &PackageHeader {
        &self.header
    }

    /// Companion payload, passed through unmodified.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Insertions performed since load, in order.
    #[must_use]
    pub fn mutations(&self) -> &[Relocation] {
        &self.mutations
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        !self.mutations.is_empty()
    }

    /// Counts plus the first `limit` names.
    #[must_use]
    pub fn summary(&self, limit: usize) -> AssetSummary {
        AssetSummary {
            name_count: self.header.get_usize(HeaderField::NameCount),
            import_count: self.header.get_usize(HeaderField::ImportCount),
            export_count: self.header.get_usize(HeaderField::ExportCount),
            first_names: self
                .names
                .entries()
                .iter()
                .take(limit)
                .map(|n| n.text().to_string())
                .collect(),
        }
    }

    // ==================== Internals ====================

    fn name_table_end(&self) -> usize {
        self.header.get_usize(HeaderField::NameOffset) + self.names.byte_len()
    }

    fn import_table_end(&self) -> usize {
        self.header.get_usize(HeaderField::ImportOffset) + self.imports.len() * IMPORT_ENTRY_SIZE
    }

    fn record(&mut self, event: Relocation, grown: HeaderField) {
        relocate(&mut self.header, event, grown);
        self.mutations.push(event);
    }
}

/// Validate a table offset against the header file bounds.
fn table_offset(table: &'static str, header: &PackageHeader, field: HeaderField, size: usize) -> Result<usize> {
    let offset = header.get(field).unwrap_or_default();
    usize::try_from(offset)
        .ok()
        .filter(|o| (header.size()..=size).contains(o))
        .ok_or(Error::TableOutOfRange { table, offset, size })
}
