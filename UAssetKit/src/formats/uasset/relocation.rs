//! Offset relocation
//!
//! Every insertion into the header file goes through [`relocate`], which
//! shifts each summary offset located after the inserted bytes. The format has
//! no checksum, so a missed field only shows up when the engine misreads the
//! file; [`TRACKED_OFFSETS`] must list every offset the summary carries.

use serde::Serialize;

use super::header::{HeaderField, PackageHeader};

/// Every summary field holding an absolute position in the package, in the
/// order the tables they point at appear in the file.
///
/// `TotalHeaderSize` is the end of the header file and `BulkDataStartOffset`
/// points into the payload after it. Counts are not listed; they never shift.
pub const TRACKED_OFFSETS: [HeaderField; 13] = [
    HeaderField::NameOffset,
    HeaderField::GatherableTextDataOffset,
    HeaderField::ImportOffset,
    HeaderField::ExportOffset,
    HeaderField::DependsOffset,
    HeaderField::SoftPackageReferencesOffset,
    HeaderField::SearchableNamesOffset,
    HeaderField::ThumbnailTableOffset,
    HeaderField::AssetRegistryDataOffset,
    HeaderField::WorldTileInfoDataOffset,
    HeaderField::PreloadDependencyOffset,
    HeaderField::TotalHeaderSize,
    HeaderField::BulkDataStartOffset,
];

/// Position of `field` in [`TRACKED_OFFSETS`].
fn file_order(field: HeaderField) -> Option<usize> {
    TRACKED_OFFSETS.iter().position(|f| *f == field)
}

/// Whether a field sitting exactly at the insertion point lies behind the
/// grown table. Empty tables share their start with their neighbours, so
/// only the file order tells them apart.
pub(crate) fn follows(field: HeaderField, grown: HeaderField) -> bool {
    match (file_order(field), file_order(grown)) {
        (Some(field), Some(grown)) => field > grown,
        _ => false,
    }
}

/// One insertion: `len` bytes spliced in at absolute position `at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Relocation {
    pub at: usize,
    pub len: usize,
}

/// Shift every tracked offset after `event.at` by `event.len`.
///
/// `grown` is the start offset of the table that received the bytes. An
/// offset equal to the insertion point is shifted only when its table comes
/// after `grown` in file order; empty tables placed before it stay put.
///
/// Returns the number of fields changed.
pub(crate) fn relocate(header: &mut PackageHeader, event: Relocation, grown: HeaderField) -> usize {
    let at = event.at as i64;
    let len = event.len as i64;
    let mut shifted = 0;

    for field in TRACKED_OFFSETS {
        let Some(value) = header.get(field) else {
            continue;
        };
        if value > at || (value == at && follows(field, grown)) {
            header.set(field, value + len);
            tracing::trace!("{}: {} -> {}", field.name(), value, value + len);
            shifted += 1;
        }
    }

    tracing::debug!(
        "Inserted {} bytes at {}, shifted {} offsets",
        event.len,
        event.at,
        shifted
    );
    shifted
}
