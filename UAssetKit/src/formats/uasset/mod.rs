//! Package asset (`.uasset`) structural editor
//!
//! Parses the package summary, name table, import table and (read-only) export
//! table of a cooked asset, appends names and imports, and keeps every summary
//! offset consistent. The export payload in the companion `.uexp` is never
//! decoded.
//!
//! ```no_run
//! use uassetkit::formats::uasset::{read_uasset, write_uasset};
//!
//! let mut asset = read_uasset("UMG_InventoryHUD.uasset")?;
//! let picker = asset.add_import(
//!     "/Game/UI/UMG_SortSelectionPicker",
//!     "WidgetBlueprintGeneratedClass",
//!     "UMG_SortSelectionPicker_C",
//!     0,
//! )?;
//! println!("import index {picker}");
//! write_uasset(&asset, "out/UMG_InventoryHUD.uasset")?;
//! # Ok::<(), uassetkit::Error>(())
//! ```

pub mod codec;
mod document;
mod exports;
mod header;
mod imports;
mod names;
mod plan;
mod reader;
mod relocation;
mod writer;

#[cfg(test)]
mod fixture;

pub use document::{AssetSummary, UAsset};
pub use exports::{EXPORT_SCAN_STRIDE, ExportEntry};
pub use header::{HeaderField, PackageHeader, VER_UE4_SERIALIZE_TEXT_IN_PACKAGES};
pub use imports::{IMPORT_ENTRY_SIZE, ImportEntry, ResolvedImport, import_position, import_reference};
pub use names::{NameEntry, name_hash};
pub use plan::{ImportSpec, PatchPlan, PatchReport, PatchStep};
pub use reader::{companion_path, parse_uasset_bytes, read_uasset};
pub use relocation::{Relocation, TRACKED_OFFSETS};
pub use writer::{serialize_uasset, write_uasset};

/// Package file tag at offset 0.
pub const PACKAGE_FILE_TAG: u32 = 0x9E2A_83C1;
