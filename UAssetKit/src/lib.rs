//! # UAssetKit
//!
//! A pure-Rust library for editing the structural tables of cooked Unreal
//! Engine 4 package assets.
//!
//! ## Supported Operations
//!
//! - **Load** a `.uasset` header file (and pass its `.uexp` payload through)
//! - **Query** names, imports and exports
//! - **Append** names and imports, with every summary offset relocated
//! - **Write** the result back, byte-identical wherever nothing changed
//!
//! ## Quick Start
//!
//! ```no_run
//! use uassetkit::prelude::*;
//!
//! let mut asset = read_uasset("UMG_InventoryHUD.uasset")?;
//! let index = asset.add_name("InventorySort")?;
//! assert_eq!(asset.find_name("InventorySort"), Some(index));
//!
//! let summary = asset.summary(20);
//! println!("{} names, {} imports", summary.name_count, summary.import_count);
//!
//! write_uasset(&asset, "patched/UMG_InventoryHUD.uasset")?;
//! # Ok::<(), uassetkit::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `uassetkit` command-line binary

pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::uasset::{
        AssetSummary, HeaderField, ImportEntry, NameEntry, PatchPlan, PatchReport, UAsset,
        parse_uasset_bytes, read_uasset, write_uasset,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
