//! File format handlers

pub mod uasset;

// Re-export main document types
pub use uasset::{PatchPlan, UAsset, read_uasset, write_uasset};
