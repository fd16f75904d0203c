//! Package asset reading
//!
//! A cooked asset is split into the header file (`.uasset`) and the export
//! payload (`.uexp`) next to it. Only the header file is parsed.

use std::fs;
use std::path::{Path, PathBuf};

use super::UAsset;
use crate::error::{Error, Result};

/// Path of the payload file that accompanies `path`.
///
/// # Errors
/// Returns [`Error::InvalidPath`] if `path` has no file name.
pub fn companion_path(path: &Path) -> Result<PathBuf> {
    if path.file_name().is_none() {
        return Err(Error::InvalidPath(path.to_path_buf()));
    }
    Ok(path.with_extension("uexp"))
}

/// Read a `.uasset` from disk, along with its `.uexp` when one exists.
///
/// # Errors
/// Returns [`Error::Io`] if the header file cannot be read, or any parse
/// error from [`UAsset::load`].
pub fn read_uasset<P: AsRef<Path>>(path: P) -> Result<UAsset> {
    let path = path.as_ref();
    let header = fs::read(path)?;

    let uexp = companion_path(path)?;
    let payload = if uexp.is_file() {
        Some(fs::read(&uexp)?)
    } else {
        None
    };

    tracing::info!(
        "Reading {} ({} bytes{})",
        path.display(),
        header.len(),
        if payload.is_some() { ", with .uexp" } else { "" }
    );
    UAsset::load(header, payload)
}

/// Parse a header file from bytes, without a payload.
///
/// # Errors
/// Returns any parse error from [`UAsset::load`].
pub fn parse_uasset_bytes(data: &[u8]) -> Result<UAsset> {
    UAsset::load(data.to_vec(), None)
}
