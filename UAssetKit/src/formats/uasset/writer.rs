//! Package asset writing

use std::fs;
use std::path::Path;

use super::UAsset;
use super::reader::companion_path;
use crate::error::Result;

/// Write the header file to `path` and the payload, if any, next to it as `.uexp`.
///
/// # Errors
/// Returns [`Error::Io`](crate::Error::Io) if either file cannot be written.
pub fn write_uasset<P: AsRef<Path>>(asset: &UAsset, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = serialize_uasset(asset)?;
    fs::write(path, &bytes)?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), bytes.len());

    if let Some(payload) = asset.payload() {
        let uexp = companion_path(path)?;
        fs::write(&uexp, payload)?;
        tracing::info!("Wrote {} ({} bytes)", uexp.display(), payload.len());
    }
    Ok(())
}

/// Serialize the header file, warning when payload offsets went stale.
///
/// # Errors
/// Returns an error only if an in-memory write fails.
pub fn serialize_uasset(asset: &UAsset) -> Result<Vec<u8>> {
    let stale = asset.stale_export_offsets();
    if stale > 0 {
        tracing::warn!(
            "{} export serial offsets point past inserted bytes and were not relocated",
            stale
        );
    }
    asset.serialize()
}
