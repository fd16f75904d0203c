//! CLI commands for inspecting package assets

use std::path::Path;

use crate::formats::uasset::{HeaderField, read_uasset};

/// Print the asset summary
pub fn info(path: &Path, limit: usize, json: bool) -> anyhow::Result<()> {
    let asset = read_uasset(path)?;
    let summary = asset.summary(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let header = asset.header();
    println!("File: {}", path.display());
    println!("UE4 version: {} (licensee {})", header.file_version_ue4, header.file_version_licensee);
    println!("Package flags: {:#010X}", header.package_flags);
    println!("Names: {}", summary.name_count);
    println!("Imports: {}", summary.import_count);
    println!("Exports: {}", summary.export_count);
    if let Some(payload) = asset.payload() {
        println!("Payload (.uexp): {} bytes", payload.len());
    }

    println!();
    println!("Summary fields:");
    for (field, value) in header.fields() {
        if field != HeaderField::NameCount {
            println!("  {:<28} {value}", field.name());
        }
    }

    println!();
    println!("First {} names:", summary.first_names.len());
    for (i, name) in summary.first_names.iter().enumerate() {
        println!("  [{i}] {name}");
    }

    Ok(())
}

/// List the name table
pub fn names(path: &Path, filter: Option<&str>) -> anyhow::Result<()> {
    let asset = read_uasset(path)?;
    let filter = filter.map(str::to_lowercase);

    for (i, entry) in asset.names().iter().enumerate() {
        if let Some(f) = &filter
            && !entry.text().to_lowercase().contains(f.as_str())
        {
            continue;
        }
        let encoding = if entry.is_wide() { " (utf-16)" } else { "" };
        println!("[{i}] {}{encoding}", entry.text());
    }

    Ok(())
}

/// List imports with resolved names
pub fn imports(path: &Path, json: bool) -> anyhow::Result<()> {
    let asset = read_uasset(path)?;
    let imports = asset.resolved_imports();

    if json {
        println!("{}", serde_json::to_string_pretty(&imports)?);
        return Ok(());
    }

    if imports.is_empty() {
        println!("No imports");
    }
    for import in &imports {
        println!(
            "[{}] {} {}.{} (outer {})",
            import.index, import.class_name, import.class_package, import.object_name, import.outer_index
        );
    }

    Ok(())
}

/// List scanned exports
pub fn exports(path: &Path) -> anyhow::Result<()> {
    let asset = read_uasset(path)?;
    let declared = asset.header().get_usize(HeaderField::ExportCount);

    for (i, export) in asset.exports().iter().enumerate() {
        let name = asset.export_name(i).unwrap_or_default();
        println!(
            "[{}] {} class={} outer={} size={} offset={}",
            i + 1,
            name,
            export.class_index,
            export.outer_index,
            export.serial_size,
            export.serial_offset
        );
    }
    if asset.exports().len() < declared {
        println!("(scan stopped after {} of {} exports)", asset.exports().len(), declared);
    }

    Ok(())
}
