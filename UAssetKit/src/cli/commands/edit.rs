//! CLI commands for adding names and imports

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{DISK, GEAR, LOOKING_GLASS, print_done, print_step};
use crate::formats::uasset::{PatchPlan, read_uasset, write_uasset};

/// Add one or more names
pub fn add_names(path: &Path, names: &[String], output: &Path) -> anyhow::Result<()> {
    let mut asset = read_uasset(path)?;

    for name in names {
        let existed = asset.find_name(name).is_some();
        let index = asset.add_name(name)?;
        let status = if existed { "Found" } else { "Added" };
        println!("{status} name [{index}]: {name}");
    }

    write_uasset(&asset, output)?;
    println!("Saved: {}", output.display());
    Ok(())
}

/// Add a single import
pub fn add_import(
    path: &Path,
    class_package: &str,
    class_name: &str,
    object_name: &str,
    outer: i32,
    output: &Path,
) -> anyhow::Result<()> {
    let mut asset = read_uasset(path)?;

    if let Some(existing) = asset.find_import(class_package, class_name, object_name) {
        println!("Import already present for {object_name} (index: {existing})");
    } else {
        let index = asset.add_import(class_package, class_name, object_name, outer)?;
        println!("Added import for {object_name} (index: {index})");
    }

    write_uasset(&asset, output)?;
    println!("Saved: {}", output.display());
    Ok(())
}

/// Apply a patch plan
pub fn patch(path: &Path, plan_path: &Path, output: &Path, json: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let plan = PatchPlan::load(plan_path)?;

    if !json {
        print_step(1, 3, &LOOKING_GLASS, &format!("Reading {}...", path.display()));
    }
    let mut asset = read_uasset(path)?;
    let before = asset.summary(0);

    if !json {
        print_step(2, 3, &GEAR, "Adding names and imports...");
    }
    let report = plan.apply(&mut asset)?;

    if json {
        write_uasset(&asset, output)?;
        verify(&plan, output)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for step in &report.names {
        let status = if step.added { "Added" } else { "Found" };
        println!("    {status} name [{}]: {}", step.index, step.label);
    }
    for step in &report.imports {
        let status = if step.added { "Added" } else { "Found" };
        println!("    {status} import [{}]: {}", step.index, step.label);
    }

    print_step(3, 3, &DISK, &format!("Writing {}...", output.display()));
    write_uasset(&asset, output)?;
    verify(&plan, output)?;
    println!("    Verified {} names and {} imports in output", plan.names.len(), plan.imports.len());

    let after = asset.summary(0);
    println!(
        "    Names: {} -> {}, Imports: {} -> {}",
        before.name_count, after.name_count, before.import_count, after.import_count
    );
    print_done(start.elapsed());
    Ok(())
}

/// Reload a written asset and check every plan entry made it in.
fn verify(plan: &PatchPlan, output: &Path) -> anyhow::Result<()> {
    let written = read_uasset(output)?;
    let missing = plan.missing(&written);
    if !missing.is_empty() {
        anyhow::bail!("{} missing from {}: {}", missing.len(), output.display(), missing.join(", "));
    }
    Ok(())
}
