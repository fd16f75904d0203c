//! Patch plans
//!
//! A TOML file listing names and imports to add to an asset:
//!
//! ```toml
//! names = ["InventorySort", "SortItems"]
//!
//! [[imports]]
//! class_package = "/Game/UI/UMG_SortSelectionPicker"
//! class_name = "WidgetBlueprintGeneratedClass"
//! object_name = "UMG_SortSelectionPicker_C"
//! ```
//!
//! Names are applied before imports. Re-applying a plan to its own output
//! changes nothing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::UAsset;
use crate::error::Result;

/// Names and imports to add.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchPlan {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub imports: Vec<ImportSpec>,
}

/// One import to add, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    pub class_package: String,
    pub class_name: String,
    pub object_name: String,
    #[serde(default)]
    pub outer_index: i32,
}

/// Outcome of one plan step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchStep {
    pub label: String,
    /// Name index, or negative import index.
    pub index: i64,
    /// False when the entry already existed.
    pub added: bool,
}

/// What [`PatchPlan::apply`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    pub names: Vec<PatchStep>,
    pub imports: Vec<PatchStep>,
}

impl PatchReport {
    /// Number of entries actually inserted.
    #[must_use]
    pub fn added(&self) -> usize {
        self.names.iter().chain(&self.imports).filter(|s| s.added).count()
    }
}

impl PatchPlan {
    /// Parse a plan from TOML text.
    ///
    /// # Errors
    /// Returns [`Error::PlanParse`](crate::Error::PlanParse) on malformed TOML.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a plan from a TOML file.
    ///
    /// # Errors
    /// Returns an IO or parse error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply the plan: all names first, then each import not already present.
    ///
    /// # Errors
    /// Propagates insertion errors from the asset.
    pub fn apply(&self, asset: &mut UAsset) -> Result<PatchReport> {
        let mut report = PatchReport::default();

        for name in &self.names {
            let existed = asset.find_name(name).is_some();
            let index = asset.add_name(name)?;
            report.names.push(PatchStep {
                label: name.clone(),
                index: index as i64,
                added: !existed,
            });
        }

        for spec in &self.imports {
            let existing = asset.find_import(&spec.class_package, &spec.class_name, &spec.object_name);
            let index = match existing {
                Some(index) => index,
                None => asset.add_import(
                    &spec.class_package,
                    &spec.class_name,
                    &spec.object_name,
                    spec.outer_index,
                )?,
            };
            report.imports.push(PatchStep {
                label: format!("{}.{}", spec.class_package, spec.object_name),
                index: i64::from(index),
                added: existing.is_none(),
            });
        }

        tracing::info!(
            "Applied patch plan: {} of {} entries added",
            report.added(),
            report.names.len() + report.imports.len()
        );
        Ok(report)
    }

    /// Entries of the plan that `asset` does not contain, by label.
    ///
    /// Empty once the plan has been applied; used to check a written file.
    #[must_use]
    pub fn missing(&self, asset: &UAsset) -> Vec<String> {
        let names = self
            .names
            .iter()
            .filter(|name| asset.find_name(name).is_none())
            .cloned();
        let imports = self
            .imports
            .iter()
            .filter(|spec| {
                asset
                    .find_import(&spec.class_package, &spec.class_name, &spec.object_name)
                    .is_none()
            })
            .map(|spec| format!("{}.{}", spec.class_package, spec.object_name));
        names.chain(imports).collect()
    }
}
