//! JSON file persistence
//!
//! Directory layouts:
//!
//! - legacy input: `patients.json`, `encounters.json`, `observations.json`,
//!   `medications.json`, each a JSON array
//! - resource output: `<ResourceType>.json` per type plus `bundle.json`
//! - report output: `validation_results.json` and `validation_summary.txt`

use crate::core::validation::{ResourceDefinitions, ResourceSet, ValidationReport};
use crate::domain::ids::ResourceType;
use crate::domain::legacy::{LegacyBatch, LegacyKind};
use crate::domain::{Bundle, BridgeError, ResourceCollections, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the transaction bundle
pub const BUNDLE_FILE: &str = "bundle.json";

/// File name of the machine-readable report
pub const RESULTS_FILE: &str = "validation_results.json";

/// File name of the plain-text report summary
pub const SUMMARY_FILE: &str = "validation_summary.txt";

/// Loads the four legacy collections from `dir`
///
/// # Errors
///
/// Returns [`BridgeError::MissingInput`] when any collection file is absent,
/// and [`BridgeError::Serialization`] when a file is not a JSON array of
/// records.
pub fn load_legacy_batch(dir: impl AsRef<Path>) -> Result<LegacyBatch> {
    let dir = dir.as_ref();

    let batch = LegacyBatch {
        patients: load_collection(dir, LegacyKind::Patient)?,
        encounters: load_collection(dir, LegacyKind::Encounter)?,
        observations: load_collection(dir, LegacyKind::Observation)?,
        medications: load_collection(dir, LegacyKind::Medication)?,
    };

    for kind in LegacyKind::ALL {
        tracing::info!(kind = %kind, count = batch.count(kind), "Loaded legacy records");
    }

    Ok(batch)
}

fn load_collection<T: DeserializeOwned>(dir: &Path, kind: LegacyKind) -> Result<Vec<T>> {
    let path = dir.join(format!("{}.json", kind.collection_name()));
    if !path.is_file() {
        return Err(BridgeError::MissingInput(format!(
            "Legacy {} file not found: {}",
            kind,
            path.display()
        )));
    }

    let text = fs::read_to_string(&path)?;
    serde_json::from_str(&text).map_err(|e| {
        BridgeError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Writes one pretty-printed JSON file per non-empty resource type
///
/// Returns the paths written, in [`ResourceType::ALL`] order.
pub fn write_resources(
    dir: impl AsRef<Path>,
    collections: &ResourceCollections,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for resource_type in ResourceType::ALL {
        let resources = collections.resources_of(resource_type);
        if resources.is_empty() {
            continue;
        }

        let path = resource_file(dir, resource_type);
        write_json(&path, &resources)?;
        tracing::info!(
            resource_type = %resource_type,
            count = resources.len(),
            path = %path.display(),
            "Saved resources"
        );
        written.push(path);
    }

    Ok(written)
}

/// Writes the transaction bundle to `dir/bundle.json`
pub fn write_bundle(dir: impl AsRef<Path>, bundle: &Bundle) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(BUNDLE_FILE);
    write_json(&path, bundle)?;
    tracing::info!(
        entries = bundle.entry.len(),
        path = %path.display(),
        "Saved transaction bundle"
    );

    Ok(path)
}

/// Loads resources to validate from `dir`
///
/// Per-type files win when any exists; `bundle.json` is read only when none
/// does, so a directory holding both is never counted twice. A per-type file
/// may hold an array of resources or a single resource.
///
/// # Errors
///
/// Returns [`BridgeError::MissingInput`] when the directory has neither, and
/// [`BridgeError::Serialization`] for malformed JSON.
pub fn load_resource_set(dir: impl AsRef<Path>) -> Result<ResourceSet> {
    let dir = dir.as_ref();
    let mut set = ResourceSet::new();
    let mut found_type_file = false;

    for resource_type in ResourceType::ALL {
        let path = resource_file(dir, resource_type);
        if !path.is_file() {
            continue;
        }
        found_type_file = true;

        let resources = match read_json(&path)? {
            Value::Array(resources) => resources,
            single => vec![single],
        };
        tracing::info!(
            resource_type = %resource_type,
            count = resources.len(),
            "Loaded resources"
        );
        set.extend(resource_type.as_str(), resources);
    }

    if found_type_file {
        return Ok(set);
    }

    let bundle_path = dir.join(BUNDLE_FILE);
    if bundle_path.is_file() {
        let set = ResourceSet::from_bundle(&read_json(&bundle_path)?);
        tracing::info!(count = set.len(), "Loaded resources from bundle");
        return Ok(set);
    }

    Err(BridgeError::MissingInput(format!(
        "No resource files or {} found in {}",
        BUNDLE_FILE,
        dir.display()
    )))
}

/// Writes `validation_results.json` and `validation_summary.txt` to `dir`
///
/// Returns the two paths in that order.
pub fn write_report(dir: impl AsRef<Path>, report: &ValidationReport) -> Result<(PathBuf, PathBuf)> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let results_path = dir.join(RESULTS_FILE);
    write_json(&results_path, report)?;

    let summary_path = dir.join(SUMMARY_FILE);
    fs::write(&summary_path, report.format_summary())?;

    tracing::info!(
        results = %results_path.display(),
        summary = %summary_path.display(),
        "Validation report written"
    );

    Ok((results_path, summary_path))
}

/// Reads a resource-definitions document
///
/// # Errors
///
/// Every failure, including an unreadable file, is a
/// [`BridgeError::Definitions`] error.
pub fn load_definitions(path: impl AsRef<Path>) -> Result<ResourceDefinitions> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        BridgeError::Definitions(format!(
            "Failed to read definitions file {}: {}",
            path.display(),
            e
        ))
    })?;

    ResourceDefinitions::from_json(&text)
}

fn resource_file(dir: &Path, resource_type: ResourceType) -> PathBuf {
    dir.join(format!("{}.json", resource_type.as_str()))
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| {
        BridgeError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text)?;
    Ok(())
}
