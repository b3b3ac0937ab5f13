//! Readers for the JSON side files that accompany model artifacts

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::domain::{DomainError, FertilizerTable, LabelMap, RemedyTable};

fn read(path: &Path) -> Result<String, DomainError> {
    fs::read_to_string(path)
        .map_err(|e| DomainError::validation(format!("Cannot read '{}': {}", path.display(), e)))
}

/// Reads a label file; an empty map counts as a failure
pub fn load_label_map(path: &Path) -> Result<LabelMap, DomainError> {
    let labels = LabelMap::from_json(&read(path)?)?;

    if labels.is_empty() {
        return Err(DomainError::validation(format!(
            "Label file '{}' contains no classes",
            path.display()
        )));
    }

    Ok(labels)
}

/// Reads the remedy table at `path`, or the built-in table when no path is set.
/// A file that cannot be read or parsed falls back to the built-in table.
pub fn load_remedy_table(path: Option<&Path>, default_remedy: &str) -> RemedyTable {
    let Some(path) = path else {
        return RemedyTable::builtin().with_default_remedy(default_remedy);
    };

    match read(path).and_then(|json| RemedyTable::from_json(&json, default_remedy)) {
        Ok(table) => {
            info!(path = %path.display(), entries = table.len(), "Loaded remedy table");
            table
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Using built-in remedy table");
            RemedyTable::builtin().with_default_remedy(default_remedy)
        }
    }
}

/// Reads a fertilizer table file, returning the error alongside the built-in
/// fallback so the caller can report it
pub fn load_fertilizer_table(path: Option<&Path>) -> (FertilizerTable, Option<DomainError>) {
    let Some(path) = path else {
        return (FertilizerTable::builtin(), None);
    };

    match read(path).and_then(|json| FertilizerTable::from_json(&json)) {
        Ok(table) => {
            info!(path = %path.display(), crops = table.len(), "Loaded fertilizer table");
            (table, None)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Using built-in fertilizer table");
            (FertilizerTable::builtin(), Some(e))
        }
    }
}
