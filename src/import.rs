//! One-time bulk import from the per-range source JSON files.
//!
//! Each `*.json` file in the source directory holds either an array of
//! entries or a single entry object. Files are read in name order; files
//! whose name contains `copy` are editor leftovers and are skipped.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::database::WordRepository;
use crate::error::{DictionaryError, Result};
use crate::models::NewEntry;

/// Summary of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub files: usize,
    pub inserted: usize,
    pub skipped: usize,
}

/// Source files to import, sorted by name.
pub fn source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let is_copy = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.to_lowercase().contains("copy"));
        if path.is_file() && is_json && !is_copy {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse one source file into entries.
pub fn read_entries(path: &Path) -> Result<Vec<NewEntry>> {
    let content = std::fs::read_to_string(path)?;
    let json: Value = serde_json::from_str(&content).map_err(|e| DictionaryError::Import {
        file: path.display().to_string(),
        message: e.to_string(),
    })?;

    let values = match json {
        Value::Array(values) => values,
        object @ Value::Object(_) => vec![object],
        _ => {
            return Err(DictionaryError::Import {
                file: path.display().to_string(),
                message: "expected an array of entries or a single entry object".to_string(),
            })
        }
    };

    values
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).map_err(|e| DictionaryError::Import {
                file: path.display().to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Import every source file in `dir`; optionally clear the table first.
///
/// All files are parsed before anything is written, so a malformed file
/// leaves the table untouched.
pub async fn import_directory(
    repo: &WordRepository,
    dir: &Path,
    clear_first: bool,
) -> Result<ImportReport> {
    let files = source_files(dir)?;
    if files.is_empty() {
        warn!(dir = %dir.display(), "No JSON source files found");
    }

    let parsed = files
        .iter()
        .map(|file| read_entries(file).map(|entries| (file, entries)))
        .collect::<Result<Vec<_>>>()?;

    if clear_first {
        repo.clear().await?;
    }

    let mut report = ImportReport::default();
    for (file, entries) in &parsed {
        let inserted = repo.insert_batch(entries).await?;
        info!(file = %file.display(), inserted, "Imported source file");

        report.files += 1;
        report.inserted += inserted;
        report.skipped += entries.len() - inserted;
    }

    info!(
        files = report.files,
        inserted = report.inserted,
        skipped = report.skipped,
        "Import complete"
    );
    Ok(report)
}
