// src/file.rs

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{Error, Result};
use crate::config::options::{ExportOptions, ExportType};
use crate::core::sanitize::sanitize_filename;
use crate::csv::to_export_string;

/// Write a single export file based on ExportOptions.
/// Returns the final path written to.
pub fn write_export_single(
    export: &ExportOptions,
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
) -> Result<PathBuf> {
    let path = export.out_path();
    ensure_parent(&path)?;

    let contents = to_export_string(headers, rows, export.include_headers, export.delimiter());
    fs::write(&path, contents)?;
    Ok(path)
}

/// Write one file per institution into the directory implied by
/// `export.out_path()` (a directory when `export_type == PerInstitution`).
/// `inst_col` is the column holding the institution name.
pub fn write_export_per_institution(
    export: &ExportOptions,
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
    inst_col: usize,
) -> Result<Vec<PathBuf>> {
    let outdir = export.out_path();
    ensure_directory(&outdir)?;

    // Group rows, keeping first-seen institution order
    let mut order: Vec<String> = Vec::new();
    let mut by_inst: HashMap<String, Vec<Vec<String>>> = HashMap::new();
    for r in rows {
        if let Some(inst) = r.get(inst_col) {
            if !by_inst.contains_key(inst) {
                order.push(inst.clone());
            }
            by_inst.entry(inst.clone()).or_default().push(r.clone());
        }
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::with_capacity(order.len());
    let ext = export.format.ext();

    for (idx, inst) in order.iter().enumerate() {
        let inst_rows = &by_inst[inst];
        let stem = sanitize_filename(inst, idx);
        let path = resolve_unique_filename(&outdir, &stem, &mut seen, ext);

        let contents = to_export_string(headers, inst_rows, export.include_headers, export.delimiter());
        fs::write(&path, contents)?;
        written.push(path);
    }

    Ok(written)
}

/// Dispatch on the export type.
pub fn export_dataset(
    export: &ExportOptions,
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
    inst_col: Option<usize>,
) -> Result<Vec<PathBuf>> {
    match (export.export_type, inst_col) {
        (ExportType::PerInstitution, Some(col)) => write_export_per_institution(export, headers, rows, col),
        _ => write_export_single(export, headers, rows).map(|p| vec![p]),
    }
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Ensure the parent directory of a file path exists.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

/// Duplicate handling **only within this run**
pub fn resolve_unique_filename(
    dir: &Path,
    stem: &str,                        // already sanitized, no extension
    seen_names: &mut HashMap<String, usize>,
    ext: &str,                         // "csv" | "tsv"
) -> PathBuf {
    let count = seen_names.entry(stem.to_string()).or_insert(0);

    // First occurrence: "<stem>.ext"
    // Subsequent:       "<stem> (N).ext" with N starting at 2
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };

    *count += 1;
    dir.join(filename)
}

/// File stem as an owned String ("" when there is none).
pub fn stem_of(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_stems_get_numbered() {
        let mut seen = HashMap::new();
        let dir = Path::new("out");
        assert_eq!(resolve_unique_filename(dir, "UW", &mut seen, "csv"), dir.join("UW.csv"));
        assert_eq!(resolve_unique_filename(dir, "UW", &mut seen, "csv"), dir.join("UW (2).csv"));
        assert_eq!(resolve_unique_filename(dir, "UJ", &mut seen, "tsv"), dir.join("UJ.tsv"));
    }

    #[test]
    fn ensure_directory_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let f = dir.path().join("x");
        fs::write(&f, "").unwrap();
        assert!(matches!(ensure_directory(&f), Err(Error::NotADirectory(_))));
    }
}
