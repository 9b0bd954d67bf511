// src/roster/sheets.rs
//
// Curated institution sheets: `<institutions>/<uni>/names.{xlsx,csv}` with
// at least `fullname`, plus `orcid` and `Checked` once someone has been
// through them.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{Reader, open_workbook_auto};

use crate::{
    Error, Result,
    config::consts::SHEET_STEM,
    core::sanitize::cell,
    csv::read_csv,
    store::{DataSet, field},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetRow {
    pub fullname: String,
    pub orcid: Option<String>,
    /// `None` when the cell is blank or the column is missing.
    pub checked: Option<bool>,
}

fn parse_checked(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

/// First worksheet as a table; the first row is the header.
fn read_workbook(path: &Path) -> Result<DataSet> {
    let mut wb = open_workbook_auto(path)?;
    let range = wb
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Other(join!("No worksheet in ", &path.display().to_string())))??;

    let mut rows = range.rows().map(|r| r.iter().map(|c| c.to_string()).collect::<Vec<String>>());
    let headers: Vec<String> = rows
        .next()
        .unwrap_or_default()
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();
    let rows: Vec<Vec<String>> = rows.filter(|r| r.iter().any(|c| !c.trim().is_empty())).collect();

    logd!("Sheet: read {} rows from {}", rows.len(), path.display());
    Ok(DataSet { headers: Some(headers), rows })
}

pub fn read_sheet(path: &Path) -> Result<Vec<SheetRow>> {
    let is_csv = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let ds = if is_csv { read_csv(path)? } else { read_workbook(path)? };

    let c_name = ds.require("fullname", path)?;
    let c_orcid = ds.column("orcid");
    let c_checked = ds.column("Checked");

    Ok(ds
        .rows
        .iter()
        .filter_map(|r| {
            let fullname = cell(field(r, Some(c_name)))?;
            Some(SheetRow {
                fullname,
                orcid: cell(field(r, c_orcid)),
                checked: parse_checked(field(r, c_checked)),
            })
        })
        .collect())
}

/// `names.xlsx` wins over `names.csv` when both exist.
pub fn find_sheet(dir: &Path) -> Option<PathBuf> {
    ["xlsx", "csv"]
        .iter()
        .map(|ext| dir.join(join!(SHEET_STEM, ".", ext)))
        .find(|p| p.is_file())
}

/// Sorted names of the subdirectories that hold a sheet.
pub fn list_institutions(institutions_dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(institutions_dir)? {
        let path = entry?.path();
        if path.is_dir() && find_sheet(&path).is_some() {
            if let Some(name) = path.file_name() {
                names.push(name.to_string_lossy().into_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_accepts_spreadsheet_spellings() {
        assert_eq!(parse_checked("1"), Some(true));
        assert_eq!(parse_checked("1.0"), Some(true));
        assert_eq!(parse_checked("TRUE"), Some(true));
        assert_eq!(parse_checked("0.0"), Some(false));
        assert_eq!(parse_checked(""), None);
        assert_eq!(parse_checked("maybe"), None);
    }

    #[test]
    fn csv_sheet_rows_and_listing() {
        let dir = tempfile::tempdir().unwrap();
        let uni = dir.path().join("UW");
        fs::create_dir_all(&uni).unwrap();
        fs::create_dir_all(dir.path().join("empty")).unwrap();
        fs::write(
            uni.join("names.csv"),
            "fullname,orcid,Checked\nJan Kowalski,https://orcid.org/0000-0001-2345-6789,1\n,,\nEwa Nowak,nan,0\nOla Lis,,\n",
        )
        .unwrap();

        assert_eq!(list_institutions(dir.path()).unwrap(), strs!["UW"]);
        assert_eq!(find_sheet(&uni), Some(uni.join("names.csv")));

        let rows = read_sheet(&uni.join("names.csv")).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].checked, Some(true));
        assert_eq!(rows[1].orcid, None);
        assert_eq!(rows[1].checked, Some(false));
        assert_eq!(rows[2].checked, None);
    }
}
