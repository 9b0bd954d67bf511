// src/csv.rs
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::{Result, file::ensure_parent, store::DataSet};

/* ---------------- Reading ---------------- */

/// Read a whole delimited file; the first record is the header row.
/// Ragged rows are padded to the header width.
pub fn read_dataset(path: &Path, delim: u8) -> Result<DataSet> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delim)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let width = headers.len();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.len() < width {
            row.resize(width, s!());
        }
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        rows.push(row);
    }

    logd!("CSV: read {} rows x {} cols from {}", rows.len(), width, path.display());
    Ok(DataSet { headers: Some(headers), rows })
}

pub fn read_csv(path: &Path) -> Result<DataSet> {
    read_dataset(path, b',')
}

/* ---------------- Writing ---------------- */

/// Write header (optional) + rows to any writer.
pub fn write_rows<W: Write>(
    w: W,
    headers: Option<&[String]>,
    rows: &[Vec<String>],
    delim: u8,
) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delim)
        .flexible(true)
        .from_writer(w);
    if let Some(h) = headers {
        wtr.write_record(h)?;
    }
    for r in rows {
        wtr.write_record(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Create/truncate `path` (parents included) and write the table.
pub fn write_dataset(path: &Path, ds: &DataSet, delim: u8) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path)?;
    write_rows(io::BufWriter::new(file), ds.headers.as_deref(), &ds.rows, delim)
}

pub fn write_csv(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path)?;
    write_rows(io::BufWriter::new(file), Some(headers), rows, b',')
}

/// Create a full export string (Copy/Export) from a table and toggles.
pub fn to_export_string(
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
    include_headers: bool,
    delim: u8,
) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let h = if include_headers { headers.as_deref() } else { None };
    if let Err(e) = write_rows(&mut buf, h, rows, delim) {
        loge!("Export: serialising rows failed: {e}");
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}
