// src/roster/mod.rs
pub mod author;
pub mod enrich;
pub mod radon;
pub mod sheets;
pub mod split;

use std::path::Path;

pub use author::Author;
pub use enrich::enrich;
pub use radon::{RadonRow, build_authors, normalize_institution, read_radon_export};
pub use sheets::{SheetRow, find_sheet, list_institutions, read_sheet};
pub use split::{Evaluation, Institution, RosterSplit, read_evaluation, select_evaluated, split, write_split};

use crate::{Result, core::sanitize::cell, csv::{read_csv, write_csv}, store::field};

pub const AUTHOR_HEADERS: [&str; 13] = [
    "id",
    "name",
    "second_name",
    "pre_surname",
    "surname",
    "main_job",
    "fullname",
    "Aid",
    "declared_discipline",
    "degree",
    "degree_year",
    "orcid",
    "alternative_names",
];

const ALT_SEP: char = ';';

pub fn author_headers() -> Vec<String> {
    AUTHOR_HEADERS.iter().map(|h| s!(*h)).collect()
}

/// One table row per author, in `AUTHOR_HEADERS` order.
pub fn author_row(a: &Author) -> Vec<String> {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    vec![
        a.radon_id.clone(),
        opt(&a.first_name),
        opt(&a.second_name),
        opt(&a.surname_prefix),
        opt(&a.surname),
        opt(&a.main_job),
        a.fullname.clone(),
        a.aid.clone(),
        opt(&a.disciplines),
        opt(&a.degree),
        opt(&a.degree_year),
        opt(&a.orcid),
        a.alternative_names.join(&ALT_SEP.to_string()),
    ]
}

pub fn write_authors(authors: &[Author], path: &Path) -> Result<()> {
    let rows: Vec<Vec<String>> = authors.iter().map(author_row).collect();
    write_csv(path, &author_headers(), &rows)?;
    logf!("Authors: wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn read_authors(path: &Path) -> Result<Vec<Author>> {
    let ds = read_csv(path)?;
    let c_id = ds.require("id", path)?;
    let c_fullname = ds.require("fullname", path)?;
    let c_aid = ds.require("Aid", path)?;
    let col = |name: &str| ds.column(name);
    let (c_first, c_second, c_prefix, c_surname) =
        (col("name"), col("second_name"), col("pre_surname"), col("surname"));
    let (c_main, c_disc, c_degree, c_degree_year) =
        (col("main_job"), col("declared_discipline"), col("degree"), col("degree_year"));
    let (c_orcid, c_alt) = (col("orcid"), col("alternative_names"));

    let authors: Vec<Author> = ds
        .rows
        .iter()
        .map(|r| Author {
            radon_id: s!(field(r, Some(c_id)).trim()),
            aid: s!(field(r, Some(c_aid)).trim()),
            first_name: cell(field(r, c_first)),
            second_name: cell(field(r, c_second)),
            surname_prefix: cell(field(r, c_prefix)),
            surname: cell(field(r, c_surname)),
            fullname: cell(field(r, Some(c_fullname))).unwrap_or_default(),
            main_job: cell(field(r, c_main)),
            disciplines: cell(field(r, c_disc)),
            degree: cell(field(r, c_degree)),
            degree_year: cell(field(r, c_degree_year)),
            orcid: cell(field(r, c_orcid)),
            alternative_names: field(r, c_alt).split(ALT_SEP).filter_map(cell).collect(),
        })
        .collect();

    logd!("Authors: read {} rows from {}", authors.len(), path.display());
    Ok(authors)
}
