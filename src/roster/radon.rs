// src/roster/radon.rs
//
// Reading the registry (radon) export and folding its one-row-per-employment
// layout into one Author per researcher.

use std::collections::HashMap;
use std::path::Path;

use crate::{
    Result,
    config::consts::*,
    core::sanitize::cell,
    csv::read_csv,
    names::format_name,
    store::field,
};

use super::author::{Author, make_aid};

/// One employment row of the export.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RadonRow {
    pub id: String,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub surname_prefix: Option<String>,
    pub surname: Option<String>,
    /// Normalised (see `normalize_institution`).
    pub institution: String,
    pub main_job: bool,
    /// The main-job cell as exported (`Tak`/`Nie`).
    pub main_job_flag: String,
    pub disciplines: Option<String>,
    pub degree: Option<String>,
    pub degree_year: Option<String>,
}

/// `Uniwersytet im. Adama Mickiewicza w Poznaniu` -> `Uniwersytet_Adama_Mickiewicza_w_Poznaniu`
pub fn normalize_institution(name: &str) -> String {
    name.replace("im. ", "").replace("sp. z o.o. ", "").replace(' ', "_")
}

pub fn read_radon_export(path: &Path) -> Result<Vec<RadonRow>> {
    let ds = read_csv(path)?;

    let c_id = ds.require(COL_ID, path)?;
    let c_first = ds.require(COL_FIRST_NAME, path)?;
    let c_second = ds.require(COL_SECOND_NAME, path)?;
    let c_prefix = ds.require(COL_SURNAME_PREFIX, path)?;
    let c_surname = ds.require(COL_SURNAME, path)?;
    let c_employer = ds.require(COL_EMPLOYER, path)?;
    let c_main = ds.require(COL_MAIN_JOB, path)?;
    let c_disc = ds.column(COL_DISCIPLINES);
    let c_degree = ds.column(COL_DEGREE);
    let c_degree_year = ds.column(COL_DEGREE_YEAR);

    let rows: Vec<RadonRow> = ds
        .rows
        .iter()
        .filter(|r| cell(field(r, Some(c_id))).is_some())
        .map(|r| RadonRow {
            id: field(r, Some(c_id)).trim().to_string(),
            first_name: cell(field(r, Some(c_first))),
            second_name: cell(field(r, Some(c_second))),
            surname_prefix: cell(field(r, Some(c_prefix))),
            surname: cell(field(r, Some(c_surname))),
            institution: normalize_institution(field(r, Some(c_employer)).trim()),
            main_job: field(r, Some(c_main)).trim() == MAIN_JOB_YES,
            main_job_flag: field(r, Some(c_main)).trim().to_string(),
            disciplines: cell(field(r, c_disc)),
            degree: cell(field(r, c_degree)),
            degree_year: cell(field(r, c_degree_year)),
        })
        .collect();

    logf!("Radon: {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Group rows by id (first-appearance order) into researchers.
///
/// Names and degree come from the last row that carries a surname; the main
/// job is the institution of the last row flagged as one.
pub fn build_authors(rows: &[RadonRow]) -> Vec<Author> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&RadonRow>> = HashMap::new();
    for r in rows {
        groups
            .entry(r.id.as_str())
            .or_insert_with(|| {
                order.push(r.id.as_str());
                Vec::new()
            })
            .push(r);
    }

    let authors: Vec<Author> = order
        .iter()
        .map(|id| {
            let group = &groups[id];
            let named = group.iter().rev().find(|r| r.surname.is_some()).copied();
            let main_job = group.iter().rev().find(|r| r.main_job).map(|r| r.institution.clone());

            let mut author = Author { radon_id: s!(*id), main_job, ..Author::default() };
            if let Some(r) = named {
                author.first_name = r.first_name.clone();
                author.second_name = r.second_name.clone();
                author.surname_prefix = r.surname_prefix.clone();
                author.surname = r.surname.clone();
                author.disciplines = r.disciplines.clone();
                author.degree = r.degree.clone();
                author.degree_year = r.degree_year.clone();
            }

            let raw = [&author.first_name, &author.second_name, &author.surname_prefix, &author.surname]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            author.fullname = format_name(&raw);
            author.aid = make_aid(&author.fullname, id);
            author
        })
        .collect();

    logf!("Radon: built {} authors", authors.len());
    authors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, first: &str, surname: Option<&str>, inst: &str, main: bool) -> RadonRow {
        RadonRow {
            id: s!(id),
            first_name: Some(s!(first)),
            surname: surname.map(|s| s!(s)),
            institution: s!(inst),
            main_job: main,
            ..RadonRow::default()
        }
    }

    #[test]
    fn institution_names_lose_honorifics() {
        assert_eq!(
            normalize_institution("Uniwersytet im. Adama Mickiewicza w Poznaniu"),
            "Uniwersytet_Adama_Mickiewicza_w_Poznaniu"
        );
        assert_eq!(normalize_institution("Instytut sp. z o.o. Badań"), "Instytut_Badań");
    }

    #[test]
    fn groups_by_id_in_first_seen_order() {
        let rows = vec![
            row("2", "ewa", Some("NOWAK"), "UW", true),
            row("1", "jan", Some("kowalski"), "UJ", false),
            row("2", "ewa", None, "SWPS", true),
            row("1", "jan", Some("Kowalski-Nowak"), "UJ", false),
        ];
        let authors = build_authors(&rows);
        assert_eq!(authors.len(), 2);

        assert_eq!(authors[0].radon_id, "2");
        assert_eq!(authors[0].fullname, "Ewa Nowak");
        // last main-job row wins, even without a surname
        assert_eq!(authors[0].main_job.as_deref(), Some("SWPS"));

        assert_eq!(authors[1].fullname, "Jan Kowalski-Nowak");
        assert_eq!(authors[1].main_job, None);
        assert!(authors[1].aid.starts_with("Jan_Kowalski-Nowak_"));
    }
}
