// src/roster/split.rs
//
// Wrangling the registry into the institution layout the curators work in:
//   institutes_all.csv / institutes_ev.csv
//   <uni>/names.csv             one per evaluated institution
//   other/names.csv             main-job researchers elsewhere
//   other/unlisted*.csv         researchers without any declared main job
//   WhereIsWally.csv            which file each person ended up in

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::{
    Result,
    config::consts::{COL_UNI_CODE, SHEET_STEM},
    core::sanitize::cell,
    csv::{read_csv, write_csv},
    store::field,
};

use super::{author::Author, radon::RadonRow};

/// Evaluation attributes keyed by `uni_code`, in file order of columns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub columns: Vec<String>,
    pub by_code: HashMap<String, Vec<String>>,
}

impl Evaluation {
    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }
}

pub fn read_evaluation(path: &Path) -> Result<Evaluation> {
    let ds = read_csv(path)?;
    let c_code = ds.require(COL_UNI_CODE, path)?;
    let headers = ds.headers.clone().unwrap_or_default();

    let keep: Vec<usize> = (0..headers.len()).filter(|&i| i != c_code).collect();
    let columns = keep.iter().map(|&i| headers[i].clone()).collect();

    let mut by_code = HashMap::new();
    for r in &ds.rows {
        if let Some(code) = cell(field(r, Some(c_code))) {
            by_code.insert(code, keep.iter().map(|&i| s!(field(r, Some(i)))).collect());
        }
    }
    logd!("Evaluation: {} institutions from {}", by_code.len(), path.display());
    Ok(Evaluation { columns, by_code })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Institution {
    pub name: String,
    /// Main-job rows at this institution.
    pub researchers: usize,
    pub evaluation: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WallyRow {
    pub fullname: String,
    pub file: &'static str,
    pub institution: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RosterSplit {
    /// (fullname, institution, main-job flag) for people with no main job.
    pub unlisted: Vec<(String, String, String)>,
    pub unlisted_names: Vec<String>,
    /// All institutions with main-job researchers, largest first.
    pub institutions: Vec<Institution>,
    pub evaluation_columns: Vec<String>,
    /// Selected researchers per evaluated institution, largest first.
    pub selected: Vec<(String, Vec<String>)>,
    /// (fullname, institution) main-job rows outside evaluated institutions.
    pub not_selected: Vec<(String, String)>,
    pub where_is_wally: Vec<WallyRow>,
}

impl RosterSplit {
    pub fn evaluated(&self) -> impl Iterator<Item = &Institution> {
        self.institutions.iter().filter(|i| i.evaluation.is_some())
    }
}

/// `fullnames` maps radon id to the researcher's display name.
pub fn split(rows: &[RadonRow], fullnames: &HashMap<String, String>, evaluation: &Evaluation) -> RosterSplit {
    let name_of = |id: &str| fullnames.get(id).cloned().unwrap_or_default();

    let with_main_job: HashSet<&str> = rows.iter().filter(|r| r.main_job).map(|r| r.id.as_str()).collect();

    // Unlisted: every row of researchers who never declared a main job
    let mut unlisted = Vec::new();
    let mut unlisted_names: Vec<String> = Vec::new();
    let mut dropped = 0usize;
    for r in rows.iter().filter(|r| !with_main_job.contains(r.id.as_str())) {
        let name = name_of(&r.id);
        if name.is_empty() || r.institution.is_empty() || r.main_job_flag.is_empty() {
            dropped += 1;
            continue;
        }
        if !unlisted_names.contains(&name) {
            unlisted_names.push(name.clone());
        }
        unlisted.push((name, r.institution.clone(), r.main_job_flag.clone()));
    }
    if dropped > 0 {
        logw!("Split: {} unlisted rows without a name, institution or main-job flag skipped", dropped);
    }

    // Institutions by main-job count
    let main_rows: Vec<&RadonRow> = rows.iter().filter(|r| r.main_job).collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in &main_rows {
        *counts.entry(r.institution.as_str()).or_default() += 1;
    }
    let mut institutions: Vec<Institution> = counts
        .into_iter()
        .map(|(name, researchers)| Institution {
            name: s!(name),
            researchers,
            evaluation: evaluation.by_code.get(name).map(|vals| {
                evaluation.columns.iter().cloned().zip(vals.iter().cloned()).collect()
            }),
        })
        .collect();
    institutions.sort_by(|a, b| b.researchers.cmp(&a.researchers).then_with(|| a.name.cmp(&b.name)));

    // Selected vs not, in institution order
    let mut selected: Vec<(String, Vec<String>)> = Vec::new();
    let mut selected_ids: HashSet<&str> = HashSet::new();
    for inst in institutions.iter().filter(|i| i.evaluation.is_some()) {
        let names = main_rows
            .iter()
            .filter(|r| r.institution == inst.name)
            .map(|r| {
                selected_ids.insert(r.id.as_str());
                name_of(&r.id)
            })
            .collect();
        selected.push((inst.name.clone(), names));
    }
    let not_selected: Vec<(String, String)> = main_rows
        .iter()
        .filter(|r| !selected_ids.contains(r.id.as_str()))
        .map(|r| (name_of(&r.id), r.institution.clone()))
        .collect();

    let mut where_is_wally = Vec::new();
    for (inst, names) in &selected {
        where_is_wally.extend(names.iter().map(|n| WallyRow {
            fullname: n.clone(),
            file: "selected",
            institution: inst.clone(),
        }));
    }
    where_is_wally.extend(not_selected.iter().map(|(n, u)| WallyRow {
        fullname: n.clone(),
        file: "other-names",
        institution: u.clone(),
    }));
    where_is_wally.extend(unlisted_names.iter().map(|n| WallyRow {
        fullname: n.clone(),
        file: "other-unlisted",
        institution: s!(),
    }));

    logf!(
        "Split: {} institutions ({} evaluated), {} selected, {} elsewhere, {} unlisted",
        institutions.len(),
        selected.len(),
        selected.iter().map(|(_, names)| names.len()).sum::<usize>(),
        not_selected.len(),
        unlisted_names.len()
    );

    RosterSplit {
        unlisted,
        unlisted_names,
        institutions,
        evaluation_columns: evaluation.columns.clone(),
        selected,
        not_selected,
        where_is_wally,
    }
}

/// Convenience: radon id -> fullname from built authors.
pub fn fullname_map(authors: &[Author]) -> HashMap<String, String> {
    authors.iter().map(|a| (a.radon_id.clone(), a.fullname.clone())).collect()
}

/// Write every split file under `out_dir`; returns the paths written.
pub fn write_split(split: &RosterSplit, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let other = out_dir.join("other");

    let p = other.join("unlisted.csv");
    let rows: Vec<Vec<String>> = split
        .unlisted
        .iter()
        .map(|(n, u, f)| vec![n.clone(), u.clone(), f.clone()])
        .collect();
    write_csv(&p, &strs!["fullname", "uni_name", "is_a_main_job"], &rows)?;
    written.push(p);

    let p = other.join("unlisted_names_only.csv");
    let rows: Vec<Vec<String>> = split.unlisted_names.iter().map(|n| vec![n.clone()]).collect();
    write_csv(&p, &strs!["fullname"], &rows)?;
    written.push(p);

    let p = other.join(join!(SHEET_STEM, ".csv"));
    let rows: Vec<Vec<String>> = split.not_selected.iter().map(|(n, u)| vec![n.clone(), u.clone()]).collect();
    write_csv(&p, &strs!["fullname", "uni_name"], &rows)?;
    written.push(p);

    let mut inst_headers = strs!["uni_name", "count"];
    inst_headers.extend(split.evaluation_columns.iter().cloned());
    let inst_row = |i: &Institution| {
        let mut row = vec![i.name.clone(), i.researchers.to_string()];
        row.extend(
            split
                .evaluation_columns
                .iter()
                .map(|c| i.evaluation.as_ref().and_then(|e| e.get(c)).cloned().unwrap_or_default()),
        );
        row
    };

    let p = out_dir.join("institutes_all.csv");
    write_csv(&p, &inst_headers, &split.institutions.iter().map(inst_row).collect::<Vec<_>>())?;
    written.push(p);

    let p = out_dir.join("institutes_ev.csv");
    write_csv(&p, &inst_headers, &split.evaluated().map(inst_row).collect::<Vec<_>>())?;
    written.push(p);

    for (inst, names) in &split.selected {
        let p = out_dir.join(inst).join(join!(SHEET_STEM, ".csv"));
        let rows: Vec<Vec<String>> = names.iter().map(|n| vec![n.clone()]).collect();
        write_csv(&p, &strs!["fullname"], &rows)?;
        written.push(p);
    }

    let p = out_dir.join("WhereIsWally.csv");
    let rows: Vec<Vec<String>> = split
        .where_is_wally
        .iter()
        .map(|w| vec![w.fullname.clone(), s!(w.file), w.institution.clone()])
        .collect();
    write_csv(&p, &strs!["fullname", "file", "uni_name"], &rows)?;
    written.push(p);

    logf!("Split: wrote {} files under {}", written.len(), out_dir.display());
    Ok(written)
}

/// Authors whose main job is an evaluated institution.
pub fn select_evaluated(authors: &[Author], evaluation: &Evaluation) -> Vec<Author> {
    authors
        .iter()
        .filter(|a| a.main_job.as_deref().is_some_and(|m| evaluation.contains(m)))
        .cloned()
        .collect()
}
