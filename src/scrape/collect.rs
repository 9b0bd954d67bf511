// src/scrape/collect.rs
use std::fs;
use std::path::Path;

use crate::{
    Result,
    config::consts::{FAILED_FILE, RAW_ARTICLES_FILE},
    corpus::article::create_article_id,
    csv::{read_csv, write_dataset},
    file::stem_of,
    store::{DataSet, field},
};

use super::works::WORK_HEADERS;

/// Stack every `<uni>.csv` in `works_dir` into `raw_article_list.csv`:
/// `Article_ID, name, orcid, doi, title, date, journal, uni`.
pub fn collect_article_list(works_dir: &Path) -> Result<DataSet> {
    let mut files: Vec<_> = fs::read_dir(works_dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "csv"))
        .filter(|p| {
            let name = p.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            name != FAILED_FILE && name != RAW_ARTICLES_FILE
        })
        .collect();
    files.sort();

    let mut headers = strs!["Article_ID"];
    headers.extend(WORK_HEADERS.iter().map(|h| if *h == "link" { s!("doi") } else { s!(*h) }));
    headers.push(s!("uni"));

    let mut rows = Vec::new();
    for path in &files {
        let uni = stem_of(path);
        let ds = read_csv(path)?;
        let cols: Vec<Option<usize>> = WORK_HEADERS.iter().map(|h| ds.column(h)).collect();
        let (c_link, c_title) = (cols[2], cols[3]);

        for r in &ds.rows {
            let id = create_article_id(Some(field(r, c_link)), field(r, c_title));
            let mut row = Vec::with_capacity(headers.len());
            row.push(id);
            row.extend(cols.iter().map(|c| s!(field(r, *c))));
            row.push(uni.clone());
            rows.push(row);
        }
        logd!("Collect: {} rows from {}", ds.rows.len(), path.display());
    }

    let ds = DataSet::new(headers, rows);
    let out = works_dir.join(RAW_ARTICLES_FILE);
    write_dataset(&out, &ds, b',')?;
    logf!("Collect: {} works from {} files -> {}", ds.row_count(), files.len(), out.display());
    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_institution_files_and_skips_failed() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path();
        fs::write(
            p.join("UW.csv"),
            "name,orcid,link,title,date,journal\n\
             Jan Kowalski,https://orcid.org/0000-0001-2345-6789,https://doi.org/10.1/AB.c,Title one,2019,J\n",
        )
        .unwrap();
        fs::write(
            p.join("SWPS.csv"),
            "name,orcid,link,title,date,journal\n\
             Ewa Nowak,https://orcid.org/0000-0002-0000-0001,empty,Some paper,unrecovered,K\n",
        )
        .unwrap();
        fs::write(p.join("failed.csv"), "uni,failed\nUW,https://orcid.org/x\n").unwrap();

        let ds = collect_article_list(p).unwrap();
        assert_eq!(ds.headers.as_ref().unwrap()[3], "doi");
        assert_eq!(ds.row_count(), 2);
        // files in name order: SWPS before UW
        assert_eq!(ds.rows[0][8], "SWPS");
        assert!(ds.rows[0][0].starts_with("title_some_paper_"));
        assert_eq!(ds.rows[1][0], "10_1&ab_c");
        assert!(p.join("raw_article_list.csv").is_file());

        // a second run does not swallow its own output
        assert_eq!(collect_article_list(p).unwrap().row_count(), 2);
    }
}
