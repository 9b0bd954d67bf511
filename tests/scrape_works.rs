// tests/scrape_works.rs
//
// The scrape pipeline against an in-memory record source: sheet discovery,
// filtering, failure collection, per-institution files, then the stacked
// article list.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use sonaa::config::options::ScrapeOptions;
use sonaa::progress::Progress;
use sonaa::scrape::{WorkSource, collect_article_list, collect_works_with};
use sonaa::specs::Work;
use sonaa::{Error, Result};

struct FakeOrcid {
    records: HashMap<&'static str, Vec<Work>>,
}

impl WorkSource for FakeOrcid {
    fn fetch_works(&self, orcid: &str) -> Result<Vec<Work>> {
        let id = sonaa::specs::orcid_id(orcid)?;
        self.records
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| Error::Other(format!("404 for {id}")))
    }
}

#[derive(Default)]
struct Tally {
    total: usize,
    done: usize,
    failed: usize,
    finished: bool,
}

impl Progress for Tally {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn item_done(&mut self, _label: &str) { self.done += 1; }
    fn item_failed(&mut self, _label: &str) { self.failed += 1; }
    fn finish(&mut self) { self.finished = true; }
}

fn work(kind: &str, title: &str, date: Option<&str>, link: Option<&str>) -> Work {
    Work {
        work_type: kind.to_string(),
        title: title.to_string(),
        journal: Some("Journal".to_string()),
        date: date.map(str::to_string),
        link: link.map(str::to_string),
    }
}

fn source() -> FakeOrcid {
    let mut records = HashMap::new();
    records.insert(
        "0000-0001-2345-6789",
        vec![
            work("journal-article", "In range", Some("2019-03-14"), Some("https://doi.org/10.1/a")),
            work("journal-article", "Too old", Some("2015"), Some("https://doi.org/10.1/old")),
            work("journal-article", "Too new", Some("2022-01"), None),
            work("book-chapter", "Not an article", Some("2019"), None),
            work("journal-article", "Undated", None, None),
        ],
    );
    records.insert(
        "0000-0002-0000-0001",
        vec![work("journal-article", "Second author paper", Some("2020"), Some("https://doi.org/10.2/b"))],
    );
    FakeOrcid { records }
}

fn sheet(dir: &Path, uni: &str, body: &str) {
    let d = dir.join(uni);
    fs::create_dir_all(&d).unwrap();
    fs::write(d.join("names.csv"), body).unwrap();
}

fn options() -> ScrapeOptions {
    ScrapeOptions { workers: 2, pause_ms: 0, jitter_ms: 0, ..ScrapeOptions::default() }
}

#[test]
fn checked_researchers_are_scraped_and_failures_collected() {
    let dir = tempfile::tempdir().unwrap();
    let inst = dir.path().join("institutions");
    sheet(
        &inst,
        "UW",
        "fullname,orcid,Checked\n\
         Jan Kowalski,https://orcid.org/0000-0001-2345-6789,1\n\
         Not Checked,https://orcid.org/0000-0002-0000-0001,0\n\
         No Record,not found,1\n\
         Gone Missing,https://orcid.org/0000-0003-0000-0009,1\n",
    );
    sheet(&inst, "SWPS", "fullname,orcid,Checked\nEwa Nowak,https://orcid.org/0000-0002-0000-0001,1.0\n");

    let unis = vec!["UW".to_string(), "SWPS".to_string(), "Nowhere".to_string()];
    let mut tally = Tally::default();
    let report = collect_works_with(&source(), &options(), &inst, &unis, &mut tally).unwrap();

    // Nowhere has no sheet; the unchecked and non-ORCID rows are not jobs
    assert_eq!(tally.total, 3);
    assert_eq!((tally.done, tally.failed), (2, 1));
    assert!(tally.finished);

    let names: Vec<&str> = report.works.iter().map(|(u, _)| u.as_str()).collect();
    assert_eq!(names, ["UW", "SWPS"]);

    let uw = &report.works[0].1;
    let titles: Vec<&str> = uw.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["In range", "Undated"]);
    assert_eq!(uw[1].link, "empty");
    assert_eq!(uw[1].date, "unrecovered");
    assert_eq!(uw[0].orcid, "https://orcid.org/0000-0001-2345-6789");

    assert_eq!(report.failed, vec![("UW".to_string(), "https://orcid.org/0000-0003-0000-0009".to_string())]);
    assert_eq!(report.total_rows(), 3);

    let ds = report.to_dataset();
    assert_eq!(ds.headers.as_ref().unwrap().last().map(String::as_str), Some("uni"));
    assert_eq!(ds.rows[2][6], "SWPS");
}

#[test]
fn written_files_stack_into_the_article_list() {
    let dir = tempfile::tempdir().unwrap();
    let inst = dir.path().join("institutions");
    let works = dir.path().join("works");
    fs::create_dir_all(&works).unwrap();
    sheet(&inst, "UW", "fullname,orcid,Checked\nJan Kowalski,https://orcid.org/0000-0001-2345-6789,true\n");
    sheet(&inst, "SWPS", "fullname,orcid,Checked\nEwa Nowak,https://orcid.org/0000-0002-0000-0001/,1\n");

    let unis = vec!["UW".to_string(), "SWPS".to_string()];
    let report = collect_works_with(&source(), &options(), &inst, &unis, &mut sonaa::progress::NullProgress).unwrap();
    assert!(report.failed.is_empty());

    let written = report.write(&works).unwrap();
    assert_eq!(written.len(), 3);
    assert!(works.join("failed.csv").is_file());

    let list = collect_article_list(&works).unwrap();
    assert_eq!(list.row_count(), 3);
    let ids: Vec<&str> = list.rows.iter().map(|r| r[0].as_str()).collect();
    // SWPS.csv sorts before UW.csv
    assert_eq!(ids[..2], ["10_2&b", "10_1&a"]);
    assert!(ids[2].starts_with("title_undated_"), "{}", ids[2]);
}
