// src/scrape/works.rs
use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc,
    },
    thread,
    time::Duration,
};

use reqwest::blocking::Client;

use crate::{
    Result,
    config::{
        consts::{FAILED_FILE, NO_LINK, UNRECOVERED},
        options::ScrapeOptions,
    },
    core::net,
    csv::write_csv,
    progress::Progress,
    roster::sheets::{SheetRow, find_sheet, read_sheet},
    specs::{self, Work},
    store::DataSet,
};

pub const WORK_HEADERS: [&str; 6] = ["name", "orcid", "link", "title", "date", "journal"];

/// Anything that can list the works on an ORCID record.
pub trait WorkSource: Sync {
    fn fetch_works(&self, orcid: &str) -> Result<Vec<Work>>;
}

/// Public ORCID API over a blocking reqwest client.
pub struct OrcidClient {
    client: Client,
    api_base: String,
}

impl OrcidClient {
    pub fn new(options: &ScrapeOptions) -> Result<Self> {
        Ok(Self {
            client: net::client(&options.user_agent, options.timeout_secs)?,
            api_base: s!(options.api_base.trim_end_matches('/')),
        })
    }

    pub fn works_url(&self, id: &str) -> String {
        format!("{}/{}/works", self.api_base, id)
    }
}

impl WorkSource for OrcidClient {
    fn fetch_works(&self, orcid: &str) -> Result<Vec<Work>> {
        let id = specs::orcid_id(orcid)?;
        let body = net::http_get(&self.client, &self.works_url(&id), "application/json")?;
        specs::parse_works_json(&body)
    }
}

/// One line of `<uni>.csv`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkRow {
    pub name: String,
    /// As written in the sheet (usually the full `https://orcid.org/...` URL).
    pub orcid: String,
    /// DOI URL, or `empty`.
    pub link: String,
    pub title: String,
    /// Date text, or `unrecovered`.
    pub date: String,
    pub journal: String,
}

impl WorkRow {
    pub fn from_work(name: &str, orcid: &str, w: Work) -> Self {
        WorkRow {
            name: s!(name),
            orcid: s!(orcid),
            link: w.link.unwrap_or_else(|| s!(NO_LINK)),
            title: w.title,
            date: w.date.unwrap_or_else(|| s!(UNRECOVERED)),
            journal: w.journal.unwrap_or_default(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.orcid.clone(),
            self.link.clone(),
            self.title.clone(),
            self.date.clone(),
            self.journal.clone(),
        ]
    }
}

pub fn work_headers() -> Vec<String> {
    WORK_HEADERS.iter().map(|h| s!(*h)).collect()
}

/// Journal articles in `[year_from, year_to)` (undated kept), as rows.
pub fn select_works(name: &str, orcid: &str, works: Vec<Work>, options: &ScrapeOptions) -> Vec<WorkRow> {
    works
        .into_iter()
        .filter(|w| w.is_journal_article() && specs::in_range(w, options.year_from, options.year_to))
        .map(|w| WorkRow::from_work(name, orcid, w))
        .collect()
}

/// (fullname, orcid cell) for checked rows that point at an ORCID record.
pub fn scrape_targets(sheet: &[SheetRow]) -> Vec<(String, String)> {
    sheet
        .iter()
        .filter(|r| r.checked == Some(true))
        .filter_map(|r| {
            let orcid = r.orcid.as_deref()?;
            orcid.contains("orcid").then(|| (r.fullname.clone(), s!(orcid)))
        })
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    /// Institutions in the order asked for, each with its rows.
    pub works: Vec<(String, Vec<WorkRow>)>,
    /// (institution, orcid) pairs that could not be fetched.
    pub failed: Vec<(String, String)>,
}

impl ScrapeReport {
    pub fn total_rows(&self) -> usize {
        self.works.iter().map(|(_, rows)| rows.len()).sum()
    }

    /// Flat table with a trailing `uni` column, for the Works page.
    pub fn to_dataset(&self) -> DataSet {
        let mut headers = work_headers();
        headers.push(s!("uni"));
        let rows = self
            .works
            .iter()
            .flat_map(|(uni, rows)| {
                rows.iter().map(move |r| {
                    let mut row = r.to_row();
                    row.push(uni.clone());
                    row
                })
            })
            .collect();
        DataSet::new(headers, rows)
    }

    /// `<uni>.csv` per institution plus `failed.csv`.
    pub fn write(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.works.len() + 1);
        for (uni, rows) in &self.works {
            written.push(write_works(dir, uni, rows)?);
        }
        written.push(write_failed(dir, &self.failed)?);
        Ok(written)
    }
}

struct Job {
    uni: String,
    name: String,
    orcid: String,
}

/// Scrape every checked researcher of `institutions` with the real API.
pub fn collect_works(
    options: &ScrapeOptions,
    institutions_dir: &Path,
    institutions: &[String],
    progress: &mut dyn Progress,
) -> Result<ScrapeReport> {
    let client = OrcidClient::new(options)?;
    collect_works_with(&client, options, institutions_dir, institutions, progress)
}

/// Worker pool over all (institution, researcher) jobs. A failed record is
/// reported and skipped; an unreadable sheet skips its institution.
pub fn collect_works_with(
    source: &dyn WorkSource,
    options: &ScrapeOptions,
    institutions_dir: &Path,
    institutions: &[String],
    progress: &mut dyn Progress,
) -> Result<ScrapeReport> {
    let mut jobs: Vec<Job> = Vec::new();
    let mut unis: Vec<String> = Vec::new();

    for uni in institutions {
        let dir = institutions_dir.join(uni);
        let Some(sheet) = find_sheet(&dir) else {
            logw!("Scrape: no sheet in {}, skipping", dir.display());
            progress.log(&format!("{uni}: no sheet, skipped"));
            continue;
        };
        let rows = match read_sheet(&sheet) {
            Ok(rows) => rows,
            Err(e) => {
                loge!("Scrape: failed to read {}: {e}", sheet.display());
                progress.log(&format!("{uni}: failed to read sheet"));
                continue;
            }
        };
        unis.push(uni.clone());
        jobs.extend(scrape_targets(&rows).into_iter().map(|(name, orcid)| Job {
            uni: uni.clone(),
            name,
            orcid,
        }));
    }

    logf!("Scrape: {} researchers across {} institutions", jobs.len(), unis.len());
    progress.begin(jobs.len());

    type FetchOk = (usize, Vec<WorkRow>);
    type FetchErr = (usize, String);

    let counter = AtomicUsize::new(0);
    let (res_tx, res_rx) = mpsc::channel::<std::result::Result<FetchOk, FetchErr>>();
    let workers = options.workers.min(jobs.len()).max(1);
    let pause = options.pause_ms;
    let jitter_ms = options.jitter_ms.max(1);

    let mut per_job: Vec<Option<Vec<WorkRow>>> = Vec::new();
    per_job.resize_with(jobs.len(), || None);
    let mut failed_idx: Vec<usize> = Vec::new();

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = res_tx.clone();
            let jobs = &jobs;
            let counter = &counter;
            scope.spawn(move || {
                loop {
                    let i = counter.fetch_add(1, Ordering::Relaxed);
                    if i >= jobs.len() {
                        break;
                    }
                    let job = &jobs[i];
                    let result = match source.fetch_works(&job.orcid) {
                        Ok(works) => Ok((i, select_works(&job.name, &job.orcid, works, options))),
                        Err(e) => Err((i, e.to_string())),
                    };
                    if tx.send(result).is_err() {
                        break;
                    }
                    let jitter = (i as u64) % jitter_ms;
                    thread::sleep(Duration::from_millis(pause + jitter)); // be polite
                }
            });
        }
        drop(res_tx); // main thread is sole receiver now

        for _ in 0..jobs.len() {
            match res_rx.recv() {
                Ok(Ok((i, rows))) => {
                    let job = &jobs[i];
                    logd!("Scrape: {} ({}) -> {} works", job.name, job.orcid, rows.len());
                    per_job[i] = Some(rows);
                    progress.item_done(&format!("{}: {}", job.uni, job.name));
                }
                Ok(Err((i, msg))) => {
                    let job = &jobs[i];
                    loge!("Scrape: {} ({}) failed: {msg}", job.name, job.orcid);
                    failed_idx.push(i);
                    progress.item_failed(&format!("{}: {}", job.uni, job.name));
                }
                Err(_) => break, // workers ended early
            }
        }
    });

    progress.finish();

    // Reassemble in job order so output is stable across runs
    let mut works: Vec<(String, Vec<WorkRow>)> = unis.into_iter().map(|u| (u, Vec::new())).collect();
    for (job, rows) in jobs.iter().zip(per_job) {
        if let (Some(rows), Some(slot)) = (rows, works.iter_mut().find(|(u, _)| *u == job.uni)) {
            slot.1.extend(rows);
        }
    }
    failed_idx.sort_unstable();
    let failed = failed_idx
        .into_iter()
        .map(|i| (jobs[i].uni.clone(), jobs[i].orcid.clone()))
        .collect();

    let report = ScrapeReport { works, failed };
    logf!("Scrape: {} works collected, {} records failed", report.total_rows(), report.failed.len());
    Ok(report)
}

/// Works from a saved profile page, filtered like a live scrape.
pub fn works_from_html(path: &Path, name: &str, orcid: &str, options: &ScrapeOptions) -> Result<Vec<WorkRow>> {
    let html = std::fs::read_to_string(path)?;
    let page = specs::parse_profile_html(&html, options.year_from)?;
    if page.has_more {
        logw!("{}: record is paginated; save the remaining pages too", path.display());
    }
    Ok(select_works(name, orcid, page.works, options))
}

pub fn write_works(dir: &Path, uni: &str, rows: &[WorkRow]) -> Result<PathBuf> {
    let path = dir.join(join!(uni, ".csv"));
    let rows: Vec<Vec<String>> = rows.iter().map(WorkRow::to_row).collect();
    write_csv(&path, &work_headers(), &rows)?;
    Ok(path)
}

pub fn write_failed(dir: &Path, failed: &[(String, String)]) -> Result<PathBuf> {
    let path = dir.join(FAILED_FILE);
    let rows: Vec<Vec<String>> = failed.iter().map(|(u, o)| vec![u.clone(), o.clone()]).collect();
    write_csv(&path, &strs!["uni", "failed"], &rows)?;
    Ok(path)
}
