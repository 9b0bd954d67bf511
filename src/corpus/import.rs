// src/corpus/import.rs
//
// Three article sources:
//   raw_article_list.csv  ORCID works, one row per (work, researcher)
//   PBN export            one row per (article, researcher), radon id in `our_id`
//   OpenAlex export       one row per work, authors as free text
//
// ORCID builds the corpus, PBN and OpenAlex extend it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{
    Result,
    config::consts::ORCID_HOST,
    core::sanitize::cell,
    csv::{read_csv, write_dataset},
    file::stem_of,
    store::{DataSet, field},
};

use super::{
    Corpus,
    article::{Article, clean_doi, create_article_id, parse_year, push_unique, strip_doi_host},
};

const PBN_ARTICLE: &str = "ARTICLE";
const OPENALEX_ORCID_SEP: &str = ": https://orcid.org/";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpenAlexReport {
    /// Distinct DOIs already in the corpus (current or historical).
    pub matched_dois: usize,
    /// Corpus articles touched by those DOIs.
    pub enhanced: usize,
    pub added: usize,
    pub unmatched: usize,
    pub unmatched_path: Option<PathBuf>,
}

fn strip_orcid_host(orcid: &str) -> Option<String> {
    cell(orcid.trim().trim_start_matches(ORCID_HOST))
}

/// `Name: https://orcid.org/<id>; Other: https://orcid.org/<id>`
fn parse_author_orcids(text: &str) -> HashMap<String, String> {
    text.split(';')
        .filter_map(|pair| pair.trim().split_once(OPENALEX_ORCID_SEP))
        .map(|(name, id)| (s!(name.trim()), s!(id.trim())))
        .collect()
}

impl Corpus {
    /// Aggregate ORCID rows per Article_ID and resolve their authors.
    /// Returns the number of new articles.
    pub fn load_orcid_articles(&mut self, path: &Path) -> Result<usize> {
        let ds = read_csv(path)?;
        let c_id = ds.require("Article_ID", path)?;
        let c_name = ds.require("name", path)?;
        let c_orcid = ds.column("orcid");
        let c_doi = ds.column("doi").or_else(|| ds.column("link"));
        let c_title = ds.column("title");
        let c_date = ds.column("date");
        let c_journal = ds.column("journal");

        // Article_ID -> (article, unique (name, orcid) pairs), in file order
        let mut order: Vec<String> = Vec::new();
        let mut pending: HashMap<String, (Article, Vec<(String, Option<String>)>)> = HashMap::new();

        for r in &ds.rows {
            let Some(id) = cell(field(r, Some(c_id))) else { continue };
            let entry = pending.entry(id.clone()).or_insert_with(|| {
                order.push(id.clone());
                let article = Article {
                    article_id: id.clone(),
                    doi: strip_doi_host(field(r, c_doi)),
                    title: s!(field(r, c_title).trim()),
                    year: parse_year(field(r, c_date)),
                    journal: cell(field(r, c_journal)),
                    ..Article::default()
                };
                (article, Vec::new())
            });
            let author = (s!(field(r, Some(c_name)).trim()), strip_orcid_host(field(r, c_orcid)));
            if !author.0.is_empty() && !entry.1.contains(&author) {
                entry.1.push(author);
            }
        }

        let mut added = 0usize;
        for id in order {
            let Some((mut article, names)) = pending.remove(&id) else { continue };
            for (name, orcid) in names {
                let who = self
                    .book
                    .match_name(&name, orcid.as_deref())
                    .map(|m| m.aid)
                    .unwrap_or(name);
                article.add_author(&who);
            }

            match self.position(&id) {
                Some(i) => {
                    for who in &article.authors {
                        self.articles[i].add_author(who);
                    }
                }
                None => {
                    self.articles.push(article);
                    added += 1;
                }
            }
        }

        logf!("Import ORCID: {added} new articles from {}; corpus holds {}", path.display(), self.len());
        Ok(added)
    }

    /// PBN rows of type ARTICLE with a transformed DOI. The author is mapped
    /// from the radon id. Returns (added, updated).
    pub fn load_pbn_articles(&mut self, path: &Path) -> Result<(usize, usize)> {
        let ds = read_csv(path)?;
        let c_type = ds.require("type", path)?;
        let c_tid = ds.require("doi_transformed", path)?;
        let c_our = ds.require("our_id", path)?;
        let c_doi = ds.column("doi");
        let c_title = ds.column("title");
        let c_year = ds.column("year");
        let c_journal = ds.column("journal");

        // Lookup by id and by DOI (raw and clean)
        let mut by_id: HashMap<String, usize> = HashMap::new();
        let mut by_doi: HashMap<String, usize> = HashMap::new();
        for (i, a) in self.articles.iter().enumerate() {
            by_id.entry(a.article_id.clone()).or_insert(i);
            if let Some(raw) = a.doi.as_deref().and_then(strip_doi_host) {
                by_doi.entry(raw).or_insert(i);
            }
            if let Some(clean) = a.clean_doi() {
                by_doi.entry(clean).or_insert(i);
            }
        }

        let (mut added, mut updated) = (0usize, 0usize);
        for r in ds.rows.iter().filter(|r| field(r, Some(c_type)).trim() == PBN_ARTICLE) {
            let Some(tid) = cell(field(r, Some(c_tid))) else { continue };
            let our_id = s!(field(r, Some(c_our)).trim());
            let aid = s!(self.book.aid_for_radon_id(&our_id).unwrap_or(our_id.as_str()));
            let doi = strip_doi_host(field(r, c_doi));

            let existing = by_id.get(&tid).copied().or_else(|| {
                let d = doi.as_deref()?;
                by_doi.get(d).copied().or_else(|| clean_doi(d).and_then(|c| by_doi.get(&c).copied()))
            });

            match existing {
                Some(i) => {
                    if self.articles[i].add_author(&aid) {
                        updated += 1;
                    }
                }
                None => {
                    let article = Article {
                        article_id: tid.clone(),
                        doi: doi.clone(),
                        title: s!(field(r, c_title).trim()),
                        year: parse_year(field(r, c_year)),
                        journal: cell(field(r, c_journal)),
                        authors: vec![aid],
                        ..Article::default()
                    };
                    let i = self.articles.len();
                    by_id.insert(tid, i);
                    if let Some(d) = &doi {
                        by_doi.entry(d.clone()).or_insert(i);
                    }
                    if let Some(c) = article.clean_doi() {
                        by_doi.entry(c).or_insert(i);
                    }
                    self.articles.push(article);
                    added += 1;
                }
            }
        }

        logf!("Import PBN: {added} added, {updated} updated; corpus holds {}", self.len());
        Ok((added, updated))
    }

    /// Enhance articles whose DOI (current or historical) OpenAlex knows,
    /// add works with at least one known author, and park the rest in
    /// `<stem>_unmatched.csv` next to the input.
    pub fn load_openalex_articles(&mut self, path: &Path) -> Result<OpenAlexReport> {
        let ds = read_csv(path)?;
        let c_doi = ds.require("doi", path)?;
        let c_title = ds.column("title");
        let c_year = ds.column("publication_year");
        let c_journal = ds.column("journal");
        let c_authors = ds.column("authors");
        let c_orcids = ds.column("author_orcids");
        let c_pdf = ds.column("pdf_url");
        let c_landing = ds.column("landing_page_url");
        let c_oa = ds.column("oa_url");

        for a in &mut self.articles {
            if a.old_dois.is_empty() {
                if let Some(d) = a.clean_doi() {
                    a.old_dois.push(d);
                }
            }
        }

        // clean DOI -> corpus articles carrying it now or in the past
        let mut known: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, a) in self.articles.iter().enumerate() {
            let dois = a.clean_doi().into_iter().chain(a.old_dois.iter().cloned());
            for d in dois {
                let slot = known.entry(d).or_default();
                if !slot.contains(&i) {
                    slot.push(i);
                }
            }
        }

        // OpenAlex rows grouped by clean DOI, in file order
        let mut row_doi: Vec<Option<String>> = Vec::with_capacity(ds.rows.len());
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        for (ri, r) in ds.rows.iter().enumerate() {
            let d = clean_doi(field(r, Some(c_doi)));
            if let Some(d) = d.as_deref().filter(|d| known.contains_key(*d)) {
                match groups.iter_mut().find(|(g, _)| g == d) {
                    Some((_, rows)) => rows.push(ri),
                    None => groups.push((s!(d), vec![ri])),
                }
            }
            row_doi.push(d);
        }

        let mut report = OpenAlexReport { matched_dois: groups.len(), ..OpenAlexReport::default() };
        let mut processed = vec![false; ds.rows.len()];

        for (doi, rows) in &groups {
            let mut aids: Vec<String> = Vec::new();
            for &ri in rows {
                processed[ri] = true;
                for aid in self.match_openalex_authors(&ds.rows[ri], c_authors, c_orcids) {
                    push_unique(&mut aids, &aid);
                }
            }

            let first = &ds.rows[rows[0]];
            for &ai in &known[doi] {
                let a = &mut self.articles[ai];
                for (slot, col) in [(&mut a.pdf_url, c_pdf), (&mut a.landing_page_url, c_landing), (&mut a.oa_url, c_oa)] {
                    if let Some(v) = cell(field(first, col)) {
                        *slot = Some(v);
                    }
                }
                for aid in &aids {
                    a.add_author(aid);
                }
                push_unique(&mut a.old_dois, doi);
                report.enhanced += 1;
            }
        }

        // clean DOI -> article added below, so repeated rows fold into one
        let mut added: HashMap<String, usize> = HashMap::new();
        let mut unmatched_rows: Vec<Vec<String>> = Vec::new();
        for (ri, r) in ds.rows.iter().enumerate() {
            if processed[ri] {
                continue;
            }
            let aids = self.match_openalex_authors(r, c_authors, c_orcids);
            if aids.is_empty() {
                unmatched_rows.push(r.clone());
                continue;
            }

            if let Some(&ai) = row_doi[ri].as_ref().and_then(|d| added.get(d)) {
                let a = &mut self.articles[ai];
                for aid in &aids {
                    a.add_author(aid);
                }
                for (slot, col) in [(&mut a.pdf_url, c_pdf), (&mut a.landing_page_url, c_landing), (&mut a.oa_url, c_oa)] {
                    if slot.is_none() {
                        *slot = cell(field(r, col));
                    }
                }
                logd!("Import OpenAlex: row {} repeats DOI of {}", ri + 1, a.article_id);
                continue;
            }
            if let Some(d) = &row_doi[ri] {
                added.insert(d.clone(), self.articles.len());
            }

            let doi = strip_doi_host(field(r, Some(c_doi)));
            let title = s!(field(r, c_title).trim());
            self.articles.push(Article {
                article_id: create_article_id(doi.as_deref(), &title),
                doi: cell(field(r, Some(c_doi))),
                title,
                year: parse_year(field(r, c_year)),
                journal: cell(field(r, c_journal)),
                authors: aids,
                pdf_url: cell(field(r, c_pdf)),
                landing_page_url: cell(field(r, c_landing)),
                oa_url: cell(field(r, c_oa)),
                old_dois: row_doi[ri].clone().into_iter().collect(),
                ..Article::default()
            });
            report.added += 1;
        }

        report.unmatched = unmatched_rows.len();
        if !unmatched_rows.is_empty() {
            let stem = stem_of(path);
            let out = path.with_file_name(join!(&stem, "_unmatched.csv"));
            write_dataset(&out, &DataSet { headers: ds.headers.clone(), rows: unmatched_rows }, b',')?;
            report.unmatched_path = Some(out);
        }

        logf!(
            "Import OpenAlex: {} DOIs matched ({} articles enhanced), {} added, {} unmatched",
            report.matched_dois,
            report.enhanced,
            report.added,
            report.unmatched
        );
        Ok(report)
    }

    /// Known Aids among an OpenAlex row's comma-separated authors, in order.
    fn match_openalex_authors(&mut self, row: &[String], c_authors: Option<usize>, c_orcids: Option<usize>) -> Vec<String> {
        let orcids = parse_author_orcids(field(row, c_orcids));
        let mut aids = Vec::new();
        for name in field(row, c_authors).split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let orcid = orcids.get(name).map(String::as_str);
            if let Some(m) = self.book.match_name(name, orcid) {
                push_unique(&mut aids, &m.aid);
            }
        }
        aids
    }
}
