// src/corpus/files.rs
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::{Error, Result, csv::write_csv, file::stem_of};

use super::{Corpus, FileEntry};

const ARTICLES_WITHOUT_FILES: &str = "articles_without_files.csv";
const FILES_WITHOUT_ARTICLES: &str = "files_without_articles.csv";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileReport {
    pub files: usize,
    pub articles_with_files: usize,
    pub articles_without_files: usize,
    pub files_without_articles: usize,
}

impl Corpus {
    /// Link articles to files under `dir` by file stem: the stored
    /// `file_name` first, then the Article_ID, then every tracked id.
    /// Writes the non-empty "without" reports into `dir`.
    pub fn update_files(&mut self, dir: &Path) -> Result<FileReport> {
        if !dir.is_dir() {
            return Err(Error::NotADirectory(dir.to_path_buf()));
        }

        self.files.clear();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if name == ARTICLES_WITHOUT_FILES || name == FILES_WITHOUT_ARTICLES {
                continue;
            }
            let stem = stem_of(entry.path());
            self.files.push(FileEntry { path: entry.into_path(), stem });
        }

        let mut by_stem: HashMap<&str, usize> = HashMap::new();
        for (i, f) in self.files.iter().enumerate() {
            by_stem.entry(f.stem.as_str()).or_insert(i);
        }

        let mut matched: HashSet<usize> = HashSet::new();
        let mut without: Vec<Vec<String>> = Vec::new();
        let mut with_files = 0usize;

        for a in &mut self.articles {
            let mut hits: Vec<usize> = Vec::new();
            let candidates = a
                .file_name
                .iter()
                .chain(std::iter::once(&a.article_id))
                .chain(a.tracking.iter());
            for key in candidates {
                if let Some(&i) = by_stem.get(key.as_str()) {
                    if !hits.contains(&i) {
                        hits.push(i);
                    }
                }
            }

            match hits.first() {
                Some(&first) => {
                    a.file_name = Some(self.files[first].stem.clone());
                    matched.extend(hits);
                    with_files += 1;
                }
                None => without.push(vec![
                    a.article_id.clone(),
                    a.doi.clone().unwrap_or_default(),
                    a.title.clone(),
                    a.year.map(|y| y.to_string()).unwrap_or_default(),
                    a.authors.join("; "),
                ]),
            }
        }

        let orphans: Vec<Vec<String>> = self
            .files
            .iter()
            .enumerate()
            .filter(|(i, _)| !matched.contains(i))
            .map(|(_, f)| vec![f.stem.clone(), f.path.display().to_string()])
            .collect();

        write_report(
            &dir.join(ARTICLES_WITHOUT_FILES),
            &strs!["Article_ID", "doi", "title", "year", "authors"],
            &without,
        )?;
        write_report(&dir.join(FILES_WITHOUT_ARTICLES), &strs!["filename", "path"], &orphans)?;

        let report = FileReport {
            files: self.files.len(),
            articles_with_files: with_files,
            articles_without_files: without.len(),
            files_without_articles: orphans.len(),
        };
        logf!(
            "Files: {} files, {} articles linked, {} without files, {} orphan files",
            report.files,
            report.articles_with_files,
            report.articles_without_files,
            report.files_without_articles
        );
        Ok(report)
    }
}

/// Empty reports are not written; one left from an earlier run is removed.
fn write_report(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    if !rows.is_empty() {
        return write_csv(path, headers, rows);
    }
    if path.is_file() {
        fs::remove_file(path)?;
        logd!("Files: removed stale {}", path.display());
    }
    Ok(())
}
