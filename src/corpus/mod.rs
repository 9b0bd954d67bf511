// src/corpus/mod.rs
//! The article corpus: researchers (through an [`AuthorBook`]), their
//! articles gathered from ORCID, PBN and OpenAlex exports, and the PDF files
//! linked to them.
//!
//! A corpus is built in steps (`import`), cleaned (`dedup`), linked to files
//! (`files`) and persisted as one JSON document between runs.

pub mod article;
pub mod dedup;
pub mod files;
pub mod import;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    config::options::MatchingOptions,
    file::ensure_parent,
    names::AuthorBook,
    roster::{Author, author_headers, author_row},
    store::DataSet,
};

pub use article::{Article, clean_doi, create_article_id, parse_year};
pub use dedup::{CleanReport, SimilarPair, TitleConflict};
pub use files::FileReport;
pub use import::OpenAlexReport;

pub const ARTICLE_HEADERS: [&str; 12] = [
    "Article_ID",
    "doi",
    "title",
    "year",
    "journal",
    "authors",
    "pdf_url",
    "landing_page_url",
    "oa_url",
    "tracking",
    "old_dois",
    "file_name",
];

const LIST_SEP: &str = "; ";

/// A file found under the PDF directory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,
    /// File name without extension; what articles are matched against.
    pub stem: String,
}

#[derive(Default, Serialize, Deserialize)]
struct CorpusDoc {
    authors: Vec<Author>,
    articles: Vec<Article>,
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Clone, Debug, Default)]
pub struct Corpus {
    book: AuthorBook,
    pub articles: Vec<Article>,
    pub files: Vec<FileEntry>,
}

impl Corpus {
    pub fn with_authors(authors: Vec<Author>, matching: MatchingOptions) -> Self {
        Self { book: AuthorBook::new(authors, matching), ..Self::default() }
    }

    pub fn book(&self) -> &AuthorBook { &self.book }
    pub fn book_mut(&mut self) -> &mut AuthorBook { &mut self.book }
    pub fn authors(&self) -> &[Author] { self.book.authors() }
    pub fn len(&self) -> usize { self.articles.len() }
    pub fn is_empty(&self) -> bool { self.articles.is_empty() }

    pub fn position(&self, article_id: &str) -> Option<usize> {
        self.articles.iter().position(|a| a.article_id == article_id)
    }

    pub fn get(&self, article_id: &str) -> Option<&Article> {
        self.position(article_id).map(|i| &self.articles[i])
    }

    /// `Aid, alternative_name` CSV into the author book.
    pub fn import_alternative_names(&mut self, path: &Path) -> Result<usize> {
        self.book.import_alternative_names_csv(path)
    }

    /* ---------------- Persistence ---------------- */

    pub fn save(&self, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let doc = CorpusDoc {
            authors: self.book.authors().to_vec(),
            articles: self.articles.clone(),
            files: self.files.clone(),
        };
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &doc)?;
        logf!(
            "Corpus: saved {} authors, {} articles, {} files to {}",
            doc.authors.len(),
            doc.articles.len(),
            doc.files.len(),
            path.display()
        );
        Ok(())
    }

    /// Load a saved corpus and rebuild the author index.
    pub fn load(path: &Path, matching: MatchingOptions) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let doc: CorpusDoc = serde_json::from_reader(reader)?;
        logf!("Corpus: loaded {} articles from {}", doc.articles.len(), path.display());
        Ok(Self {
            book: AuthorBook::new(doc.authors, matching),
            articles: doc.articles,
            files: doc.files,
        })
    }

    /* ---------------- Tables ---------------- */

    pub fn authors_table(&self) -> DataSet {
        DataSet::new(author_headers(), self.book.authors().iter().map(author_row).collect())
    }

    pub fn articles_table(&self) -> DataSet {
        let headers = ARTICLE_HEADERS.iter().map(|h| s!(*h)).collect();
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        let rows = self
            .articles
            .iter()
            .map(|a| {
                vec![
                    a.article_id.clone(),
                    opt(&a.doi),
                    a.title.clone(),
                    a.year.map(|y| y.to_string()).unwrap_or_default(),
                    opt(&a.journal),
                    a.authors.join(LIST_SEP),
                    opt(&a.pdf_url),
                    opt(&a.landing_page_url),
                    opt(&a.oa_url),
                    a.tracking.join(LIST_SEP),
                    a.old_dois.join(LIST_SEP),
                    opt(&a.file_name),
                ]
            })
            .collect();
        DataSet::new(headers, rows)
    }
}
