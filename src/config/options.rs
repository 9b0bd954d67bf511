// src/config/options.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::consts::*;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub paths: PathOptions,
    pub scrape: ScrapeOptions,
    pub matching: MatchingOptions,
    pub roster: RosterOptions,
    pub dedup: DedupOptions,

    /// GUI-only; not part of the config file.
    #[serde(skip)]
    pub export: ExportOptions,
}

/* ---------------- Paths ---------------- */

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptions {
    pub data_dir: PathBuf,
    pub store_dir: PathBuf,
    pub radon_export: PathBuf,
    pub evaluation: PathBuf,
    pub institutions_dir: PathBuf,
    pub works_dir: PathBuf,
    pub pdf_dir: PathBuf,
    pub corpus: PathBuf,
}

impl Default for PathOptions {
    fn default() -> Self {
        let data = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            radon_export: data.join(RADON_EXPORT_FILE),
            evaluation: data.join(EVALUATION_FILE),
            institutions_dir: data.join(INSTITUTIONS_SUBDIR),
            works_dir: data.join(WORKS_SUBDIR),
            pdf_dir: data.join(PDF_SUBDIR),
            corpus: data.join(CORPUS_FILE),
            store_dir: PathBuf::from(STORE_DIR),
            data_dir: data,
        }
    }
}

impl PathOptions {
    pub fn all_authors(&self) -> PathBuf { self.data_dir.join(ALL_AUTHORS_FILE) }
    pub fn selected_authors(&self) -> PathBuf { self.data_dir.join(SELECTED_AUTHORS_FILE) }
    pub fn raw_articles(&self) -> PathBuf { self.works_dir.join(RAW_ARTICLES_FILE) }
}

/* ---------------- Scrape ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InstitutionSelector {
    #[default]
    All,
    One(String),
    Names(Vec<String>),
}

impl InstitutionSelector {
    /// Narrow `available` (already sorted) down to the selection.
    pub fn resolve(&self, available: &[String]) -> Vec<String> {
        match self {
            InstitutionSelector::All => available.to_vec(),
            InstitutionSelector::One(name) => available.iter().filter(|a| *a == name).cloned().collect(),
            InstitutionSelector::Names(names) => available.iter().filter(|a| names.contains(a)).cloned().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    pub api_base: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub workers: usize,
    pub pause_ms: u64,
    pub jitter_ms: u64,
    /// Inclusive lower bound on publication year.
    pub year_from: i32,
    /// Exclusive upper bound on publication year.
    pub year_to: i32,

    #[serde(skip)]
    pub institutions: InstitutionSelector,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            api_base: s!(ORCID_API_BASE),
            user_agent: s!(USER_AGENT),
            timeout_secs: HTTP_TIMEOUT_SECS,
            workers: WORKERS,
            pause_ms: REQUEST_PAUSE_MS,
            jitter_ms: JITTER_MS,
            year_from: DEFAULT_YEAR_FROM,
            year_to: DEFAULT_YEAR_TO,
            institutions: InstitutionSelector::All,
        }
    }
}

/* ---------------- Matching / roster / dedup ---------------- */

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingOptions {
    pub min_score: u32,
    /// Above this many authors, candidates are prefiltered by surname initial.
    pub prefilter_threshold: usize,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        Self { min_score: MIN_MATCH_SCORE, prefilter_threshold: PREFILTER_THRESHOLD }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterOptions {
    /// Full names shared by several researchers; never auto-assigned an ORCID.
    pub ambiguous_names: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupOptions {
    pub similar_max_pairs: usize,
    pub ngram_size: usize,
    pub min_shared: usize,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            similar_max_pairs: SIMILAR_MAX_PAIRS,
            ngram_size: SIMILAR_NGRAM,
            min_shared: SIMILAR_MIN_SHARED,
        }
    }
}

/* ---------------- Pages ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageKind {
    Authors,
    Works,
    Articles,
}

impl PageKind {
    pub fn subdir(&self) -> &'static str {
        match self {
            PageKind::Authors => DEFAULT_AUTHORS_SUBDIR,
            PageKind::Works => DEFAULT_WORKS_SUBDIR,
            PageKind::Articles => DEFAULT_ARTICLES_SUBDIR,
        }
    }
}

/* ---------------- Export ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportType {
    SingleFile,
    PerInstitution,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> u8 {
        match self { ExportFormat::Csv => b',', ExportFormat::Tsv => b'\t' }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub export_type: ExportType,
    out_path: OutputPath,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            export_type: ExportType::SingleFile,
            out_path: OutputPath::default(),
            include_headers: true,
        }
    }
}

impl ExportOptions {
    pub fn default_dir_for(kind: PageKind) -> PathBuf {
        PathBuf::from(DEFAULT_OUT_DIR).join(kind.subdir())
    }

    pub fn set_default_dir_for_page(&mut self, kind: PageKind) {
        self.out_path.dir = Self::default_dir_for(kind);
    }

    pub fn current_dir(&self) -> &Path {
        &self.out_path.dir
    }

    /// True while neither dir, stem nor extension has been customised.
    pub fn is_fully_default_for(&self, kind: PageKind) -> bool {
        self.out_path.dir == Self::default_dir_for(kind)
            && self.out_path.file_stem == OsString::from(DEFAULT_FILE)
            && self.out_path.ext.is_none()
    }

    pub fn join_dir_and_filename(dir: &Path, file_name: impl AsRef<Path>) -> PathBuf {
        dir.join(file_name)
    }

    /// Page switch from `prev` to `next` while the output field shows `text`.
    /// When the field still points into `prev`'s default directory, move to
    /// `next`'s default and return the new field text; the typed file name
    /// is kept. `None` leaves everything as it was.
    pub fn follow_page(&mut self, text: &str, prev: PageKind, next: PageKind) -> Option<String> {
        let text_path = Path::new(text);
        let shown_dir: PathBuf = match self.export_type {
            ExportType::SingleFile => text_path.parent().map_or_else(|| self.out_path.dir.clone(), Path::to_path_buf),
            ExportType::PerInstitution => text_path.to_path_buf(),
        };

        let same = |a: &Path, b: &Path| a.components().eq(b.components());
        if !same(&shown_dir, &Self::default_dir_for(prev)) {
            return None;
        }

        self.set_default_dir_for_page(next);
        let new_dir = Self::default_dir_for(next);
        let new_text = match self.export_type {
            ExportType::SingleFile => {
                let file_name = text_path
                    .file_name()
                    .map(OsString::from)
                    .unwrap_or_else(|| self.out_path().file_name().unwrap_or_default().to_owned());
                Self::join_dir_and_filename(&new_dir, file_name)
            }
            ExportType::PerInstitution => new_dir,
        };
        Some(new_text.to_string_lossy().into_owned())
    }

    pub fn out_path(&self) -> PathBuf {
        let mut path = self.out_path.dir.clone();

        match self.export_type {
            ExportType::SingleFile => {
                let stem = self.out_path.file_stem.to_string_lossy();
                // A user-typed extension wins over the format's.
                let ext = self.out_path.ext.as_deref().unwrap_or(self.format.ext());
                path.push(join!(&*stem, ".", ext));
            }
            ExportType::PerInstitution => { /* directory only */ }
        }
        path
    }

    /// Parse GUI/CLI text into dir + stem (+ explicit extension, if typed).
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();

        match self.export_type {
            ExportType::SingleFile => {
                let p = Path::new(s);
                if let Some(parent) = p.parent() {
                    self.out_path.dir = parent.to_path_buf();
                }
                if let Some(stem) = p.file_stem() {
                    self.out_path.file_stem = stem.to_os_string();
                }
                let fmt_ext = self.format.ext();
                self.out_path.ext = p
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .filter(|e| e != fmt_ext);
            }
            ExportType::PerInstitution => {
                self.out_path.dir = PathBuf::from(s);
            }
        }
    }

    pub fn delimiter(&self) -> u8 {
        self.format.delim()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPath {
    dir: PathBuf,
    file_stem: OsString, // without extension
    ext: Option<String>, // only when it differs from the format's
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: ExportOptions::default_dir_for(PageKind::Authors),
            file_stem: OsString::from(DEFAULT_FILE),
            ext: None,
        }
    }
}
