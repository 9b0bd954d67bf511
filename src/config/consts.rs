// src/config/consts.rs

// Registry (radon) export columns
pub const COL_ID: &str = "Id";
pub const COL_FIRST_NAME: &str = "Dane podstawowe - Imię";
pub const COL_SECOND_NAME: &str = "Dane podstawowe - Drugie imię";
pub const COL_SURNAME_PREFIX: &str = "Dane podstawowe - Przedrostek nazwiska";
pub const COL_SURNAME: &str = "Dane podstawowe - Nazwisko";
pub const COL_EMPLOYER: &str = "Zatrudnienie - Nazwa";
pub const COL_MAIN_JOB: &str = "Zatrudnienie - Podstawowe miejsce pracy";
pub const COL_DISCIPLINES: &str = "Zatrudnienie - Oświadczone dyscypliny";
pub const COL_DEGREE: &str = "Stopnie naukowe - Stopień naukowy";
pub const COL_DEGREE_YEAR: &str = "Stopnie naukowe - Rok uzyskania stopnia";
pub const MAIN_JOB_YES: &str = "Tak";

// Evaluation table
pub const COL_UNI_CODE: &str = "uni_code";

// Net config
pub const ORCID_API_BASE: &str = "https://pub.orcid.org/v3.0";
pub const ORCID_HOST: &str = "https://orcid.org/";
pub const DOI_HOST: &str = "https://doi.org/";
pub const USER_AGENT: &str = concat!("sonaa/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Local cache
pub const STORE_DIR: &str = ".store";
pub const CONFIG_FILE: &str = "sonaa.toml";
pub const ENV_PREFIX: &str = "SONAA_";

// Data layout
pub const DEFAULT_DATA_DIR: &str = "data";
pub const RADON_EXPORT_FILE: &str = "radon_export.csv";
pub const EVALUATION_FILE: &str = "evaluation.csv";
pub const INSTITUTIONS_SUBDIR: &str = "institutions";
pub const WORKS_SUBDIR: &str = "works";
pub const PDF_SUBDIR: &str = "pdfs";
pub const ALL_AUTHORS_FILE: &str = "all_authors.csv";
pub const SELECTED_AUTHORS_FILE: &str = "selected_authors.csv";
pub const RAW_ARTICLES_FILE: &str = "raw_article_list.csv";
pub const FAILED_FILE: &str = "failed.csv";
pub const CORPUS_FILE: &str = "corpus.json";
pub const SHEET_STEM: &str = "names";

// Scrape
pub const DEFAULT_YEAR_FROM: i32 = 2017;
pub const DEFAULT_YEAR_TO: i32 = 2022; // exclusive
pub const UNRECOVERED: &str = "unrecovered";
pub const NO_LINK: &str = "empty";

// Name matching
pub const MIN_MATCH_SCORE: u32 = 50;
pub const PREFILTER_THRESHOLD: usize = 100;

// Deduplication
pub const SIMILAR_MAX_PAIRS: usize = 20;
pub const SIMILAR_NGRAM: usize = 4;
pub const SIMILAR_MIN_SHARED: usize = 1;
pub const MAX_TITLES_PER_NGRAM: usize = 30;
pub const MIN_TITLE_LEN: usize = 5;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_AUTHORS_SUBDIR: &str = "authors";
pub const DEFAULT_WORKS_SUBDIR: &str = "works";
pub const DEFAULT_ARTICLES_SUBDIR: &str = "articles";
pub const DEFAULT_FILE: &str = "all";

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms
