// src/error.rs
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Config error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Missing column '{column}' in {}", .file.display())]
    MissingColumn { column: String, file: PathBuf },

    #[error("Unknown article id(s): {}", .0.join(", "))]
    UnknownArticles(Vec<String>),

    #[error("Cannot merge: {0}")]
    InvalidMerge(String),

    #[error("Not an ORCID identifier: {0}")]
    InvalidOrcid(String),

    #[error("Path exists but is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn missing_column(column: &str, file: impl Into<PathBuf>) -> Self {
        Error::MissingColumn { column: s!(column), file: file.into() }
    }
}
