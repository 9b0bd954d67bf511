// src/corpus/article.rs
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::consts::{DOI_HOST, NO_LINK};

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static regex"));
static WS_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("static regex"));

const TITLE_PREFIX_CHARS: usize = 20;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: String,
    /// As imported (may carry the `https://doi.org/` host).
    pub doi: Option<String>,
    pub title: String,
    pub year: Option<i32>,
    pub journal: Option<String>,
    /// Aids for known researchers, raw names otherwise.
    pub authors: Vec<String>,
    pub pdf_url: Option<String>,
    pub landing_page_url: Option<String>,
    pub oa_url: Option<String>,
    /// Every id this record has carried.
    #[serde(default)]
    pub tracking: Vec<String>,
    /// Every clean DOI this record has carried.
    #[serde(default)]
    pub old_dois: Vec<String>,
    pub file_name: Option<String>,
}

impl Article {
    pub fn clean_doi(&self) -> Option<String> {
        self.doi.as_deref().and_then(clean_doi)
    }

    pub fn has_doi(&self) -> bool {
        self.clean_doi().is_some()
    }

    /// Seed `tracking` with the current id and `old_dois` with the current DOI.
    pub fn init_history(&mut self) {
        if self.tracking.is_empty() {
            self.tracking.push(self.article_id.clone());
        }
        if self.old_dois.is_empty() {
            if let Some(doi) = self.clean_doi() {
                self.old_dois.push(doi);
            }
        }
    }

    pub fn regenerate_id(&mut self) -> &str {
        self.article_id = create_article_id(self.doi.as_deref(), &self.title);
        &self.article_id
    }

    pub fn add_author(&mut self, author: &str) -> bool {
        push_unique(&mut self.authors, author)
    }
}

/// Push unless already present; true when pushed.
pub(crate) fn push_unique(list: &mut Vec<String>, item: &str) -> bool {
    if list.iter().any(|x| x == item) {
        return false;
    }
    list.push(s!(item));
    true
}

/// `https://doi.org/10.1/AbC` -> `10.1/abc`; blank and `empty` are no DOI.
pub fn clean_doi(doi: &str) -> Option<String> {
    let d = doi.replace(DOI_HOST, "").trim().to_lowercase();
    (!d.is_empty() && d != NO_LINK && d != "nan").then_some(d)
}

/// Strip the DOI host, keeping case; `empty` is no DOI.
pub fn strip_doi_host(doi: &str) -> Option<String> {
    let d = doi.trim().trim_start_matches(DOI_HOST).trim();
    (!d.is_empty() && d != NO_LINK && !d.eq_ignore_ascii_case("nan")).then(|| s!(d))
}

/// Year only: a bare 4-digit year in 1900..=2100, else the first 19xx/20xx.
pub fn parse_year(text: &str) -> Option<i32> {
    let t = text.trim();
    if t.len() == 4 && t.chars().all(|c| c.is_ascii_digit()) {
        return t.parse().ok().filter(|y| (1900..=2100).contains(y));
    }
    YEAR.find(t).and_then(|m| m.as_str().parse().ok())
}

/// Lowercase with ASCII punctuation removed; what title comparisons use.
pub fn std_title(title: &str) -> String {
    title.to_lowercase().chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

fn title_code(title: &str) -> String {
    let digest = Sha256::digest(title.as_bytes());
    digest.iter().take(3).map(|b| (b'A' + b % 26) as char).collect()
}

/// Stable article id.
///
/// - DOI: the part after the last `org/`, lowercased, `.` -> `_`, `/` -> `&`
/// - title only: `title_<first 20 chars>_<3 letters from the title>`
/// - neither: `unknown_<8 hex>`
pub fn create_article_id(doi: Option<&str>, title: &str) -> String {
    if let Some(doi) = doi.map(str::trim).filter(|d| !d.is_empty() && *d != NO_LINK) {
        let part = doi.rsplit("org/").next().unwrap_or(doi);
        return part.to_lowercase().replace('.', "_").replace('/', "&");
    }

    let title = title.trim();
    if !title.is_empty() {
        let lowered = title.to_lowercase();
        let stripped = NON_WORD.replace_all(&lowered, "");
        let underscored = WS_RUN.replace_all(&stripped, "_");
        let prefix: String = underscored.chars().take(TITLE_PREFIX_CHARS).collect();
        return join!("title_", &prefix, "_", &title_code(title));
    }

    let uuid = uuid::Uuid::new_v4().simple().to_string();
    join!("unknown_", &uuid[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doi_ids() {
        assert_eq!(create_article_id(Some("https://doi.org/10.1037/XGE.0001"), ""), "10_1037&xge_0001");
        assert_eq!(create_article_id(Some("10.1/a.b"), "ignored"), "10_1&a_b");
    }

    #[test]
    fn title_ids_are_stable() {
        let a = create_article_id(Some("empty"), "Anxiety, Attention & Memory: a review");
        assert!(a.starts_with("title_anxiety_attention_me_"), "{a}");
        assert_eq!(a, create_article_id(None, "Anxiety, Attention & Memory: a review"));
        let code = &a[a.len() - 3..];
        assert!(code.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn unknown_ids() {
        let id = create_article_id(None, "  ");
        assert!(id.starts_with("unknown_"));
        assert_eq!(id.len(), "unknown_".len() + 8);
    }

    #[test]
    fn doi_cleaning() {
        assert_eq!(clean_doi("https://doi.org/10.1/ABC").as_deref(), Some("10.1/abc"));
        assert_eq!(clean_doi("empty"), None);
        assert_eq!(clean_doi(" "), None);
        assert_eq!(strip_doi_host("https://doi.org/10.1/ABC").as_deref(), Some("10.1/ABC"));
    }

    #[test]
    fn years_only() {
        assert_eq!(parse_year("2019"), Some(2019));
        assert_eq!(parse_year("1850"), None);
        assert_eq!(parse_year("2019-03-14"), Some(2019));
        assert_eq!(parse_year("published in 2021 (online)"), Some(2021));
        assert_eq!(parse_year("unrecovered"), None);
    }

    #[test]
    fn history_seeds_once() {
        let mut a = Article { article_id: s!("x"), doi: Some(s!("https://doi.org/10.1/X")), ..Article::default() };
        a.init_history();
        a.init_history();
        assert_eq!(a.tracking, strs!["x"]);
        assert_eq!(a.old_dois, strs!["10.1/x"]);
    }
}
