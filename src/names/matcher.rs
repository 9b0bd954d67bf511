// src/names/matcher.rs
//
// Author lookup tables plus the fuzzy matcher that maps a free-text author
// name (and optional ORCID iD) onto a known researcher.
//
// Order of attempts: ORCID, exact standardised name, known alternative
// name, then component scoring (first/last names, hyphenated and compound
// surnames). Every accepted fuzzy match teaches the book a new alternative
// name, so later lookups short-circuit at the cheaper steps.

use std::collections::HashMap;
use std::path::Path;

use crate::{
    Result,
    config::options::MatchingOptions,
    csv::read_csv,
    roster::Author,
    store::field,
};

use super::standardize::std_key;

const COMPOUND_INDICATORS: [&str; 9] = ["van", "von", "der", "den", "de", "la", "le", "di", "da"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameMatch {
    pub aid: String,
    /// Name as stored for the researcher.
    pub fullname: String,
    /// The query only matched through something other than the primary name.
    pub is_alternative: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NameParts {
    pub first: String,
    pub middle: Vec<String>,
    pub last: String,
    pub last_parts: Vec<String>,
}

impl NameParts {
    /// Split an already standardised name.
    pub fn parse(std_name: &str) -> Self {
        let words: Vec<&str> = std_name.split_whitespace().collect();
        let n = words.len();
        let first = words.first().copied().unwrap_or("");
        let last = if n >= 2 { words[n - 1] } else { "" };
        let middle: &[&str] = if n > 2 { &words[1..n - 1] } else { &[] };

        let mut last_parts: Vec<String> = if last.contains('-') {
            let mut v: Vec<String> = last.split('-').map(str::to_string).collect();
            v.push(s!(last));
            v
        } else {
            vec![s!(last)]
        };

        for (i, part) in middle.iter().enumerate() {
            if COMPOUND_INDICATORS.contains(&part.to_lowercase().as_str()) {
                let mut compound: Vec<&str> = middle[i..].to_vec();
                compound.push(last);
                last_parts.push(compound.join(" "));
            }
        }

        Self {
            first: s!(first),
            middle: middle.iter().map(|m| s!(*m)).collect(),
            last: s!(last),
            last_parts,
        }
    }
}

fn contains_long(a: &str, b: &str) -> bool {
    (a.chars().count() >= 4 && b.contains(a)) || (b.chars().count() >= 4 && a.contains(b))
}

/// 0..=130ish; anything at or above the configured minimum is a match.
pub(crate) fn score(q: &NameParts, db: &NameParts) -> u32 {
    let mut score = 0u32;

    // First name: up to 40
    if q.first == db.first {
        score += 40;
    } else {
        let qf: Vec<char> = q.first.chars().collect();
        let df: Vec<char> = db.first.chars().collect();
        if qf.len() >= 3 && df.len() >= 3 {
            let same = qf.iter().zip(&df).filter(|(a, b)| a == b).count() as u32;
            score += (5 * same).min(20);
        }
    }

    // Last name: up to 60 for exact, partial credit otherwise
    if q.last == db.last {
        score += 60;
    } else {
        for part in &q.last_parts {
            if db.last_parts.contains(part) {
                score += 30;
                break;
            }
            if db.last_parts.iter().any(|db_part| contains_long(part, db_part)) {
                score += 20;
            }
        }

        if contains_long(&q.last, &db.last) {
            score += 20;
        }

        if q.last.contains('-') && db.last.contains('-') {
            let db_pieces: Vec<&str> = db.last.split('-').collect();
            let shared = q.last.split('-').filter(|p| db_pieces.contains(p)).count() as u32;
            score += (15 * shared).min(30);
        }
    }

    score
}

/// Researchers plus every lookup table the matcher needs.
#[derive(Clone, Debug, Default)]
pub struct AuthorBook {
    authors: Vec<Author>,
    std_names: Vec<String>,
    parts: Vec<NameParts>,
    last_initials: Vec<Option<char>>,

    by_name: HashMap<String, usize>,
    by_orcid: HashMap<String, usize>,
    by_alt_name: HashMap<String, usize>,
    by_aid: HashMap<String, usize>,
    by_radon_id: HashMap<String, usize>,

    cache: HashMap<(String, Option<String>), Option<NameMatch>>,
    options: MatchingOptions,
}

impl AuthorBook {
    pub fn new(authors: Vec<Author>, options: MatchingOptions) -> Self {
        let mut book = Self { authors, options, ..Self::default() };
        book.reindex();
        book
    }

    /// Rebuild every table from `authors`; drops the match cache.
    pub fn reindex(&mut self) {
        let n = self.authors.len();
        self.std_names = Vec::with_capacity(n);
        self.parts = Vec::with_capacity(n);
        self.last_initials = Vec::with_capacity(n);
        self.by_name.clear();
        self.by_orcid.clear();
        self.by_alt_name.clear();
        self.by_aid.clear();
        self.by_radon_id.clear();
        self.cache.clear();

        for (idx, a) in self.authors.iter().enumerate() {
            let std = std_key(&a.fullname);
            self.last_initials.push(std.split_whitespace().last().and_then(|w| w.chars().next()));
            self.parts.push(NameParts::parse(&std));
            self.by_name.insert(std.clone(), idx);
            self.std_names.push(std);

            self.by_aid.insert(a.aid.clone(), idx);
            self.by_radon_id.insert(a.radon_id.clone(), idx);
            if let Some(orcid) = a.orcid.as_deref().map(str::trim).filter(|o| !o.is_empty()) {
                self.by_orcid.insert(s!(orcid), idx);
            }
            for alt in &a.alternative_names {
                self.by_alt_name.insert(std_key(alt), idx);
            }
        }
        logd!("Names: indexed {} authors ({} with ORCID)", n, self.by_orcid.len());
    }

    pub fn options(&self) -> &MatchingOptions { &self.options }
    pub fn authors(&self) -> &[Author] { &self.authors }
    pub fn len(&self) -> usize { self.authors.len() }
    pub fn is_empty(&self) -> bool { self.authors.is_empty() }

    pub fn get(&self, aid: &str) -> Option<&Author> {
        self.by_aid.get(aid).map(|&i| &self.authors[i])
    }

    pub fn is_known_aid(&self, aid: &str) -> bool {
        self.by_aid.contains_key(aid)
    }

    pub fn aid_for_radon_id(&self, radon_id: &str) -> Option<&str> {
        self.by_radon_id.get(radon_id).map(|&i| self.authors[i].aid.as_str())
    }

    /// Record `name` as another spelling of author `idx`.
    /// Returns false for blanks and names already recorded.
    pub fn add_alternative_name(&mut self, idx: usize, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() { return false; }
        let Some(author) = self.authors.get_mut(idx) else { return false; };
        if author.alternative_names.iter().any(|n| n == name) { return false; }

        author.alternative_names.push(s!(name));
        self.by_alt_name.insert(std_key(name), idx);
        true
    }

    /// `(Aid, alternative name)` pairs; unknown Aids are skipped.
    pub fn import_alternative_names<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut added = 0;
        for (aid, alt) in pairs {
            match self.by_aid.get(&aid).copied() {
                Some(idx) => {
                    if self.add_alternative_name(idx, &alt) { added += 1; }
                }
                None => logw!("Names: no author with Aid {aid}"),
            }
        }
        // Cached misses may now resolve.
        self.cache.clear();
        logf!("Names: added {added} alternative names");
        added
    }

    /// CSV with `Aid` and `alternative_name` columns.
    pub fn import_alternative_names_csv(&mut self, path: &Path) -> Result<usize> {
        let ds = read_csv(path)?;
        let c_aid = ds.require("Aid", path)?;
        let c_alt = ds.require("alternative_name", path)?;
        let pairs: Vec<(String, String)> = ds
            .rows
            .iter()
            .map(|r| (s!(field(r, Some(c_aid)).trim()), s!(field(r, Some(c_alt)))))
            .collect();
        Ok(self.import_alternative_names(pairs))
    }

    fn hit(&self, idx: usize, is_alternative: bool) -> NameMatch {
        let a = &self.authors[idx];
        NameMatch { aid: a.aid.clone(), fullname: a.fullname.clone(), is_alternative }
    }

    /// Resolve a free-text author name. Results (misses included) are
    /// cached per `(name, orcid)`.
    pub fn match_name(&mut self, name: &str, orcid: Option<&str>) -> Option<NameMatch> {
        let key = (s!(name), orcid.map(str::to_string));
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }
        let result = self.resolve(name, orcid);
        self.cache.insert(key, result.clone());
        result
    }

    fn resolve(&mut self, raw: &str, orcid: Option<&str>) -> Option<NameMatch> {
        let mut name = raw.trim();
        let orcid = orcid.map(str::trim).filter(|o| !o.is_empty());

        // "Main Name (Other Spelling)"
        let mut alt: Option<String> = None;
        if let (Some(open), Some(close)) = (name.find('('), name.find(')')) {
            if close > open {
                alt = Some(name[open + 1..close].trim().to_string()).filter(|a| !a.is_empty());
            }
            name = name[..open].trim();
        }

        let std = std_key(name);

        if let Some(&idx) = orcid.and_then(|o| self.by_orcid.get(o)) {
            let is_alt = std != self.std_names[idx];
            if is_alt && name != self.authors[idx].fullname {
                self.add_alternative_name(idx, name);
            }
            if let Some(a) = &alt { self.add_alternative_name(idx, a); }
            return Some(self.hit(idx, is_alt));
        }

        if let Some(&idx) = self.by_name.get(&std) {
            if let Some(a) = &alt { self.add_alternative_name(idx, a); }
            return Some(self.hit(idx, false));
        }

        if let Some(&idx) = self.by_alt_name.get(&std) {
            if let Some(a) = &alt { self.add_alternative_name(idx, a); }
            return Some(self.hit(idx, true));
        }

        self.match_by_components(name, &std, alt.as_deref())
    }

    fn match_by_components(&mut self, name: &str, std: &str, alt: Option<&str>) -> Option<NameMatch> {
        let q = NameParts::parse(std);
        if q.first.is_empty() && q.last.is_empty() {
            return None;
        }

        let q_first = q.first.chars().next();
        let q_last_initial = q.last.chars().next();
        let prefilter = q_last_initial.is_some() && self.authors.len() > self.options.prefilter_threshold;

        let mut best: Option<(usize, u32)> = None;
        for idx in 0..self.authors.len() {
            if prefilter && self.last_initials[idx] != q_last_initial {
                continue;
            }
            let db = &self.parts[idx];
            match (q_first, db.first.chars().next()) {
                (Some(a), Some(b)) if a == b => {}
                _ => continue,
            }

            let sc = score(&q, db);
            let best_score = best.map(|(_, s)| s).unwrap_or(0);
            if sc > best_score && sc >= self.options.min_score {
                best = Some((idx, sc));
            }
        }

        let (idx, sc) = best?;
        logd!("Names: '{name}' ~ '{}' (score {sc})", self.authors[idx].fullname);

        self.add_alternative_name(idx, name);
        if let Some(a) = alt { self.add_alternative_name(idx, a); }
        Some(self.hit(idx, true))
    }
}
