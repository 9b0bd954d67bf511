// src/corpus/dedup.rs
//
// Duplicate handling, in the order `clean` applies it:
//   1. same clean DOI            merged
//   2. same standardised title   merged unless the group holds different DOIs
//   3. similar titles            reported for a human to look at

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::{
    Error, Result,
    config::{
        consts::{MAX_TITLES_PER_NGRAM, MIN_TITLE_LEN, NO_LINK},
        options::DedupOptions,
    },
};

use super::{
    Corpus,
    article::{push_unique, std_title},
};

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("static regex"));

/// Same title, different DOIs: left for a human.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleConflict {
    pub title: String,
    /// (clean DOI or `empty`, Article_IDs)
    pub groups: Vec<(String, Vec<String>)>,
}

/// Two articles sharing `shared` word n-grams; indices into `articles`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimilarPair {
    pub shared: usize,
    pub first: usize,
    pub second: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// (kept title, absorbed title)
    pub doi_merged: Vec<(String, String)>,
    pub title_merged: Vec<(String, String)>,
    pub conflicts: Vec<TitleConflict>,
    /// Indices refer to the corpus after cleaning.
    pub similar: Vec<SimilarPair>,
}

fn word_ngrams(title: &str, n: usize) -> HashSet<String> {
    let words: Vec<&str> = WORD.find_iter(title).map(|m| m.as_str()).collect();
    if words.len() < n.max(1) {
        return HashSet::from([words.join(" ")]);
    }
    words.windows(n.max(1)).map(|w| w.join(" ")).collect()
}

impl Corpus {
    /// Groups (clean DOI, indices) with at least two articles, first-seen order.
    pub fn identify_doi_duplicates(&self) -> Vec<(String, Vec<usize>)> {
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        let mut slot: HashMap<String, usize> = HashMap::new();
        for (i, a) in self.articles.iter().enumerate() {
            let Some(doi) = a.clean_doi() else { continue };
            match slot.get(&doi) {
                Some(&g) => groups[g].1.push(i),
                None => {
                    slot.insert(doi.clone(), groups.len());
                    groups.push((doi, vec![i]));
                }
            }
        }
        groups.retain(|(_, idx)| idx.len() > 1);
        groups
    }

    /// Mergeable groups (std title, indices with DOI-bearing first) and the
    /// conflicting ones.
    pub fn identify_title_duplicates(&self) -> (Vec<(String, Vec<usize>)>, Vec<TitleConflict>) {
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        let mut slot: HashMap<String, usize> = HashMap::new();
        for (i, a) in self.articles.iter().enumerate() {
            let t = std_title(&a.title);
            if t.trim().is_empty() || t.chars().count() < MIN_TITLE_LEN {
                continue;
            }
            match slot.get(&t) {
                Some(&g) => groups[g].1.push(i),
                None => {
                    slot.insert(t.clone(), groups.len());
                    groups.push((t, vec![i]));
                }
            }
        }

        let mut mergeable = Vec::new();
        let mut conflicts = Vec::new();
        for (title, idx) in groups.into_iter().filter(|(_, idx)| idx.len() > 1) {
            let mut by_doi: Vec<(String, Vec<usize>)> = Vec::new();
            let mut no_doi: Vec<usize> = Vec::new();
            for &i in &idx {
                match self.articles[i].clean_doi() {
                    None => no_doi.push(i),
                    Some(d) => match by_doi.iter_mut().find(|(g, _)| *g == d) {
                        Some((_, v)) => v.push(i),
                        None => by_doi.push((d, vec![i])),
                    },
                }
            }

            if by_doi.len() > 1 {
                let ids = |v: &[usize]| v.iter().map(|&i| self.articles[i].article_id.clone()).collect::<Vec<_>>();
                let mut conflict_groups: Vec<(String, Vec<String>)> =
                    by_doi.iter().map(|(d, v)| (d.clone(), ids(v))).collect();
                if !no_doi.is_empty() {
                    conflict_groups.push((s!(NO_LINK), ids(&no_doi)));
                }
                conflicts.push(TitleConflict {
                    title: self.articles[idx[0]].title.clone(),
                    groups: conflict_groups,
                });
            } else {
                let mut ordered: Vec<usize> = by_doi.into_iter().flat_map(|(_, v)| v).collect();
                ordered.extend(no_doi);
                mergeable.push((title, ordered));
            }
        }
        (mergeable, conflicts)
    }

    /// Pairs of titles sharing word n-grams, most shared first.
    pub fn identify_similar_titles(&self, max_pairs: usize, n: usize, min_shared: usize) -> Vec<SimilarPair> {
        let mut by_ngram: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, a) in self.articles.iter().enumerate() {
            let t = std_title(&a.title);
            if t.trim().is_empty() || t.chars().count() < MIN_TITLE_LEN {
                continue;
            }
            for g in word_ngrams(&t, n) {
                by_ngram.entry(g).or_default().push(i);
            }
        }

        let mut counts: HashMap<(usize, usize), usize> = HashMap::new();
        for titles in by_ngram.values().filter(|t| t.len() > 1 && t.len() <= MAX_TITLES_PER_NGRAM) {
            for (k, &a) in titles.iter().enumerate() {
                for &b in &titles[k + 1..] {
                    *counts.entry((a.min(b), a.max(b))).or_default() += 1;
                }
            }
        }

        let mut pairs: Vec<SimilarPair> = counts
            .into_iter()
            .filter(|&(_, c)| c >= min_shared)
            .map(|((first, second), shared)| SimilarPair { shared, first, second })
            .collect();
        pairs.sort_unstable_by(|a, b| b.cmp(a));
        logd!("Dedup: {} similar title pairs (keeping {max_pairs})", pairs.len());
        pairs.truncate(max_pairs);
        pairs
    }

    /// First article in corpus order with a DOI, else the first id given.
    fn survivor(&self, ids: &[&str]) -> Option<usize> {
        let positions: Vec<usize> = ids.iter().filter_map(|id| self.position(id)).collect();
        positions
            .iter()
            .copied()
            .filter(|&i| self.articles[i].has_doi())
            .min()
            .or_else(|| ids.first().and_then(|id| self.position(id)))
    }

    /// Fold `ids` into one article and return its new id.
    ///
    /// The survivor is the first article in corpus order with a DOI, else the
    /// first id given. History, DOIs and authors are unioned; a missing DOI,
    /// year or URL is taken from the others. Absorbed articles are removed.
    pub fn merge_articles(&mut self, ids: &[String]) -> Result<String> {
        let mut unique: Vec<&str> = Vec::new();
        for id in ids {
            if !unique.contains(&id.as_str()) {
                unique.push(id);
            }
        }
        if unique.len() < 2 {
            return Err(Error::InvalidMerge(format!("need at least two distinct ids, got {ids:?}")));
        }

        let missing: Vec<String> = unique.iter().filter(|id| self.position(id).is_none()).map(|id| s!(*id)).collect();
        if !missing.is_empty() {
            return Err(Error::UnknownArticles(missing));
        }

        let mut members: Vec<usize> = unique.iter().filter_map(|id| self.position(id)).collect();
        members.sort_unstable();
        let main = self
            .survivor(&unique)
            .ok_or_else(|| Error::UnknownArticles(vec![s!(unique[0])]))?;

        let mut merged = self.articles[main].clone();
        merged.init_history();

        for &i in members.iter().filter(|&&i| i != main) {
            let mut other = self.articles[i].clone();
            other.init_history();

            for t in &other.tracking {
                push_unique(&mut merged.tracking, t);
            }
            for d in &other.old_dois {
                push_unique(&mut merged.old_dois, d);
            }
            for a in &other.authors {
                push_unique(&mut merged.authors, a);
            }

            if !merged.has_doi() && other.has_doi() {
                merged.doi = other.doi.clone();
                if let Some(d) = other.clean_doi() {
                    push_unique(&mut merged.old_dois, &d);
                }
            }
            if merged.year.is_none() {
                merged.year = other.year;
            }
            for (mine, theirs) in [
                (&mut merged.pdf_url, &other.pdf_url),
                (&mut merged.landing_page_url, &other.landing_page_url),
                (&mut merged.oa_url, &other.oa_url),
            ] {
                if mine.is_none() {
                    mine.clone_from(theirs);
                }
            }
        }

        let new_id = s!(merged.regenerate_id());
        self.articles[main] = merged;

        let mut absorbed: Vec<usize> = members.into_iter().filter(|&i| i != main).collect();
        absorbed.sort_unstable_by(|a, b| b.cmp(a));
        for i in absorbed {
            self.articles.remove(i);
        }

        logd!("Dedup: merged {} -> {new_id}", unique.join(", "));
        Ok(new_id)
    }

    /// Merge DOI duplicates, then title duplicates without DOI conflicts, and
    /// report conflicts plus the most similar remaining titles.
    pub fn clean(&mut self, options: &DedupOptions) -> CleanReport {
        let mut report = CleanReport::default();
        if self.articles.is_empty() {
            logw!("Dedup: no articles to clean");
            return report;
        }

        for a in &mut self.articles {
            a.init_history();
        }

        let doi_groups: Vec<Vec<usize>> = self.identify_doi_duplicates().into_iter().map(|(_, idx)| idx).collect();
        report.doi_merged = self.merge_groups(doi_groups);
        logf!("Dedup: {} articles merged by DOI", report.doi_merged.len());

        let (title_groups, conflicts) = self.identify_title_duplicates();
        report.title_merged = self.merge_groups(title_groups.into_iter().map(|(_, idx)| idx).collect());
        report.conflicts = conflicts;
        logf!(
            "Dedup: {} articles merged by title, {} title conflicts",
            report.title_merged.len(),
            report.conflicts.len()
        );

        report.similar = self.identify_similar_titles(options.similar_max_pairs, options.ngram_size, options.min_shared);
        report
    }

    /// Merge each group (indices into the current corpus). The survivor ends
    /// up carrying every DOI its group ever had.
    fn merge_groups(&mut self, groups: Vec<Vec<usize>>) -> Vec<(String, String)> {
        // Resolve to ids first; merging shifts indices.
        let groups: Vec<Vec<(String, String)>> = groups
            .into_iter()
            .map(|idx| {
                idx.iter()
                    .map(|&i| (self.articles[i].article_id.clone(), self.articles[i].title.clone()))
                    .collect()
            })
            .collect();

        let mut merged_titles = Vec::new();
        for group in groups {
            let ids: Vec<String> = group.iter().map(|(id, _)| id.clone()).collect();
            let mut all_dois: Vec<String> = Vec::new();
            for id in &ids {
                if let Some(a) = self.get(id) {
                    for d in a.clean_doi().into_iter().chain(a.old_dois.iter().cloned()) {
                        push_unique(&mut all_dois, &d);
                    }
                }
            }
            let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            let kept_id = self.survivor(&id_refs).map(|i| self.articles[i].article_id.clone());

            match self.merge_articles(&ids) {
                Ok(new_id) => {
                    let Some(pos) = self.position(&new_id) else { continue };
                    self.articles[pos].old_dois = all_dois;
                    let kept = self.articles[pos].title.clone();
                    merged_titles.extend(
                        group
                            .into_iter()
                            .filter(|(id, _)| Some(id) != kept_id.as_ref())
                            .map(|(_, t)| (kept.clone(), t)),
                    );
                }
                Err(e) => logw!("Dedup: could not merge {}: {e}", ids.join(", ")),
            }
        }
        merged_titles
    }

    /// One comma-separated group of Article_IDs per line. Blank lines and
    /// `#` comments are skipped; a failing group is logged and skipped.
    pub fn apply_merge_list(&mut self, path: &Path) -> Result<usize> {
        let text = fs::read_to_string(path)?;
        let mut merged = 0usize;
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let ids: Vec<String> = line.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect();
            match self.merge_articles(&ids) {
                Ok(new_id) => {
                    logd!("Merge list line {}: -> {new_id}", n + 1);
                    merged += 1;
                }
                Err(e) => logw!("Merge list line {}: {e}", n + 1),
            }
        }
        logf!("Merge list: {merged} groups merged from {}", path.display());
        Ok(merged)
    }
}
