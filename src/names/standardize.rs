// src/names/standardize.rs
//
// Canonical form for comparing researcher names coming from the registry,
// curated sheets, ORCID records, PBN and OpenAlex.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const DASH_CHARS: [char; 25] = [
    '\u{002D}', '\u{058A}', '\u{05BE}', '\u{1400}', '\u{1806}', '\u{2010}', '\u{2011}',
    '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}', '\u{2027}', '\u{2043}', '\u{2053}',
    '\u{207B}', '\u{208B}', '\u{2212}', '\u{2E17}', '\u{2E1A}', '\u{301C}', '\u{3030}',
    '\u{30A0}', '\u{FE58}', '\u{FE63}', '\u{FF0D}',
];

const SPACE_CHARS: [char; 16] = [
    '\u{00A0}', '\u{1680}', '\u{2000}', '\u{2001}', '\u{2002}', '\u{2003}', '\u{2004}',
    '\u{2005}', '\u{2006}', '\u{2007}', '\u{2008}', '\u{2009}', '\u{200A}', '\u{202F}',
    '\u{205F}', '\u{3000}',
];

static SPACED_HYPHEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*-\s*").expect("static regex"));
static WS_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Comparison form of a name: underscores become spaces, NFKD, dash and
/// space variants folded, whitespace collapsed, optionally lowercased.
pub fn standardize(name: &str, lower: bool) -> String {
    let decomposed: String = name
        .replace('_', " ")
        .nfkd()
        .map(|c| if DASH_CHARS.contains(&c) { '-' } else { c })
        .collect();

    let hyphens = SPACED_HYPHEN.replace_all(&decomposed, "-");
    let spaced: String = hyphens
        .chars()
        .map(|c| if SPACE_CHARS.contains(&c) { ' ' } else { c })
        .collect();
    let collapsed = WS_RUN.replace_all(&spaced, " ");
    let trimmed = collapsed.trim();

    if lower { trimmed.to_lowercase() } else { trimmed.to_string() }
}

/// Lowercased comparison key; what the lookup tables are keyed on.
#[inline]
pub fn std_key(name: &str) -> String {
    standardize(name, true)
}

/// Display form: standardised, each word and hyphen part capitalised,
/// recomposed to NFC.
pub fn format_name(name: &str) -> String {
    let std = standardize(name, false);
    let words: Vec<String> = std
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(|w| w.split('-').map(capitalize).collect::<Vec<_>>().join("-"))
        .collect();
    words.join(" ").nfc().collect()
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => s!(),
    }
}
