// src/core/sanitize.rs

/// Collapse whitespace runs into single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Spreadsheet exports spell "no value" in several ways.
pub fn is_blank(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.eq_ignore_ascii_case("nan") || t.eq_ignore_ascii_case("none")
}

/// Trimmed cell value, or None when blank.
pub fn cell(s: &str) -> Option<String> {
    if is_blank(s) {
        None
    } else {
        Some(s.trim().to_string())
    }
}

/// Institution names become file stems; keep letters (Polish included),
/// digits, '-' and '_', fold whitespace into '_'.
pub fn sanitize_filename(name: &str, idx: usize) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
            last_us = false;
        } else if ch.is_whitespace() {
            if !last_us {
                out.push('_');
                last_us = true;
            }
        } else if ch == '-' || ch == '_' {
            if !(last_us && ch == '_') {
                out.push(ch);
            }
            last_us = ch == '_';
        }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() {
        format!("institution_{}", idx)
    } else {
        out
    }
}
