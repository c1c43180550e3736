//! Title normalisation for matching the same show across catalogs.
//!
//! Catalogs disagree on punctuation and casing, so titles are compared in
//! a canonical form:
//! 1. Unicode NFKC + lowercase
//! 2. Separator characters to spaces
//! 3. Whitespace collapse
//!
//! Episode titles additionally lose a leading episode number
//! (`"07 - Title"`) before that, see [`normalize_episode_title`].

use unicode_normalization::UnicodeNormalization;

/// Characters treated as word separators.
const SEPARATORS: &[char] = &[
    '/', ',', '.', ':', ';', '\\', '(', ')', '{', '}', '[', ']', '+', '-', '_', '=', '\u{2013}',
    '\u{2014}', '*', '"', '\'', '!', '`', '?', '~', '|',
];

/// Longest number treated as an episode prefix.
const MAX_PREFIX_DIGITS: usize = 4;

/// Normalise a title. Empty or blank input gives an empty string.
pub fn normalize(s: &str) -> String {
    if s.trim().is_empty() {
        return String::new();
    }
    let s = unicode_normalize(s);
    let s = replace_separators(&s);
    collapse_whitespace(&s)
}

/// Normalise an episode title, dropping a leading `"07 - "` number first.
///
/// Series titles keep leading numbers (`"86 - Eighty Six"`), so this is
/// only for titles within one series' episode list.
pub fn normalize_episode_title(s: &str) -> String {
    if s.trim().is_empty() {
        return String::new();
    }
    let s = unicode_normalize(s);
    normalize(strip_episode_prefix(&s))
}

/// A title in comparable form, with its trailing `(YYYY)` split off.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TitleKey {
    pub normalized: String,
    /// Normalised form without the year suffix; equals `normalized` when
    /// the title has none.
    pub without_year: String,
    pub year: Option<u16>,
}

impl TitleKey {
    pub fn new(raw: &str) -> Self {
        let normalized = normalize(raw);
        match split_year_suffix(raw) {
            Some((base, year)) => Self {
                normalized,
                without_year: normalize(base),
                year: Some(year),
            },
            None => Self {
                without_year: normalized.clone(),
                normalized,
                year: None,
            },
        }
    }

    pub fn has_year(&self) -> bool {
        self.year.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

// ── Level 1: Unicode NFKC + case folding ──────────────────────────────

fn unicode_normalize(s: &str) -> String {
    s.nfkc().collect::<String>().to_lowercase()
}

// ── Episode titles: number prefix ─────────────────────────────────────

/// Drop a leading `"07 - "` as used by catalogs that prefix episode titles
/// with their number.
fn strip_episode_prefix(s: &str) -> &str {
    let trimmed = s.trim_start();
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 || digits > MAX_PREFIX_DIGITS {
        return s;
    }

    let rest = trimmed[digits..].trim_start();
    match rest.strip_prefix(|c: char| c == '-' || c == '\u{2013}') {
        Some(after) if after.starts_with(char::is_whitespace) => after,
        _ => s,
    }
}

// ── Level 2: Separators ───────────────────────────────────────────────

fn replace_separators(s: &str) -> String {
    s.chars()
        .map(|c| if SEPARATORS.contains(&c) { ' ' } else { c })
        .collect()
}

// ── Level 3: Whitespace collapse ──────────────────────────────────────

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `"Title (2012)"` into `("Title ", 2012)`.
fn split_year_suffix(raw: &str) -> Option<(&str, u16)> {
    let inner = raw.trim_end().strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let year = &inner[open + 1..];
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((&inner[..open], year.parse().ok()?))
}
