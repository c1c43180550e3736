use std::collections::HashMap;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::normalize::TitleKey;

/// One title of one series, as supplied by a title list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleEntry {
    pub series_id: u32,
    pub title: String,
    pub language: String,
}

/// The series a title resolved to, and which of its titles matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleMatch {
    pub series_id: u32,
    pub title: String,
}

/// Result of a title lookup that may fall back to fuzzy scoring.
#[derive(Debug, Clone, PartialEq)]
pub enum TitleMatchResult {
    Exact(TitleMatch),
    /// Fuzzy match with confidence score (0.0–1.0).
    Fuzzy(TitleMatch, f64),
    NoMatch,
}

#[derive(Debug, Clone)]
struct IndexedTitle {
    series_id: u32,
    title: String,
    key: TitleKey,
}

/// Pre-built index from normalised title to series.
///
/// Every title of every series is indexed twice: by its full normalised
/// form and by that form with a trailing `(YYYY)` removed. The index is
/// immutable once built.
#[derive(Debug, Clone, Default)]
pub struct SeriesTitleIndex {
    titles: Vec<IndexedTitle>,
    exact_index: HashMap<String, Vec<usize>>,
    stripped_index: HashMap<String, Vec<usize>>,
}

impl SeriesTitleIndex {
    pub fn build(entries: impl IntoIterator<Item = TitleEntry>) -> Self {
        let mut index = Self::default();
        for entry in entries {
            let key = TitleKey::new(&entry.title);
            if key.is_empty() {
                continue;
            }
            let position = index.titles.len();
            index
                .exact_index
                .entry(key.normalized.clone())
                .or_default()
                .push(position);
            index
                .stripped_index
                .entry(key.without_year.clone())
                .or_default()
                .push(position);
            index.titles.push(IndexedTitle {
                series_id: entry.series_id,
                title: entry.title,
                key,
            });
        }

        info!(
            titles = index.titles.len(),
            keys = index.exact_index.len(),
            "Title index built"
        );
        index
    }

    /// Build from the titles in `languages` only; an empty list keeps all.
    pub fn build_for_languages(
        entries: impl IntoIterator<Item = TitleEntry>,
        languages: &[String],
    ) -> Self {
        Self::build(
            entries
                .into_iter()
                .filter(|e| languages.is_empty() || languages.iter().any(|l| *l == e.language)),
        )
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Resolve a title to exactly one series.
    ///
    /// Flow: exact normalised key → year-stripped key. When several
    /// candidates share a key, those whose own title has a year suffix are
    /// preferred if the query has one, and those without otherwise. A
    /// result that still names more than one series is `None`.
    pub fn find_by_title(&self, query: &str) -> Option<TitleMatch> {
        let key = TitleKey::new(query);
        if key.is_empty() {
            return None;
        }

        if let Some(hits) = self.exact_index.get(&key.normalized) {
            return self.pick(hits, &key, query);
        }
        let hits = self.stripped_index.get(&key.without_year)?;
        self.pick(hits, &key, query)
    }

    /// Exact lookup, then a fuzzy scan over every normalised title.
    #[tracing::instrument(name = "match_title", skip_all, fields(query = %query))]
    pub fn match_title(&self, query: &str, threshold: f64) -> TitleMatchResult {
        if let Some(found) = self.find_by_title(query) {
            return TitleMatchResult::Exact(found);
        }

        let key = TitleKey::new(query);
        if key.is_empty() || self.titles.is_empty() {
            return TitleMatchResult::NoMatch;
        }

        let matcher = SkimMatcherV2::default();
        let max_possible = matcher
            .fuzzy_match(&key.normalized, &key.normalized)
            .unwrap_or(1)
            .max(1);

        let mut best_score: i64 = 0;
        let mut best: Option<&IndexedTitle> = None;
        for title in &self.titles {
            let score = matcher
                .fuzzy_match(&title.key.normalized, &key.normalized)
                .unwrap_or(0);
            if score > best_score {
                best_score = score;
                best = Some(title);
            }
        }

        if let Some(title) = best {
            let confidence = best_score as f64 / max_possible as f64;
            if confidence >= threshold {
                debug!(
                    matched = %title.title,
                    confidence = format!("{:.1}%", confidence * 100.0),
                    "Fuzzy title hit"
                );
                return TitleMatchResult::Fuzzy(title.to_match(), confidence);
            }
        }

        debug!("No title match");
        TitleMatchResult::NoMatch
    }

    fn pick(&self, hits: &[usize], key: &TitleKey, query: &str) -> Option<TitleMatch> {
        let candidates: Vec<&IndexedTitle> = hits.iter().map(|&i| &self.titles[i]).collect();
        let preferred: Vec<&IndexedTitle> = candidates
            .iter()
            .copied()
            .filter(|t| t.key.has_year() == key.has_year())
            .collect();
        let pool = if preferred.is_empty() {
            candidates
        } else {
            preferred
        };

        let first = pool.first()?;
        if pool.iter().any(|t| t.series_id != first.series_id) {
            let mut series: Vec<u32> = pool.iter().map(|t| t.series_id).collect();
            series.sort_unstable();
            series.dedup();
            debug!(query, ?series, "Title is ambiguous");
            return None;
        }
        Some(first.to_match())
    }
}

impl IndexedTitle {
    fn to_match(&self) -> TitleMatch {
        TitleMatch {
            series_id: self.series_id,
            title: self.title.clone(),
        }
    }
}
