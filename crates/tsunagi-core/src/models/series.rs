use serde::{Deserialize, Serialize};

/// Cross-catalog identifiers for one AniDB series.
///
/// `anidb` is always present and keys the mapping table; the other ids are
/// whatever the mapping document knows about the same series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesIds {
    pub anidb: u32,
    pub tvdb: Option<u32>,
    pub tmdb: Option<u32>,
    pub imdb: Option<u32>,
}

impl SeriesIds {
    /// Ids for a series that only AniDB knows about.
    pub fn anidb_only(anidb: u32) -> Self {
        Self {
            anidb,
            tvdb: None,
            tmdb: None,
            imdb: None,
        }
    }
}

/// Parse an optional foreign id. The anime-list uses words such as `movie`,
/// `hentai` or `unknown` where no id exists; those become `None`.
pub(crate) fn parse_foreign_id(raw: Option<&str>) -> Option<u32> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// Parse an IMDb id such as `tt0112159` into its numeric part.
pub(crate) fn parse_imdb_id(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    let digits = raw.strip_prefix("tt").unwrap_or(raw);
    // Multiple ids are comma separated; only the first is kept.
    let digits = digits.split(',').next()?.trim();
    parse_foreign_id(Some(digits))
}
