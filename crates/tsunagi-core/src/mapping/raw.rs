//! String-typed mapping data exactly as the document carries it.
//!
//! Nothing here is validated; `SeriesMapping::from_raw` and
//! `EpisodeGroupMapping::from_raw` decide what survives.

/// A whole anime-list document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAnimeList {
    pub entries: Vec<RawSeriesEntry>,
}

/// One `<anime>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSeriesEntry {
    pub anidb_id: String,
    pub tvdb_id: Option<String>,
    pub tmdb_id: Option<String>,
    pub imdb_id: Option<String>,
    /// `a` for absolute numbering, otherwise a TVDB season number.
    pub default_tvdb_season: Option<String>,
    pub episode_offset: Option<String>,
    pub name: Option<String>,
    pub group_mappings: Vec<RawGroupMapping>,
    /// `;special-standard;...;` pairs from the `<before>` element.
    pub special_positions: Option<String>,
}

/// One `<mapping>` element inside `<mapping-list>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGroupMapping {
    pub anidb_season: String,
    pub tvdb_season: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub offset: Option<String>,
    /// `;anidb-tvdb;...;` explicit episode pairs.
    pub episode_mappings: Option<String>,
}
