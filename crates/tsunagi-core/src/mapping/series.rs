use serde::Serialize;
use tracing::debug;

use crate::error::RecordError;
use crate::mapping::grammar::parse_pairs;
use crate::mapping::group::EpisodeGroupMapping;
use crate::mapping::raw::RawSeriesEntry;
use crate::models::series::{parse_foreign_id, parse_imdb_id};
use crate::models::{SeasonKind, SeriesIds};

/// Marker the anime-list uses for series with absolute numbering.
const ABSOLUTE_SEASON_MARKER: &str = "a";

/// How episodes without a group rule land on TVDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeasonStrategy {
    /// TVDB numbers the series continuously, without seasons.
    Absolute,
    /// Every episode sits in this TVDB season.
    Fixed(u32),
}

impl SeasonStrategy {
    fn parse(raw: Option<&str>) -> Result<Self, RecordError> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.eq_ignore_ascii_case(ABSOLUTE_SEASON_MARKER) {
            return Ok(Self::Absolute);
        }
        raw.parse()
            .map(Self::Fixed)
            .map_err(|_| RecordError::InvalidDefaultSeason(raw.to_string()))
    }
}

/// Special `special` airs right before standard episode `following_standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpecialEpisodePosition {
    pub special: u32,
    pub following_standard: u32,
}

/// Every rule the mapping document holds for one AniDB series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesMapping {
    pub ids: SeriesIds,
    pub name: Option<String>,
    pub default_season: SeasonStrategy,
    pub default_episode_offset: i32,
    /// Declaration order matters: the first applicable rule wins.
    pub group_mappings: Vec<EpisodeGroupMapping>,
    pub special_positions: Vec<SpecialEpisodePosition>,
}

impl SeriesMapping {
    /// Validate a raw entry. A bad AniDB id or default season rejects the
    /// whole record; bad group rules and pair segments are dropped one by one.
    pub fn from_raw(raw: &RawSeriesEntry) -> Result<Self, RecordError> {
        let anidb = raw
            .anidb_id
            .trim()
            .parse()
            .map_err(|_| RecordError::InvalidAniDbId(raw.anidb_id.clone()))?;
        let default_season = SeasonStrategy::parse(raw.default_tvdb_season.as_deref())?;

        let group_mappings = raw
            .group_mappings
            .iter()
            .filter_map(|group| match EpisodeGroupMapping::from_raw(group) {
                Ok(group) => Some(group),
                Err(e) => {
                    debug!(anidb_id = anidb, error = %e, "Dropping group mapping");
                    None
                }
            })
            .collect();

        let special_positions = parse_pairs(raw.special_positions.as_deref())
            .into_iter()
            .map(|(special, following_standard)| SpecialEpisodePosition {
                special,
                following_standard,
            })
            .collect();

        Ok(Self {
            ids: SeriesIds {
                anidb,
                tvdb: parse_foreign_id(raw.tvdb_id.as_deref()),
                tmdb: parse_foreign_id(raw.tmdb_id.as_deref()),
                imdb: parse_imdb_id(raw.imdb_id.as_deref()),
            },
            name: raw.name.clone().filter(|n| !n.trim().is_empty()),
            default_season,
            default_episode_offset: raw
                .episode_offset
                .as_deref()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
            group_mappings,
            special_positions,
        })
    }

    /// First group rule that maps the given AniDB episode.
    pub fn group_mapping_for_anidb(
        &self,
        kind: SeasonKind,
        index: u32,
    ) -> Option<&EpisodeGroupMapping> {
        self.group_mappings
            .iter()
            .find(|g| g.source_kind == kind && g.can_resolve(index))
    }

    /// First group rule that maps the given TVDB episode back to AniDB.
    pub fn group_mapping_for_tvdb(&self, season: u32, index: u32) -> Option<&EpisodeGroupMapping> {
        self.group_mappings
            .iter()
            .find(|g| g.target_season == season && g.can_resolve_target(index))
    }

    /// The standard episode a special is placed before, if the document says.
    pub fn following_standard_episode(&self, special: u32) -> Option<u32> {
        self.special_positions
            .iter()
            .find(|p| p.special == special)
            .map(|p| p.following_standard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::raw::RawGroupMapping;

    fn entry(anidb_id: &str, season: Option<&str>) -> RawSeriesEntry {
        RawSeriesEntry {
            anidb_id: anidb_id.into(),
            tvdb_id: Some("81797".into()),
            default_tvdb_season: season.map(Into::into),
            ..Default::default()
        }
    }

    fn group(anidb_season: &str, tvdb_season: &str, start: u32, end: u32) -> RawGroupMapping {
        RawGroupMapping {
            anidb_season: anidb_season.into(),
            tvdb_season: tvdb_season.into(),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            offset: None,
            episode_mappings: None,
        }
    }

    #[test]
    fn test_absolute_marker() {
        let mapping = SeriesMapping::from_raw(&entry("69", Some("a"))).unwrap();
        assert_eq!(mapping.default_season, SeasonStrategy::Absolute);
        assert_eq!(mapping.ids.tvdb, Some(81797));
        assert_eq!(mapping.default_episode_offset, 0);
    }

    #[test]
    fn test_fixed_season_with_offset() {
        let mut raw = entry("2", Some("3"));
        raw.episode_offset = Some("12".into());
        let mapping = SeriesMapping::from_raw(&raw).unwrap();
        assert_eq!(mapping.default_season, SeasonStrategy::Fixed(3));
        assert_eq!(mapping.default_episode_offset, 12);
    }

    #[test]
    fn test_invalid_identity_rejects_record() {
        assert_eq!(
            SeriesMapping::from_raw(&entry("-4", Some("1"))),
            Err(RecordError::InvalidAniDbId("-4".into()))
        );
        assert_eq!(
            SeriesMapping::from_raw(&entry("99999999999", Some("1"))),
            Err(RecordError::InvalidAniDbId("99999999999".into()))
        );
        assert_eq!(
            SeriesMapping::from_raw(&entry("1", Some("movie"))),
            Err(RecordError::InvalidDefaultSeason("movie".into()))
        );
        assert!(SeriesMapping::from_raw(&entry("1", None)).is_err());
    }

    #[test]
    fn test_bad_group_rule_is_dropped_alone() {
        let mut raw = entry("1", Some("1"));
        raw.group_mappings = vec![group("7", "1", 1, 2), group("1", "2", 1, 12)];
        let mapping = SeriesMapping::from_raw(&raw).unwrap();
        assert_eq!(mapping.group_mappings.len(), 1);
        assert_eq!(mapping.group_mappings[0].target_season, 2);
    }

    #[test]
    fn test_first_listed_group_wins() {
        let mut raw = entry("1", Some("1"));
        raw.group_mappings = vec![group("1", "2", 1, 12), group("1", "3", 10, 20)];
        let mapping = SeriesMapping::from_raw(&raw).unwrap();

        let chosen = mapping.group_mapping_for_anidb(SeasonKind::Standard, 11).unwrap();
        assert_eq!(chosen.target_season, 2);
        let chosen = mapping.group_mapping_for_anidb(SeasonKind::Standard, 13).unwrap();
        assert_eq!(chosen.target_season, 3);
        assert!(mapping.group_mapping_for_anidb(SeasonKind::Special, 11).is_none());
    }

    #[test]
    fn test_special_positions_from_before_element() {
        let mut raw = entry("1", Some("1"));
        raw.special_positions = Some(";1-25;2-x;3-40;".into());
        let mapping = SeriesMapping::from_raw(&raw).unwrap();
        assert_eq!(mapping.following_standard_episode(1), Some(25));
        assert_eq!(mapping.following_standard_episode(2), None);
        assert_eq!(mapping.following_standard_episode(3), Some(40));
    }
}
