//! Episode number translation between AniDB and TVDB.
//!
//! The [`EpisodeMapper`] picks a strategy per episode: an explicit group
//! rule when one applies, otherwise the series' default season. Both
//! resolvers ask the opposite catalog's [`EpisodeProvider`] whether the
//! computed position exists.

pub mod default_season;
pub mod group;

use serde::Serialize;
use tracing::{debug, warn};

use crate::mapping::{EpisodeGroupMapping, SeriesMapping};
use crate::models::{Direction, EpisodeNumber, SeasonKind};
use crate::provider::EpisodeProvider;

pub use default_season::DefaultSeasonEpisodeMapper;
pub use group::GroupMappingEpisodeMapper;

/// Outcome of translating one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MappedEpisodeResult {
    /// The episode sits at `season`/`episode` in the other catalog.
    /// `following` is the episode this one airs before, for specials.
    Mapped {
        season: u32,
        episode: u32,
        following: Option<FollowingEpisode>,
    },
    /// The other catalog numbers the series without seasons.
    MappedAbsolute { episode: u32 },
    Unmapped,
}

impl MappedEpisodeResult {
    pub(crate) fn mapped(season: u32, episode: u32) -> Self {
        Self::Mapped {
            season,
            episode,
            following: None,
        }
    }

    pub fn is_unmapped(&self) -> bool {
        matches!(self, Self::Unmapped)
    }
}

/// Airs-before target of a special. Never chains further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollowingEpisode {
    pub season: u32,
    pub episode: u32,
}

/// Translates episodes for one series record, in either direction.
#[derive(Debug, Clone)]
pub struct EpisodeMapper<A, T> {
    anidb: A,
    tvdb: T,
}

impl<A, T> EpisodeMapper<A, T>
where
    A: EpisodeProvider,
    T: EpisodeProvider,
{
    pub fn new(anidb: A, tvdb: T) -> Self {
        Self { anidb, tvdb }
    }

    pub fn anidb(&self) -> &A {
        &self.anidb
    }

    pub fn tvdb(&self) -> &T {
        &self.tvdb
    }

    pub async fn map_episode(
        &self,
        direction: Direction,
        episode: EpisodeNumber,
        record: &SeriesMapping,
        group: Option<&EpisodeGroupMapping>,
    ) -> MappedEpisodeResult {
        match direction {
            Direction::AniDbToTvDb => self.map_anidb_episode(episode, record, group).await,
            Direction::TvDbToAniDb => self.map_tvdb_episode(episode, record, group).await,
        }
    }

    /// Translate an AniDB episode (season 1 standard, season 0 special) to
    /// its TVDB position.
    pub async fn map_anidb_episode(
        &self,
        episode: EpisodeNumber,
        record: &SeriesMapping,
        group: Option<&EpisodeGroupMapping>,
    ) -> MappedEpisodeResult {
        let Some(tvdb_id) = record.ids.tvdb else {
            debug!(anidb_id = record.ids.anidb, "No TVDB series to map onto");
            return MappedEpisodeResult::Unmapped;
        };
        let Some(kind) = SeasonKind::from_season_index(episode.season) else {
            debug!(season = episode.season, "Not an AniDB season");
            return MappedEpisodeResult::Unmapped;
        };

        let result = self
            .map_anidb_index(episode.index, record, group, tvdb_id)
            .await;

        match (kind, result) {
            (
                SeasonKind::Special,
                MappedEpisodeResult::Mapped {
                    season,
                    episode: mapped,
                    following: None,
                },
            ) => {
                let following = self
                    .following_episode(episode.index, record, tvdb_id)
                    .await;
                MappedEpisodeResult::Mapped {
                    season,
                    episode: mapped,
                    following,
                }
            }
            _ => result,
        }
    }

    /// Translate a TVDB episode back to its AniDB position.
    pub async fn map_tvdb_episode(
        &self,
        episode: EpisodeNumber,
        record: &SeriesMapping,
        group: Option<&EpisodeGroupMapping>,
    ) -> MappedEpisodeResult {
        match group {
            Some(group) => {
                GroupMappingEpisodeMapper::new(&self.anidb)
                    .map_tvdb_episode(episode.index, group, record.ids.anidb)
                    .await
            }
            None => {
                DefaultSeasonEpisodeMapper::new(&self.anidb)
                    .map_tvdb_episode(episode, record)
                    .await
            }
        }
    }

    async fn map_anidb_index(
        &self,
        index: u32,
        record: &SeriesMapping,
        group: Option<&EpisodeGroupMapping>,
        tvdb_id: u32,
    ) -> MappedEpisodeResult {
        match group {
            Some(group) => {
                GroupMappingEpisodeMapper::new(&self.tvdb)
                    .map_anidb_episode(index, group, tvdb_id)
                    .await
            }
            None => {
                DefaultSeasonEpisodeMapper::new(&self.tvdb)
                    .map_anidb_episode(index, record)
                    .await
            }
        }
    }

    /// Map the standard episode a special is placed before.
    async fn following_episode(
        &self,
        special: u32,
        record: &SeriesMapping,
        tvdb_id: u32,
    ) -> Option<FollowingEpisode> {
        let standard = record.following_standard_episode(special)?;
        let group = record.group_mapping_for_anidb(SeasonKind::Standard, standard);
        match self
            .map_anidb_index(standard, record, group, tvdb_id)
            .await
        {
            MappedEpisodeResult::Mapped {
                season, episode, ..
            } => Some(FollowingEpisode { season, episode }),
            _ => {
                debug!(special, standard, "Following episode did not map");
                None
            }
        }
    }
}

/// The first group rule of `record` that applies to `episode`.
pub fn matching_group<'r>(
    direction: Direction,
    episode: &EpisodeNumber,
    record: &'r SeriesMapping,
) -> Option<&'r EpisodeGroupMapping> {
    match direction {
        Direction::AniDbToTvDb => SeasonKind::from_season_index(episode.season)
            .and_then(|kind| record.group_mapping_for_anidb(kind, episode.index)),
        Direction::TvDbToAniDb => record.group_mapping_for_tvdb(episode.season, episode.index),
    }
}

/// Collapse a provider failure into absence, keeping its cause in the log.
pub(crate) fn settle<V, E: std::error::Error>(
    result: Result<Option<V>, E>,
    series_id: u32,
) -> Option<V> {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(series_id, error = %e, "Episode lookup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::models::Episode;
    use crate::provider::MemoryProvider;
    use crate::test_support::{group, mapping, season, series_entry, RecordingProvider};

    const ANIDB: u32 = 100;
    const TVDB: u32 = 200;

    fn mapper(tvdb: MemoryProvider) -> EpisodeMapper<RecordingProvider, RecordingProvider> {
        EpisodeMapper::new(
            RecordingProvider::new(MemoryProvider::new()),
            RecordingProvider::new(tvdb),
        )
    }

    #[tokio::test]
    async fn test_group_rule_uses_explicit_pair_then_offset() {
        let mut raw = series_entry(ANIDB, Some(TVDB), "1");
        raw.group_mappings = vec![group(1, 2, Some((3, 6)), 6, ";5-33;")];
        let record = mapping(raw);
        let mapper = mapper(MemoryProvider::new().with_series(TVDB, season(2, 40)));
        let rule = &record.group_mappings[0];

        let result = mapper
            .map_anidb_episode(EpisodeNumber::standard(5), &record, Some(rule))
            .await;
        assert_eq!(result, MappedEpisodeResult::mapped(2, 33));

        let result = mapper
            .map_anidb_episode(EpisodeNumber::standard(3), &record, Some(rule))
            .await;
        assert_eq!(result, MappedEpisodeResult::mapped(2, 9));
    }

    #[tokio::test]
    async fn test_group_target_past_season_end_is_unmapped() {
        let mut raw = series_entry(ANIDB, Some(TVDB), "1");
        raw.group_mappings = vec![group(1, 2, Some((1, 30)), 0, "")];
        let record = mapping(raw);
        let mapper = mapper(MemoryProvider::new().with_series(TVDB, season(2, 12)));

        let result = mapper
            .map_anidb_episode(EpisodeNumber::standard(13), &record, record.group_mappings.first())
            .await;
        assert_eq!(result, MappedEpisodeResult::Unmapped);
    }

    #[tokio::test]
    async fn test_absolute_default_issues_one_lookup() {
        let record = mapping(series_entry(ANIDB, Some(TVDB), "a"));
        let episodes = vec![
            Episode::new(1, 1).with_absolute(1),
            Episode::new(2, 1).with_absolute(25),
        ];
        let mapper = mapper(MemoryProvider::new().with_series(TVDB, episodes));

        let result = mapper
            .map_anidb_episode(EpisodeNumber::standard(25), &record, None)
            .await;
        assert_eq!(result, MappedEpisodeResult::MappedAbsolute { episode: 25 });
        assert_eq!(mapper.tvdb().absolute_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mapper.tvdb().total_calls(), 1);
    }

    #[tokio::test]
    async fn test_fixed_default_applies_offset() {
        let mut raw = series_entry(ANIDB, Some(TVDB), "3");
        raw.episode_offset = Some("12".into());
        let record = mapping(raw);
        let mapper = mapper(MemoryProvider::new().with_series(TVDB, season(3, 24)));

        let result = mapper
            .map_anidb_episode(EpisodeNumber::standard(4), &record, None)
            .await;
        assert_eq!(result, MappedEpisodeResult::mapped(3, 16));
        assert_eq!(mapper.tvdb().season_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_tvdb_id_makes_no_calls() {
        let record = mapping(series_entry(ANIDB, None, "1"));
        let mapper = mapper(MemoryProvider::new());

        let result = mapper
            .map_anidb_episode(EpisodeNumber::standard(1), &record, None)
            .await;
        assert_eq!(result, MappedEpisodeResult::Unmapped);
        assert_eq!(mapper.tvdb().total_calls(), 0);
    }

    #[tokio::test]
    async fn test_special_carries_following_episode() {
        let mut raw = series_entry(ANIDB, Some(TVDB), "1");
        raw.group_mappings = vec![group(0, 0, None, 0, ";1-3;")];
        raw.special_positions = Some(";1-10;".into());
        let record = mapping(raw);
        let mut episodes = season(0, 5);
        episodes.extend(season(1, 12));
        let mapper = mapper(MemoryProvider::new().with_series(TVDB, episodes));

        let episode = EpisodeNumber::special(1);
        let rule = matching_group(Direction::AniDbToTvDb, &episode, &record);
        let result = mapper.map_anidb_episode(episode, &record, rule).await;
        assert_eq!(
            result,
            MappedEpisodeResult::Mapped {
                season: 0,
                episode: 3,
                following: Some(FollowingEpisode {
                    season: 1,
                    episode: 10
                }),
            }
        );
    }

    #[tokio::test]
    async fn test_special_without_rule_uses_default_season() {
        let record = mapping(series_entry(ANIDB, Some(TVDB), "1"));
        let mapper = mapper(MemoryProvider::new().with_series(TVDB, season(1, 12)));

        let result = mapper
            .map_anidb_episode(EpisodeNumber::special(1), &record, None)
            .await;
        assert_eq!(result, MappedEpisodeResult::mapped(1, 1));
        assert_eq!(mapper.tvdb().season_calls.load(Ordering::SeqCst), 1);

        // Nothing at the default position.
        let result = mapper
            .map_anidb_episode(EpisodeNumber::special(20), &record, None)
            .await;
        assert_eq!(result, MappedEpisodeResult::Unmapped);
    }

    #[tokio::test]
    async fn test_absolute_default_miss_is_unmapped() {
        let record = mapping(series_entry(ANIDB, Some(TVDB), "a"));
        let episodes = vec![Episode::new(1, 1).with_absolute(1)];
        let mapper = mapper(MemoryProvider::new().with_series(TVDB, episodes));

        let result = mapper
            .map_anidb_episode(EpisodeNumber::standard(5), &record, None)
            .await;
        assert_eq!(result, MappedEpisodeResult::Unmapped);
        assert_eq!(mapper.tvdb().absolute_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mapper.tvdb().total_calls(), 1);
    }

    #[tokio::test]
    async fn test_tvdb_episode_maps_back_through_absolute_number() {
        let record = mapping(series_entry(ANIDB, Some(TVDB), "a"));
        let mapper = EpisodeMapper::new(
            RecordingProvider::new(MemoryProvider::new().with_series(ANIDB, season(1, 30))),
            RecordingProvider::new(MemoryProvider::new()),
        );

        let result = mapper
            .map_tvdb_episode(EpisodeNumber::new(2, 1).with_absolute(25), &record, None)
            .await;
        assert_eq!(result, MappedEpisodeResult::mapped(1, 25));
        assert_eq!(mapper.anidb().season_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tvdb_episode_without_absolute_number_is_unmapped() {
        let record = mapping(series_entry(ANIDB, Some(TVDB), "a"));
        let mapper = EpisodeMapper::new(
            RecordingProvider::new(MemoryProvider::new().with_series(ANIDB, season(1, 30))),
            RecordingProvider::new(MemoryProvider::new()),
        );

        let result = mapper
            .map_tvdb_episode(EpisodeNumber::new(2, 1), &record, None)
            .await;
        assert_eq!(result, MappedEpisodeResult::Unmapped);
        assert_eq!(mapper.anidb().total_calls(), 0);
    }

    #[tokio::test]
    async fn test_explicit_pair_round_trips_and_frees_offset_position() {
        let mut raw = series_entry(ANIDB, Some(TVDB), "1");
        raw.group_mappings = vec![group(1, 2, Some((3, 6)), 6, ";5-33;")];
        let record = mapping(raw);
        let mapper = EpisodeMapper::new(
            RecordingProvider::new(MemoryProvider::new().with_series(ANIDB, season(1, 12))),
            RecordingProvider::new(MemoryProvider::new().with_series(TVDB, season(2, 40))),
        );

        let back = EpisodeNumber::new(2, 33);
        let rule = matching_group(Direction::TvDbToAniDb, &back, &record);
        let result = mapper
            .map_episode(Direction::TvDbToAniDb, back, &record, rule)
            .await;
        assert_eq!(result, MappedEpisodeResult::mapped(1, 5));

        let freed = EpisodeNumber::new(2, 11);
        let rule = matching_group(Direction::TvDbToAniDb, &freed, &record);
        assert!(rule.is_none());
        let result = mapper
            .map_episode(Direction::TvDbToAniDb, freed, &record, rule)
            .await;
        assert_eq!(result, MappedEpisodeResult::Unmapped);
    }

    #[tokio::test]
    async fn test_provider_failure_is_unmapped() {
        let record = mapping(series_entry(ANIDB, Some(TVDB), "1"));
        let mapper = EpisodeMapper::new(RecordingProvider::failing(), RecordingProvider::failing());

        let result = mapper
            .map_anidb_episode(EpisodeNumber::standard(1), &record, None)
            .await;
        assert_eq!(result, MappedEpisodeResult::Unmapped);
        assert_eq!(mapper.tvdb().season_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tvdb_episode_maps_back_through_group() {
        let mut raw = series_entry(ANIDB, Some(TVDB), "1");
        raw.group_mappings = vec![group(1, 2, Some((13, 24)), -12, "")];
        let record = mapping(raw);
        let mapper = EpisodeMapper::new(
            RecordingProvider::new(MemoryProvider::new().with_series(ANIDB, season(1, 24))),
            RecordingProvider::new(MemoryProvider::new()),
        );

        let episode = EpisodeNumber::new(2, 1);
        let rule = matching_group(Direction::TvDbToAniDb, &episode, &record);
        assert!(rule.is_some());
        let result = mapper
            .map_episode(Direction::TvDbToAniDb, episode, &record, rule)
            .await;
        assert_eq!(result, MappedEpisodeResult::mapped(1, 13));
    }

    #[tokio::test]
    async fn test_tvdb_episode_maps_back_through_default_season() {
        let mut raw = series_entry(ANIDB, Some(TVDB), "2");
        raw.episode_offset = Some("12".into());
        let record = mapping(raw);
        let mapper = EpisodeMapper::new(
            RecordingProvider::new(MemoryProvider::new().with_series(ANIDB, season(1, 12))),
            RecordingProvider::new(MemoryProvider::new()),
        );

        let result = mapper
            .map_tvdb_episode(EpisodeNumber::new(2, 15), &record, None)
            .await;
        assert_eq!(result, MappedEpisodeResult::mapped(1, 3));

        // Another TVDB season is outside this record.
        let result = mapper
            .map_tvdb_episode(EpisodeNumber::new(1, 15), &record, None)
            .await;
        assert_eq!(result, MappedEpisodeResult::Unmapped);
    }
}
