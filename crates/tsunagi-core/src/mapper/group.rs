use tracing::debug;

use crate::mapper::{settle, MappedEpisodeResult};
use crate::mapping::EpisodeGroupMapping;
use crate::provider::EpisodeProvider;

/// Resolves episodes covered by an explicit group rule.
///
/// The computed position is checked against the opposite series' full
/// episode list. Rules may point past the end of a season, so a miss is an
/// ordinary `Unmapped`.
#[derive(Debug)]
pub struct GroupMappingEpisodeMapper<'a, P> {
    provider: &'a P,
}

impl<'a, P: EpisodeProvider> GroupMappingEpisodeMapper<'a, P> {
    /// `provider` serves the catalog being mapped onto.
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    pub async fn map_anidb_episode(
        &self,
        anidb_index: u32,
        group: &EpisodeGroupMapping,
        tvdb_series_id: u32,
    ) -> MappedEpisodeResult {
        let Some(target) = group.target_index(anidb_index) else {
            debug!(anidb_index, offset = group.target_offset, "Offset moves episode before the season");
            return MappedEpisodeResult::Unmapped;
        };
        self.locate(tvdb_series_id, group.target_season, target).await
    }

    pub async fn map_tvdb_episode(
        &self,
        tvdb_index: u32,
        group: &EpisodeGroupMapping,
        anidb_series_id: u32,
    ) -> MappedEpisodeResult {
        let Some(source) = group.source_index(tvdb_index) else {
            debug!(tvdb_index, offset = group.target_offset, "Offset moves episode before the season");
            return MappedEpisodeResult::Unmapped;
        };
        self.locate(anidb_series_id, group.source_kind.season_index(), source)
            .await
    }

    async fn locate(&self, series_id: u32, season: u32, index: u32) -> MappedEpisodeResult {
        let episodes = settle(self.provider.episodes_for_series(series_id).await, series_id);
        let found = episodes
            .unwrap_or_default()
            .into_iter()
            .find(|e| e.is_at(season, index));

        match found {
            Some(episode) => MappedEpisodeResult::mapped(episode.season, episode.index),
            None => {
                debug!(series_id, season, index, "No episode at mapped position");
                MappedEpisodeResult::Unmapped
            }
        }
    }
}
