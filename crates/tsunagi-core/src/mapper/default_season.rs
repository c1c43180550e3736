use tracing::debug;

use crate::mapper::{settle, MappedEpisodeResult};
use crate::mapping::group::apply_offset;
use crate::mapping::{SeasonStrategy, SeriesMapping};
use crate::models::{EpisodeNumber, SeasonKind};
use crate::provider::EpisodeProvider;

/// Resolves episodes no group rule covers, using the record's default
/// season and offset.
#[derive(Debug)]
pub struct DefaultSeasonEpisodeMapper<'a, P> {
    provider: &'a P,
}

impl<'a, P: EpisodeProvider> DefaultSeasonEpisodeMapper<'a, P> {
    /// `provider` serves the catalog being mapped onto.
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Map an AniDB episode onto the record's TVDB series.
    pub async fn map_anidb_episode(&self, index: u32, record: &SeriesMapping) -> MappedEpisodeResult {
        let Some(tvdb_id) = record.ids.tvdb else {
            return MappedEpisodeResult::Unmapped;
        };

        match record.default_season {
            SeasonStrategy::Absolute => {
                let episode = settle(
                    self.provider.episode_by_absolute_index(tvdb_id, index).await,
                    tvdb_id,
                );
                match episode {
                    Some(episode) => MappedEpisodeResult::MappedAbsolute {
                        episode: episode.absolute_index.unwrap_or(index),
                    },
                    None => {
                        debug!(tvdb_id, absolute = index, "No TVDB episode at absolute index");
                        MappedEpisodeResult::Unmapped
                    }
                }
            }
            SeasonStrategy::Fixed(season) => {
                let Some(target) = apply_offset(index, record.default_episode_offset) else {
                    return MappedEpisodeResult::Unmapped;
                };
                self.by_season(tvdb_id, season, target).await
            }
        }
    }

    /// Map a TVDB episode back onto the record's standard AniDB episodes.
    ///
    /// A fixed season only claims its own TVDB season. Absolute series use
    /// the TVDB absolute number as the AniDB episode number.
    pub async fn map_tvdb_episode(
        &self,
        episode: EpisodeNumber,
        record: &SeriesMapping,
    ) -> MappedEpisodeResult {
        let anidb_id = record.ids.anidb;
        let standard = SeasonKind::Standard.season_index();

        match record.default_season {
            SeasonStrategy::Absolute => match episode.absolute_index {
                Some(absolute) => self.by_season(anidb_id, standard, absolute).await,
                None => {
                    debug!(anidb_id, "TVDB episode has no absolute number");
                    MappedEpisodeResult::Unmapped
                }
            },
            SeasonStrategy::Fixed(season) if season == episode.season => {
                let source = record
                    .default_episode_offset
                    .checked_neg()
                    .and_then(|offset| apply_offset(episode.index, offset));
                match source {
                    Some(source) => self.by_season(anidb_id, standard, source).await,
                    None => MappedEpisodeResult::Unmapped,
                }
            }
            SeasonStrategy::Fixed(_) => MappedEpisodeResult::Unmapped,
        }
    }

    async fn by_season(&self, series_id: u32, season: u32, index: u32) -> MappedEpisodeResult {
        let episode = settle(
            self.provider
                .episode_by_season_and_index(series_id, season, index)
                .await,
            series_id,
        );
        match episode {
            Some(_) => MappedEpisodeResult::mapped(season, index),
            None => {
                debug!(series_id, season, index, "No episode at default position");
                MappedEpisodeResult::Unmapped
            }
        }
    }
}
