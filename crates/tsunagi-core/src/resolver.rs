//! Entry point tying the mapping table, title index and episode mapper
//! together.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::MappingError;
use crate::mapper::{matching_group, EpisodeMapper, MappedEpisodeResult};
use crate::mapping::{EpisodeGroupMapping, MappingList, SeriesMapping};
use crate::matcher;
use crate::models::{Direction, Episode, EpisodeNumber};
use crate::provider::EpisodeProvider;
use crate::titles::{SeriesTitleIndex, TitleMatch, TitleMatchResult};

/// An episode translated for a series looked up by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedEpisode {
    /// Series the result belongs to in the target catalog. `None` when
    /// nothing mapped.
    pub series_id: Option<u32>,
    pub result: MappedEpisodeResult,
}

impl ResolvedEpisode {
    pub const UNMAPPED: Self = Self {
        series_id: None,
        result: MappedEpisodeResult::Unmapped,
    };
}

/// Cross-catalog resolver over shared, immutable lookup tables.
pub struct Resolver<A, T> {
    mappings: Arc<MappingList>,
    titles: Arc<SeriesTitleIndex>,
    mapper: EpisodeMapper<A, T>,
    config: Config,
}

impl<A, T> Resolver<A, T>
where
    A: EpisodeProvider,
    T: EpisodeProvider,
{
    pub fn new(
        mappings: Arc<MappingList>,
        titles: Arc<SeriesTitleIndex>,
        mapper: EpisodeMapper<A, T>,
        config: Config,
    ) -> Self {
        Self {
            mappings,
            titles,
            mapper,
            config,
        }
    }

    pub fn mapper(&self) -> &EpisodeMapper<A, T> {
        &self.mapper
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The mapping record for an AniDB series, if the document has one.
    pub fn resolve_series_mapping(
        &self,
        anidb_id: u32,
    ) -> Result<Option<&SeriesMapping>, MappingError> {
        self.mappings.find_by_anidb_id(anidb_id)
    }

    /// Every record pointing at a TVDB series.
    pub fn resolve_series_mappings_by_tvdb_id(&self, tvdb_id: u32) -> Option<Vec<&SeriesMapping>> {
        self.mappings.find_by_tvdb_id(tvdb_id)
    }

    /// Translate one episode of `record`, using `group` when given.
    pub async fn map_episode(
        &self,
        direction: Direction,
        episode: EpisodeNumber,
        record: &SeriesMapping,
        group: Option<&EpisodeGroupMapping>,
    ) -> MappedEpisodeResult {
        self.mapper
            .map_episode(direction, episode, record, group)
            .await
    }

    /// Translate an episode of the series `series_id`, which is an AniDB id
    /// for [`Direction::AniDbToTvDb`] and a TVDB id otherwise.
    ///
    /// A series without a mapping record is unmapped before any provider
    /// is asked. A TVDB series covered by several records takes the first
    /// record that maps the episode.
    #[tracing::instrument(name = "map_series_episode", skip(self))]
    pub async fn map_series_episode(
        &self,
        direction: Direction,
        series_id: u32,
        episode: EpisodeNumber,
    ) -> Result<ResolvedEpisode, MappingError> {
        let records = self.records_for(direction, series_id)?;
        if records.is_empty() {
            debug!("No mapping record");
            return Ok(ResolvedEpisode::UNMAPPED);
        }
        Ok(self.map_with_records(direction, &records, episode).await)
    }

    /// Translate a batch of episodes of one series concurrently, at most
    /// `resolution.max_concurrency` at a time. Output order is unspecified.
    #[tracing::instrument(name = "map_season", skip(self, episodes), fields(count = episodes.len()))]
    pub async fn map_season(
        &self,
        direction: Direction,
        series_id: u32,
        episodes: Vec<EpisodeNumber>,
    ) -> Result<Vec<(EpisodeNumber, ResolvedEpisode)>, MappingError> {
        let records = self.records_for(direction, series_id)?;
        if records.is_empty() {
            debug!("No mapping record");
            return Ok(episodes
                .into_iter()
                .map(|e| (e, ResolvedEpisode::UNMAPPED))
                .collect());
        }

        let records = &records;
        let limit = self.config.resolution.max_concurrency.max(1);
        let results = stream::iter(episodes)
            .map(|episode| async move {
                let resolved = self.map_with_records(direction, records, episode).await;
                (episode, resolved)
            })
            .buffer_unordered(limit)
            .collect::<Vec<_>>()
            .await;
        Ok(results)
    }

    /// Resolve a title to one AniDB series. Falls back to fuzzy scoring when
    /// `titles.fuzzy_fallback` is enabled.
    pub fn find_series_by_title(&self, title: &str) -> Option<TitleMatch> {
        if !self.config.titles.fuzzy_fallback {
            return self.titles.find_by_title(title);
        }
        match self
            .titles
            .match_title(title, self.config.titles.fuzzy_threshold)
        {
            TitleMatchResult::Exact(found) | TitleMatchResult::Fuzzy(found, _) => Some(found),
            TitleMatchResult::NoMatch => None,
        }
    }

    /// Pick an episode from `candidates`; see [`matcher::find_episode`].
    pub fn find_episode<'e>(
        &self,
        candidates: &'e [Episode],
        season: Option<u32>,
        index: Option<u32>,
        title: Option<&str>,
    ) -> Option<&'e Episode> {
        matcher::find_episode(candidates, season, index, title)
    }

    fn records_for(
        &self,
        direction: Direction,
        series_id: u32,
    ) -> Result<Vec<&SeriesMapping>, MappingError> {
        Ok(match direction {
            Direction::AniDbToTvDb => self
                .mappings
                .find_by_anidb_id(series_id)?
                .into_iter()
                .collect(),
            Direction::TvDbToAniDb => self
                .mappings
                .find_by_tvdb_id(series_id)
                .unwrap_or_default(),
        })
    }

    async fn map_with_records(
        &self,
        direction: Direction,
        records: &[&SeriesMapping],
        episode: EpisodeNumber,
    ) -> ResolvedEpisode {
        for record in records {
            let group = matching_group(direction, &episode, record);
            let result = self
                .mapper
                .map_episode(direction, episode, record, group)
                .await;
            if !result.is_unmapped() {
                let series_id = match direction {
                    Direction::AniDbToTvDb => record.ids.tvdb,
                    Direction::TvDbToAniDb => Some(record.ids.anidb),
                };
                return ResolvedEpisode { series_id, result };
            }
        }
        ResolvedEpisode::UNMAPPED
    }
}
