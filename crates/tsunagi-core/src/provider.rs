//! Episode lookups against a catalog.
//!
//! Fetching and caching catalog documents lives outside this crate; the
//! mappers only see this trait. `Ok(None)` means the catalog has nothing
//! for the request and is not a failure.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;

use crate::models::Episode;

/// Episode source for one catalog (AniDB or TVDB).
pub trait EpisodeProvider: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every episode of a series, specials included.
    fn episodes_for_series(
        &self,
        series_id: u32,
    ) -> impl Future<Output = Result<Option<Vec<Episode>>, Self::Error>> + Send;

    /// The episode with the given series-wide number.
    fn episode_by_absolute_index(
        &self,
        series_id: u32,
        index: u32,
    ) -> impl Future<Output = Result<Option<Episode>, Self::Error>> + Send;

    /// The episode at `season`/`index`.
    fn episode_by_season_and_index(
        &self,
        series_id: u32,
        season: u32,
        index: u32,
    ) -> impl Future<Output = Result<Option<Episode>, Self::Error>> + Send;
}

/// Provider over episode lists already held in memory, such as a fixture
/// file or a cache snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    series: HashMap<u32, Vec<Episode>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series_id: u32, episodes: Vec<Episode>) -> Self {
        self.series.insert(series_id, episodes);
        self
    }

    pub fn insert_series(&mut self, series_id: u32, episodes: Vec<Episode>) {
        self.series.insert(series_id, episodes);
    }

    fn episodes(&self, series_id: u32) -> &[Episode] {
        self.series.get(&series_id).map(Vec::as_slice).unwrap_or_default()
    }
}

impl EpisodeProvider for MemoryProvider {
    type Error = Infallible;

    async fn episodes_for_series(&self, series_id: u32) -> Result<Option<Vec<Episode>>, Infallible> {
        Ok(self.series.get(&series_id).cloned())
    }

    async fn episode_by_absolute_index(
        &self,
        series_id: u32,
        index: u32,
    ) -> Result<Option<Episode>, Infallible> {
        Ok(self
            .episodes(series_id)
            .iter()
            .find(|e| e.absolute_index == Some(index))
            .cloned())
    }

    async fn episode_by_season_and_index(
        &self,
        series_id: u32,
        season: u32,
        index: u32,
    ) -> Result<Option<Episode>, Infallible> {
        Ok(self
            .episodes(series_id)
            .iter()
            .find(|e| e.is_at(season, index))
            .cloned())
    }
}
