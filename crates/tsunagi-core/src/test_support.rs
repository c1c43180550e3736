//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::mapping::{RawGroupMapping, RawSeriesEntry, SeriesMapping};
use crate::models::Episode;
use crate::provider::{EpisodeProvider, MemoryProvider};

#[derive(Debug, thiserror::Error)]
#[error("catalog unavailable")]
pub struct CatalogDown;

/// Memory provider that counts every call and can be switched to fail.
#[derive(Debug, Default)]
pub struct RecordingProvider {
    inner: MemoryProvider,
    failing: bool,
    pub list_calls: AtomicUsize,
    pub absolute_calls: AtomicUsize,
    pub season_calls: AtomicUsize,
}

impl RecordingProvider {
    pub fn new(inner: MemoryProvider) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
            + self.absolute_calls.load(Ordering::SeqCst)
            + self.season_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), CatalogDown> {
        if self.failing {
            Err(CatalogDown)
        } else {
            Ok(())
        }
    }
}

impl EpisodeProvider for RecordingProvider {
    type Error = CatalogDown;

    async fn episodes_for_series(&self, series_id: u32) -> Result<Option<Vec<Episode>>, CatalogDown> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.inner.episodes_for_series(series_id).await.unwrap_or_default())
    }

    async fn episode_by_absolute_index(
        &self,
        series_id: u32,
        index: u32,
    ) -> Result<Option<Episode>, CatalogDown> {
        self.absolute_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .inner
            .episode_by_absolute_index(series_id, index)
            .await
            .unwrap_or_default())
    }

    async fn episode_by_season_and_index(
        &self,
        series_id: u32,
        season: u32,
        index: u32,
    ) -> Result<Option<Episode>, CatalogDown> {
        self.season_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .inner
            .episode_by_season_and_index(series_id, season, index)
            .await
            .unwrap_or_default())
    }
}

/// `count` episodes of one season, numbered from 1.
pub fn season(season: u32, count: u32) -> Vec<Episode> {
    (1..=count).map(|i| Episode::new(season, i)).collect()
}

pub fn series_entry(anidb: u32, tvdb: Option<u32>, default_season: &str) -> RawSeriesEntry {
    RawSeriesEntry {
        anidb_id: anidb.to_string(),
        tvdb_id: tvdb.map(|id| id.to_string()),
        default_tvdb_season: Some(default_season.into()),
        ..Default::default()
    }
}

pub fn group(
    anidb_season: u32,
    tvdb_season: u32,
    range: Option<(u32, u32)>,
    offset: i32,
    pairs: &str,
) -> RawGroupMapping {
    RawGroupMapping {
        anidb_season: anidb_season.to_string(),
        tvdb_season: tvdb_season.to_string(),
        start: range.map(|(start, _)| start.to_string()),
        end: range.map(|(_, end)| end.to_string()),
        offset: Some(offset.to_string()),
        episode_mappings: Some(pairs.into()),
    }
}

pub fn mapping(raw: RawSeriesEntry) -> SeriesMapping {
    SeriesMapping::from_raw(&raw).expect("fixture mapping is valid")
}
