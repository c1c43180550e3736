use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::MappingError;
use crate::mapping::document::parse_anime_list;
use crate::mapping::raw::RawAnimeList;
use crate::mapping::series::SeriesMapping;

/// Read-only table of every valid series mapping in a document.
///
/// Built once and shared; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct MappingList {
    series: Vec<SeriesMapping>,
    by_anidb: HashMap<u32, Vec<usize>>,
    by_tvdb: HashMap<u32, Vec<usize>>,
}

impl MappingList {
    /// Build the table from raw entries, skipping any entry that fails
    /// validation. Returns `None` when no entry survives.
    pub fn build(raw: &RawAnimeList) -> Option<Self> {
        let mut series = Vec::with_capacity(raw.entries.len());
        let mut skipped = 0usize;

        for entry in &raw.entries {
            match SeriesMapping::from_raw(entry) {
                Ok(mapping) => series.push(mapping),
                Err(e) => {
                    skipped += 1;
                    debug!(anidb_id = %entry.anidb_id, error = %e, "Skipping series mapping");
                }
            }
        }

        if series.is_empty() {
            info!(skipped, "Mapping document has no usable entries");
            return None;
        }

        let mut by_anidb: HashMap<u32, Vec<usize>> = HashMap::new();
        let mut by_tvdb: HashMap<u32, Vec<usize>> = HashMap::new();
        for (position, mapping) in series.iter().enumerate() {
            by_anidb.entry(mapping.ids.anidb).or_default().push(position);
            if let Some(tvdb) = mapping.ids.tvdb {
                by_tvdb.entry(tvdb).or_default().push(position);
            }
        }

        info!(series = series.len(), skipped, "Mapping table built");
        Some(Self {
            series,
            by_anidb,
            by_tvdb,
        })
    }

    /// Read an anime-list XML file and build the table from it.
    pub fn load(path: &Path) -> Result<Option<Self>, MappingError> {
        let xml = std::fs::read(path)?;
        let raw = parse_anime_list(&xml)?;
        Ok(Self::build(&raw))
    }

    /// Look up the single record for an AniDB id.
    ///
    /// Two records sharing the id means the document is corrupt, which is
    /// reported instead of silently picking one.
    pub fn find_by_anidb_id(&self, anidb_id: u32) -> Result<Option<&SeriesMapping>, MappingError> {
        match self.by_anidb.get(&anidb_id).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([position]) => Ok(Some(&self.series[*position])),
            Some(positions) => Err(MappingError::DuplicateSeries {
                anidb_id,
                count: positions.len(),
            }),
        }
    }

    /// Every record pointing at a TVDB series, in document order. One TVDB
    /// series often spans several AniDB entries (split cours, sequels).
    pub fn find_by_tvdb_id(&self, tvdb_id: u32) -> Option<Vec<&SeriesMapping>> {
        let positions = self.by_tvdb.get(&tvdb_id)?;
        Some(positions.iter().map(|&p| &self.series[p]).collect())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesMapping> {
        self.series.iter()
    }
}
