//! Episode lists loaded from a JSON file, standing in for live catalogs.
//!
//! ```json
//! {
//!   "anidb": { "69": [{ "season": 1, "index": 1, "title": "..." }] },
//!   "tvdb": { "81797": [{ "season": 1, "index": 1, "absolute_index": 1 }] }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;
use tsunagi_core::{Episode, MemoryProvider};

use crate::error::CliError;

#[derive(Debug, Default, Deserialize)]
pub struct EpisodeFixture {
    #[serde(default)]
    anidb: HashMap<u32, Vec<Episode>>,
    #[serde(default)]
    tvdb: HashMap<u32, Vec<Episode>>,
}

impl EpisodeFixture {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)?;
        let fixture: Self = serde_json::from_str(&content)?;
        info!(
            anidb_series = fixture.anidb.len(),
            tvdb_series = fixture.tvdb.len(),
            "Episode fixture loaded"
        );
        Ok(fixture)
    }

    /// One provider per catalog: `(anidb, tvdb)`.
    pub fn into_providers(self) -> (MemoryProvider, MemoryProvider) {
        (into_provider(self.anidb), into_provider(self.tvdb))
    }
}

fn into_provider(series: HashMap<u32, Vec<Episode>>) -> MemoryProvider {
    let mut provider = MemoryProvider::new();
    for (series_id, episodes) in series {
        provider.insert_series(series_id, episodes);
    }
    provider
}
