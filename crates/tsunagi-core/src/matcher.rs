//! Episode matching within one catalog's episode list.
//!
//! Flow: season + index → normalised title → none.

use tracing::debug;

use crate::models::Episode;
use crate::normalize::normalize_episode_title;

/// Pick the candidate a request refers to.
///
/// With both `season` and `index` the episode at that position wins. When
/// that position is missing, or no position was given, the episode whose
/// normalised title equals the normalised `title` is returned.
pub fn find_episode<'a>(
    candidates: &'a [Episode],
    season: Option<u32>,
    index: Option<u32>,
    title: Option<&str>,
) -> Option<&'a Episode> {
    if let (Some(season), Some(index)) = (season, index) {
        if let Some(found) = candidates.iter().find(|e| e.is_at(season, index)) {
            return Some(found);
        }
        debug!(season, index, "No episode at position, trying title");
    }

    let wanted = normalize_episode_title(title?);
    if wanted.is_empty() {
        return None;
    }
    candidates.iter().find(|e| {
        e.title
            .as_deref()
            .map(normalize_episode_title)
            .is_some_and(|t| t == wanted)
    })
}
