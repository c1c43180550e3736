use serde::Serialize;

use crate::error::RecordError;
use crate::mapping::grammar::parse_pairs;
use crate::mapping::raw::RawGroupMapping;
use crate::models::SeasonKind;

/// An explicit `anidb-tvdb` episode pair inside a group rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpisodeMapping {
    pub source: u32,
    pub target: u32,
}

/// An override rule redirecting part of an AniDB season to a TVDB season.
///
/// A rule covers the inclusive range `start..=end` plus every source index
/// named by an explicit pair, even when that index lies outside the range.
/// The anime-list data depends on this; whether pairs were meant to be
/// bounded by the range is still an open question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeGroupMapping {
    pub source_kind: SeasonKind,
    pub start: Option<u32>,
    pub end: Option<u32>,
    pub target_season: u32,
    pub target_offset: i32,
    pub explicit_pairs: Vec<EpisodeMapping>,
}

impl EpisodeGroupMapping {
    pub fn from_raw(raw: &RawGroupMapping) -> Result<Self, RecordError> {
        let source_kind = raw
            .anidb_season
            .trim()
            .parse()
            .ok()
            .and_then(SeasonKind::from_season_index)
            .ok_or_else(|| RecordError::InvalidSourceSeason(raw.anidb_season.clone()))?;
        let target_season = raw
            .tvdb_season
            .trim()
            .parse()
            .map_err(|_| RecordError::InvalidTargetSeason(raw.tvdb_season.clone()))?;

        let explicit_pairs = parse_pairs(raw.episode_mappings.as_deref())
            .into_iter()
            .map(|(source, target)| EpisodeMapping { source, target })
            .collect();

        Ok(Self {
            source_kind,
            start: parse_optional(raw.start.as_deref()),
            end: parse_optional(raw.end.as_deref()),
            target_season,
            target_offset: parse_optional(raw.offset.as_deref()).unwrap_or(0),
            explicit_pairs,
        })
    }

    /// Whether this rule maps the AniDB episode `index`.
    pub fn can_resolve(&self, index: u32) -> bool {
        self.in_range(i64::from(index)) || self.explicit_pairs.iter().any(|p| p.source == index)
    }

    /// Whether this rule maps back the TVDB episode `index` of its target season.
    ///
    /// The shifted range does not claim the offset position of a source
    /// that an explicit pair sends elsewhere.
    pub fn can_resolve_target(&self, index: u32) -> bool {
        if self.explicit_pairs.iter().any(|p| p.target == index) {
            return true;
        }
        let source = i64::from(index) - i64::from(self.target_offset);
        self.in_range(source) && !self.has_pair_for(source)
    }

    /// TVDB episode index for an AniDB episode: explicit pair, else offset.
    pub fn target_index(&self, source: u32) -> Option<u32> {
        match self.explicit_pairs.iter().find(|p| p.source == source) {
            Some(pair) => Some(pair.target),
            None => apply_offset(source, self.target_offset),
        }
    }

    /// AniDB episode index for a TVDB episode: explicit pair, else offset.
    /// An offset result whose source has its own pair is `None`.
    pub fn source_index(&self, target: u32) -> Option<u32> {
        match self.explicit_pairs.iter().find(|p| p.target == target) {
            Some(pair) => Some(pair.source),
            None => self
                .target_offset
                .checked_neg()
                .and_then(|offset| apply_offset(target, offset))
                .filter(|&source| !self.has_pair_for(i64::from(source))),
        }
    }

    fn has_pair_for(&self, source: i64) -> bool {
        self.explicit_pairs
            .iter()
            .any(|p| i64::from(p.source) == source)
    }

    fn in_range(&self, index: i64) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => i64::from(start) <= index && index <= i64::from(end),
            _ => false,
        }
    }
}

/// Shift an episode index, rejecting anything that lands below episode 1.
pub(crate) fn apply_offset(index: u32, offset: i32) -> Option<u32> {
    index.checked_add_signed(offset).filter(|&shifted| shifted >= 1)
}

fn parse_optional<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}
