use serde::{Deserialize, Serialize};

/// AniDB splits a series into standard episodes and specials. In the
/// mapping document they are addressed as season `1` and season `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonKind {
    Special,
    Standard,
}

impl SeasonKind {
    /// The season index this kind occupies in AniDB episode lists.
    pub fn season_index(self) -> u32 {
        match self {
            Self::Special => 0,
            Self::Standard => 1,
        }
    }

    pub fn from_season_index(season: u32) -> Option<Self> {
        match season {
            0 => Some(Self::Special),
            1 => Some(Self::Standard),
            _ => None,
        }
    }
}

/// Which way an episode number is being translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    AniDbToTvDb,
    TvDbToAniDb,
}

/// Position of an episode in its own catalog's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeNumber {
    pub season: u32,
    pub index: u32,
    /// Series-wide number, when the catalog tracks one.
    pub absolute_index: Option<u32>,
}

impl EpisodeNumber {
    pub fn new(season: u32, index: u32) -> Self {
        Self {
            season,
            index,
            absolute_index: None,
        }
    }

    /// A regular AniDB episode.
    pub fn standard(index: u32) -> Self {
        Self::new(SeasonKind::Standard.season_index(), index)
    }

    /// An AniDB special (`S1`, `S2`, ...).
    pub fn special(index: u32) -> Self {
        Self::new(SeasonKind::Special.season_index(), index)
    }

    pub fn with_absolute(mut self, absolute_index: u32) -> Self {
        self.absolute_index = Some(absolute_index);
        self
    }
}

/// An episode as returned by a catalog provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub season: u32,
    pub index: u32,
    #[serde(default)]
    pub absolute_index: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Episode {
    pub fn new(season: u32, index: u32) -> Self {
        Self {
            season,
            index,
            absolute_index: None,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_absolute(mut self, absolute_index: u32) -> Self {
        self.absolute_index = Some(absolute_index);
        self
    }

    pub fn number(&self) -> EpisodeNumber {
        EpisodeNumber {
            season: self.season,
            index: self.index,
            absolute_index: self.absolute_index,
        }
    }

    pub fn is_at(&self, season: u32, index: u32) -> bool {
        self.season == season && self.index == index
    }
}
