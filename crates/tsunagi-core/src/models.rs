pub mod episode;
pub mod series;

pub use episode::{Direction, Episode, EpisodeNumber, SeasonKind};
pub use series::SeriesIds;
