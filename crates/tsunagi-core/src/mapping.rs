pub mod document;
mod grammar;
pub mod group;
pub mod list;
pub mod raw;
pub mod series;

pub use group::{EpisodeGroupMapping, EpisodeMapping};
pub use list::MappingList;
pub use raw::{RawAnimeList, RawGroupMapping, RawSeriesEntry};
pub use series::{SeasonStrategy, SeriesMapping, SpecialEpisodePosition};
