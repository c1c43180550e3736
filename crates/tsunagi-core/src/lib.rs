//! Cross-catalog anime identity and episode numbering.
//!
//! A community mapping document ties AniDB series to their TVDB, TMDB and
//! IMDb counterparts. [`resolver::Resolver`] answers "which series is
//! this" and "which episode is this over there" from that document, an
//! AniDB title list and an [`provider::EpisodeProvider`] per catalog.

pub mod config;
pub mod error;
pub mod mapper;
pub mod mapping;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod provider;
pub mod resolver;
pub mod titles;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{MappingError, RecordError};
pub use mapper::{EpisodeMapper, FollowingEpisode, MappedEpisodeResult};
pub use mapping::{MappingList, SeriesMapping};
pub use models::{Direction, Episode, EpisodeNumber, SeriesIds};
pub use provider::{EpisodeProvider, MemoryProvider};
pub use resolver::{ResolvedEpisode, Resolver};
pub use titles::{SeriesTitleIndex, TitleEntry, TitleMatch};
