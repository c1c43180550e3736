pub mod document;
pub mod index;

pub use index::{SeriesTitleIndex, TitleEntry, TitleMatch, TitleMatchResult};
