use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tsunagi_core::Direction;

/// Tsunagi - resolve anime series and episodes across AniDB and TVDB
#[derive(Parser)]
#[command(name = "tsunagi")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Anime-list mapping document (XML)
    #[arg(long, short = 'm', global = true, default_value = "anime-list.xml")]
    pub mapping: PathBuf,

    /// AniDB title dump (XML)
    #[arg(long, short = 't', global = true)]
    pub titles: Option<PathBuf>,

    /// Episode lists per catalog (JSON)
    #[arg(long, short = 'e', global = true)]
    pub episodes: Option<PathBuf>,

    /// Config file, defaults to the user config location
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Log resolution details
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the mapping record of an AniDB series
    Series {
        /// AniDB anime id
        anidb_id: u32,
    },

    /// List every mapping record pointing at a TVDB series
    Tvdb {
        /// TVDB series id
        tvdb_id: u32,
    },

    /// Resolve a title to an AniDB series
    #[command(alias = "t")]
    Title {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Translate an episode to the other catalog
    Map {
        /// Catalog the episode number comes from
        #[arg(long, value_enum, default_value = "anidb")]
        from: Catalog,
        /// Series id in that catalog
        series_id: u32,
        /// Season (AniDB: 1 for episodes, 0 for specials)
        season: u32,
        /// Episode number within the season
        episode: u32,
        /// Series-wide episode number, for absolute TVDB series
        #[arg(long)]
        absolute: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Catalog {
    Anidb,
    Tvdb,
}

impl Catalog {
    pub fn direction(self) -> Direction {
        match self {
            Self::Anidb => Direction::AniDbToTvDb,
            Self::Tvdb => Direction::TvDbToAniDb,
        }
    }
}
