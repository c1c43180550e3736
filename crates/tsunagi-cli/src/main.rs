mod cli;
mod error;
mod fixture;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tsunagi_core::titles::document::parse_title_dump;
use tsunagi_core::{
    Config, EpisodeMapper, EpisodeNumber, MappingList, MemoryProvider, Resolver, SeriesTitleIndex,
};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::fixture::EpisodeFixture;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "tsunagi=debug" } else { "tsunagi=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default_location()?,
    };

    let mappings = MappingList::load(&cli.mapping)?
        .ok_or_else(|| CliError::EmptyMapping(cli.mapping.display().to_string()))?;
    let titles = match &cli.titles {
        Some(path) => load_titles(path, &config)?,
        None => SeriesTitleIndex::default(),
    };
    let (anidb, tvdb) = match &cli.episodes {
        Some(path) => EpisodeFixture::load(path)?.into_providers(),
        None => (MemoryProvider::new(), MemoryProvider::new()),
    };

    let resolver = Resolver::new(
        Arc::new(mappings),
        Arc::new(titles),
        EpisodeMapper::new(anidb, tvdb),
        config,
    );

    match cli.command {
        Commands::Series { anidb_id } => print_json(&resolver.resolve_series_mapping(anidb_id)?),
        Commands::Tvdb { tvdb_id } => print_json(
            &resolver
                .resolve_series_mappings_by_tvdb_id(tvdb_id)
                .unwrap_or_default(),
        ),
        Commands::Title { query } => print_json(&resolver.find_series_by_title(&query.join(" "))),
        Commands::Map {
            from,
            series_id,
            season,
            episode,
            absolute,
        } => {
            let mut number = EpisodeNumber::new(season, episode);
            if let Some(absolute) = absolute {
                number = number.with_absolute(absolute);
            }
            let resolved = resolver
                .map_series_episode(from.direction(), series_id, number)
                .await?;
            print_json(&resolved)
        }
    }
}

fn load_titles(path: &Path, config: &Config) -> Result<SeriesTitleIndex, CliError> {
    let xml = std::fs::read(path)?;
    let entries = parse_title_dump(&xml)?;
    info!(titles = entries.len(), path = %path.display(), "Title dump read");
    Ok(SeriesTitleIndex::build_for_languages(
        entries,
        &config.titles.languages,
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
