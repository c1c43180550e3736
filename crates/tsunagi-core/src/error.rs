use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    /// More than one record claims the same AniDB id. The mapping document
    /// is corrupt or was edited by hand.
    #[error("mapping document has {count} records for AniDB id {anidb_id}")]
    DuplicateSeries { anidb_id: u32, count: usize },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a raw series entry or group rule was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("invalid AniDB id '{0}'")]
    InvalidAniDbId(String),

    #[error("invalid default season '{0}'")]
    InvalidDefaultSeason(String),

    #[error("invalid AniDB season '{0}'")]
    InvalidSourceSeason(String),

    #[error("invalid TVDB season '{0}'")]
    InvalidTargetSeason(String),
}
