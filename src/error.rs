//! Error types for chunk requests, compact encoding, and configuration.

use thiserror::Error;

/// Validation failures at the request boundary. Reported verbatim, never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Chunk coordinate outside the configured range.
    #[error("chunk ({chunk_x}, {chunk_y}) out of bounds: allowed range is [{min}, {max}]")]
    ChunkOutOfBounds {
        chunk_x: i32,
        chunk_y: i32,
        min: i32,
        max: i32,
    },

    /// Seed was missing or blank.
    #[error("seed must not be empty")]
    EmptySeed,
}

/// Encoding a tile hit a category missing from the shared index table.
///
/// This is a logic defect (classifier and table out of sync), not bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("internal consistency error: biome {0} has no compact index")]
    UnknownBiome(String),

    #[error("internal consistency error: river segment {0} has no compact index")]
    UnknownRiverSegment(String),
}

/// Decoding a compact tile hit an index outside the shared tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown tile kind index {0}")]
    UnknownKind(u8),

    #[error("unknown biome index {0}")]
    UnknownBiome(u8),

    #[error("unknown river segment index {0}")]
    UnknownRiverSegment(u8),

    #[error("invalid lake flag {0}")]
    InvalidLakeFlag(u8),

    #[error("compact chunk has {found} tiles, expected {expected}")]
    WrongTileCount { found: usize, expected: usize },
}

/// Configuration loading and validation failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for request validation.
pub type RequestResult<T> = Result<T, RequestError>;
